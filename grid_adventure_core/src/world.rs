use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    Movement, Position,
    config::GameConfig,
    index::OccupantIndex,
    level::{LevelLayout, Tile},
    map::GridError,
    occupant::{Occupant, OccupantId, OccupantKind, Rotation, Sprite},
    rules::{self, Contact},
    text::TextFeed,
};

/// Per-level state of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerState {
    pub id: OccupantId,
    pub keys: u32,
}

/// Builds the message shown after picking up a key.
pub fn pickup_message(keys: u32) -> String {
    let noun = if keys > 1 { "keys" } else { "key" };
    format!("Picked up a key, you now have {keys} {noun}")
}

pub const LOCKED_DOOR_MESSAGE: &str = "The door is locked";

/// Side effects collected while resolving one move. Applied only if the
/// whole move succeeds.
#[derive(Debug, Default)]
struct MovePlan {
    keys: u32,
    relocations: Vec<(OccupantId, Position, Position)>,
    removals: HashSet<OccupantId>,
    messages: Vec<String>,
    resolved: HashMap<OccupantId, bool>,
    locked_door: bool,
}

/// Occupant arena plus the position index kept in step with it.
pub struct World {
    occupants: BTreeMap<OccupantId, Occupant>,
    index: OccupantIndex,
    player: PlayerState,
    texts: TextFeed,
    next_occupant_id: OccupantId,
    reset_keys_on_load: bool,
}

impl World {
    /// Creates a world holding only the player at the origin.
    pub fn new(config: &GameConfig) -> Self {
        let mut world = World {
            occupants: BTreeMap::new(),
            index: OccupantIndex::new(config.grid_width, config.grid_height),
            player: PlayerState { id: 0, keys: 0 },
            texts: TextFeed::new(config.text_lifetime, config.text_ease),
            next_occupant_id: 1,
            reset_keys_on_load: config.reset_keys_on_load,
        };
        world.spawn_player(Position::default());
        world
    }

    /// Generates a unique occupant id.
    fn reserve_occupant_id(&mut self) -> OccupantId {
        let id = self.next_occupant_id;
        self.next_occupant_id += 1;
        id
    }

    fn spawn_player(&mut self, position: Position) {
        let id = self.player.id;
        let occupant = Occupant {
            id,
            kind: OccupantKind::Player,
            position,
            sprite: Sprite::Player,
            rotation: Rotation::None,
        };
        // The origin is always in bounds for a validated config.
        if let Err(error) = self.index.insert(id, position) {
            log::error!("cannot place player: {error}");
            return;
        }
        self.occupants.insert(id, occupant);
    }

    /// Adds an occupant and registers it in the index.
    pub fn place(&mut self, tile: Tile, position: Position) -> Result<OccupantId, GridError> {
        if !self.index.in_bounds(position) {
            return Err(GridError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: self.index.width(),
                height: self.index.height(),
            });
        }
        let id = self.reserve_occupant_id();
        self.index.insert(id, position)?;
        self.occupants.insert(
            id,
            Occupant {
                id,
                kind: tile.kind,
                position,
                sprite: tile.sprite,
                rotation: tile.rotation,
            },
        );
        Ok(id)
    }

    /// Replaces every occupant with the contents of `layout`.
    ///
    /// Without a start marker the player starts at the origin. Placements
    /// outside the grid are skipped.
    pub fn load(&mut self, layout: &LevelLayout) {
        self.occupants.clear();
        self.index.clear();
        if self.reset_keys_on_load {
            self.player.keys = 0;
        }

        let start = match layout.start() {
            Some(start) if self.index.in_bounds(start) => start,
            Some(start) => {
                log::warn!(
                    "level {}: start {start:?} is outside the grid, using origin",
                    layout.name()
                );
                Position::default()
            }
            None => {
                log::warn!("level {}: no start marker, using origin", layout.name());
                Position::default()
            }
        };
        self.spawn_player(start);

        let mut skipped = 0;
        for placement in layout.placements() {
            if let Err(error) = self.place(placement.tile, placement.position) {
                log::warn!("level {}: skipping {:?}: {error}", layout.name(), placement.tile);
                skipped += 1;
            }
        }
        log::info!(
            "loaded level {} with {} occupants ({skipped} skipped), player at {start:?}",
            layout.name(),
            self.occupants.len()
        );
    }

    /// Moves the player one step. See [`World::attempt_move`].
    pub fn move_player(&mut self, movement: Movement) -> bool {
        self.attempt_move(self.player.id, movement)
    }

    /// Tries to move `id` one step, pushing whatever stands in the way.
    ///
    /// Either the whole chain moves, pickups are taken and doors opened, or
    /// nothing changes.
    pub fn attempt_move(&mut self, id: OccupantId, movement: Movement) -> bool {
        let mut plan = MovePlan {
            keys: self.player.keys,
            ..MovePlan::default()
        };
        let movable = self.plan_move(id, movement, &mut plan);
        log::debug!(
            "move {id} {movement:?}: {} ({} relocations, {} removals)",
            if movable { "ok" } else { "blocked" },
            plan.relocations.len(),
            plan.removals.len()
        );

        if movable {
            self.commit(plan);
        } else if id == self.player.id && plan.locked_door && self.player.keys == 0 {
            self.texts.show_text(LOCKED_DOOR_MESSAGE);
        }
        debug_assert!(self.is_coherent());
        movable
    }

    /// Decides whether `id` can take one step, recording effects in `plan`.
    ///
    /// Every occupant in the target cell is visited even after one of them
    /// has refused to move.
    fn plan_move(&self, id: OccupantId, movement: Movement, plan: &mut MovePlan) -> bool {
        if let Some(&movable) = plan.resolved.get(&id) {
            return movable;
        }
        let Some(mover) = self.occupants.get(&id) else {
            return false;
        };
        let target = mover.position.step(movement);
        if movement == Movement::None || !mover.kind.can_move() || !self.index.in_bounds(target) {
            plan.resolved.insert(id, false);
            return false;
        }

        let mut movable = true;
        for &other_id in self.index.at(target) {
            if plan.removals.contains(&other_id) {
                continue;
            }
            let Some(other) = self.occupants.get(&other_id) else {
                continue;
            };
            match rules::contact(mover.kind, other.kind, plan.keys) {
                Contact::Consume => {
                    plan.removals.insert(other_id);
                    if mover.kind == OccupantKind::Player {
                        plan.keys += 1;
                        plan.messages.push(pickup_message(plan.keys));
                    }
                }
                Contact::Unlock => {
                    plan.removals.insert(other_id);
                    plan.keys -= 1;
                }
                Contact::PassThrough => {}
                Contact::Push => {
                    if !self.plan_move(other_id, movement, plan) {
                        if other.kind == OccupantKind::Door && mover.kind == OccupantKind::Player {
                            plan.locked_door = true;
                        }
                        movable = false;
                    }
                }
            }
        }

        if movable {
            plan.relocations.push((id, mover.position, target));
        }
        plan.resolved.insert(id, movable);
        movable
    }

    fn commit(&mut self, plan: MovePlan) {
        for id in &plan.removals {
            if let Some(occupant) = self.occupants.remove(id) {
                self.index.remove(*id, occupant.position);
            }
        }
        for (id, from, to) in plan.relocations {
            match self.index.relocate(id, from, to) {
                Ok(()) => {
                    if let Some(occupant) = self.occupants.get_mut(&id) {
                        occupant.position = to;
                    }
                }
                Err(error) => log::error!("index out of step with occupant {id}: {error}"),
            }
        }
        self.player.keys = plan.keys;
        for message in plan.messages {
            self.texts.show_text(message);
        }
    }

    /// Advances feedback messages by `delta` seconds.
    pub fn advance_texts(&mut self, delta: f32) {
        self.texts.advance(delta);
    }

    pub fn player(&self) -> PlayerState {
        self.player
    }

    pub fn player_position(&self) -> Position {
        self.occupants
            .get(&self.player.id)
            .map(|player| player.position)
            .unwrap_or_default()
    }

    pub fn keys(&self) -> u32 {
        self.player.keys
    }

    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> {
        self.occupants.get(&id)
    }

    /// All live occupants in creation order.
    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.occupants.values()
    }

    /// Occupants registered at `position`, in registration order.
    pub fn occupants_at(&self, position: Position) -> impl Iterator<Item = &Occupant> {
        self.index
            .at(position)
            .iter()
            .filter_map(|id| self.occupants.get(id))
    }

    pub fn texts(&self) -> &TextFeed {
        &self.texts
    }

    pub fn width(&self) -> usize {
        self.index.width()
    }

    pub fn height(&self) -> usize {
        self.index.height()
    }

    /// Checks that each occupant is indexed exactly once, at its own
    /// position, and that the index holds nothing else.
    pub fn is_coherent(&self) -> bool {
        let mut seen: HashMap<OccupantId, Position> = HashMap::new();
        for (position, id) in self.index.entries() {
            if seen.insert(id, position).is_some() {
                return false;
            }
            match self.occupants.get(&id) {
                Some(occupant) if occupant.position == position => {}
                _ => return false,
            }
        }
        seen.len() == self.occupants.len()
    }
}
