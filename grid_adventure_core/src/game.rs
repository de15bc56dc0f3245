//! Host-facing entry points: input in, per-frame view out.

use serde::Serialize;

use crate::{
    Movement, Position,
    config::GameConfig,
    level::LevelLayout,
    occupant::{OccupantKind, Rotation, Sprite},
    world::World,
};

/// A host event translated into something the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move(Movement),
    /// Reloads the level at this slot.
    SelectLevel(usize),
    Idle,
}

/// Something for the host to draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drawable {
    pub position: Position,
    pub kind: OccupantKind,
    pub sprite: Sprite,
    pub rotation: Rotation,
}

/// A live message and its current opacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextView {
    pub text: String,
    pub opacity: f32,
}

/// Everything the host needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub level: String,
    pub width: usize,
    pub height: usize,
    /// Non-player occupants in creation order, followed by the player.
    pub drawables: Vec<Drawable>,
    pub texts: Vec<TextView>,
    pub keys: u32,
}

/// A running game: the world plus the levels it can switch between.
pub struct Game {
    world: World,
    levels: Vec<LevelLayout>,
    active: usize,
}

impl Game {
    /// Creates a game and loads the first level, if any.
    pub fn new(config: &GameConfig, levels: Vec<LevelLayout>) -> Self {
        let mut world = World::new(config);
        if let Some(first) = levels.first() {
            world.load(first);
        }
        Game {
            world,
            levels,
            active: 0,
        }
    }

    /// Applies one input atomically. Returns whether anything changed.
    pub fn handle_input(&mut self, input: Input) -> bool {
        match input {
            Input::Move(movement) => self.world.move_player(movement),
            Input::SelectLevel(slot) => self.select_level(slot),
            Input::Idle => false,
        }
    }

    fn select_level(&mut self, slot: usize) -> bool {
        let Some(layout) = self.levels.get(slot) else {
            log::debug!("no level in slot {slot}");
            return false;
        };
        self.world.load(layout);
        self.active = slot;
        true
    }

    /// Advances time-driven state by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        self.world.advance_texts(delta);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Slot of the loaded level.
    pub fn active_level(&self) -> usize {
        self.active
    }

    pub fn view(&self) -> SceneView {
        let (players, others): (Vec<Drawable>, Vec<Drawable>) = self
            .world
            .occupants()
            .map(|occupant| Drawable {
                position: occupant.position,
                kind: occupant.kind,
                sprite: occupant.sprite,
                rotation: occupant.rotation,
            })
            .partition(|drawable| drawable.kind == OccupantKind::Player);
        let drawables = others.into_iter().chain(players).collect();

        let texts = self
            .world
            .texts()
            .messages()
            .iter()
            .map(|text| TextView {
                text: text.text().to_owned(),
                opacity: text.opacity(),
            })
            .collect();

        SceneView {
            level: self
                .levels
                .get(self.active)
                .map(|layout| layout.name().to_owned())
                .unwrap_or_default(),
            width: self.world.width(),
            height: self.world.height(),
            drawables,
            texts,
            keys: self.world.keys(),
        }
    }
}
