use serde::{Deserialize, Serialize};

use crate::Position;

/// Unique identifier for occupants placed on the grid.
pub type OccupantId = usize;

/// The closed set of grid-resident entity variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupantKind {
    /// The avatar controlled by input. Exactly one per level.
    Player,
    /// Crates, power blocks and wall segments that can be pushed.
    Movable,
    /// Walls.
    Immovable,
    /// Pickups (keys). Removed on contact.
    Consumable,
    /// Removed on contact with a player holding a key.
    Door,
    /// Decoration the player walks over.
    Clutter,
}

impl OccupantKind {
    /// Whether this variant can ever change position.
    pub fn can_move(self) -> bool {
        matches!(self, OccupantKind::Player | OccupantKind::Movable)
    }
}

/// Visual identity the host uses to pick an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Player,
    WoodenBox,
    BrickWall,
    GoldenKey,
    LockedDoor,
    PowerBlock,
    PowerlineRight,
    PowerlineLeft,
    RockyGrass,
}

/// Cosmetic rotation applied when drawing. Has no effect on movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    HalfTurn,
}

impl Rotation {
    pub fn degrees(self) -> f32 {
        match self {
            Rotation::None => 0.0,
            Rotation::HalfTurn => 180.0,
        }
    }
}

/// An entity with a position on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: OccupantId,
    pub kind: OccupantKind,
    pub position: Position,
    pub sprite: Sprite,
    pub rotation: Rotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_player_and_movable_can_move() {
        let movers: Vec<OccupantKind> = [
            OccupantKind::Player,
            OccupantKind::Movable,
            OccupantKind::Immovable,
            OccupantKind::Consumable,
            OccupantKind::Door,
            OccupantKind::Clutter,
        ]
        .into_iter()
        .filter(|kind| kind.can_move())
        .collect();
        assert_eq!(movers, vec![OccupantKind::Player, OccupantKind::Movable]);
    }

    #[test]
    fn half_turn_is_180_degrees() {
        assert_eq!(Rotation::HalfTurn.degrees(), 180.0);
        assert_eq!(Rotation::default().degrees(), 0.0);
    }
}
