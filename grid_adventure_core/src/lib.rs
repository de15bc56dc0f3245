use serde::{Deserialize, Serialize};

pub mod config;
pub mod game;
pub mod index;
pub mod level;
pub mod map;
pub mod occupant;
pub mod rules;
pub mod text;
pub mod world;

/// Represents a 2D grid coordinate.
///
/// Coordinates are signed so that a step off the edge of the grid can be
/// represented and then rejected by a bounds check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns the position one step away in the given direction.
    pub fn step(self, movement: Movement) -> Position {
        let (dx, dy) = movement.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A discrete movement intent.
///
/// `Up` increases `y`; hosts that draw row 0 at the top should flip rows
/// when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    None,
}

impl Movement {
    /// The unit (or zero) vector for this movement.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Movement::Left => (-1, 0),
            Movement::Right => (1, 0),
            Movement::Up => (0, 1),
            Movement::Down => (0, -1),
            Movement::None => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_applies_unit_vector() {
        let origin = Position::new(3, 3);
        assert_eq!(origin.step(Movement::Left), Position::new(2, 3));
        assert_eq!(origin.step(Movement::Right), Position::new(4, 3));
        assert_eq!(origin.step(Movement::Up), Position::new(3, 4));
        assert_eq!(origin.step(Movement::Down), Position::new(3, 2));
        assert_eq!(origin.step(Movement::None), origin);
    }
}
