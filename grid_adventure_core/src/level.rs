//! Character-grid level definitions.
//!
//! Each line of a level is one row (`y` = line number) and each character
//! one column (`x` = character offset). Legend:
//!
//! | char | occupant                                  |
//! |------|-------------------------------------------|
//! | `x`  | brick wall                                |
//! | `o`  | wooden box                                |
//! | `P`  | power block                               |
//! | `0`  | powerline wall, right                     |
//! | `1`  | powerline wall, left                      |
//! | `2`  | powerline wall, right, turned half a turn |
//! | `3`  | powerline wall, left, turned half a turn  |
//! | `k`  | key                                       |
//! | `D`  | locked door                               |
//! | `^`  | rocky grass                               |
//! | `S`  | player start                              |
//!
//! Any other character is an empty cell.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    Position,
    occupant::{OccupantKind, Rotation, Sprite},
};

/// Represents errors that can occur while reading a level from disk.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a level character places on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: OccupantKind,
    pub sprite: Sprite,
    pub rotation: Rotation,
}

impl Tile {
    const fn new(kind: OccupantKind, sprite: Sprite) -> Self {
        Tile {
            kind,
            sprite,
            rotation: Rotation::None,
        }
    }

    const fn turned(self) -> Self {
        Tile {
            rotation: Rotation::HalfTurn,
            ..self
        }
    }
}

/// Meaning of a single level character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Start,
    Occupant(Tile),
}

/// Looks up a level character. `None` means the cell is empty.
pub fn glyph(symbol: char) -> Option<Glyph> {
    use OccupantKind::*;

    let tile = match symbol {
        'S' => return Some(Glyph::Start),
        'x' => Tile::new(Immovable, Sprite::BrickWall),
        'o' => Tile::new(Movable, Sprite::WoodenBox),
        'P' => Tile::new(Movable, Sprite::PowerBlock),
        '0' => Tile::new(Movable, Sprite::PowerlineRight),
        '1' => Tile::new(Movable, Sprite::PowerlineLeft),
        '2' => Tile::new(Movable, Sprite::PowerlineRight).turned(),
        '3' => Tile::new(Movable, Sprite::PowerlineLeft).turned(),
        'k' => Tile::new(Consumable, Sprite::GoldenKey),
        'D' => Tile::new(Door, Sprite::LockedDoor),
        '^' => Tile::new(Clutter, Sprite::RockyGrass),
        _ => return None,
    };
    Some(Glyph::Occupant(tile))
}

/// A tile to create at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    pub tile: Tile,
}

/// A parsed level, ready to be loaded into a world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    name: String,
    start: Option<Position>,
    placements: Vec<Placement>,
}

impl LevelLayout {
    /// Parses a level. Never fails: unknown characters are empty cells.
    ///
    /// If several start markers are present the last one wins.
    pub fn parse(name: impl Into<String>, source: &str) -> Self {
        let name = name.into();
        let mut start = None;
        let mut placements = Vec::new();

        for (y, line) in source.lines().enumerate() {
            for (x, symbol) in line.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                match glyph(symbol) {
                    Some(Glyph::Start) => {
                        if let Some(previous) = start.replace(position) {
                            log::warn!(
                                "level {name}: start marker at {position:?} overrides {previous:?}"
                            );
                        }
                    }
                    Some(Glyph::Occupant(tile)) => placements.push(Placement { position, tile }),
                    None => {}
                }
            }
        }

        LevelLayout {
            name,
            start,
            placements,
        }
    }

    /// Reads and parses a level file. The file stem becomes the level name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::parse(name, &source))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The start marker position, if the level has one.
    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }
}

const HARD: &str = "\
...x..kx
S..o...x
...x.o.x
xxxxx^x.
x.....xx
ko....DD
x.....xx
xxxxxxx.";

const POWER_LINE: &str = "\
..............
..............
.....0.P......
.....1........
.....2........
S....3........
..............";

/// The key-and-door maze.
pub fn hard() -> LevelLayout {
    LevelLayout::parse("hard", HARD)
}

/// The powerline pushing puzzle.
pub fn power_line() -> LevelLayout {
    LevelLayout::parse("power_line", POWER_LINE)
}

/// Levels shipped with the game, in hotkey order.
pub fn builtin() -> Vec<LevelLayout> {
    vec![hard(), power_line()]
}
