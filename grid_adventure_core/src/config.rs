use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::text::{DEFAULT_EASE, DEFAULT_LIFETIME};

/// Largest number of cells a configured grid may have.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Represents errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Grid dimensions must be non-zero, got ({width}, {height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("Grid ({width}, {height}) is too large, at most {MAX_GRID_CELLS} cells and {} per side", u16::MAX)]
    GridTooLarge { width: usize, height: usize },
    #[error("Text timing must satisfy 0 < ease and 2 * ease <= lifetime, got ease {ease} lifetime {lifetime}")]
    TextTiming { lifetime: f32, ease: f32 },
}

/// Tunable parameters of a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Seconds a feedback message stays on screen.
    pub text_lifetime: f32,
    /// Seconds spent fading a message in, and again fading it out.
    pub text_ease: f32,
    /// Whether loading a level resets the player's key count to zero.
    pub reset_keys_on_load: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_width: 25,
            grid_height: 15,
            text_lifetime: DEFAULT_LIFETIME,
            text_ease: DEFAULT_EASE,
            reset_keys_on_load: true,
        }
    }
}

impl GameConfig {
    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let cells = self.grid_width.checked_mul(self.grid_height);
        let side = usize::from(u16::MAX);
        if cells.is_none_or(|cells| cells > MAX_GRID_CELLS)
            || self.grid_width > side
            || self.grid_height > side
        {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if !(self.text_ease > 0.0 && 2.0 * self.text_ease <= self.text_lifetime) {
            return Err(ConfigError::TextTiming {
                lifetime: self.text_lifetime,
                ease: self.text_ease,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_document_overrides_given_keys() {
        let config = GameConfig::from_toml_str("grid_width = 10\nreset_keys_on_load = false\n")
            .unwrap();
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 15);
        assert!(!config.reset_keys_on_load);
    }

    #[test]
    fn rejects_zero_sized_grid() {
        let error = GameConfig::from_toml_str("grid_height = 0").unwrap_err();
        assert!(matches!(error, ConfigError::EmptyGrid { width: 25, height: 0 }));
    }

    #[test]
    fn rejects_oversized_grid() {
        let overflowing = GameConfig {
            grid_width: usize::MAX,
            grid_height: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            overflowing.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::from_toml_str("grid_width = 2048\ngrid_height = 1024"),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::from_toml_str("grid_width = 1\ngrid_height = 70000"),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(GameConfig::from_toml_str("grid_width = 1024\ngrid_height = 1024").is_ok());
    }

    #[test]
    fn rejects_overlapping_fades() {
        let error = GameConfig::from_toml_str("text_lifetime = 0.3\ntext_ease = 0.2").unwrap_err();
        assert!(matches!(error, ConfigError::TextTiming { .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            GameConfig::from_toml_str("grid_width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
