//! Game settings
//!
//! One JSON document configures every game and the audio router. Missing
//! fields fall back to defaults, so a partial file is fine.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arcade::ArcadeConfig;
use crate::consts::{PADDLE_BOTTOM_OFFSET, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::match3::MatchConfig;
use crate::memory::MemoryConfig;

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Error type for settings loading
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arcade: ArcadeConfig,
    pub match_three: MatchConfig,
    pub memory: MemoryConfig,
    pub audio: AudioSettings,
}

impl Settings {
    /// Parse and sanitize a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let settings = Self::from_json(&contents)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path`, or use defaults if it is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values the cores cannot run with
    pub fn sanitized(mut self) -> Self {
        let arcade = &mut self.arcade;
        if !(arcade.width.is_finite() && arcade.width > 0.0) {
            log::warn!("Invalid playfield width {}, using {}", arcade.width, PLAYFIELD_WIDTH);
            arcade.width = PLAYFIELD_WIDTH;
        }
        if !(arcade.height.is_finite() && arcade.height > 2.0 * PADDLE_BOTTOM_OFFSET) {
            log::warn!("Invalid playfield height {}, using {}", arcade.height, PLAYFIELD_HEIGHT);
            arcade.height = PLAYFIELD_HEIGHT;
        }
        arcade.bomb_chance = unit(arcade.bomb_chance, "bomb_chance");
        arcade.multiball_chance = unit(arcade.multiball_chance, "multiball_chance");
        let total = arcade.bomb_chance + arcade.multiball_chance;
        if total > 1.0 {
            log::warn!("Special brick odds sum to {}, scaling down", total);
            arcade.bomb_chance /= total;
            arcade.multiball_chance /= total;
        }

        let grid = &mut self.match_three;
        if grid.cols == 0 || grid.start_rows == 0 {
            log::warn!("Empty match-three board {}x{}, using defaults", grid.start_rows, grid.cols);
            *grid = MatchConfig::default();
        }
        if grid.max_rows < grid.start_rows {
            log::warn!("Row cap {} below start rows {}", grid.max_rows, grid.start_rows);
            grid.max_rows = grid.start_rows;
        }

        let memory = &mut self.memory;
        if memory.max_pairs == 0 || memory.pairs_per_level == 0 {
            log::warn!("Empty memory deck, using defaults");
            *memory = MemoryConfig::default();
        }

        self.audio.master_volume = unit(self.audio.master_volume, "master_volume");
        self.audio.sfx_volume = unit(self.audio.sfx_volume, "sfx_volume");

        self
    }
}

/// Clamp to 0.0 - 1.0, treating NaN as 0
fn unit(value: f32, name: &str) -> f32 {
    let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    if clamped != value {
        log::warn!("{} out of range ({}), clamped to {}", name, value, clamped);
    }
    clamped
}
