//! Puzzle timings and geometry
//!
//! Loaded from JSON; any missing field falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`PuzzleConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse puzzle config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read puzzle config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid puzzle config: {field} must be positive and finite (got {value})")]
    Invalid { field: &'static str, value: f32 },
}

/// Tunable puzzle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    // === Geometry ===
    /// Distance from the center tile to each ring tile anchor
    pub tile_spacing: f32,
    /// Max distance from an anchor for a ray hit to select that tile
    pub highlight_radius: f32,
    /// Multiplier on the anchor vector for the win scatter / intro gather
    pub scatter_scale: f32,

    // === Animation (seconds) ===
    /// One 60° tile turn
    pub rotate_duration: f32,
    /// Click feedback pulse
    pub ping_duration: f32,
    /// Win scatter; the puzzle is finished once this has elapsed after the lock
    pub win_duration: f32,
    /// Intro gather of a freshly activated puzzle
    pub intro_duration: f32,

    // === Session ===
    /// Countdown for a whole session
    pub round_duration: f32,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            tile_spacing: 1.0,
            // Circumradius of a tile whose neighbours sit `tile_spacing` apart
            highlight_radius: 0.58,
            scatter_scale: 1.0,

            rotate_duration: 0.15,
            ping_duration: 0.2,
            win_duration: 1.0,
            intro_duration: 0.6,

            round_duration: 60.0,
        }
    }
}

impl PuzzleConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded puzzle config from {}", path);
        Ok(config)
    }

    /// Every length and duration must be strictly positive.
    ///
    /// Zero-length easing windows report their start value, so a zero
    /// duration would freeze the matching animation at its first frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("tile_spacing", self.tile_spacing),
            ("highlight_radius", self.highlight_radius),
            ("scatter_scale", self.scatter_scale),
            ("rotate_duration", self.rotate_duration),
            ("ping_duration", self.ping_duration),
            ("win_duration", self.win_duration),
            ("intro_duration", self.intro_duration),
            ("round_duration", self.round_duration),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }
}
