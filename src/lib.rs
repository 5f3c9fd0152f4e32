//! Hex Hack - A hexagonal circuit-rotation minigame
//!
//! Core modules:
//! - `puzzle`: Puzzle generation, link consistency, interaction and animation state
//! - `session`: Timed round driver (score, countdown, puzzle hand-off)
//! - `config`: Data-driven timings and geometry
//! - `web`: JavaScript bindings for the browser renderer (wasm32 only)

pub mod config;
pub mod puzzle;
pub mod session;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, PuzzleConfig};
pub use session::{Session, SessionEvent, SessionPhase};

use glam::Vec2;

/// Puzzle topology constants
pub mod consts {
    /// Shared connectors between adjacent tiles
    pub const NUM_LINKS: usize = 12;
    /// Tiles in the puzzle (six ring tiles plus the center)
    pub const NUM_HEX: usize = 7;
    /// Tiles arranged around the center
    pub const RING_SIZE: usize = 6;
    /// Connector slots per tile
    pub const HEX_SIZE: usize = 6;
    /// Index of the center tile
    pub const CENTER_HEX: usize = 6;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
