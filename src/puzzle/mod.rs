//! Hacking puzzle core
//!
//! Seven hexagonal tiles (a ring of six around a center) share twelve links.
//! Everything here is pure and frame-driven:
//! - Time is passed in by the caller on every call
//! - Randomness is injected (`rand::Rng`), seeded for reproducibility
//! - No rendering or platform dependencies

pub mod deck;
pub mod ease;
pub mod hex;
pub mod layout;
pub mod pattern;
pub mod ray;
pub mod state;

pub use deck::PuzzleDeck;
pub use ease::{Ease, EaseLaw, EaseScalar, EaseVec3};
pub use hex::{Hex, LinkReading, Spin};
pub use pattern::{ClassifyError, Pattern, classify};
pub use ray::Ray;
pub use state::{DrawState, HackingPuzzle, LinkStatus};
