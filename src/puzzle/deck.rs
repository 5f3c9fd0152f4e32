//! Active puzzle plus a pre-generated successor
//!
//! Hand-off is a single move of the backup into the active slot, so no
//! generation happens on the frame a round changes over.

use rand::Rng;
use std::mem;

use super::state::HackingPuzzle;
use crate::config::PuzzleConfig;

#[derive(Debug, Clone)]
pub struct PuzzleDeck {
    active: HackingPuzzle,
    backup: HackingPuzzle,
    config: PuzzleConfig,
    /// Puzzles activated so far, including the first
    dealt: u32,
}

impl PuzzleDeck {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: &PuzzleConfig) -> Self {
        Self {
            active: HackingPuzzle::generate(rng, config),
            backup: HackingPuzzle::generate(rng, config),
            config: config.clone(),
            dealt: 1,
        }
    }

    pub fn active(&self) -> &HackingPuzzle {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut HackingPuzzle {
        &mut self.active
    }

    pub fn backup(&self) -> &HackingPuzzle {
        &self.backup
    }

    pub fn dealt(&self) -> u32 {
        self.dealt
    }

    /// Promote the backup, generate a fresh backup and start the intro
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, now: f32) -> &mut HackingPuzzle {
        let fresh = HackingPuzzle::generate(rng, &self.config);
        self.active = mem::replace(&mut self.backup, fresh);
        self.active.start_intro_animation(now);
        self.dealt += 1;
        log::info!("Puzzle {} active", self.dealt);
        &mut self.active
    }
}
