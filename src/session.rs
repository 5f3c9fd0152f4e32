//! Timed session driver
//!
//! Owns the random source and the puzzle deck. Solve as many puzzles as
//! possible before the countdown runs out.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::PuzzleConfig;
use crate::puzzle::{DrawState, HackingPuzzle, PuzzleDeck, Ray};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to start
    Starting,
    /// Countdown running, input accepted
    Ongoing,
    /// Countdown expired
    Ending,
}

/// Something the caller may want to react to (sound, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Active puzzle solved; its win animation has started
    Solved { score: u32 },
    /// The backup puzzle took over
    NextPuzzle,
    /// The countdown ran out
    Expired { score: u32 },
}

impl SessionEvent {
    /// Numeric kind for callers that cannot take the enum (0 solved, 1 next puzzle, 2 expired)
    pub fn code(&self) -> u8 {
        match self {
            SessionEvent::Solved { .. } => 0,
            SessionEvent::NextPuzzle => 1,
            SessionEvent::Expired { .. } => 2,
        }
    }
}

pub struct Session<R: Rng> {
    rng: R,
    deck: PuzzleDeck,
    config: PuzzleConfig,
    phase: SessionPhase,
    score: u32,
    /// Time at which the countdown hits zero
    deadline: f32,
    events: Vec<SessionEvent>,
}

impl<R: Rng> Session<R> {
    pub fn new(mut rng: R, config: PuzzleConfig) -> Self {
        let deck = PuzzleDeck::new(&mut rng, &config);
        Self {
            rng,
            deck,
            config,
            phase: SessionPhase::Starting,
            score: 0,
            deadline: 0.0,
            events: Vec::new(),
        }
    }

    /// Start (or restart) the countdown on a fresh puzzle
    pub fn begin(&mut self, now: f32) {
        if self.phase == SessionPhase::Ongoing {
            return;
        }
        self.phase = SessionPhase::Ongoing;
        self.score = 0;
        self.deadline = now + self.config.round_duration;
        self.deck.advance(&mut self.rng, now);
        log::info!("Session started, {:.0}s on the clock", self.config.round_duration);
    }

    /// Advance the session to `now`
    pub fn update(&mut self, now: f32) {
        if self.phase != SessionPhase::Ongoing {
            return;
        }

        let puzzle = self.deck.active_mut();
        if !puzzle.is_locked() && puzzle.is_solved() {
            puzzle.lock_interaction(now);
            puzzle.start_win_animation(now);
            self.score += 1;
            log::info!("Puzzle solved (score {})", self.score);
            self.events.push(SessionEvent::Solved { score: self.score });
        }

        if self.deck.active().is_finished(now) {
            self.deck.advance(&mut self.rng, now);
            self.events.push(SessionEvent::NextPuzzle);
        }

        if now >= self.deadline {
            self.phase = SessionPhase::Ending;
            log::info!("Time up: {} puzzles completed", self.score);
            self.events.push(SessionEvent::Expired { score: self.score });
        }
    }

    // === Input (ignored unless the countdown is running) ===

    pub fn pointer_ray(&mut self, ray: &Ray, now: f32) {
        if self.phase == SessionPhase::Ongoing {
            self.deck.active_mut().highlight(ray, now);
        }
    }

    pub fn left_click(&mut self, now: f32) -> bool {
        self.phase == SessionPhase::Ongoing && self.deck.active_mut().left_click(now)
    }

    pub fn right_click(&mut self, now: f32) -> bool {
        self.phase == SessionPhase::Ongoing && self.deck.active_mut().right_click(now)
    }

    // === Queries ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds left on the clock (0 outside a running session)
    pub fn remaining(&self, now: f32) -> f32 {
        match self.phase {
            SessionPhase::Ongoing => (self.deadline - now).max(0.0),
            _ => 0.0,
        }
    }

    pub fn puzzle(&self) -> &HackingPuzzle {
        self.deck.active()
    }

    pub fn draw_state(&self, now: f32) -> DrawState {
        self.deck.active().draw_state(now)
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
