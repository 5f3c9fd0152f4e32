//! Browser bindings
//!
//! The JavaScript side owns the camera, the timer and the WebGL renderer; it
//! forwards rays, clicks and the current time, then reads the draw snapshot
//! back as flat arrays.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use crate::config::PuzzleConfig;
use crate::puzzle::Ray;
use crate::session::{Session, SessionEvent, SessionPhase};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Hex Hack module loaded");
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session<Pcg32>,
}

#[wasm_bindgen]
impl WebSession {
    /// `config_json` may be omitted to use the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, config_json: Option<String>) -> Result<WebSession, JsValue> {
        let config = match config_json {
            Some(json) => PuzzleConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => PuzzleConfig::default(),
        };
        log::info!("Session created with seed: {}", seed as u64);
        Ok(Self {
            inner: Session::new(Pcg32::seed_from_u64(seed as u64), config),
        })
    }

    /// Seed from the wall clock
    pub fn from_clock() -> WebSession {
        let seed = js_sys::Date::now() as u64;
        log::info!("Session created with seed: {}", seed);
        Self {
            inner: Session::new(Pcg32::seed_from_u64(seed), PuzzleConfig::default()),
        }
    }

    pub fn begin(&mut self, now: f32) {
        self.inner.begin(now);
    }

    /// Advance to `now`; returns the kinds of the events raised, in order
    /// (0 = solved, 1 = next puzzle, 2 = time up)
    pub fn update(&mut self, now: f32) -> Vec<u8> {
        self.inner.update(now);
        self.inner.take_events().iter().map(SessionEvent::code).collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn pointer_ray(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32, now: f32) {
        let ray = Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz));
        self.inner.pointer_ray(&ray, now);
    }

    pub fn left_click(&mut self, now: f32) -> bool {
        self.inner.left_click(now)
    }

    pub fn right_click(&mut self, now: f32) -> bool {
        self.inner.right_click(now)
    }

    /// 0 = starting, 1 = ongoing, 2 = ending
    pub fn phase(&self) -> u8 {
        match self.inner.phase() {
            SessionPhase::Starting => 0,
            SessionPhase::Ongoing => 1,
            SessionPhase::Ending => 2,
        }
    }

    pub fn score(&self) -> u32 {
        self.inner.score()
    }

    pub fn remaining(&self, now: f32) -> f32 {
        self.inner.remaining(now)
    }

    /// Seven column-major 4x4 matrices, back to back
    pub fn draw_transforms(&self, now: f32) -> Vec<f32> {
        self.inner
            .puzzle()
            .draw_transforms(now)
            .iter()
            .flat_map(|m| m.to_cols_array())
            .collect()
    }

    pub fn draw_sprite_indices(&self) -> Vec<u8> {
        self.inner.puzzle().draw_sprite_indices().to_vec()
    }

    pub fn draw_sprite_offsets(&self) -> Vec<u8> {
        self.inner.puzzle().draw_sprite_offsets().to_vec()
    }

    /// Tile index, or -1 when nothing is selected
    pub fn draw_highlight_index(&self) -> i32 {
        self.inner
            .puzzle()
            .draw_highlight_index()
            .map_or(-1, |hex| hex as i32)
    }

    pub fn draw_click_pulse(&self, now: f32) -> f32 {
        self.inner.puzzle().draw_click_pulse(now)
    }

    pub fn draw_alpha(&self, now: f32) -> f32 {
        self.inner.puzzle().draw_alpha(now)
    }

    pub fn is_solved(&self) -> bool {
        self.inner.puzzle().is_solved()
    }

    /// Full draw snapshot as JSON (debug overlay)
    pub fn draw_state_json(&self, now: f32) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.draw_state(now)).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
