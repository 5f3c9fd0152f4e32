//! A single rotatable tile
//!
//! Slots are fixed clockwise positions; spinning the tile shifts the values
//! shown at each slot while the global link bound to each slot stays put.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_3;

use super::ease::{EaseLaw, EaseScalar, EaseVec3};
use super::pattern::{ClassifyError, Pattern, classify};
use crate::consts::*;

/// Rotation direction of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// Slot steps taken by one turn
    #[inline]
    pub fn steps(self) -> i32 {
        match self {
            Spin::Clockwise => 1,
            Spin::CounterClockwise => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// `(global link index, value read at this tile)`
pub type LinkReading = (usize, bool);

/// Visual law for tile turns
const ROTATE_LAW: EaseLaw = EaseLaw::Smooth;
/// Visual law for scatter / gather offsets
const OFFSET_LAW: EaseLaw = EaseLaw::Power(3.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hex {
    id: usize,
    link_slots: [Option<usize>; HEX_SIZE],
    link_values: [bool; HEX_SIZE],
    /// Clockwise turns since generation, in [0, 6)
    rotation_offset: u8,
    /// Classified from the generated (unrotated) values
    pattern: Pattern,
    /// Unwrapped turn count, so animations never spin the long way round
    turns: i32,
    rotation: EaseScalar,
    offset: EaseVec3,
}

impl Hex {
    /// Build a tile from its slot bindings and the global link values
    pub fn new(
        id: usize,
        link_slots: [Option<usize>; HEX_SIZE],
        links: &[bool; NUM_LINKS],
    ) -> Result<Self, ClassifyError> {
        let link_values = link_slots.map(|slot| slot.is_some_and(|link| links[link]));
        let pattern = classify(&link_values)?;
        let mut hex = Self {
            id,
            link_slots,
            link_values,
            rotation_offset: 0,
            pattern,
            turns: 0,
            rotation: EaseScalar::constant(0.0),
            offset: EaseVec3::constant(Vec3::ZERO),
        };
        hex.settle();
        Ok(hex)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn link_values(&self) -> &[bool; HEX_SIZE] {
        &self.link_values
    }

    pub fn rotation_offset(&self) -> u8 {
        self.rotation_offset
    }

    /// Sprite frame for this tile
    pub fn sprite(&self) -> u8 {
        self.pattern.sprite
    }

    /// Cyclic offset of the current slot values against the sprite template
    pub fn pattern_offset(&self) -> u8 {
        (self.pattern.offset + self.rotation_offset) % HEX_SIZE as u8
    }

    /// Value this tile currently shows for `link`, if it owns it
    pub fn reading(&self, link: usize) -> Option<bool> {
        self.link_slots
            .iter()
            .position(|&slot| slot == Some(link))
            .map(|slot| self.link_values[slot])
    }

    /// Readings of every connected slot
    pub fn relevant_links(&self) -> Vec<LinkReading> {
        self.link_slots
            .iter()
            .zip(self.link_values)
            .filter_map(|(slot, value)| slot.map(|link| (link, value)))
            .collect()
    }

    pub fn rotate_clockwise(&mut self) -> Vec<LinkReading> {
        self.rotate(Spin::Clockwise)
    }

    pub fn rotate_counterclockwise(&mut self) -> Vec<LinkReading> {
        self.rotate(Spin::CounterClockwise)
    }

    /// Shift the slot values one position and return the new readings
    pub fn rotate(&mut self, spin: Spin) -> Vec<LinkReading> {
        match spin {
            Spin::Clockwise => self.link_values.rotate_right(1),
            Spin::CounterClockwise => self.link_values.rotate_left(1),
        }
        self.turns += spin.steps();
        self.rotation_offset = self.turns.rem_euclid(HEX_SIZE as i32) as u8;
        self.relevant_links()
    }

    /// Angle the tile rests at once all animation is done
    pub fn rest_angle(&self) -> f32 {
        -((self.pattern.offset as i32 + self.turns) as f32) * FRAC_PI_3
    }

    /// Replace the rotation track with a 60° turn from the current angle
    pub fn begin_rotate_animation(&mut self, spin: Spin, now: f32, duration: f32) {
        let from = self.current_angle(now);
        let to = self.rotation.to - spin.steps() as f32 * FRAC_PI_3;
        self.rotation = EaseScalar::over(from, to, now, duration);
    }

    /// Replace the translation track
    pub fn begin_offset_animation(&mut self, now: f32, from: Vec3, to: Vec3, duration: f32) {
        self.offset = EaseVec3::over(from, to, now, duration);
    }

    /// Drop any animation and rest at the current orientation with no offset
    pub fn settle(&mut self) {
        self.rotation = EaseScalar::constant(self.rest_angle());
        self.offset = EaseVec3::constant(Vec3::ZERO);
    }

    pub fn current_angle(&self, now: f32) -> f32 {
        self.rotation.sample(now, ROTATE_LAW)
    }

    pub fn current_offset(&self, now: f32) -> Vec3 {
        self.offset.sample(now, OFFSET_LAW)
    }
}
