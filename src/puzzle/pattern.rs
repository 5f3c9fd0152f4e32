//! Connector pattern classification
//!
//! A tile's engaged slots form a 6-bit mask (bit `i` = slot `i`). Each mask is
//! matched against canonical shapes, one table per engaged count, by rotating
//! the template bits. The first template (in table order) that matches wins,
//! and within it the smallest rotation wins. The winning template selects the
//! sprite frame; the rotation is the cyclic offset at which the sprite must be
//! drawn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::HEX_SIZE;

/// Bitmask of engaged slots (low six bits)
pub type SlotMask = u8;

const FULL_MASK: SlotMask = 0b11_1111;

/// Sprite frame ids, in sprite-sheet order
pub mod sprite {
    /// `+-----`
    pub const SINGLE: u8 = 0;
    /// `++----`
    pub const PAIR_ADJACENT: u8 = 1;
    /// `+-+---`
    pub const PAIR_SKIP: u8 = 2;
    /// `+--+--`
    pub const PAIR_OPPOSITE: u8 = 3;
    /// `+++---`
    pub const TRIPLE_RUN: u8 = 4;
    /// `++-+--`
    pub const TRIPLE_HOOK: u8 = 5;
    /// `++--+-`
    pub const TRIPLE_HOOK_MIRRORED: u8 = 6;
    /// `++++--`
    pub const QUAD_RUN: u8 = 7;
    /// `+++-+-`
    pub const QUAD_SPLIT: u8 = 8;
    /// `++-++-`
    pub const QUAD_BRIDGE: u8 = 9;
    /// `-+++++`
    pub const ALL_BUT_ONE: u8 = 10;
    /// `++++++`
    pub const FULL: u8 = 11;
    /// `+-+-+-` (center tile only)
    pub const TRIPLE_ALTERNATING: u8 = 12;

    /// Number of frames in the sprite sheet
    pub const COUNT: u8 = 13;
}

#[derive(Debug, Clone, Copy)]
struct Template {
    mask: SlotMask,
    sprite: u8,
}

const fn t(mask: SlotMask, sprite: u8) -> Template {
    Template { mask, sprite }
}

/// Templates indexed by engaged count, in priority order.
/// Bit `j` of a mask is character `j` of the shape string.
const TEMPLATES: [&[Template]; HEX_SIZE + 1] = [
    &[],
    &[t(0b00_0001, sprite::SINGLE)],
    &[
        t(0b00_0011, sprite::PAIR_ADJACENT),
        t(0b00_0101, sprite::PAIR_SKIP),
        t(0b00_1001, sprite::PAIR_OPPOSITE),
    ],
    &[
        t(0b00_0111, sprite::TRIPLE_RUN),
        t(0b00_1011, sprite::TRIPLE_HOOK),
        t(0b01_0011, sprite::TRIPLE_HOOK_MIRRORED),
        t(0b01_0101, sprite::TRIPLE_ALTERNATING),
    ],
    &[
        t(0b00_1111, sprite::QUAD_RUN),
        t(0b01_0111, sprite::QUAD_SPLIT),
        t(0b01_1011, sprite::QUAD_BRIDGE),
    ],
    &[t(0b11_1110, sprite::ALL_BUT_ONE)],
    &[t(0b11_1111, sprite::FULL)],
];

/// Classification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    /// Sprite frame id (see [`sprite`])
    pub sprite: u8,
    /// Clockwise rotation (0..6) of the canonical template that yields the mask
    pub offset: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("tile has no engaged connectors")]
    NoEngagedSlots,
    #[error("no template matches slot mask {0:#08b}")]
    Unmatched(SlotMask),
}

/// Rotate a 6-bit mask clockwise by `steps` slots (slot `i` moves to `i + steps`)
#[inline]
pub fn rotate_mask(mask: SlotMask, steps: u8) -> SlotMask {
    let steps = steps % HEX_SIZE as u8;
    let mask = mask & FULL_MASK;
    ((mask << steps) | (mask >> (HEX_SIZE as u8 - steps))) & FULL_MASK
}

pub fn slot_mask(slots: &[bool; HEX_SIZE]) -> SlotMask {
    slots
        .iter()
        .enumerate()
        .filter(|&(_, &engaged)| engaged)
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

/// Canonical (offset 0) mask of a sprite frame
pub fn template_mask(sprite: u8) -> Option<SlotMask> {
    TEMPLATES
        .iter()
        .flat_map(|templates| templates.iter())
        .find(|template| template.sprite == sprite)
        .map(|template| template.mask)
}

pub fn classify(slots: &[bool; HEX_SIZE]) -> Result<Pattern, ClassifyError> {
    classify_mask(slot_mask(slots))
}

pub fn classify_mask(mask: SlotMask) -> Result<Pattern, ClassifyError> {
    let mask = mask & FULL_MASK;
    let count = mask.count_ones() as usize;
    if count == 0 {
        return Err(ClassifyError::NoEngagedSlots);
    }

    for template in TEMPLATES[count] {
        if let Some(offset) = (0..HEX_SIZE as u8).find(|&r| rotate_mask(template.mask, r) == mask) {
            return Ok(Pattern {
                sprite: template.sprite,
                offset,
            });
        }
    }
    Err(ClassifyError::Unmatched(mask))
}
