//! Fixed puzzle topology and random link generation
//!
//! Ring tile `i` sits at angle `π/2 − i·π/3` around the center. Slot `j` of
//! every tile faces the same direction, so slot `j` of the center faces ring
//! tile `j` and opposite slots always differ by three.
//!
//! Links:
//! - `2i` joins ring tiles `(i + 5) % 6` and `i`
//! - `2i + 1` joins ring tile `i` and the center

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use crate::consts::*;
use crate::polar_to_cartesian;

/// Endpoint tiles `(a, b)` of every link
pub const LINK_TO_HEX: [(usize, usize); NUM_LINKS] = [
    (5, 0),
    (0, CENTER_HEX),
    (0, 1),
    (1, CENTER_HEX),
    (1, 2),
    (2, CENTER_HEX),
    (2, 3),
    (3, CENTER_HEX),
    (3, 4),
    (4, CENTER_HEX),
    (4, 5),
    (5, CENTER_HEX),
];

/// Link bound to each slot of each tile (`None` = faces outward)
pub const LINK_SLOTS: [[Option<usize>; HEX_SIZE]; NUM_HEX] = [
    [None, None, Some(2), Some(1), Some(0), None],
    [None, None, None, Some(4), Some(3), Some(2)],
    [Some(4), None, None, None, Some(6), Some(5)],
    [Some(7), Some(6), None, None, None, Some(8)],
    [Some(10), Some(9), Some(8), None, None, None],
    [None, Some(0), Some(11), Some(10), None, None],
    [Some(1), Some(3), Some(5), Some(7), Some(9), Some(11)],
];

/// Link each ring tile is forced onto when it cannot reach the center: its
/// own spoke, whose other endpoint is the center itself.
pub const REPAIR_LINK: [usize; RING_SIZE] = [1, 3, 5, 7, 9, 11];

/// Links owned by a tile (3 for ring tiles, 6 for the center)
pub fn owned_links(hex: usize) -> impl Iterator<Item = usize> {
    LINK_SLOTS[hex].into_iter().flatten()
}

/// World-space anchor of every tile on the z = 0 plane
pub fn anchor_positions(spacing: f32) -> [Vec3; NUM_HEX] {
    std::array::from_fn(|hex| {
        if hex == CENTER_HEX {
            Vec3::ZERO
        } else {
            polar_to_cartesian(spacing, slot_angle(hex)).extend(0.0)
        }
    })
}

/// Direction slot `slot` faces, in radians
#[inline]
pub fn slot_angle(slot: usize) -> f32 {
    FRAC_PI_2 - slot as f32 * FRAC_PI_3
}

/// Draw the provisional link states: each link engaged with p = 0.5
pub fn random_links<R: Rng + ?Sized>(rng: &mut R) -> [bool; NUM_LINKS] {
    std::array::from_fn(|_| rng.random_bool(0.5))
}

/// Force one uniformly chosen link on for every tile that has none
pub fn ensure_every_hex_linked<R: Rng + ?Sized>(links: &mut [bool; NUM_LINKS], rng: &mut R) {
    for hex in 0..NUM_HEX {
        let owned: Vec<usize> = owned_links(hex).collect();
        if owned.iter().any(|&link| links[link]) {
            continue;
        }
        let link = owned[rng.random_range(0..owned.len())];
        log::debug!("Tile {} isolated, engaging link {}", hex, link);
        links[link] = true;
    }
}

/// Tiles reachable from the center over engaged links
pub fn reachable_from_center(links: &[bool; NUM_LINKS]) -> [bool; NUM_HEX] {
    let mut seen = [false; NUM_HEX];
    let mut stack = vec![CENTER_HEX];
    seen[CENTER_HEX] = true;

    while let Some(hex) = stack.pop() {
        for link in owned_links(hex).filter(|&link| links[link]) {
            let (a, b) = LINK_TO_HEX[link];
            let next = if a == hex { b } else { a };
            if !seen[next] {
                seen[next] = true;
                stack.push(next);
            }
        }
    }
    seen
}

/// Engage the repair link of every ring tile the center cannot reach.
///
/// The repair link ends at the center, so each repaired tile is one hop from
/// it and no second traversal is needed.
pub fn connect_to_center(links: &mut [bool; NUM_LINKS]) {
    let reached = reachable_from_center(links);
    for (hex, &link) in REPAIR_LINK.iter().enumerate() {
        if !reached[hex] {
            log::debug!("Tile {} unreachable, engaging spoke {}", hex, link);
            links[link] = true;
        }
    }
}

/// Random link layout where every tile is engaged and reachable from the center
pub fn generate_links<R: Rng + ?Sized>(rng: &mut R) -> [bool; NUM_LINKS] {
    let mut links = random_links(rng);
    ensure_every_hex_linked(&mut links, rng);
    connect_to_center(&mut links);
    links
}
