//! Puzzle state: links, tiles, selection and presentation tracks
//!
//! `link_status` is the single source of truth for "solved": every link keeps
//! the value read at each of its two endpoint tiles, and the puzzle is solved
//! when every pair agrees.

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ease::EaseScalar;
use super::hex::{Hex, LinkReading, Spin};
use super::layout::{self, LINK_SLOTS, LINK_TO_HEX};
use super::pattern::ClassifyError;
use super::ray::Ray;
use crate::config::PuzzleConfig;
use crate::consts::*;

/// Re-scrambles allowed when a scramble happens to leave the puzzle solved
const MAX_SCRAMBLES: u32 = 8;

/// Readings of one link from its two endpoint tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkStatus {
    /// Reading at `LINK_TO_HEX[link].0`
    pub from_a: bool,
    /// Reading at `LINK_TO_HEX[link].1`
    pub from_b: bool,
}

impl LinkStatus {
    pub fn agreed(value: bool) -> Self {
        Self {
            from_a: value,
            from_b: value,
        }
    }

    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.from_a == self.from_b
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawState {
    pub transforms: [Mat4; NUM_HEX],
    pub sprites: [u8; NUM_HEX],
    /// Cyclic offset of each sprite against its canonical template
    pub sprite_offsets: [u8; NUM_HEX],
    pub highlight: Option<usize>,
    pub pulse: f32,
    pub alpha: f32,
    pub solved: bool,
}

/// One round's puzzle instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackingPuzzle {
    /// Generated link values (the solution)
    links: [bool; NUM_LINKS],
    /// Always `NUM_HEX` tiles, index = tile id
    hexes: Vec<Hex>,
    link_status: [LinkStatus; NUM_LINKS],
    anchors: [Vec3; NUM_HEX],
    highlighted: Option<usize>,
    ping: EaseScalar,
    alpha: EaseScalar,
    locked_at: Option<f32>,
    config: PuzzleConfig,
}

impl HackingPuzzle {
    /// Generate a random, connected, scrambled puzzle
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &PuzzleConfig) -> Self {
        let links = layout::generate_links(rng);
        let mut puzzle = Self::from_links(links, config)
            .unwrap_or_else(|err| panic!("generated link layout {links:?} is invalid: {err}"));
        for attempt in 1..=MAX_SCRAMBLES {
            puzzle.scramble(rng);
            if !puzzle.is_solved() {
                break;
            }
            log::debug!("Scramble {} left the puzzle solved, rolling again", attempt);
        }
        log::debug!(
            "Generated puzzle: links={:?} offsets={:?}",
            links,
            puzzle.hexes.iter().map(Hex::rotation_offset).collect::<Vec<_>>()
        );
        puzzle
    }

    /// Generate from a fixed seed
    pub fn from_seed(seed: u64, config: &PuzzleConfig) -> Self {
        Self::generate(&mut Pcg32::seed_from_u64(seed), config)
    }

    /// Unscrambled puzzle for the given link values (already solved)
    pub fn from_links(links: [bool; NUM_LINKS], config: &PuzzleConfig) -> Result<Self, ClassifyError> {
        let hexes = (0..NUM_HEX)
            .map(|id| Hex::new(id, LINK_SLOTS[id], &links))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            links,
            hexes,
            link_status: links.map(LinkStatus::agreed),
            anchors: layout::anchor_positions(config.tile_spacing),
            highlighted: None,
            ping: EaseScalar::constant(0.0),
            alpha: EaseScalar::constant(1.0),
            locked_at: None,
            config: config.clone(),
        })
    }

    /// Spin every tile clockwise a uniform 0..6 times, then settle its animation
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for id in 0..NUM_HEX {
            let turns = rng.random_range(0..HEX_SIZE);
            for _ in 0..turns {
                let readings = self.hexes[id].rotate_clockwise();
                self.record(id, &readings);
            }
            self.hexes[id].settle();
        }
    }

    /// Store one tile's readings in `link_status`
    fn record(&mut self, hex: usize, readings: &[LinkReading]) {
        for &(link, value) in readings {
            let (a, b) = LINK_TO_HEX[link];
            let status = &mut self.link_status[link];
            if hex == a {
                status.from_a = value;
            } else if hex == b {
                status.from_b = value;
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        self.link_status.iter().all(LinkStatus::is_consistent)
    }

    pub fn links(&self) -> &[bool; NUM_LINKS] {
        &self.links
    }

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn link_status(&self) -> &[LinkStatus; NUM_LINKS] {
        &self.link_status
    }

    pub fn anchor(&self, hex: usize) -> Vec3 {
        self.anchors[hex]
    }

    /// Clockwise clicks per tile that restore the generated orientation
    pub fn hint(&self) -> [u8; NUM_HEX] {
        std::array::from_fn(|id| (HEX_SIZE as u8 - self.hexes[id].rotation_offset()) % HEX_SIZE as u8)
    }

    // === Interaction ===

    /// Select the tile whose anchor is nearest the ray's hit on the puzzle plane
    pub fn highlight(&mut self, ray: &Ray, _now: f32) {
        let target = if self.is_locked() {
            None
        } else {
            ray.intersect_puzzle_plane().and_then(|hit| self.nearest_anchor(hit))
        };
        self.select(target);
    }

    fn nearest_anchor(&self, hit: Vec3) -> Option<usize> {
        let (hex, distance) = self
            .anchors
            .iter()
            .map(|anchor| anchor.truncate().distance(hit.truncate()))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
        (distance <= self.config.highlight_radius).then_some(hex)
    }

    /// Changing the selection resets the click pulse
    fn select(&mut self, target: Option<usize>) {
        if target != self.highlighted {
            self.highlighted = target;
            self.ping = EaseScalar::constant(0.0);
        }
    }

    /// Rotate the selected tile clockwise. Returns whether a tile turned.
    pub fn left_click(&mut self, now: f32) -> bool {
        self.click(Spin::Clockwise, now)
    }

    /// Rotate the selected tile counter-clockwise. Returns whether a tile turned.
    pub fn right_click(&mut self, now: f32) -> bool {
        self.click(Spin::CounterClockwise, now)
    }

    fn click(&mut self, spin: Spin, now: f32) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(hex) = self.highlighted else {
            return false;
        };
        self.rotate_hex(hex, spin, now);
        self.start_click_ping(now);
        true
    }

    /// Turn a tile: the link state changes immediately, the animation follows
    pub fn rotate_hex(&mut self, hex: usize, spin: Spin, now: f32) {
        let duration = self.config.rotate_duration;
        let tile = &mut self.hexes[hex];
        tile.begin_rotate_animation(spin, now, duration);
        let readings = tile.rotate(spin);
        log::trace!("Hex {} turned {:?}, offset now {}", tile.id(), spin, tile.rotation_offset());
        self.record(hex, &readings);
    }

    pub fn start_click_ping(&mut self, now: f32) {
        self.ping = EaseScalar::over(0.0, 1.0, now, self.config.ping_duration);
    }

    /// Refuse further rotations; the win animation plays out from here
    pub fn lock_interaction(&mut self, now: f32) {
        if self.locked_at.is_none() {
            log::debug!("Puzzle locked at {:.2}s", now);
            self.locked_at = Some(now);
        }
        self.highlighted = None;
    }

    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// True once the win animation has run its course after the lock
    pub fn is_finished(&self, now: f32) -> bool {
        self.locked_at
            .is_some_and(|locked_at| now >= locked_at + self.config.win_duration)
    }

    /// Scatter every tile outward along its anchor vector and fade out
    pub fn start_win_animation(&mut self, now: f32) {
        let duration = self.config.win_duration;
        for (hex, anchor) in self.hexes.iter_mut().zip(self.anchors) {
            let from = hex.current_offset(now);
            hex.begin_offset_animation(now, from, anchor * self.config.scatter_scale, duration);
        }
        self.alpha = EaseScalar::over(self.alpha.linear(now), 0.0, now, duration);
    }

    /// Gather every tile in from its scattered position and fade in
    pub fn start_intro_animation(&mut self, now: f32) {
        let duration = self.config.intro_duration;
        for (hex, anchor) in self.hexes.iter_mut().zip(self.anchors) {
            hex.begin_offset_animation(now, anchor * self.config.scatter_scale, Vec3::ZERO, duration);
        }
        self.alpha = EaseScalar::over(0.0, 1.0, now, duration);
    }

    // === Draw state ===

    pub fn draw_transforms(&self, now: f32) -> [Mat4; NUM_HEX] {
        std::array::from_fn(|id| {
            let hex = &self.hexes[id];
            Mat4::from_rotation_translation(
                Quat::from_rotation_z(hex.current_angle(now)),
                self.anchors[id] + hex.current_offset(now),
            )
        })
    }

    pub fn draw_sprite_indices(&self) -> [u8; NUM_HEX] {
        std::array::from_fn(|id| self.hexes[id].sprite())
    }

    pub fn draw_sprite_offsets(&self) -> [u8; NUM_HEX] {
        std::array::from_fn(|id| self.hexes[id].pattern_offset())
    }

    pub fn draw_highlight_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn draw_click_pulse(&self, now: f32) -> f32 {
        self.ping.linear(now)
    }

    pub fn draw_alpha(&self, now: f32) -> f32 {
        self.alpha.linear(now)
    }

    pub fn draw_state(&self, now: f32) -> DrawState {
        DrawState {
            transforms: self.draw_transforms(now),
            sprites: self.draw_sprite_indices(),
            sprite_offsets: self.draw_sprite_offsets(),
            highlight: self.draw_highlight_index(),
            pulse: self.draw_click_pulse(now),
            alpha: self.draw_alpha(now),
            solved: self.is_solved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> PuzzleConfig {
        PuzzleConfig::default()
    }

    fn odd_links() -> [bool; NUM_LINKS] {
        std::array::from_fn(|link| link % 2 == 1)
    }

    /// Ray straight down onto the puzzle plane at `point`
    fn ray_at(point: Vec3) -> Ray {
        Ray::new(point + Vec3::Z * 5.0, Vec3::NEG_Z)
    }

    fn assert_link_status_matches_tiles(puzzle: &HackingPuzzle) {
        for (link, &(a, b)) in LINK_TO_HEX.iter().enumerate() {
            let status = puzzle.link_status()[link];
            assert_eq!(Some(status.from_a), puzzle.hexes()[a].reading(link), "link {link}");
            assert_eq!(Some(status.from_b), puzzle.hexes()[b].reading(link), "link {link}");
        }
    }

    #[test]
    fn test_unscrambled_is_solved() {
        let puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        assert!(puzzle.is_solved());
        assert_link_status_matches_tiles(&puzzle);
    }

    #[test]
    fn test_single_rotation_breaks_solution() {
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        puzzle.rotate_hex(0, Spin::Clockwise, 0.0);
        assert!(!puzzle.is_solved());
        assert!(!puzzle.link_status()[1].is_consistent());
        assert!(!puzzle.link_status()[0].is_consistent());
        assert_link_status_matches_tiles(&puzzle);

        puzzle.rotate_hex(0, Spin::CounterClockwise, 0.1);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_symmetric_rotation_keeps_solution() {
        // The center shows all six spokes, so turning it changes nothing
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        puzzle.rotate_hex(CENTER_HEX, Spin::Clockwise, 0.0);
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_degenerate_links_rejected() {
        assert_eq!(
            HackingPuzzle::from_links([false; NUM_LINKS], &config()).unwrap_err(),
            ClassifyError::NoEngagedSlots
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = HackingPuzzle::from_seed(42, &config());
        let b = HackingPuzzle::from_seed(42, &config());
        assert_eq!(a.links(), b.links());
        assert_eq!(a.link_status(), b.link_status());
        assert_eq!(a.draw_sprite_indices(), b.draw_sprite_indices());
        assert_eq!(a.hint(), b.hint());
    }

    #[test]
    fn test_hint_solves() {
        let mut puzzle = HackingPuzzle::from_seed(7, &config());
        for (hex, clicks) in puzzle.hint().into_iter().enumerate() {
            for _ in 0..clicks {
                puzzle.rotate_hex(hex, Spin::Clockwise, 0.0);
            }
        }
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.hint(), [0; NUM_HEX]);
    }

    #[test]
    fn test_highlight_anchor_and_miss() {
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        let anchor = puzzle.anchor(3);
        puzzle.highlight(&ray_at(anchor), 0.0);
        assert_eq!(puzzle.draw_highlight_index(), Some(3));

        puzzle.highlight(&ray_at(Vec3::ZERO), 0.0);
        assert_eq!(puzzle.draw_highlight_index(), Some(CENTER_HEX));

        puzzle.highlight(&ray_at(Vec3::new(10.0, 10.0, 0.0)), 0.0);
        assert_eq!(puzzle.draw_highlight_index(), None);

        // Parallel ray
        puzzle.highlight(&Ray::new(Vec3::Z, Vec3::X), 0.0);
        assert_eq!(puzzle.draw_highlight_index(), None);
    }

    #[test]
    fn test_click_without_selection_is_noop() {
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        assert!(!puzzle.left_click(0.0));
        assert!(!puzzle.right_click(0.0));
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_click_rotates_and_pings() {
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        puzzle.highlight(&ray_at(puzzle.anchor(2)), 0.0);
        assert!(puzzle.left_click(1.0));
        assert_eq!(puzzle.hexes()[2].rotation_offset(), 1);
        assert!(!puzzle.is_solved());
        assert_eq!(puzzle.draw_click_pulse(1.0), 0.0);
        assert_eq!(puzzle.draw_click_pulse(5.0), 1.0);

        assert!(puzzle.right_click(1.05));
        assert_eq!(puzzle.hexes()[2].rotation_offset(), 0);
        assert!(puzzle.is_solved());

        // Moving to another tile resets the pulse
        puzzle.highlight(&ray_at(puzzle.anchor(4)), 6.0);
        assert_eq!(puzzle.draw_click_pulse(6.0), 0.0);
    }

    #[test]
    fn test_lock_blocks_rotation() {
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config()).unwrap();
        puzzle.highlight(&ray_at(puzzle.anchor(1)), 0.0);
        puzzle.lock_interaction(1.0);
        assert_eq!(puzzle.draw_highlight_index(), None);
        puzzle.highlight(&ray_at(puzzle.anchor(1)), 1.1);
        assert_eq!(puzzle.draw_highlight_index(), None);
        assert!(!puzzle.left_click(1.2));
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_win_animation_scatters_and_finishes() {
        let config = config();
        let mut puzzle = HackingPuzzle::from_links(odd_links(), &config).unwrap();
        puzzle.lock_interaction(2.0);
        puzzle.start_win_animation(2.0);
        assert!(!puzzle.is_finished(2.5));
        assert!(puzzle.is_finished(2.0 + config.win_duration));

        let end = 2.0 + config.win_duration;
        let transforms = puzzle.draw_transforms(end);
        for hex in 0..NUM_HEX {
            let expected = puzzle.anchor(hex) * (1.0 + config.scatter_scale);
            assert!(transforms[hex].w_axis.truncate().abs_diff_eq(expected, 1e-4));
        }
        assert_eq!(puzzle.draw_alpha(2.0), 1.0);
        assert_eq!(puzzle.draw_alpha(end), 0.0);
        // Presentational only
        assert!(puzzle.is_solved());
    }

    #[test]
    fn test_intro_animation_gathers() {
        let config = config();
        let mut puzzle = HackingPuzzle::from_seed(11, &config);
        puzzle.start_intro_animation(0.0);
        let start = puzzle.draw_transforms(0.0);
        let end = puzzle.draw_transforms(config.intro_duration);
        for hex in 0..NUM_HEX {
            let anchor = puzzle.anchor(hex);
            assert!(start[hex].w_axis.truncate().abs_diff_eq(anchor * (1.0 + config.scatter_scale), 1e-4));
            assert!(end[hex].w_axis.truncate().abs_diff_eq(anchor, 1e-4));
        }
        assert_eq!(puzzle.draw_alpha(0.0), 0.0);
        assert_eq!(puzzle.draw_alpha(config.intro_duration), 1.0);
    }

    #[test]
    fn test_draw_state_snapshot() {
        let puzzle = HackingPuzzle::from_seed(5, &config());
        let state = puzzle.draw_state(0.0);
        assert_eq!(state.sprites, puzzle.draw_sprite_indices());
        for hex in 0..NUM_HEX {
            assert_eq!(state.sprite_offsets[hex], puzzle.hexes()[hex].pattern_offset());
        }
        assert_eq!(state.highlight, None);
        assert_eq!(state.solved, puzzle.is_solved());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"sprites\""));
    }

    #[test]
    fn test_generated_tiles_rest_at_scrambled_angle() {
        let mut turned = 0;
        for seed in 0..32 {
            let puzzle = HackingPuzzle::from_seed(seed, &config());
            for (id, hex) in puzzle.hexes().iter().enumerate() {
                assert_eq!(hex.id(), id);
                if hex.rotation_offset() != 0 {
                    turned += 1;
                }
                for now in [0.0, 0.1, 1.0, 100.0] {
                    assert_eq!(hex.current_angle(now), hex.rest_angle(), "seed {seed} hex {id}");
                    assert_eq!(hex.current_offset(now), Vec3::ZERO, "seed {seed} hex {id}");
                }
            }
        }
        // Otherwise the angle check above never sees a scrambled tile
        assert!(turned > 0);
    }

    #[test]
    fn test_generated_puzzle_starts_unsolved() {
        for seed in 0..20_000 {
            let puzzle = HackingPuzzle::from_seed(seed, &config());
            assert!(!puzzle.is_solved(), "seed {seed}");
            assert_link_status_matches_tiles(&puzzle);
        }
    }

    proptest! {
        #[test]
        fn prop_generated_puzzle_invariants(seed in any::<u64>()) {
            let puzzle = HackingPuzzle::from_seed(seed, &config());
            prop_assert_eq!(puzzle.hexes().len(), NUM_HEX);
            prop_assert!(layout::reachable_from_center(puzzle.links()).iter().all(|&r| r));
            for hex in 0..NUM_HEX {
                prop_assert!(layout::owned_links(hex).any(|link| puzzle.links()[link]));
            }
            for (link, &(a, b)) in LINK_TO_HEX.iter().enumerate() {
                let status = puzzle.link_status()[link];
                prop_assert_eq!(Some(status.from_a), puzzle.hexes()[a].reading(link));
                prop_assert_eq!(Some(status.from_b), puzzle.hexes()[b].reading(link));
            }
        }

        #[test]
        fn prop_link_status_tracks_rotations(
            seed in any::<u64>(),
            moves in prop::collection::vec((0..NUM_HEX, any::<bool>()), 0..40),
        ) {
            let mut puzzle = HackingPuzzle::from_seed(seed, &config());
            for (i, &(hex, clockwise)) in moves.iter().enumerate() {
                let spin = if clockwise { Spin::Clockwise } else { Spin::CounterClockwise };
                puzzle.rotate_hex(hex, spin, i as f32 * 0.05);
            }
            for (link, &(a, b)) in LINK_TO_HEX.iter().enumerate() {
                let status = puzzle.link_status()[link];
                prop_assert_eq!(Some(status.from_a), puzzle.hexes()[a].reading(link));
                prop_assert_eq!(Some(status.from_b), puzzle.hexes()[b].reading(link));
            }
            // A turn there and back leaves every reading unchanged
            let before = *puzzle.link_status();
            for &(hex, clockwise) in &moves {
                let spin = if clockwise { Spin::Clockwise } else { Spin::CounterClockwise };
                puzzle.rotate_hex(hex, spin, 10.0);
                puzzle.rotate_hex(hex, spin.reversed(), 10.0);
            }
            prop_assert_eq!(&before, puzzle.link_status());
        }
    }
}
