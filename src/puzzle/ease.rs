//! Time-parameterized easing
//!
//! An easing maps a query time onto a value between `from` and `to` over the
//! window `[start, end]`. Starting a new animation on a track simply replaces
//! its `Ease`; nothing is queued.
//!
//! A degenerate window (`end <= start`) always reports the start value.

use glam::{FloatExt, Vec3};
use serde::{Deserialize, Serialize};

/// Values that can be interpolated by an [`Ease`]
pub trait Interpolate: Copy {
    fn interpolate(self, other: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn interpolate(self, other: Self, t: f32) -> Self {
        FloatExt::lerp(self, other, t)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

/// Remapping applied to the normalized time before interpolating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EaseLaw {
    Linear,
    /// `t²(3 − 2t)`
    Smooth,
    /// `t^p`; exponents at or below zero are clamped to the smallest positive `f32`
    Power(f32),
}

impl EaseLaw {
    #[inline]
    pub fn remap(self, t: f32) -> f32 {
        match self {
            EaseLaw::Linear => t,
            EaseLaw::Smooth => t * t * (3.0 - 2.0 * t),
            EaseLaw::Power(p) => t.powf(p.max(f32::MIN_POSITIVE)),
        }
    }
}

/// Fraction of `[start, end]` elapsed at `now`, clamped to `[0, 1]`
#[inline]
pub fn progress(now: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if !(span > 0.0) {
        return 0.0;
    }
    ((now - start) / span).clamp(0.0, 1.0)
}

/// A single animation track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ease<T> {
    pub from: T,
    pub to: T,
    pub start: f32,
    pub end: f32,
}

pub type EaseScalar = Ease<f32>;
pub type EaseVec3 = Ease<Vec3>;

impl<T: Interpolate> Ease<T> {
    pub fn new(from: T, to: T, start: f32, end: f32) -> Self {
        Self {
            from,
            to,
            start,
            end,
        }
    }

    /// Ease starting at `start` and lasting `duration` seconds
    pub fn over(from: T, to: T, start: f32, duration: f32) -> Self {
        Self::new(from, to, start, start + duration)
    }

    /// A track resting at `value` (no animation in progress)
    pub fn constant(value: T) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    pub fn sample(&self, now: f32, law: EaseLaw) -> T {
        let t = law.remap(progress(now, self.start, self.end));
        self.from.interpolate(self.to, t)
    }

    pub fn linear(&self, now: f32) -> T {
        self.sample(now, EaseLaw::Linear)
    }

    pub fn smooth(&self, now: f32) -> T {
        self.sample(now, EaseLaw::Smooth)
    }

    pub fn power(&self, now: f32, power: f32) -> T {
        self.sample(now, EaseLaw::Power(power))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_boundaries() {
        let ease = EaseScalar::new(2.0, 10.0, 1.0, 3.0);
        assert_eq!(ease.linear(1.0), 2.0);
        assert_eq!(ease.linear(3.0), 10.0);
        for p in [0.5, 2.0, 3.0] {
            assert_eq!(ease.power(1.0, p), ease.linear(1.0));
            assert_eq!(ease.power(3.0, p), ease.linear(3.0));
        }
        assert_eq!(ease.smooth(1.0), ease.linear(1.0));
        assert_eq!(ease.smooth(3.0), ease.linear(3.0));
    }

    #[test]
    fn test_non_positive_power_keeps_boundaries() {
        let ease = EaseScalar::new(2.0, 10.0, 1.0, 3.0);
        for p in [0.0, -1.0, -3.5] {
            assert_eq!(ease.power(1.0, p), 2.0);
            assert_eq!(ease.power(3.0, p), 10.0);
            assert!(ease.power(2.0, p).is_finite());
        }
    }

    #[test]
    fn test_clamped_outside_window() {
        let ease = EaseScalar::new(0.0, 1.0, 5.0, 6.0);
        assert_eq!(ease.linear(0.0), 0.0);
        assert_eq!(ease.linear(100.0), 1.0);
        assert_eq!(ease.smooth(-3.0), 0.0);
    }

    #[test]
    fn test_midpoints() {
        let ease = EaseScalar::new(0.0, 1.0, 0.0, 1.0);
        assert!(approx(ease.linear(0.25), 0.25));
        assert!(approx(ease.smooth(0.5), 0.5));
        assert!(approx(ease.smooth(0.25), 0.15625));
        assert!(approx(ease.power(0.5, 2.0), 0.25));
    }

    #[test]
    fn test_degenerate_window_reports_start_value() {
        let ease = EaseScalar::new(3.0, 7.0, 2.0, 2.0);
        for now in [0.0, 2.0, 9.0] {
            assert_eq!(ease.linear(now), 3.0);
            assert_eq!(ease.smooth(now), 3.0);
            assert_eq!(ease.power(now, 2.0), 3.0);
            assert_eq!(ease.power(now, 3.0), 3.0);
        }
    }

    #[test]
    fn test_vector_is_component_wise() {
        let ease = EaseVec3::over(Vec3::ZERO, Vec3::new(2.0, -4.0, 8.0), 0.0, 2.0);
        let mid = ease.linear(1.0);
        assert!(mid.abs_diff_eq(Vec3::new(1.0, -2.0, 4.0), 1e-5));
        let smooth = ease.smooth(0.5);
        let s = FloatExt::lerp(ease.from.x, ease.to.x, EaseLaw::Smooth.remap(0.25));
        assert!(approx(smooth.x, s));
    }

    #[test]
    fn test_replacing_track_overrides_immediately() {
        let mut track = EaseScalar::over(0.0, 1.0, 0.0, 1.0);
        assert!(approx(track.linear(0.5), 0.5));
        track = EaseScalar::over(track.linear(0.5), -1.0, 0.5, 1.0);
        assert!(approx(track.linear(0.5), 0.5));
        assert!(approx(track.linear(1.5), -1.0));
    }
}
