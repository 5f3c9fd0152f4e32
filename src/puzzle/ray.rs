//! Ray casting against the puzzle plane

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rays not facing a plane by at least this much never hit it
const PARALLEL_EPSILON: f32 = 1e-6;

/// A world-space ray, already in the puzzle's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Hit point with the plane through `point` with normal `normal`.
    ///
    /// Only the front face (the side `normal` points to) can be hit. `None`
    /// when the ray is parallel to the plane, approaches it from behind, or
    /// the plane lies behind the origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<Vec3> {
        let denom = normal.dot(self.direction);
        if denom > -PARALLEL_EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then(|| self.at(t))
    }

    /// Hit point with the z = 0 plane holding the tiles
    pub fn intersect_puzzle_plane(&self) -> Option<Vec3> {
        self.intersect_plane(Vec3::ZERO, Vec3::Z)
    }
}
