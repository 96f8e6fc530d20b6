//! Plane geometry shared by movement, absorption and spawning.

use glam::DVec2;

/// A circle on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub position: DVec2,
    pub radius: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            radius,
        }
    }

    /// Distance between the two centers.
    #[inline]
    pub fn center_distance(&self, other: &Circle) -> f64 {
        self.position.distance(other.position)
    }

    /// Whether `other` lies entirely inside this circle (touching counts).
    #[inline]
    pub fn encloses(&self, other: &Circle) -> bool {
        self.center_distance(other) + other.radius <= self.radius
    }
}

/// Clamp `value` into `[min, max]`, applying the lower bound first.
///
/// Unlike `f64::clamp` this never panics: when `min > max` the result is
/// `max`.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Move `from` by `delta` and keep the result within `[min, max]`.
#[inline]
pub fn advance_bounded(from: f64, delta: f64, min: f64, max: f64) -> f64 {
    clamp(from + delta, min, max)
}
