//! Interval arithmetic for ray parameter ranges.
//!
//! The closest-hit search narrows an open interval `(min, closest_so_far)`
//! as primitives report hits.

/// Interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Everything in front of the ray origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with the lower bound raised to at least `floor`.
    ///
    /// Primitives use this to apply their own self-intersection epsilon.
    pub fn with_floor(&self, floor: f32) -> Self {
        Self {
            min: self.min.max(floor),
            max: self.max,
        }
    }
}
