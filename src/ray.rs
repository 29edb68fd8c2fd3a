//! Ray representation for path construction.
//!
//! A ray is defined as r(t) = origin + t * direction and additionally carries
//! the throughput ("energy") of the light path it belongs to.

use glam::Vec3A;

/// Ray in 3D space with the accumulated path throughput.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera position for primary rays, or a point slightly above the
    /// surface for bounced rays.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized, but every direction produced by the
    /// camera or by hemisphere sampling is unit length.
    pub direction: Vec3A,

    /// Per-channel throughput, attenuated multiplicatively at every bounce.
    ///
    /// A throughput of exactly zero in all channels terminates the path.
    pub energy: Vec3A,
}

impl Ray {
    /// Create a new ray with full throughput.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction,
            energy: Vec3A::ONE,
        }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// True once every channel of the throughput is exactly zero.
    pub fn is_extinguished(&self) -> bool {
        self.energy == Vec3A::ZERO
    }
}
