//! Ray-object intersection system.
//!
//! Defines the [`Hittable`] trait for geometric primitives and [`RayHit`] for
//! storing the closest intersection found so far.

use glam::Vec3A;

use crate::interval::Interval;
use crate::material::{Color, Material};
use crate::ray::Ray;

/// Ray-object intersection information.
///
/// Starts out as [`RayHit::none`] and is overwritten by every primitive that
/// reports a closer hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the intersection point, -1 when nothing was hit
    pub dist: f32,
    /// Point where the ray intersects the object
    pub pos: Vec3A,
    /// Surface normal at the intersection point (unit vector)
    pub normal: Vec3A,
    /// Diffuse reflectance at the hit point
    pub albedo: Color,
    /// Specular reflectance at the hit point
    pub specular: Color,
    /// Specular lobe glossiness
    pub smoothness: f32,
    /// Emitted radiance
    pub emission: Color,
    /// True if the ray left the scene through the room shell
    pub skybox: bool,
}

impl RayHit {
    /// The "nothing hit yet" record.
    pub fn none() -> Self {
        Self {
            dist: -1.0,
            pos: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            albedo: Vec3A::ZERO,
            specular: Vec3A::ZERO,
            smoothness: 0.0,
            emission: Vec3A::ZERO,
            skybox: false,
        }
    }

    /// True if some primitive reported a hit.
    pub fn is_hit(&self) -> bool {
        self.dist >= 0.0
    }

    /// Fill the record with an object hit at distance `t`.
    pub fn record_surface(&mut self, r: &Ray, t: f32, normal: Vec3A, material: &Material) {
        self.dist = t;
        self.pos = r.at(t);
        self.normal = normal;
        self.albedo = material.albedo;
        self.specular = material.specular;
        self.smoothness = material.smoothness;
        self.emission = material.emission;
        self.skybox = false;
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::none()
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) since every scanline worker traces
/// against the same scene.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection strictly inside the given parameter range.
    ///
    /// Returns true if hit, updating the hit record with intersection details.
    /// Implementations never touch `rec` when they return false.
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_not_a_hit() {
        let hit = RayHit::none();
        assert!(!hit.is_hit());
        assert!(!hit.skybox);
        assert_eq!(hit.dist, -1.0);
    }

    #[test]
    fn test_record_surface_copies_material() {
        let mut hit = RayHit::none();
        let material = Material::new(Vec3A::ONE, Vec3A::splat(0.5), 0.3, Vec3A::X);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::Z);
        hit.record_surface(&ray, 2.0, -Vec3A::Z, &material);

        assert_eq!(hit.dist, 2.0);
        assert_eq!(hit.pos, Vec3A::new(0.0, 0.0, 2.0));
        assert!(hit.is_hit());
        assert_eq!(hit.albedo, material.albedo);
        assert_eq!(hit.specular, material.specular);
        assert_eq!(hit.smoothness, material.smoothness);
        assert_eq!(hit.emission, material.emission);
        assert!(!hit.skybox);
    }
}
