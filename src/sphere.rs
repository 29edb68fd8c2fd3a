//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection using the half-b quadratic formula.

use glam::Vec3A;

use crate::hittable::{Hittable, RayHit};
use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Roots closer than this are treated as the surface the ray just left.
pub const SPHERE_T_MIN: f32 = 0.1;

/// Sphere primitive defined by center, radius, and material.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere (always non-negative).
    ///
    /// Negative radius values are clamped to 0.0 in the constructor.
    pub radius: f32,

    /// Material properties determining light interaction.
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Negative radius values are clamped to 0.0.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        let ray_t = ray_t.with_floor(SPHERE_T_MIN);

        // Vector from ray origin to sphere center
        let oc = self.center - r.origin;

        let a = r.direction.length_squared();
        if a == 0.0 {
            return false;
        }
        let h = r.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        // Purely imaginary roots: the ray misses
        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest positive root; the floor applies to it alone
        let near = (h - sqrtd) / a;
        let root = if near > 0.0 { near } else { (h + sqrtd) / a };
        if !ray_t.surrounds(root) {
            return false;
        }

        let outward_normal = (r.at(root) - self.center).normalize_or_zero();
        rec.record_surface(r, root, outward_normal, &self.material);

        true
    }
}
