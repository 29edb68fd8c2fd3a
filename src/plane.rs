//! Infinite plane primitive (the ground).

use glam::Vec3A;

use crate::hittable::{Hittable, RayHit};
use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Hits closer than this are treated as the surface the ray just left.
pub const PLANE_T_MIN: f32 = 0.1;

/// Directions this close to parallel never hit the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Plane through `point` with unit `normal`.
///
/// Hits are accepted from both sides; the stored normal is always reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3A,
    /// Unit normal reported for every hit.
    pub normal: Vec3A,
    /// Surface material.
    pub material: Material,
}

impl Plane {
    /// Create a plane; the normal is normalized.
    pub fn new(point: Vec3A, normal: Vec3A, material: Material) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            material,
        }
    }

    /// Horizontal ground plane at height `y` facing up.
    pub fn ground(y: f32, material: Material) -> Self {
        Self::new(Vec3A::new(0.0, y, 0.0), Vec3A::Y, material)
    }
}

impl Hittable for Plane {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        let denom = self.normal.dot(r.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.point - r.origin).dot(self.normal) / denom;
        if !ray_t.with_floor(PLANE_T_MIN).surrounds(t) {
            return false;
        }

        rec.record_surface(r, t, self.normal, &self.material);
        true
    }
}
