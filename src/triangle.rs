//! Flat-shaded triangle primitive.
//!
//! Uses the Möller–Trumbore test. The determinant must exceed a small positive
//! threshold, so triangles are single sided: only rays arriving against the
//! geometric normal `cross(v1 - v0, v2 - v0)` can hit them.

use glam::Vec3A;

use crate::hittable::{Hittable, RayHit};
use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;

/// Determinants below this are parallel or back-facing.
pub const DETERMINANT_EPSILON: f32 = 1e-3;

/// Triangle with counter-clockwise front face.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Vertices in winding order.
    pub vertices: [Vec3A; 3],
    /// Unit geometric normal of the front face.
    pub normal: Vec3A,
    /// Surface material.
    pub material: Material,
}

impl Triangle {
    /// Create a triangle; the normal follows the winding `v0 -> v1 -> v2`.
    pub fn new(v0: Vec3A, v1: Vec3A, v2: Vec3A, material: Material) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
            material,
        }
    }

    /// Möller–Trumbore intersection returning `(t, u, v)`.
    ///
    /// `t` is not range checked here.
    pub fn intersect(&self, r: &Ray) -> Option<(f32, f32, f32)> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let pvec = r.direction.cross(edge2);
        let det = edge1.dot(pvec);
        if det < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = r.origin - v0;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = r.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some((edge2.dot(qvec) * inv_det, u, v))
    }
}

impl Hittable for Triangle {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        match self.intersect(r) {
            Some((t, _, _)) if ray_t.surrounds(t) => {
                rec.record_surface(r, t, self.normal, &self.material);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit right triangle in the z = -5 plane facing +z.
    fn facing_camera() -> Triangle {
        Triangle::new(
            Vec3A::new(0.0, 0.0, -5.0),
            Vec3A::new(1.0, 0.0, -5.0),
            Vec3A::new(0.0, 1.0, -5.0),
            Material::diffuse(Vec3A::ONE),
        )
    }

    #[test]
    fn test_front_face_hit() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(0.25, 0.25, 0.0), Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = RayHit::none();

        assert!(tri.hit(&ray, Interval::FORWARD, &mut rec));
        assert!((rec.dist - 5.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3A::Z);
    }

    #[test]
    fn test_barycentrics() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(0.25, 0.5, 0.0), Vec3A::new(0.0, 0.0, -1.0));
        let (_, u, v) = tri.intersect(&ray).expect("hit");
        assert!((u - 0.25).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_back_face_is_culled() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(0.25, 0.25, -10.0), Vec3A::Z);
        let mut rec = RayHit::none();

        assert!(!tri.hit(&ray, Interval::FORWARD, &mut rec));
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(-1.0, 0.25, -5.0), Vec3A::X);
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_outside_barycentric_range() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(0.75, 0.75, 0.0), Vec3A::new(0.0, 0.0, -1.0));
        assert!(tri.intersect(&ray).is_none());
    }

    #[test]
    fn test_behind_origin_is_rejected_by_interval() {
        let tri = facing_camera();
        let ray = Ray::new(Vec3A::new(0.25, 0.25, -6.0), Vec3A::new(0.0, 0.0, -1.0));
        let mut rec = RayHit::none();

        // Front-facing orientation but the triangle lies behind the origin
        assert!(!tri.hit(&ray, Interval::FORWARD, &mut rec));
    }
}
