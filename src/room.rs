//! Axis-aligned room shell acting as the skybox.
//!
//! Six planes bound a cube centred at the origin. A ray that reaches the shell
//! has escaped the scene: the hit is flagged `skybox` and carries ambient
//! emission instead of object shading data.

use glam::Vec3A;

use crate::hittable::{Hittable, RayHit};
use crate::interval::Interval;
use crate::material::Color;
use crate::ray::Ray;

/// Hits closer than this are ignored.
pub const ROOM_T_MIN: f32 = 1e-4;

/// Direction components smaller than this never reach a face on that axis.
const AXIS_EPSILON: f32 = 1e-4;

/// Distance reported when no face is reachable (degenerate direction).
pub const ROOM_FALLBACK_DIST: f32 = 1e7;

/// Cube of half extent `half_extent` centred at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomShell {
    /// Distance from the origin to each face.
    pub half_extent: f32,
    /// Ambient radiance of escaped rays.
    pub emission: Color,
    /// Throughput multiplier for escaped rays; zero ends the path.
    pub albedo: Color,
}

impl RoomShell {
    /// Create a shell with the given ambient emission and black albedo.
    pub fn new(half_extent: f32, emission: Color) -> Self {
        Self {
            half_extent,
            emission,
            albedo: Vec3A::ZERO,
        }
    }

    /// Distance to the nearest reachable face and that face's inward normal.
    ///
    /// On each axis only the face the direction points towards can be hit,
    /// so its opposite is never tested.
    pub fn exit(&self, r: &Ray) -> Option<(f32, Vec3A)> {
        let mut nearest: Option<(f32, Vec3A)> = None;

        for axis in 0..3 {
            let d = r.direction[axis];
            if d.abs() <= AXIS_EPSILON {
                continue;
            }
            let side = d.signum();
            let t = (side * self.half_extent - r.origin[axis]) / d;
            if t <= ROOM_T_MIN {
                continue;
            }
            if nearest.map_or(true, |(best, _)| t < best) {
                let mut normal = Vec3A::ZERO;
                normal[axis] = -side;
                nearest = Some((t, normal));
            }
        }

        nearest
    }
}

impl Hittable for RoomShell {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        let (dist, normal) = self.exit(r).unwrap_or((ROOM_FALLBACK_DIST, Vec3A::ZERO));
        if !ray_t.with_floor(ROOM_T_MIN).surrounds(dist) {
            return false;
        }

        rec.dist = dist;
        rec.pos = r.at(dist);
        rec.normal = normal;
        rec.albedo = self.albedo;
        rec.specular = Vec3A::ZERO;
        rec.smoothness = 0.0;
        rec.emission = self.emission;
        rec.skybox = true;
        true
    }
}
