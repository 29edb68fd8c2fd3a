//! Light path construction.
//!
//! A [`Path`] records every vertex of a camera path: the hit, the ray before
//! and after shading, and the radiance gathered so far. The mutation engine
//! keeps a prefix of a path and regenerates the rest from the last kept
//! vertex's scattered ray.

use glam::Vec3A;
use rand::Rng;
use smallvec::SmallVec;

use crate::hittable::RayHit;
use crate::material::Color;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::shade;

/// Paths up to this many bounces live inline without a heap allocation.
const INLINE_NODES: usize = 8;

/// One vertex of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    /// Intersection found at this bounce.
    pub hit: RayHit,
    /// Ray that produced the hit.
    pub incident: Ray,
    /// Ray leaving the vertex after shading; regeneration resumes from it.
    pub scattered: Ray,
    /// Radiance accumulated along the path up to and including this vertex.
    pub radiance: Color,
}

/// Ordered sequence of vertices; index is the bounce number.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    nodes: SmallVec<[PathNode; INLINE_NODES]>,
    max_bounces: usize,
}

impl Path {
    /// Trace a fresh path from `ray` for at most `max_bounces` bounces.
    pub fn trace<R: Rng + ?Sized>(scene: &Scene, ray: Ray, max_bounces: usize, rng: &mut R) -> Self {
        let mut path = Self {
            nodes: SmallVec::with_capacity(max_bounces),
            max_bounces,
        };
        path.extend(scene, ray, Vec3A::ZERO, rng);
        path
    }

    /// New path sharing the first `keep` vertices with `self`, with the
    /// remainder traced anew.
    ///
    /// `keep` is clamped to `1..=len`. `self` is never modified.
    pub fn regenerate<R: Rng + ?Sized>(&self, keep: usize, scene: &Scene, rng: &mut R) -> Self {
        let keep = keep.clamp(1, self.len().max(1));
        let mut candidate = Self {
            nodes: self.nodes.iter().take(keep).copied().collect(),
            max_bounces: self.max_bounces,
        };

        if let Some(last) = candidate.nodes.last().copied() {
            candidate.extend(scene, last.scattered, last.radiance, rng);
        }
        candidate
    }

    fn extend<R: Rng + ?Sized>(&mut self, scene: &Scene, mut ray: Ray, mut radiance: Color, rng: &mut R) {
        while self.nodes.len() < self.max_bounces && !ray.is_extinguished() {
            let incident = ray;
            let hit = scene.trace(&ray);
            let emitted = shade(&mut ray, &hit, rng);
            // Weighted by the throughput leaving the vertex, after shading
            radiance += ray.energy * emitted;

            self.nodes.push(PathNode {
                hit,
                incident,
                scattered: ray,
                radiance,
            });
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the path has no vertices.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum number of vertices.
    pub fn max_bounces(&self) -> usize {
        self.max_bounces
    }

    /// Vertices in bounce order.
    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    /// Total radiance carried by the path.
    pub fn radiance(&self) -> Color {
        self.nodes.last().map_or(Vec3A::ZERO, |node| node.radiance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::plane::Plane;
    use crate::random::pixel_rng;
    use crate::room::RoomShell;

    fn lit_floor() -> Scene {
        Scene::new(vec![
            RoomShell::new(100.0, Vec3A::splat(0.25)).into(),
            Plane::ground(0.0, Material::diffuse(Vec3A::splat(0.5)).with_emission(Vec3A::splat(0.1))).into(),
        ])
    }

    /// Two facing planes: a diffuse path between them never escapes.
    fn slab() -> Scene {
        let wall = Material::diffuse(Vec3A::splat(0.9)).with_emission(Vec3A::splat(0.01));
        Scene::new(vec![
            Plane::ground(0.0, wall).into(),
            Plane::new(Vec3A::new(0.0, 10.0, 0.0), -Vec3A::Y, wall).into(),
        ])
    }

    fn down_ray() -> Ray {
        Ray::new(Vec3A::new(0.0, 5.0, 0.0), -Vec3A::Y)
    }

    #[test]
    fn test_single_bounce_collects_first_emission() {
        let mut rng = pixel_rng(1, 0);
        let path = Path::trace(&lit_floor(), down_ray(), 1, &mut rng);

        // Floor emission times the diffuse weight 0.5
        assert_eq!(path.len(), 1);
        assert!((path.radiance() - Vec3A::splat(0.05)).length() < 1e-6);
        assert_eq!(path.nodes()[0].incident, down_ray());
        assert!((path.nodes()[0].hit.dist - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_escape_terminates_early() {
        let mut rng = pixel_rng(1, 0);
        let up = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::Y);
        let path = Path::trace(&lit_floor(), up, 5, &mut rng);

        assert_eq!(path.len(), 1);
        assert!(path.nodes()[0].hit.skybox);
        assert!(path.nodes()[0].scattered.is_extinguished());
        // Black room albedo swallows the ambient term
        assert_eq!(path.radiance(), Vec3A::ZERO);
    }

    #[test]
    fn test_escape_is_weighted_by_room_albedo() {
        let mut rng = pixel_rng(1, 0);
        let mut room = RoomShell::new(100.0, Vec3A::splat(0.25));
        room.albedo = Vec3A::splat(0.5);
        let scene = Scene::new(vec![room.into()]);
        let up = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::Y);

        let path = Path::trace(&scene, up, 1, &mut rng);
        assert!((path.radiance() - Vec3A::splat(0.125)).length() < 1e-6);
    }

    #[test]
    fn test_radiance_is_cumulative() {
        let mut rng = pixel_rng(2, 0);
        let path = Path::trace(&slab(), down_ray(), 3, &mut rng);

        // Each wall adds 0.01 times the throughput after its 0.9 bounce
        let expected = [0.009, 0.009 + 0.0081, 0.009 + 0.0081 + 0.00729];
        assert_eq!(path.len(), 3);
        for (node, want) in path.nodes().iter().zip(expected) {
            assert!((node.radiance - Vec3A::splat(want)).length() < 1e-6);
        }
    }

    #[test]
    fn test_bounce_limit_is_respected() {
        let mut rng = pixel_rng(3, 0);
        let path = Path::trace(&slab(), Ray::new(Vec3A::new(0.0, 5.0, 0.0), -Vec3A::Y), 4, &mut rng);

        assert_eq!(path.len(), 4);
        assert_eq!(path.max_bounces(), 4);
    }

    #[test]
    fn test_regenerate_keeps_prefix_and_leaves_original() {
        let scene = slab();
        let mut rng = pixel_rng(4, 0);
        let path = Path::trace(&scene, Ray::new(Vec3A::new(0.0, 5.0, 0.0), -Vec3A::Y), 6, &mut rng);
        let before = path.clone();

        let candidate = path.regenerate(2, &scene, &mut rng);

        assert_eq!(path, before);
        assert_eq!(candidate.len(), 6);
        assert_eq!(&candidate.nodes()[..2], &path.nodes()[..2]);
        assert_ne!(candidate.nodes()[2].scattered, path.nodes()[2].scattered);
    }

    #[test]
    fn test_regenerate_of_finished_path_is_identical() {
        let mut rng = pixel_rng(5, 0);
        let up = Ray::new(Vec3A::new(0.0, 5.0, 0.0), Vec3A::Y);
        let path = Path::trace(&lit_floor(), up, 5, &mut rng);

        let candidate = path.regenerate(path.len(), &lit_floor(), &mut rng);
        assert_eq!(candidate, path);
    }
}
