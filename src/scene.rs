//! Scene description and closest-hit tracing.
//!
//! A scene is an ordered list of [`Primitive`] descriptors. Tracing tests the
//! ray against every primitive and keeps the closest hit (strictly smaller
//! distance wins, so the first writer wins ties).

use glam::Vec3A;

use crate::hittable::{Hittable, RayHit};
use crate::interval::Interval;
use crate::material::Material;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::room::RoomShell;
use crate::sphere::Sphere;
use crate::triangle::Triangle;

/// One geometric primitive of the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Bounding room shell (skybox).
    Room(RoomShell),
    /// Infinite plane.
    Plane(Plane),
    /// Sphere.
    Sphere(Sphere),
    /// Single-sided triangle.
    Triangle(Triangle),
}

impl Hittable for Primitive {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        match self {
            Primitive::Room(room) => room.hit(r, ray_t, rec),
            Primitive::Plane(plane) => plane.hit(r, ray_t, rec),
            Primitive::Sphere(sphere) => sphere.hit(r, ray_t, rec),
            Primitive::Triangle(triangle) => triangle.hit(r, ray_t, rec),
        }
    }
}

impl From<RoomShell> for Primitive {
    fn from(room: RoomShell) -> Self {
        Primitive::Room(room)
    }
}

impl From<Plane> for Primitive {
    fn from(plane: Plane) -> Self {
        Primitive::Plane(plane)
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Primitive::Triangle(triangle)
    }
}

/// Fixed collection of primitives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Primitives in test order
    pub primitives: Vec<Primitive>,
}

impl Scene {
    /// Create a scene from a list of primitives.
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    /// Add a primitive to the scene.
    pub fn add(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    /// Closest hit along `r`, or [`RayHit::none`] if nothing is hit.
    pub fn trace(&self, r: &Ray) -> RayHit {
        let mut rec = RayHit::none();
        self.hit(r, Interval::FORWARD, &mut rec);
        rec
    }

    /// The compiled-in showcase scene: a walled room on a mirror-like ground
    /// with four glossy spheres, one of them emissive.
    pub fn showcase() -> Self {
        let mut scene = Scene::new(Vec::with_capacity(20));

        scene.add(RoomShell::new(10_000.0, Vec3A::splat(0.25)));
        scene.add(Plane::ground(
            -17.0,
            Material::new(Vec3A::ONE, Vec3A::ONE, 1.0, Vec3A::ZERO),
        ));

        let spheres = [
            (Vec3A::new(-15.0, -12.6, -30.0), 4.0, Material::glossy(Vec3A::ONE, 1.2)),
            (
                Vec3A::new(17.0, -7.0, -45.0),
                3.0,
                Material::new(Vec3A::ONE, Vec3A::ONE, 0.8, Vec3A::new(0.0, 10.0, 10.0)),
            ),
            (
                Vec3A::new(-3.0, -9.6, -75.0),
                7.0,
                Material::glossy(Vec3A::new(1.0, 0.35, 0.45), 0.1),
            ),
            (Vec3A::new(1.0, -14.6, -62.0), 2.0, Material::glossy(Vec3A::ONE, 0.0)),
        ];
        for (center, radius, material) in spheres {
            scene.add(Sphere::new(center, radius, material));
        }

        let wall = Material::new(Vec3A::ONE, Vec3A::ZERO, 1.0, Vec3A::splat(0.01));
        for [v0, v1, v2] in WALLS {
            scene.add(Triangle::new(
                Vec3A::from_array(v0),
                Vec3A::from_array(v1),
                Vec3A::from_array(v2),
                wall,
            ));
        }

        scene
    }
}

impl Hittable for Scene {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut RayHit) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for primitive in &self.primitives {
            if primitive.hit(r, Interval::new(ray_t.min, closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.dist;
            }
        }

        hit_anything
    }
}

/// Wall triangles of the showcase room, front faces pointing inward.
const WALLS: [[[f32; 3]; 3]; 14] = [
    [[-40.0, -17.0, -65.0], [15.0, -17.0, -65.0], [-40.0, 6.0, -65.0]],
    [[-40.0, 6.0, -65.0], [15.0, -17.0, -65.0], [15.0, 6.0, -65.0]],
    [[-30.0, 6.0, -65.0], [-25.0, 6.0, 35.0], [-25.0, -17.0, 35.0]],
    [[-30.0, 6.0, -65.0], [-25.0, -17.0, 35.0], [-30.0, -17.0, -65.0]],
    [[-25.0, 6.0, 15.0], [15.0, -17.0, 15.0], [-25.0, -17.0, 15.0]],
    [[-25.0, 6.0, 15.0], [15.0, 6.0, 15.0], [15.0, -17.0, 15.0]],
    [[15.0, 6.0, 15.0], [15.0, 6.0, -35.0], [15.0, -17.0, -35.0]],
    [[15.0, 6.0, 15.0], [15.0, -17.0, -35.0], [15.0, -17.0, 15.0]],
    [[15.0, 6.0, -65.0], [13.0, -17.0, -30.0], [15.0, -17.0, -65.0]],
    [[15.0, -17.0, -65.0], [13.0, -17.0, -30.0], [15.0, 6.0, -65.0]],
    [[13.0, -17.0, -30.0], [13.0, 6.0, -30.0], [15.0, 6.0, -65.0]],
    [[15.0, 6.0, -65.0], [13.0, 6.0, -30.0], [13.0, -17.0, -30.0]],
    [[-40.0, 6.0, 20.0], [-40.0, 6.0, -65.0], [15.0, 6.0, -65.0]],
    [[15.0, 6.0, 15.0], [-40.0, 6.0, 15.0], [15.0, 6.0, -65.0]],
];
