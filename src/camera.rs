//! Pinhole camera for primary ray generation.

use glam::Vec3A;

use crate::ray::Ray;

/// Pinhole camera.
///
/// Rays start at `origin` and pass through a rectangular screen centred at
/// `screen_center` and spanned by the half-extent vectors `screen_u`
/// (right) and `screen_v` (up). Pixel rows count upward from the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub origin: Vec3A,
    /// Centre of the screen rectangle
    pub screen_center: Vec3A,
    /// Half-width vector of the screen
    pub screen_u: Vec3A,
    /// Half-height vector of the screen
    pub screen_v: Vec3A,
}

impl Camera {
    /// Creates a camera from its eye position and screen rectangle.
    pub fn new(origin: Vec3A, screen_center: Vec3A, screen_u: Vec3A, screen_v: Vec3A) -> Self {
        Self {
            origin,
            screen_center,
            screen_u,
            screen_v,
        }
    }

    /// Normalized screen coordinates of pixel `(x, y)`.
    ///
    /// Pixel 0 maps to -1 and the centre pixel to 0.
    pub fn screen_coords(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
        let sx = (2.0 * x as f32 - width as f32) / width as f32;
        let sy = (2.0 * y as f32 - height as f32) / height as f32;
        (sx, sy)
    }

    /// Primary ray through pixel `(x, y)` of a `width` x `height` image.
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let (sx, sy) = Self::screen_coords(x, y, width, height);
        let target = self.screen_center + sx * self.screen_u + sy * self.screen_v;
        Ray::new(self.origin, (target - self.origin).normalize_or_zero())
    }
}

impl Default for Camera {
    /// Eye at (1, 2, 10) looking through a 10x10 screen in the z = 0 plane.
    fn default() -> Self {
        Self::new(
            Vec3A::new(1.0, 2.0, 10.0),
            Vec3A::ZERO,
            Vec3A::new(5.0, 0.0, 0.0),
            Vec3A::new(0.0, 5.0, 0.0),
        )
    }
}
