//! Surface material parameters.
//!
//! Every primitive carries one [`Material`]; a hit copies it into the
//! [`RayHit`](crate::hittable::RayHit) so shading never looks back at the scene.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Diffuse/specular surface description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse reflectance.
    pub albedo: Color,
    /// Specular reflectance.
    pub specular: Color,
    /// Glossiness of the specular lobe (0 = wide Phong lobe, 1 = near mirror).
    pub smoothness: f32,
    /// Radiance emitted by the surface.
    pub emission: Color,
}

impl Material {
    /// Fully absorbing, non-emitting material.
    pub const BLACK: Material = Material {
        albedo: Vec3A::ZERO,
        specular: Vec3A::ZERO,
        smoothness: 0.0,
        emission: Vec3A::ZERO,
    };

    /// Create a material from its four parameters.
    pub fn new(albedo: Color, specular: Color, smoothness: f32, emission: Color) -> Self {
        Self {
            albedo,
            specular,
            smoothness,
            emission,
        }
    }

    /// Pure Lambertian reflector.
    pub fn diffuse(albedo: Color) -> Self {
        Self {
            albedo,
            ..Self::BLACK
        }
    }

    /// Pure Phong-lobe reflector.
    pub fn glossy(specular: Color, smoothness: f32) -> Self {
        Self {
            specular,
            smoothness,
            ..Self::BLACK
        }
    }

    /// Same material with an emission term.
    pub fn with_emission(self, emission: Color) -> Self {
        Self { emission, ..self }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Average of the three colour channels.
pub fn channel_average(color: Color) -> f32 {
    color.dot(Vec3A::splat(1.0 / 3.0))
}

/// Perceptual luminance (Rec. 601 weights).
pub fn luminance(color: Color) -> f32 {
    0.299 * color.x + 0.587 * color.y + 0.114 * color.z
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_weights_sum_to_one() {
        assert!((luminance(Vec3A::ONE) - 1.0).abs() < 1e-6);
        assert!((luminance(Vec3A::new(0.0, 1.0, 0.0)) - 0.587).abs() < 1e-6);
    }

    #[test]
    fn test_channel_average() {
        assert!((channel_average(Vec3A::new(0.3, 0.6, 0.9)) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let r = reflect(Vec3A::new(1.0, -1.0, 0.0), Vec3A::Y);
        assert_eq!(r, Vec3A::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_constructors() {
        let m = Material::glossy(Vec3A::ONE, 0.5).with_emission(Vec3A::splat(2.0));
        assert_eq!(m.albedo, Vec3A::ZERO);
        assert_eq!(m.smoothness, 0.5);
        assert_eq!(m.emission, Vec3A::splat(2.0));
        assert_eq!(Material::diffuse(Vec3A::ONE).specular, Vec3A::ZERO);
    }
}
