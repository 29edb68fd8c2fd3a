//! Surface shading: emission lookup and importance-sampled bounce.
//!
//! [`shade`] returns the radiance emitted at the hit and rewrites the ray in
//! place into the next bounce, choosing the specular or the diffuse lobe by
//! Russian roulette on their relative average intensities.

use glam::Vec3A;
use rand::Rng;

use crate::hittable::RayHit;
use crate::material::{channel_average, reflect, Color};
use crate::random::{random_f32, sample_hemisphere, smoothness_to_phong_alpha};
use crate::ray::Ray;

/// Hits closer than this (including the no-hit sentinel) end the path.
pub const MIN_SHADE_DIST: f32 = 0.01;

/// Offset along the normal applied to bounced ray origins.
pub const SURFACE_BIAS: f32 = 1e-3;

/// Lobe chosen for a bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    /// Phong lobe around the mirror direction.
    Specular,
    /// Cosine lobe around the normal.
    Diffuse,
}

/// Selection probabilities of the two lobes, normalized to sum to one.
///
/// Returns `None` when the surface reflects nothing (or the material is not
/// finite), in which case the path ends.
pub fn lobe_probabilities(specular: Color, albedo: Color) -> Option<(f32, f32)> {
    let spec = channel_average(specular);
    let diff = channel_average(albedo);
    let sum = spec + diff;
    if !(sum.is_finite() && sum > 0.0) {
        return None;
    }
    Some((spec / sum, diff / sum))
}

/// Shade a hit and scatter the ray for the next bounce.
///
/// Returns the emission at the hit. The ray's energy becomes zero when the
/// path ends here; a skybox hit multiplies the energy by the ambient albedo.
pub fn shade<R: Rng + ?Sized>(ray: &mut Ray, hit: &RayHit, rng: &mut R) -> Color {
    shade_with_lobe(ray, hit, rng).0
}

/// [`shade`] that also reports which lobe was sampled.
pub fn shade_with_lobe<R: Rng + ?Sized>(
    ray: &mut Ray,
    hit: &RayHit,
    rng: &mut R,
) -> (Color, Option<Lobe>) {
    if hit.dist <= MIN_SHADE_DIST {
        ray.energy = Vec3A::ZERO;
        return (Vec3A::ZERO, None);
    }

    if hit.skybox {
        ray.energy *= hit.albedo;
        return (hit.emission, None);
    }

    // Diffuse and specular reflectance together may not exceed one per channel
    let albedo = hit.albedo.min(Vec3A::ONE - hit.specular);

    let Some((spec_prob, diff_prob)) = lobe_probabilities(hit.specular, albedo) else {
        ray.energy = Vec3A::ZERO;
        return (hit.emission, None);
    };

    let roulette = random_f32(rng);
    ray.origin = hit.pos + hit.normal * SURFACE_BIAS;

    let lobe = if roulette < spec_prob {
        let alpha = smoothness_to_phong_alpha(hit.smoothness);
        ray.direction = sample_hemisphere(reflect(ray.direction, hit.normal), alpha, rng);
        let f = (alpha + 2.0) / (alpha + 1.0);
        let cosine = (hit.normal.dot(ray.direction) * f).clamp(0.0, 1.0);
        ray.energy *= (1.0 / spec_prob) * hit.specular * cosine;
        Lobe::Specular
    } else {
        ray.direction = sample_hemisphere(hit.normal, 1.0, rng);
        ray.energy *= (1.0 / diff_prob) * albedo;
        Lobe::Diffuse
    };

    (hit.emission, Some(lobe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::random::pixel_rng;

    fn surface_hit(material: Material) -> RayHit {
        let mut hit = RayHit::none();
        let ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
        hit.record_surface(&ray, 1.0, Vec3A::Y, &material);
        hit
    }

    #[test]
    fn test_no_hit_terminates_path() {
        let mut rng = pixel_rng(0, 0);
        let mut ray = Ray::new(Vec3A::ZERO, Vec3A::Y);
        let emitted = shade(&mut ray, &RayHit::none(), &mut rng);

        assert_eq!(emitted, Vec3A::ZERO);
        assert!(ray.is_extinguished());
    }

    #[test]
    fn test_skybox_returns_emission_and_applies_albedo() {
        let mut rng = pixel_rng(0, 0);
        let mut hit = RayHit::none();
        hit.dist = 100.0;
        hit.skybox = true;
        hit.emission = Vec3A::splat(0.25);
        hit.albedo = Vec3A::splat(0.5);

        let mut ray = Ray::new(Vec3A::ZERO, Vec3A::Y);
        let emitted = shade(&mut ray, &hit, &mut rng);
        assert_eq!(emitted, Vec3A::splat(0.25));
        assert_eq!(ray.energy, Vec3A::splat(0.5));
        assert_eq!(ray.direction, Vec3A::Y);
    }

    #[test]
    fn test_diffuse_weight_equals_albedo() {
        let mut rng = pixel_rng(3, 0);
        let albedo = Vec3A::new(0.8, 0.4, 0.2);
        let hit = surface_hit(Material::diffuse(albedo).with_emission(Vec3A::X));

        for _ in 0..100 {
            let mut ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);
            let (emitted, lobe) = shade_with_lobe(&mut ray, &hit, &mut rng);
            assert_eq!(lobe, Some(Lobe::Diffuse));
            assert_eq!(emitted, Vec3A::X);
            // diffProb is the only lobe, so the weight is the albedo itself
            assert!((ray.energy - albedo).length() < 1e-5);
            assert!(ray.direction.y >= -1e-5);
            assert!((ray.origin.y - SURFACE_BIAS).abs() < 1e-6);
        }
    }

    #[test]
    fn test_specular_weight_converges_to_clamped_phong_expectation() {
        let mut rng = pixel_rng(9, 2);
        let specular = Vec3A::new(1.0, 0.5, 0.25);
        // Smoothness 0 gives alpha = 1, so cos(theta) has density 2c around the
        // mirror direction, which here is the normal. The weight is
        // specular * min(1.5 c, 1), whose expectation is 23/27 * specular.
        let hit = surface_hit(Material::glossy(specular, 0.0));
        let n = 40_000;

        let mut total = Vec3A::ZERO;
        for _ in 0..n {
            let mut ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);
            let (_, lobe) = shade_with_lobe(&mut ray, &hit, &mut rng);
            assert_eq!(lobe, Some(Lobe::Specular));
            total += ray.energy;
        }
        let mean = total / n as f32;
        let expected = specular * (23.0 / 27.0);

        for channel in 0..3 {
            assert!(
                (mean[channel] - expected[channel]).abs() < 0.01,
                "channel {channel}: {} vs {}",
                mean[channel],
                expected[channel]
            );
            assert!(mean[channel] <= specular[channel]);
        }
    }

    #[test]
    fn test_albedo_is_clamped_by_specular() {
        let mut rng = pixel_rng(4, 4);
        // albedo 1 and specular 1: diffuse budget collapses to zero
        let hit = surface_hit(Material::new(Vec3A::ONE, Vec3A::ONE, 1.0, Vec3A::ZERO));
        for _ in 0..50 {
            let mut ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);
            let (_, lobe) = shade_with_lobe(&mut ray, &hit, &mut rng);
            assert_eq!(lobe, Some(Lobe::Specular));
        }
    }

    #[test]
    fn test_black_surface_terminates_without_nan() {
        let mut rng = pixel_rng(0, 1);
        let hit = surface_hit(Material::BLACK.with_emission(Vec3A::splat(2.0)));
        let mut ray = Ray::new(Vec3A::new(0.0, 1.0, 0.0), -Vec3A::Y);

        let emitted = shade(&mut ray, &hit, &mut rng);
        assert_eq!(emitted, Vec3A::splat(2.0));
        assert!(ray.is_extinguished());
        assert!(ray.origin.is_finite() && ray.direction.is_finite());
    }

    #[test]
    fn test_lobe_probabilities_normalize() {
        let (s, d) = lobe_probabilities(Vec3A::splat(0.25), Vec3A::splat(0.75)).expect("reflective");
        assert!((s - 0.25).abs() < 1e-6);
        assert!((d - 0.75).abs() < 1e-6);
        assert!(lobe_probabilities(Vec3A::ZERO, Vec3A::ZERO).is_none());
        assert!(lobe_probabilities(Vec3A::splat(f32::NAN), Vec3A::ONE).is_none());
    }
}
