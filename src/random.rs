//! Random number generation and hemisphere sampling.
//!
//! Every sampling function takes the generator explicitly; each pixel owns a
//! ChaCha20 stream derived from the frame seed, so no generator state is ever
//! shared between workers.

use std::f32::consts::PI;

use glam::{Mat3A, Vec3A};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Generator used for all path sampling.
pub type PathRng = ChaCha20Rng;

/// Generator for one pixel of one frame.
///
/// All pixels share the frame seed and differ by stream, which gives
/// independent, reproducible sequences.
pub fn pixel_rng(frame_seed: u64, pixel_index: u64) -> PathRng {
    let mut rng = ChaCha20Rng::seed_from_u64(frame_seed);
    rng.set_stream(pixel_index);
    rng
}

/// Generate a random f32 in [0.0, 1.0)
pub fn random_f32<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.random()
}

/// Convert a smoothness value to the Phong exponent of the specular lobe.
pub fn smoothness_to_phong_alpha(smoothness: f32) -> f32 {
    1000.0f32.powf(smoothness * smoothness)
}

/// Orthonormal frame whose third column is `normal`.
pub fn tangent_space(normal: Vec3A) -> Mat3A {
    // Pick a helper axis not nearly parallel to the normal
    let helper = if normal.x.abs() > 0.99 { Vec3A::Z } else { Vec3A::X };
    let tangent = normal.cross(helper).normalize();
    let binormal = normal.cross(tangent).normalize();
    Mat3A::from_cols(tangent, binormal, normal)
}

/// Sample a direction around `normal` with density proportional to
/// `cos(theta)^alpha`.
///
/// `alpha = 1` is cosine-weighted (Lambertian) sampling; larger exponents
/// concentrate samples around `normal`.
pub fn sample_hemisphere<R: Rng + ?Sized>(normal: Vec3A, alpha: f32, rng: &mut R) -> Vec3A {
    let cos_theta = random_f32(rng).powf(1.0 / (alpha + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * random_f32(rng);
    let local = Vec3A::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta);
    tangent_space(normal) * local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tangent_space_is_orthonormal() {
        for normal in [
            Vec3A::X,
            Vec3A::Y,
            -Vec3A::Z,
            Vec3A::new(1.0, 2.0, 3.0).normalize(),
        ] {
            let frame = tangent_space(normal);
            let (t, b, n) = (frame.x_axis, frame.y_axis, frame.z_axis);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!((b.length() - 1.0).abs() < 1e-5);
            assert!(t.dot(b).abs() < 1e-5);
            assert!(t.dot(n).abs() < 1e-5);
            assert!(b.dot(n).abs() < 1e-5);
            assert_eq!(n, normal);
        }
    }

    #[test]
    fn test_samples_stay_in_hemisphere() {
        let mut rng = pixel_rng(7, 0);
        let normal = Vec3A::new(0.0, 1.0, 1.0).normalize();
        for _ in 0..1000 {
            let dir = sample_hemisphere(normal, 1.0, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            assert!(dir.dot(normal) >= -1e-5);
        }
    }

    #[test]
    fn test_cosine_sampling_mean() {
        // E[cos] under cosine-weighted sampling is 2/3
        let mut rng = pixel_rng(11, 3);
        let n = 20_000;
        let mean: f32 = (0..n)
            .map(|_| sample_hemisphere(Vec3A::Y, 1.0, &mut rng).y)
            .sum::<f32>()
            / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.02);
    }

    #[test]
    fn test_high_exponent_concentrates_lobe() {
        let mut rng = pixel_rng(1, 1);
        let alpha = smoothness_to_phong_alpha(1.0);
        assert!((alpha - 1000.0).abs() < 1e-2);
        for _ in 0..100 {
            assert!(sample_hemisphere(Vec3A::Z, alpha, &mut rng).z > 0.9);
        }
    }

    #[test]
    fn test_pixel_streams_are_reproducible_and_distinct() {
        let draws = |mut rng: PathRng| -> Vec<f32> { (0..4).map(|_| random_f32(&mut rng)).collect() };

        assert_eq!(draws(pixel_rng(5, 10)), draws(pixel_rng(5, 10)));
        assert_ne!(draws(pixel_rng(5, 10)), draws(pixel_rng(5, 11)));
        assert_ne!(draws(pixel_rng(5, 10)), draws(pixel_rng(6, 10)));
    }
}
