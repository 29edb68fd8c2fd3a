//! Frame rendering: per-pixel driver on top of the scanline dispatcher.
//!
//! For every pixel the driver traces `samples_per_pixel` seed paths through
//! the pinhole camera, averages them, and, when mutations are enabled, runs a
//! Metropolis chain from the last seed path. All randomness of a pixel comes
//! from its own generator stream, so a frame is reproducible from its seed
//! regardless of scheduling.

use glam::{Vec3A, Vec4};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::camera::Camera;
use crate::config::RenderSettings;
use crate::dispatch::{dispatch_rows, CompletionCounter};
use crate::error::{Error, Result};
use crate::framebuffer::FrameBuffer;
use crate::material::Color;
use crate::mlt::{sanitize, MarkovChain};
use crate::path::Path;
use crate::random::{pixel_rng, PathRng};
use crate::scene::Scene;

/// CPU renderer bound to one scene, camera and settings.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,
    pool: ThreadPool,
    show_progress: bool,
}

impl Renderer {
    /// Validate the settings and start the worker pool.
    pub fn new(scene: Scene, camera: Camera, settings: RenderSettings) -> Result<Self> {
        settings.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .thread_name(|i| format!("scanline-{i}"))
            .build()?;

        Ok(Self {
            scene,
            camera,
            settings,
            pool,
            show_progress: false,
        })
    }

    /// Show a progress bar on stderr while rendering.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Settings in use.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Render frame `frame_index` into a new buffer.
    pub fn render_frame(&self, frame_index: u32) -> Result<FrameBuffer> {
        let mut frame = FrameBuffer::new(self.settings.width, self.settings.height);
        self.render_into(&mut frame, frame_index)?;
        Ok(frame)
    }

    /// Render frame `frame_index` into `frame`, overwriting every pixel.
    ///
    /// Fails with [`Error::FrameSize`](crate::error::Error::FrameSize) if
    /// `frame` does not match the configured size.
    pub fn render_into(&self, frame: &mut FrameBuffer, frame_index: u32) -> Result<()> {
        let expected = (self.settings.width, self.settings.height);
        if frame.size() != expected {
            return Err(Error::FrameSize {
                expected,
                actual: frame.size(),
            });
        }

        let seed = self.settings.frame_seed(frame_index);
        debug!(
            "Rendering frame {} ({}x{}, seed {}) on {} threads",
            frame_index,
            self.settings.width,
            self.settings.height,
            seed,
            self.num_threads()
        );

        let progress = self.progress_bar();
        let counter = CompletionCounter::new();
        let start = std::time::Instant::now();

        dispatch_rows(&self.pool, frame, &counter, &progress, |x, y| {
            let mut rng = pixel_rng(seed, self.pixel_index(x, y));
            let color = self.render_pixel(x, y, &mut rng);
            Vec4::new(color.x, color.y, color.z, 1.0)
        });

        progress.finish_and_clear();
        info!(
            "Frame {} rendered in {:.2?} ({} pixels)",
            frame_index,
            start.elapsed(),
            counter.completed()
        );
        Ok(())
    }

    fn pixel_index(&self, x: u32, y: u32) -> u64 {
        y as u64 * self.settings.width as u64 + x as u64
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(self.settings.height as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }
        pb
    }

    /// Estimate the colour of pixel `(x, y)` using `rng` for every draw.
    pub fn render_pixel(&self, x: u32, y: u32, rng: &mut PathRng) -> Color {
        let settings = &self.settings;
        let max_bounces = settings.max_bounces as usize;
        let ray = self
            .camera
            .get_ray(x, y, settings.width, settings.height);

        let mut sum = Vec3A::ZERO;
        let mut seed_path = None;
        for _ in 0..settings.samples_per_pixel {
            let path = Path::trace(&self.scene, ray, max_bounces, rng);
            sum += path.radiance();
            seed_path = Some(path);
        }
        let color = sum / settings.samples_per_pixel.max(1) as f32;

        match seed_path {
            Some(path) if settings.mutations > 0 => {
                let mut chain = MarkovChain::new(path, color);
                chain.run(&settings.mutation_settings(), &self.scene, rng);
                chain.estimate()
            }
            _ => sanitize(color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlt::DeletionStrategy;

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 8,
            height: 6,
            threads: 2,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = RenderSettings {
            height: 0,
            ..small_settings()
        };
        assert!(Renderer::new(Scene::showcase(), Camera::default(), settings).is_err());
    }

    #[test]
    fn test_frames_are_reproducible() {
        let renderer = Renderer::new(Scene::showcase(), Camera::default(), small_settings()).unwrap();
        assert_eq!(renderer.render_frame(0).unwrap(), renderer.render_frame(0).unwrap());
        assert_eq!(renderer.num_threads(), 2);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let one = Renderer::new(
            Scene::showcase(),
            Camera::default(),
            RenderSettings {
                threads: 1,
                mutations: 4,
                ..small_settings()
            },
        )
        .unwrap();
        let many = Renderer::new(
            Scene::showcase(),
            Camera::default(),
            RenderSettings {
                threads: 4,
                mutations: 4,
                ..small_settings()
            },
        )
        .unwrap();
        assert_eq!(one.render_frame(3).unwrap(), many.render_frame(3).unwrap());
    }

    #[test]
    fn test_never_mutating_matches_plain_path_tracing() {
        let plain = Renderer::new(Scene::showcase(), Camera::default(), small_settings()).unwrap();
        let held = Renderer::new(
            Scene::showcase(),
            Camera::default(),
            RenderSettings {
                mutations: 16,
                deletion: DeletionStrategy::Never,
                ..small_settings()
            },
        )
        .unwrap();

        let a = plain.render_frame(0).unwrap();
        let b = held.render_frame(0).unwrap();
        for (p, q) in a.pixels().iter().zip(b.pixels()) {
            assert!((*p - *q).length() < 1e-5);
        }
    }

    #[test]
    fn test_render_into_overwrites_every_pixel() {
        let renderer = Renderer::new(
            Scene::showcase(),
            Camera::default(),
            RenderSettings {
                mutations: 3,
                deletion: DeletionStrategy::Gaussian,
                ..small_settings()
            },
        )
        .unwrap();
        let mut frame = FrameBuffer::filled(8, 6, Vec4::splat(-1.0));

        renderer.render_into(&mut frame, 1).unwrap();

        for p in frame.pixels() {
            assert!(p.is_finite());
            assert_eq!(p.w, 1.0);
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.z >= 0.0);
        }
    }

    #[test]
    fn test_render_into_rejects_wrong_size() {
        let renderer = Renderer::new(Scene::showcase(), Camera::default(), small_settings()).unwrap();
        let mut frame = FrameBuffer::filled(4, 6, Vec4::splat(-1.0));

        let err = renderer.render_into(&mut frame, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::FrameSize { expected: (8, 6), actual: (4, 6) }
        ));
        assert!(frame.pixels().iter().all(|p| *p == Vec4::splat(-1.0)));
    }
}
