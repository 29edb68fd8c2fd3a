//! Scanline dispatch and frame completion.
//!
//! Each row of the frame buffer is handed to the worker pool as its own task
//! together with an exclusive `&mut` slice of that row, so no two workers can
//! write the same cell. Workers publish every finished pixel through a
//! [`CompletionCounter`]; the frame is handed on only once the counter reaches
//! the pixel count.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec4;
use indicatif::ProgressBar;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::framebuffer::FrameBuffer;

/// Count of finished pixels in the current frame.
///
/// Increments use `Release` and reads use `Acquire`, so a reader that observes
/// the final count also observes every pixel written before it.
#[derive(Debug, Default)]
pub struct CompletionCounter {
    done: AtomicUsize,
}

impl CompletionCounter {
    /// Counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish one finished pixel.
    pub fn mark_done(&self) {
        self.done.fetch_add(1, Ordering::Release);
    }

    /// Number of pixels published so far.
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Acquire)
    }

    /// Spin until at least `total` pixels have been published.
    pub fn wait_for(&self, total: usize) {
        while self.completed() < total {
            std::hint::spin_loop();
        }
    }
}

/// Fill every pixel of `frame` with `shade_pixel(x, y)`, one pool task per row.
///
/// Returns after all rows are joined and the counter has reached the pixel
/// count.
pub fn dispatch_rows<F>(
    pool: &ThreadPool,
    frame: &mut FrameBuffer,
    counter: &CompletionCounter,
    progress: &ProgressBar,
    shade_pixel: F,
) where
    F: Fn(u32, u32) -> Vec4 + Sync,
{
    let width = frame.width() as usize;
    let total = frame.pixels().len();
    if total == 0 {
        return;
    }

    pool.install(|| {
        frame
            .pixels_mut()
            .par_chunks_mut(width)
            .with_max_len(1)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = shade_pixel(x as u32, y as u32);
                    counter.mark_done();
                }
                progress.inc(1);
            });
    });

    counter.wait_for(total);
}
