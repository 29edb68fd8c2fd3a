//! Progressive accumulation of successive frames.
//!
//! Keeps the running mean of all frames added so far: frame `n` (counting
//! from zero) is blended in with weight `1 / (n + 1)`.

use crate::error::Result;
use crate::framebuffer::FrameBuffer;

/// Running mean over rendered frames.
#[derive(Debug, Clone)]
pub struct Accumulator {
    mean: FrameBuffer,
    frames: u32,
}

impl Accumulator {
    /// Empty accumulator for frames of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mean: FrameBuffer::new(width, height),
            frames: 0,
        }
    }

    /// Blend `frame` into the running mean.
    pub fn add(&mut self, frame: &FrameBuffer) -> Result<()> {
        self.mean.check_same_size(frame)?;
        let weight = 1.0 / (self.frames + 1) as f32;
        for (mean, &new) in self.mean.pixels_mut().iter_mut().zip(frame.pixels()) {
            *mean += (new - *mean) * weight;
        }
        self.frames += 1;
        Ok(())
    }

    /// Number of frames blended so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Current mean image.
    pub fn image(&self) -> &FrameBuffer {
        &self.mean
    }

    /// Take the mean image.
    pub fn into_image(self) -> FrameBuffer {
        self.mean
    }
}
