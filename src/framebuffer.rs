//! RGBA frame buffer shared between the workers and the display stage.
//!
//! Pixels are stored row-major with the origin at the bottom-left, matching
//! the camera's screen coordinates. Output code flips rows when converting to
//! top-left image formats.

use glam::Vec4;
use image::{ImageBuffer, Rgb};

use crate::error::{Error, Result};

/// Linear HDR image as produced by the renderer.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Row-major RGBA frame buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
}

impl FrameBuffer {
    /// Black, opaque frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec4::new(0.0, 0.0, 0.0, 1.0))
    }

    /// Frame buffer with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel at column `x` of row `y` (row 0 is the bottom row).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[self.index(x, y)]
    }

    /// Overwrite one pixel.
    pub fn set(&mut self, x: u32, y: u32, value: Vec4) {
        let index = self.index(x, y);
        self.pixels[index] = value;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Vec4] {
        &self.pixels
    }

    /// Mutable access to all pixels in row-major order.
    pub fn pixels_mut(&mut self) -> &mut [Vec4] {
        &mut self.pixels
    }

    /// Fail unless `other` has the same size.
    pub fn check_same_size(&self, other: &FrameBuffer) -> Result<()> {
        if self.size() != other.size() {
            return Err(Error::FrameSize {
                expected: self.size(),
                actual: other.size(),
            });
        }
        Ok(())
    }

    /// Convert to a top-left-origin RGB image.
    pub fn to_image(&self) -> HdrImage {
        ImageBuffer::from_fn(self.width, self.height, |x, row| {
            let p = self.get(x, self.height - 1 - row);
            Rgb([p.x, p.y, p.z])
        })
    }
}
