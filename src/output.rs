//! # Output Module
//!
//! Hands finished frames to the outside world:
//! - PNG export with clamping and sRGB encoding
//! - EXR export with full linear HDR precision
//! - Live preview in TEV (The EXR Viewer), updated after every frame
//!
//! All functions take the bottom-left-origin [`FrameBuffer`] and flip it to
//! the top-left layout image formats expect.

use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::error::{Error, Result};
use crate::framebuffer::{FrameBuffer, HdrImage};

/// Default TEV port when the address has none.
pub const TEV_DEFAULT_PORT: u16 = 14158;

/// Image name shown in TEV.
const TEV_IMAGE_NAME: &str = "mltrace";

/// Output format chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 8-bit sRGB PNG
    Png,
    /// 32-bit float linear OpenEXR
    Exr,
}

impl OutputFormat {
    /// Pick the format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(OutputFormat::Png),
            "exr" => Ok(OutputFormat::Exr),
            _ => Err(Error::UnsupportedFormat(extension)),
        }
    }
}

/// Linear to sRGB transfer function for values in [0, 1].
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Write `frame` to `path` in the format given by its extension.
pub fn save_frame(frame: &FrameBuffer, path: &Path) -> Result<()> {
    let image = frame.to_image();
    match OutputFormat::from_path(path)? {
        OutputFormat::Png => save_image_as_png(&image, path),
        OutputFormat::Exr => save_image_as_exr(&image, path),
    }
}

/// Save an HDR image as 8-bit PNG, clamping to [0, 1] and applying sRGB encoding.
pub fn save_image_as_png(image: &HdrImage, path: &Path) -> Result<()> {
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let encode = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8;
        Rgb([encode(pixel[0]), encode(pixel[1]), encode(pixel[2])])
    });

    u8_image.save(path)?;
    info!("Image saved as {}", path.display());
    Ok(())
}

/// Save an HDR image as linear 32-bit float EXR.
pub fn save_image_as_exr(image: &HdrImage, path: &Path) -> Result<()> {
    write_rgb_file(path, image.width() as usize, image.height() as usize, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    })?;
    info!("HDR image saved as EXR: {}", path.display());
    Ok(())
}

/// Append the default TEV port to `address` if it has none.
pub fn tev_address(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, TEV_DEFAULT_PORT)
    }
}

/// Connection to a TEV viewer showing the image being accumulated.
pub struct TevPreview {
    client: TevClient,
    address: String,
    width: u32,
    height: u32,
}

impl TevPreview {
    /// Connect to TEV and create an image of the given size.
    pub fn connect(address: &str, width: u32, height: u32) -> Result<Self> {
        let address = tev_address(address);
        debug!("Attempting to connect to TEV at {}", address);

        let tev_error = |source| Error::Tev {
            address: address.clone(),
            source,
        };

        let stream = TcpStream::connect(&address).map_err(tev_error)?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {}", e);
        }

        let mut client = TevClient::wrap(stream);
        client
            .send(PacketCreateImage {
                image_name: TEV_IMAGE_NAME,
                width,
                height,
                channel_names: &["R", "G", "B"],
                grab_focus: true,
            })
            .map_err(tev_error)?;
        info!("Connected to TEV at {}", address);

        Ok(Self {
            client,
            address,
            width,
            height,
        })
    }

    /// Replace the image content with `frame`.
    pub fn update(&mut self, frame: &FrameBuffer) -> Result<()> {
        if frame.size() != (self.width, self.height) {
            return Err(Error::FrameSize {
                expected: (self.width, self.height),
                actual: frame.size(),
            });
        }

        let start = std::time::Instant::now();
        let data = planar_rgb(&frame.to_image());
        let plane = self.width as u64 * self.height as u64;

        self.client
            .send(PacketUpdateImage {
                image_name: TEV_IMAGE_NAME,
                grab_focus: false,
                channel_names: &["R", "G", "B"],
                x: 0,
                y: 0,
                width: self.width,
                height: self.height,
                channel_offsets: &[0, plane, 2 * plane],
                channel_strides: &[1, 1, 1],
                data: &data,
            })
            .map_err(|source| Error::Tev {
                address: self.address.clone(),
                source,
            })?;

        debug!(
            "Sent {:.1} MB to TEV in {:.2?}",
            data.len() as f32 * 4.0 / 1_000_000.0,
            start.elapsed()
        );
        Ok(())
    }
}

/// Convert interleaved RGB to planar RRR..GGG..BBB.. as TEV expects.
fn planar_rgb(image: &HdrImage) -> Vec<f32> {
    let mut data = Vec::with_capacity(image.as_raw().len());
    for channel in 0..3 {
        data.extend(image.pixels().map(|pixel| pixel[channel]));
    }
    data
}
