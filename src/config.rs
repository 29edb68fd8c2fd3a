//! Render configuration.
//!
//! Settings come from built-in defaults, optionally overridden by a TOML file,
//! then by command line flags. Every field may be omitted from the file:
//!
//! ```toml
//! width = 900
//! height = 900
//! samples_per_pixel = 1
//! max_bounces = 5
//! mutations = 10
//! deletion = "gaussian"
//! seed = 0
//! threads = 0
//! frames = 1
//! ```

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::mlt::{DeletionStrategy, MutationSettings};

/// Parameters of a render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Independent seed paths averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum vertices per path
    pub max_bounces: u32,
    /// Mutation rounds per pixel (0 = plain path tracing)
    pub mutations: u32,
    /// Deletion-length rule for mutations
    pub deletion: DeletionStrategy,
    /// Seed of the first frame; frame `n` uses `seed + n`
    pub seed: u64,
    /// Worker threads (0 = one per core)
    pub threads: usize,
    /// Frames accumulated into the final image
    pub frames: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 900,
            samples_per_pixel: 1,
            max_bounces: 5,
            mutations: 0,
            deletion: DeletionStrategy::Discrete,
            seed: 0,
            threads: 0,
            frames: 1,
        }
    }
}

impl RenderSettings {
    /// Parse settings from TOML text; missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Check that the settings describe a renderable frame.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid(
                "width/height",
                format!("frame must not be empty ({}x{})", self.width, self.height),
            ));
        }
        if self.pixel_count().is_none() {
            return Err(Error::invalid("width/height", "frame too large"));
        }
        if self.samples_per_pixel == 0 {
            return Err(Error::invalid("samples_per_pixel", "must be at least 1"));
        }
        if self.max_bounces == 0 {
            return Err(Error::invalid("max_bounces", "must be at least 1"));
        }
        if self.frames == 0 {
            return Err(Error::invalid("frames", "must be at least 1"));
        }
        Ok(())
    }

    /// Number of pixels in a frame, if it fits in memory indices.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Mutation part of the settings.
    pub fn mutation_settings(&self) -> MutationSettings {
        MutationSettings {
            mutations: self.mutations,
            deletion: self.deletion,
        }
    }

    /// Seed of frame `index`.
    pub fn frame_seed(&self, index: u32) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}
