//! Error type shared by the renderer and its front end.
//!
//! Only setup and I/O can fail. Numerical trouble inside a pixel never
//! surfaces here: it is sanitized into a black channel instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring a render or writing its output.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`RenderSettings`](crate::config::RenderSettings).
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A setting is out of range.
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Setting name as written in the config file
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Two frame buffers of different sizes were combined.
    #[error("frame size mismatch: expected {expected:?}, got {actual:?}")]
    FrameSize {
        /// Size of the receiving buffer
        expected: (u32, u32),
        /// Size of the incoming buffer
        actual: (u32, u32),
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Output format not recognised from the file extension.
    #[error("unsupported output format '{0}', only .png and .exr are supported")]
    UnsupportedFormat(String),

    /// PNG encoding or writing failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    /// EXR encoding or writing failed.
    #[error("failed to write EXR: {0}")]
    Exr(#[from] exr::error::Error),

    /// Talking to the TEV viewer failed.
    #[error("TEV connection to {address} failed: {source}")]
    Tev {
        /// Viewer address
        address: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Result type with [`Error`] as the error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::InvalidSetting`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}
