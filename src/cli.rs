use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use mltrace::config::RenderSettings;
use mltrace::mlt::DeletionStrategy;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
///
/// Render options are optional so that unset flags fall through to the
/// configuration file, then to the built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "mltrace")]
#[command(about = "A CPU path tracer with Metropolis light transport")]
pub struct Args {
    /// TOML file with render settings
    #[arg(short, long, help = "TOML file with render settings")]
    pub config: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, help = "Image width in pixels [default: 900]")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, help = "Image height in pixels [default: 900]")]
    pub height: Option<u32>,

    /// Number of seed paths per pixel
    #[arg(long, short = 's', help = "Number of seed paths per pixel [default: 1]")]
    pub samples: Option<u32>,

    /// Maximum path vertices
    #[arg(long, short = 'b', help = "Maximum path vertices [default: 5]")]
    pub bounces: Option<u32>,

    /// Mutation rounds per pixel
    #[arg(long, short = 'm', help = "Mutation rounds per pixel, 0 disables MLT [default: 0]")]
    pub mutations: Option<u32>,

    /// How many trailing vertices a mutation replaces
    #[arg(long, value_enum, help = "How many trailing vertices a mutation replaces [default: discrete]")]
    pub deletion: Option<DeletionStrategy>,

    /// Seed of the first frame
    #[arg(long, help = "Seed of the first frame [default: 0]")]
    pub seed: Option<u64>,

    /// Worker threads
    #[arg(long, short = 'j', help = "Worker threads, 0 uses every core [default: 0]")]
    pub threads: Option<usize>,

    /// Frames accumulated into the output
    #[arg(long, short = 'f', help = "Frames accumulated into the output [default: 1]")]
    pub frames: Option<u32>,

    /// Send image to TEV for real-time visualization
    #[arg(long, help = "Send image to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: PathBuf,
}

impl Args {
    /// Overwrite `settings` with every flag given on the command line.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(bounces) = self.bounces {
            settings.max_bounces = bounces;
        }
        if let Some(mutations) = self.mutations {
            settings.mutations = mutations;
        }
        if let Some(deletion) = self.deletion {
            settings.deletion = deletion;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        if let Some(frames) = self.frames {
            settings.frames = frames;
        }
    }

    /// TEV address to connect to, if the preview is enabled.
    pub fn tev_target(&self) -> Option<&str> {
        match (&self.tev_address, self.tev) {
            (Some(address), _) => Some(address),
            (None, true) => Some("localhost"),
            (None, false) => None,
        }
    }
}
