use clap::Parser;
use log::{error, info, warn};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use mltrace::accumulator::Accumulator;
use mltrace::camera::Camera;
use mltrace::config::RenderSettings;
use mltrace::output::{save_frame, OutputFormat, TevPreview};
use mltrace::renderer::Renderer;
use mltrace::scene::Scene;
use mltrace::Result;

/// Resolve settings: defaults, then the config file, then command line flags.
fn load_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.config {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    args.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn run(args: &Args) -> Result<()> {
    let settings = load_settings(args)?;
    // Fail on a bad extension before spending time on the render.
    OutputFormat::from_path(&args.output)?;

    info!(
        "Image resolution: {}x{}, samples per pixel: {}, bounces: {}",
        settings.width, settings.height, settings.samples_per_pixel, settings.max_bounces
    );
    if settings.mutations > 0 {
        info!(
            "Metropolis refinement: {} mutations per pixel, {:?} deletion",
            settings.mutations, settings.deletion
        );
    }

    let frames = settings.frames;
    let renderer = Renderer::new(Scene::showcase(), Camera::default(), settings)?.with_progress(true);
    info!("Using {} worker threads", renderer.num_threads());

    let (width, height) = (renderer.settings().width, renderer.settings().height);
    let mut tev = args.tev_target().and_then(|address| match TevPreview::connect(address, width, height) {
        Ok(preview) => Some(preview),
        Err(e) => {
            warn!("{}, continuing without preview", e);
            None
        }
    });

    let mut accumulator = Accumulator::new(width, height);
    let start = std::time::Instant::now();
    for frame_index in 0..frames {
        let frame = renderer.render_frame(frame_index)?;
        accumulator.add(&frame)?;

        if let Some(preview) = tev.as_mut() {
            if let Err(e) = preview.update(accumulator.image()) {
                warn!("{}, disabling preview", e);
                tev = None;
            }
        }
    }
    info!("{} frame(s) accumulated in {:.2?}", accumulator.frames(), start.elapsed());

    save_frame(accumulator.image(), &args.output)
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("mltrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
