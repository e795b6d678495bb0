//! posekit - headless pose playback preview
//!
//! Uploads each file named on the command line, plays it for the configured
//! preview duration and logs every frame change.

mod settings;

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use posekit_assets::{DirectorySource, FileReader};
use posekit_playback::{Viewer, ViewerEvent};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use settings::ViewerSettings;

/// Roughly one display refresh at 60 Hz
const CALLBACK_INTERVAL: Duration = Duration::from_millis(16);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let settings = ViewerSettings::load();

    if let Some(pos) = args.iter().position(|arg| arg == "--write-settings") {
        args.remove(pos);
        settings.save().context("Failed to save settings")?;
    }

    if args.is_empty() {
        info!("Usage: posekit [--write-settings] <model or pose files...>");
        return Ok(());
    }

    let source = DirectorySource::new(&settings.assets.base_path);
    let reader = FileReader::new().context("Failed to start background file reader")?;
    let mut viewer = Viewer::new(settings.viewer.clone(), source);
    let clock = Instant::now();
    log_events(&mut viewer);

    for file in &args {
        if let Err(e) = preview(&mut viewer, &reader, Path::new(file), &settings, clock) {
            warn!("{:#}", e);
        }
    }

    viewer.teardown();
    Ok(())
}

fn preview(
    viewer: &mut Viewer,
    reader: &FileReader,
    path: &Path,
    settings: &ViewerSettings,
    clock: Instant,
) -> Result<()> {
    info!("Loading {:?}", path);
    viewer.begin_upload(reader.read(path));

    let started = Instant::now();
    while viewer.is_loading() {
        if started.elapsed() > READ_TIMEOUT {
            anyhow::bail!("Timed out reading {:?}", path);
        }
        viewer.tick(clock.elapsed());
        thread::sleep(CALLBACK_INTERVAL);
    }
    log_events(viewer);

    let snapshot = viewer.snapshot();
    if let Some(error) = snapshot.error {
        anyhow::bail!("Could not show {:?}: {}", path, error);
    }
    info!(
        "Showing '{}' as {} with {} frames",
        snapshot.resource.name, snapshot.resource.format, snapshot.playback.total_frames
    );

    if let Some(color) = settings.preview.tint_color() {
        viewer.set_model_color(color);
    }

    if !viewer.play() {
        info!("Nothing to play for '{}'", snapshot.resource.name);
        return Ok(());
    }

    let until = Instant::now()
        .checked_add(settings.preview.duration())
        .context("Preview length is out of range")?;
    while Instant::now() < until {
        viewer.tick(clock.elapsed());
        log_events(viewer);
        thread::sleep(CALLBACK_INTERVAL);
    }
    viewer.pause();
    Ok(())
}

fn log_events(viewer: &mut Viewer) {
    for event in viewer.drain_events() {
        match event {
            ViewerEvent::ModelActivated { id, name } => info!("Activated '{}' ({})", name, id),
            ViewerEvent::ModelCleared => info!("Model cleared"),
            ViewerEvent::FrameApplied { frame, joints } => info!("Frame {} ({} joints)", frame, joints),
            ViewerEvent::SceneDirty => debug!("Scene needs redraw"),
            ViewerEvent::LoadFailed(message) => debug!("Load failed: {}", message),
        }
    }
}
