mod canvas;
mod script;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use touchspot::frame::{self, Output};
use touchspot::log::init_log;
use touchspot::{session_rng, ChannelPool, MarkerAssets, SceneController, TouchspotConfig};

use canvas::{Bitmap, GlyphText, SystemClock, TraceCanvas};
use script::ScriptSource;

/// Replays a recorded touch/mouse session through the contact tracker.
#[derive(Debug, Parser)]
#[command(name = "touchspot", version)]
struct Args {
    /// Input script, one `<ms> <event> [id x y]` per line.
    script: PathBuf,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for color assignment, overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => TouchspotConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TouchspotConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    init_log(&config.log);
    info!("Starting touchspot {}", env!("CARGO_PKG_VERSION"));

    let script = script::load(&args.script)?;

    let quit = Arc::new(AtomicBool::new(false));
    let ctrlc_quit = quit.clone();
    ctrlc::set_handler(move || {
        ctrlc_quit.store(true, Ordering::Relaxed);
    })
    .context("Failed to set Ctrl-C handler")?;

    let clock = SystemClock::new();
    let mixer = ChannelPool::new(
        clock,
        config.audio.channels,
        config.audio.begin_clip_ms,
        config.audio.end_clip_ms,
    );
    let mut scene = SceneController::new(
        config.palette(),
        session_rng(config.seed),
        mixer,
        config.surface(),
    );

    let mut canvas = TraceCanvas::new(config.surface());
    let mut text = GlyphText::new(config.label.font_size);
    let assets = MarkerAssets::new(Bitmap::new("marker", config.marker_size()));
    let mut events = ScriptSource::new(script, clock, quit);

    frame::run(
        &mut scene,
        &mut events,
        &clock,
        Output {
            renderer: &mut canvas,
            text: &mut text,
            assets: &assets,
        },
        config.frame.fps,
    );

    info!(
        "Presented {} frames, {} contacts still down",
        canvas.frames(),
        scene.registry().len()
    );
    Ok(())
}
