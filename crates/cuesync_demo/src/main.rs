// SPDX-License-Identifier: MIT OR Apache-2.0
//! `cuesync` demo - plays a playlist on a simulated media element.
//!
//! Annotations come from a playlist file or are generated, then shown and
//! hidden in step with a jittered playback clock:
//! - Playlist loading (RON or JSON)
//! - Synthetic annotation generation
//! - Sequential playback with track changes
//! - Show/hide logging

mod generator;
mod overlay;
mod player;
mod playlist;
mod simulation;

use anyhow::Context;
use clap::Parser;
use cuesync_core::SyncConfig;
use overlay::OverlayStats;
use player::SimulatedPlayer;
use playlist::Playlist;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Play annotated media sources on a simulated clock
#[derive(Parser, Debug)]
#[command(name = "cuesync_demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Playlist file (.ron or .json); sources without annotations get generated ones
    #[arg(long, short = 'p')]
    playlist: Option<PathBuf>,

    /// Sync config file (.ron)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of synthetic sources when no playlist is given
    #[arg(long, default_value_t = 5)]
    tracks: usize,

    /// Duration of each synthetic source, in seconds
    #[arg(long, default_value_t = 30.0)]
    duration: f64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Mean spacing between time updates, in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Upper bound on processed media events
    #[arg(long, default_value_t = 1_000_000)]
    max_events: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cuesync demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args) {
        tracing::error!("Demo failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SyncConfig::default(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut playlist = match &args.playlist {
        Some(path) => Playlist::load(path)
            .with_context(|| format!("loading playlist {}", path.display()))?,
        None => Playlist::synthetic(args.tracks, args.duration),
    };
    if playlist.is_empty() {
        anyhow::bail!("playlist has no sources");
    }
    playlist.fill_missing(&mut rng, config.max_annotations_per_track);
    tracing::info!(sources = playlist.len(), "Playlist ready");

    let stats = Rc::new(OverlayStats::default());
    let mut player = SimulatedPlayer::new(args.tick_ms as f64 / 1000.0);
    let mut session = simulation::build_session(&playlist, config, &stats, &mut player)
        .context("building annotation session")?;

    let summary = simulation::run(&mut session, &mut player, &mut rng, args.max_events)?;

    tracing::info!(
        ticks = summary.ticks,
        skipped = summary.skipped,
        advances = summary.advances,
        shown = summary.shown,
        hidden = summary.hidden,
        peak_visible = stats.peak_visible(),
        left_visible = stats.visible(),
        finished = summary.finished,
        "Playback complete"
    );
    Ok(())
}
