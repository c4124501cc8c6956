#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Memory Game.

mod config;
mod scene;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use memory_game_rendering::{fit_board, Color, FeatureSet, Presentation, RenderingBackend};
use memory_game_rendering_macroquad::MacroquadBackend;
use memory_game_session::GameSession;

use crate::simulation::Simulation;

const WINDOW_TITLE: &str = "Memory Game";

/// Command-line flags accepted by the game.
#[derive(Debug, Parser)]
#[command(name = "memory-game")]
#[command(about = "Flip cards and match pairs before the clock or your moves run out")]
struct Args {
    /// TOML file overriding the level table and symbol pool
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for deterministic shuffles; drawn from the OS when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Disable all sound
    #[arg(long)]
    mute: bool,

    /// Directory holding `manifest.toml` with card textures and sounds
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Present frames as fast as possible
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,

    /// Log the measured frame rate once per second
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn vsync(&self) -> Option<bool> {
        match (self.vsync, self.no_vsync) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    fn features(&self) -> FeatureSet {
        if self.mute {
            FeatureSet::silent()
        } else {
            FeatureSet::full()
        }
    }
}

/// Entry point for the Memory Game command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (catalog, symbols) = config::load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("session seed {seed}");

    let session = GameSession::new(catalog, symbols, seed).with_layout(fit_board);
    let mut simulation = Simulation::new(session).context("level picker cannot be laid out")?;
    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from_rgb_u8(24, 28, 38),
        args.features(),
        simulation.initial_scene(),
    );

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_assets_dir(args.assets.clone());
    if let Some(enabled) = args.vsync() {
        backend = backend.with_vsync(enabled);
    }

    backend.run(presentation, move |dt, input, scene| {
        simulation.advance(dt, input, scene)
    })
}
