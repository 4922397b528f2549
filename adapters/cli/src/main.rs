#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Path Puzzle sessions headlessly.

mod animator;
mod config;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use path_puzzle_core::{LevelSpec, SessionConfig};
use path_puzzle_system_controls::Button;
use path_puzzle_system_level_compiler::{build_grid, LevelCatalog};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

/// Command-line arguments for the Path Puzzle adapter.
#[derive(Debug, Parser)]
#[command(name = "path-puzzle", about = "Program the path, then watch it run")]
struct CliArgs {
    /// Session configuration TOML; `path-puzzle.toml` is used when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level pack TOML replacing the embedded levels.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a script of button taps against the session.
    Play {
        /// Taps in order: forward, left, right, context (go) or undo.
        #[arg(required = true, value_name = "TAP")]
        taps: Vec<Button>,
        /// Simulated frame length in milliseconds.
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,
        /// Frames allowed for the session to settle after each tap.
        #[arg(long, default_value_t = 10_000)]
        max_frames: usize,
    },
    /// Lists the levels in the pack with their start and goal cells.
    Levels,
}

/// Entry point for the Path Puzzle command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = resolve_config(&args)?;
    let levels = config::load_levels(args.levels.as_deref())?;

    match args.command {
        CliCommand::Play {
            taps,
            frame_ms,
            max_frames,
        } => {
            let session = Session::new(
                config,
                levels,
                Duration::from_millis(frame_ms),
                max_frames,
            )?;
            let outcome = session.play(&taps).context("scripted session failed")?;
            let progress = outcome.progress;
            println!(
                "level {} {}: facing {} at {} with {}/{} blocks used",
                progress.level_index + 1,
                progress.state,
                progress.facing,
                progress.position,
                progress.blocks_used,
                progress.blocks_used + progress.blocks_available,
            );
            println!(
                "levels completed: {}, rejected commands: {}, yaw {:.0}, character {}",
                outcome.completed,
                outcome.rejected,
                progress.yaw_degrees,
                if outcome.visible { "shown" } else { "hidden" },
            );
        }
        CliCommand::Levels => list_levels(&config, levels)?,
    }

    Ok(())
}

fn resolve_config(args: &CliArgs) -> Result<SessionConfig> {
    if args.config.is_some() {
        return config::load_config(args.config.as_deref());
    }
    let fallback = config::default_config_path();
    if fallback.exists() {
        config::load_config(Some(&fallback))
    } else {
        config::load_config(None)
    }
}

fn list_levels(config: &SessionConfig, levels: Vec<LevelSpec>) -> Result<()> {
    config.validate()?;
    let grid = build_grid(config.half_extent, config.increment);
    let catalog = LevelCatalog::load(levels, grid, config.platform_slots)?;

    let mut level = catalog.compile_first()?;
    loop {
        println!(
            "level {}: facing {}, {} platforms, start {} goal {}, {} hazards",
            level.index() + 1,
            level.facing(),
            level.path().len(),
            level.path().start(),
            level.path().goal(),
            level.hazards().len(),
        );
        if catalog.next_index(level.index()) == 0 {
            return Ok(());
        }
        level = catalog.compile_next(level.index())?;
    }
}
