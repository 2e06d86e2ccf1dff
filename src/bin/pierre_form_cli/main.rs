// ABOUTME: Pierre Form CLI - inspect, validate, and replay exercise definitions
// ABOUTME: Lists bundled exercises, validates documents, and replays recorded pose traces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # List available exercises
//! pierre-form-cli list
//!
//! # Show presentation info for one exercise
//! pierre-form-cli info squat --json
//!
//! # Validate every definition (non-zero exit on any violation)
//! pierre-form-cli validate
//!
//! # Replay recorded traces and print session summaries
//! pierre-form-cli replay traces/squat_01.json traces/squat_02.json
//!
//! # Replay one trace with per-frame output as JSON
//! pierre-form-cli replay traces/curl.json --exercise hammer_curl --frames
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pierre_form_engine::config::EngineConfig;
use pierre_form_engine::definition::DefinitionLoader;
use pierre_form_engine::logging::{LogFormat, LoggingConfig};

#[derive(Parser)]
#[command(
    name = "pierre-form-cli",
    about = "Pierre Form Engine CLI",
    long_about = "Inspect, validate, and replay declarative exercise definitions."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Definitions directory override
    #[arg(long, global = true)]
    definitions_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// List available exercises
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show presentation info for an exercise
    Info {
        /// Exercise identifier (file stem)
        exercise: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate definitions (all when none are named)
    Validate {
        /// Exercise identifiers
        exercises: Vec<String>,
    },

    /// Replay recorded pose traces
    Replay {
        /// Trace files (JSON)
        #[arg(required = true)]
        traces: Vec<PathBuf>,

        /// Exercise to use when a trace does not name one
        #[arg(long)]
        exercise: Option<String>,

        /// Print every frame result, not just the summary
        #[arg(long)]
        frames: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env().with_format(LogFormat::Compact);
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = EngineConfig::from_env()?;
    if let Some(dir) = cli.definitions_dir {
        config.definitions_dir = dir;
    }
    let loader = DefinitionLoader::from_config(&config);

    match cli.command {
        Command::List { json } => commands::exercises::list(&loader, json)?,
        Command::Info { exercise, json } => commands::exercises::info(&loader, &exercise, json)?,
        Command::Validate { exercises } => {
            let failed = commands::exercises::validate(&loader, &exercises);
            if failed > 0 {
                anyhow::bail!("{failed} definition(s) failed validation");
            }
        }
        Command::Replay {
            traces,
            exercise,
            frames,
        } => commands::replay::run(&loader, &traces, exercise.as_deref(), frames)?,
    }

    Ok(())
}
