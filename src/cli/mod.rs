//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod render;
mod textures;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub use render::{parse_gust, parse_spawn, CliError, ScriptedEvent};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Snow - render falling snowflake animations
#[derive(Parser)]
#[command(name = "snow")]
#[command(about = "Snow - simulate drifting snowflakes and render them to GIF or PNG")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate snowfall and write the frames to a GIF (or the last frame to a PNG)
    Render {
        /// Output file; the extension picks the format (.gif or .png)
        #[arg(short, long)]
        output: PathBuf,

        /// Config file (default: snow.toml found from the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding snowflake0.png, snowflake1.png, ...
        #[arg(short, long)]
        textures: Option<PathBuf>,

        /// Texture file name prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Background color (#RGB, #RRGGBB, ...)
        #[arg(long)]
        background: Option<String>,

        /// Snowfall intensity 0.0-1.0
        #[arg(short, long)]
        percent: Option<f64>,

        /// Simulated duration in seconds
        #[arg(short, long)]
        seconds: Option<f64>,

        /// Random seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of live snowflakes
        #[arg(long)]
        max_particles: Option<usize>,

        /// Keep every n-th tick as a GIF frame
        #[arg(long)]
        frame_step: Option<u32>,

        /// Wind gust "x0,y0,x1,y1@SECONDS" (repeatable)
        #[arg(long = "gust", value_parser = parse_gust)]
        gusts: Vec<ScriptedEvent>,

        /// Manual spawn "x,y@SECONDS" (repeatable)
        #[arg(long = "spawn", value_parser = parse_spawn)]
        spawns: Vec<ScriptedEvent>,
    },

    /// List the snowflake textures that load from a directory
    Textures {
        /// Directory holding the masks
        dir: PathBuf,

        /// Texture file name prefix
        #[arg(long, default_value = crate::texture::DEFAULT_PREFIX)]
        prefix: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Initialize `env_logger`; `RUST_LOG` applies unless verbosity flags are given.
fn init_logging(verbose: u8, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if verbose > 0 {
        builder.filter_level(match verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if quiet {
        builder.filter_level(log::LevelFilter::Error);
    }

    // Already initialized when embedded in a test harness
    let _ = builder.try_init();
}

/// Run the CLI and return the process exit code
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Render {
            output,
            config,
            textures,
            prefix,
            width,
            height,
            background,
            percent,
            seconds,
            seed,
            max_particles,
            frame_step,
            gusts,
            spawns,
        } => {
            let overrides = crate::config::CliOverrides {
                width,
                height,
                background,
                texture_dir: textures,
                prefix,
                percent,
                seed,
                max_particles,
                seconds,
                frame_step,
            };
            render::run_render(&output, config.as_deref(), &overrides, gusts, spawns)
        }
        Commands::Textures { dir, prefix, json } => textures::run_textures(&dir, &prefix, json),
    }
}
