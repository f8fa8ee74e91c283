//! CLI dispatch for the `snow render` command.
//!
//! Drives a [`Snowfall`] at the nominal tick rate, replays scripted gusts and
//! manual spawns at their timestamps, and streams frames to the output file.

use std::path::Path;
use std::process::ExitCode;

use thiserror::Error;

use crate::color::{parse_color, ColorError};
use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, SnowConfig};
use crate::field::SnowField;
use crate::gif::GifWriter;
use crate::output::{save_png, OutputError, OutputFormat};
use crate::scene::{Snowfall, FRAME_DELTA_TIME, TICK_RATE};
use crate::texture::{TextureError, TextureSet};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Error parsing a `--gust` or `--spawn` argument
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CliError {
    #[error("'{0}' is missing '@SECONDS'")]
    MissingTime(String),
    #[error("'{input}': '{value}' is not a number")]
    BadNumber { input: String, value: String },
    #[error("'{input}': expected {expected} coordinates, found {found}")]
    WrongArity { input: String, expected: usize, found: usize },
    #[error("'{0}': time must be a non-negative number of seconds")]
    BadTime(String),
}

/// What a scripted event does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedAction {
    /// Pointer swept from `start` to `end`
    Gust { start: (f64, f64), end: (f64, f64) },
    /// Click at `(x, y)`
    Spawn { x: f64, y: f64 },
}

/// An interaction replayed at a point in simulated time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedEvent {
    /// Seconds from the start of the run
    pub at: f64,
    pub action: ScriptedAction,
}

impl ScriptedEvent {
    /// Tick index the event fires before.
    pub fn tick(&self) -> u64 {
        (self.at * TICK_RATE).round() as u64
    }
}

/// Split `"a,b,...@t"` into `expected` coordinates and a time.
fn parse_coordinates(input: &str, expected: usize) -> Result<(Vec<f64>, f64), CliError> {
    let (coords, time) =
        input.rsplit_once('@').ok_or_else(|| CliError::MissingTime(input.to_string()))?;

    let number = |value: &str| -> Result<f64, CliError> {
        value.trim().parse::<f64>().map_err(|_| CliError::BadNumber {
            input: input.to_string(),
            value: value.trim().to_string(),
        })
    };

    let values = coords.split(',').map(number).collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(CliError::WrongArity {
            input: input.to_string(),
            expected,
            found: values.len(),
        });
    }

    let at = number(time)?;
    if !at.is_finite() || at < 0.0 {
        return Err(CliError::BadTime(input.to_string()));
    }
    Ok((values, at))
}

/// Parse a `--gust` argument: `x0,y0,x1,y1@SECONDS`.
pub fn parse_gust(input: &str) -> Result<ScriptedEvent, CliError> {
    let (v, at) = parse_coordinates(input, 4)?;
    Ok(ScriptedEvent {
        at,
        action: ScriptedAction::Gust { start: (v[0], v[1]), end: (v[2], v[3]) },
    })
}

/// Parse a `--spawn` argument: `x,y@SECONDS`.
pub fn parse_spawn(input: &str) -> Result<ScriptedEvent, CliError> {
    let (v, at) = parse_coordinates(input, 2)?;
    Ok(ScriptedEvent { at, action: ScriptedAction::Spawn { x: v[0], y: v[1] } })
}

/// Error while rendering
#[derive(Debug, Error)]
pub(crate) enum RenderError {
    #[error("{0}")]
    Texture(#[from] TextureError),
    #[error("invalid background: {0}")]
    Color(#[from] ColorError),
    #[error("{0}")]
    Output(#[from] OutputError),
}

/// Counters reported after a run.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct RenderSummary {
    pub ticks: u64,
    pub frames: usize,
    pub live: usize,
    pub peak: usize,
}

/// Execute the render command.
pub fn run_render(
    output: &Path,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    gusts: Vec<ScriptedEvent>,
    spawns: Vec<ScriptedEvent>,
) -> ExitCode {
    let Some(format) = OutputFormat::from_path(output) else {
        eprintln!("Error: output '{}' must end in .gif or .png", output.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in errors {
            eprintln!("Error: {}", e);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut events: Vec<ScriptedEvent> = gusts.into_iter().chain(spawns).collect();
    events.sort_by_key(ScriptedEvent::tick);

    match render(&config, format, output, &events) {
        Ok(summary) => {
            println!(
                "Rendered {} ({} tick(s), {} frame(s), {} snowflake(s) live, peak {})",
                output.display(),
                summary.ticks,
                summary.frames,
                summary.live,
                summary.peak
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Build the scene described by `config`.
pub(crate) fn build_snowfall(config: &SnowConfig) -> Result<Snowfall, RenderError> {
    let textures = TextureSet::load(&config.textures.dir, &config.textures.prefix)?;
    let field = match config.snowfall.seed {
        Some(seed) => SnowField::seeded(textures, seed),
        None => SnowField::new(textures),
    }
    .with_max_particles(config.snowfall.max_particles);

    let mut snow = Snowfall::new(field, config.canvas.reference_width as f64);
    snow.set_snowfall_percent(config.snowfall.percent);
    Ok(snow)
}

/// Run the simulation and write `output`.
pub(crate) fn render(
    config: &SnowConfig,
    format: OutputFormat,
    output: &Path,
    events: &[ScriptedEvent],
) -> Result<RenderSummary, RenderError> {
    let background = parse_color(&config.canvas.background)?;
    let (width, height) = (config.canvas.width, config.canvas.height);
    let step = u64::from(config.output.frame_step.max(1));

    let mut snow = build_snowfall(config)?;
    let total_ticks = (config.output.seconds * TICK_RATE).round() as u64;

    let mut writer = match format {
        OutputFormat::Gif => {
            let frame_ms = (1000.0 * step as f64 / TICK_RATE).round() as u32;
            Some(GifWriter::create(output, frame_ms)?)
        }
        OutputFormat::Png => None,
    };

    log::info!(
        "simulating {} tick(s) on {}x{} at {:.0}% snowfall",
        total_ticks,
        width,
        height,
        snow.snowfall_percent() * 100.0
    );

    let mut summary = RenderSummary { ticks: total_ticks, ..Default::default() };
    let mut pending = events.iter().peekable();

    for tick in 0..total_ticks {
        while let Some(event) = pending.next_if(|e| e.tick() <= tick) {
            match event.action {
                ScriptedAction::Gust { start, end } => {
                    let hit = snow.apply_gust(start, end);
                    log::debug!(
                        "tick {}: gust {:?} -> {:?} moved {} flake(s)",
                        tick,
                        start,
                        end,
                        hit
                    );
                }
                ScriptedAction::Spawn { x, y } => {
                    snow.spawn_at(x, y);
                }
            }
        }

        snow.tick(FRAME_DELTA_TIME, width, height);
        summary.peak = summary.peak.max(snow.field().len());

        if let Some(w) = writer.as_mut() {
            if tick % step == 0 {
                w.write_frame(&snow.render_frame(width, height, background))?;
            }
        }
    }

    let unused = pending.count();
    if unused > 0 {
        log::warn!("{} scripted event(s) fall after the end of the run", unused);
    }

    match writer {
        Some(mut w) => {
            if w.frame_count() == 0 {
                w.write_frame(&snow.render_frame(width, height, background))?;
            }
            summary.frames = w.finish();
        }
        None => {
            save_png(&snow.render_frame(width, height, background), output)?;
            summary.frames = 1;
        }
    }

    summary.live = snow.field().len();
    Ok(summary)
}
