//! Configuration loading and discovery for `snow.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SnowConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "snow.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse snow.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<String>,
    pub texture_dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub percent: Option<f64>,
    pub seed: Option<u64>,
    pub max_particles: Option<usize>,
    pub seconds: Option<f64>,
    pub frame_step: Option<u32>,
}

/// Find snow.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for snow.toml
/// 2. Check XDG_CONFIG_HOME/snowfall/snow.toml (or ~/.config/snowfall/snow.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find snow.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("snowfall").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find snow.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a snow.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
///
/// A relative `textures.dir` in a loaded file is resolved against the file's
/// directory.
pub fn load_config(path: Option<&Path>) -> Result<SnowConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(SnowConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<SnowConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: SnowConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.textures.dir = resolve_path(root, &config.textures.dir);
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SnowConfig, overrides: &CliOverrides) {
    if let Some(width) = overrides.width {
        config.canvas.width = width;
    }
    if let Some(height) = overrides.height {
        config.canvas.height = height;
    }
    if let Some(ref background) = overrides.background {
        config.canvas.background = background.clone();
    }

    if let Some(ref dir) = overrides.texture_dir {
        config.textures.dir = dir.clone();
    }
    if let Some(ref prefix) = overrides.prefix {
        config.textures.prefix = prefix.clone();
    }

    if let Some(percent) = overrides.percent {
        config.snowfall.percent = percent;
    }
    if overrides.seed.is_some() {
        config.snowfall.seed = overrides.seed;
    }
    if overrides.max_particles.is_some() {
        config.snowfall.max_particles = overrides.max_particles;
    }

    if let Some(seconds) = overrides.seconds {
        config.output.seconds = seconds;
    }
    if let Some(frame_step) = overrides.frame_step {
        config.output.frame_step = frame_step;
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
