//! Configuration schema types for `snow.toml`
//!
//! Every section is optional; missing values fall back to a 500x500 black
//! canvas with snowfall paused.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::parse_color;
use crate::texture::DEFAULT_PREFIX;

/// Canvas geometry and background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    #[serde(default = "default_side")]
    pub width: u32,
    /// Canvas height in pixels
    #[serde(default = "default_side")]
    pub height: u32,
    /// Width the spawn rate is calibrated for
    #[serde(default = "default_side")]
    pub reference_width: u32,
    /// Background fill as a hex color
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_side(),
            height: default_side(),
            reference_width: default_side(),
            background: default_background(),
        }
    }
}

fn default_side() -> u32 {
    500
}

fn default_background() -> String {
    "#000000".to_string()
}

/// Where the snowflake masks live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexturesConfig {
    /// Directory containing `<prefix>0.png`, `<prefix>1.png`, ...
    #[serde(default = "default_texture_dir")]
    pub dir: PathBuf,
    /// File name prefix of the masks
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for TexturesConfig {
    fn default() -> Self {
        Self { dir: default_texture_dir(), prefix: default_prefix() }
    }
}

fn default_texture_dir() -> PathBuf {
    PathBuf::from("resources")
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Simulation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnowfallConfig {
    /// Snowfall intensity in `[0, 1]`
    #[serde(default)]
    pub percent: f64,
    /// Seed for reproducible runs; entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Upper bound on live flakes; unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_particles: Option<usize>,
}

/// Headless rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Simulated duration in seconds
    #[serde(default = "default_seconds")]
    pub seconds: f64,
    /// Keep every n-th tick as an animation frame
    #[serde(default = "default_frame_step")]
    pub frame_step: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { seconds: default_seconds(), frame_step: default_frame_step() }
    }
}

fn default_seconds() -> f64 {
    10.0
}

fn default_frame_step() -> u32 {
    3
}

/// Root of `snow.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnowConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub textures: TexturesConfig,
    #[serde(default)]
    pub snowfall: SnowfallConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "canvas.width")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "snow.toml: '{}' {}", self.field, self.message)
    }
}

impl SnowConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message })
        };

        if self.canvas.width == 0 {
            push("canvas.width", "must be a positive integer".to_string());
        }
        if self.canvas.height == 0 {
            push("canvas.height", "must be a positive integer".to_string());
        }
        if self.canvas.reference_width == 0 {
            push("canvas.reference_width", "must be a positive integer".to_string());
        }
        if let Err(e) = parse_color(&self.canvas.background) {
            push("canvas.background", format!("is not a hex color: {}", e));
        }

        if self.textures.prefix.is_empty() {
            push("textures.prefix", "must be a non-empty string".to_string());
        }

        if !(0.0..=1.0).contains(&self.snowfall.percent) {
            push("snowfall.percent", "must be between 0 and 1".to_string());
        }
        if self.snowfall.max_particles == Some(0) {
            push("snowfall.max_particles", "must be a positive integer".to_string());
        }

        if !self.output.seconds.is_finite() || self.output.seconds < 0.0 {
            push("output.seconds", "must be a non-negative number".to_string());
        }
        if self.output.frame_step == 0 {
            push("output.frame_step", "must be a positive integer".to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: SnowConfig = toml::from_str("").expect("empty config is valid");
        assert_eq!(config, SnowConfig::default());
        assert_eq!(config.canvas.width, 500);
        assert_eq!(config.textures.prefix, "snowflake");
        assert_eq!(config.snowfall.percent, 0.0);
        assert!(config.is_valid());
    }

    #[test]
    fn test_full_config_parse() {
        let toml_str = r##"
[canvas]
width = 800
height = 600
reference_width = 500
background = "#101020"

[textures]
dir = "assets/flakes"
prefix = "flake"

[snowfall]
percent = 0.75
seed = 42
max_particles = 2000

[output]
seconds = 4.5
frame_step = 2
"##;
        let config: SnowConfig = toml::from_str(toml_str).expect("should parse full config");
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.canvas.background, "#101020");
        assert_eq!(config.textures.dir, PathBuf::from("assets/flakes"));
        assert_eq!(config.textures.prefix, "flake");
        assert_eq!(config.snowfall.percent, 0.75);
        assert_eq!(config.snowfall.seed, Some(42));
        assert_eq!(config.snowfall.max_particles, Some(2000));
        assert_eq!(config.output.seconds, 4.5);
        assert_eq!(config.output.frame_step, 2);
        assert!(config.is_valid());
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = SnowConfig::default();
        config.canvas.width = 0;
        config.canvas.background = "black".to_string();
        config.snowfall.percent = 1.5;
        config.output.frame_step = 0;

        let errors = config.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["canvas.width", "canvas.background", "snowfall.percent", "output.frame_step"]
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "canvas.height".to_string(),
            message: "must be a positive integer".to_string(),
        };
        assert_eq!(err.to_string(), "snow.toml: 'canvas.height' must be a positive integer");
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let result: Result<SnowConfig, _> = toml::from_str("[canvas]\nwidth = \"wide\"");
        assert!(result.is_err());
    }
}
