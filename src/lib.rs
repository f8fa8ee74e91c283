//! Snowfall - falling snowflake simulation and compositor
//!
//! This library provides:
//! - A particle simulation of drifting snowflakes with depth parallax and
//!   pointer-driven wind gusts
//! - Depth-aware compositing (tint, fade, scale) of snowflake mask textures
//! - A spawn-rate controller driven by a snowfall percentage
//! - Headless rendering to PNG and animated GIF

pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod field;
pub mod gif;
pub mod math;
pub mod output;
pub mod scene;
pub mod snowflake;
pub mod spawn;
pub mod texture;

pub use compositor::Renderable;
pub use field::SnowField;
pub use scene::{SharedSnowfall, Snowfall};
pub use snowflake::{FlakeAttributes, Snowflake};
pub use texture::{TextureError, TextureSet};
