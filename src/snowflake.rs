//! A single simulated snowflake.
//!
//! Each flake falls at a depth-scaled speed while its drift direction takes a
//! bounded random walk. A gust overrides the drift direction and boosts its
//! speed; the boost decays back to 1 by a fixed step per tick.
//!
//! Depth runs from 0 (far: slow, small, faint) to 1 (near: fast, full size,
//! opaque) and is fixed for the flake's lifetime, as are its texture and tint.

use image::RgbaImage;
use rand::Rng;
use std::f64::consts::{PI, TAU};

use crate::compositor;
use crate::math::{clamp, lerp};
use crate::texture::TextureSet;

/// Base fall speed in pixels per second.
pub const FALL_SPEED: f64 = 100.0;
/// Base drift speed in pixels per second.
pub const DRIFT_SPEED: f64 = FALL_SPEED / 4.0;
/// Largest per-tick change of the drift angle (radians).
pub const MAX_ANGLE_DELTA: f64 = PI / 16.0;

pub const MIN_PARALLAX: f64 = 0.4;
pub const MAX_PARALLAX: f64 = 1.0;

/// Upper bound the gust multiplier decays within.
pub const MAX_STRENGTH: f64 = 2.0;
/// Gust multiplier lost per tick.
pub const DAMPENING: f64 = 0.01;

pub const MIN_TINT: f64 = 0.25;
pub const MAX_TINT: f64 = 1.0;

/// Per-flake attributes chosen at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlakeAttributes {
    /// Simulated distance, 0 = farthest, 1 = nearest
    pub depth: f64,
    /// Index into the [`TextureSet`]
    pub texture_index: usize,
    /// How strongly the tint is blended into the mask
    pub tint_strength: f64,
    /// Initial drift direction (radians)
    pub drift_angle: f64,
}

impl FlakeAttributes {
    /// Draw random attributes for a set of `texture_count` masks.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, texture_count: usize) -> Self {
        Self {
            depth: rng.gen::<f64>(),
            texture_index: if texture_count == 0 { 0 } else { rng.gen_range(0..texture_count) },
            tint_strength: lerp(MIN_TINT, MAX_TINT, rng.gen::<f64>()),
            drift_angle: rng.gen::<f64>() * TAU,
        }
    }
}

/// One falling snowflake.
#[derive(Debug, Clone)]
pub struct Snowflake {
    /// Center X in canvas coordinates
    x: f64,
    /// Center Y in canvas coordinates (grows downward)
    y: f64,
    depth: f64,
    texture_index: usize,
    tint_strength: f64,
    drift_angle: f64,
    gust_multiplier: f64,
}

impl Snowflake {
    /// Create a flake centered at `(x, y)` with random attributes.
    pub fn new<R: Rng + ?Sized>(x: f64, y: f64, texture_count: usize, rng: &mut R) -> Self {
        Self::with_attributes(x, y, FlakeAttributes::random(rng, texture_count))
    }

    /// Create a flake with explicit attributes.
    ///
    /// Depth and tint strength are clamped into their valid ranges.
    pub fn with_attributes(x: f64, y: f64, attrs: FlakeAttributes) -> Self {
        Self {
            x,
            y,
            depth: clamp(0.0, 1.0, attrs.depth),
            texture_index: attrs.texture_index,
            tint_strength: clamp(0.0, 1.0, attrs.tint_strength),
            drift_angle: attrs.drift_angle,
            gust_multiplier: 1.0,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Center position and depth.
    pub fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.depth)
    }

    pub fn texture_index(&self) -> usize {
        self.texture_index
    }

    pub fn tint_strength(&self) -> f64 {
        self.tint_strength
    }

    pub fn drift_angle(&self) -> f64 {
        self.drift_angle
    }

    pub fn gust_multiplier(&self) -> f64 {
        self.gust_multiplier
    }

    /// Speed factor for this flake's depth; nearer flakes move faster.
    pub fn parallax(&self) -> f64 {
        lerp(MIN_PARALLAX, MAX_PARALLAX, self.depth)
    }

    /// Step the flake forward by `dt` seconds and return its new position.
    ///
    /// The drift angle wanders and the gust boost decays even when `dt` is
    /// zero; a negative `dt` is treated as zero.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> (f64, f64, f64) {
        self.drift_angle += rng.gen_range(-MAX_ANGLE_DELTA..=MAX_ANGLE_DELTA);

        // Drift uses the boost before this tick's decay
        let speed = DRIFT_SPEED * self.gust_multiplier;
        let x_drift = speed * self.drift_angle.cos();
        let y_drift = speed * self.drift_angle.sin();

        self.gust_multiplier = clamp(1.0, MAX_STRENGTH, self.gust_multiplier - DAMPENING);

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let scale = self.parallax() * dt;
        self.x += x_drift * scale;
        self.y += (FALL_SPEED + y_drift) * scale;

        self.position()
    }

    /// Point the drift along `wind_angle` with the given speed multiplier.
    ///
    /// Callers clamp `strength`; it may exceed [`MAX_STRENGTH`] and is pulled
    /// back into range by the next [`advance`](Self::advance).
    pub fn apply_gust(&mut self, wind_angle: f64, strength: f64) {
        self.drift_angle = wind_angle;
        self.gust_multiplier = strength;
    }

    /// Composite this flake's mask: tinted, faded and scaled by depth.
    ///
    /// Returns `None` if the texture index is not in `textures`.
    pub fn render(&self, textures: &TextureSet) -> Option<RgbaImage> {
        let mask = textures.get(self.texture_index)?;
        Some(compositor::render_flake(mask, self.tint_strength, self.depth))
    }
}
