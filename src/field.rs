//! The live collection of snowflakes.
//!
//! [`SnowField`] owns every flake together with the texture set and the random
//! source used to roll new flakes. All mutation (spawn, tick, gust) takes
//! `&mut self`, so the operations can never interleave.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::compositor::Renderable;
use crate::math::{clamp, distance, point_segment_distance};
use crate::snowflake::Snowflake;
use crate::texture::TextureSet;

/// Margin around the canvas, roughly half a flake.
pub const BORDER: f64 = 15.0;

pub const MIN_GUST_STRENGTH: f64 = 1.0;
pub const MAX_GUST_STRENGTH: f64 = 10.0;
/// Gust reach per unit of strength, in pixels.
pub const GUST_MARGIN: f64 = 6.0;

/// A wind streak between two pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gust {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// Speed multiplier handed to affected flakes
    pub strength: f64,
    /// Wind direction in radians
    pub wind_angle: f64,
}

impl Gust {
    /// Derive strength and direction from the segment `start..end`.
    ///
    /// Strength is the segment length clamped to
    /// `[MIN_GUST_STRENGTH, MAX_GUST_STRENGTH]`, so a zero-length segment is a
    /// minimum-strength gust rather than an error.
    pub fn between(start: (f64, f64), end: (f64, f64)) -> Self {
        let strength = clamp(MIN_GUST_STRENGTH, MAX_GUST_STRENGTH, distance(start, end));
        let wind_angle = (end.1 - start.1).atan2(end.0 - start.0);
        Self { start, end, strength, wind_angle }
    }

    /// Distance within which flakes are caught by this gust.
    pub fn reach(&self) -> f64 {
        GUST_MARGIN * self.strength
    }

    /// Whether a flake centered at `(x, y)` is inside the gust corridor.
    pub fn affects(&self, x: f64, y: f64) -> bool {
        point_segment_distance((x, y), self.start, self.end) < self.reach()
    }
}

/// Whether a flake centered at `(x, y)` has left a `width` x `height` canvas.
///
/// Flakes above the canvas are kept; they spawn there.
pub fn is_offscreen(x: f64, y: f64, width: f64, height: f64) -> bool {
    y > height || x < -BORDER || x > width + BORDER
}

/// Owner of all live snowflakes.
pub struct SnowField<R = StdRng> {
    flakes: Vec<Snowflake>,
    textures: TextureSet,
    rng: R,
    max_particles: Option<usize>,
}

impl SnowField<StdRng> {
    /// Create a field seeded from system entropy.
    pub fn new(textures: TextureSet) -> Self {
        Self::with_rng(textures, StdRng::from_entropy())
    }

    /// Create a field with a reproducible random sequence.
    pub fn seeded(textures: TextureSet, seed: u64) -> Self {
        Self::with_rng(textures, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SnowField<R> {
    /// Create a field drawing randomness from `rng`.
    pub fn with_rng(textures: TextureSet, rng: R) -> Self {
        Self { flakes: Vec::new(), textures, rng, max_particles: None }
    }

    /// Cap the number of live flakes; spawns beyond the cap are dropped.
    pub fn with_max_particles(mut self, max: Option<usize>) -> Self {
        self.max_particles = max;
        self
    }

    pub fn max_particles(&self) -> Option<usize> {
        self.max_particles
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snowflake> {
        self.flakes.iter()
    }

    /// Remove every flake.
    pub fn clear(&mut self) {
        self.flakes.clear();
    }

    /// Add an already constructed flake.
    ///
    /// Returns `false` if the particle cap is reached or the flake's texture
    /// index is outside the texture set.
    pub fn insert(&mut self, flake: Snowflake) -> bool {
        if flake.texture_index() >= self.textures.len() {
            log::warn!(
                "rejecting snowflake with texture {} (set has {})",
                flake.texture_index(),
                self.textures.len()
            );
            return false;
        }
        if let Some(max) = self.max_particles {
            if self.flakes.len() >= max {
                log::debug!("particle cap {} reached, dropping spawn", max);
                return false;
            }
        }
        self.flakes.push(flake);
        true
    }

    /// Spawn a flake centered at `(x, y)` with random depth, texture and tint.
    pub fn spawn_at(&mut self, x: f64, y: f64) -> bool {
        let flake = Snowflake::new(x, y, self.textures.len(), &mut self.rng);
        self.insert(flake)
    }

    /// Spawn a flake just above the canvas at a random horizontal position.
    pub fn spawn_at_top(&mut self, width: f64) -> bool {
        let x = self.rng.gen::<f64>() * width.max(0.0);
        self.spawn_at(x, -BORDER)
    }

    /// Advance every flake by `dt` seconds, then drop the ones that left the
    /// canvas. Returns the number of flakes removed.
    pub fn tick(&mut self, dt: f64, width: f64, height: f64) -> usize {
        for flake in &mut self.flakes {
            flake.advance(dt, &mut self.rng);
        }

        let before = self.flakes.len();
        self.flakes.retain(|f| !is_offscreen(f.x(), f.y(), width, height));
        let removed = before - self.flakes.len();
        if removed > 0 {
            log::trace!("pruned {} snowflake(s), {} live", removed, self.flakes.len());
        }
        removed
    }

    /// Blow every flake near the segment `start..end` along it.
    ///
    /// Returns the number of flakes affected.
    pub fn apply_gust(&mut self, start: (f64, f64), end: (f64, f64)) -> usize {
        let gust = Gust::between(start, end);
        let mut affected = 0;
        for flake in self.flakes.iter_mut().filter(|f| gust.affects(f.x(), f.y())) {
            flake.apply_gust(gust.wind_angle, gust.strength);
            affected += 1;
        }
        affected
    }

    /// Composite every live flake for drawing.
    ///
    /// The returned snapshot is owned; it stays valid while the field keeps
    /// ticking.
    pub fn renderables(&self) -> Vec<Renderable> {
        let textures = &self.textures;
        self.flakes
            .par_iter()
            .filter_map(|f| {
                f.render(textures).map(|img| Renderable::centered(img, f.x(), f.y(), f.depth()))
            })
            .collect()
    }
}
