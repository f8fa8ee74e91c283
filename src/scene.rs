//! The snowfall facade a host drives once per frame.
//!
//! A host (window, headless renderer, test) owns one [`Snowfall`] and calls:
//!
//! - [`set_snowfall_percent`](Snowfall::set_snowfall_percent) from its
//!   intensity control
//! - [`spawn_at`](Snowfall::spawn_at) on click or press-and-hold
//! - [`apply_gust`](Snowfall::apply_gust) with consecutive pointer positions
//! - [`tick`](Snowfall::tick) from its frame timer
//! - [`renderables`](Snowfall::renderables) when painting
//!
//! Every mutating call takes `&mut self`. Hosts that drive the simulation from
//! several threads share it as a [`SharedSnowfall`].

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::{Arc, Mutex};

use crate::compositor::{self, Renderable};
use crate::field::SnowField;
use crate::spawn::{SpawnDriver, REFERENCE_TICK_RATE};

/// Nominal frames per second of the tick driver.
pub const TICK_RATE: f64 = REFERENCE_TICK_RATE;
/// Seconds per tick at [`TICK_RATE`].
pub const FRAME_DELTA_TIME: f64 = 1.0 / TICK_RATE;

/// A snowfall simulation shared between threads.
pub type SharedSnowfall = Arc<Mutex<Snowfall>>;

/// Simulation field plus the driver that feeds it new flakes.
pub struct Snowfall<R = StdRng> {
    field: SnowField<R>,
    spawner: SpawnDriver,
}

impl<R: Rng> Snowfall<R> {
    /// Wrap `field`; spawn rates are calibrated for a canvas
    /// `reference_width` pixels wide. Snowfall starts at 0%.
    pub fn new(field: SnowField<R>, reference_width: f64) -> Self {
        Self { field, spawner: SpawnDriver::new(reference_width) }
    }

    pub fn field(&self) -> &SnowField<R> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut SnowField<R> {
        &mut self.field
    }

    pub fn spawner(&self) -> &SpawnDriver {
        &self.spawner
    }

    /// Adjust the top-of-canvas spawn cadence; below a tiny epsilon spawning
    /// pauses until the percentage rises again.
    pub fn set_snowfall_percent(&mut self, percent: f64) {
        self.spawner.set_percent(percent);
    }

    pub fn snowfall_percent(&self) -> f64 {
        self.spawner.percent()
    }

    /// Spawn one flake centered at `(x, y)`.
    pub fn spawn_at(&mut self, x: f64, y: f64) -> bool {
        self.field.spawn_at(x, y)
    }

    /// Blow flakes along the pointer segment `p0..p1`.
    pub fn apply_gust(&mut self, p0: (f64, f64), p1: (f64, f64)) -> usize {
        self.field.apply_gust(p0, p1)
    }

    /// Advance one frame of `dt` seconds on a `width` x `height` canvas.
    ///
    /// Due top-of-canvas spawns are released first, then every flake moves and
    /// off-screen flakes are pruned.
    pub fn tick(&mut self, dt: f64, width: u32, height: u32) {
        let width = width as f64;
        self.spawner.resize(width);
        for _ in 0..self.spawner.advance(dt) {
            self.field.spawn_at_top(width);
        }
        self.field.tick(dt, width, height as f64);
    }

    /// Composited flakes for this frame.
    pub fn renderables(&self) -> Vec<Renderable> {
        self.field.renderables()
    }

    /// Draw the current state onto a fresh `width` x `height` canvas.
    pub fn render_frame(&self, width: u32, height: u32, background: Rgba<u8>) -> RgbaImage {
        compositor::draw_frame(width, height, background, &self.renderables())
    }
}

impl Snowfall<StdRng> {
    /// Move into a mutex for multi-threaded hosts.
    pub fn into_shared(self) -> SharedSnowfall {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureSet;

    fn snowfall(seed: u64) -> Snowfall {
        let textures =
            TextureSet::from_masks(vec![RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]))])
                .expect("non-empty set");
        Snowfall::new(SnowField::seeded(textures, seed), 500.0)
    }

    #[test]
    fn test_starts_paused() {
        let mut snow = snowfall(1);
        assert_eq!(snow.snowfall_percent(), 0.0);
        for _ in 0..600 {
            snow.tick(FRAME_DELTA_TIME, 500, 500);
        }
        assert!(snow.field().is_empty());
    }

    #[test]
    fn test_full_snowfall_spawns_at_top() {
        let mut snow = snowfall(2);
        snow.set_snowfall_percent(1.0);
        for _ in 0..31 {
            snow.tick(FRAME_DELTA_TIME, 500, 500);
        }
        assert_eq!(snow.field().len(), 1);
        let f = snow.field().iter().next().expect("one flake");
        assert!(f.y() < 0.0);
    }

    #[test]
    fn test_wider_canvas_spawns_more() {
        let mut narrow = snowfall(3);
        let mut wide = snowfall(3);
        narrow.set_snowfall_percent(1.0);
        wide.set_snowfall_percent(1.0);
        for _ in 0..120 {
            narrow.tick(FRAME_DELTA_TIME, 500, 2000);
            wide.tick(FRAME_DELTA_TIME, 1000, 2000);
        }
        assert!(wide.field().len() > narrow.field().len());
    }

    #[test]
    fn test_manual_spawn_and_render_frame() {
        let mut snow = snowfall(4);
        assert!(snow.spawn_at(10.0, 10.0));
        let frame = snow.render_frame(20, 20, Rgba([0, 0, 0, 255]));
        assert_eq!(frame.dimensions(), (20, 20));
        assert_eq!(snow.renderables().len(), 1);
    }

    #[test]
    fn test_shared_snowfall_across_threads() {
        let shared = snowfall(5).into_shared();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let mut snow = shared.lock().expect("lock not poisoned");
                        snow.spawn_at(100.0 + i as f64, 100.0);
                        snow.tick(FRAME_DELTA_TIME, 500, 500);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread finished");
        }
        let snow = shared.lock().expect("lock not poisoned");
        assert_eq!(snow.field().len(), 100);
    }
}
