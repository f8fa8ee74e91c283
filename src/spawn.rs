//! Spawn-rate control.
//!
//! Snowfall intensity is a percentage in `[0, 1]`. It maps to a delay between
//! top-of-canvas spawns, measured in frames at [`REFERENCE_TICK_RATE`] and
//! scaled so a wider canvas receives proportionally more flakes.

use crate::math::{clamp, lerp};

/// Tick rate the spawn delays are calibrated against.
pub const REFERENCE_TICK_RATE: f64 = 60.0;
/// Delay at the lightest snowfall (5 seconds).
pub const MAX_SPAWN_DELAY: f64 = REFERENCE_TICK_RATE * 5.0;
/// Delay at the heaviest snowfall (half a second).
pub const MIN_SPAWN_DELAY: f64 = REFERENCE_TICK_RATE / 2.0;
/// Percentages below this stop spawning entirely.
pub const EPSILON: f64 = 0.000001;
/// Backlog kept beyond one full delay, in frames. A stalled host gets one
/// catch-up spawn, not the whole missed burst.
pub const MAX_BACKLOG_FRAMES: f64 = 1.0;

/// Frames between spawns for `percent` on a canvas `canvas_width` wide.
///
/// `percent` is clamped to `[0, 1]`; widths are clamped to at least 1.
pub fn spawn_delay(percent: f64, reference_width: f64, canvas_width: f64) -> f64 {
    let delay = lerp(MAX_SPAWN_DELAY, MIN_SPAWN_DELAY, clamp(0.0, 1.0, percent));
    delay * reference_width.max(1.0) / canvas_width.max(1.0)
}

/// Paces top-of-canvas spawns from elapsed simulation time.
///
/// The driver is paused while the percentage is below [`EPSILON`]. Pausing
/// only stops new spawns; it never touches flakes already falling.
#[derive(Debug, Clone)]
pub struct SpawnDriver {
    percent: f64,
    reference_width: f64,
    canvas_width: f64,
    delay: f64,
    /// Frames elapsed since the last spawn
    elapsed: f64,
}

impl SpawnDriver {
    /// Create a paused driver calibrated for `reference_width`.
    pub fn new(reference_width: f64) -> Self {
        let reference_width = reference_width.max(1.0);
        Self {
            percent: 0.0,
            reference_width,
            canvas_width: reference_width,
            delay: spawn_delay(0.0, reference_width, reference_width),
            elapsed: 0.0,
        }
    }

    /// Set the snowfall percentage, pausing or resuming as needed.
    pub fn set_percent(&mut self, percent: f64) {
        let percent = if percent.is_nan() { 0.0 } else { clamp(0.0, 1.0, percent) };
        let was_running = self.is_running();
        self.percent = percent;
        self.recalculate();

        match (was_running, self.is_running()) {
            (true, false) => {
                self.elapsed = 0.0;
                log::debug!("snowfall paused");
            }
            (false, true) => {
                log::debug!("snowfall resumed, one flake every {:.1} frames", self.delay)
            }
            _ => {}
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whether spawns are currently being released.
    pub fn is_running(&self) -> bool {
        self.percent >= EPSILON
    }

    /// Current delay between spawns, in reference frames.
    pub fn delay_frames(&self) -> f64 {
        self.delay
    }

    /// Track the canvas width; the delay shrinks as the canvas widens.
    pub fn resize(&mut self, canvas_width: f64) {
        let canvas_width = canvas_width.max(1.0);
        if canvas_width != self.canvas_width {
            self.canvas_width = canvas_width;
            self.recalculate();
        }
    }

    fn recalculate(&mut self) {
        self.delay = spawn_delay(self.percent, self.reference_width, self.canvas_width);
    }

    /// Account for `dt` seconds and return how many spawns are due.
    ///
    /// Negative or non-finite `dt` counts as zero. Long stalls are coalesced:
    /// the backlog never exceeds one delay plus [`MAX_BACKLOG_FRAMES`].
    pub fn advance(&mut self, dt: f64) -> usize {
        if !self.is_running() {
            return 0;
        }

        let frames = if dt.is_finite() { dt.max(0.0) * REFERENCE_TICK_RATE } else { 0.0 };
        self.elapsed = (self.elapsed + frames).min(self.delay + MAX_BACKLOG_FRAMES);
        let due = (self.elapsed / self.delay).floor();
        self.elapsed -= due * self.delay;
        due as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_spawn_delay_endpoints() {
        assert_eq!(spawn_delay(0.0, 500.0, 500.0), MAX_SPAWN_DELAY);
        assert_eq!(spawn_delay(1.0, 500.0, 500.0), MIN_SPAWN_DELAY);
        assert!((spawn_delay(0.5, 500.0, 500.0) - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_delay_scales_with_width() {
        let base = spawn_delay(0.5, 500.0, 500.0);
        assert!((spawn_delay(0.5, 500.0, 1000.0) - base / 2.0).abs() < 1e-9);
        assert!((spawn_delay(0.5, 500.0, 250.0) - base * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_spawn_delay_clamps_inputs() {
        assert_eq!(spawn_delay(-3.0, 500.0, 500.0), MAX_SPAWN_DELAY);
        assert_eq!(spawn_delay(4.0, 500.0, 500.0), MIN_SPAWN_DELAY);
        assert!(spawn_delay(1.0, 500.0, 0.0).is_finite());
    }

    #[test]
    fn test_new_driver_is_paused() {
        let mut driver = SpawnDriver::new(500.0);
        assert!(!driver.is_running());
        let total: usize = (0..600).map(|_| driver.advance(DT)).sum();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_full_snowfall_rate() {
        let mut driver = SpawnDriver::new(500.0);
        driver.set_percent(1.0);
        // One spawn per 30 frames
        let total: usize = (0..300).map(|_| driver.advance(DT)).sum();
        assert!((9..=10).contains(&total), "got {}", total);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut driver = SpawnDriver::new(500.0);
        driver.set_percent(0.5);
        assert!(driver.is_running());
        for _ in 0..100 {
            driver.advance(DT);
        }

        driver.set_percent(0.0);
        assert!(!driver.is_running());
        let total: usize = (0..300).map(|_| driver.advance(DT)).sum();
        assert_eq!(total, 0);

        driver.set_percent(0.5);
        // Accumulator was reset on pause, so the first spawn waits a full delay
        let first: usize = (0..164).map(|_| driver.advance(DT)).sum();
        assert_eq!(first, 0);
        let total: usize = (0..2).map(|_| driver.advance(DT)).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_resize_updates_delay() {
        let mut driver = SpawnDriver::new(500.0);
        driver.set_percent(1.0);
        driver.resize(1000.0);
        assert!((driver.delay_frames() - 15.0).abs() < 1e-9);
        driver.resize(0.0);
        assert!((driver.delay_frames() - 15000.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_stall_is_coalesced() {
        let mut driver = SpawnDriver::new(100.0);
        driver.set_percent(1.0);
        assert_eq!(driver.advance(2.0), 1);
        assert_eq!(driver.advance(1e9), 1);
    }

    #[test]
    fn test_tiny_delay_releases_several_per_tick() {
        let mut driver = SpawnDriver::new(100.0);
        driver.set_percent(1.0);
        // 30 frames * 100 / 12000 = 0.25 frames between spawns
        driver.resize(12000.0);
        let total: usize = (0..60).map(|_| driver.advance(DT)).sum();
        assert!((235..=240).contains(&total), "got {}", total);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let mut driver = SpawnDriver::new(500.0);
        driver.set_percent(1.0);
        assert_eq!(driver.advance(f64::INFINITY), 0);
        assert_eq!(driver.advance(f64::NAN), 0);
        assert_eq!(driver.advance(f64::NEG_INFINITY), 0);

        // Still paced normally afterwards
        let total: usize = (0..300).map(|_| driver.advance(DT)).sum();
        assert!((9..=10).contains(&total), "got {}", total);
    }

    #[test]
    fn test_spawning_continues_after_huge_step() {
        let mut driver = SpawnDriver::new(500.0);
        driver.set_percent(1.0);
        assert!(driver.advance(1e9) <= 1);
        let total: usize = (0..600).map(|_| driver.advance(DT)).sum();
        assert!((19..=21).contains(&total), "got {}", total);
    }

    #[test]
    fn test_nan_percent_pauses() {
        let mut driver = SpawnDriver::new(100.0);
        driver.set_percent(f64::NAN);
        assert!(!driver.is_running());
        assert_eq!(driver.percent(), 0.0);
    }
}
