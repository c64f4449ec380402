//! Frame timing and pacing.
//!
//! [`Time`] is ticked by the engine at the start of each frame; callbacks
//! get the delta as their `dt`. [`FramePacer`] sleeps away whatever is left
//! of the frame budget at the end of each frame.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// When the engine started.
    startup: Instant,
    /// When the current frame started.
    frame_start: Instant,
    /// Duration of the previous frame, clamped.
    delta: Duration,
    /// Total time since startup.
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub(crate) fn starting_at(now: Instant) -> Self {
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start a new frame at `now`. The delta is capped at `max_delta`.
    pub(crate) fn tick(&mut self, now: Instant, max_delta: Duration) {
        self.delta = now.saturating_duration_since(self.frame_start).min(max_delta);
        self.frame_start = now;
        self.elapsed = now.saturating_duration_since(self.startup);
        self.frame_count += 1;
    }

    pub fn frame_start(&self) -> Instant {
        self.frame_start
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Seconds since startup; the clock systems compact against.
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS from the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

/// Sleeps to hold a target frame rate.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Duration,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            budget: Self::budget_for(target_fps),
        }
    }

    fn budget_for(target_fps: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        if target_fps == 0 {
            log::warn!("Ignoring target fps of 0");
            return;
        }
        self.budget = Self::budget_for(target_fps);
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// What is left of the budget after `spent`.
    pub fn remaining(&self, spent: Duration) -> Duration {
        self.budget.saturating_sub(spent)
    }

    /// Sleep until the budget of a frame that began at `frame_start` is used up.
    pub fn wait(&self, frame_start: Instant) {
        let remaining = self.remaining(frame_start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_measures_and_clamps() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        let max = Duration::from_millis(250);

        time.tick(start + Duration::from_millis(20), max);
        assert_eq!(time.delta(), Duration::from_millis(20));
        assert!((time.fps() - 50.0).abs() < 1e-3);

        time.tick(start + Duration::from_secs(3), max);
        assert_eq!(time.delta(), max);
        assert_eq!(time.elapsed(), Duration::from_secs(3));
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn pacer_budget() {
        let mut pacer = FramePacer::new(50);
        assert_eq!(pacer.budget(), Duration::from_millis(20));
        assert_eq!(pacer.remaining(Duration::from_millis(5)), Duration::from_millis(15));
        assert_eq!(pacer.remaining(Duration::from_millis(30)), Duration::ZERO);

        pacer.set_target_fps(0);
        assert_eq!(pacer.budget(), Duration::from_millis(20));
        pacer.set_target_fps(100);
        assert_eq!(pacer.budget(), Duration::from_millis(10));
    }
}
