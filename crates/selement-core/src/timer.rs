//! Frame-driven countdown timer
//!
//! All gameplay timers advance by the frame delta handed to `update`, never by
//! wall-clock time, so a simulation replays identically for the same inputs.

use serde::{Deserialize, Serialize};

/// Accumulated float error tolerated when comparing elapsed time to a duration.
/// Sixty additions of `1.0 / 60.0` do not sum to exactly `1.0`.
const TIMER_EPSILON: f32 = 1e-4;

/// Countdown that reports `finished` once `duration` seconds have been ticked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    /// Create a timer that finishes after `duration` seconds
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// A timer that is already finished (zero duration)
    pub fn finished_timer() -> Self {
        Self::new(0.0)
    }

    /// Advance the timer
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Restart with a new duration
    pub fn start(&mut self, duration: f32) {
        *self = Self::new(duration);
    }

    /// Restart with the current duration
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIMER_EPSILON >= self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds left before the timer finishes (never negative)
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::finished_timer()
    }
}
