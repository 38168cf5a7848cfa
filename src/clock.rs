//! Time accounting: the dilation-scaled challenge countdown and the driver's
//! fixed-cadence throttle.
//!
//! Both are plain data advanced by explicit `dt` values, never scheduled
//! callbacks, so a scripted sequence of deltas always produces the same
//! outcome.

use bevy::prelude::Resource;

/// Countdown for one challenge.
///
/// `remaining = budget + bonus − elapsed`, where `elapsed` accumulates real
/// milliseconds scaled by the dilation factor in effect for each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeClock {
    budget_ms: f64,
    bonus_ms: f64,
    elapsed_ms: f64,
}

impl ChallengeClock {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms,
            bonus_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    /// Add `dt_ms × dilation` to the elapsed time.  Returns `true` if the
    /// budget is now exhausted.
    pub fn advance(&mut self, dt_ms: f64, dilation: f64) -> bool {
        self.elapsed_ms += dt_ms * dilation;
        self.is_expired()
    }

    /// Extend the budget; bonuses never scale with dilation.
    pub fn add_bonus(&mut self, ms: f64) {
        self.bonus_ms += ms;
    }

    pub fn remaining_ms(&self) -> f64 {
        self.budget_ms + self.bonus_ms - self.elapsed_ms
    }

    /// Expired once elapsed strictly exceeds the extended budget.
    pub fn is_expired(&self) -> bool {
        self.remaining_ms() < 0.0
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn reset(&mut self, budget_ms: f64) {
        *self = Self::new(budget_ms);
    }
}

/// Fixed-cadence gate between a variable frame clock and the simulation.
///
/// Real time accumulates across polls; once a full frame period is available
/// the whole accumulated delta is handed out as a single step and only the
/// remainder modulo the period is carried.  Long stalls therefore become one
/// large step instead of a burst of catch-up steps.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FrameThrottle {
    frame_ms: f32,
    accumulated_ms: f32,
}

impl FrameThrottle {
    /// Gate on a frame period of `frame_ms` real milliseconds.
    pub fn new(frame_ms: f32) -> Self {
        Self {
            frame_ms,
            accumulated_ms: 0.0,
        }
    }

    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    pub fn poll(&mut self, elapsed_ms: f32) -> Option<f32> {
        self.accumulated_ms += elapsed_ms;
        if self.accumulated_ms < self.frame_ms {
            return None;
        }
        let delta = self.accumulated_ms;
        self.accumulated_ms %= self.frame_ms;
        Some(delta)
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(1000.0 / crate::constants::TARGET_FPS)
    }
}
