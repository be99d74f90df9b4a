//! Match clock that excludes paused spans
//!
//! Timestamps are caller-supplied seconds (any monotonic origin), so the
//! clock is driven by the game loop's time source and stays testable.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchClock {
    started_at: Option<f64>,
    paused_at: Option<f64>,
    paused_total: f64,
}

impl MatchClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, now: f64) {
        *self = Self {
            started_at: Some(now),
            paused_at: None,
            paused_total: 0.0,
        };
    }

    pub fn pause(&mut self, now: f64) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += (now - paused_at).max(0.0);
        }
    }

    /// Active seconds since `start`, not counting pauses
    pub fn elapsed(&self, now: f64) -> f64 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        let until = self.paused_at.unwrap_or(now);
        (until - started_at - self.paused_total).max(0.0)
    }

    pub fn remaining(&self, now: f64, duration: f64) -> f64 {
        (duration - self.elapsed(now)).max(0.0)
    }

    /// Re-base the clock so that `remaining(now, duration) == remaining`.
    /// Used by a mirroring peer to follow the authoritative clock.
    pub fn sync_remaining(&mut self, now: f64, duration: f64, remaining: f64) {
        let elapsed = (duration - remaining).clamp(0.0, duration.max(0.0));
        let paused = self.paused_at.is_some();
        self.started_at = Some(now - elapsed);
        self.paused_total = 0.0;
        self.paused_at = paused.then_some(now);
    }
}
