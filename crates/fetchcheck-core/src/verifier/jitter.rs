//! Randomized pre-fetch delay so workers don't hit the proxy in lockstep.

use crate::config::JitterConfig;
use rand::Rng;
use std::time::Duration;

/// Uniform delay in `[min, max)`; a degenerate range always yields `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    min: Duration,
    max: Duration,
}

impl Jitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }
}

impl From<JitterConfig> for Jitter {
    fn from(cfg: JitterConfig) -> Self {
        Jitter::new(
            Duration::from_millis(cfg.min_ms),
            Duration::from_millis(cfg.max_ms),
        )
    }
}
