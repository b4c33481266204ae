//! Time management utilities
//!
//! [`Timer`] drives per-frame work such as delayed pool returns;
//! [`SliceTimer`] bounds how long a single warmup slice may run.

use std::time::{Duration, Instant};

/// Frame clock, updated once per host tick
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta: Duration,
    total: Duration,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a timer whose first frame starts now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            total: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance to the next frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_frame);
        self.total += self.delta;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Length of the last frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time accumulated over every update
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of updates so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Deadline for one slice of cooperative work
///
/// A zero budget never runs out.
#[derive(Debug, Clone, Copy)]
pub struct SliceTimer {
    started: Instant,
    budget: Duration,
}

impl SliceTimer {
    /// Start a slice with the given budget
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Time spent in this slice
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether the slice has a budget at all
    pub fn is_bounded(&self) -> bool {
        !self.budget.is_zero()
    }

    /// Whether the budget is used up
    pub fn is_exhausted(&self) -> bool {
        self.is_bounded() && self.elapsed() >= self.budget
    }
}
