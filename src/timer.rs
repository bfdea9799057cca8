use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_HISTORY: usize = 10;

/// Rolling history of frame durations, in seconds.
///
/// The history starts zero-filled, so `fps()` is infinite until enough
/// ticks have happened. Only use it for pacing and display.
pub struct FrameTimer {
    last: Instant,
    history: VecDeque<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last: Instant::now(),
            history: std::iter::repeat_n(0.0, capacity).collect(),
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        let duration = now.saturating_duration_since(self.last).as_secs_f64();
        self.last = now;
        self.history.pop_front();
        self.history.push_back(duration);
    }

    pub fn delta(&self) -> f64 {
        self.history.back().copied().unwrap_or(0.0)
    }

    pub fn delta_avg(&self) -> f64 {
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    pub fn fps(&self) -> f64 {
        1.0 / self.delta_avg()
    }

    /// How long to idle so the last frame plus the idle time fills `budget`.
    pub fn idle_time(&self, budget: Duration) -> Duration {
        let wait = budget.as_secs_f64() - self.delta();
        if wait > 0.0 {
            Duration::from_secs_f64(wait)
        } else {
            Duration::ZERO
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
