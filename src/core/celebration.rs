//! Midnight detection and the transient celebration flag.

use std::time::{Duration, Instant};

/// Celebration visibility window
#[derive(Debug, Clone)]
pub struct Celebration {
    duration: Duration,
    visible_until: Option<Instant>,
}

impl Celebration {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            visible_until: None,
        }
    }

    /// Show the celebration for the configured duration.
    /// Re-triggering while visible restarts the window.
    pub fn trigger(&mut self, now: Instant) {
        self.visible_until = Some(now + self.duration);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|until| now < until)
    }

    /// Clear the flag once the window has passed. Returns true when it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.visible_until {
            Some(until) if now >= until => {
                self.visible_until = None;
                true
            }
            _ => false,
        }
    }
}

/// Per-entry zero-crossing detection across ticks
#[derive(Debug, Clone, Default)]
pub struct ZeroCrossingDetector {
    previous: Vec<Option<i64>>,
}

impl ZeroCrossingDetector {
    pub fn new(len: usize) -> Self {
        Self {
            previous: vec![None; len],
        }
    }

    /// Record this tick's remaining seconds for entry `index`.
    ///
    /// Reports a New Year when the countdown sits exactly on zero, or when it
    /// jumped upward since the last tick (the zero second was skipped by a late
    /// tick). The zero tick and the following rollover count once.
    pub fn observe(&mut self, index: usize, remaining_secs: i64) -> bool {
        if index >= self.previous.len() {
            self.previous.resize(index + 1, None);
        }

        let previous = self.previous[index].replace(remaining_secs);
        match previous {
            None => remaining_secs == 0,
            Some(prev) if remaining_secs == 0 => prev != 0,
            Some(prev) => prev != 0 && remaining_secs > prev,
        }
    }

    /// Forget history, e.g. after the simulated clock jumps
    pub fn reset(&mut self) {
        self.previous.iter_mut().for_each(|p| *p = None);
    }
}
