//! Mouse-wheel debouncing.
//!
//! Terminals deliver a burst of wheel events per physical notch; only the
//! first one inside each cooldown window moves the selection.

use std::time::{Duration, Instant};

/// Direction of a wheel event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// Positive delta scrolls down, anything else up (browser wheel convention)
    pub fn from_delta(delta_y: i32) -> Self {
        if delta_y > 0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    pub fn step(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Suppresses repeated scroll events within a fixed cooldown window
#[derive(Debug, Clone)]
pub struct ScrollDebouncer {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl ScrollDebouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    /// Returns true if an event at `now` should be handled.
    /// Accepting restarts the cooldown window.
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}
