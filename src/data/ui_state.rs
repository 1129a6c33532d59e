//! UI State - clock, selection and display flags
//!
//! This module contains UI state that is independent of rendering.
//! The TUI frontend reads from these structures.

use crate::core::celebration::Celebration;
use crate::core::countdown::HourFormat;
use crate::core::scroll::ScrollDirection;
use chrono::{DateTime, Utc};

/// Application UI state
#[derive(Clone, Debug)]
pub struct UiState {
    /// Wall-clock timestamp, refreshed every tick
    pub now: DateTime<Utc>,

    /// Currently active timezone entry
    pub selection: Selection,

    /// 12/24-hour display flag
    pub hour_format: HourFormat,

    /// Confetti visibility window
    pub celebration: Celebration,
}

impl UiState {
    pub fn new(
        now: DateTime<Utc>,
        len: usize,
        hour_format: HourFormat,
        celebration: Celebration,
    ) -> Self {
        Self {
            now,
            selection: Selection::new(len),
            hour_format,
            celebration,
        }
    }
}

/// Selected index into the timezone list, always within `0..len`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    len: usize,
}

impl Selection {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn last(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// Move one entry, clamped to the list bounds. Returns true if it moved.
    pub fn advance(&mut self, direction: ScrollDirection) -> bool {
        self.move_by(direction.step())
    }

    /// Move by `delta` entries, clamped. Returns true if it moved.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let target = self.index.saturating_add_signed(delta).min(self.last());
        self.jump_to(target)
    }

    /// Select `index`, clamped. Returns true if it moved.
    pub fn jump_to(&mut self, index: usize) -> bool {
        let index = index.min(self.last());
        let moved = index != self.index;
        self.index = index;
        moved
    }

    pub fn top(&mut self) -> bool {
        self.jump_to(0)
    }

    pub fn bottom(&mut self) -> bool {
        self.jump_to(self.last())
    }
}
