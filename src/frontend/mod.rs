//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements.
//! It provides a narrow interface for rendering, sizing, and cleanup so the
//! event loop never touches ratatui directly.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
use std::time::Instant;

pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait - rendering side of the application
///
/// The Frontend trait separates rendering concerns from business logic.
/// Input arrives separately through the frontend's async event stream.
pub trait Frontend {
    /// Render the current application state
    ///
    /// Called once per frame. `instant` is the monotonic time of the frame,
    /// used to advance animations and decide whether the celebration shows.
    ///
    /// Note: Mutable reference to self is required because animations keep
    /// state between frames (e.g., confetti particle positions)
    fn render(&mut self, core: &AppCore, instant: Instant) -> Result<()>;

    /// True while an animation needs frames faster than the clock tick
    fn is_animating(&self) -> bool;

    /// Restore the terminal before the application exits
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size in characters
    fn size(&self) -> (u16, u16);
}
