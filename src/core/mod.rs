//! Core business logic layer
//!
//! Countdown arithmetic, scroll debouncing, midnight detection and the
//! AppCore state machine. NO imports from frontend rendering code.
//! Core updates data structures in the data layer, frontends read and render.

pub mod app_core;
pub mod celebration;
pub mod countdown;
pub mod scroll;

pub use app_core::AppCore;
