//! TUI Frontend (ratatui-based)
//!
//! This module implements the Frontend trait using ratatui for terminal rendering.
//! It wraps crossterm for event handling and terminal management.

pub mod app;
pub mod confetti;
pub mod header;
pub mod palette;
pub mod timezone_list;

pub use app::TuiFrontend;
