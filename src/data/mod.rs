//! Data layer - Pure state without UI coupling
//!
//! Timezone records loaded at startup and the transient UI state.
//! NO imports from frontend/ or any rendering code.

pub mod timezone;
pub mod ui_state;

pub use timezone::{TimezoneEntry, TimezoneList};
pub use ui_state::UiState;
