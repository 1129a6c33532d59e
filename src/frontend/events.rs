//! Frontend-agnostic input events.
//!
//! The TUI translates crossterm's event stream into this enum so the core
//! logic only handles one event shape.

use crossterm::event::{KeyCode, KeyModifiers, MouseEventKind};

/// Events emitted by the frontend, converted to one unified format
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// Keyboard input
    Key {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Mouse input
    Mouse {
        kind: MouseEventKind,
        x: u16,
        y: u16,
        modifiers: KeyModifiers,
    },
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Application quit signal
    Quit,
}

impl FrontendEvent {
    /// Create a key event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::Key { code, modifiers }
    }

    /// Create a mouse event
    pub fn mouse(kind: MouseEventKind, x: u16, y: u16, modifiers: KeyModifiers) -> Self {
        Self::Mouse {
            kind,
            x,
            y,
            modifiers,
        }
    }

    /// Create a resize event
    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    /// Create a quit event
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Wheel delta in browser convention (positive = down), if this is a wheel event
    pub fn wheel_delta(&self) -> Option<i32> {
        match self {
            Self::Mouse {
                kind: MouseEventKind::ScrollDown,
                ..
            } => Some(1),
            Self::Mouse {
                kind: MouseEventKind::ScrollUp,
                ..
            } => Some(-1),
            _ => None,
        }
    }
}
