use super::confetti::ConfettiOverlay;
use super::palette::Palette;
use super::{header, timezone_list};
use crate::core::AppCore;
use crate::frontend::{Frontend, FrontendEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::time::Instant;

/// TUI Frontend using ratatui
///
/// This frontend renders the application using ratatui (terminal UI library)
/// and reads input from crossterm's async event stream.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    events: EventStream,
    palette: Palette,
    confetti: ConfettiOverlay,
    restored: bool,
}

impl TuiFrontend {
    /// Create a new TUI frontend
    ///
    /// Initializes terminal in raw mode, enables mouse capture, and enters alternate screen.
    pub fn new(palette: Palette) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            events: EventStream::new(),
            palette,
            confetti: ConfettiOverlay::new(StdRng::from_entropy()),
            restored: false,
        })
    }

    /// Wait for the next input event.
    /// Yields `FrontendEvent::Quit` once the terminal event stream has closed.
    pub async fn next_event(&mut self) -> Result<FrontendEvent> {
        while let Some(event) = self.events.next().await {
            let event = event.context("Failed to read terminal event")?;
            if let Some(frontend_event) = Self::convert_event(event) {
                return Ok(frontend_event);
            }
        }
        tracing::warn!("Terminal event stream closed");
        Ok(FrontendEvent::quit())
    }

    /// Convert crossterm event to FrontendEvent
    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Mouse(mouse_event) => Some(FrontendEvent::mouse(
                mouse_event.kind,
                mouse_event.column,
                mouse_event.row,
                mouse_event.modifiers,
            )),
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }

    fn restore_terminal(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to restore terminal")?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Frontend for TuiFrontend {
    fn render(&mut self, core: &AppCore, instant: Instant) -> Result<()> {
        let (width, height) = self.size();
        let full = Rect::new(0, 0, width, height);
        self.confetti.update(
            core.celebration_visible(instant),
            &core.config.celebration,
            instant,
            full,
        );

        let palette = self.palette;
        let confetti = self.confetti.burst();

        self.terminal.draw(|f| {
            let area = f.area();
            let header_height = header::HEADER_HEIGHT.min(area.height);
            let header_area = Rect::new(area.x, area.y, area.width, header_height);
            let list_area = Rect::new(
                area.x,
                area.y + header_height,
                area.width,
                area.height - header_height,
            );

            header::render(core, &palette, header_area, f.buffer_mut());
            timezone_list::render(core, &palette, list_area, f.buffer_mut());

            if let Some(confetti) = confetti {
                confetti.render(f.buffer_mut());
            }
        })?;

        Ok(())
    }

    fn is_animating(&self) -> bool {
        self.confetti.is_animating()
    }

    fn cleanup(&mut self) -> Result<()> {
        self.restore_terminal()
    }

    fn size(&self) -> (u16, u16) {
        self.terminal
            .size()
            .map(|size| (size.width, size.height))
            .unwrap_or((80, 24))
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        if let Err(e) = self.restore_terminal() {
            tracing::error!("Failed to restore terminal on drop: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventState, KeyModifiers, MouseEvent, MouseEventKind,
    };

    #[test]
    fn test_convert_key_press_only() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE));
        assert_eq!(
            TuiFrontend::convert_event(press),
            Some(FrontendEvent::key(KeyCode::Char('t'), KeyModifiers::NONE))
        );

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(TuiFrontend::convert_event(release), None);
    }

    #[test]
    fn test_convert_mouse_and_resize() {
        let wheel = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        });
        let converted = TuiFrontend::convert_event(wheel).unwrap();
        assert_eq!(converted.wheel_delta(), Some(1));

        assert_eq!(
            TuiFrontend::convert_event(Event::Resize(100, 30)),
            Some(FrontendEvent::resize(100, 30))
        );
        assert_eq!(TuiFrontend::convert_event(Event::FocusGained), None);
    }
}
