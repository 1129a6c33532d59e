//! Title bar: current local date/time plus the action hints.

use super::palette::Palette;
use crate::core::countdown::HourFormat;
use crate::core::AppCore;
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Rows the header occupies (two lines of text inside a bottom border)
pub const HEADER_HEIGHT: u16 = 3;

pub fn title_text(core: &AppCore) -> String {
    let pattern = match core.hour_format() {
        HourFormat::TwentyFour => "%Y-%m-%d %H:%M:%S",
        HourFormat::Twelve => "%Y-%m-%d %I:%M:%S %p",
    };
    let local = core.now().with_timezone(&Local);
    format!("New Years Countdown {}", local.format(pattern))
}

pub fn hint_text(core: &AppCore) -> String {
    let keys = &core.config.keybinds;
    format!(
        "[{}] {} | [{}] Next New Year | [{}] Back to Top | [{}] Confetti | [{}] Quit   {}/{}",
        keys.toggle_format,
        core.hour_format().toggle_label(),
        keys.next_new_year,
        keys.back_to_top,
        keys.confetti,
        keys.quit,
        core.selected() + 1,
        core.zones.len(),
    )
}

pub fn render(core: &AppCore, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            title_text(core),
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint_text(core), Style::default().fg(palette.label))),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.border)),
        )
        .render(area, buf);
}
