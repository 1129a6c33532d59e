//! Scrollable list of timezone cards.
//!
//! Each entry renders as a bordered card (countries as the title, then the
//! zone, local time and remaining time). The active card is highlighted and
//! the window of visible cards follows the selection so it stays in view.

use super::palette::Palette;
use crate::core::AppCore;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::ops::Range;

/// Three text rows plus top and bottom border
pub const CARD_HEIGHT: u16 = 5;

/// Range of entries to draw so that `selected` is visible.
///
/// The selected card is pinned to the top of the view, except near the end
/// of the list where the view stops scrolling to avoid empty space.
pub fn visible_window(selected: usize, len: usize, capacity: usize) -> Range<usize> {
    let capacity = capacity.max(1).min(len);
    let first = selected.min(len.saturating_sub(capacity));
    first..first + capacity
}

fn card_lines<'a>(core: &AppCore, index: usize, palette: &Palette) -> Vec<Line<'a>> {
    let zone = core
        .zones
        .get(index)
        .map(|tz| tz.zone().to_string())
        .unwrap_or_default();
    let local = core.local_time_for(index).unwrap_or_default();
    let remaining = core
        .remaining_for(index)
        .map(|r| r.to_string())
        .unwrap_or_default();

    let label = Style::default()
        .fg(palette.label)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(palette.text);

    vec![
        Line::from(vec![
            Span::styled("Timezone: ", label),
            Span::styled(zone, text),
        ]),
        Line::from(vec![
            Span::styled("Current Time: ", label),
            Span::styled(local, text),
        ]),
        Line::from(vec![
            Span::styled("Time until New Year: ", label),
            Span::styled(remaining, Style::default().fg(palette.countdown)),
        ]),
    ]
}

fn render_card(core: &AppCore, index: usize, palette: &Palette, area: Rect, buf: &mut Buffer) {
    let active = index == core.selected();
    let border_color = if active {
        palette.active_border
    } else {
        palette.border
    };
    let mut title_style = Style::default().fg(palette.title);
    if active {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let title = core
        .zones
        .get(index)
        .map(|tz| tz.countries_label())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(palette.border_type)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(format!(" {} ", title), title_style));

    Paragraph::new(card_lines(core, index, palette))
        .block(block)
        .render(area, buf);
}

pub fn render(core: &AppCore, palette: &Palette, area: Rect, buf: &mut Buffer) {
    if area.width < 3 || area.height < CARD_HEIGHT {
        return;
    }

    let capacity = usize::from(area.height / CARD_HEIGHT);
    let window = visible_window(core.selected(), core.zones.len(), capacity);

    for (slot, index) in window.enumerate() {
        let card = Rect::new(
            area.x,
            area.y + slot as u16 * CARD_HEIGHT,
            area.width,
            CARD_HEIGHT,
        );
        render_card(core, index, palette, card, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::{TimezoneEntry, TimezoneList};
    use chrono::{TimeZone, Utc};
    use ratatui::style::Color;

    fn core(len: usize) -> AppCore {
        let zones = TimezoneList::from_entries(
            (0..len)
                .map(|i| TimezoneEntry {
                    zone: format!("GMT+{}", i % 14),
                    countries: vec![format!("Country{}", i)],
                })
                .collect(),
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap();
        AppCore::new(Config::default(), zones, now)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_visible_window_follows_selection() {
        assert_eq!(visible_window(0, 10, 3), 0..3);
        assert_eq!(visible_window(4, 10, 3), 4..7);
        assert_eq!(visible_window(9, 10, 3), 7..10);
        assert_eq!(visible_window(2, 2, 5), 0..2);
        assert_eq!(visible_window(0, 4, 0), 0..1);
    }

    #[test]
    fn test_render_first_card() {
        let core = core(3);
        let palette = Palette::from_config(&core.config.ui);
        let area = Rect::new(0, 0, 50, CARD_HEIGHT * 2);
        let mut buf = Buffer::empty(area);
        render(&core, &palette, area, &mut buf);

        assert!(row_text(&buf, 0).contains("Country0"));
        assert!(row_text(&buf, 1).contains("Timezone: GMT+0"));
        assert!(row_text(&buf, 2).contains("Current Time: 12:00:00"));
        assert!(row_text(&buf, 3).contains("Time until New Year: 0d 12h 0m 0s"));
        assert!(row_text(&buf, CARD_HEIGHT).contains("Country1"));
        // Only two cards fit
        assert!(!(0..area.height).any(|y| row_text(&buf, y).contains("Country2")));
    }

    #[test]
    fn test_active_card_is_highlighted() {
        let mut core = core(3);
        core.ui_state.selection.jump_to(1);
        let palette = Palette::from_config(&core.config.ui);
        let area = Rect::new(0, 0, 50, CARD_HEIGHT * 3);
        let mut buf = Buffer::empty(area);
        render(&core, &palette, area, &mut buf);

        // Selection pinned to the top, but the list cannot scroll past its end
        assert!(row_text(&buf, 0).contains("Country0"));
        assert_eq!(buf[(0, CARD_HEIGHT)].fg, palette.active_border);
        assert_eq!(buf[(0, 0)].fg, palette.border);
        assert_ne!(palette.border, Color::Reset);
    }

    #[test]
    fn test_selection_scrolls_view() {
        let mut core = core(10);
        core.ui_state.selection.jump_to(6);
        let palette = Palette::from_config(&core.config.ui);
        let area = Rect::new(0, 0, 50, CARD_HEIGHT * 2);
        let mut buf = Buffer::empty(area);
        render(&core, &palette, area, &mut buf);
        assert!(row_text(&buf, 0).contains("Country6"));
        assert!(row_text(&buf, CARD_HEIGHT).contains("Country7"));
    }

    #[test]
    fn test_tiny_area_renders_nothing() {
        let core = core(2);
        let palette = Palette::from_config(&core.config.ui);
        let area = Rect::new(0, 0, 50, CARD_HEIGHT - 1);
        let mut buf = Buffer::empty(area);
        render(&core, &palette, area, &mut buf);
        assert!(row_text(&buf, 0).trim().is_empty());
    }
}
