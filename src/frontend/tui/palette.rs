//! Resolved colors and border style for the TUI widgets.

use crate::config::{parse_hex_color, UiConfig};
use ratatui::style::Color;
use ratatui::widgets::BorderType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub border: Color,
    pub active_border: Color,
    pub title: Color,
    pub label: Color,
    pub text: Color,
    pub countdown: Color,
    pub border_type: BorderType,
}

impl Palette {
    pub fn from_config(ui: &UiConfig) -> Self {
        let color = |hex: &str, fallback: Color| {
            parse_hex_color(hex).unwrap_or_else(|| {
                tracing::warn!("Invalid color {:?}, using {:?}", hex, fallback);
                fallback
            })
        };

        Self {
            border: color(&ui.border_color, Color::Gray),
            active_border: color(&ui.active_border_color, Color::Yellow),
            title: color(&ui.title_color, Color::White),
            label: color(&ui.label_color, Color::Cyan),
            text: color(&ui.text_color, Color::White),
            countdown: color(&ui.countdown_color, Color::Green),
            border_type: parse_border_type(&ui.border_style),
        }
    }
}

fn parse_border_type(style: &str) -> BorderType {
    match style {
        "double" => BorderType::Double,
        "rounded" => BorderType::Rounded,
        "thick" => BorderType::Thick,
        _ => BorderType::Plain,
    }
}
