//! Configuration loader plus strongly typed settings structures.
//!
//! Deserializes `config.toml` (countdown timing, celebration physics, colors,
//! keybinds), extracts the embedded defaults on first run and resolves the
//! data directory that also holds the log file.

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "NEWYEAR_COUNTDOWN_DIR";

/// Top-level configuration object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Optional JSON list replacing the bundled timezones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezones_file: Option<PathBuf>,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub celebration: CelebrationConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keybinds: KeybindConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_use_24_hour")]
    pub use_24_hour: bool,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_scroll_cooldown_ms")]
    pub scroll_cooldown_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            use_24_hour: default_use_24_hour(),
            tick_ms: default_tick_ms(),
            scroll_cooldown_ms: default_scroll_cooldown_ms(),
        }
    }
}

impl CountdownConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn scroll_cooldown(&self) -> Duration {
        Duration::from_millis(self.scroll_cooldown_ms)
    }
}

/// Confetti physics, expressed in the units of the browser confetti library
/// (pixels per frame at 60 FPS). The TUI scales them down to cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrationConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default = "default_pieces")]
    pub pieces: usize,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_initial_velocity_y")]
    pub initial_velocity_y: f32,
    #[serde(default = "default_wind")]
    pub wind: f32,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            pieces: default_pieces(),
            gravity: default_gravity(),
            initial_velocity_y: default_initial_velocity_y(),
            wind: default_wind(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl CelebrationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.frame_rate.clamp(1, 120)))
    }
}

/// Colors are hex strings ("#rrggbb"); see [`parse_hex_color`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default = "default_active_border_color")]
    pub active_border_color: String,
    #[serde(default = "default_title_color")]
    pub title_color: String,
    #[serde(default = "default_label_color")]
    pub label_color: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_countdown_color")]
    pub countdown_color: String,
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            border_color: default_border_color(),
            active_border_color: default_active_border_color(),
            title_color: default_title_color(),
            label_color: default_label_color(),
            text_color: default_text_color(),
            countdown_color: default_countdown_color(),
            border_style: default_border_style(),
        }
    }
}

/// Actions reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleFormat,
    NextNewYear,
    BackToTop,
    Confetti,
    SelectUp,
    SelectDown,
    PageUp,
    PageDown,
    SelectLast,
    None,
}

/// Configurable keybinds (action -> key string such as "ctrl+c" or "home")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    #[serde(default = "default_key_toggle_format")]
    pub toggle_format: String,
    #[serde(default = "default_key_next_new_year")]
    pub next_new_year: String,
    #[serde(default = "default_key_back_to_top")]
    pub back_to_top: String,
    #[serde(default = "default_key_confetti")]
    pub confetti: String,
    #[serde(default = "default_key_select_up")]
    pub select_up: String,
    #[serde(default = "default_key_select_down")]
    pub select_down: String,
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            toggle_format: default_key_toggle_format(),
            next_new_year: default_key_next_new_year(),
            back_to_top: default_key_back_to_top(),
            confetti: default_key_confetti(),
            select_up: default_key_select_up(),
            select_down: default_key_select_down(),
        }
    }
}

impl KeybindConfig {
    /// Resolve a key press to an action.
    ///
    /// Configured binds are checked first, then the fixed fallbacks
    /// (Esc / Ctrl+C quit, vi-style j/k, paging keys).
    pub fn resolve_action(&self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        let configured = [
            (&self.quit, KeyAction::Quit),
            (&self.toggle_format, KeyAction::ToggleFormat),
            (&self.next_new_year, KeyAction::NextNewYear),
            (&self.back_to_top, KeyAction::BackToTop),
            (&self.confetti, KeyAction::Confetti),
            (&self.select_up, KeyAction::SelectUp),
            (&self.select_down, KeyAction::SelectDown),
        ];

        let (code, modifiers) = normalize_shift(code, modifiers);

        for (key_str, action) in configured {
            let bind = parse_key_string(key_str).map(|(c, m)| normalize_shift(c, m));
            if bind == Some((code, modifiers)) {
                return action;
            }
        }

        match (code, modifiers) {
            (KeyCode::Esc, _) => KeyAction::Quit,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => KeyAction::SelectUp,
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => KeyAction::SelectDown,
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => KeyAction::BackToTop,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => KeyAction::SelectLast,
            (KeyCode::PageUp, _) => KeyAction::PageUp,
            (KeyCode::PageDown, _) => KeyAction::PageDown,
            _ => KeyAction::None,
        }
    }

    /// Log any keybind string that will never match
    pub fn warn_invalid(&self) {
        let all = [
            ("quit", &self.quit),
            ("toggle_format", &self.toggle_format),
            ("next_new_year", &self.next_new_year),
            ("back_to_top", &self.back_to_top),
            ("confetti", &self.confetti),
            ("select_up", &self.select_up),
            ("select_down", &self.select_down),
        ];
        for (action, key_str) in all {
            if parse_key_string(key_str).is_none() {
                tracing::warn!("Keybind for '{}' is not a valid key: {:?}", action, key_str);
            }
        }
    }
}

/// Fold Shift into the character itself: "shift+g", "G" and a shifted 'g'
/// press all become `Char('G')` without modifiers
fn normalize_shift(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::SHIFT) => (
            KeyCode::Char(c.to_ascii_uppercase()),
            modifiers.difference(KeyModifiers::SHIFT),
        ),
        _ => (code, modifiers),
    }
}

/// Parse a key string like "ctrl+f" or "home" into KeyCode and KeyModifiers
pub fn parse_key_string(key_str: &str) -> Option<(KeyCode, KeyModifiers)> {
    let parts: Vec<&str> = key_str.split('+').collect();
    let mut modifiers = KeyModifiers::empty();
    let mut key_part = key_str;

    // A lone "+" is the plus key, not a separator
    if parts.len() > 1 && key_str != "+" {
        for part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }
        key_part = parts[parts.len() - 1];
    }

    let key_code = match key_part {
        "enter" => KeyCode::Enter,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "page_up" | "pageup" => KeyCode::PageUp,
        "page_down" | "pagedown" => KeyCode::PageDown,
        s if s.len() > 1 && s.starts_with('f') => {
            let n: u8 = s[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        s => {
            let mut chars = s.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some((key_code, modifiers))
}

/// Parse a hex color string ("#rrggbb") to a ratatui Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}

impl Config {
    /// Load config from the data directory, extracting defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&Self::base_dir()?)
    }

    /// Load `config.toml` from `dir`, writing the embedded defaults there first
    /// if the file does not exist yet
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        Self::extract_defaults(&path)?;
        Self::load_from_path(&path)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.keybinds.warn_invalid();
        Ok(config)
    }

    /// Write the embedded default config if none exists yet (idempotent)
    fn extract_defaults(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Ok(());
        }
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create data directory: {:?}", parent))?;
        }
        fs::write(config_path, DEFAULT_CONFIG)
            .context(format!("Failed to write default config: {:?}", config_path))?;
        tracing::info!("Wrote default config to {:?}", config_path);
        Ok(())
    }

    /// Get the base directory (~/.newyear-countdown/)
    /// Can be overridden with the NEWYEAR_COUNTDOWN_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".newyear-countdown"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("newyear-countdown.log"))
    }
}

fn default_use_24_hour() -> bool {
    true
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_scroll_cooldown_ms() -> u64 {
    500
}

fn default_duration_secs() -> u64 {
    10
}

fn default_pieces() -> usize {
    500
}

fn default_gravity() -> f32 {
    0.1
}

fn default_initial_velocity_y() -> f32 {
    -10.0
}

fn default_wind() -> f32 {
    0.05
}

fn default_frame_rate() -> u32 {
    30
}

fn default_border_color() -> String {
    "#5f87af".to_string()
}

fn default_active_border_color() -> String {
    "#ffd700".to_string() // gold
}

fn default_title_color() -> String {
    "#ffffff".to_string()
}

fn default_label_color() -> String {
    "#87afd7".to_string()
}

fn default_text_color() -> String {
    "#d0d0d0".to_string()
}

fn default_countdown_color() -> String {
    "#87d787".to_string()
}

fn default_border_style() -> String {
    "rounded".to_string()
}

fn default_key_quit() -> String {
    "q".to_string()
}

fn default_key_toggle_format() -> String {
    "t".to_string()
}

fn default_key_next_new_year() -> String {
    "n".to_string()
}

fn default_key_back_to_top() -> String {
    "home".to_string()
}

fn default_key_confetti() -> String {
    "c".to_string()
}

fn default_key_select_up() -> String {
    "up".to_string()
}

fn default_key_select_down() -> String {
    "down".to_string()
}
