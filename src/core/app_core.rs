use crate::config::{Config, KeyAction};
use crate::core::celebration::{Celebration, ZeroCrossingDetector};
use crate::core::countdown::{self, HourFormat, Remaining};
use crate::core::scroll::{ScrollDebouncer, ScrollDirection};
use crate::data::{TimezoneList, UiState};
use crate::frontend::FrontendEvent;
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Instant;

/// Entries skipped by PageUp / PageDown
const PAGE_STEP: isize = 5;

/// Core application state (frontend-agnostic)
///
/// AppCore owns the timezone list and all transient UI state. It advances the
/// clock on every tick, turns input events into selection changes and decides
/// when the celebration is visible. Frontends only read from it.
pub struct AppCore {
    /// Application configuration
    pub config: Config,

    /// Static timezone list (never empty)
    pub zones: TimezoneList,

    /// Clock, selection, display format, celebration flag
    pub ui_state: UiState,

    /// Application running flag
    pub running: bool,

    /// Set whenever state changed since the last frame
    pub needs_render: bool,

    /// Wheel-event debounce guard
    scroll: ScrollDebouncer,

    /// Per-zone midnight detection
    crossings: ZeroCrossingDetector,

    /// Offset added to the system clock (simulated time)
    clock_offset: chrono::Duration,
}

impl AppCore {
    pub fn new(config: Config, zones: TimezoneList, now: DateTime<Utc>) -> Self {
        let hour_format = HourFormat::from_use_24_hour(config.countdown.use_24_hour);
        let celebration = Celebration::new(config.celebration.duration());
        let ui_state = UiState::new(now, zones.len(), hour_format, celebration);
        let scroll = ScrollDebouncer::new(config.countdown.scroll_cooldown());
        let crossings = ZeroCrossingDetector::new(zones.len());

        Self {
            config,
            zones,
            ui_state,
            running: true,
            needs_render: true,
            scroll,
            crossings,
            clock_offset: chrono::Duration::zero(),
        }
    }

    /// Run the clock from `start` instead of the real current time
    pub fn simulate_from(&mut self, start: DateTime<Utc>) {
        self.clock_offset = start - Utc::now();
        self.crossings.reset();
        self.ui_state.now = start;
        tracing::info!("Simulating clock from {}", start);
    }

    /// Current wall-clock time, including any simulated offset
    pub fn wall_clock(&self) -> DateTime<Utc> {
        Utc::now() + self.clock_offset
    }

    /// Refresh the clock and check every zone for midnight
    pub fn tick(&mut self, now: DateTime<Utc>, instant: Instant) {
        if now < self.ui_state.now {
            tracing::warn!(
                "Clock went backwards ({} -> {}), resetting midnight detection",
                self.ui_state.now,
                now
            );
            self.crossings.reset();
        }
        self.ui_state.now = now;

        let mut reached = Vec::new();
        for (idx, tz) in self.zones.iter().enumerate() {
            let remaining = countdown::time_until_new_year(now, tz.offset.fixed());
            if self.crossings.observe(idx, remaining.total_seconds) {
                reached.push(tz.zone().to_string());
            }
        }

        if !reached.is_empty() {
            for zone in &reached {
                tracing::info!("New Year reached for timezone: {}", zone);
            }
            self.ui_state.celebration.trigger(instant);
        }

        self.ui_state.celebration.expire(instant);
        self.needs_render = true;
    }

    /// Process one input event
    pub fn handle_event(&mut self, event: FrontendEvent, instant: Instant) {
        if let Some(delta) = event.wheel_delta() {
            self.handle_wheel(delta, instant);
            return;
        }

        match event {
            FrontendEvent::Key { code, modifiers } => self.handle_key(code, modifiers, instant),
            FrontendEvent::Resize { width, height } => {
                tracing::debug!("Terminal resized to {}x{}", width, height);
                self.needs_render = true;
            }
            FrontendEvent::Quit => self.quit(),
            FrontendEvent::Mouse { .. } => {}
        }
    }

    fn handle_wheel(&mut self, delta: i32, instant: Instant) {
        if !self.scroll.accept(instant) {
            return;
        }
        let direction = ScrollDirection::from_delta(delta);
        if self.ui_state.selection.advance(direction) {
            self.needs_render = true;
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, instant: Instant) {
        let moved = match self.config.keybinds.resolve_action(code, modifiers) {
            KeyAction::SelectUp => self.ui_state.selection.advance(ScrollDirection::Up),
            KeyAction::SelectDown => self.ui_state.selection.advance(ScrollDirection::Down),
            KeyAction::PageUp => self.ui_state.selection.move_by(-PAGE_STEP),
            KeyAction::PageDown => self.ui_state.selection.move_by(PAGE_STEP),
            KeyAction::SelectLast => self.ui_state.selection.bottom(),
            KeyAction::Quit => {
                self.quit();
                false
            }
            KeyAction::ToggleFormat => {
                self.toggle_hour_format();
                false
            }
            KeyAction::NextNewYear => {
                self.jump_to_next_new_year();
                false
            }
            KeyAction::BackToTop => {
                self.scroll_to_top();
                false
            }
            KeyAction::Confetti => {
                self.start_confetti(instant);
                false
            }
            KeyAction::None => false,
        };
        if moved {
            self.needs_render = true;
        }
    }

    pub fn toggle_hour_format(&mut self) {
        self.ui_state.hour_format = self.ui_state.hour_format.toggle();
        self.needs_render = true;
    }

    /// Select the zone that celebrates soonest
    pub fn jump_to_next_new_year(&mut self) {
        let idx = countdown::next_new_year_index(&self.zones, self.ui_state.now);
        if let Some(tz) = self.zones.get(idx) {
            tracing::debug!("Next New Year: {} ({})", tz.zone(), tz.countries_label());
        }
        self.ui_state.selection.jump_to(idx);
        self.needs_render = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.ui_state.selection.top();
        self.needs_render = true;
    }

    /// Manual celebration trigger (keybind, --celebrate, SIGUSR1)
    pub fn start_confetti(&mut self, instant: Instant) {
        tracing::info!("Confetti triggered manually");
        self.ui_state.celebration.trigger(instant);
        self.needs_render = true;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.ui_state.now
    }

    pub fn selected(&self) -> usize {
        self.ui_state.selection.index()
    }

    pub fn hour_format(&self) -> HourFormat {
        self.ui_state.hour_format
    }

    pub fn remaining_for(&self, index: usize) -> Option<Remaining> {
        let tz = self.zones.get(index)?;
        Some(countdown::time_until_new_year(self.ui_state.now, tz.offset.fixed()))
    }

    pub fn local_time_for(&self, index: usize) -> Option<String> {
        let tz = self.zones.get(index)?;
        Some(countdown::format_local_time(
            self.ui_state.now,
            tz.offset.fixed(),
            self.ui_state.hour_format,
        ))
    }

    pub fn celebration_visible(&self, instant: Instant) -> bool {
        self.ui_state.celebration.is_visible(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimezoneEntry;
    use chrono::TimeZone;
    use crossterm::event::MouseEventKind;
    use std::time::Duration;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn core_with(labels: &[&str], now: DateTime<Utc>) -> AppCore {
        let zones = TimezoneList::from_entries(
            labels
                .iter()
                .map(|zone| TimezoneEntry {
                    zone: zone.to_string(),
                    countries: vec![format!("Country {}", zone)],
                })
                .collect(),
        )
        .unwrap();
        AppCore::new(Config::default(), zones, now)
    }

    fn key(c: char) -> FrontendEvent {
        FrontendEvent::key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn wheel(kind: MouseEventKind) -> FrontendEvent {
        FrontendEvent::mouse(kind, 0, 0, KeyModifiers::NONE)
    }

    #[test]
    fn test_wheel_is_debounced() {
        let mut core = core_with(&["GMT+2", "GMT+1", "GMT", "GMT-1"], utc(2025, 6, 1, 0, 0, 0));
        let start = Instant::now();

        core.handle_event(wheel(MouseEventKind::ScrollDown), start);
        core.handle_event(wheel(MouseEventKind::ScrollDown), start + Duration::from_millis(10));
        core.handle_event(wheel(MouseEventKind::ScrollDown), start + Duration::from_millis(200));
        assert_eq!(core.selected(), 1);

        core.handle_event(wheel(MouseEventKind::ScrollDown), start + Duration::from_millis(500));
        assert_eq!(core.selected(), 2);

        core.handle_event(wheel(MouseEventKind::ScrollUp), start + Duration::from_millis(1000));
        assert_eq!(core.selected(), 1);
    }

    #[test]
    fn test_wheel_clamps_to_list() {
        let mut core = core_with(&["GMT+1", "GMT"], utc(2025, 6, 1, 0, 0, 0));
        let start = Instant::now();
        for n in 0..10u64 {
            core.handle_event(wheel(MouseEventKind::ScrollDown), start + Duration::from_secs(n));
        }
        assert_eq!(core.selected(), 1);
        for n in 10..30u64 {
            core.handle_event(wheel(MouseEventKind::ScrollUp), start + Duration::from_secs(n));
        }
        assert_eq!(core.selected(), 0);
    }

    #[test]
    fn test_keyboard_is_not_debounced() {
        let mut core = core_with(&["GMT+2", "GMT+1", "GMT"], utc(2025, 6, 1, 0, 0, 0));
        let now = Instant::now();
        core.handle_event(key('j'), now);
        core.handle_event(key('j'), now);
        assert_eq!(core.selected(), 2);
        core.handle_event(FrontendEvent::key(KeyCode::Home, KeyModifiers::NONE), now);
        assert_eq!(core.selected(), 0);
        core.handle_event(FrontendEvent::key(KeyCode::End, KeyModifiers::NONE), now);
        assert_eq!(core.selected(), 2);
    }

    #[test]
    fn test_toggle_format_changes_only_rendering() {
        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 15, 30, 0));
        let remaining = core.remaining_for(0);
        assert_eq!(core.local_time_for(0).as_deref(), Some("15:30:00"));

        core.handle_event(key('t'), Instant::now());
        assert_eq!(core.hour_format(), HourFormat::Twelve);
        assert_eq!(core.local_time_for(0).as_deref(), Some("03:30:00 PM"));
        assert_eq!(core.remaining_for(0), remaining);
    }

    #[test]
    fn test_next_new_year_selects_soonest_zone() {
        let mut core = core_with(&["GMT+14", "GMT+2", "GMT", "GMT-10"], utc(2025, 12, 31, 23, 0, 0));
        core.handle_event(key('n'), Instant::now());
        assert_eq!(core.selected(), 2);

        core.handle_event(FrontendEvent::key(KeyCode::Home, KeyModifiers::NONE), Instant::now());
        assert_eq!(core.selected(), 0);
    }

    #[test]
    fn test_tick_triggers_celebration_at_midnight() {
        let start = utc(2025, 12, 31, 23, 59, 58);
        let mut core = core_with(&["GMT+1", "GMT"], start);
        let instant = Instant::now();

        core.tick(start, instant);
        assert!(!core.celebration_visible(instant));

        core.tick(utc(2025, 12, 31, 23, 59, 59), instant + Duration::from_secs(1));
        assert!(!core.celebration_visible(instant + Duration::from_secs(1)));

        core.tick(utc(2026, 1, 1, 0, 0, 0), instant + Duration::from_secs(2));
        assert!(core.celebration_visible(instant + Duration::from_secs(2)));
        assert!(core.remaining_for(1).unwrap().is_zero());

        // Visible for the configured ten seconds, then cleared
        core.tick(utc(2026, 1, 1, 0, 0, 11), instant + Duration::from_secs(11));
        assert!(core.celebration_visible(instant + Duration::from_secs(11)));
        core.tick(utc(2026, 1, 1, 0, 0, 12), instant + Duration::from_secs(12));
        assert!(!core.celebration_visible(instant + Duration::from_secs(12)));
    }

    #[test]
    fn test_tick_catches_skipped_midnight() {
        let mut core = core_with(&["GMT"], utc(2025, 12, 31, 23, 59, 59));
        let instant = Instant::now();
        core.tick(utc(2025, 12, 31, 23, 59, 59), instant);
        core.tick(utc(2026, 1, 1, 0, 0, 1), instant + Duration::from_secs(2));
        assert!(core.celebration_visible(instant + Duration::from_secs(2)));
    }

    #[test]
    fn test_clock_going_backwards_does_not_celebrate() {
        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        let instant = Instant::now();
        core.tick(utc(2025, 6, 1, 12, 0, 0), instant);
        core.tick(utc(2025, 6, 1, 11, 0, 0), instant + Duration::from_secs(1));
        assert!(!core.celebration_visible(instant + Duration::from_secs(1)));
    }

    #[test]
    fn test_manual_confetti() {
        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        let instant = Instant::now();
        core.needs_render = false;
        core.handle_event(key('c'), instant);
        assert!(core.celebration_visible(instant));
        assert!(core.needs_render);
    }

    #[test]
    fn test_quit_keys() {
        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        core.handle_event(key('q'), Instant::now());
        assert!(!core.running);

        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        core.handle_event(FrontendEvent::quit(), Instant::now());
        assert!(!core.running);
    }

    #[test]
    fn test_simulated_clock() {
        let mut core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        let target = utc(2030, 12, 31, 23, 59, 50);
        core.simulate_from(target);
        let drift = (core.wall_clock() - target).num_seconds();
        assert!((0..5).contains(&drift));
        assert_eq!(core.now(), target);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let core = core_with(&["GMT"], utc(2025, 6, 1, 12, 0, 0));
        assert!(core.remaining_for(5).is_none());
        assert!(core.local_time_for(5).is_none());
    }
}
