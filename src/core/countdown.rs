//! Time-until-New-Year arithmetic.
//!
//! All functions take the current instant explicitly so the tick loop, the
//! `list` subcommand and the tests share one code path.

use crate::data::timezone::TimezoneList;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use std::fmt;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Duration until the next local New Year, decomposed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub total_seconds: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn from_seconds(total_seconds: i64) -> Self {
        Self {
            total_seconds,
            days: total_seconds.div_euclid(SECS_PER_DAY),
            hours: total_seconds.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: total_seconds.rem_euclid(SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total_seconds.rem_euclid(SECS_PER_MINUTE),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// 12/24-hour display flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourFormat {
    #[default]
    TwentyFour,
    Twelve,
}

impl HourFormat {
    pub fn from_use_24_hour(use_24_hour: bool) -> Self {
        if use_24_hour {
            Self::TwentyFour
        } else {
            Self::Twelve
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::TwentyFour => Self::Twelve,
            Self::Twelve => Self::TwentyFour,
        }
    }

    /// Label for the control that switches away from this format
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::TwentyFour => "Switch to 12-hour format",
            Self::Twelve => "Switch to 24-hour format",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::TwentyFour => "%H:%M:%S",
            Self::Twelve => "%I:%M:%S %p",
        }
    }
}

/// Wall-clock time at `offset`, truncated to whole seconds
pub fn local_time(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDateTime {
    let local = now.with_timezone(&offset).naive_local();
    local.with_nanosecond(0).unwrap_or(local)
}

fn new_year_of(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
}

/// Time remaining until the next Jan 1 00:00:00 at `offset`.
///
/// When local time is exactly Jan 1 00:00:00 the result is zero; one second
/// later the countdown restarts toward the following year.
pub fn time_until_new_year(now: DateTime<Utc>, offset: FixedOffset) -> Remaining {
    let local = local_time(now, offset);
    let this_year = new_year_of(local.year());
    let target = if local == this_year {
        this_year
    } else {
        new_year_of(local.year().saturating_add(1))
    };
    Remaining::from_seconds((target - local).num_seconds())
}

/// Local clock string for display; never affects the computed countdown
pub fn format_local_time(now: DateTime<Utc>, offset: FixedOffset, format: HourFormat) -> String {
    local_time(now, offset).format(format.pattern()).to_string()
}

/// Index of the zone that celebrates soonest (smallest strictly positive
/// remaining time). Falls back to the first entry.
pub fn next_new_year_index(zones: &TimezoneList, now: DateTime<Utc>) -> usize {
    zones
        .iter()
        .enumerate()
        .map(|(idx, tz)| (idx, time_until_new_year(now, tz.offset.fixed()).total_seconds))
        .filter(|(_, secs)| *secs > 0)
        .min_by_key(|(_, secs)| *secs)
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
