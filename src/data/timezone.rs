//! Timezone entries and UTC offset parsing.
//!
//! The bundled list is embedded at compile time; a user-supplied list of the
//! same JSON shape can replace it. Every zone label is resolved to a
//! `FixedOffset` once at startup so the per-tick arithmetic never parses.

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const BUNDLED_TIMEZONES: &str = include_str!("../../defaults/timezones.json");

/// Earliest and latest offsets observed anywhere (UTC-12 .. UTC+14)
const MIN_OFFSET_SECS: i32 = -12 * 3600;
const MAX_OFFSET_SECS: i32 = 14 * 3600;

/// Static record pairing a UTC offset label with the countries observing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneEntry {
    pub zone: String,
    pub countries: Vec<String>,
}

/// Parsed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOffset {
    offset: FixedOffset,
}

impl ZoneOffset {
    /// Parse labels such as "GMT", "UTC", "GMT+2", "GMT-3:30", "UTC+0545".
    /// A colon-less minute part needs a two-digit hour ("+0545", not "+545").
    pub fn parse(label: &str) -> Result<Self> {
        let caps = zone_pattern()?
            .captures(label.trim())
            .with_context(|| format!("Unrecognized timezone label: {:?}", label))?;

        let Some(sign) = caps.get(1) else {
            // Bare "GMT" / "UTC"
            return Self::from_seconds(0);
        };

        let hours: i32 = caps
            .get(2)
            .or_else(|| caps.get(4))
            .context("Missing hour in timezone label")?
            .as_str()
            .parse()?;
        let minutes: i32 = match caps.get(3).or_else(|| caps.get(5)) {
            Some(m) => m.as_str().parse()?,
            None => 0,
        };
        if minutes >= 60 {
            bail!("Invalid minutes in timezone label: {:?}", label);
        }

        let magnitude = hours * 3600 + minutes * 60;
        let seconds = if sign.as_str() == "-" { -magnitude } else { magnitude };
        Self::from_seconds(seconds).with_context(|| format!("Offset out of range: {:?}", label))
    }

    fn from_seconds(seconds: i32) -> Result<Self> {
        if !(MIN_OFFSET_SECS..=MAX_OFFSET_SECS).contains(&seconds) {
            bail!("UTC offset {}s is outside -12:00..=+14:00", seconds);
        }
        let offset = FixedOffset::east_opt(seconds).context("Invalid UTC offset")?;
        Ok(Self { offset })
    }

    pub fn fixed(&self) -> FixedOffset {
        self.offset
    }

    pub fn seconds(&self) -> i32 {
        self.offset.local_minus_utc()
    }
}

/// Compiled once; groups are sign, then either `HHMM` (2, 3) or `H[:MM]` (4, 5)
fn zone_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r"^(?i:GMT|UTC)(?:([+-])(?:(\d{2})(\d{2})|(\d{1,2})(?::(\d{2}))?))?$")
        .context("Failed to compile timezone pattern")?;
    Ok(PATTERN.get_or_init(|| pattern))
}

/// A timezone entry with its offset resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    pub entry: TimezoneEntry,
    pub offset: ZoneOffset,
}

impl Timezone {
    pub fn zone(&self) -> &str {
        &self.entry.zone
    }

    pub fn countries_label(&self) -> String {
        self.entry.countries.join(", ")
    }
}

/// Ordered, non-empty list of resolved timezones
#[derive(Debug, Clone)]
pub struct TimezoneList {
    zones: Vec<Timezone>,
}

impl TimezoneList {
    /// The list shipped inside the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TIMEZONES).context("Bundled timezone list is invalid")
    }

    /// Load a user-supplied JSON list
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .context(format!("Failed to read timezone file: {:?}", path))?;
        let list = Self::from_json(&contents)
            .context(format!("Failed to load timezone file: {:?}", path))?;
        tracing::info!("Loaded {} timezones from {:?}", list.len(), path);
        Ok(list)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<TimezoneEntry> =
            serde_json::from_str(json).context("Failed to parse timezone JSON")?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<TimezoneEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("Timezone list is empty");
        }

        let zones = entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                let offset = ZoneOffset::parse(&entry.zone)
                    .with_context(|| format!("Timezone #{} ({:?})", idx, entry.zone))?;
                tracing::trace!("{} resolved to {:+}s", entry.zone, offset.seconds());
                Ok(Timezone { entry, offset })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { zones })
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn get(&self, index: usize) -> Option<&Timezone> {
        self.zones.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timezone> {
        self.zones.iter()
    }
}
