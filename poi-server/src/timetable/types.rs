//! Timetable types and entry normalization.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::domain::StationKey;
use crate::feed::{RawTimetableEntry, text};

/// Direction of travel on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outbound ("down")
    Kudari,
    /// Inbound ("up")
    Nobori,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Kudari, Direction::Nobori];

    /// Query token used by the timetable feed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Kudari => "kudari",
            Direction::Nobori => "nobori",
        }
    }

    /// Parse a direction token.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "kudari" => Some(Direction::Kudari),
            "nobori" => Some(Direction::Nobori),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timetable row at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    /// `HH:MM`, or empty when the train passes without stopping
    pub time: String,
    pub train_type: String,
    pub dest: String,
    pub note: String,
    /// Departure (`発`) or arrival (`着`)
    pub event: String,
    pub train_no: String,
}

impl TimetableEntry {
    pub fn from_raw(raw: RawTimetableEntry) -> Self {
        fn clean(v: &Value) -> String {
            text(v).trim().to_string()
        }

        Self {
            time: normalize_time(&text(&raw.time)),
            train_type: clean(&raw.train_type),
            dest: clean(&raw.dest),
            note: clean(&raw.note),
            event: clean(&raw.event),
            train_no: clean(&raw.train_no),
        }
    }
}

/// Normalize a timetable time to zero-padded `HH:MM`.
///
/// Blank times and the pass-through marker `→` become empty. Hours past 23
/// are kept as-is since services after midnight are written that way.
/// Anything unparseable is returned trimmed but otherwise unchanged.
///
/// ```
/// use poi_server::timetable::normalize_time;
///
/// assert_eq!(normalize_time("6:02"), "06:02");
/// assert_eq!(normalize_time("24:15"), "24:15");
/// assert_eq!(normalize_time("→"), "");
/// ```
pub fn normalize_time(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() || t == "→" {
        return String::new();
    }

    if let Some((h, m)) = t.split_once(':')
        && let (Some(h), Some(m)) = (parse_digits(h), parse_digits(m))
    {
        return format!("{h:02}:{m:02}");
    }

    t.to_string()
}

/// Parse a run of decimal digits, accepting full-width digits too.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    s.chars().try_fold(0u32, |acc, c| {
        let d = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            _ => return None,
        };
        acc.checked_mul(10)?.checked_add(d)
    })
}

/// Sort entries by time, then event, then train number.
pub fn sort_entries(entries: &mut [TimetableEntry]) {
    entries.sort_by(|a, b| {
        (&a.time, &a.event, &a.train_no).cmp(&(&b.time, &b.event, &b.train_no))
    });
}

/// Both directions of a station's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    pub station: StationKey,
    pub outbound: Vec<TimetableEntry>,
    pub inbound: Vec<TimetableEntry>,
}

impl Timetable {
    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.inbound.is_empty()
    }
}

/// Outcome of a timetable lookup, ready for display.
///
/// Failures are folded into [`TimetableLookup::Unavailable`] so callers can
/// show a message instead of handling errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimetableLookup {
    Found(Timetable),
    /// The station is known but has no entries in either direction
    NoData { station: StationKey },
    /// The station name normalized to an empty key
    Unresolvable,
    /// Retrieval failed
    Unavailable { station: StationKey, reason: String },
}
