//! Canonical station keys.

use std::fmt;

use serde::Serialize;

/// The one station whose timetable is published under its full name,
/// suffix included.
const PROTECTED_NAME: &str = "福井駅";

const STATION_SUFFIX: char = '駅';

/// Derive the canonical timetable key for a station name.
///
/// Removes full-width parenthetical annotations and all whitespace, then
/// strips the trailing `駅` unless the name is exactly `福井駅`.
///
/// # Examples
///
/// ```
/// use poi_server::domain::normalize_station_name;
///
/// assert_eq!(normalize_station_name("福井駅"), "福井駅");
/// assert_eq!(normalize_station_name("田原町駅（臨時）"), "田原町");
/// assert_eq!(normalize_station_name(" 新田塚 駅 "), "新田塚");
/// ```
pub fn normalize_station_name(name: &str) -> String {
    let without_notes = strip_parentheticals(name);
    let compact: String = without_notes
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let key = compact.trim();

    if key == PROTECTED_NAME {
        return key.to_string();
    }

    // Strip every trailing suffix so the result is a fixed point.
    key.trim_end_matches(STATION_SUFFIX).to_string()
}

/// Remove each `（…）` span, matching every opener to the nearest closer.
///
/// An opener without a closer is kept as-is.
fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(open) = rest.find('（') {
        let after_open = &rest[open + '（'.len_utf8()..];
        match after_open.find('）') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + '）'.len_utf8()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// A normalized station name used to join station markers with timetables.
///
/// An empty key means the name could not be resolved; such keys must not be
/// used for lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationKey(String);

impl StationKey {
    /// Build the key for a raw station name.
    pub fn from_name(name: &str) -> Self {
        StationKey(normalize_station_name(name))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key can be used for a timetable lookup.
    pub fn is_resolvable(&self) -> bool {
        !self.0.is_empty()
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
