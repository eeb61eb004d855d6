//! Raw feed records.
//!
//! Every field stays a JSON value until converted. Coordinates are validated
//! later, text fields accept any scalar, and the restaurant segment can live
//! under several names.

use serde::Deserialize;
use serde_json::Value;

/// Top-level array key for each feed.
pub const RESTAURANTS_KEY: &str = "restaurants";
pub const STATIONS_KEY: &str = "stations";
pub const BUS_STOPS_KEY: &str = "bus_stops";

/// Render a loosely typed feed field as text.
///
/// Strings are taken as-is, `null` and missing fields become empty, and any
/// other value (numbers, booleans) is written in its JSON form.
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A restaurant record as delivered by the restaurants feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRestaurant {
    pub name: Value,
    pub address: Value,
    pub lat: Value,
    pub lng: Value,
    pub category: Value,
    pub segment: Value,
    pub business_type: Value,
    #[serde(rename = "type")]
    pub kind: Value,
}

impl RawRestaurant {
    /// The raw segment text: the first non-null of `category`, `segment`,
    /// `business_type` and `type`, or empty if none is present.
    pub fn segment(&self) -> String {
        [&self.category, &self.segment, &self.business_type, &self.kind]
            .into_iter()
            .find(|v| !v.is_null())
            .map(text)
            .unwrap_or_default()
    }
}

/// A station record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawStation {
    pub name: Value,
    pub lat: Value,
    pub lng: Value,
    pub line: Value,
    pub company: Value,
}

/// A bus stop record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBusStop {
    pub name: Value,
    pub lat: Value,
    pub lng: Value,
}

/// Timetable feed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableResponse {
    #[serde(default)]
    pub items: Vec<RawTimetableEntry>,
}

/// One departure or arrival in the timetable feed.
///
/// Train numbers in particular may arrive as JSON numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTimetableEntry {
    pub time: Value,
    pub train_type: Value,
    pub dest: Value,
    pub note: Value,
    pub event: Value,
    pub train_no: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawRestaurant {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn segment_prefers_category() {
        let r = raw(json!({"category": "カフェ", "segment": "コンビニ"}));
        assert_eq!(r.segment(), "カフェ");
    }

    #[test]
    fn segment_skips_null_fields() {
        let r = raw(json!({"category": null, "business_type": "ドラッグストア", "type": "x"}));
        assert_eq!(r.segment(), "ドラッグストア");
    }

    #[test]
    fn segment_falls_back_to_type() {
        let r = raw(json!({"type": "喫茶店"}));
        assert_eq!(r.segment(), "喫茶店");
    }

    #[test]
    fn empty_string_is_present() {
        let r = raw(json!({"segment": "", "business_type": "コンビニ"}));
        assert_eq!(r.segment(), "");
    }

    #[test]
    fn missing_segment_is_empty() {
        let r = raw(json!({"name": "x", "lat": 36.0, "lng": 136.0}));
        assert_eq!(r.segment(), "");
        assert_eq!(text(&r.name), "x");
    }

    #[test]
    fn numeric_text_fields_render_as_text() {
        let s: RawStation = serde_json::from_value(json!({"name": "福井駅", "line": 3, "company": null})).unwrap();
        assert_eq!(text(&s.name), "福井駅");
        assert_eq!(text(&s.line), "3");
        assert_eq!(text(&s.company), "");

        let r = raw(json!({"category": 12}));
        assert_eq!(r.segment(), "12");
    }

    #[test]
    fn timetable_entry_tolerates_missing_fields() {
        let resp: TimetableResponse =
            serde_json::from_value(json!({"station": "福井駅", "items": [{"time": "6:02"}]})).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert_eq!(text(&resp.items[0].time), "6:02");
        assert!(resp.items[0].dest.is_null());
    }

    #[test]
    fn timetable_entry_accepts_numeric_train_no() {
        let resp: TimetableResponse =
            serde_json::from_value(json!({"items": [{"time": "6:02", "train_no": 101}]})).unwrap();
        assert_eq!(text(&resp.items[0].train_no), "101");
    }
}
