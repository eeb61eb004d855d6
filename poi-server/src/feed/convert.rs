//! Conversion from raw feed documents to validated domain records.
//!
//! Bad records are dropped with a warning naming the feed and index; they
//! never fail the whole feed.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{
    BusStop, BusStopMatch, Coordinate, InvalidCoordinate, Restaurant, Station, StationMatch,
    classify, validate,
};
use crate::proximity::nearest;

use super::types::{
    BUS_STOPS_KEY, RESTAURANTS_KEY, RawBusStop, RawRestaurant, RawStation, STATIONS_KEY, text,
};

/// Records accepted from one feed, plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

impl<T> Decoded<T> {
    pub fn counts(&self) -> FeedCounts {
        FeedCounts {
            accepted: self.records.len(),
            dropped: self.dropped,
        }
    }
}

/// Per-feed load statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedCounts {
    pub accepted: usize,
    pub dropped: usize,
}

/// Decode the stations feed.
pub fn decode_stations(doc: &Value) -> Decoded<Station> {
    decode_each(STATIONS_KEY, doc, |raw: RawStation| {
        let coordinate = validate(&raw.lat, &raw.lng)?;
        Ok(Station::new(
            text(&raw.name),
            text(&raw.line),
            text(&raw.company),
            coordinate,
        ))
    })
}

/// Decode the bus stops feed.
pub fn decode_bus_stops(doc: &Value) -> Decoded<BusStop> {
    decode_each(BUS_STOPS_KEY, doc, |raw: RawBusStop| {
        let coordinate = validate(&raw.lat, &raw.lng)?;
        Ok(BusStop::new(text(&raw.name), coordinate))
    })
}

/// Decode the restaurants feed, classifying each record and annotating it
/// with its nearest station and bus stop.
///
/// The stations and bus stops must come from the same load.
pub fn decode_restaurants(doc: &Value, stations: &[Station], bus_stops: &[BusStop]) -> Decoded<Restaurant> {
    decode_each(RESTAURANTS_KEY, doc, |raw: RawRestaurant| {
        let coordinate = validate(&raw.lat, &raw.lng)?;
        Ok(build_restaurant(raw, coordinate, stations, bus_stops))
    })
}

fn build_restaurant(
    raw: RawRestaurant,
    coordinate: Coordinate,
    stations: &[Station],
    bus_stops: &[BusStop],
) -> Restaurant {
    let segment = raw.segment();
    let category = classify(&segment);

    let nearest_station = nearest(coordinate, stations).map(|n| StationMatch {
        key: n.target.key.clone(),
        name: n.target.name.clone(),
        distance_m: n.distance_m,
    });
    let nearest_bus_stop = nearest(coordinate, bus_stops).map(|n| BusStopMatch {
        name: n.target.name.clone(),
        distance_m: n.distance_m,
    });

    Restaurant {
        name: text(&raw.name),
        address: text(&raw.address),
        segment,
        category,
        coordinate,
        nearest_station,
        nearest_bus_stop,
    }
}

/// Run `convert` over every record in `doc[key]`, dropping failures.
///
/// A missing or non-array `key` is treated as an empty feed.
fn decode_each<R, T, F>(feed: &'static str, doc: &Value, mut convert: F) -> Decoded<T>
where
    R: DeserializeOwned,
    F: FnMut(R) -> Result<T, InvalidCoordinate>,
{
    let Some(items) = doc.get(feed).and_then(Value::as_array) else {
        debug!(feed, "feed document has no record array");
        return Decoded {
            records: Vec::new(),
            dropped: 0,
        };
    };

    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0;

    for (index, item) in items.iter().enumerate() {
        let name = item.get("name").map(text).unwrap_or_default();

        let raw = match serde_json::from_value::<R>(item.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(feed, index, name = %name, error = %e, "dropping malformed record");
                dropped += 1;
                continue;
            }
        };

        match convert(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(feed, index, name = %name, reason = e.reason(), "dropping record with invalid lat/lng");
                dropped += 1;
            }
        }
    }

    Decoded { records, dropped }
}
