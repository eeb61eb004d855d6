//! Data feed retrieval and decoding.
//!
//! The map is fed by four JSON endpoints: restaurants, stations, bus stops
//! and timetables. This module fetches them over HTTP and turns the raw
//! records into validated domain types, dropping records that can't be
//! placed on the map.

mod client;
mod convert;
mod error;
mod types;

pub use client::{FeedConfig, HttpFeedClient, JsonSource};
pub use convert::{Decoded, FeedCounts, decode_bus_stops, decode_restaurants, decode_stations};
pub use error::FeedError;
pub use types::{
    RawBusStop, RawRestaurant, RawStation, RawTimetableEntry, TimetableResponse, text,
};

/// Feed paths relative to the configured base URL.
pub mod paths {
    pub const RESTAURANTS: &str = "/restaurants";
    pub const STATIONS: &str = "/stations";
    pub const BUS_STOPS: &str = "/bus_stops";
    pub const TIMETABLE: &str = "/timetable";
}
