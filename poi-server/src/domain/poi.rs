//! Map marker records: restaurants, stations and bus stops.

use serde::Serialize;

use super::{Category, Coordinate, StationKey};

/// A railway station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    /// Canonical key derived from `name`, used for timetable lookups.
    pub key: StationKey,
    pub line: String,
    pub company: String,
    pub coordinate: Coordinate,
}

impl Station {
    /// Create a station, deriving its key from the name.
    pub fn new(
        name: impl Into<String>,
        line: impl Into<String>,
        company: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        let name = name.into();
        let key = StationKey::from_name(&name);
        Self {
            name,
            key,
            line: line.into(),
            company: company.into(),
            coordinate,
        }
    }
}

/// A bus stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusStop {
    pub name: String,
    pub coordinate: Coordinate,
}

impl BusStop {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// Nearest station to a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationMatch {
    pub key: StationKey,
    pub name: String,
    pub distance_m: u32,
}

/// Nearest bus stop to a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusStopMatch {
    pub name: String,
    pub distance_m: u32,
}

/// A restaurant (or shop) point of interest.
///
/// The category is always derived from `segment`, and the proximity
/// annotations are computed against the stations and bus stops of the same
/// load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub address: String,
    /// Raw business segment text as supplied by the feed.
    pub segment: String,
    pub category: Category,
    pub coordinate: Coordinate,
    pub nearest_station: Option<StationMatch>,
    pub nearest_bus_stop: Option<BusStopMatch>,
}
