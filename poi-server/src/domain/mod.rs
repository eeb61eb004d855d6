//! Domain types for the POI map.
//!
//! Everything here is pure and synchronous: coordinate validation,
//! segment classification, station key normalization and the marker
//! records built from them.

mod category;
mod coordinate;
mod poi;
mod station;

pub use category::{Category, classify};
pub use coordinate::{Coordinate, InvalidCoordinate, validate};
pub use poi::{BusStop, BusStopMatch, Restaurant, Station, StationMatch};
pub use station::{StationKey, normalize_station_name};
