//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{BusStop, BusStopMatch, Category, Restaurant, Station, StationMatch};
use crate::engine::MapView;
use crate::filter::FilterState;

/// Every marker with its current visibility.
#[derive(Debug, Serialize)]
pub struct MarkersResponse {
    /// Reload number of the marker set (0 before the first load)
    pub generation: u64,

    /// RFC 3339 time the markers were loaded
    pub loaded_at: Option<String>,

    /// Toggle state the visibility was computed from
    pub filter: FilterState,

    pub restaurants: Vec<RestaurantMarker>,
    pub stations: Vec<StationMarker>,
    pub bus_stops: Vec<BusStopMarker>,
}

/// A restaurant marker.
#[derive(Debug, Serialize)]
pub struct RestaurantMarker {
    /// Position in the marker set, for `/timetable?restaurant=`
    pub index: usize,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,

    /// Display label for the category
    pub label: &'static str,

    pub nearest_station: Option<StationMatch>,
    pub nearest_bus_stop: Option<BusStopMatch>,
    pub visible: bool,
}

/// A station marker.
#[derive(Debug, Serialize)]
pub struct StationMarker {
    pub name: String,

    /// Canonical key for `/timetable?station=`
    pub key: String,

    pub line: String,
    pub company: String,
    pub lat: f64,
    pub lng: f64,
    pub visible: bool,
}

/// A bus stop marker.
#[derive(Debug, Serialize)]
pub struct BusStopMarker {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub visible: bool,
}

/// Request to flip one filter toggle.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Toggle key, e.g. `cafe` or `filter-bus-stops`
    pub toggle: String,

    pub enabled: bool,
}

/// Query for a timetable, by station name or by restaurant index.
#[derive(Debug, Deserialize)]
pub struct TimetableQuery {
    pub station: Option<String>,
    pub restaurant: Option<usize>,
    /// `kudari` or `nobori`; both when absent
    pub direction: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl MarkersResponse {
    /// Build the response from an engine snapshot.
    pub fn from_view(view: &MapView) -> Self {
        let markers = &view.markers;
        let visibility = &view.visibility;

        let restaurants = markers
            .restaurants
            .iter()
            .zip(&visibility.restaurants)
            .enumerate()
            .map(|(index, (r, visible))| RestaurantMarker::from_restaurant(index, r, *visible))
            .collect();

        let stations = markers
            .stations
            .iter()
            .zip(&visibility.stations)
            .map(|(s, visible)| StationMarker::from_station(s, *visible))
            .collect();

        let bus_stops = markers
            .bus_stops
            .iter()
            .zip(&visibility.bus_stops)
            .map(|(b, visible)| BusStopMarker::from_bus_stop(b, *visible))
            .collect();

        Self {
            generation: markers.generation,
            loaded_at: markers.loaded_at.map(|t| t.to_rfc3339()),
            filter: view.filter,
            restaurants,
            stations,
            bus_stops,
        }
    }
}

impl RestaurantMarker {
    pub fn from_restaurant(index: usize, r: &Restaurant, visible: bool) -> Self {
        Self {
            index,
            name: r.name.clone(),
            address: r.address.clone(),
            lat: r.coordinate.lat(),
            lng: r.coordinate.lng(),
            category: r.category,
            label: r.category.label(),
            nearest_station: r.nearest_station.clone(),
            nearest_bus_stop: r.nearest_bus_stop.clone(),
            visible,
        }
    }
}

impl StationMarker {
    pub fn from_station(s: &Station, visible: bool) -> Self {
        Self {
            name: s.name.clone(),
            key: s.key.as_str().to_string(),
            line: s.line.clone(),
            company: s.company.clone(),
            lat: s.coordinate.lat(),
            lng: s.coordinate.lng(),
            visible,
        }
    }
}

impl BusStopMarker {
    pub fn from_bus_stop(b: &BusStop, visible: bool) -> Self {
        Self {
            name: b.name.clone(),
            lat: b.coordinate.lat(),
            lng: b.coordinate.lng(),
            visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, StationKey};
    use crate::engine::MarkerSet;
    use crate::filter::Toggle;
    use std::sync::Arc;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn make_view(filter: FilterState) -> MapView {
        let station = Station::new("福井駅", "北陸本線", "JR西日本", coord(36.062, 136.2236));
        let restaurant = Restaurant {
            name: "喫茶A".into(),
            address: "福井市中央1".into(),
            segment: "喫茶店".into(),
            category: Category::Cafe,
            coordinate: coord(36.0641, 136.2196),
            nearest_station: Some(StationMatch {
                key: StationKey::from_name("福井駅"),
                name: "福井駅".into(),
                distance_m: 420,
            }),
            nearest_bus_stop: None,
        };

        let markers = Arc::new(MarkerSet {
            generation: 3,
            loaded_at: None,
            restaurants: vec![restaurant],
            stations: vec![station],
            bus_stops: vec![BusStop::new("大名町", coord(36.065, 136.219))],
        });
        let visibility = markers.evaluate(&filter);

        MapView {
            markers,
            filter,
            visibility,
        }
    }

    #[test]
    fn markers_carry_visibility() {
        let filter = FilterState::default().with(Toggle::Stations, true);
        let response = MarkersResponse::from_view(&make_view(filter));

        assert_eq!(response.generation, 3);
        assert!(response.restaurants[0].visible);
        assert!(response.stations[0].visible);
        assert!(!response.bus_stops[0].visible);
    }

    #[test]
    fn restaurant_marker_json() {
        let response = MarkersResponse::from_view(&make_view(FilterState::default()));
        let json = serde_json::to_value(&response).unwrap();

        let r = &json["restaurants"][0];
        assert_eq!(r["index"], 0);
        assert_eq!(r["category"], "cafe");
        assert_eq!(r["label"], "カフェ・喫茶店");
        assert_eq!(r["nearest_station"]["key"], "福井駅");
        assert_eq!(r["nearest_station"]["distance_m"], 420);
        assert!(r["nearest_bus_stop"].is_null());

        assert_eq!(json["stations"][0]["key"], "福井駅");
        assert_eq!(json["filter"]["super"], false);
        assert!(json["loaded_at"].is_null());
    }

    #[test]
    fn toggle_request_parses() {
        let req: ToggleRequest =
            serde_json::from_str(r#"{"toggle": "filter-cafe", "enabled": true}"#).unwrap();
        assert_eq!(req.toggle, "filter-cafe");
        assert!(req.enabled);
    }
}
