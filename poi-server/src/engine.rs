//! The map engine: current markers, filter state and reloads.
//!
//! A reload fetches all three marker feeds, builds a fresh [`MarkerSet`] and
//! swaps it in whole. Reloads are numbered when they start; a reload whose
//! results arrive after a newer reload has already been committed is
//! discarded, so an old load can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use futures::future::try_join3;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::{BusStop, Restaurant, Station, StationKey};
use crate::feed::{
    FeedCounts, FeedError, JsonSource, decode_bus_stops, decode_restaurants, decode_stations,
    paths,
};
use crate::filter::{FilterState, MarkerKind, Toggle, is_visible};
use crate::timetable::{self, CacheConfig, Direction, TimetableCache, TimetableLookup};

/// One load's worth of markers. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    /// Reload number that produced this set (0 before the first load).
    pub generation: u64,
    pub loaded_at: Option<DateTime<Utc>>,
    pub restaurants: Vec<Restaurant>,
    pub stations: Vec<Station>,
    pub bus_stops: Vec<BusStop>,
}

impl MarkerSet {
    /// Evaluate every marker against `filter`.
    ///
    /// This is a full re-evaluation with no dependence on previous results,
    /// so it is safe to call as often as needed.
    pub fn evaluate(&self, filter: &FilterState) -> Visibility {
        Visibility {
            restaurants: self
                .restaurants
                .iter()
                .map(|r| is_visible(MarkerKind::Restaurant(r.category), filter))
                .collect(),
            stations: vec![is_visible(MarkerKind::Station, filter); self.stations.len()],
            bus_stops: vec![is_visible(MarkerKind::BusStop, filter); self.bus_stops.len()],
        }
    }
}

/// Show/hide decision for every marker, index-aligned with a [`MarkerSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub restaurants: Vec<bool>,
    pub stations: Vec<bool>,
    pub bus_stops: Vec<bool>,
}

impl Visibility {
    /// Number of visible markers in each collection.
    pub fn shown(&self) -> (usize, usize, usize) {
        let count = |v: &[bool]| v.iter().filter(|b| **b).count();
        (
            count(&self.restaurants),
            count(&self.stations),
            count(&self.bus_stops),
        )
    }
}

/// Summary of one reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub generation: u64,
    /// False when a newer reload had already been committed.
    pub committed: bool,
    pub restaurants: FeedCounts,
    pub stations: FeedCounts,
    pub bus_stops: FeedCounts,
}

/// Markers and filter state as seen at one instant.
#[derive(Debug, Clone)]
pub struct MapView {
    pub markers: Arc<MarkerSet>,
    pub filter: FilterState,
    pub visibility: Visibility,
}

struct MapState {
    markers: Arc<MarkerSet>,
    filter: FilterState,
}

/// Owns the current marker collections and filter state.
pub struct MapEngine<S> {
    source: S,
    timetables: TimetableCache,
    state: RwLock<MapState>,
    next_generation: AtomicU64,
}

impl<S: JsonSource> MapEngine<S> {
    /// Create an engine with no markers loaded and every toggle off.
    pub fn new(source: S, cache_config: &CacheConfig) -> Self {
        Self {
            source,
            timetables: TimetableCache::new(cache_config),
            state: RwLock::new(MapState {
                markers: Arc::new(MarkerSet::default()),
                filter: FilterState::default(),
            }),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Fetch every feed and replace the marker collections.
    ///
    /// Stations and bus stops are decoded before restaurants so each
    /// restaurant can be annotated with its nearest facilities. On error the
    /// current markers are left untouched.
    pub async fn reload(&self) -> Result<LoadReport, FeedError> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        debug!(generation, "reload started");

        let (station_doc, bus_stop_doc, restaurant_doc) = try_join3(
            self.source.fetch_json(paths::STATIONS, &[]),
            self.source.fetch_json(paths::BUS_STOPS, &[]),
            self.source.fetch_json(paths::RESTAURANTS, &[]),
        )
        .await?;

        let stations = decode_stations(&station_doc);
        let bus_stops = decode_bus_stops(&bus_stop_doc);
        let restaurants =
            decode_restaurants(&restaurant_doc, &stations.records, &bus_stops.records);

        let mut report = LoadReport {
            generation,
            committed: false,
            restaurants: restaurants.counts(),
            stations: stations.counts(),
            bus_stops: bus_stops.counts(),
        };

        let markers = MarkerSet {
            generation,
            loaded_at: Some(Utc::now()),
            restaurants: restaurants.records,
            stations: stations.records,
            bus_stops: bus_stops.records,
        };

        let mut state = self.state.write().await;
        if state.markers.generation > generation {
            debug!(
                generation,
                current = state.markers.generation,
                "discarding stale reload"
            );
            return Ok(report);
        }

        state.markers = Arc::new(markers);
        drop(state);

        self.timetables.invalidate_all();
        report.committed = true;

        info!(
            generation,
            restaurants = report.restaurants.accepted,
            stations = report.stations.accepted,
            bus_stops = report.bus_stops.accepted,
            dropped = report.restaurants.dropped + report.stations.dropped + report.bus_stops.dropped,
            "markers loaded"
        );

        Ok(report)
    }

    /// The current marker set.
    pub async fn markers(&self) -> Arc<MarkerSet> {
        Arc::clone(&self.state.read().await.markers)
    }

    /// The current filter state.
    pub async fn filter(&self) -> FilterState {
        self.state.read().await.filter
    }

    /// Current markers, filter and visibility in one consistent snapshot.
    pub async fn view(&self) -> MapView {
        let state = self.state.read().await;
        MapView {
            markers: Arc::clone(&state.markers),
            filter: state.filter,
            visibility: state.markers.evaluate(&state.filter),
        }
    }

    /// Flip one toggle and re-evaluate every marker.
    pub async fn set_toggle(&self, toggle: Toggle, on: bool) -> MapView {
        let mut state = self.state.write().await;
        state.filter.set(toggle, on);

        let visibility = state.markers.evaluate(&state.filter);
        let (restaurants, stations, bus_stops) = visibility.shown();
        debug!(%toggle, on, restaurants, stations, bus_stops, "filter changed");

        MapView {
            markers: Arc::clone(&state.markers),
            filter: state.filter,
            visibility,
        }
    }

    /// Replace the whole filter state and re-evaluate every marker.
    pub async fn replace_filter(&self, filter: FilterState) -> MapView {
        let mut state = self.state.write().await;
        state.filter = filter;

        let visibility = state.markers.evaluate(&state.filter);
        let (restaurants, stations, bus_stops) = visibility.shown();
        debug!(restaurants, stations, bus_stops, "filter replaced");

        MapView {
            markers: Arc::clone(&state.markers),
            filter: state.filter,
            visibility,
        }
    }

    /// Look up both directions of the timetable for a station key.
    pub async fn timetable(&self, station: &StationKey) -> TimetableLookup {
        self.timetable_in(station, &Direction::BOTH).await
    }

    /// Look up only the given directions of a station's timetable.
    pub async fn timetable_in(&self, station: &StationKey, directions: &[Direction]) -> TimetableLookup {
        timetable::lookup_directions(&self.source, &self.timetables, station, directions).await
    }

    /// Look up the timetable of the station nearest to a restaurant.
    ///
    /// Returns `None` if the index is out of range or there were no
    /// stations to match against.
    pub async fn timetable_near(
        &self,
        restaurant_index: usize,
        directions: &[Direction],
    ) -> Option<TimetableLookup> {
        let key = {
            let markers = self.markers().await;
            let restaurant = markers.restaurants.get(restaurant_index)?;
            restaurant.nearest_station.as_ref()?.key.clone()
        };
        Some(self.timetable_in(&key, directions).await)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
