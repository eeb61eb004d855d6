//! Station timetable lookup.
//!
//! Timetables are published per canonical station key and direction. A
//! lookup fetches its directions concurrently and reports failures as
//! [`TimetableLookup::Unavailable`] rather than as errors, since the caller
//! only needs something to display.

mod cache;
mod types;

pub use cache::{CacheConfig, TimetableCache, TimetableEntries};
pub use types::{
    Direction, Timetable, TimetableEntry, TimetableLookup, normalize_time, sort_entries,
};

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::domain::StationKey;
use crate::feed::{FeedError, JsonSource, TimetableResponse, paths};

/// Fetch one direction of a station's timetable, bypassing the cache.
pub async fn fetch_direction<S: JsonSource>(
    source: &S,
    station: &StationKey,
    direction: Direction,
) -> Result<Vec<TimetableEntry>, FeedError> {
    let query = [("station", station.as_str()), ("direction", direction.as_str())];
    let doc = source.fetch_json(paths::TIMETABLE, &query).await?;

    let response: TimetableResponse =
        serde_json::from_value(doc).map_err(|e| FeedError::Json {
            url: format!(
                "{}?station={}&direction={}",
                paths::TIMETABLE,
                station,
                direction
            ),
            message: e.to_string(),
        })?;

    let mut entries: Vec<TimetableEntry> = response
        .items
        .into_iter()
        .map(TimetableEntry::from_raw)
        .collect();
    sort_entries(&mut entries);

    Ok(entries)
}

async fn cached_direction<S: JsonSource>(
    source: &S,
    cache: &TimetableCache,
    station: &StationKey,
    direction: Direction,
) -> Result<TimetableEntries, FeedError> {
    if let Some(hit) = cache.get(station, direction).await {
        debug!(%station, %direction, "timetable cache hit");
        return Ok(hit);
    }

    let epoch = cache.epoch();
    let entries = Arc::new(fetch_direction(source, station, direction).await?);
    cache
        .insert(epoch, station.clone(), direction, Arc::clone(&entries))
        .await;

    Ok(entries)
}

/// Look up both directions of a station's timetable.
///
/// Unresolvable keys never reach the source. Only successful fetches are
/// cached.
pub async fn lookup<S: JsonSource>(
    source: &S,
    cache: &TimetableCache,
    station: &StationKey,
) -> TimetableLookup {
    lookup_directions(source, cache, station, &Direction::BOTH).await
}

/// Look up only the given directions. Directions not asked for come back
/// empty.
pub async fn lookup_directions<S: JsonSource>(
    source: &S,
    cache: &TimetableCache,
    station: &StationKey,
    directions: &[Direction],
) -> TimetableLookup {
    if !station.is_resolvable() {
        return TimetableLookup::Unresolvable;
    }

    let result = try_join_all(
        directions
            .iter()
            .map(|&direction| cached_direction(source, cache, station, direction)),
    )
    .await;

    match result {
        Ok(fetched) => {
            let mut timetable = Timetable {
                station: station.clone(),
                outbound: Vec::new(),
                inbound: Vec::new(),
            };
            for (direction, entries) in directions.iter().zip(fetched) {
                match direction {
                    Direction::Kudari => timetable.outbound = entries.as_ref().clone(),
                    Direction::Nobori => timetable.inbound = entries.as_ref().clone(),
                }
            }

            if timetable.is_empty() {
                TimetableLookup::NoData {
                    station: station.clone(),
                }
            } else {
                TimetableLookup::Found(timetable)
            }
        }
        Err(e) => {
            warn!(%station, error = %e, "timetable lookup failed");
            TimetableLookup::Unavailable {
                station: station.clone(),
                reason: e.to_string(),
            }
        }
    }
}
