//! Caching layer for timetable responses.
//!
//! Timetables change rarely, and every click on a station marker asks for
//! both directions, so entries are kept for a few minutes keyed by
//! (station key, direction).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::StationKey;

use super::types::{Direction, TimetableEntry};

type TimetableKey = (StationKey, Direction);

/// Cached entries for one direction at one station.
pub type TimetableEntries = Arc<Vec<TimetableEntry>>;

/// Configuration for the timetable cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 500,
        }
    }
}

/// One cached direction, stamped with the cache epoch it was fetched in.
#[derive(Clone)]
struct Tagged {
    epoch: u64,
    entries: TimetableEntries,
}

/// Cache for timetable lookups.
///
/// Every [`TimetableCache::invalidate_all`] starts a new epoch. Entries from
/// an earlier epoch are never returned, so a fetch that was in flight during
/// an invalidation cannot repopulate the cache with pre-invalidation data.
pub struct TimetableCache {
    entries: MokaCache<TimetableKey, Tagged>,
    epoch: AtomicU64,
}

impl TimetableCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            epoch: AtomicU64::new(0),
        }
    }

    /// Current epoch. Read it before fetching and pass it to
    /// [`TimetableCache::insert`].
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Get cached entries for a station and direction.
    pub async fn get(&self, station: &StationKey, direction: Direction) -> Option<TimetableEntries> {
        let hit = self.entries.get(&(station.clone(), direction)).await?;
        (hit.epoch == self.epoch()).then_some(hit.entries)
    }

    /// Insert entries fetched during `epoch`. Ignored if the cache has been
    /// invalidated since.
    pub async fn insert(
        &self,
        epoch: u64,
        station: StationKey,
        direction: Direction,
        entries: TimetableEntries,
    ) {
        if epoch != self.epoch() {
            return;
        }
        self.entries
            .insert((station, direction), Tagged { epoch, entries })
            .await;
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Invalidate all cached entries, including any fetch still in flight.
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate_all();
    }
}
