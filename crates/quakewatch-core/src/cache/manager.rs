use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Earthquake, SourceRef};

use super::store::{CacheError, KeyValueStore};

/// The single slot every feed result is written to. Not namespaced per query.
pub const CACHE_KEY: &str = "quake_monitor_usgs_cache";

/// Cache entries younger than this are served without a network call.
/// Matches the upstream feed's own update frequency.
pub const CACHE_TTL_MS: i64 = 60 * 1000;

/// Persisted record: `{ timestamp, data, sources }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fetch time in epoch milliseconds.
    pub timestamp: i64,
    pub data: Vec<Earthquake>,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

impl CacheEntry {
    pub fn new(fetched_at: DateTime<Utc>, data: Vec<Earthquake>, sources: Vec<SourceRef>) -> Self {
        Self {
            timestamp: fetched_at.timestamp_millis(),
            data,
            sources,
        }
    }

    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp_millis() - self.timestamp
    }

    /// Whether the entry may be served on the fast path.
    /// A timestamp from the future (clock skew) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.age_ms(now) < CACHE_TTL_MS
    }

    /// `None` only for a timestamp outside chrono's range.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Single-slot cache over any `KeyValueStore`.
pub struct CacheStore<K> {
    backend: K,
}

impl<K: KeyValueStore> CacheStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    /// Load the cached entry. Unreadable or corrupt entries are logged and
    /// reported as a miss; this never fails.
    pub fn read(&self) -> Option<CacheEntry> {
        match self.try_read() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = CACHE_KEY, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    fn try_read(&self) -> Result<Option<CacheEntry>, CacheError> {
        let Some(raw) = self.backend.get(CACHE_KEY)? else {
            debug!(key = CACHE_KEY, "Cache slot empty");
            return Ok(None);
        };

        let entry = serde_json::from_str(&raw).map_err(|source| CacheError::Parse {
            key: CACHE_KEY.to_string(),
            source,
        })?;
        Ok(Some(entry))
    }

    /// Overwrite the slot with `entry`.
    pub fn write(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let contents = serde_json::to_string(entry).map_err(CacheError::Serialize)?;
        self.backend.set(CACHE_KEY, &contents)?;
        debug!(key = CACHE_KEY, events = entry.data.len(), "Cache slot written");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
