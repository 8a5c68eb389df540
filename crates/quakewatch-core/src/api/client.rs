//! Feed client: cache fast path, network fetch, stale-cache fallback.
//!
//! This module provides the `FeedClient` struct, the only component that
//! talks to both the network and the cache slot.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStore, KeyValueStore};
use crate::models::{Earthquake, SourceRef};

use super::{FeedError, FeedQuery, FeedSource, FetchError};

/// Attribution shown for every batch fetched from the network.
const SOURCE_TITLE: &str = "USGS Earthquake Hazards Program";
const SOURCE_URI: &str = "https://earthquake.usgs.gov/";

/// Where a `FeedData` batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Cache entry younger than the TTL; no network call was made.
    Cache,
    /// Fresh network response, already written to the cache.
    Network,
    /// The network attempt failed and an older cache entry was used instead.
    StaleCache,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedData {
    pub events: Vec<Earthquake>,
    pub sources: Vec<SourceRef>,
    pub origin: DataOrigin,
    /// When the batch was fetched from the network, whatever path served it.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl FeedData {
    fn from_entry(entry: CacheEntry, origin: DataOrigin) -> Self {
        Self {
            fetched_at: entry.fetched_at(),
            events: entry.data,
            sources: entry.sources,
            origin,
        }
    }
}

pub struct FeedClient<S, K> {
    source: S,
    cache: CacheStore<K>,
}

impl<S: FeedSource, K: KeyValueStore> FeedClient<S, K> {
    pub fn new(source: S, cache: CacheStore<K>) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &CacheStore<K> {
        &self.cache
    }

    /// Get the current feed.
    ///
    /// Without `force_refresh` a cache entry younger than the TTL is returned
    /// as-is. Otherwise, or on a miss, the network is queried and the cache
    /// overwritten. If that fails, any cached entry is returned regardless of
    /// age; only when there is none does this return an error.
    pub async fn fetch(&self, force_refresh: bool) -> Result<FeedData, FetchError> {
        self.fetch_at(force_refresh, Utc::now()).await
    }

    pub(crate) async fn fetch_at(
        &self,
        force_refresh: bool,
        now: DateTime<Utc>,
    ) -> Result<FeedData, FetchError> {
        if !force_refresh {
            if let Some(entry) = self.cache.read() {
                if entry.is_fresh(now) {
                    debug!(age_ms = entry.age_ms(now), events = entry.data.len(), "Serving feed from cache");
                    return Ok(FeedData::from_entry(entry, DataOrigin::Cache));
                }
                debug!(age_ms = entry.age_ms(now), "Cache entry expired");
            }
        }

        match self.fetch_from_network(now).await {
            Ok(data) => Ok(data),
            Err(e) => {
                warn!(error = %e, "USGS fetch failed, falling back to cache");
                match self.cache.read() {
                    Some(entry) => {
                        info!(age_ms = entry.age_ms(now), events = entry.data.len(), "Serving stale cache");
                        Ok(FeedData::from_entry(entry, DataOrigin::StaleCache))
                    }
                    None => Err(FetchError::Unavailable(e)),
                }
            }
        }
    }

    async fn fetch_from_network(&self, now: DateTime<Utc>) -> Result<FeedData, FeedError> {
        let query = FeedQuery::lookback_from(now);
        let collection = self.source.fetch_features(&query).await?;

        let events: Vec<Earthquake> = collection
            .features
            .iter()
            .map(|f| f.to_earthquake(&Local))
            .collect();
        let sources = vec![SourceRef::new(SOURCE_TITLE, SOURCE_URI)];

        // Stamp with the arrival time; `now` is when the request started
        let entry = CacheEntry::new(Utc::now(), events, sources);
        self.cache.write(&entry)?;

        info!(events = entry.data.len(), "Fetched USGS feed");
        Ok(FeedData::from_entry(entry, DataOrigin::Network))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::cache::{CacheError, MemoryStore, CACHE_KEY};
    use crate::models::FeatureCollection;

    /// Feed source that replays canned responses and counts calls.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        responses: Mutex<VecDeque<Result<FeatureCollection, FeedError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_json(&self, json: &str) {
            let collection = serde_json::from_str(json).expect("valid test feed JSON");
            self.push(Ok(collection));
        }

        pub(crate) fn push_status(&self, status: u16) {
            self.push(Err(FeedError::Status {
                status,
                body: "unavailable".to_string(),
            }));
        }

        fn push(&self, response: Result<FeatureCollection, FeedError>) {
            self.responses.lock().expect("lock").push_back(response);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FeedSource for ScriptedSource {
        async fn fetch_features(&self, _query: &FeedQuery) -> Result<FeatureCollection, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(FeedError::InvalidResponse("no scripted response".to_string())))
        }
    }

    /// Store whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
            Err(CacheError::Backend("read-only".to_string()))
        }
    }

    pub(crate) const TWO_QUAKES: &str = r#"{"features":[
        {"id":"old","properties":{"mag":3.1,"place":"Near Dhaka","time":1700000000000,"url":null},"geometry":{"coordinates":[90.4,23.7,10.0]}},
        {"id":"new","properties":{"mag":6.2,"place":"Myanmar border","time":1700000500000,"url":null},"geometry":{"coordinates":[93.1,22.0,45.0]}}
    ]}"#;

    pub(crate) fn quake(id: &str, magnitude: f64, occurred_at: i64) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            location: format!("Place {id}"),
            magnitude,
            depth: "10 km".to_string(),
            occurred_at,
            display_time: "00:00".to_string(),
            display_date: "Jan 01, 2024".to_string(),
            lat: Some(23.0),
            lon: Some(90.0),
            source_url: None,
        }
    }

    fn client(source: ScriptedSource) -> FeedClient<ScriptedSource, MemoryStore> {
        FeedClient::new(source, CacheStore::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_network_fetch_writes_cache() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = client(source);
        let now = Utc::now();

        let data = client.fetch_at(false, now).await.expect("fetch");

        assert_eq!(data.origin, DataOrigin::Network);
        assert_eq!(data.events.len(), 2);
        assert_eq!(data.sources, vec![SourceRef::new(SOURCE_TITLE, SOURCE_URI)]);

        let entry = client.cache().read().expect("cache written");
        assert!(entry.timestamp >= now.timestamp_millis());
        assert_eq!(entry.data, data.events);
    }

    #[tokio::test]
    async fn test_slow_response_is_stamped_on_arrival() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = client(source);
        // Request started 45 s ago and the response only just arrived
        let started = Utc::now() - chrono::Duration::seconds(45);

        client.fetch_at(true, started).await.expect("fetch");

        let arrived = Utc::now();
        let entry = client.cache().read().expect("cache written");
        assert!(entry.age_ms(arrived) < 1_000, "age {} ms", entry.age_ms(arrived));
        assert!(entry.is_fresh(arrived + chrono::Duration::seconds(30)));
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_uses_cache() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = client(source);

        let first = client.fetch(false).await.expect("first fetch");
        let second = client.fetch(false).await.expect("second fetch");

        assert_eq!(client.source.calls(), 1);
        assert_eq!(second.origin, DataOrigin::Cache);
        assert_eq!(first.events, second.events);
        assert_eq!(first.sources, second.sources);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let client = client(ScriptedSource::new());
        let now = Utc::now();
        let entry = CacheEntry {
            timestamp: now.timestamp_millis() - 30_000,
            data: vec![quake("cached", 4.4, 1)],
            sources: vec![SourceRef::new("cached source", "https://example.org")],
        };
        client.cache().write(&entry).expect("seed cache");

        let data = client.fetch_at(false, now).await.expect("fetch");

        assert_eq!(client.source.calls(), 0);
        assert_eq!(data.origin, DataOrigin::Cache);
        assert_eq!(data.events, entry.data);
        assert_eq!(data.sources, entry.sources);
    }

    #[tokio::test]
    async fn test_expired_cache_goes_to_network() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = client(source);
        let now = Utc::now();
        let entry = CacheEntry {
            timestamp: now.timestamp_millis() - 61_000,
            data: vec![quake("cached", 4.4, 1)],
            sources: vec![],
        };
        client.cache().write(&entry).expect("seed cache");

        let data = client.fetch_at(false, now).await.expect("fetch");

        assert_eq!(client.source.calls(), 1);
        assert_eq!(data.origin, DataOrigin::Network);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_fresh_cache() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = client(source);
        let now = Utc::now();
        client
            .cache()
            .write(&CacheEntry::new(now, vec![quake("cached", 4.4, 1)], vec![]))
            .expect("seed cache");

        let data = client.fetch_at(true, now).await.expect("fetch");

        assert_eq!(client.source.calls(), 1);
        assert_eq!(data.origin, DataOrigin::Network);
        assert_eq!(data.events.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_stale_cache() {
        let source = ScriptedSource::new();
        source.push_status(503);
        let client = client(source);
        let now = Utc::now();
        let entry = CacheEntry {
            timestamp: now.timestamp_millis() - 3_600_000,
            data: vec![quake("cached", 4.4, 1)],
            sources: vec![],
        };
        client.cache().write(&entry).expect("seed cache");

        let data = client.fetch_at(true, now).await.expect("stale fallback");

        assert_eq!(data.origin, DataOrigin::StaleCache);
        assert_eq!(data.events, entry.data);
        assert_eq!(data.fetched_at, entry.fetched_at());
        // The failed attempt must not touch the slot
        assert_eq!(client.cache().read(), Some(entry));
    }

    #[tokio::test]
    async fn test_failure_without_cache_is_surfaced() {
        let source = ScriptedSource::new();
        source.push_status(500);
        let client = client(source);

        let err = client.fetch(false).await.expect_err("no fallback available");
        let FetchError::Unavailable(cause) = err;
        assert!(matches!(cause, FeedError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_cache_falls_through_to_network() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let store = MemoryStore::new();
        store.set(CACHE_KEY, "garbage").expect("seed");
        let client = FeedClient::new(source, CacheStore::new(store));

        let data = client.fetch(false).await.expect("fetch");

        assert_eq!(client.source.calls(), 1);
        assert_eq!(data.origin, DataOrigin::Network);
    }

    #[tokio::test]
    async fn test_cache_write_failure_uses_fallback_path() {
        let source = ScriptedSource::new();
        source.push_json(TWO_QUAKES);
        let client = FeedClient::new(source, CacheStore::new(ReadOnlyStore::default()));

        let err = client.fetch(true).await.expect_err("write failed, cache empty");
        let FetchError::Unavailable(cause) = err;
        assert!(matches!(cause, FeedError::CacheWrite(_)));
    }
}
