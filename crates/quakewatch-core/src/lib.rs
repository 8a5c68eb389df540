//! Core library for quakewatch.
//!
//! Polls the USGS earthquake feed for Bangladesh and its border regions,
//! keeps the last result in a local cache slot, and derives everything the
//! dashboard shows from one normalized event list:
//!
//! - `api`: feed client with cache fast path and stale fallback
//! - `cache`: single-slot cache over a key-value backend
//! - `refresh`: single-flight refresh controller and dashboard state
//! - `markers`: diff-based map marker reconciliation
//! - `views`: pure projections (stats, chart series, list ordering)

pub mod api;
pub mod cache;
pub mod config;
pub mod markers;
pub mod models;
pub mod refresh;
pub mod views;

use std::sync::Arc;

use anyhow::{Context, Result};

pub use api::{DataOrigin, FeedClient, FeedData, FeedError, FeedSource, FetchError, UsgsSource};
pub use cache::{CacheEntry, CacheStore, FileStore, KeyValueStore, MemoryStore};
pub use config::Config;
pub use markers::{MapSurface, MarkerSpec, MarkerTier, QuakeMap};
pub use models::{Earthquake, SourceRef};
pub use refresh::{DashboardState, RefreshController, RefreshTrigger};

/// The production wiring: live USGS source over an on-disk cache.
pub type LiveFeedClient = FeedClient<UsgsSource, FileStore>;

/// Build the live feed client described by `config`.
pub fn live_feed_client(config: &Config) -> Result<Arc<LiveFeedClient>> {
    let cache_dir = config.cache_dir()?;
    let store = FileStore::new(cache_dir.clone())
        .with_context(|| format!("Failed to open cache directory {}", cache_dir.display()))?;
    let source = UsgsSource::with_base_url(config.feed_url())
        .context("Failed to build HTTP client")?;
    Ok(Arc::new(FeedClient::new(source, CacheStore::new(store))))
}
