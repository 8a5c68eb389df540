//! Local caching module for offline data access.
//!
//! This module provides the `CacheStore` for keeping the last successfully
//! fetched feed on disk. The cache is a single slot: one fixed key holding the
//! full event list, its attribution and the time it was fetched. Entries
//! younger than 60 seconds are served without touching the network; older
//! entries are only used as a fallback when the feed is unreachable.
//!
//! Storage backends implement `KeyValueStore`:
//! - `FileStore`: one JSON file per key under the cache directory
//! - `MemoryStore`: in-process map, for tests and ephemeral runs

pub mod manager;
pub mod store;

pub use manager::{CacheEntry, CacheStore, CACHE_KEY, CACHE_TTL_MS};
pub use store::{CacheError, FileStore, KeyValueStore, MemoryStore};
