//! USGS feed access.
//!
//! This module provides the `FeedClient` for retrieving the regional
//! earthquake feed, backed by the single-slot cache. The network side is
//! reached through the `FeedSource` trait; `UsgsSource` is the live
//! implementation over reqwest.

pub mod client;
pub mod error;
pub mod query;
pub mod source;

pub use client::{DataOrigin, FeedClient, FeedData};
pub use error::{FeedError, FetchError};
pub use query::{BoundingBox, FeedQuery, LOOKBACK_DAYS, REGION, RESULT_LIMIT};
pub use source::{FeedSource, UsgsSource, USGS_QUERY_URL};
