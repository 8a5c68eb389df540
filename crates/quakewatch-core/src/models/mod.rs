//! Data models for seismic feed entities.
//!
//! This module contains the data structures used to represent
//! feed data including:
//!
//! - `Earthquake`, `SourceRef`: the normalized event model shared by every view
//! - `FeatureCollection`, `Feature`: raw GeoJSON records as returned by USGS

pub mod feed;
pub mod quake;

pub use feed::{Feature, FeatureCollection, FeatureProperties, Geometry};
pub use quake::{Earthquake, SourceRef, UNKNOWN_DEPTH, UNKNOWN_LOCATION};
