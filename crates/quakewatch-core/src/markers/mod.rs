//! Map marker reconciliation.
//!
//! This module keeps a map view's markers in step with the canonical event
//! list without rebuilding the map on every refresh. Map backends implement
//! `MapSurface`; the terminal canvas in the TUI is one such backend.

pub mod reconciler;
pub mod style;

pub use reconciler::{GeoPoint, MapSurface, QuakeMap, ReconcileSummary, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use style::{marker_radius, MarkerPopup, MarkerSpec, MarkerTier, MIN_MARKER_RADIUS};
