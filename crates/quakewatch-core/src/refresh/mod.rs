//! Dashboard state and the refresh cycle that keeps it current.

pub mod controller;
pub mod state;

pub use controller::{AutoRefresh, RefreshController, RefreshTrigger, REFRESH_INTERVAL_MS};
pub use state::{DashboardState, FETCH_ERROR_MESSAGE};
