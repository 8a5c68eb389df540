use chrono::{DateTime, Utc};

use crate::models::{Earthquake, SourceRef};
use crate::views::{age_label, DashboardStats};

/// Message shown when a refresh could not reach the feed.
pub const FETCH_ERROR_MESSAGE: &str = "Unable to reach USGS service. Showing last known info.";

/// Everything the dashboard renders from.
///
/// Only `RefreshController` mutates this; views get `&DashboardState` or a
/// cloned snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub loading: bool,
    pub error: Option<String>,
    /// Newest first.
    pub events: Vec<Earthquake>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Fetch time of the batch on screen. Older than `last_updated` when a
    /// stale cache entry is being shown.
    pub data_fetched_at: Option<DateTime<Utc>>,
    pub sources: Vec<SourceRef>,
}

impl DashboardState {
    pub fn has_data(&self) -> bool {
        !self.events.is_empty()
    }

    /// True only while the very first load is in flight; background
    /// refreshes over existing data never show a loading state.
    pub fn is_cold_loading(&self) -> bool {
        self.loading && self.events.is_empty()
    }

    /// The blocking error banner. Shown only when there is nothing else to show.
    pub fn error_banner(&self) -> Option<&str> {
        if self.has_data() {
            None
        } else {
            self.error.as_deref()
        }
    }

    /// Non-blocking notice that the data on screen may be out of date.
    pub fn stale_notice(&self) -> Option<&str> {
        if self.has_data() {
            self.error.as_deref()
        } else {
            None
        }
    }

    /// How old the batch on screen is, e.g. `12 min ago`.
    pub fn data_age(&self, now: DateTime<Utc>) -> Option<String> {
        self.data_fetched_at
            .map(|at| age_label((now - at).num_milliseconds()))
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_events(&self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::quake;

    #[test]
    fn test_error_banner_only_without_data() {
        let mut state = DashboardState {
            error: Some(FETCH_ERROR_MESSAGE.to_string()),
            ..Default::default()
        };
        assert_eq!(state.error_banner(), Some(FETCH_ERROR_MESSAGE));
        assert!(state.stale_notice().is_none());

        state.events.push(quake("a", 3.0, 1));
        assert!(state.error_banner().is_none());
        assert_eq!(state.stale_notice(), Some(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_data_age() {
        let now = Utc::now();
        let mut state = DashboardState::default();
        assert!(state.data_age(now).is_none());

        state.data_fetched_at = Some(now - chrono::Duration::minutes(90));
        assert_eq!(state.data_age(now).as_deref(), Some("1 h ago"));
    }

    #[test]
    fn test_cold_loading() {
        let mut state = DashboardState {
            loading: true,
            ..Default::default()
        };
        assert!(state.is_cold_loading());

        state.events.push(quake("a", 3.0, 1));
        assert!(!state.is_cold_loading());
    }
}
