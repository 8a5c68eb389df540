//! Derived views over the canonical event list.
//!
//! Every function here is pure and takes the list in canonical order
//! (newest first). Nothing is cached between calls.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::Earthquake;

/// Sort in place, newest first. Stable, so events sharing a timestamp keep
/// the order the feed delivered them in.
pub fn sort_newest_first(events: &mut [Earthquake]) {
    events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}

pub fn total_count(events: &[Earthquake]) -> usize {
    events.len()
}

/// Largest magnitude in the list, or 0 for an empty list.
pub fn max_magnitude(events: &[Earthquake]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    events
        .iter()
        .map(|e| e.magnitude)
        .fold(f64::NEG_INFINITY, f64::max)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LatestActivity {
    pub location: String,
    pub magnitude: f64,
}

/// The most recent event, i.e. the head of the canonical list.
pub fn latest_activity(events: &[Earthquake]) -> Option<LatestActivity> {
    events.first().map(|e| LatestActivity {
        location: e.location.clone(),
        magnitude: e.magnitude,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub id: String,
    pub label: String,
    pub magnitude: f64,
    pub location: String,
}

/// Oldest-first series for the magnitude chart.
///
/// Built by reversing the canonical list, never by sorting again, so the
/// chart is always the exact mirror of the list.
pub fn chart_series(events: &[Earthquake]) -> Vec<ChartPoint> {
    events
        .iter()
        .rev()
        .map(|e| ChartPoint {
            id: e.id.clone(),
            label: if e.display_time.is_empty() {
                e.display_date.clone()
            } else {
                e.display_time.clone()
            },
            magnitude: e.magnitude,
            location: e.location.clone(),
        })
        .collect()
}

/// Severity used for the max-magnitude card and chart bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Intensity {
    High,
    Moderate,
    Low,
}

impl Intensity {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude > 5.0 {
            Intensity::High
        } else if magnitude > 4.0 {
            Intensity::Moderate
        } else {
            Intensity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intensity::High => "High Intensity",
            Intensity::Moderate | Intensity::Low => "Low-Med Intensity",
        }
    }
}

/// Color band for the magnitude badge on list rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeBand {
    Severe,
    Strong,
    Light,
    Minor,
}

impl MagnitudeBand {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 6.0 {
            MagnitudeBand::Severe
        } else if magnitude >= 4.5 {
            MagnitudeBand::Strong
        } else if magnitude >= 3.0 {
            MagnitudeBand::Light
        } else {
            MagnitudeBand::Minor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub max_magnitude: f64,
    pub latest: Option<LatestActivity>,
    pub intensity: Intensity,
}

impl DashboardStats {
    pub fn from_events(events: &[Earthquake]) -> Self {
        let max_magnitude = max_magnitude(events);
        Self {
            total: total_count(events),
            max_magnitude,
            latest: latest_activity(events),
            intensity: Intensity::from_magnitude(max_magnitude),
        }
    }
}

/// List ordering offered to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    Newest,
    Magnitude,
}

impl SortOption {
    pub fn toggle(&self) -> Self {
        match self {
            SortOption::Newest => SortOption::Magnitude,
            SortOption::Magnitude => SortOption::Newest,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Magnitude => "magnitude",
        }
    }
}

/// Borrowed view of the canonical list in the requested order.
pub fn sorted_by(events: &[Earthquake], option: SortOption) -> Vec<&Earthquake> {
    let mut view: Vec<&Earthquake> = events.iter().collect();
    if option == SortOption::Magnitude {
        view.sort_by(|a, b| {
            b.magnitude
                .partial_cmp(&a.magnitude)
                .unwrap_or(Ordering::Equal)
        });
    }
    view
}

/// Coarse age for status text. Ages below a minute, including negative
/// ones from clock skew, read as `just now`.
pub fn age_label(age_ms: i64) -> String {
    let minutes = age_ms / 60_000;
    match minutes {
        m if m < 1 => "just now".to_string(),
        m if m < 60 => format!("{m} min ago"),
        m if m < 48 * 60 => format!("{} h ago", m / 60),
        m => format!("{} days ago", m / (24 * 60)),
    }
}

// ============================================================================
// Tests
// ============================================================================
