//! Query parameters for the FDSN event service.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Number of days to look back for events.
/// The service defaults to 30 days, which leaves the list nearly empty for a
/// region this quiet.
pub const LOOKBACK_DAYS: i64 = 365;

/// Maximum number of records requested per fetch.
pub const RESULT_LIMIT: u32 = 100;

/// Geographic rectangle in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Bangladesh plus the Assam, Tripura and Myanmar border regions that shake it.
pub const REGION: BoundingBox = BoundingBox {
    min_latitude: 19.0,
    max_latitude: 28.0,
    min_longitude: 87.0,
    max_longitude: 94.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub bounds: BoundingBox,
    pub start_time: DateTime<Utc>,
    pub limit: u32,
}

impl FeedQuery {
    /// The dashboard's query: fixed region, last `LOOKBACK_DAYS` days from `now`.
    pub fn lookback_from(now: DateTime<Utc>) -> Self {
        Self {
            bounds: REGION,
            start_time: now - Duration::days(LOOKBACK_DAYS),
            limit: RESULT_LIMIT,
        }
    }

    /// Query string pairs, newest events first.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("format", "geojson".to_string()),
            ("minlatitude", self.bounds.min_latitude.to_string()),
            ("maxlatitude", self.bounds.max_latitude.to_string()),
            ("minlongitude", self.bounds.min_longitude.to_string()),
            ("maxlongitude", self.bounds.max_longitude.to_string()),
            ("orderby", "time".to_string()),
            ("limit", self.limit.to_string()),
            (
                "starttime",
                self.start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]
    }
}
