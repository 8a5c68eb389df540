use serde::{Deserialize, Serialize};

/// Placeholder for features that arrive without a place description.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Placeholder for features whose geometry carries no depth component.
pub const UNKNOWN_DEPTH: &str = "Unknown depth";

/// One seismic occurrence, normalized from the upstream feed.
///
/// Display strings are computed once when the record is parsed and are
/// never recomputed, so a cached batch renders exactly as it did when fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    pub id: String,
    pub location: String,
    pub magnitude: f64,
    pub depth: String,
    /// Epoch milliseconds; canonical ordering key.
    pub occurred_at: i64,
    pub display_time: String,
    pub display_date: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl Earthquake {
    /// Both coordinates, if the event can be placed on a map.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn magnitude_display(&self) -> String {
        format!("{:.1}", self.magnitude)
    }

    pub fn coordinates_display(&self) -> Option<String> {
        self.coordinates()
            .map(|(lat, lon)| format!("{:.2}, {:.2}", lat, lon))
    }

    pub fn when_display(&self) -> String {
        format!("{}, {}", self.display_time, self.display_date)
    }
}

/// Attribution for the data on screen. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
}

impl SourceRef {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(lat: Option<f64>, lon: Option<f64>) -> Earthquake {
        Earthquake {
            id: "us7000abcd".to_string(),
            location: "10 km SE of Sylhet, Bangladesh".to_string(),
            magnitude: 4.56,
            depth: "35 km".to_string(),
            occurred_at: 1_700_000_000_000,
            display_time: "04:13".to_string(),
            display_date: "Nov 14, 2023".to_string(),
            lat,
            lon,
            source_url: None,
        }
    }

    #[test]
    fn test_coordinates_require_both_components() {
        assert_eq!(quake(Some(24.8), Some(91.9)).coordinates(), Some((24.8, 91.9)));
        assert!(quake(Some(24.8), None).coordinates().is_none());
        assert!(quake(None, Some(91.9)).coordinates().is_none());
        assert!(quake(None, None).coordinates().is_none());
    }

    #[test]
    fn test_display_helpers() {
        let q = quake(Some(24.8123), Some(91.9876));
        assert_eq!(q.magnitude_display(), "4.6");
        assert_eq!(q.coordinates_display().as_deref(), Some("24.81, 91.99"));
        assert_eq!(q.when_display(), "04:13, Nov 14, 2023");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(quake(None, None)).expect("serialize");
        assert_eq!(json["occurredAt"], 1_700_000_000_000i64);
        assert_eq!(json["displayTime"], "04:13");
        assert!(json.get("occurred_at").is_none());
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let json = r#"{"id":"a","location":"x","magnitude":3.0,"depth":"1 km","occurredAt":5,"displayTime":"00:00","displayDate":"Jan 01, 1970"}"#;
        let q: Earthquake = serde_json::from_str(json).expect("parse");
        assert!(q.lat.is_none());
        assert!(q.source_url.is_none());
    }
}
