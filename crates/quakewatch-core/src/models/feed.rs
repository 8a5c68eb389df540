//! Raw GeoJSON records returned by the USGS FDSN event service.
//!
//! Only the fields the dashboard consumes are modeled; everything else in the
//! response is ignored by serde.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use super::quake::{Earthquake, UNKNOWN_DEPTH, UNKNOWN_LOCATION};

/// Time-of-day format for list rows and marker popups.
const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Calendar date format for list rows and marker popups.
const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub id: String,
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub mag: Option<f64>,
    /// Epoch milliseconds.
    pub time: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// GeoJSON point geometry. The feed orders coordinates `[lon, lat, depth_km]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Geometry {
    pub fn lon(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    pub fn lat(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }

    pub fn depth_km(&self) -> Option<f64> {
        self.coordinates.get(2).copied()
    }
}

impl Feature {
    /// Normalize this record, rendering display strings in the given timezone.
    pub fn to_earthquake<Tz>(&self, tz: &Tz) -> Earthquake
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let props = &self.properties;
        let geometry = self.geometry.as_ref();

        let (display_time, display_date) = match DateTime::from_timestamp_millis(props.time) {
            Some(utc) => {
                let local = utc.with_timezone(tz);
                (
                    local.format(DISPLAY_TIME_FORMAT).to_string(),
                    local.format(DISPLAY_DATE_FORMAT).to_string(),
                )
            }
            None => ("--:--".to_string(), "Unknown date".to_string()),
        };

        let location = props
            .place
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string();

        let depth = geometry
            .and_then(Geometry::depth_km)
            .map(|d| format!("{} km", d))
            .unwrap_or_else(|| UNKNOWN_DEPTH.to_string());

        Earthquake {
            id: self.id.clone(),
            location,
            magnitude: props.mag.unwrap_or(0.0),
            depth,
            occurred_at: props.time,
            display_time,
            display_date,
            lat: geometry.and_then(Geometry::lat),
            lon: geometry.and_then(Geometry::lon),
            source_url: props.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1700000000000, "count": 2},
        "features": [
            {
                "type": "Feature",
                "id": "us6000lxyz",
                "properties": {"mag": 4.7, "place": "25 km NNE of Cox's Bazar, Bangladesh", "time": 1700000000000, "url": "https://earthquake.usgs.gov/earthquakes/eventpage/us6000lxyz", "tsunami": 0},
                "geometry": {"type": "Point", "coordinates": [92.05, 21.62, 35.5]}
            },
            {
                "type": "Feature",
                "id": "us6000lnull",
                "properties": {"mag": null, "place": null, "time": 1699990000000, "url": null},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE)
            .expect("Failed to parse feature collection test JSON");
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.features[0].id, "us6000lxyz");
    }

    #[test]
    fn test_to_earthquake_maps_lon_lat_depth() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE).expect("parse");
        let quake = collection.features[0].to_earthquake(&Utc);

        assert_eq!(quake.lon, Some(92.05));
        assert_eq!(quake.lat, Some(21.62));
        assert_eq!(quake.depth, "35.5 km");
        assert_eq!(quake.magnitude, 4.7);
        assert_eq!(quake.occurred_at, 1_700_000_000_000);
        assert_eq!(quake.location, "25 km NNE of Cox's Bazar, Bangladesh");
        assert!(quake.source_url.is_some());
    }

    #[test]
    fn test_to_earthquake_defaults() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE).expect("parse");
        let quake = collection.features[1].to_earthquake(&Utc);

        assert_eq!(quake.magnitude, 0.0);
        assert_eq!(quake.location, UNKNOWN_LOCATION);
        assert_eq!(quake.depth, UNKNOWN_DEPTH);
        assert!(quake.lat.is_none());
        assert!(quake.lon.is_none());
        assert!(quake.source_url.is_none());
    }

    #[test]
    fn test_display_strings_use_viewer_timezone() {
        let collection: FeatureCollection = serde_json::from_str(SAMPLE).expect("parse");
        let feature = &collection.features[0];

        // 1700000000000 ms is 2023-11-14 22:13:20 UTC
        let utc = feature.to_earthquake(&Utc);
        assert_eq!(utc.display_time, "22:13");
        assert_eq!(utc.display_date, "Nov 14, 2023");

        // Dhaka is UTC+6, which rolls over to the next day
        let dhaka = FixedOffset::east_opt(6 * 3600).expect("valid offset");
        let local = feature.to_earthquake(&dhaka);
        assert_eq!(local.display_time, "04:13");
        assert_eq!(local.display_date, "Nov 15, 2023");
    }

    #[test]
    fn test_whole_number_depth_has_no_fraction() {
        let json = r#"{"id":"x","properties":{"time":0},"geometry":{"coordinates":[90.0,23.0,10.0]}}"#;
        let feature: Feature = serde_json::from_str(json).expect("parse");
        assert_eq!(feature.to_earthquake(&Utc).depth, "10 km");
    }

    #[test]
    fn test_blank_place_uses_placeholder() {
        let json = r#"{"id":"x","properties":{"time":0,"place":"  "}}"#;
        let feature: Feature = serde_json::from_str(json).expect("parse");
        assert_eq!(feature.to_earthquake(&Utc).location, UNKNOWN_LOCATION);
    }
}
