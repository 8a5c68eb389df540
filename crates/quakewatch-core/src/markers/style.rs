use crate::models::Earthquake;

/// Smallest radius a marker is drawn with, so minor events stay visible.
pub const MIN_MARKER_RADIUS: f64 = 5.0;

/// Radius units per unit of magnitude.
const RADIUS_PER_MAGNITUDE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTier {
    /// 5.0 and above
    High,
    /// 4.0 to 4.9
    Moderate,
    /// Below 4.0
    Minor,
}

impl MarkerTier {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 5.0 {
            MarkerTier::High
        } else if magnitude >= 4.0 {
            MarkerTier::Moderate
        } else {
            MarkerTier::Minor
        }
    }

    /// Fill color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            MarkerTier::High => "#ef4444",
            MarkerTier::Moderate => "#f97316",
            MarkerTier::Minor => "#3b82f6",
        }
    }

    pub fn legend(&self) -> &'static str {
        match self {
            MarkerTier::High => "5.0+ (High)",
            MarkerTier::Moderate => "4.0 - 4.9 (Mod)",
            MarkerTier::Minor => "< 4.0 (Minor)",
        }
    }

    pub const ALL: [MarkerTier; 3] = [MarkerTier::High, MarkerTier::Moderate, MarkerTier::Minor];
}

pub fn marker_radius(magnitude: f64) -> f64 {
    (magnitude * RADIUS_PER_MAGNITUDE).max(MIN_MARKER_RADIUS)
}

/// Descriptive metadata shown when a marker is inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPopup {
    pub location: String,
    pub magnitude: String,
    pub depth: String,
    pub time: String,
    pub date: String,
}

/// Everything a map backend needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub tier: MarkerTier,
    pub radius: f64,
    pub popup: MarkerPopup,
}

impl MarkerSpec {
    /// Build the marker for a mappable event; `None` if a coordinate is missing.
    pub fn for_event(event: &Earthquake) -> Option<Self> {
        let (lat, lon) = event.coordinates()?;
        Some(Self {
            id: event.id.clone(),
            lat,
            lon,
            tier: MarkerTier::from_magnitude(event.magnitude),
            radius: marker_radius(event.magnitude),
            popup: MarkerPopup {
                location: event.location.clone(),
                magnitude: event.magnitude_display(),
                depth: event.depth.clone(),
                time: event.display_time.clone(),
                date: event.display_date.clone(),
            },
        })
    }
}
