use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::Earthquake;

use super::style::MarkerSpec;

/// Initial map center: roughly the middle of Bangladesh.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 23.6850,
    lon: 90.3563,
};

pub const DEFAULT_ZOOM: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// The only operations the reconciler needs from a map backend.
pub trait MapSurface {
    /// Opaque reference to a drawn marker, handed back on removal.
    type Handle;

    fn add_marker(&mut self, spec: &MarkerSpec) -> Self::Handle;

    fn remove_marker(&mut self, handle: Self::Handle);

    fn set_view(&mut self, center: GeoPoint, zoom: u8);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// A map view plus the registry of markers currently drawn on it.
///
/// The registry lives as long as the view. Each refresh is applied as a diff:
/// new ids gain a marker, vanished ids lose theirs, and markers for ids seen
/// before are left alone even if the event's fields changed upstream.
pub struct QuakeMap<M: MapSurface> {
    surface: M,
    registry: HashMap<String, M::Handle>,
}

impl<M: MapSurface> QuakeMap<M> {
    pub fn new(mut surface: M) -> Self {
        surface.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);
        Self {
            surface,
            registry: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    pub fn marker_ids(&self) -> HashSet<&str> {
        self.registry.keys().map(String::as_str).collect()
    }

    /// Bring the registry in line with `events`. Afterwards the registry's
    /// key set equals the ids of the events that have both coordinates.
    pub fn reconcile(&mut self, events: &[Earthquake]) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut active: HashSet<&str> = HashSet::with_capacity(events.len());

        for event in events {
            let Some(spec) = MarkerSpec::for_event(event) else {
                continue;
            };
            active.insert(event.id.as_str());

            if !self.registry.contains_key(&event.id) {
                let handle = self.surface.add_marker(&spec);
                self.registry.insert(event.id.clone(), handle);
                summary.added += 1;
            }
        }

        let stale: Vec<String> = self
            .registry
            .keys()
            .filter(|id| !active.contains(id.as_str()))
            .cloned()
            .collect();

        for id in stale {
            if let Some(handle) = self.registry.remove(&id) {
                self.surface.remove_marker(handle);
                summary.removed += 1;
            }
        }

        if !summary.is_noop() {
            debug!(added = summary.added, removed = summary.removed, total = self.registry.len(), "Map markers reconciled");
        }
        summary
    }
}
