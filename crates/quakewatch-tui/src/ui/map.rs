//! Terminal map backend.
//!
//! `CanvasMap` keeps the markers the reconciler hands it and draws them as
//! circles over a world outline on a ratatui canvas.

use std::collections::BTreeMap;

use quakewatch_core::api::REGION;
use quakewatch_core::markers::{GeoPoint, MapSurface, MarkerSpec, MarkerTier, DEFAULT_CENTER, DEFAULT_ZOOM};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block,
    },
    Frame,
};

use super::styles;

/// Web map tile edge in pixels; marker radii are expressed in these units.
const TILE_SIZE_PX: f64 = 256.0;

pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 9;

/// Terminal cells are roughly twice as tall as wide.
const CELL_ASPECT: f64 = 2.0;

/// Border kept around the queried region in the initial view.
const FIT_MARGIN_DEG: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u64);

#[derive(Debug, Clone)]
pub struct CanvasMap {
    next_id: u64,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    center: GeoPoint,
    zoom: u8,
}

impl Default for CanvasMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasMap {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            markers: BTreeMap::new(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.values()
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Degrees of longitude per web map pixel at the current zoom. Used to
    /// size marker circles.
    fn degrees_per_px(&self) -> f64 {
        360.0 / (TILE_SIZE_PX * 2f64.powi(i32::from(self.zoom)))
    }

    /// Visible `(x, y)` bounds in degrees for a canvas of `area` cells.
    ///
    /// At `DEFAULT_ZOOM` the view is the smallest one around `center` that
    /// holds the whole queried region, whatever the canvas shape. Each zoom
    /// step halves or doubles the span.
    pub fn bounds(&self, area: Rect) -> ([f64; 2], [f64; 2]) {
        let width = f64::from(area.width.max(1));
        let height = f64::from(area.height.max(1)) * CELL_ASPECT;

        let half_lon = (self.center.lon - REGION.min_longitude)
            .max(REGION.max_longitude - self.center.lon)
            + FIT_MARGIN_DEG;
        let half_lat = (self.center.lat - REGION.min_latitude)
            .max(REGION.max_latitude - self.center.lat)
            + FIT_MARGIN_DEG;

        // Degrees per cell width, equal on both axes
        let fitted = (2.0 * half_lon / width).max(2.0 * half_lat / height);
        let per_cell = fitted / 2f64.powi(i32::from(self.zoom) - i32::from(DEFAULT_ZOOM));

        let lon_span = per_cell * width;
        let lat_span = per_cell * height;
        (
            [self.center.lon - lon_span / 2.0, self.center.lon + lon_span / 2.0],
            [self.center.lat - lat_span / 2.0, self.center.lat + lat_span / 2.0],
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, block: Block, selected: Option<&str>) {
        let inner = block.inner(area);
        let (x_bounds, y_bounds) = self.bounds(inner);
        let scale = self.degrees_per_px();

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: styles::MUTED,
                });
                ctx.layer();

                for spec in self.markers.values() {
                    ctx.draw(&Circle {
                        x: spec.lon,
                        y: spec.lat,
                        radius: spec.radius * scale,
                        color: styles::tier_color(spec.tier),
                    });
                }

                if let Some(spec) = selected.and_then(|id| self.markers.values().find(|m| m.id == id)) {
                    ctx.layer();
                    ctx.print(
                        spec.lon,
                        spec.lat,
                        Line::from(Span::styled(
                            "◉",
                            Style::default()
                                .fg(styles::tier_color(spec.tier))
                                .add_modifier(Modifier::BOLD),
                        )),
                    );
                }
            });

        frame.render_widget(canvas, area);
    }
}

impl MapSurface for CanvasMap {
    type Handle = MarkerId;

    fn add_marker(&mut self, spec: &MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(id, spec.clone());
        id
    }

    fn remove_marker(&mut self, handle: MarkerId) {
        self.markers.remove(&handle);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Legend line for the map footer.
pub fn legend() -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for tier in MarkerTier::ALL {
        spans.push(Span::styled("● ", Style::default().fg(styles::tier_color(tier))));
        spans.push(Span::styled(format!("{}  ", tier.legend()), styles::muted_style()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quakewatch_core::markers::QuakeMap;
    use quakewatch_core::Earthquake;

    fn quake(id: &str, magnitude: f64, lat: f64, lon: f64) -> Earthquake {
        Earthquake {
            id: id.to_string(),
            location: "Sylhet".to_string(),
            magnitude,
            depth: "10 km".to_string(),
            occurred_at: 1_700_000_000_000,
            display_time: "22:13".to_string(),
            display_date: "Nov 14, 2023".to_string(),
            lat: Some(lat),
            lon: Some(lon),
            source_url: None,
        }
    }

    #[test]
    fn test_handles_are_unique_after_removal() {
        let mut map = CanvasMap::new();
        let spec = MarkerSpec::for_event(&quake("a", 4.0, 24.0, 91.0)).expect("mappable");

        let first = map.add_marker(&spec);
        map.remove_marker(first);
        let second = map.add_marker(&spec);

        assert_ne!(first, second);
        assert_eq!(map.markers().count(), 1);
    }

    fn covers_region(x: [f64; 2], y: [f64; 2]) -> bool {
        x[0] < REGION.min_longitude
            && x[1] > REGION.max_longitude
            && y[0] < REGION.min_latitude
            && y[1] > REGION.max_latitude
    }

    #[test]
    fn test_default_view_covers_region() {
        let map = QuakeMap::new(CanvasMap::new());
        let (x, y) = map.surface().bounds(Rect::new(0, 0, 80, 24));

        assert!(covers_region(x, y), "bounds {x:?} {y:?}");
    }

    #[test]
    fn test_default_view_covers_region_for_any_canvas_shape() {
        let map = CanvasMap::new();
        for (width, height) in [(20, 40), (200, 8), (94, 21), (1, 1)] {
            let (x, y) = map.bounds(Rect::new(0, 0, width, height));
            assert!(covers_region(x, y), "{width}x{height}: {x:?} {y:?}");
        }
    }

    #[test]
    fn test_zoom_in_halves_span() {
        let area = Rect::new(0, 0, 80, 24);
        let mut map = CanvasMap::new();
        let (x, _) = map.bounds(area);
        map.zoom_in();
        let (zoomed, _) = map.bounds(area);

        let span = x[1] - x[0];
        assert!(((zoomed[1] - zoomed[0]) - span / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reconcile_drives_canvas_markers() {
        let mut map = QuakeMap::new(CanvasMap::new());
        map.reconcile(&[quake("a", 4.0, 24.0, 91.0), quake("b", 5.5, 22.0, 93.0)]);
        map.reconcile(&[quake("b", 5.5, 22.0, 93.0)]);

        let ids: Vec<&str> = map.surface().markers().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["b"]);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut map = CanvasMap::new();
        for _ in 0..20 {
            map.zoom_in();
        }
        assert_eq!(map.zoom(), MAX_ZOOM);
        for _ in 0..20 {
            map.zoom_out();
        }
        assert_eq!(map.zoom(), MIN_ZOOM);
    }
}
