//! Magnitude trend chart.

use quakewatch_core::views::{ChartPoint, Intensity};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph},
    Frame,
};

use super::styles;

/// Bars are scaled by this factor so one decimal of magnitude survives the
/// integer bar values.
const VALUE_SCALE: f64 = 10.0;

const BAR_WIDTH: u16 = 5;
const BAR_GAP: u16 = 1;

/// The newest points that fit in `width` cells, still oldest first.
pub fn visible_points(series: &[ChartPoint], width: u16) -> &[ChartPoint] {
    let fit = usize::from(width / (BAR_WIDTH + BAR_GAP)).max(1);
    &series[series.len().saturating_sub(fit)..]
}

fn bar_value(magnitude: f64) -> u64 {
    (magnitude.max(0.0) * VALUE_SCALE).round() as u64
}

pub fn render(frame: &mut Frame, area: Rect, block: Block, series: &[ChartPoint]) {
    if series.is_empty() {
        let empty = Paragraph::new(Line::styled(" No data to chart", styles::muted_style())).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let points = visible_points(series, block.inner(area).width);
    let bars: Vec<Bar> = points
        .iter()
        .map(|point| {
            let color = styles::intensity_color(Intensity::from_magnitude(point.magnitude));
            Bar::default()
                .value(bar_value(point.magnitude))
                .text_value(format!("{:.1}", point.magnitude))
                .label(Line::from(point.label.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, magnitude: f64) -> ChartPoint {
        ChartPoint {
            id: id.to_string(),
            label: "12:00".to_string(),
            magnitude,
            location: "Sylhet".to_string(),
        }
    }

    #[test]
    fn test_visible_points_keeps_newest() {
        let series: Vec<ChartPoint> = (0..10).map(|i| point(&i.to_string(), 4.0)).collect();
        let visible = visible_points(&series, 12);

        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["8", "9"]);
    }

    #[test]
    fn test_visible_points_short_series() {
        let series = vec![point("a", 3.0), point("b", 5.0)];
        assert_eq!(visible_points(&series, 200).len(), 2);
        assert_eq!(visible_points(&series, 0).len(), 1);
    }

    #[test]
    fn test_bar_value_scaling() {
        assert_eq!(bar_value(4.26), 43);
        assert_eq!(bar_value(6.0), 60);
        assert_eq!(bar_value(-0.5), 0);
    }
}
