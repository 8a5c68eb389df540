use chrono::{Local, Utc};
use quakewatch_core::views::{self, DashboardStats};
use quakewatch_core::{FeedSource, KeyValueStore, MarkerSpec};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::{App, AppState};

use super::{chart, map, styles};

const TITLE: &str = "  Bangladesh QuakeMonitor";
const SUBTITLE: &str = "Real-time seismic activity (Powered by USGS)";
const EMPTY_MESSAGE: &str = "No recent earthquakes detected in the Bangladesh region (USGS).";

pub fn render<S, K>(frame: &mut Frame, app: &App<S, K>)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let banner_height = if app.dashboard().error_banner().is_some() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title bar
            Constraint::Length(banner_height), // Error banner
            Constraint::Length(4),             // Stat cards
            Constraint::Min(10),               // Main content
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_error_banner(frame, app, chunks[1]);
    render_stats(frame, app, chunks[2]);
    render_main_content(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let dashboard = app.dashboard();

    let last_updated = match dashboard.last_updated {
        Some(at) => at.with_timezone(&Local).format("%H:%M:%S").to_string(),
        None => "Never".to_string(),
    };
    // The refresh hint is disabled while the first load runs
    let refresh_hint = if dashboard.is_cold_loading() {
        Span::styled("Updating...", styles::highlight_style())
    } else {
        Span::styled("[r] Refresh", styles::muted_style())
    };

    let left = vec![
        Span::styled(TITLE, styles::title_style()),
        Span::styled(format!("  {SUBTITLE}"), styles::muted_style()),
    ];
    let right = vec![
        Span::styled("Last Updated: ", styles::muted_style()),
        Span::styled(last_updated, styles::list_item_style()),
        Span::styled("  |  ", styles::muted_style()),
        refresh_hint,
        Span::styled("  [?] Help ", styles::muted_style()),
    ];

    let used: usize = left.iter().chain(right.iter()).map(|s| s.width()).sum();
    let padding = (area.width as usize).saturating_sub(used);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.extend(right);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_error_banner<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    if let Some(message) = app.dashboard().error_banner() {
        let paragraph = Paragraph::new(format!(" ⚠ {message}")).style(styles::banner_style());
        frame.render_widget(paragraph, area);
    }
}

fn render_stats<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let dashboard = app.dashboard();
    let loading = dashboard.is_cold_loading();
    let DashboardStats {
        total,
        max_magnitude,
        latest,
        intensity,
    } = dashboard.stats();

    let placeholder = || Span::styled("...", styles::muted_style());

    let total_value = if loading {
        placeholder()
    } else {
        Span::styled(total.to_string(), styles::title_style())
    };
    render_stat_card(frame, chunks[0], "Events (Last 365 Days)", Line::from(total_value));

    let max_value = if loading {
        Line::from(placeholder())
    } else {
        let color = styles::intensity_color(intensity);
        Line::from(vec![
            Span::styled(
                format!("{max_magnitude:.1}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", intensity.label()), Style::default().fg(color)),
        ])
    };
    render_stat_card(frame, chunks[1], "Max Magnitude", max_value);

    let latest_value = match latest {
        _ if loading => Line::from(placeholder()),
        Some(latest) => Line::from(vec![
            Span::styled(format!("M {:.1}", latest.magnitude), styles::magnitude_style(latest.magnitude)),
            Span::styled(format!("  {}", latest.location), styles::list_item_style()),
        ]),
        None => Line::from(Span::styled("-", styles::muted_style())),
    };
    render_stat_card(frame, chunks[2], "Latest Activity", latest_value);
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: Line) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(value).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(6)])
        .split(columns[0]);

    let sources_height = if app.dashboard().sources.is_empty() {
        0
    } else {
        app.dashboard().sources.len() as u16 + 2
    };
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(8),
            Constraint::Length(sources_height),
        ])
        .split(columns[1]);

    render_map(frame, app, left[0]);
    render_event_list(frame, app, left[1]);
    render_chart(frame, app, right[0]);
    render_event_detail(frame, app, right[1]);
    render_sources(frame, app, right[2]);
}

fn render_map<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let block = Block::default()
        .title(format!(" Map ({} plotted) ", app.map.len()))
        .title_style(styles::muted_style())
        .title_bottom(map::legend())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let selected = app.selected_event().map(|e| e.id.as_str());
    app.map.surface().render(frame, area, block, selected);
}

fn render_event_list<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let dashboard = app.dashboard();
    let title = format!(" Recent Events ({}) - [s]ort: {} ", dashboard.events.len(), app.sort.label());
    let block = Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if !dashboard.has_data() {
        let message = if dashboard.is_cold_loading() {
            Span::styled(" Loading seismic data...", styles::muted_style())
        } else {
            Span::styled(format!(" {EMPTY_MESSAGE}"), styles::muted_style())
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let header = Row::new([
        Cell::from("Mag"),
        Cell::from("Location"),
        Cell::from("Time"),
        Cell::from("Date"),
        Cell::from("Depth"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .list_events()
        .iter()
        .map(|event| {
            Row::new(vec![
                Cell::from(Span::styled(event.magnitude_display(), styles::magnitude_style(event.magnitude))),
                Cell::from(event.location.as_str()),
                Cell::from(event.display_time.as_str()),
                Cell::from(event.display_date.as_str()),
                Cell::from(event.depth.as_str()),
            ])
            .style(styles::list_item_style())
        })
        .collect();

    let widths = [
        Constraint::Length(5),  // Mag
        Constraint::Fill(1),    // Location
        Constraint::Length(6),  // Time
        Constraint::Length(13), // Date: "Nov 14, 2023"
        Constraint::Length(14), // Depth
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_chart<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let block = Block::default()
        .title(" Magnitude Trend ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let series = views::chart_series(&app.dashboard().events);
    chart::render(frame, area, block, &series);
}

fn render_event_detail<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let block = Block::default()
        .title(" Details ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let Some(event) = app.selected_event() else {
        let empty = Paragraph::new(Span::styled(" Select an event to see details", styles::muted_style()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(event.location.as_str(), styles::title_style())),
        Line::from(""),
    ];

    // Mappable events show exactly what their marker popup would
    match MarkerSpec::for_event(event) {
        Some(marker) => {
            let popup = marker.popup;
            lines.push(detail_line("Magnitude: ", Span::styled(popup.magnitude, styles::magnitude_style(event.magnitude))));
            lines.push(detail_line("Depth:     ", Span::raw(popup.depth)));
            lines.push(detail_line("Time:      ", Span::raw(popup.time)));
            lines.push(detail_line("Date:      ", Span::raw(popup.date)));
            lines.push(detail_line(
                "Marker:    ",
                Span::styled(marker.tier.legend(), Style::default().fg(styles::tier_color(marker.tier))),
            ));
        }
        None => {
            lines.push(detail_line("Magnitude: ", Span::styled(event.magnitude_display(), styles::magnitude_style(event.magnitude))));
            lines.push(detail_line("Depth:     ", Span::raw(event.depth.as_str())));
            lines.push(detail_line("When:      ", Span::raw(event.when_display())));
        }
    }

    let coordinates = event
        .coordinates_display()
        .unwrap_or_else(|| "Not mappable".to_string());
    lines.push(detail_line("Location:  ", Span::raw(coordinates)));

    if let Some(ref url) = event.source_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(url.as_str(), styles::highlight_style())));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn detail_line<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![Span::styled(label, styles::muted_style()), value])
}

fn render_sources<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let sources = &app.dashboard().sources;
    if sources.is_empty() {
        return;
    }

    let lines: Vec<Line> = sources
        .iter()
        .map(|source| {
            Line::from(vec![
                Span::styled(format!(" {}", source.title), styles::list_item_style()),
                Span::styled(format!("  {}", source.uri), styles::muted_style()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Data Sources ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar<S, K>(frame: &mut Frame, app: &App<S, K>, area: Rect)
where
    S: FeedSource,
    K: KeyValueStore + 'static,
{
    let dashboard = app.dashboard();
    let shortcuts = "[r]efresh | [s]ort | [+/-] zoom | [q]uit";

    let left = if let Some(notice) = dashboard.stale_notice() {
        let text = match dashboard.data_age(Utc::now()) {
            Some(age) => format!(" {notice} Data from {age}. "),
            None => format!(" {notice} "),
        };
        Span::styled(text, styles::error_style())
    } else if app.controller.is_refreshing() && dashboard.has_data() {
        Span::styled(" Refreshing in background... ", styles::muted_style())
    } else {
        Span::styled(" Auto-refresh every 60s ", styles::muted_style())
    };
    let right = Span::styled(format!(" {shortcuts} "), styles::muted_style());

    let padding_len = (area.width as usize)
        .saturating_sub(left.width())
        .saturating_sub(right.width());
    let status_line = Line::from(vec![left, Span::raw(" ".repeat(padding_len)), right]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 16, frame.area());

    frame.render_widget(Clear, area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  Keyboard Shortcuts", styles::title_style())),
        Line::from(""),
        key("r / u", "Refresh now"),
        key("s", "Toggle sort (newest / magnitude)"),
        key("j / Down", "Next event"),
        key("k / Up", "Previous event"),
        key("PgDn / PgUp", "Page down / up"),
        key("g / G", "First / last event"),
        key("+ / -", "Zoom map in / out"),
        key("?", "Toggle help"),
        key("q / Esc", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press any key", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
