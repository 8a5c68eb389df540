use quakewatch_core::views::{Intensity, MagnitudeBand};
use quakewatch_core::MarkerTier;
use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(64, 128, 192);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn banner_style() -> Style {
    Style::default()
        .bg(Color::Rgb(64, 24, 24))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Marker fill, from the same hex palette the web map uses.
pub fn tier_color(tier: MarkerTier) -> Color {
    tier.color().parse().unwrap_or(Color::Reset)
}

pub fn intensity_color(intensity: Intensity) -> Color {
    let tier = match intensity {
        Intensity::High => MarkerTier::High,
        Intensity::Moderate => MarkerTier::Moderate,
        Intensity::Low => MarkerTier::Minor,
    };
    tier_color(tier)
}

/// Magnitude badge on list rows.
pub fn magnitude_style(magnitude: f64) -> Style {
    let color = match MagnitudeBand::from_magnitude(magnitude) {
        MagnitudeBand::Severe => Color::Rgb(220, 38, 38),
        MagnitudeBand::Strong => tier_color(MarkerTier::Moderate),
        MagnitudeBand::Light => Color::Rgb(234, 179, 8),
        MagnitudeBand::Minor => Color::Rgb(34, 197, 94),
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_colors_parse_from_palette() {
        assert_eq!(tier_color(MarkerTier::High), Color::Rgb(239, 68, 68));
        assert_eq!(tier_color(MarkerTier::Moderate), Color::Rgb(249, 115, 22));
        assert_eq!(tier_color(MarkerTier::Minor), Color::Rgb(59, 130, 246));
    }
}
