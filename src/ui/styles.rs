use std::borrow::Cow;
use std::sync::OnceLock;

use ratatui::prelude::Stylize;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Text};

/// Accent color used for prompts, highlights, and status badges.
pub const ACCENT: Color = Color::Indexed(208);

/// Colors and marker used by the price chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    pub line: Color,
    pub axis: Color,
    pub labels: Color,
    pub title: Color,
    pub marker: Marker,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            line: Color::Rgb(75, 192, 192),
            axis: Color::DarkGray,
            labels: Color::White,
            title: Color::White,
            marker: Marker::Braille,
        }
    }
}

static CHART_THEME: OnceLock<ChartTheme> = OnceLock::new();

/// Install the chart theme. Called once from the startup path; later calls
/// leave the installed theme untouched and return `false`.
pub fn init_chart_theme(theme: ChartTheme) -> bool {
    let installed = CHART_THEME.set(theme).is_ok();
    if !installed {
        log::debug!("Chart theme already initialised; ignoring");
    }
    installed
}

pub fn chart_theme() -> ChartTheme {
    CHART_THEME.get().copied().unwrap_or_default()
}

/// Build a styled text block for headers.
pub fn header_text<'a>(text: impl Into<Cow<'a, str>>) -> Text<'a> {
    let owned = text.into().into_owned();
    Text::from(owned.bold().fg(ACCENT))
}

/// Produce a dimmed line for secondary descriptions and hints.
pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}

pub fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

/// Border style for the focused form field.
pub fn focus_style() -> Style {
    Style::default().fg(ACCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_installs_once() {
        let _ = init_chart_theme(ChartTheme::default());
        let other = ChartTheme {
            line: Color::Magenta,
            ..ChartTheme::default()
        };
        assert!(!init_chart_theme(other));
        assert_eq!(chart_theme(), ChartTheme::default());
    }
}
