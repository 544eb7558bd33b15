use ratatui::{prelude::*, widgets::*};
use unicode_width::UnicodeWidthStr;

use crate::app::state::DashboardState;
use crate::ui::components::chart::render_price_chart;
use crate::ui::components::utils::{split_horizontal, split_vertical};
use crate::ui::styles::{error_style, focus_style, header_text, secondary_line};
use crate::utils::current_human_timestamp;

const DASHBOARD_TITLE: &str = "Value-Glance Stock Price Dashboard";
const HELP_TEXT: &str =
    "Type symbol  Enter fetch  ↑/↓ interval  Tab output size  Esc cancel/quit  Ctrl+C quit";

/// Draw the whole dashboard: header, form, status line, chart and key hints.
pub fn render_dashboard(f: &mut Frame<'_>, state: &DashboardState) {
    let rows = split_vertical(
        f.size(),
        &[
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ],
    );

    let header = split_vertical(rows[0], &[Constraint::Length(1), Constraint::Length(1)]);
    f.render_widget(
        Paragraph::new(header_text(DASHBOARD_TITLE)).alignment(Alignment::Center),
        header[0],
    );
    // Very short terminals leave no room for the clock line.
    if header[1].height > 0 {
        f.render_widget(
            Paragraph::new(secondary_line(current_human_timestamp())).alignment(Alignment::Right),
            header[1],
        );
    }

    render_form(f, rows[1], state);
    f.render_widget(status_line(state), rows[2]);
    render_price_chart(
        f,
        rows[3],
        state.series(),
        state.series_label(),
        state.chart_title(),
    );
    f.render_widget(Paragraph::new(secondary_line(HELP_TEXT)), rows[4]);
}

fn render_form(f: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let cols = split_horizontal(
        area,
        &[
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    );

    let symbol_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style())
        .title("Symbol");
    let inner = symbol_block.inner(cols[0]);
    let symbol = if state.symbol().is_empty() {
        Paragraph::new(secondary_line("e.g. IBM"))
    } else {
        Paragraph::new(state.symbol())
    };
    f.render_widget(symbol.block(symbol_block), cols[0]);

    let typed = UnicodeWidthStr::width(state.symbol()) as u16;
    if inner.width > 0 {
        f.set_cursor(inner.x + typed.min(inner.width - 1), inner.y);
    }

    f.render_widget(
        Paragraph::new(format!("◀ {} ▶", state.interval()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Interval")),
        cols[1],
    );
    f.render_widget(
        Paragraph::new(state.output_size().label())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Output")),
        cols[2],
    );
}

fn status_line(state: &DashboardState) -> Paragraph<'static> {
    if state.is_loading() {
        return Paragraph::new(Line::from("Loading...".fg(Color::Yellow)));
    }
    if let Some(message) = state.error() {
        return Paragraph::new(Line::from(Span::styled(message.to_string(), error_style())));
    }

    let series = state.series();
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => Paragraph::new(secondary_line(format!(
            "{} points from {} to {}",
            series.len(),
            first.time,
            last.time
        ))),
        _ => Paragraph::new(""),
    }
}
