use ratatui::{
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::fetch::StockSeries;
use crate::ui::styles::chart_theme;

const AXIS_TIME_FMT: &str = "%m-%d %H:%M";

/// Draw the close-price series as a single line dataset.
pub fn render_price_chart(
    f: &mut Frame<'_>,
    area: Rect,
    series: &StockSeries,
    label: String,
    title: String,
) {
    let theme = chart_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(theme.title).add_modifier(Modifier::BOLD)));

    let points = series.close_points();
    let Some((low, high)) = series.close_bounds() else {
        f.render_widget(
            Paragraph::new("No price data to chart.")
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    };

    let (y_min, y_max) = padded_bounds(low, high);
    let x_max = (series.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name(label)
        .marker(theme.marker)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.line))
        .data(&points)];

    let label_style = Style::default().fg(theme.labels);
    let x_labels = time_labels(series)
        .into_iter()
        .map(|text| Span::styled(text, label_style))
        .collect::<Vec<_>>();
    let y_labels = price_labels(y_min, y_max)
        .into_iter()
        .map(|text| Span::styled(text, label_style))
        .collect::<Vec<_>>();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

/// Widen the close range so the line never hugs the frame.
fn padded_bounds(low: f64, high: f64) -> (f64, f64) {
    if (high - low).abs() < 1e-9 {
        let span = if low.abs() < 1.0 { 1.0 } else { low.abs() * 0.05 };
        return (low - span / 2.0, high + span / 2.0);
    }
    let pad = (high - low) * 0.05;
    (low - pad, high + pad)
}

fn price_labels(min: f64, max: f64) -> Vec<String> {
    let mid = (min + max) / 2.0;
    [min, mid, max]
        .iter()
        .map(|value| format!("{value:.2}"))
        .collect()
}

/// First, middle and last timestamps, deduplicated for short series.
fn time_labels(series: &StockSeries) -> Vec<String> {
    let points = series.points();
    if points.is_empty() {
        return Vec::new();
    }

    let last = points.len() - 1;
    let mut indices = vec![0, last / 2, last];
    indices.dedup();

    indices
        .into_iter()
        .map(|idx| points[idx].timestamp.format(AXIS_TIME_FMT).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{parse_intraday, Interval};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn series() -> StockSeries {
        let entry = |close: &str| {
            json!({ "1. open": "1", "2. high": "1", "3. low": "1", "4. close": close, "5. volume": "1" })
        };
        let payload = json!({
            "Time Series (5min)": {
                "2024-01-05 09:35:00": entry("190.0"),
                "2024-01-05 09:40:00": entry("191.0"),
                "2024-01-05 09:45:00": entry("192.0")
            }
        });
        parse_intraday(&payload, Interval::FiveMin).unwrap()
    }

    fn rendered_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn flat_series_gets_visible_range() {
        let (lo, hi) = padded_bounds(100.0, 100.0);
        assert!(lo < 100.0 && hi > 100.0);
        assert!((hi - lo - 5.0).abs() < 1e-9);

        let (lo, hi) = padded_bounds(0.5, 0.5);
        assert!((hi - lo - 1.0).abs() < 1e-9);
    }

    #[test]
    fn labels_cover_first_middle_last() {
        let labels = time_labels(&series());
        assert_eq!(labels, ["01-05 09:35", "01-05 09:40", "01-05 09:45"]);
        assert_eq!(price_labels(1.0, 3.0), ["1.00", "2.00", "3.00"]);
        assert!(time_labels(&StockSeries::default()).is_empty());
    }

    #[test]
    fn renders_title_and_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal
            .draw(|f| {
                render_price_chart(
                    f,
                    f.size(),
                    &series(),
                    "IBM Close Price".to_string(),
                    "IBM (5min) Intraday Prices".to_string(),
                )
            })
            .unwrap();
        assert!(rendered_text(&terminal).contains("IBM (5min) Intraday Prices"));

        terminal
            .draw(|f| {
                render_price_chart(
                    f,
                    f.size(),
                    &StockSeries::default(),
                    "-- Close Price".to_string(),
                    "-- (5min) Intraday Prices".to_string(),
                )
            })
            .unwrap();
        assert!(rendered_text(&terminal).contains("No price data to chart."));
    }
}
