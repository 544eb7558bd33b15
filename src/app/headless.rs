use std::io::Write;

use crate::error::Result;
use crate::config::Config;
use crate::fetch::{cancel_pair, FetchRequest, IntradayFetcher, StockSeries};

/// Fetch one series without the terminal UI and print it to stdout.
/// Ctrl+C cancels the request in flight.
pub async fn run_fetch(config: Config, request: FetchRequest, csv: bool) -> Result<()> {
    let fetcher = IntradayFetcher::new(config.provider);
    let (handle, signal) = cancel_pair();

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupt received; cancelling fetch");
            handle.cancel();
        }
    });

    let result = fetcher.fetch(&request, &signal).await;
    interrupt.abort();

    let series = match result {
        Ok(series) => series,
        Err(err) if err.is_canceled() => {
            eprintln!("Fetch canceled.");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if csv {
        write_csv(&mut out, &series)?;
    } else {
        let title = format!("{} ({}) Intraday Prices", request.symbol(), request.interval);
        out.write_all(format_table(&title, &series).as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Write the series as CSV with a header row, oldest bar first.
pub fn write_csv<W: Write>(writer: W, series: &StockSeries) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in series {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn format_table(title: &str, series: &StockSeries) -> String {
    let mut out = format!("{title}\n");
    if series.is_empty() {
        out.push_str("No data points.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<19}  {:>10}  {:>10}  {:>10}  {:>10}  {:>12}\n",
        "time", "open", "high", "low", "close", "volume"
    ));
    for point in series {
        out.push_str(&format!(
            "{:<19}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>12.0}\n",
            point.time, point.open, point.high, point.low, point.close, point.volume
        ));
    }
    out.push_str(&format!("{} points\n", series.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{parse_intraday, Interval};
    use serde_json::json;

    fn series() -> StockSeries {
        let payload = json!({
            "Time Series (5min)": {
                "2024-01-05 16:00:00": {
                    "1. open": "191.0", "2. high": "191.6", "3. low": "190.9", "4. close": "191.5", "5. volume": "5300"
                },
                "2024-01-05 15:55:00": {
                    "1. open": "190.8", "2. high": "191.1", "3. low": "190.7", "4. close": "191.0", "5. volume": "4100"
                }
            }
        });
        parse_intraday(&payload, Interval::FiveMin).unwrap()
    }

    #[test]
    fn csv_has_header_and_chronological_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &series()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "time,open,high,low,close,volume");
        assert_eq!(lines[1], "2024-01-05 15:55:00,190.8,191.1,190.7,191.0,4100.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn table_lists_every_point() {
        let table = format_table("IBM (5min) Intraday Prices", &series());
        assert!(table.starts_with("IBM (5min) Intraday Prices\n"));
        assert!(table.contains("2024-01-05 16:00:00"));
        assert!(table.contains("191.5000"));
        assert!(table.ends_with("2 points\n"));

        let empty = format_table("X", &StockSeries::default());
        assert!(empty.contains("No data points."));
    }
}
