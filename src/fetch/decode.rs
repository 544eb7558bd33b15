use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

use super::{FetchResult, Interval};

/// Provider fields consulted, in order, when the series key is missing.
const ADVISORY_FIELDS: [&str; 3] = ["Note", "Information", "Error Message"];
const NO_DATA_MESSAGE: &str = "No data found";

const OPEN_FIELD: &str = "1. open";
const HIGH_FIELD: &str = "2. high";
const LOW_FIELD: &str = "3. low";
const CLOSE_FIELD: &str = "4. close";
const VOLUME_FIELD: &str = "5. volume";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One sampled observation of an intraday series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPoint {
    /// Timestamp exactly as the provider sent it.
    pub time: String,
    #[serde(skip)]
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Points ordered by ascending timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSeries {
    points: Vec<StockPoint>,
}

impl StockSeries {
    pub fn new(mut points: Vec<StockPoint>) -> Self {
        points.sort_by_key(|point| point.timestamp);
        Self { points }
    }

    pub fn points(&self) -> &[StockPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StockPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&StockPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&StockPoint> {
        self.points.last()
    }

    /// `(index, close)` pairs for line charts.
    pub fn close_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.close.is_finite())
            .map(|(idx, point)| (idx as f64, point.close))
            .collect()
    }

    /// Lowest and highest finite close, if any.
    pub fn close_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|point| point.close)
            .filter(|close| close.is_finite())
            .fold(None, |acc, close| match acc {
                None => Some((close, close)),
                Some((lo, hi)) => Some((lo.min(close), hi.max(close))),
            })
    }
}

impl<'a> IntoIterator for &'a StockSeries {
    type Item = &'a StockPoint;
    type IntoIter = std::slice::Iter<'a, StockPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Turn a raw intraday payload into a chronologically ordered series.
pub fn parse_intraday(payload: &Value, interval: Interval) -> FetchResult<StockSeries> {
    let series = payload
        .get(interval.series_key())
        .and_then(Value::as_object)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| AppError::parse(advisory_message(payload)))?;

    let points = series
        .iter()
        .map(|(time, entry)| parse_point(time, entry))
        .collect::<FetchResult<Vec<_>>>()?;

    Ok(StockSeries::new(points))
}

fn advisory_message(payload: &Value) -> String {
    ADVISORY_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field))
        .find_map(|value| match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
            Value::Array(items) if !items.is_empty() => Some(value.to_string()),
            Value::Object(fields) if !fields.is_empty() => Some(value.to_string()),
            Value::Bool(true) => Some(value.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| NO_DATA_MESSAGE.to_string())
}

fn parse_point(time: &str, entry: &Value) -> FetchResult<StockPoint> {
    let fields = entry
        .as_object()
        .ok_or_else(|| AppError::parse(format!("Malformed entry for {time}: expected an object")))?;

    Ok(StockPoint {
        time: time.to_string(),
        timestamp: parse_timestamp(time)?,
        open: numeric_field(fields, OPEN_FIELD, time)?,
        high: numeric_field(fields, HIGH_FIELD, time)?,
        low: numeric_field(fields, LOW_FIELD, time)?,
        close: numeric_field(fields, CLOSE_FIELD, time)?,
        volume: numeric_field(fields, VOLUME_FIELD, time)?,
    })
}

fn numeric_field(fields: &Map<String, Value>, key: &str, time: &str) -> FetchResult<f64> {
    let value = fields
        .get(key)
        .ok_or_else(|| AppError::parse(format!("Missing field `{key}` for {time}")))?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(number.unwrap_or_else(|| {
        log::warn!("Non-numeric `{key}` value {value} for {time}; keeping NaN");
        f64::NAN
    }))
}

fn parse_timestamp(raw: &str) -> FetchResult<NaiveDateTime> {
    let trimmed = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| AppError::parse(format!("Unrecognised timestamp `{trimmed}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(close: &str) -> Value {
        json!({
            "1. open": "190.00",
            "2. high": "192.00",
            "3. low": "189.50",
            "4. close": close,
            "5. volume": "12000"
        })
    }

    #[test]
    fn parses_every_entry_in_chronological_order() {
        let payload = json!({
            "Meta Data": { "2. Symbol": "IBM" },
            "Time Series (5min)": {
                "2024-01-05 16:00:00": bar("191.50"),
                "2024-01-05 15:55:00": bar("191.20"),
                "2024-01-05 15:50:00": bar("190.80")
            }
        });

        let series = parse_intraday(&payload, Interval::FiveMin).unwrap();

        assert_eq!(series.len(), 3);
        let times: Vec<&str> = series.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(
            times,
            ["2024-01-05 15:50:00", "2024-01-05 15:55:00", "2024-01-05 16:00:00"]
        );
        assert!(series
            .points()
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn sorts_by_instant_not_by_string() {
        // Lexically "2024-10-01" < "2024-9-30" and "10:00" < "9:35".
        let payload = json!({
            "Time Series (60min)": {
                "2024-10-01 00:00:00": bar("3.0"),
                "2024-9-30 23:00:00": bar("2.0"),
                "2024-9-30 9:35:00": bar("1.0"),
                "2024-9-30 10:00:00": bar("1.5")
            }
        });

        let series = parse_intraday(&payload, Interval::SixtyMin).unwrap();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
        assert_eq!(closes, [1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn coerces_numeric_strings() {
        let payload = json!({ "Time Series (1min)": { "2024-01-05 09:31:00": bar("191.50") } });
        let series = parse_intraday(&payload, Interval::OneMin).unwrap();
        let point = &series.points()[0];

        assert_eq!(point.close, 191.50);
        assert_eq!(point.open, 190.0);
        assert_eq!(point.volume, 12000.0);
    }

    #[test]
    fn accepts_json_numbers() {
        let payload = json!({
            "Time Series (1min)": {
                "2024-01-05 09:31:00": {
                    "1. open": 1.5, "2. high": 2, "3. low": 1, "4. close": 1.75, "5. volume": 900
                }
            }
        });
        let series = parse_intraday(&payload, Interval::OneMin).unwrap();
        assert_eq!(series.points()[0].close, 1.75);
        assert_eq!(series.points()[0].volume, 900.0);
    }

    #[test]
    fn non_numeric_values_become_nan() {
        let payload = json!({ "Time Series (5min)": { "2024-01-05 10:00:00": bar("n/a") } });
        let series = parse_intraday(&payload, Interval::FiveMin).unwrap();

        assert!(series.points()[0].close.is_nan());
        assert!(series.close_points().is_empty());
        assert_eq!(series.close_bounds(), None);
    }

    #[test]
    fn rate_limit_note_surfaces_verbatim() {
        let payload = json!({ "Note": "rate limited" });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();

        assert!(matches!(err, AppError::Parse(_)));
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn advisory_fields_follow_precedence() {
        let payload = json!({
            "Error Message": "Invalid API call.",
            "Information": "Premium endpoint."
        });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), "Premium endpoint.");

        let payload = json!({ "Note": "", "Error Message": "Invalid API call." });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), "Invalid API call.");
    }

    #[test]
    fn empty_advisory_values_fall_through() {
        let payload = json!({
            "Note": 0,
            "Information": [],
            "Error Message": "Invalid API call."
        });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), "Invalid API call.");

        let payload = json!({ "Note": {}, "Information": 0.0, "Error Message": null });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), NO_DATA_MESSAGE);

        let err = parse_intraday(&json!({ "Note": 5 }), Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), "5");
    }

    #[test]
    fn falls_back_to_generic_message() {
        let err = parse_intraday(&json!({}), Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), NO_DATA_MESSAGE);

        let empty_series = json!({ "Time Series (5min)": {} });
        let err = parse_intraday(&empty_series, Interval::FiveMin).unwrap_err();
        assert_eq!(err.to_string(), NO_DATA_MESSAGE);
    }

    #[test]
    fn series_key_must_match_requested_interval() {
        let payload = json!({
            "Time Series (5min)": { "2024-01-05 10:00:00": bar("1.0") },
            "Information": "Wrong interval"
        });
        let err = parse_intraday(&payload, Interval::OneMin).unwrap_err();
        assert_eq!(err.to_string(), "Wrong interval");
    }

    #[test]
    fn missing_field_is_a_typed_failure() {
        let payload = json!({
            "Time Series (5min)": {
                "2024-01-05 10:00:00": { "1. open": "1", "2. high": "1", "3. low": "1", "5. volume": "1" }
            }
        });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing field `4. close` for 2024-01-05 10:00:00"
        );
    }

    #[test]
    fn unparseable_timestamp_fails() {
        let payload = json!({ "Time Series (5min)": { "yesterday": bar("1.0") } });
        let err = parse_intraday(&payload, Interval::FiveMin).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn date_only_timestamps_land_at_midnight() {
        let parsed = parse_timestamp("2024-01-05").unwrap();
        assert_eq!(parsed.to_string(), "2024-01-05 00:00:00");
    }

    #[test]
    fn close_bounds_span_finite_closes() {
        let payload = json!({
            "Time Series (5min)": {
                "2024-01-05 10:00:00": bar("10.0"),
                "2024-01-05 10:05:00": bar("12.5"),
                "2024-01-05 10:10:00": bar("9.5")
            }
        });
        let series = parse_intraday(&payload, Interval::FiveMin).unwrap();
        assert_eq!(series.close_bounds(), Some((9.5, 12.5)));
        assert_eq!(series.close_points()[1], (1.0, 12.5));
    }
}
