use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::config::ProviderConfig;
use crate::error::{AppError, Context};
use crate::utils::normalize_symbol;

use super::FetchResult;

const INTRADAY_FUNCTION: &str = "TIME_SERIES_INTRADAY";
const REDACTED: &str = "REDACTED";

/// Sampling granularity supported by the intraday endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneMin,
    FiveMin,
    FifteenMin,
    ThirtyMin,
    SixtyMin,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::OneMin,
        Interval::FiveMin,
        Interval::FifteenMin,
        Interval::ThirtyMin,
        Interval::SixtyMin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::OneMin => "1min",
            Interval::FiveMin => "5min",
            Interval::FifteenMin => "15min",
            Interval::ThirtyMin => "30min",
            Interval::SixtyMin => "60min",
        }
    }

    /// JSON key under which the provider nests the series for this interval.
    pub fn series_key(self) -> &'static str {
        match self {
            Interval::OneMin => "Time Series (1min)",
            Interval::FiveMin => "Time Series (5min)",
            Interval::FifteenMin => "Time Series (15min)",
            Interval::ThirtyMin => "Time Series (30min)",
            Interval::SixtyMin => "Time Series (60min)",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|interval| interval.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Unsupported interval `{trimmed}` (expected one of 1min, 5min, 15min, 30min, 60min)"
                ))
            })
    }
}

/// How much history the provider returns: the latest window or the full day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSize {
    Compact,
    Full,
}

impl OutputSize {
    pub fn label(self) -> &'static str {
        match self {
            OutputSize::Compact => "Compact",
            OutputSize::Full => "Full",
        }
    }

    pub fn query_value(self) -> String {
        self.label().to_ascii_lowercase()
    }

    pub fn toggle(self) -> Self {
        match self {
            OutputSize::Compact => OutputSize::Full,
            OutputSize::Full => OutputSize::Compact,
        }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputSize {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            other => Err(AppError::validation(format!(
                "Unsupported output size `{other}` (expected compact or full)"
            ))),
        }
    }
}

/// One intraday query. Built fresh for every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    symbol: String,
    pub interval: Interval,
    pub output_size: OutputSize,
}

impl FetchRequest {
    /// Normalize the symbol (trimmed, uppercase) and reject blank input.
    pub fn new(symbol: &str, interval: Interval, output_size: OutputSize) -> FetchResult<Self> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return Err(AppError::validation("Enter a valid stock symbol"));
        }
        Ok(Self {
            symbol,
            interval,
            output_size,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: String,
    /// Same URL with the API key replaced; the only form that may be logged or shown.
    pub redacted_url: String,
}

pub fn prepare_request(
    provider: &ProviderConfig,
    request: &FetchRequest,
    api_key: &str,
    cache_buster: i64,
) -> FetchResult<PreparedRequest> {
    let url = build_query_url(&provider.endpoint, request, api_key, cache_buster)?;
    let redacted_url = build_query_url(&provider.endpoint, request, REDACTED, cache_buster)?;

    Ok(PreparedRequest {
        url: url.into(),
        redacted_url: redacted_url.into(),
    })
}

fn build_query_url(
    endpoint: &str,
    request: &FetchRequest,
    api_key: &str,
    cache_buster: i64,
) -> FetchResult<Url> {
    let output_size = request.output_size.query_value();
    let cache_buster = cache_buster.to_string();
    let params: [(&str, &str); 7] = [
        ("function", INTRADAY_FUNCTION),
        ("symbol", request.symbol()),
        ("interval", request.interval.as_str()),
        ("outputsize", output_size.as_str()),
        ("datatype", "json"),
        ("apikey", api_key),
        ("_", cache_buster.as_str()),
    ];

    let url = Url::parse_with_params(endpoint, params)
        .with_context(|| format!("Invalid provider endpoint: {endpoint}"))?;
    Ok(url)
}
