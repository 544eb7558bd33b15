use crate::app::session::FetchOutcome;
use crate::config::DashboardDefaults;
use crate::error::Result;
use crate::fetch::{FetchRequest, Interval, OutputSize, StockSeries};

const PLACEHOLDER_SYMBOL: &str = "--";

/// Form and result state behind the dashboard screen.
pub struct DashboardState {
    symbol: String,
    interval: Interval,
    output_size: OutputSize,
    series: StockSeries,
    loading: bool,
    error: Option<String>,
    /// Symbol and interval of the last accepted request; drives the chart labels.
    charted: Option<(String, Interval)>,
}

impl DashboardState {
    pub fn new(defaults: DashboardDefaults) -> Self {
        Self {
            symbol: String::new(),
            interval: defaults.interval,
            output_size: defaults.output_size,
            series: StockSeries::default(),
            loading: false,
            error: None,
            charted: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn output_size(&self) -> OutputSize {
        self.output_size
    }

    pub fn series(&self) -> &StockSeries {
        &self.series
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_symbol(&mut self, raw: &str) {
        self.symbol = raw.to_uppercase();
        self.clear_if_blank();
    }

    pub fn push_char(&mut self, ch: char) {
        self.symbol.extend(ch.to_uppercase());
    }

    pub fn pop_char(&mut self) {
        self.symbol.pop();
        self.clear_if_blank();
    }

    pub fn next_interval(&mut self) {
        self.interval = self.interval.next();
    }

    pub fn prev_interval(&mut self) {
        self.interval = self.interval.prev();
    }

    pub fn set_interval(&mut self, interval: Interval) {
        self.interval = interval;
    }

    pub fn toggle_output_size(&mut self) {
        self.output_size = self.output_size.toggle();
    }

    /// Normalize the symbol and build the next request. A blank symbol clears
    /// the chart and sets the validation message instead.
    pub fn prepare_load(&mut self) -> Result<FetchRequest> {
        match FetchRequest::new(&self.symbol, self.interval, self.output_size) {
            Ok(request) => {
                self.symbol = request.symbol().to_string();
                self.loading = true;
                self.error = None;
                self.series = StockSeries::default();
                self.charted = Some((request.symbol().to_string(), request.interval));
                Ok(request)
            }
            Err(err) => {
                self.symbol.clear();
                self.series = StockSeries::default();
                self.charted = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.loading = false;
        match outcome {
            FetchOutcome::Loaded(series) => self.series = series,
            FetchOutcome::Canceled => {}
            FetchOutcome::Failed(message) => {
                self.error = Some(if message.is_empty() {
                    "Error fetching stock data".to_string()
                } else {
                    message
                });
            }
        }
    }

    pub fn series_label(&self) -> String {
        format!("{} Close Price", self.charted_symbol())
    }

    pub fn chart_title(&self) -> String {
        let interval = self
            .charted
            .as_ref()
            .map_or(self.interval, |(_, interval)| *interval);
        format!("{} ({}) Intraday Prices", self.charted_symbol(), interval)
    }

    fn charted_symbol(&self) -> &str {
        self.charted
            .as_ref()
            .map_or(PLACEHOLDER_SYMBOL, |(symbol, _)| symbol.as_str())
    }

    fn clear_if_blank(&mut self) {
        if self.symbol.trim().is_empty() {
            self.series = StockSeries::default();
            self.error = None;
            self.charted = None;
        }
    }
}
