use std::sync::Arc;

use crate::app::controller::DashboardController;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{IntradayFetcher, Interval};

/// Optional form values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct DashboardPreset {
    pub symbol: Option<String>,
    pub interval: Option<Interval>,
}

/// Entry point used by `main` to bootstrap the dashboard.
pub async fn run_dashboard(config: Config, preset: DashboardPreset) -> Result<()> {
    let fetcher = Arc::new(IntradayFetcher::new(config.provider.clone()));
    let mut controller = DashboardController::new(&config, fetcher);

    if let Some(interval) = preset.interval {
        controller.state_mut().set_interval(interval);
    }
    if let Some(symbol) = preset.symbol.as_deref() {
        controller.state_mut().set_symbol(symbol);
        controller.submit();
    }

    controller.run().await
}
