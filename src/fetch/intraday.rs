use std::sync::Arc;

use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::utils::cache_buster_millis;

use super::{
    parse_intraday, prepare_request, CancelSignal, FetchRequest, FetchResult, HttpClient,
    HttpRequest, ReqwestHttpClient, StockSeries,
};

/// Issues one intraday request per call and hands the payload to the parser.
#[derive(Clone)]
pub struct IntradayFetcher {
    provider: ProviderConfig,
    http_client: Arc<dyn HttpClient>,
}

impl IntradayFetcher {
    pub fn new(provider: ProviderConfig) -> Self {
        Self::with_http_client(provider, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(provider: ProviderConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            provider,
            http_client,
        }
    }

    /// Fetch and parse one series. Resolves to [`AppError::Canceled`] as soon as
    /// `cancel` fires; the in-flight request is dropped at that point.
    pub async fn fetch(
        &self,
        request: &FetchRequest,
        cancel: &CancelSignal,
    ) -> FetchResult<StockSeries> {
        if cancel.is_cancelled() {
            return Err(AppError::Canceled);
        }

        let api_key = self.provider.api_key();
        let prepared = prepare_request(&self.provider, request, &api_key, cache_buster_millis())?;
        log::debug!("Fetching intraday series from {}", prepared.redacted_url);

        let http_request =
            HttpRequest::get(prepared.url).with_user_agent(self.provider.user_agent.as_str());

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = self.http_client.execute(http_request) => Some(result),
        };

        let Some(result) = outcome else {
            log::debug!("Intraday fetch for {} canceled", request.symbol());
            return Err(AppError::Canceled);
        };

        let response = result.map_err(|err| {
            log::error!(
                "Error fetching stock data from {}: {}",
                prepared.redacted_url,
                err
            );
            AppError::Transport {
                status: None,
                status_text: None,
                url: prepared.redacted_url.clone(),
                message: err.message().to_string(),
            }
        })?;

        if !response.is_success() {
            log::error!(
                "Error fetching stock data: status={} statusText={:?} url={}",
                response.status,
                response.status_text,
                prepared.redacted_url
            );
            return Err(AppError::Transport {
                status: Some(response.status),
                status_text: response.status_text,
                url: prepared.redacted_url,
                message: format!("provider returned status {}", response.status),
            });
        }

        let payload: Value = serde_json::from_str(&response.body).map_err(|err| {
            AppError::parse(format!("Failed to decode provider response: {err}"))
        })?;

        let series = parse_intraday(&payload, request.interval)?;
        log::debug!(
            "Parsed {} points for {} ({})",
            series.len(),
            request.symbol(),
            request.interval
        );
        Ok(series)
    }
}
