use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::config::ProvidersConfig;
use crate::core::currency::CurrencyRateProvider;

/// Exchange rates from the Yahoo Finance chart API, where a currency pair is
/// quoted as the symbol `{FROM}{TO}=X`.
pub struct YahooCurrencyProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay_ms: u64,
}

impl YahooCurrencyProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paddock/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(YahooCurrencyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries: 0,
            retry_delay_ms: 0,
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Ok(Self::new(&config.yahoo.base_url)?.with_retries(config.retries, config.retry_delay_ms))
    }

    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }
}

#[derive(Debug, Deserialize)]
struct YahooCurrencyResponse {
    chart: CurrencyChartResult,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartResult {
    result: Vec<CurrencyChartItem>,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartItem {
    meta: CurrencyChartMeta,
}

#[derive(Debug, Deserialize)]
struct CurrencyChartMeta {
    #[serde(alias = "regularMarketPrice")]
    regular_market_price: f64,
}

#[async_trait]
impl CurrencyRateProvider for YahooCurrencyProvider {
    #[instrument(name = "YahooRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let symbol = format!("{from}{to}=X");
        let url = format!("{}/v8/finance/chart/{symbol}", self.base_url);
        debug!("Requesting currency rate from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;

        let data: YahooCurrencyResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let item = data
            .chart
            .result
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", symbol))?;

        let rate = item.meta.regular_market_price;
        debug!(rate, "Received rate for {}", symbol);
        Ok(rate)
    }
}
