//! Yahoo Finance client for B3 tickers.
//!
//! This crate is the market-data collaborator at the boundary of the
//! analysis engines: it owns every network concern (pacing, retry,
//! caching, payload quirks) and hands back plain value objects. Bare B3
//! tickers get the `.SA` suffix Yahoo expects.

mod api;
pub mod pacer;
pub mod retry;

use std::time::Duration;

use analysis_core::cache::TtlCache;
use analysis_core::{
    AnalysisError, Fundamentals, HistoryPeriod, MarketDataProvider, PriceHistory, StockProfile,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use pacer::RequestPacer;
pub use retry::RetryPolicy;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

/// Quote summaries move with the tape; keep them briefly.
const SUMMARY_TTL: Duration = Duration::from_secs(15 * 60);

/// Daily bars only change after the close; cache them longer.
const HISTORY_TTL: Duration = Duration::from_secs(60 * 60);

/// Yahoo rejects clients without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

pub struct YahooClient {
    http: reqwest::Client,
    pacer: RequestPacer,
    retry: RetryPolicy,
    summary_cache: TtlCache<String, api::QuoteSummaryResult>,
    history_cache: TtlCache<(String, HistoryPeriod), PriceHistory>,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    pub fn with_retry(retry: RetryPolicy) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            // unauthenticated endpoints throttle hard past ~2 req/s
            pacer: RequestPacer::new(120, Duration::from_secs(60)),
            retry,
            summary_cache: TtlCache::new(SUMMARY_TTL),
            history_cache: TtlCache::new(HISTORY_TTL),
        }
    }

    /// Yahoo lists B3 instruments under a `.SA` suffix.
    pub fn normalize_symbol(ticker: &str) -> String {
        if ticker.ends_with(".SA") {
            ticker.to_string()
        } else {
            format!("{ticker}.SA")
        }
    }

    /// Daily price history for the requested lookback.
    pub async fn get_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<PriceHistory, AnalysisError> {
        let symbol = Self::normalize_symbol(ticker);
        let cache_key = (symbol.clone(), period);
        if let Some(history) = self.history_cache.get(&cache_key) {
            debug!(%symbol, "price history served from cache");
            return Ok(history);
        }

        let url = format!("{BASE_URL}/v8/finance/chart/{symbol}");
        let response: api::ChartResponse = self
            .get_json(&url, &[("range", period.as_range()), ("interval", "1d")])
            .await?;

        let result = response
            .chart
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
            .ok_or_else(|| AnalysisError::ApiError(format!("empty chart payload for {symbol}")))?;

        let history = result.into_history()?;
        self.history_cache.insert(cache_key, history.clone());
        Ok(history)
    }

    /// Identity and quote snapshot.
    pub async fn get_profile(&self, ticker: &str) -> Result<StockProfile, AnalysisError> {
        let symbol = Self::normalize_symbol(ticker);
        let summary = self.quote_summary(&symbol).await?;
        Ok(summary.to_profile(symbol.trim_end_matches(".SA")))
    }

    /// Reported fundamentals; absent fields stay absent.
    pub async fn get_fundamentals(&self, ticker: &str) -> Result<Fundamentals, AnalysisError> {
        let symbol = Self::normalize_symbol(ticker);
        let summary = self.quote_summary(&symbol).await?;
        Ok(summary.to_fundamentals())
    }

    async fn quote_summary(&self, symbol: &str) -> Result<api::QuoteSummaryResult, AnalysisError> {
        if let Some(summary) = self.summary_cache.get(&symbol.to_string()) {
            debug!(%symbol, "quote summary served from cache");
            return Ok(summary);
        }

        let url = format!("{BASE_URL}/v10/finance/quoteSummary/{symbol}");
        let response: api::QuoteSummaryResponse = self
            .get_json(&url, &[("modules", QUOTE_SUMMARY_MODULES)])
            .await?;

        let summary = response
            .quote_summary
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
            .ok_or_else(|| {
                AnalysisError::ApiError(format!("empty quoteSummary payload for {symbol}"))
            })?;

        self.summary_cache.insert(symbol.to_string(), summary.clone());
        Ok(summary)
    }

    /// One paced GET with the retry policy applied to transport errors and
    /// retryable statuses.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AnalysisError> {
        for attempt in 0..self.retry.max_attempts {
            self.pacer.acquire().await;

            let response = match self.http.get(url).query(query).send().await {
                Ok(response) => response,
                Err(error) => {
                    if attempt + 1 < self.retry.max_attempts {
                        let delay = self.retry.delay(attempt);
                        warn!(%url, %error, ?delay, "request failed, backing off");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(AnalysisError::ApiError(error.to_string()));
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<T>()
                    .await
                    .map_err(|e| AnalysisError::ApiError(e.to_string()));
            }

            if self.retry.should_retry_status(status.as_u16())
                && attempt + 1 < self.retry.max_attempts
            {
                let delay = self.retry.delay(attempt);
                warn!(%url, %status, ?delay, "retryable status, backing off");
                tokio::time::sleep(delay).await;
                continue;
            }

            return Err(AnalysisError::ApiError(format!("HTTP {status} from {url}")));
        }

        Err(AnalysisError::ApiError(format!(
            "retries exhausted for {url}"
        )))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<PriceHistory, AnalysisError> {
        self.get_history(ticker, period).await
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, AnalysisError> {
        self.get_fundamentals(ticker).await
    }

    async fn fetch_profile(&self, ticker: &str) -> Result<StockProfile, AnalysisError> {
        self.get_profile(ticker).await
    }
}
