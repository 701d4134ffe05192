use async_trait::async_trait;

use crate::{AnalysisError, Fundamentals, HistoryPeriod, PriceHistory, StockProfile};

/// Source of per-instrument market data (quotes, history, fundamentals).
///
/// Implementations own all network, pacing, retry and caching concerns;
/// the analysis engines only ever see the returned value objects.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<PriceHistory, AnalysisError>;

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, AnalysisError>;

    async fn fetch_profile(&self, ticker: &str) -> Result<StockProfile, AnalysisError>;
}

/// Source of macroeconomic reference rates.
#[async_trait]
pub trait MacroDataProvider: Send + Sync {
    /// Current risk-free rate in percentage points per year (10.75 = 10.75%).
    async fn risk_free_rate(&self) -> Result<f64, AnalysisError>;
}
