//! Serde envelopes for the Yahoo Finance v8/v10 payloads and their
//! conversion into the core value objects.
//!
//! Yahoo wraps most numbers as `{"raw": 1.23, "fmt": "1.23"}` and omits
//! whole modules or single fields freely; every absence maps to `None`,
//! never to zero.

use analysis_core::{AnalysisError, Bar, Fundamentals, PriceHistory, StockProfile};
use chrono::DateTime;
use serde::Deserialize;

/// A `{"raw": ..., "fmt": ...}` wrapped number.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

// ---------------------------------------------------------------------------
// v8 chart (price history)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    pub chart: ChartNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartNode {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartIndicators {
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResult {
    /// Flatten the column-oriented arrays into ordered bars.
    ///
    /// Rows without a close (halted or non-traded days) are dropped, as is
    /// any row whose date does not advance the series; the remaining bars
    /// form a valid strictly-ascending history.
    pub fn into_history(self) -> Result<PriceHistory, AnalysisError> {
        let quote = self
            .indicators
            .quote
            .into_iter()
            .next()
            .unwrap_or_default();

        let mut bars: Vec<Bar> = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };
            if bars.last().is_some_and(|last| date <= last.date) {
                tracing::debug!(%date, "dropping non-advancing chart row");
                continue;
            }
            bars.push(Bar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0.0),
            });
        }

        PriceHistory::new(bars)
    }
}

// ---------------------------------------------------------------------------
// v10 quoteSummary (profile + fundamentals)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummaryNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteSummaryNode {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct QuoteSummaryResult {
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(default, rename = "summaryProfile")]
    pub summary_profile: Option<SummaryProfileModule>,
    #[serde(default, rename = "summaryDetail")]
    pub summary_detail: Option<SummaryDetailModule>,
    #[serde(default, rename = "defaultKeyStatistics")]
    pub key_statistics: Option<KeyStatisticsModule>,
    #[serde(default, rename = "financialData")]
    pub financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PriceModule {
    #[serde(default, rename = "shortName")]
    pub short_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "regularMarketPrice")]
    pub regular_market_price: Option<RawValue>,
    #[serde(default, rename = "marketCap")]
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SummaryProfileModule {
    #[serde(default)]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SummaryDetailModule {
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    #[serde(default, rename = "dividendYield")]
    pub dividend_yield: Option<RawValue>,
    #[serde(default, rename = "payoutRatio")]
    pub payout_ratio: Option<RawValue>,
    #[serde(default, rename = "averageVolume")]
    pub average_volume: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct KeyStatisticsModule {
    #[serde(default, rename = "trailingEps")]
    pub trailing_eps: Option<RawValue>,
    #[serde(default, rename = "bookValue")]
    pub book_value: Option<RawValue>,
    #[serde(default, rename = "priceToBook")]
    pub price_to_book: Option<RawValue>,
    #[serde(default, rename = "enterpriseValue")]
    pub enterprise_value: Option<RawValue>,
    #[serde(default, rename = "netIncomeToCommon")]
    pub net_income_to_common: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FinancialDataModule {
    #[serde(default, rename = "currentPrice")]
    pub current_price: Option<RawValue>,
    #[serde(default, rename = "returnOnEquity")]
    pub return_on_equity: Option<RawValue>,
    #[serde(default, rename = "returnOnAssets")]
    pub return_on_assets: Option<RawValue>,
    #[serde(default, rename = "profitMargins")]
    pub profit_margins: Option<RawValue>,
    #[serde(default, rename = "grossMargins")]
    pub gross_margins: Option<RawValue>,
    #[serde(default, rename = "debtToEquity")]
    pub debt_to_equity: Option<RawValue>,
    #[serde(default, rename = "totalRevenue")]
    pub total_revenue: Option<RawValue>,
    #[serde(default)]
    pub ebitda: Option<RawValue>,
}

impl QuoteSummaryResult {
    /// Last price: live quote if the financialData module is present,
    /// otherwise the regular market price.
    fn current_price(&self) -> Option<f64> {
        self.financial_data
            .as_ref()
            .and_then(|f| raw(&f.current_price))
            .or_else(|| {
                self.price
                    .as_ref()
                    .and_then(|p| raw(&p.regular_market_price))
            })
    }

    pub fn to_profile(&self, ticker: &str) -> StockProfile {
        let price_module = self.price.clone().unwrap_or_default();
        StockProfile {
            ticker: ticker.to_string(),
            name: price_module.short_name.unwrap_or_else(|| ticker.to_string()),
            sector: self
                .summary_profile
                .as_ref()
                .and_then(|p| p.sector.clone()),
            currency: price_module.currency,
            price: self.current_price(),
            market_cap: raw(&price_module.market_cap),
            average_volume: self
                .summary_detail
                .as_ref()
                .and_then(|d| raw(&d.average_volume)),
        }
    }

    pub fn to_fundamentals(&self) -> Fundamentals {
        let detail = self.summary_detail.clone().unwrap_or_default();
        let stats = self.key_statistics.clone().unwrap_or_default();
        let financial = self.financial_data.clone().unwrap_or_default();

        Fundamentals {
            eps: raw(&stats.trailing_eps),
            book_value_per_share: raw(&stats.book_value),
            pe: raw(&detail.trailing_pe),
            pb: raw(&stats.price_to_book),
            dividend_yield: raw(&detail.dividend_yield),
            payout_ratio: raw(&detail.payout_ratio),
            roe: raw(&financial.return_on_equity),
            roa: raw(&financial.return_on_assets),
            net_margin: raw(&financial.profit_margins),
            gross_margin: raw(&financial.gross_margins),
            debt_to_equity: raw(&financial.debt_to_equity),
            revenue: raw(&financial.total_revenue),
            net_income: raw(&stats.net_income_to_common),
            ebitda: raw(&financial.ebitda),
            enterprise_value: raw(&stats.enterprise_value),
            market_cap: self.price.as_ref().and_then(|p| raw(&p.market_cap)),
            sector: self
                .summary_profile
                .as_ref()
                .and_then(|p| p.sector.clone()),
        }
    }
}
