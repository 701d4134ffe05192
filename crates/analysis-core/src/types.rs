use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// One daily OHLCV bar.
///
/// Only `close` and `volume` are required; open/high/low may be absent in
/// provider payloads and are carried through untouched for callers that
/// want them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar with only the required fields set.
    pub fn from_close(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume,
        }
    }
}

/// An ordered daily price series for one instrument.
///
/// Dates are strictly increasing; calendar gaps (weekends, holidays) are
/// expected and carry no meaning. The series is immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Build a history from bars, validating date order.
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(AnalysisError::InvalidData(format!(
                    "bars out of order: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// Reported fundamentals for one instrument.
///
/// Every numeric field is optional: providers routinely omit them, and a
/// missing value is a different state from zero or from an economically
/// invalid (negative) one. Consumers decide per formula what each state
/// means; nothing here is coerced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Earnings per share, trailing twelve months (LPA).
    pub eps: Option<f64>,
    /// Book value per share (VPA).
    pub book_value_per_share: Option<f64>,
    /// Price / earnings (P/L).
    pub pe: Option<f64>,
    /// Price / book (P/VP).
    pub pb: Option<f64>,
    /// Trailing dividend yield as a decimal (0.06 = 6%).
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub net_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub ebitda: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
}

impl Fundamentals {
    /// Dividend per share estimated from yield × price, when both exist and
    /// the yield is positive.
    pub fn dividend_per_share(&self, price: f64) -> Option<f64> {
        match self.dividend_yield {
            Some(dy) if dy > 0.0 && price > 0.0 => Some(dy * price),
            _ => None,
        }
    }
}

/// Identity and quote snapshot for one listed instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockProfile {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub average_volume: Option<f64>,
}

/// Trailing-window performance summary for one instrument.
///
/// Purely derived from a price history; rates and ratios degrade to 0.0
/// when the window holds too little data (see the indicator engine).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annual_volatility: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub current_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub average_volume: f64,
}

/// Fair-price model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationMethod {
    GrahamOriginal,
    GrahamAdjusted,
    Bazin,
    GordonDdm,
}

impl ValuationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ValuationMethod::GrahamOriginal => "Graham (original)",
            ValuationMethod::GrahamAdjusted => "Graham (rate-adjusted)",
            ValuationMethod::Bazin => "Bazin (6% yield)",
            ValuationMethod::GordonDdm => "Gordon DDM",
        }
    }
}

/// Margin-of-safety band, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    VeryCheap,
    Cheap,
    Fair,
    Expensive,
    VeryExpensive,
}

impl Recommendation {
    /// Band a safety margin. Bounds are inclusive on the lower edge of each
    /// band and evaluated top-down, first match wins.
    pub fn from_margin(margin: f64) -> Self {
        match margin {
            m if m >= 0.30 => Recommendation::VeryCheap,
            m if m >= 0.15 => Recommendation::Cheap,
            m if m >= -0.10 => Recommendation::Fair,
            m if m >= -0.30 => Recommendation::Expensive,
            _ => Recommendation::VeryExpensive,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::VeryCheap => "VERY CHEAP",
            Recommendation::Cheap => "CHEAP",
            Recommendation::Fair => "FAIR",
            Recommendation::Expensive => "EXPENSIVE",
            Recommendation::VeryExpensive => "VERY EXPENSIVE",
        }
    }
}

/// Outcome of one fair-price model against one instrument snapshot.
///
/// Only emitted when the model's preconditions were met, so the numeric
/// fields are always populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub method: ValuationMethod,
    pub fair_price: f64,
    pub current_price: f64,
    /// (fair − current) / fair.
    pub safety_margin: f64,
    pub recommendation: Recommendation,
    pub rationale: String,
}

/// Macroeconomic snapshot from the central-bank series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroIndicators {
    /// SELIC target rate, % per year.
    pub selic: Option<f64>,
    /// IPCA inflation accumulated over 12 months, %.
    pub ipca_12m: Option<f64>,
    /// CDI rate, % per year.
    pub cdi: Option<f64>,
    /// USD/BRL PTAX rate.
    pub usd_brl: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// History lookback accepted by price-history providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPeriod {
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Max,
}

impl HistoryPeriod {
    /// Yahoo-style range token.
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoryPeriod::Month1 => "1mo",
            HistoryPeriod::Month3 => "3mo",
            HistoryPeriod::Month6 => "6mo",
            HistoryPeriod::Year1 => "1y",
            HistoryPeriod::Year2 => "2y",
            HistoryPeriod::Year5 => "5y",
            HistoryPeriod::Max => "max",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    #[test]
    fn history_accepts_gapped_ascending_dates() {
        let bars = vec![
            Bar::from_close(day(2), 10.0, 100.0),
            Bar::from_close(day(3), 10.5, 100.0),
            // weekend gap
            Bar::from_close(day(8), 10.2, 100.0),
        ];
        let history = PriceHistory::new(bars).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.last_close(), Some(10.2));
    }

    #[test]
    fn history_rejects_out_of_order_dates() {
        let bars = vec![
            Bar::from_close(day(3), 10.0, 100.0),
            Bar::from_close(day(2), 10.5, 100.0),
        ];
        assert!(PriceHistory::new(bars).is_err());
    }

    #[test]
    fn history_rejects_duplicate_dates() {
        let bars = vec![
            Bar::from_close(day(2), 10.0, 100.0),
            Bar::from_close(day(2), 10.5, 100.0),
        ];
        assert!(PriceHistory::new(bars).is_err());
    }

    #[test]
    fn dividend_per_share_requires_positive_yield_and_price() {
        let fundamentals = Fundamentals {
            dividend_yield: Some(0.05),
            ..Default::default()
        };
        assert_eq!(fundamentals.dividend_per_share(30.0), Some(1.5));
        assert_eq!(fundamentals.dividend_per_share(0.0), None);

        let zero_yield = Fundamentals {
            dividend_yield: Some(0.0),
            ..Default::default()
        };
        assert_eq!(zero_yield.dividend_per_share(30.0), None);
        assert_eq!(Fundamentals::default().dividend_per_share(30.0), None);
    }

    #[test]
    fn recommendation_banding_is_inclusive_on_lower_bounds() {
        assert_eq!(Recommendation::from_margin(0.30), Recommendation::VeryCheap);
        assert_eq!(Recommendation::from_margin(0.15), Recommendation::Cheap);
        assert_eq!(Recommendation::from_margin(0.14), Recommendation::Fair);
        assert_eq!(Recommendation::from_margin(-0.10), Recommendation::Fair);
        assert_eq!(Recommendation::from_margin(-0.30), Recommendation::Expensive);
        assert_eq!(
            Recommendation::from_margin(-0.35),
            Recommendation::VeryExpensive
        );
    }
}
