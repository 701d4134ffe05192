//! Screener data model: universe rows, addressable columns, predicates.

use analysis_core::Fundamentals;
use serde::{Deserialize, Serialize};

/// One instrument in the screening universe: identity plus its reported
/// fundamentals. Tickers are unique within a universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerRow {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub price: Option<f64>,
    pub fundamentals: Fundamentals,
}

/// Numeric columns a predicate or ranking can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Price,
    Eps,
    BookValuePerShare,
    Pe,
    Pb,
    DividendYield,
    PayoutRatio,
    Roe,
    Roa,
    NetMargin,
    GrossMargin,
    DebtToEquity,
    Revenue,
    NetIncome,
    Ebitda,
    EnterpriseValue,
    MarketCap,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Price => "price",
            Column::Eps => "eps",
            Column::BookValuePerShare => "book_value_per_share",
            Column::Pe => "pe",
            Column::Pb => "pb",
            Column::DividendYield => "dividend_yield",
            Column::PayoutRatio => "payout_ratio",
            Column::Roe => "roe",
            Column::Roa => "roa",
            Column::NetMargin => "net_margin",
            Column::GrossMargin => "gross_margin",
            Column::DebtToEquity => "debt_to_equity",
            Column::Revenue => "revenue",
            Column::NetIncome => "net_income",
            Column::Ebitda => "ebitda",
            Column::EnterpriseValue => "enterprise_value",
            Column::MarketCap => "market_cap",
        }
    }

    /// This row's value for the column; `None` when the provider did not
    /// report it.
    pub fn value(&self, row: &ScreenerRow) -> Option<f64> {
        let f = &row.fundamentals;
        match self {
            Column::Price => row.price,
            Column::Eps => f.eps,
            Column::BookValuePerShare => f.book_value_per_share,
            Column::Pe => f.pe,
            Column::Pb => f.pb,
            Column::DividendYield => f.dividend_yield,
            Column::PayoutRatio => f.payout_ratio,
            Column::Roe => f.roe,
            Column::Roa => f.roa,
            Column::NetMargin => f.net_margin,
            Column::GrossMargin => f.gross_margin,
            Column::DebtToEquity => f.debt_to_equity,
            Column::Revenue => f.revenue,
            Column::NetIncome => f.net_income,
            Column::Ebitda => f.ebitda,
            Column::EnterpriseValue => f.enterprise_value,
            Column::MarketCap => f.market_cap,
        }
    }
}

/// One screening criterion. Criteria compose by logical AND; a row whose
/// addressed value is absent fails the criterion rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Predicate {
    /// Column value ≥ bound.
    Min(Column, f64),
    /// Column value ≤ bound.
    Max(Column, f64),
    /// Case-insensitive substring match against the sector name; rows with
    /// no sector never match.
    Sector(String),
}

impl Predicate {
    pub fn matches(&self, row: &ScreenerRow) -> bool {
        match self {
            Predicate::Min(column, bound) => {
                column.value(row).is_some_and(|value| value >= *bound)
            }
            Predicate::Max(column, bound) => {
                column.value(row).is_some_and(|value| value <= *bound)
            }
            Predicate::Sector(needle) => row
                .sector
                .as_deref()
                .is_some_and(|sector| sector.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}
