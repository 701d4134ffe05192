use analysis_core::{AnalysisError, MarketDataProvider};
use tracing::{debug, warn};

use crate::models::{Column, Predicate, ScreenerRow};

/// Liquid B3 names scanned when no explicit ticker list is given.
pub const DEFAULT_UNIVERSE: [&str; 42] = [
    // Banks
    "ITUB4", "BBDC4", "BBAS3", "SANB11", "BPAC11",
    // Utilities
    "ELET3", "ELET6", "ENGI11", "EQTL3", "CPFE3",
    // Oil & gas
    "PETR4", "PETR3", "PRIO3", "CSAN3", "UGPA3",
    // Mining & steel
    "VALE3", "CSNA3", "GGBR4", "USIM5",
    // Retail
    "MGLU3", "LREN3", "AMER3", "VIIA3", "PETZ3",
    // Consumer staples
    "ABEV3", "JBSS3", "BRFS3", "MDIA3", "NTCO3",
    // Healthcare
    "RDOR3", "HAPV3", "FLRY3", "QUAL3",
    // Telecom & tech
    "VIVT3", "TIMS3", "TOTS3", "LWSA3",
    // Other
    "B3SA3", "RENT3", "RAIL3", "SUZB3", "WEGE3",
];

/// Filters and ranks a universe of instruments by fundamental criteria.
///
/// The universe is populated once, either by [`ScreenerEngine::load`]
/// through a market-data provider or directly via
/// [`ScreenerEngine::with_universe`]. Screening before that is a caller
/// bug and answers [`AnalysisError::NotReady`] instead of pretending the
/// market is empty. All query methods return fresh row vectors; the stored
/// universe is never mutated.
#[derive(Debug, Default)]
pub struct ScreenerEngine {
    tickers: Vec<String>,
    universe: Option<Vec<ScreenerRow>>,
}

impl ScreenerEngine {
    pub fn new(tickers: Vec<String>) -> Self {
        Self {
            tickers,
            universe: None,
        }
    }

    /// Engine over the default B3 universe.
    pub fn b3_default() -> Self {
        Self::new(DEFAULT_UNIVERSE.iter().map(|t| t.to_string()).collect())
    }

    /// Engine over an already-materialized universe; no fetching needed.
    pub fn with_universe(rows: Vec<ScreenerRow>) -> Self {
        Self {
            tickers: rows.iter().map(|r| r.ticker.clone()).collect(),
            universe: Some(rows),
        }
    }

    /// Fetch profile and fundamentals for every ticker and build the
    /// universe. Tickers that fail are logged and skipped; the rest still
    /// load. Returns the number of rows loaded.
    pub async fn load(&mut self, provider: &dyn MarketDataProvider) -> Result<usize, AnalysisError> {
        let mut rows = Vec::with_capacity(self.tickers.len());
        let mut failed = Vec::new();

        for ticker in &self.tickers {
            let profile = match provider.fetch_profile(ticker).await {
                Ok(profile) => profile,
                Err(error) => {
                    warn!(%ticker, %error, "skipping ticker: profile fetch failed");
                    failed.push(ticker.clone());
                    continue;
                }
            };
            let fundamentals = match provider.fetch_fundamentals(ticker).await {
                Ok(fundamentals) => fundamentals,
                Err(error) => {
                    warn!(%ticker, %error, "skipping ticker: fundamentals fetch failed");
                    failed.push(ticker.clone());
                    continue;
                }
            };

            debug!(%ticker, "loaded screener row");
            rows.push(ScreenerRow {
                ticker: ticker.clone(),
                name: profile.name,
                sector: profile.sector,
                price: profile.price,
                fundamentals,
            });
        }

        if !failed.is_empty() {
            warn!(count = failed.len(), tickers = ?failed, "some tickers failed to load");
        }

        let loaded = rows.len();
        self.universe = Some(rows);
        Ok(loaded)
    }

    /// The loaded universe, or `NotReady` before population.
    pub fn rows(&self) -> Result<&[ScreenerRow], AnalysisError> {
        self.universe.as_deref().ok_or_else(|| {
            AnalysisError::NotReady("screener universe not loaded; call load() first".to_string())
        })
    }

    /// Rows satisfying every predicate. Predicate order is irrelevant:
    /// composition is a plain AND.
    pub fn filter(&self, predicates: &[Predicate]) -> Result<Vec<ScreenerRow>, AnalysisError> {
        let rows = self.rows()?;
        Ok(rows
            .iter()
            .filter(|row| predicates.iter().all(|p| p.matches(row)))
            .cloned()
            .collect())
    }

    /// The `top_n` rows ordered by a column. Rows where the column is
    /// absent or exactly zero are dropped first; ties keep their original
    /// universe order.
    pub fn rank_by(
        &self,
        column: Column,
        ascending: bool,
        top_n: usize,
    ) -> Result<Vec<ScreenerRow>, AnalysisError> {
        Ok(rank_rows(self.rows()?.to_vec(), column, ascending, top_n))
    }

    /// Value names: cheapest sensible earnings multiples, P/E in (0, 20],
    /// cheapest first.
    pub fn value_stocks(&self, top_n: usize) -> Result<Vec<ScreenerRow>, AnalysisError> {
        let rows = self.filter(&[
            Predicate::Min(Column::Pe, 0.0),
            Predicate::Max(Column::Pe, 20.0),
        ])?;
        Ok(rank_rows(rows, Column::Pe, true, top_n))
    }

    /// Biggest dividend payers with a positive yield.
    pub fn dividend_stocks(&self, top_n: usize) -> Result<Vec<ScreenerRow>, AnalysisError> {
        let rows = self.filter(&[Predicate::Min(Column::DividendYield, 0.0)])?;
        Ok(rank_rows(rows, Column::DividendYield, false, top_n))
    }

    /// Highest positive return on equity.
    pub fn quality_stocks(&self, top_n: usize) -> Result<Vec<ScreenerRow>, AnalysisError> {
        let rows = self.filter(&[Predicate::Min(Column::Roe, 0.0)])?;
        Ok(rank_rows(rows, Column::Roe, false, top_n))
    }
}

/// Shared ranking path for `rank_by` and the preset strategies.
fn rank_rows(
    mut rows: Vec<ScreenerRow>,
    column: Column,
    ascending: bool,
    top_n: usize,
) -> Vec<ScreenerRow> {
    rows.retain(|row| matches!(column.value(row), Some(value) if value != 0.0));
    // stable sort: tied rows keep their universe order
    rows.sort_by(|a, b| {
        let left = column.value(a).unwrap_or(f64::NAN);
        let right = column.value(b).unwrap_or(f64::NAN);
        let ordering = left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    rows.truncate(top_n);
    rows
}
