use analysis_core::SummaryStats;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::{IndicatorEngine, DEFAULT_WINDOW};

/// One instrument's row in a cross-sectional comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub ticker: String,
    pub stats: SummaryStats,
}

/// Summary statistics for many instruments at once.
///
/// Each engine is independent, so the per-instrument summaries run on the
/// rayon pool. Row order follows input order; `risk_free_rate` is an annual
/// decimal, as in [`IndicatorEngine::sharpe_ratio`].
pub fn compare_stocks(engines: &[(String, IndicatorEngine)], risk_free_rate: f64) -> Vec<ComparisonRow> {
    engines
        .par_iter()
        .map(|(ticker, engine)| ComparisonRow {
            ticker: ticker.clone(),
            stats: engine.summary(risk_free_rate, DEFAULT_WINDOW),
        })
        .collect()
}
