//! Banco Central do Brasil SGS series client.
//!
//! Macroeconomic collaborator for the analysis engines: fetches the SELIC
//! target, inflation, FX and related series from the public SGS API and
//! exposes the SELIC as the risk-free rate. The SGS JSON encodes values as
//! strings and dates as `dd/mm/yyyy`; both are parsed explicitly here so a
//! malformed payload surfaces as an API error instead of a bad number.

pub mod benchmarks;

use std::time::Duration;

use analysis_core::cache::TtlCache;
use analysis_core::{AnalysisError, MacroDataProvider, MacroIndicators};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

pub use benchmarks::{sector_benchmark, SectorBenchmark, DEFAULT_BENCHMARK};

const BASE_URL: &str = "https://api.bcb.gov.br";

/// SGS series codes.
pub const SERIES_SELIC_TARGET: u32 = 432;
pub const SERIES_SELIC_DAILY: u32 = 11;
pub const SERIES_IPCA_MONTHLY: u32 = 433;
pub const SERIES_IPCA_12M: u32 = 13522;
pub const SERIES_IGPM_MONTHLY: u32 = 189;
pub const SERIES_IGPM_12M: u32 = 4175;
pub const SERIES_GDP_MONTHLY: u32 = 4380;
pub const SERIES_USD_PTAX: u32 = 1;
pub const SERIES_CDI_DAILY: u32 = 12;

/// CDI trades a touch under the SELIC target.
const CDI_SPREAD: f64 = 0.10;

/// Policy rates move on committee dates, not minute to minute.
const MACRO_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Deserialize)]
struct SgsObservation {
    data: String,
    valor: String,
}

fn parse_observations(
    rows: Vec<SgsObservation>,
) -> Result<Vec<(NaiveDate, f64)>, AnalysisError> {
    rows.into_iter()
        .map(|row| {
            let date = NaiveDate::parse_from_str(&row.data, "%d/%m/%Y").map_err(|e| {
                AnalysisError::ApiError(format!("bad SGS date {:?}: {e}", row.data))
            })?;
            let value: f64 = row.valor.parse().map_err(|_| {
                AnalysisError::ApiError(format!("bad SGS value {:?}", row.valor))
            })?;
            Ok((date, value))
        })
        .collect()
}

pub struct BcbClient {
    http: reqwest::Client,
    latest_cache: TtlCache<u32, f64>,
}

impl BcbClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            latest_cache: TtlCache::new(MACRO_TTL),
        }
    }

    async fn series(&self, code: u32, n: usize) -> Result<Vec<(NaiveDate, f64)>, AnalysisError> {
        let url = format!(
            "{BASE_URL}/dados/serie/bcdata.sgs.{code}/dados/ultimos/{n}?formato=json"
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {} for SGS series {code}",
                response.status()
            )));
        }

        let rows: Vec<SgsObservation> = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        parse_observations(rows)
    }

    /// Most recent published value of a series.
    async fn latest(&self, code: u32) -> Result<f64, AnalysisError> {
        if let Some(value) = self.latest_cache.get(&code) {
            debug!(code, value, "SGS value served from cache");
            return Ok(value);
        }

        let observations = self.series(code, 1).await?;
        let (_, value) = observations
            .last()
            .copied()
            .ok_or_else(|| AnalysisError::ApiError(format!("SGS series {code} is empty")))?;

        self.latest_cache.insert(code, value);
        Ok(value)
    }

    /// SELIC target rate, % per year.
    pub async fn get_selic(&self) -> Result<f64, AnalysisError> {
        self.latest(SERIES_SELIC_TARGET).await
    }

    /// IPCA inflation accumulated over twelve months, %.
    pub async fn get_ipca_12m(&self) -> Result<f64, AnalysisError> {
        self.latest(SERIES_IPCA_12M).await
    }

    /// IGP-M accumulated over twelve months, %.
    pub async fn get_igpm_12m(&self) -> Result<f64, AnalysisError> {
        self.latest(SERIES_IGPM_12M).await
    }

    /// Annualized CDI approximated from the SELIC target.
    pub async fn get_cdi(&self) -> Result<f64, AnalysisError> {
        Ok(self.get_selic().await? - CDI_SPREAD)
    }

    /// USD/BRL PTAX rate.
    pub async fn get_usd_brl(&self) -> Result<f64, AnalysisError> {
        self.latest(SERIES_USD_PTAX).await
    }

    /// All headline indicators in one snapshot. Individual series that
    /// fail are logged and reported as absent; one flaky series must not
    /// take down the whole panel.
    pub async fn get_all_indicators(&self) -> MacroIndicators {
        let selic = self.soft(self.get_selic().await, "selic");
        MacroIndicators {
            selic,
            ipca_12m: self.soft(self.get_ipca_12m().await, "ipca_12m"),
            cdi: selic.map(|s| s - CDI_SPREAD),
            usd_brl: self.soft(self.get_usd_brl().await, "usd_brl"),
            fetched_at: Utc::now(),
        }
    }

    /// Monthly SELIC target history, oldest first.
    pub async fn get_selic_history(
        &self,
        months: usize,
    ) -> Result<Vec<(NaiveDate, f64)>, AnalysisError> {
        self.series(SERIES_SELIC_TARGET, months).await
    }

    fn soft(&self, result: Result<f64, AnalysisError>, name: &str) -> Option<f64> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(%name, %error, "macro indicator unavailable");
                None
            }
        }
    }
}

impl Default for BcbClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MacroDataProvider for BcbClient {
    async fn risk_free_rate(&self) -> Result<f64, AnalysisError> {
        self.get_selic().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observations_parse_string_values_and_dates() {
        let payload = r#"[
            {"data": "01/11/2023", "valor": "12.25"},
            {"data": "01/12/2023", "valor": "11.75"}
        ]"#;

        let rows: Vec<SgsObservation> = serde_json::from_str(payload).unwrap();
        let observations = parse_observations(rows).unwrap();

        assert_eq!(observations.len(), 2);
        assert_eq!(
            observations[0].0,
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap()
        );
        assert_eq!(observations[1].1, 11.75);
    }

    #[test]
    fn malformed_value_is_an_api_error() {
        let payload = r#"[{"data": "01/12/2023", "valor": "n/d"}]"#;

        let rows: Vec<SgsObservation> = serde_json::from_str(payload).unwrap();
        assert!(matches!(
            parse_observations(rows),
            Err(AnalysisError::ApiError(_))
        ));
    }

    #[test]
    fn malformed_date_is_an_api_error() {
        let payload = r#"[{"data": "2023-12-01", "valor": "11.75"}]"#;

        let rows: Vec<SgsObservation> = serde_json::from_str(payload).unwrap();
        assert!(matches!(
            parse_observations(rows),
            Err(AnalysisError::ApiError(_))
        ));
    }
}
