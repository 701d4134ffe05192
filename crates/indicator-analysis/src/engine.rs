use analysis_core::{PriceHistory, SummaryStats};
use statrs::statistics::Statistics;

/// Trading days per year, used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Default trailing window for summary statistics (~1 trading year).
pub const DEFAULT_WINDOW: usize = 252;

/// Default simple-moving-average windows.
pub const DEFAULT_MA_WINDOWS: [usize; 3] = [20, 50, 200];

/// Performance and risk statistics over one instrument's price history.
///
/// The daily return series (simple, log, cumulative) is derived once at
/// construction and cached; every method afterwards is a pure function of
/// the stored history plus its arguments. A `window` argument always counts
/// daily return observations; `None` means the whole history.
///
/// Engines for different instruments share nothing, so computing many of
/// them concurrently needs no coordination.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    history: PriceHistory,
    returns: Vec<Option<f64>>,
    log_returns: Vec<Option<f64>>,
    cumulative_returns: Vec<Option<f64>>,
}

impl IndicatorEngine {
    pub fn new(history: PriceHistory) -> Self {
        let closes = history.closes();
        let mut returns = Vec::with_capacity(closes.len());
        let mut log_returns = Vec::with_capacity(closes.len());
        let mut cumulative_returns = Vec::with_capacity(closes.len());

        let mut growth = 1.0;
        for (i, &close) in closes.iter().enumerate() {
            if i == 0 {
                returns.push(None);
                log_returns.push(None);
                cumulative_returns.push(None);
                continue;
            }
            let prev = closes[i - 1];
            let r = close / prev - 1.0;
            growth *= 1.0 + r;
            returns.push(Some(r));
            log_returns.push(Some((close / prev).ln()));
            cumulative_returns.push(Some(growth - 1.0));
        }

        Self {
            history,
            returns,
            log_returns,
            cumulative_returns,
        }
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    /// Daily simple returns, most recent `window` observations.
    ///
    /// The entry for the very first bar of the history is `None`; it is
    /// included when the window reaches back that far.
    pub fn returns(&self, window: Option<usize>) -> &[Option<f64>] {
        tail(&self.returns, window)
    }

    /// Daily log returns, windowed like [`Self::returns`].
    pub fn log_returns(&self, window: Option<usize>) -> &[Option<f64>] {
        tail(&self.log_returns, window)
    }

    /// Compounded return since the start of the history, per bar.
    pub fn cumulative_returns(&self) -> &[Option<f64>] {
        &self.cumulative_returns
    }

    /// Total return over the trailing window.
    ///
    /// Reads `window + 1` closing prices so the window covers `window`
    /// return observations. 0.0 when fewer than two closes are available.
    pub fn total_return(&self, window: Option<usize>) -> f64 {
        let closes = self.history.closes();
        let slice = match window {
            Some(w) => &closes[closes.len().saturating_sub(w + 1)..],
            None => &closes[..],
        };
        if slice.len() < 2 {
            return 0.0;
        }
        slice[slice.len() - 1] / slice[0] - 1.0
    }

    /// Total return compounded to a yearly rate.
    ///
    /// `n` is the window size, or the full bar count when unwindowed.
    pub fn annualized_return(&self, window: Option<usize>) -> f64 {
        let total = self.total_return(window);
        let n = window.unwrap_or(self.history.len());
        if n == 0 {
            return 0.0;
        }
        (1.0 + total).powf(TRADING_DAYS / n as f64) - 1.0
    }

    /// Standard deviation of the trailing daily returns, with undefined
    /// entries dropped first. 0.0 when fewer than two defined returns
    /// remain. Scaled by √252 when `annualized`.
    pub fn volatility(&self, window: usize, annualized: bool) -> f64 {
        let observed: Vec<f64> = tail(&self.returns, Some(window))
            .iter()
            .flatten()
            .copied()
            .collect();
        if observed.len() < 2 {
            return 0.0;
        }
        let vol = observed.as_slice().std_dev();
        if annualized {
            vol * TRADING_DAYS.sqrt()
        } else {
            vol
        }
    }

    /// Excess annualized return per unit of annualized volatility.
    ///
    /// `risk_free_rate` is an annual decimal (0.1075 = 10.75%), the same
    /// unit as the annualized return it is subtracted from. Saturates to
    /// 0.0 when volatility is zero rather than dividing by it.
    pub fn sharpe_ratio(&self, risk_free_rate: f64, window: usize) -> f64 {
        let vol = self.volatility(window, true);
        if vol == 0.0 {
            return 0.0;
        }
        (self.annualized_return(Some(window)) - risk_free_rate) / vol
    }

    /// Worst peak-to-trough decline over the trailing closes, as a
    /// non-positive fraction. 0.0 exactly when prices never fall below a
    /// prior peak.
    pub fn max_drawdown(&self, window: Option<usize>) -> f64 {
        let closes = self.history.closes();
        let slice = match window {
            Some(w) => &closes[closes.len().saturating_sub(w)..],
            None => &closes[..],
        };

        let mut peak = f64::NEG_INFINITY;
        let mut worst: f64 = 0.0;
        for &price in slice {
            if price > peak {
                peak = price;
            }
            worst = worst.min((price - peak) / peak);
        }
        worst
    }

    /// Simple moving average of the closes, aligned to the history: the
    /// first `n - 1` entries are undefined.
    pub fn moving_average(&self, n: usize) -> Vec<Option<f64>> {
        let closes = self.history.closes();
        if n == 0 {
            return vec![None; closes.len()];
        }
        closes
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if i + 1 < n {
                    None
                } else {
                    let slice = &closes[i + 1 - n..=i];
                    Some(slice.iter().sum::<f64>() / n as f64)
                }
            })
            .collect()
    }

    /// Several moving averages in one pass, keyed by window.
    pub fn moving_averages(&self, windows: &[usize]) -> Vec<(usize, Vec<Option<f64>>)> {
        windows.iter().map(|&w| (w, self.moving_average(w))).collect()
    }

    /// Trailing-window summary of all performance statistics.
    ///
    /// The 52-week high/low always look at the last 252 bars regardless of
    /// `window`; the engine does no I/O, so the risk-free rate (annual
    /// decimal) comes from the caller.
    pub fn summary(&self, risk_free_rate: f64, window: usize) -> SummaryStats {
        let closes = self.history.closes();
        let year_closes = &closes[closes.len().saturating_sub(DEFAULT_WINDOW)..];
        let volumes: Vec<f64> = self.history.bars().iter().map(|b| b.volume).collect();
        let window_volumes = &volumes[volumes.len().saturating_sub(window)..];

        let average_volume = if window_volumes.is_empty() {
            0.0
        } else {
            window_volumes.iter().sum::<f64>() / window_volumes.len() as f64
        };

        let high_52w = year_closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low_52w = year_closes.iter().copied().fold(f64::INFINITY, f64::min);

        SummaryStats {
            total_return: self.total_return(Some(window)),
            annualized_return: self.annualized_return(Some(window)),
            annual_volatility: self.volatility(window, true),
            sharpe_ratio: self.sharpe_ratio(risk_free_rate, window),
            max_drawdown: self.max_drawdown(Some(window)),
            current_price: self.history.last_close().unwrap_or(0.0),
            high_52w: if year_closes.is_empty() { 0.0 } else { high_52w },
            low_52w: if year_closes.is_empty() { 0.0 } else { low_52w },
            average_volume,
        }
    }
}

fn tail<T>(series: &[T], window: Option<usize>) -> &[T] {
    match window {
        Some(w) => &series[series.len().saturating_sub(w)..],
        None => series,
    }
}
