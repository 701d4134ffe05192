#[cfg(test)]
mod tests {
    use super::super::compare::*;
    use super::super::engine::*;
    use analysis_core::{Bar, PriceHistory};
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn history_from_closes(closes: &[f64]) -> PriceHistory {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::from_close(start + chrono::Duration::days(i as i64), close, 1_000_000.0)
            })
            .collect();
        PriceHistory::new(bars).unwrap()
    }

    fn sample_engine() -> IndicatorEngine {
        IndicatorEngine::new(history_from_closes(&[100.0, 102.0, 101.0, 105.0, 107.0]))
    }

    #[test]
    fn derived_returns_start_undefined() {
        let engine = sample_engine();
        let returns = engine.returns(None);

        assert_eq!(returns.len(), 5);
        assert!(returns[0].is_none());
        assert!((returns[1].unwrap() - 0.02).abs() < EPS);
        assert!((returns[2].unwrap() - (101.0 / 102.0 - 1.0)).abs() < EPS);
    }

    #[test]
    fn log_returns_match_ln_of_price_ratio() {
        let engine = sample_engine();
        let logs = engine.log_returns(None);

        assert!(logs[0].is_none());
        assert!((logs[1].unwrap() - (102.0f64 / 100.0).ln()).abs() < EPS);
    }

    #[test]
    fn windowed_returns_take_the_most_recent_observations() {
        let engine = sample_engine();

        assert_eq!(engine.returns(Some(2)).len(), 2);
        // a window larger than the history includes the undefined first entry
        let all = engine.returns(Some(10));
        assert_eq!(all.len(), 5);
        assert!(all[0].is_none());
    }

    #[test]
    fn cumulative_returns_compound_to_the_total() {
        let engine = sample_engine();
        let last = engine.cumulative_returns().last().unwrap().unwrap();

        assert!((last - engine.total_return(None)).abs() < EPS);
    }

    #[test]
    fn total_return_uses_window_plus_one_closes() {
        let engine = sample_engine();

        assert!((engine.total_return(None) - 0.07).abs() < EPS);
        // window of 2 return observations spans 3 closes: 101 -> 107
        assert!((engine.total_return(Some(2)) - (107.0 / 101.0 - 1.0)).abs() < EPS);
    }

    #[test]
    fn total_return_is_zero_for_single_bar() {
        let engine = IndicatorEngine::new(history_from_closes(&[42.0]));

        assert_eq!(engine.total_return(None), 0.0);
        assert_eq!(engine.total_return(Some(252)), 0.0);
    }

    #[test]
    fn annualized_return_compounds_over_the_window() {
        let engine = sample_engine();

        let windowed = engine.annualized_return(Some(2));
        let expected = (1.0 + engine.total_return(Some(2))).powf(252.0 / 2.0) - 1.0;
        assert!((windowed - expected).abs() < EPS);

        // unwindowed: n is the full bar count
        let full = engine.annualized_return(None);
        let expected_full = 1.07f64.powf(252.0 / 5.0) - 1.0;
        assert!((full - expected_full).abs() < EPS);
    }

    #[test]
    fn annualized_return_is_zero_for_empty_history() {
        let engine = IndicatorEngine::new(history_from_closes(&[]));

        assert_eq!(engine.annualized_return(None), 0.0);
    }

    #[test]
    fn volatility_is_zero_without_two_defined_returns() {
        // two bars produce a single return observation
        let engine = IndicatorEngine::new(history_from_closes(&[100.0, 101.0]));

        assert_eq!(engine.volatility(252, true), 0.0);
    }

    #[test]
    fn volatility_of_constant_prices_is_zero() {
        let engine = IndicatorEngine::new(history_from_closes(&[50.0, 50.0, 50.0, 50.0]));

        assert_eq!(engine.volatility(252, true), 0.0);
    }

    #[test]
    fn volatility_annualization_scales_by_sqrt_252() {
        let engine = sample_engine();

        let daily = engine.volatility(252, false);
        let annual = engine.volatility(252, true);
        assert!(daily > 0.0);
        assert!((annual - daily * 252.0f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn sharpe_ratio_saturates_to_zero_on_zero_volatility() {
        let engine = IndicatorEngine::new(history_from_closes(&[50.0, 50.0, 50.0, 50.0]));

        for rf in [-0.05, 0.0, 0.1075, 1.0] {
            assert_eq!(engine.sharpe_ratio(rf, 252), 0.0);
        }
    }

    #[test]
    fn sharpe_ratio_is_excess_return_over_volatility() {
        let engine = sample_engine();

        let rf = 0.1075;
        let expected =
            (engine.annualized_return(Some(252)) - rf) / engine.volatility(252, true);
        assert!((engine.sharpe_ratio(rf, 252) - expected).abs() < EPS);
    }

    #[test]
    fn max_drawdown_finds_the_worst_peak_to_trough() {
        let engine = IndicatorEngine::new(history_from_closes(&[100.0, 110.0, 99.0, 121.0]));

        assert!((engine.max_drawdown(None) - (-0.1)).abs() < EPS);
        // the trailing two closes never fall below their running peak
        assert_eq!(engine.max_drawdown(Some(2)), 0.0);
    }

    #[test]
    fn max_drawdown_is_zero_iff_prices_never_decline() {
        let rising = IndicatorEngine::new(history_from_closes(&[1.0, 2.0, 2.0, 3.0]));
        assert_eq!(rising.max_drawdown(None), 0.0);

        let dipping = IndicatorEngine::new(history_from_closes(&[1.0, 2.0, 1.9, 3.0]));
        assert!(dipping.max_drawdown(None) < 0.0);
    }

    #[test]
    fn moving_average_warms_up_with_undefined_entries() {
        let engine = IndicatorEngine::new(history_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]));
        let ma = engine.moving_average(3);

        assert_eq!(ma.len(), 5);
        assert!(ma[0].is_none());
        assert!(ma[1].is_none());
        assert!((ma[2].unwrap() - 2.0).abs() < EPS);
        assert!((ma[3].unwrap() - 3.0).abs() < EPS);
        assert!((ma[4].unwrap() - 4.0).abs() < EPS);
    }

    #[test]
    fn moving_averages_cover_all_requested_windows() {
        let engine = sample_engine();
        let all = engine.moving_averages(&DEFAULT_MA_WINDOWS);

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].0, 20);
        assert_eq!(all[0].1.len(), engine.history().len());
    }

    #[test]
    fn summary_aggregates_consistently() {
        let engine = sample_engine();
        let stats = engine.summary(0.10, 252);

        assert!((stats.total_return - engine.total_return(Some(252))).abs() < EPS);
        assert!((stats.sharpe_ratio - engine.sharpe_ratio(0.10, 252)).abs() < EPS);
        assert_eq!(stats.current_price, 107.0);
        assert_eq!(stats.high_52w, 107.0);
        assert_eq!(stats.low_52w, 100.0);
        assert_eq!(stats.average_volume, 1_000_000.0);
        assert!(stats.max_drawdown <= 0.0);
    }

    #[test]
    fn compare_stocks_preserves_input_order() {
        let engines = vec![
            ("ITUB4".to_string(), sample_engine()),
            (
                "VALE3".to_string(),
                IndicatorEngine::new(history_from_closes(&[60.0, 61.0, 59.0])),
            ),
        ];

        let rows = compare_stocks(&engines, 0.1075);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker, "ITUB4");
        assert_eq!(rows[1].ticker, "VALE3");
        assert_eq!(rows[0].stats.current_price, 107.0);
    }
}
