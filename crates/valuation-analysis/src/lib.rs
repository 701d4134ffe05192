//! Classical fair-price models: Graham, Bazin and the Gordon dividend
//! discount model, plus margin-of-safety classification.
//!
//! Every model is a stateless function. A model whose preconditions are not
//! met answers `None` — "not applicable" is an expected outcome for routine
//! inputs (negative earnings, no dividend), never an error, and never a
//! silent zero.

use analysis_core::{Recommendation, ValuationMethod, ValuationResult};

/// Graham's constant: P/E of 15 × P/B of 1.5.
pub const GRAHAM_MULTIPLIER: f64 = 22.5;

/// AAA-bond yield Graham wrote the formula against, in percentage points.
pub const GRAHAM_REFERENCE_YIELD_PCT: f64 = 4.4;

/// Bazin's minimum acceptable dividend yield.
pub const BAZIN_MIN_YIELD: f64 = 0.06;

/// Default perpetual dividend growth for a standalone Gordon valuation.
pub const GORDON_DEFAULT_GROWTH: f64 = 0.05;

/// Default required return for a standalone Gordon valuation.
pub const GORDON_DEFAULT_DISCOUNT: f64 = 0.12;

/// Premium over the risk-free rate used when [`full_valuation`] derives the
/// Gordon discount rate.
pub const EQUITY_RISK_PREMIUM: f64 = 0.05;

/// Conservative growth assumption used by [`full_valuation`]'s Gordon run.
pub const FULL_VALUATION_GROWTH: f64 = 0.03;

/// Graham's original fair price: √(22.5 × EPS × BVPS).
///
/// Undefined unless both inputs are present and strictly positive; a
/// loss-making company has no Graham price.
pub fn graham_original(eps: Option<f64>, bvps: Option<f64>) -> Option<f64> {
    match (eps, bvps) {
        (Some(eps), Some(bvps)) if eps > 0.0 && bvps > 0.0 => {
            Some((GRAHAM_MULTIPLIER * eps * bvps).sqrt())
        }
        _ => None,
    }
}

/// Graham's formula with the multiplier deflated for a high-rate
/// environment: 22.5 × min(4.4 / rate, 1).
///
/// The cap keeps the adjusted price from ever exceeding the original
/// formula's. `risk_free_rate_pct` is in percentage points (10.75 = 10.75%)
/// and must be positive.
pub fn graham_adjusted(
    eps: Option<f64>,
    bvps: Option<f64>,
    risk_free_rate_pct: f64,
) -> Option<f64> {
    if risk_free_rate_pct <= 0.0 {
        return None;
    }
    match (eps, bvps) {
        (Some(eps), Some(bvps)) if eps > 0.0 && bvps > 0.0 => {
            let adjustment = (GRAHAM_REFERENCE_YIELD_PCT / risk_free_rate_pct).min(1.0);
            Some((GRAHAM_MULTIPLIER * adjustment * eps * bvps).sqrt())
        }
        _ => None,
    }
}

/// Bazin's fair price: the price at which the trailing dividend meets the
/// minimum yield. `None` without a positive dividend or yield floor.
pub fn bazin(dps: Option<f64>, min_yield: f64) -> Option<f64> {
    match dps {
        Some(dps) if dps > 0.0 && min_yield > 0.0 => Some(dps / min_yield),
        _ => None,
    }
}

/// Gordon dividend discount model: DPS × (1 + g) / (r − g).
///
/// Undefined when the dividend is absent or non-positive, and when
/// `discount_rate <= growth_rate` (the perpetuity does not converge; a
/// negative or infinite price must never escape).
pub fn gordon_ddm(dps: Option<f64>, growth_rate: f64, discount_rate: f64) -> Option<f64> {
    match dps {
        Some(dps) if dps > 0.0 && discount_rate > growth_rate => {
            Some(dps * (1.0 + growth_rate) / (discount_rate - growth_rate))
        }
        _ => None,
    }
}

/// Discount (positive) or premium (negative) of the current price against a
/// fair price, as a fraction of the fair price. 0.0 when the fair price is
/// absent or zero.
pub fn safety_margin(fair_price: Option<f64>, current_price: f64) -> f64 {
    match fair_price {
        Some(fair) if fair != 0.0 => (fair - current_price) / fair,
        _ => 0.0,
    }
}

/// Band a safety margin into the five-step recommendation scale.
pub fn classify(margin: f64) -> Recommendation {
    Recommendation::from_margin(margin)
}

/// Run every model against one instrument snapshot.
///
/// `risk_free_rate_pct` is in percentage points. Models whose preconditions
/// fail are left out of the result set; the caller learns which models
/// applied from the methods present. The Gordon run derives its discount
/// rate as risk-free + equity premium and assumes conservative 3% growth,
/// so its answer is deliberately stingier than the standalone defaults.
pub fn full_valuation(
    price: f64,
    eps: Option<f64>,
    bvps: Option<f64>,
    dps: Option<f64>,
    risk_free_rate_pct: f64,
) -> Vec<ValuationResult> {
    let mut results = Vec::new();

    let mut push = |method: ValuationMethod, fair: f64, rationale: String| {
        let margin = safety_margin(Some(fair), price);
        results.push(ValuationResult {
            method,
            fair_price: fair,
            current_price: price,
            safety_margin: margin,
            recommendation: classify(margin),
            rationale,
        });
    };

    if let Some(fair) = graham_original(eps, bvps) {
        push(
            ValuationMethod::GrahamOriginal,
            fair,
            format!(
                "sqrt(22.5 x {:.2} x {:.2})",
                eps.unwrap_or_default(),
                bvps.unwrap_or_default()
            ),
        );
    }

    if let Some(fair) = graham_adjusted(eps, bvps, risk_free_rate_pct) {
        push(
            ValuationMethod::GrahamAdjusted,
            fair,
            format!(
                "multiplier deflated for a {:.2}% risk-free rate",
                risk_free_rate_pct
            ),
        );
    }

    if let Some(fair) = bazin(dps, BAZIN_MIN_YIELD) {
        push(
            ValuationMethod::Bazin,
            fair,
            format!(
                "{:.2} / {:.0}% minimum yield",
                dps.unwrap_or_default(),
                BAZIN_MIN_YIELD * 100.0
            ),
        );
    }

    let discount_rate = risk_free_rate_pct / 100.0 + EQUITY_RISK_PREMIUM;
    if let Some(fair) = gordon_ddm(dps, FULL_VALUATION_GROWTH, discount_rate) {
        push(
            ValuationMethod::GordonDdm,
            fair,
            format!(
                "DPS x (1 + g) / (r - g), g = {:.0}%, r = {:.2}%",
                FULL_VALUATION_GROWTH * 100.0,
                discount_rate * 100.0
            ),
        );
    }

    results
}
