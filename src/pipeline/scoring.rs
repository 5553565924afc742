//! Sale-potential scoring formula.
//!
//! Pure computation — turns the classifier's label plus the resolved market
//! figures into a bounded 0–100 score:
//!
//! ```text
//! price_factor          = 1 - |price - median_price| / median_price
//! rental_yield_factor   = (median_rental * 12) / price
//! sale_potential_factor = 1.0 if Sold else 0.5
//! raw   = 0.4*price_factor + 0.4*rental_yield_factor + 0.2*sale_potential_factor
//! score = 100 / (1 + e^(-raw))
//! ```

use super::PipelineError;
use crate::types::{round2, SaleStatus, SaleTier};

const WEIGHT_PRICE: f64 = 0.4;
const WEIGHT_YIELD: f64 = 0.4;
const WEIGHT_SALE: f64 = 0.2;

/// Monthly rental figures are annualized in the yield factor.
const MONTHS_PER_YEAR: f64 = 12.0;

/// Compute the sale-potential score, rounded to two decimals.
///
/// `price` and `median_price` must be positive: the rental yield factor
/// divides by `price` and the price factor by `median_price`, so a zero is
/// a domain error here rather than an infinity downstream.
pub fn property_score(
    price: f64,
    median_price: f64,
    median_rental: f64,
    status: SaleStatus,
) -> Result<f64, PipelineError> {
    if price <= 0.0 {
        return Err(PipelineError::Domain(format!(
            "price must be positive, got {price}"
        )));
    }
    if median_price <= 0.0 {
        return Err(PipelineError::Domain(format!(
            "median price must be positive, got {median_price}"
        )));
    }

    let price_factor = 1.0 - ((price - median_price) / median_price).abs();
    let rental_yield_factor = (median_rental * MONTHS_PER_YEAR) / price;
    let sale_potential_factor = status.potential_factor();

    let raw = WEIGHT_PRICE * price_factor
        + WEIGHT_YIELD * rental_yield_factor
        + WEIGHT_SALE * sale_potential_factor;

    Ok(round2(100.0 / (1.0 + (-raw).exp())))
}

/// Tier for a rounded score. Lower bounds are inclusive: exactly 40.00 is
/// `Average`, exactly 80.00 is `Good`.
pub fn tier_for(score: f64) -> SaleTier {
    if score < 40.0 {
        SaleTier::Bad
    } else if score < 80.0 {
        SaleTier::Average
    } else {
        SaleTier::Good
    }
}
