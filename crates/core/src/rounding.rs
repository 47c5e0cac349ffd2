use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to `dp` decimal places, midpoints away from zero.
///
/// Goes through `Decimal` so midpoints round on the decimal representation.
/// Non-finite input is returned unchanged.
#[must_use]
pub fn round_dp(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Converts a stored decimal percentage into `f64`, `NaN` when it does not fit.
#[must_use]
pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Converts a percentage into a decimal for storage.
#[must_use]
pub fn f64_to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}
