//! Decimal rounding for reported prices.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal places a VWAP is reported with.
pub const VWAP_DECIMAL_PLACES: u32 = 4;

/// Round `value` to `places` fractional digits, half-up.
///
/// Rounding runs on the shortest decimal representation of `value`, so
/// `0.00005` becomes `0.0001` even though its binary form sits just below
/// the midpoint. Values without a finite decimal form are returned as-is.
pub fn round_to_places(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let Ok(decimal) = Decimal::from_str(&value.to_string()) else {
        return value;
    };
    // Back through text so the result is the f64 nearest the rounded decimal.
    decimal
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse()
        .unwrap_or(value)
}
