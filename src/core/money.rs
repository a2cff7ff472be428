//! Rendering of computed amounts.
//!
//! The calculation runs in `f64`; reports go through [`Decimal`] so that
//! amounts print as fixed two-decimal figures instead of binary artefacts
//! like `109000.00000000001`.

use rust_decimal::Decimal;

/// Number of decimal places used when reporting amounts.
pub const MONEY_DP: u32 = 2;

/// Convert an amount to a [`Decimal`] rounded to [`MONEY_DP`] places.
///
/// Returns `None` for NaN, infinities and values outside the `Decimal` range.
pub fn to_money(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64_retain(value).map(|d| d.round_dp(MONEY_DP))
}

/// Render an amount for display, falling back to the float's own
/// representation when it has no decimal form.
pub fn format_money(value: f64) -> String {
    match to_money(value) {
        Some(d) => d.to_string(),
        None => value.to_string(),
    }
}
