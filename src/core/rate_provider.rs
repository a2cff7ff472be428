//! Sources of the current exchange rate.
//!
//! The hedging calculation never fetches rates itself; callers resolve a
//! rate through a [`RateProvider`] and pass the number in.

use crate::core::currency::{CurrencyPair, FxRateTable, RateError};

/// Something that can quote the current rate for a currency pair.
pub trait RateProvider {
    /// Current rate: 1 unit of `pair.base` in units of `pair.quote`.
    fn current_rate(&self, pair: &CurrencyPair) -> Result<f64, RateError>;
}

/// A single pre-fetched quote, returned for any pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRate(pub f64);

impl RateProvider for FixedRate {
    fn current_rate(&self, pair: &CurrencyPair) -> Result<f64, RateError> {
        if !self.0.is_finite() || self.0 <= 0.0 {
            return Err(RateError::InvalidRate {
                pair: pair.clone(),
                rate: self.0,
            });
        }
        Ok(self.0)
    }
}

impl RateProvider for FxRateTable {
    fn current_rate(&self, pair: &CurrencyPair) -> Result<f64, RateError> {
        self.get_rate(&pair.base, &pair.quote)
    }
}

impl<F> RateProvider for F
where
    F: Fn(&CurrencyPair) -> Result<f64, RateError>,
{
    fn current_rate(&self, pair: &CurrencyPair) -> Result<f64, RateError> {
        self(pair)
    }
}
