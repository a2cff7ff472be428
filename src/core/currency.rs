use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// # Examples
///
/// ```
/// use fx_hedge::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from FX rate lookups.
#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("no FX rate available for {pair}")]
    RateNotFound { pair: CurrencyPair },
    #[error("FX rate must be positive, got {rate} for {pair}")]
    InvalidRate { pair: CurrencyPair, rate: f64 },
    #[error("invalid currency pair '{0}', expected BASE/QUOTE")]
    InvalidPair(String),
}

/// A pair of currencies: 1 unit of `base` is quoted in units of `quote`.
///
/// Parses from and displays as `BASE/QUOTE`.
///
/// ```
/// use fx_hedge::core::currency::CurrencyPair;
///
/// let pair: CurrencyPair = "EUR/USD".parse().unwrap();
/// assert_eq!(pair.base.as_str(), "EUR");
/// assert_eq!(pair.to_string(), "EUR/USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// The same pair quoted the other way round.
    pub fn inverse(&self) -> Self {
        Self::new(self.quote.clone(), self.base.clone())
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| RateError::InvalidPair(s.to_string()))?;
        let (base, quote) = (base.trim(), quote.trim());
        if base.is_empty() || quote.is_empty() {
            return Err(RateError::InvalidPair(s.to_string()));
        }
        Ok(Self::new(CurrencyCode::new(base), CurrencyCode::new(quote)))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = RateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

/// In-memory FX rate table.
///
/// Stores direct rates and derives the inverse on insertion. Serves as an
/// offline [`RateProvider`](crate::core::rate_provider::RateProvider) for
/// callers that pre-fetch their quotes.
///
/// # Examples
///
/// ```
/// use fx_hedge::core::currency::{CurrencyCode, FxRateTable};
///
/// let mut rates = FxRateTable::new();
/// rates.set_rate(CurrencyCode::new("EUR"), CurrencyCode::new("USD"), 1.25).unwrap();
///
/// let converted = rates
///     .convert(1000.0, &CurrencyCode::new("USD"), &CurrencyCode::new("EUR"))
///     .unwrap();
/// assert!((converted - 800.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FxRateTable {
    /// Direct rates: (from, to) -> rate.
    rates: HashMap<(CurrencyCode, CurrencyCode), f64>,
}

impl FxRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a direct exchange rate: 1 unit of `from` = `rate` units of `to`.
    pub fn set_rate(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: f64,
    ) -> Result<(), RateError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateError::InvalidRate {
                pair: CurrencyPair::new(from, to),
                rate,
            });
        }
        self.rates.insert((from.clone(), to.clone()), rate);
        self.rates.insert((to, from), 1.0 / rate);
        Ok(())
    }

    /// Get the exchange rate from one currency to another.
    pub fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, RateError> {
        if from == to {
            return Ok(1.0);
        }
        self.rates
            .get(&(from.clone(), to.clone()))
            .copied()
            .ok_or_else(|| RateError::RateNotFound {
                pair: CurrencyPair::new(from.clone(), to.clone()),
            })
    }

    /// Convert an amount from one currency to another.
    pub fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, RateError> {
        let rate = self.get_rate(from, to)?;
        Ok(amount * rate)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
