//! # fx-hedge
//!
//! Foreign-exchange hedging calculator.
//!
//! Given a notional, spot and forward rates, transaction cost, margin and an
//! optional set of risk-adjustment rules, computes the settlement amount and
//! the risk-adjusted hedged amount. Each call is a pure function of its
//! inputs.
//!
//! ## Architecture
//!
//! - **core**: Inputs, currency pairs, rate providers, settlement, money rendering
//! - **hedging**: The ordered rule pipeline, prerequisite policies, the engine
//! - **simulation**: Rate shock analysis and random scenario generation

pub mod core;
pub mod hedging;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, CurrencyPair, FxRateTable, RateError};
    pub use crate::core::inputs::{HedgeInputs, RiskRules};
    pub use crate::core::rate_provider::{FixedRate, RateProvider};
    pub use crate::core::settlement::settle;
    pub use crate::hedging::engine::{currency_hedging, HedgeOutcome, HedgingEngine};
    pub use crate::hedging::policy::{HedgeError, PrerequisitePolicy};
    pub use crate::hedging::rules::RiskRule;
}
