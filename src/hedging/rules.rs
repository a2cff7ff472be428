//! The ordered chain of risk-adjustment rules.
//!
//! Every rule is a pure step over [`HedgeState`]. Rules are not commutative:
//! later rules see the amount left by earlier ones, so they always run in
//! [`RiskRule::ORDER`].

use crate::core::inputs::{HedgeInputs, RiskRules};
use crate::hedging::policy::{HedgeError, PrerequisitePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One risk-adjustment rule in the hedging pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    StopLoss,
    TakeProfit,
    TrailingStop,
    PartialHedging,
    Diversification,
    Rebalancing,
    CorrelationAdjustment,
    VolatilityStop,
    ProfitTarget,
    MaxDrawdown,
    CostAveraging,
    DynamicPositionSizing,
    OptionCost,
    StressTesting,
    ScenarioAnalysis,
}

/// Mutable accumulator threaded through the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HedgeState {
    pub hedged_amount: f64,
    /// Amount left after partial hedging. Only partial hedging creates it;
    /// diversification consumes and shrinks it.
    pub remaining_hedged_amount: Option<f64>,
}

impl HedgeState {
    pub fn new(hedged_amount: f64) -> Self {
        Self {
            hedged_amount,
            remaining_hedged_amount: None,
        }
    }
}

/// Read-only values every rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub inputs: &'a HedgeInputs,
    pub rules: &'a RiskRules,
    /// Settlement amount after transaction cost. Rules read it, never write it.
    pub settlement_amount: f64,
    pub policy: PrerequisitePolicy,
}

/// `min(current, candidate)` keeping `current` unless `candidate` is strictly
/// smaller, so a NaN on either side leaves the running value in place.
fn lesser(current: f64, candidate: f64) -> f64 {
    if candidate < current {
        candidate
    } else {
        current
    }
}

/// `max(current, candidate)` with the same tie and NaN handling as [`lesser`].
fn greater(current: f64, candidate: f64) -> f64 {
    if candidate > current {
        candidate
    } else {
        current
    }
}

impl RiskRule {
    /// Evaluation order of the pipeline.
    pub const ORDER: [RiskRule; 15] = [
        RiskRule::StopLoss,
        RiskRule::TakeProfit,
        RiskRule::TrailingStop,
        RiskRule::PartialHedging,
        RiskRule::Diversification,
        RiskRule::Rebalancing,
        RiskRule::CorrelationAdjustment,
        RiskRule::VolatilityStop,
        RiskRule::ProfitTarget,
        RiskRule::MaxDrawdown,
        RiskRule::CostAveraging,
        RiskRule::DynamicPositionSizing,
        RiskRule::OptionCost,
        RiskRule::StressTesting,
        RiskRule::ScenarioAnalysis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RiskRule::StopLoss => "stop loss",
            RiskRule::TakeProfit => "take profit",
            RiskRule::TrailingStop => "trailing stop",
            RiskRule::PartialHedging => "partial hedging",
            RiskRule::Diversification => "diversification",
            RiskRule::Rebalancing => "rebalancing",
            RiskRule::CorrelationAdjustment => "correlation adjustment",
            RiskRule::VolatilityStop => "volatility stop",
            RiskRule::ProfitTarget => "profit target",
            RiskRule::MaxDrawdown => "max drawdown",
            RiskRule::CostAveraging => "cost averaging",
            RiskRule::DynamicPositionSizing => "dynamic position sizing",
            RiskRule::OptionCost => "option cost",
            RiskRule::StressTesting => "stress testing",
            RiskRule::ScenarioAnalysis => "scenario analysis",
        }
    }

    /// The configured parameter for this rule, if any.
    pub fn parameter(&self, rules: &RiskRules) -> Option<f64> {
        match self {
            RiskRule::StopLoss => rules.stop_loss,
            RiskRule::TakeProfit => rules.take_profit,
            RiskRule::TrailingStop => rules.trailing_stop,
            RiskRule::PartialHedging => rules.partial_hedging_percentage,
            RiskRule::Diversification => rules.diversification_factor,
            RiskRule::Rebalancing => rules.rebalancing_percentage,
            RiskRule::CorrelationAdjustment => rules.correlation_threshold,
            RiskRule::VolatilityStop => rules.volatility_stop_loss,
            RiskRule::ProfitTarget => rules.profit_target,
            RiskRule::MaxDrawdown => rules.max_drawdown,
            RiskRule::CostAveraging => rules.cost_average_factor,
            RiskRule::DynamicPositionSizing => rules.dynamic_position_multiplier,
            RiskRule::OptionCost => rules.option_cost,
            RiskRule::StressTesting => rules.stress_testing,
            RiskRule::ScenarioAnalysis => rules.scenario_analysis,
        }
    }

    /// The rule whose parameter or output this rule reads.
    pub fn prerequisite(&self) -> Option<RiskRule> {
        match self {
            RiskRule::TrailingStop | RiskRule::VolatilityStop => Some(RiskRule::StopLoss),
            RiskRule::Diversification => Some(RiskRule::PartialHedging),
            _ => None,
        }
    }

    /// Apply this rule with parameter `value`.
    ///
    /// Returns whether the rule took effect. A rule whose trigger condition
    /// does not hold leaves `state` untouched.
    pub fn apply(
        &self,
        value: f64,
        state: &mut HedgeState,
        ctx: &RuleContext<'_>,
    ) -> Result<bool, HedgeError> {
        let current_rate = ctx.inputs.current_rate;
        let hedged = state.hedged_amount;

        let next = match self {
            RiskRule::StopLoss => (current_rate <= value).then_some(0.0),
            RiskRule::TakeProfit | RiskRule::ProfitTarget => {
                (current_rate >= value).then_some(ctx.inputs.risk_tolerance)
            }
            RiskRule::TrailingStop => {
                if value > 0.0 {
                    let trailing_stop_loss =
                        greater(current_rate - value, self.stop_loss_level(ctx)?);
                    (current_rate <= trailing_stop_loss).then_some(0.0)
                } else {
                    None
                }
            }
            RiskRule::PartialHedging => {
                let remaining = hedged - hedged * value;
                state.remaining_hedged_amount = Some(remaining);
                Some(lesser(hedged, remaining))
            }
            RiskRule::Diversification => {
                let remaining = match (state.remaining_hedged_amount, ctx.policy) {
                    (Some(remaining), _) => remaining,
                    (None, PrerequisitePolicy::Lenient) => hedged,
                    (None, _) => {
                        return Err(HedgeError::MissingPrerequisite {
                            rule: *self,
                            requires: RiskRule::PartialHedging,
                        })
                    }
                };
                let remaining = remaining - remaining * value;
                state.remaining_hedged_amount = Some(remaining);
                Some(lesser(hedged, remaining))
            }
            RiskRule::Rebalancing => Some(hedged - hedged * value),
            RiskRule::CorrelationAdjustment => {
                if value < 0.0 {
                    Some(hedged * value.abs())
                } else {
                    Some(hedged * (1.0 + value))
                }
            }
            RiskRule::VolatilityStop => {
                (current_rate - value >= self.stop_loss_level(ctx)?).then_some(0.0)
            }
            RiskRule::MaxDrawdown => (value > 0.0
                && current_rate <= (1.0 - value) * ctx.settlement_amount)
                .then_some(0.0),
            RiskRule::CostAveraging | RiskRule::DynamicPositionSizing => {
                Some(lesser(hedged, hedged * value))
            }
            RiskRule::OptionCost => Some(hedged - value),
            RiskRule::StressTesting | RiskRule::ScenarioAnalysis => {
                (value > 0.0).then(|| lesser(hedged, hedged * value))
            }
        };

        match next {
            Some(amount) => {
                state.hedged_amount = amount;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop-loss level as seen by a dependent rule.
    fn stop_loss_level(&self, ctx: &RuleContext<'_>) -> Result<f64, HedgeError> {
        match (ctx.rules.stop_loss, ctx.policy) {
            (Some(level), _) => Ok(level),
            (None, PrerequisitePolicy::Lenient) => Ok(f64::MIN_POSITIVE),
            (None, _) => Err(HedgeError::MissingPrerequisite {
                rule: *self,
                requires: RiskRule::StopLoss,
            }),
        }
    }
}

impl fmt::Display for RiskRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs() -> HedgeInputs {
        HedgeInputs::new(100_000.0, 1.20, 1.10).with_risk_tolerance(50_000.0)
    }

    fn run(
        rule: RiskRule,
        value: f64,
        state: &mut HedgeState,
        rules: &RiskRules,
        policy: PrerequisitePolicy,
    ) -> Result<bool, HedgeError> {
        let inputs = inputs();
        let ctx = RuleContext {
            inputs: &inputs,
            rules,
            settlement_amount: 109_000.0,
            policy,
        };
        rule.apply(value, state, &ctx)
    }

    fn apply(rule: RiskRule, value: f64, hedged: f64) -> (bool, f64) {
        let mut state = HedgeState::new(hedged);
        let fired = run(
            rule,
            value,
            &mut state,
            &RiskRules::new().with_stop_loss(1.15),
            PrerequisitePolicy::Strict,
        )
        .unwrap();
        (fired, state.hedged_amount)
    }

    #[test]
    fn test_order_covers_every_rule_once() {
        let mut seen = std::collections::HashSet::new();
        for rule in RiskRule::ORDER {
            assert!(seen.insert(rule));
        }
        assert_eq!(seen.len(), 15);
        assert_eq!(RiskRule::ORDER[0], RiskRule::StopLoss);
        assert_eq!(RiskRule::ORDER[14], RiskRule::ScenarioAnalysis);
    }

    #[test]
    fn test_stop_loss() {
        assert_eq!(apply(RiskRule::StopLoss, 1.25, 80_000.0), (true, 0.0));
        assert_eq!(apply(RiskRule::StopLoss, 1.20, 80_000.0), (true, 0.0));
        assert_eq!(apply(RiskRule::StopLoss, 1.15, 80_000.0), (false, 80_000.0));
    }

    #[test]
    fn test_take_profit_uses_risk_tolerance() {
        assert_eq!(apply(RiskRule::TakeProfit, 1.05, 0.0), (true, 50_000.0));
        assert_eq!(apply(RiskRule::TakeProfit, 1.30, 80.0), (false, 80.0));
    }

    #[test]
    fn test_trailing_stop() {
        // max(1.20 - 0.05, 1.15) = 1.15, and 1.20 > 1.15
        assert_eq!(apply(RiskRule::TrailingStop, 0.05, 100.0), (false, 100.0));
        // zero distance: max(1.20, 1.15) = 1.20 <= 1.20
        assert_eq!(apply(RiskRule::TrailingStop, 0.0, 100.0), (false, 100.0));
        assert_eq!(apply(RiskRule::TrailingStop, -0.5, 100.0), (false, 100.0));

        // a stop level above the spot rate dominates the trailing distance
        let mut state = HedgeState::new(100.0);
        let fired = run(
            RiskRule::TrailingStop,
            0.05,
            &mut state,
            &RiskRules::new().with_stop_loss(1.25),
            PrerequisitePolicy::Strict,
        )
        .unwrap();
        assert!(fired);
        assert_eq!(state.hedged_amount, 0.0);
    }

    #[test]
    fn test_trailing_stop_missing_stop_loss() {
        let mut state = HedgeState::new(100.0);
        let err = run(
            RiskRule::TrailingStop,
            0.05,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::AtPointOfUse,
        )
        .unwrap_err();
        assert_eq!(
            err,
            HedgeError::MissingPrerequisite {
                rule: RiskRule::TrailingStop,
                requires: RiskRule::StopLoss
            }
        );

        // a non-positive distance never reads the stop level
        let fired = run(
            RiskRule::TrailingStop,
            0.0,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::AtPointOfUse,
        )
        .unwrap();
        assert!(!fired);
    }

    #[test]
    fn test_trailing_stop_lenient_uses_min_positive() {
        let mut state = HedgeState::new(100.0);
        let fired = run(
            RiskRule::TrailingStop,
            0.05,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::Lenient,
        )
        .unwrap();
        assert!(!fired);
        assert_eq!(state.hedged_amount, 100.0);
    }

    #[test]
    fn test_partial_hedging_records_remaining() {
        let mut state = HedgeState::new(50_000.0);
        run(
            RiskRule::PartialHedging,
            0.5,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::Strict,
        )
        .unwrap();
        assert_eq!(state.hedged_amount, 25_000.0);
        assert_eq!(state.remaining_hedged_amount, Some(25_000.0));
    }

    #[test]
    fn test_diversification_shrinks_remaining() {
        let mut state = HedgeState {
            hedged_amount: 25_000.0,
            remaining_hedged_amount: Some(25_000.0),
        };
        run(
            RiskRule::Diversification,
            0.3,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::Strict,
        )
        .unwrap();
        assert_relative_eq!(state.hedged_amount, 17_500.0);
        assert_relative_eq!(state.remaining_hedged_amount.unwrap(), 17_500.0);
    }

    #[test]
    fn test_diversification_without_remaining() {
        let mut state = HedgeState::new(1_000.0);
        let err = run(
            RiskRule::Diversification,
            0.3,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::AtPointOfUse,
        )
        .unwrap_err();
        assert!(matches!(err, HedgeError::MissingPrerequisite { .. }));

        run(
            RiskRule::Diversification,
            0.3,
            &mut state,
            &RiskRules::new(),
            PrerequisitePolicy::Lenient,
        )
        .unwrap();
        assert_relative_eq!(state.hedged_amount, 700.0);
    }

    #[test]
    fn test_rebalancing() {
        let (fired, hedged) = apply(RiskRule::Rebalancing, 0.2, 17_500.0);
        assert!(fired);
        assert_relative_eq!(hedged, 14_000.0);
    }

    #[test]
    fn test_correlation_adjustment_sign() {
        let (_, reduced) = apply(RiskRule::CorrelationAdjustment, -0.1, 14_000.0);
        assert_relative_eq!(reduced, 1_400.0);
        let (_, increased) = apply(RiskRule::CorrelationAdjustment, 0.25, 1_000.0);
        assert_relative_eq!(increased, 1_250.0);
        let (_, unchanged) = apply(RiskRule::CorrelationAdjustment, 0.0, 1_000.0);
        assert_eq!(unchanged, 1_000.0);
    }

    #[test]
    fn test_volatility_stop() {
        // 1.20 - 1.1 = 0.1 < 1.15
        assert_eq!(apply(RiskRule::VolatilityStop, 1.1, 10.0), (false, 10.0));
        // 1.20 - 0.0 >= 1.15
        assert_eq!(apply(RiskRule::VolatilityStop, 0.0, 10.0), (true, 0.0));
    }

    #[test]
    fn test_max_drawdown_reads_settlement() {
        // 1.20 <= 0.8 * 109000
        assert_eq!(apply(RiskRule::MaxDrawdown, 0.2, 1_400.0), (true, 0.0));
        assert_eq!(apply(RiskRule::MaxDrawdown, 0.0, 1_400.0), (false, 1_400.0));
        // (1 - 1.5) * 109000 is negative
        assert_eq!(apply(RiskRule::MaxDrawdown, 1.5, 1_400.0), (false, 1_400.0));
    }

    #[test]
    fn test_min_clamps() {
        let (fired, averaged) = apply(RiskRule::CostAveraging, 0.8, 100.0);
        assert!(fired);
        assert_relative_eq!(averaged, 80.0);
        assert_eq!(apply(RiskRule::DynamicPositionSizing, 1.2, 100.0), (true, 100.0));
        // a multiplier above one shrinks a negative position
        let (_, negative) = apply(RiskRule::DynamicPositionSizing, 1.2, -100.0);
        assert_relative_eq!(negative, -120.0);
    }

    #[test]
    fn test_option_cost() {
        assert_eq!(apply(RiskRule::OptionCost, 500.0, 0.0), (true, -500.0));
    }

    #[test]
    fn test_stress_and_scenario_require_positive() {
        assert_eq!(apply(RiskRule::StressTesting, 0.8, -500.0), (true, -500.0));
        assert_eq!(apply(RiskRule::StressTesting, 0.0, 100.0), (false, 100.0));
        let (fired, scenario) = apply(RiskRule::ScenarioAnalysis, 0.9, 100.0);
        assert!(fired);
        assert_relative_eq!(scenario, 90.0);
        assert_eq!(apply(RiskRule::ScenarioAnalysis, -1.0, 100.0), (false, 100.0));
    }

    #[test]
    fn test_lesser_keeps_running_value_on_nan() {
        assert_eq!(lesser(5.0, f64::NAN), 5.0);
        assert!(lesser(f64::NAN, 5.0).is_nan());
        assert_eq!(greater(1.0, f64::NAN), 1.0);
    }
}
