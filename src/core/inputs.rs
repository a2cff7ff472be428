use serde::{Deserialize, Serialize};

/// The six required inputs of a hedge calculation.
///
/// No range checks are applied: negative amounts, zero rates and NaN all
/// flow through the arithmetic unchanged.
///
/// # Examples
///
/// ```
/// use fx_hedge::core::inputs::HedgeInputs;
///
/// let inputs = HedgeInputs::new(100_000.0, 1.20, 1.10)
///     .with_transaction_cost(1_000.0)
///     .with_margin_requirement(0.1)
///     .with_risk_tolerance(50_000.0);
/// assert_eq!(inputs.forward_rate, 1.10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeInputs {
    /// Notional to hedge, in the base currency.
    pub amount: f64,
    /// Spot rate between the base and target currencies.
    pub current_rate: f64,
    /// Forward rate between the base and target currencies.
    pub forward_rate: f64,
    /// Flat deduction from the settlement amount, in the target currency.
    pub transaction_cost: f64,
    /// Fraction of the notional reserved as margin (0.1 = 10%).
    pub margin_requirement: f64,
    /// Position substituted when a take-profit or profit target triggers.
    pub risk_tolerance: f64,
}

impl HedgeInputs {
    /// Inputs with zero cost, margin and risk tolerance.
    pub fn new(amount: f64, current_rate: f64, forward_rate: f64) -> Self {
        Self {
            amount,
            current_rate,
            forward_rate,
            transaction_cost: 0.0,
            margin_requirement: 0.0,
            risk_tolerance: 0.0,
        }
    }

    pub fn with_transaction_cost(mut self, cost: f64) -> Self {
        self.transaction_cost = cost;
        self
    }

    pub fn with_margin_requirement(mut self, fraction: f64) -> Self {
        self.margin_requirement = fraction;
        self
    }

    pub fn with_risk_tolerance(mut self, tolerance: f64) -> Self {
        self.risk_tolerance = tolerance;
        self
    }

    /// Copy of these inputs with both rates scaled by `1 + shock`.
    pub fn shocked(&self, shock: f64) -> Self {
        Self {
            current_rate: self.current_rate * (1.0 + shock),
            forward_rate: self.forward_rate * (1.0 + shock),
            ..*self
        }
    }
}

/// Optional risk-adjustment parameters.
///
/// Each field left as `None` disables its rule. Fields are listed in the
/// order the pipeline evaluates them.
///
/// ```
/// use fx_hedge::core::inputs::RiskRules;
///
/// let rules = RiskRules::new().with_stop_loss(1.15).with_option_cost(500.0);
/// assert_eq!(rules.active_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskRules {
    /// Zero the position when the spot rate falls to this level.
    pub stop_loss: Option<f64>,
    /// Cap the position at the risk tolerance once the spot rate reaches this level.
    pub take_profit: Option<f64>,
    /// Distance the trailing stop keeps below the spot rate.
    pub trailing_stop: Option<f64>,
    /// Fraction of the position carved out as a partial hedge.
    pub partial_hedging_percentage: Option<f64>,
    /// Fraction of the remaining partial-hedge amount set aside for diversification.
    pub diversification_factor: Option<f64>,
    /// Fraction of the position removed on rebalance.
    pub rebalancing_percentage: Option<f64>,
    /// Signed correlation factor scaling the position.
    pub correlation_threshold: Option<f64>,
    /// Volatility band compared against the stop-loss level.
    pub volatility_stop_loss: Option<f64>,
    /// Cap the position at the risk tolerance once the spot rate reaches this level.
    pub profit_target: Option<f64>,
    /// Maximum tolerated drawdown as a fraction of the settlement amount.
    pub max_drawdown: Option<f64>,
    /// Cost-averaging factor.
    pub cost_average_factor: Option<f64>,
    /// Dynamic position sizing multiplier.
    pub dynamic_position_multiplier: Option<f64>,
    /// Cost of options bought for the hedge.
    pub option_cost: Option<f64>,
    /// Stress-test scaling factor.
    pub stress_testing: Option<f64>,
    /// Scenario-analysis scaling factor.
    pub scenario_analysis: Option<f64>,
}

macro_rules! rule_setters {
    ($($setter:ident => $field:ident),* $(,)?) => {
        impl RiskRules {
            $(
                pub fn $setter(mut self, value: f64) -> Self {
                    self.$field = Some(value);
                    self
                }
            )*
        }
    };
}

rule_setters! {
    with_stop_loss => stop_loss,
    with_take_profit => take_profit,
    with_trailing_stop => trailing_stop,
    with_partial_hedging_percentage => partial_hedging_percentage,
    with_diversification_factor => diversification_factor,
    with_rebalancing_percentage => rebalancing_percentage,
    with_correlation_threshold => correlation_threshold,
    with_volatility_stop_loss => volatility_stop_loss,
    with_profit_target => profit_target,
    with_max_drawdown => max_drawdown,
    with_cost_average_factor => cost_average_factor,
    with_dynamic_position_multiplier => dynamic_position_multiplier,
    with_option_cost => option_cost,
    with_stress_testing => stress_testing,
    with_scenario_analysis => scenario_analysis,
}

impl RiskRules {
    /// No rules active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters that are set.
    pub fn active_count(&self) -> usize {
        [
            self.stop_loss,
            self.take_profit,
            self.trailing_stop,
            self.partial_hedging_percentage,
            self.diversification_factor,
            self.rebalancing_percentage,
            self.correlation_threshold,
            self.volatility_stop_loss,
            self.profit_target,
            self.max_drawdown,
            self.cost_average_factor,
            self.dynamic_position_multiplier,
            self.option_cost,
            self.stress_testing,
            self.scenario_analysis,
        ]
        .iter()
        .filter(|p| p.is_some())
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}
