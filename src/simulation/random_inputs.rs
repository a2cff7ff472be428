//! Random hedge input generation.
//!
//! Produces plausible input sets for benchmarking and for exercising the
//! pipeline from the command line.

use crate::core::inputs::{HedgeInputs, RiskRules};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for generating random hedge scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of scenarios to generate.
    pub count: usize,
    pub min_amount: f64,
    pub max_amount: f64,
    /// Spot rates are drawn from this range.
    pub min_rate: f64,
    pub max_rate: f64,
    /// Maximum relative distance of the forward rate from spot.
    pub max_forward_spread: f64,
    /// Probability that any single optional rule is configured.
    pub rule_probability: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            count: 10,
            min_amount: 1_000.0,
            max_amount: 10_000_000.0,
            min_rate: 0.5,
            max_rate: 2.0,
            max_forward_spread: 0.1,
            rule_probability: 0.5,
        }
    }
}

/// One generated scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub inputs: HedgeInputs,
    pub rules: RiskRules,
}

/// Generate random scenarios.
///
/// Dependent rules are only drawn together with their prerequisite, so
/// every scenario passes strict validation.
pub fn generate_random_scenarios(config: &ScenarioConfig) -> Vec<Scenario> {
    let mut rng = rand::thread_rng();
    (0..config.count)
        .map(|_| random_scenario(&mut rng, config))
        .collect()
}

fn random_scenario<R: Rng>(rng: &mut R, config: &ScenarioConfig) -> Scenario {
    let amount = round_to(rng.gen_range(config.min_amount..config.max_amount), 2);
    let current_rate = round_to(rng.gen_range(config.min_rate..config.max_rate), 4);
    let spread = if config.max_forward_spread > 0.0 {
        rng.gen_range(-config.max_forward_spread..config.max_forward_spread)
    } else {
        0.0
    };
    let forward_rate = round_to(current_rate * (1.0 + spread), 4);

    let inputs = HedgeInputs::new(amount, current_rate, forward_rate)
        .with_transaction_cost(round_to(amount * rng.gen_range(0.0..0.01), 2))
        .with_margin_requirement(round_to(rng.gen_range(0.0..0.2), 3))
        .with_risk_tolerance(round_to(amount * rng.gen_range(0.1..0.9), 2));

    let p = config.rule_probability.clamp(0.0, 1.0);
    let mut pick = |lo: f64, hi: f64| -> Option<f64> {
        rng.gen_bool(p).then(|| round_to(rng.gen_range(lo..hi), 4))
    };

    let mut rules = RiskRules {
        stop_loss: pick(current_rate * 0.9, current_rate * 1.05),
        take_profit: pick(current_rate * 0.95, current_rate * 1.2),
        trailing_stop: None,
        partial_hedging_percentage: pick(0.0, 1.0),
        diversification_factor: None,
        rebalancing_percentage: pick(0.0, 0.5),
        correlation_threshold: pick(-1.0, 1.0),
        volatility_stop_loss: None,
        profit_target: pick(current_rate, current_rate * 1.3),
        max_drawdown: pick(0.0, 0.5),
        cost_average_factor: pick(0.5, 1.0),
        dynamic_position_multiplier: pick(0.5, 1.5),
        option_cost: pick(0.0, amount * 0.01),
        stress_testing: pick(0.5, 1.0),
        scenario_analysis: pick(0.5, 1.0),
    };
    if rules.stop_loss.is_some() {
        rules.trailing_stop = pick(0.0, current_rate * 0.1);
        rules.volatility_stop_loss = pick(0.0, current_rate * 0.2);
    }
    if rules.partial_hedging_percentage.is_some() {
        rules.diversification_factor = pick(0.0, 1.0);
    }

    Scenario { inputs, rules }
}

fn round_to(value: f64, dp: i32) -> f64 {
    let scale = 10f64.powi(dp);
    (value * scale).round() / scale
}
