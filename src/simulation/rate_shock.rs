//! Rate shock analysis.
//!
//! Re-runs the hedging pipeline with the spot and forward rates moved by a
//! set of relative shocks, and reports how settlement and hedge respond.

use crate::core::inputs::{HedgeInputs, RiskRules};
use crate::core::money::format_money;
use crate::hedging::engine::HedgingEngine;
use crate::hedging::policy::{HedgeError, PrerequisitePolicy};
use crate::hedging::rules::RiskRule;
use log::debug;
use serde::{Deserialize, Serialize};

/// Shocks applied when the caller supplies none: -10% to +10% in 5% steps.
pub const DEFAULT_SHOCKS: [f64; 5] = [-0.10, -0.05, 0.0, 0.05, 0.10];

/// Outcome of a single shock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateShockResult {
    /// Relative move applied to both rates (0.05 = +5%).
    pub shock: f64,
    pub current_rate: f64,
    pub forward_rate: f64,
    pub settlement_amount: f64,
    pub hedged_amount: f64,
    /// Settlement change against the unshocked run.
    pub settlement_impact: f64,
    /// Hedge change against the unshocked run.
    pub hedge_impact: f64,
    pub fired_rules: Vec<RiskRule>,
}

/// Unshocked amounts plus one result per shock, in the order requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateShockReport {
    pub baseline_settlement: f64,
    pub baseline_hedged: f64,
    pub results: Vec<RateShockResult>,
}

impl RateShockReport {
    /// The shock producing the lowest hedged amount, if any ran.
    pub fn worst_case(&self) -> Option<&RateShockResult> {
        self.results
            .iter()
            .min_by(|a, b| a.hedged_amount.total_cmp(&b.hedged_amount))
    }
}

/// Run the pipeline once unshocked and once per entry in `shocks`.
pub fn run_rate_shocks(
    inputs: &HedgeInputs,
    rules: &RiskRules,
    policy: PrerequisitePolicy,
    shocks: &[f64],
) -> Result<RateShockReport, HedgeError> {
    let baseline = HedgingEngine::hedge_with_policy(inputs, rules, policy)?;

    let mut results = Vec::with_capacity(shocks.len());
    for &shock in shocks {
        let shocked = inputs.shocked(shock);
        let outcome = HedgingEngine::hedge_with_policy(&shocked, rules, policy)?;
        debug!(
            "shock {:+}: settlement {} hedged {}",
            shock,
            outcome.settlement_amount(),
            outcome.hedged_amount()
        );
        results.push(RateShockResult {
            shock,
            current_rate: shocked.current_rate,
            forward_rate: shocked.forward_rate,
            settlement_amount: outcome.settlement_amount(),
            hedged_amount: outcome.hedged_amount(),
            settlement_impact: outcome.settlement_amount() - baseline.settlement_amount(),
            hedge_impact: outcome.hedged_amount() - baseline.hedged_amount(),
            fired_rules: outcome.fired_rules(),
        });
    }

    Ok(RateShockReport {
        baseline_settlement: baseline.settlement_amount(),
        baseline_hedged: baseline.hedged_amount(),
        results,
    })
}

impl std::fmt::Display for RateShockReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Rate Shock Analysis ===")?;
        writeln!(f, "Baseline Settlement: {}", format_money(self.baseline_settlement))?;
        writeln!(f, "Baseline Hedged:     {}", format_money(self.baseline_hedged))?;
        writeln!(
            f,
            "\n  {:>8} {:>10} {:>10} {:>16} {:>16} {:>14}",
            "shock", "spot", "forward", "settlement", "hedged", "hedge impact"
        )?;
        for r in &self.results {
            writeln!(
                f,
                "  {:>+7.1}% {:>10.4} {:>10.4} {:>16} {:>16} {:>14}",
                r.shock * 100.0,
                r.current_rate,
                r.forward_rate,
                format_money(r.settlement_amount),
                format_money(r.hedged_amount),
                format_money(r.hedge_impact)
            )?;
        }
        if let Some(worst) = self.worst_case() {
            writeln!(
                f,
                "\nWorst case: {:+.1}% -> hedged {}",
                worst.shock * 100.0,
                format_money(worst.hedged_amount)
            )?;
        }
        Ok(())
    }
}
