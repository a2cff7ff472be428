use crate::core::inputs::{HedgeInputs, RiskRules};
use crate::core::money::format_money;
use crate::core::settlement::settle;
use crate::hedging::policy::{HedgeError, PrerequisitePolicy};
use crate::hedging::rules::{HedgeState, RiskRule, RuleContext};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

/// Effect of one configured rule during a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleApplication {
    pub rule: RiskRule,
    /// The configured parameter.
    pub parameter: f64,
    /// Whether the rule's trigger held and it rewrote the hedged amount.
    pub fired: bool,
    /// Hedged amount going into the rule.
    pub before: f64,
    /// Hedged amount coming out of the rule.
    pub after: f64,
}

/// Result of a hedge calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeOutcome {
    /// Forward rate minus current rate.
    rate_difference: f64,
    /// Notional at the forward rate, net of transaction cost.
    settlement_amount: f64,
    /// Notional reserved as margin.
    margin_required: f64,
    /// Hedged amount before any rule ran.
    baseline_hedged_amount: f64,
    /// Hedged amount after every configured rule.
    hedged_amount: f64,
    /// Every configured rule, in pipeline order.
    applications: Vec<RuleApplication>,
}

impl HedgeOutcome {
    pub fn rate_difference(&self) -> f64 {
        self.rate_difference
    }

    pub fn settlement_amount(&self) -> f64 {
        self.settlement_amount
    }

    pub fn margin_required(&self) -> f64 {
        self.margin_required
    }

    pub fn baseline_hedged_amount(&self) -> f64 {
        self.baseline_hedged_amount
    }

    pub fn hedged_amount(&self) -> f64 {
        self.hedged_amount
    }

    pub fn applications(&self) -> &[RuleApplication] {
        &self.applications
    }

    /// Rules whose trigger held, in pipeline order.
    pub fn fired_rules(&self) -> Vec<RiskRule> {
        self.applications
            .iter()
            .filter(|a| a.fired)
            .map(|a| a.rule)
            .collect()
    }

    /// `(settlement_amount, hedged_amount)`.
    pub fn amounts(&self) -> (f64, f64) {
        (self.settlement_amount, self.hedged_amount)
    }
}

impl std::fmt::Display for HedgeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Hedge Outcome ===")?;
        writeln!(f, "Rate Difference:   {:.6}", self.rate_difference)?;
        writeln!(f, "Settlement Amount: {}", format_money(self.settlement_amount))?;
        writeln!(f, "Margin Required:   {}", format_money(self.margin_required))?;
        writeln!(
            f,
            "Baseline Hedge:    {}",
            format_money(self.baseline_hedged_amount)
        )?;
        writeln!(f, "Hedged Amount:     {}", format_money(self.hedged_amount))?;

        if !self.applications.is_empty() {
            writeln!(f, "\nRule Trace:")?;
            for app in &self.applications {
                writeln!(
                    f,
                    "  {:<24} {:>12} {:>16} -> {:<16} {}",
                    app.rule.name(),
                    app.parameter,
                    format_money(app.before),
                    format_money(app.after),
                    if app.fired { "FIRED" } else { "-" }
                )?;
            }
        }
        Ok(())
    }
}

/// The hedging engine.
///
/// Computes the baseline settlement and hedge, then runs every configured
/// [`RiskRule`] in [`RiskRule::ORDER`].
pub struct HedgingEngine;

impl HedgingEngine {
    /// Run the pipeline under the default [`PrerequisitePolicy::Strict`].
    pub fn hedge(inputs: &HedgeInputs, rules: &RiskRules) -> Result<HedgeOutcome, HedgeError> {
        Self::hedge_with_policy(inputs, rules, PrerequisitePolicy::default())
    }

    /// Run the pipeline under an explicit prerequisite policy.
    pub fn hedge_with_policy(
        inputs: &HedgeInputs,
        rules: &RiskRules,
        policy: PrerequisitePolicy,
    ) -> Result<HedgeOutcome, HedgeError> {
        policy.validate(rules)?;

        let rate_difference = inputs.forward_rate - inputs.current_rate;
        let settlement_amount =
            settle(inputs.amount, inputs.forward_rate) - inputs.transaction_cost;
        let margin_required = inputs.amount * inputs.margin_requirement;
        let baseline_hedged_amount =
            inputs.amount + inputs.amount * rate_difference - margin_required;

        let ctx = RuleContext {
            inputs,
            rules,
            settlement_amount,
            policy,
        };
        let mut state = HedgeState::new(baseline_hedged_amount);
        let mut applications = Vec::with_capacity(rules.active_count());

        for rule in RiskRule::ORDER {
            let Some(parameter) = rule.parameter(rules) else {
                trace!("{} not configured", rule);
                continue;
            };
            let before = state.hedged_amount;
            let fired = rule.apply(parameter, &mut state, &ctx)?;
            if fired {
                debug!(
                    "{} ({}) fired: {} -> {}",
                    rule, parameter, before, state.hedged_amount
                );
            } else {
                trace!("{} ({}) did not trigger", rule, parameter);
            }
            applications.push(RuleApplication {
                rule,
                parameter,
                fired,
                before,
                after: state.hedged_amount,
            });
        }

        let outcome = HedgeOutcome {
            rate_difference,
            settlement_amount,
            margin_required,
            baseline_hedged_amount,
            hedged_amount: state.hedged_amount,
            applications,
        };

        if !outcome.settlement_amount.is_finite() || !outcome.hedged_amount.is_finite() {
            warn!(
                "non-finite hedge result: settlement={} hedged={}",
                outcome.settlement_amount, outcome.hedged_amount
            );
        }
        info!(
            "hedge computed: settlement={} hedged={} ({} of {} rules fired, policy {})",
            outcome.settlement_amount,
            outcome.hedged_amount,
            outcome.fired_rules().len(),
            outcome.applications.len(),
            policy
        );
        Ok(outcome)
    }
}

/// Compute `(settlement_amount, hedged_amount)` under the default policy.
///
/// # Examples
///
/// ```
/// use fx_hedge::core::inputs::{HedgeInputs, RiskRules};
/// use fx_hedge::hedging::engine::currency_hedging;
///
/// let inputs = HedgeInputs::new(100_000.0, 1.20, 1.10)
///     .with_transaction_cost(1_000.0)
///     .with_margin_requirement(0.1)
///     .with_risk_tolerance(50_000.0);
/// let rules = RiskRules::new().with_take_profit(1.05);
///
/// let (settlement, hedged) = currency_hedging(&inputs, &rules).unwrap();
/// assert!((settlement - 109_000.0).abs() < 1e-6);
/// assert_eq!(hedged, 50_000.0);
/// ```
pub fn currency_hedging(
    inputs: &HedgeInputs,
    rules: &RiskRules,
) -> Result<(f64, f64), HedgeError> {
    HedgingEngine::hedge(inputs, rules).map(|outcome| outcome.amounts())
}
