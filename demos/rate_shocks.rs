//! Rate shock sweep.
//!
//! Shows how a stop loss and a drawdown cap change the hedge as the spot
//! and forward rates move together.

use fx_hedge::core::inputs::{HedgeInputs, RiskRules};
use fx_hedge::hedging::policy::PrerequisitePolicy;
use fx_hedge::simulation::rate_shock::run_rate_shocks;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║      fx-hedge: Rate Shock Example        ║");
    println!("╚══════════════════════════════════════════╝\n");

    let inputs = HedgeInputs::new(2_500_000.0, 1.0850, 1.0920)
        .with_transaction_cost(2_500.0)
        .with_margin_requirement(0.05)
        .with_risk_tolerance(1_000_000.0);

    let rules = RiskRules::new()
        .with_stop_loss(1.02)
        .with_profit_target(1.15)
        .with_partial_hedging_percentage(0.25)
        .with_option_cost(7_500.0);

    let shocks = [-0.15, -0.10, -0.05, 0.0, 0.05, 0.10, 0.15];
    let report = run_rate_shocks(&inputs, &rules, PrerequisitePolicy::Strict, &shocks)
        .expect("rules are complete");

    println!("{}", report);

    println!("━━━ Rules fired per shock ━━━\n");
    for r in &report.results {
        let fired: Vec<&str> = r.fired_rules.iter().map(|rule| rule.name()).collect();
        println!("  {:>+6.1}%  {}", r.shock * 100.0, fired.join(", "));
    }
}
