//! Worked hedging example.
//!
//! Hedges a EUR 100,000 position with every risk rule configured and prints
//! the rule-by-rule trace.

use fx_hedge::core::currency::{CurrencyCode, CurrencyPair, FxRateTable};
use fx_hedge::core::inputs::{HedgeInputs, RiskRules};
use fx_hedge::core::money::format_money;
use fx_hedge::core::rate_provider::RateProvider;
use fx_hedge::hedging::engine::HedgingEngine;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║     fx-hedge: Worked Hedging Example     ║");
    println!("╚══════════════════════════════════════════╝\n");

    // A pre-fetched quote stands in for a live rate service.
    let mut rates = FxRateTable::new();
    rates
        .set_rate(CurrencyCode::new("EUR"), CurrencyCode::new("USD"), 1.20)
        .expect("valid rate");

    let eur_usd: CurrencyPair = "EUR/USD".parse().expect("valid pair");
    let usd_eur = eur_usd.inverse();
    let spot = rates.current_rate(&eur_usd).expect("EUR/USD quoted");
    let display = rates.current_rate(&usd_eur).expect("USD/EUR derived");
    println!(
        "Current exchange rate: 1 {} = {:.4} {}\n",
        usd_eur.base, display, usd_eur.quote
    );

    let inputs = HedgeInputs::new(100_000.0, spot, 1.10)
        .with_transaction_cost(1_000.0)
        .with_margin_requirement(0.1)
        .with_risk_tolerance(50_000.0);

    let rules = RiskRules::new()
        .with_stop_loss(1.15)
        .with_take_profit(1.05)
        .with_trailing_stop(0.05)
        .with_partial_hedging_percentage(0.5)
        .with_diversification_factor(0.3)
        .with_rebalancing_percentage(0.2)
        .with_correlation_threshold(-0.1)
        .with_volatility_stop_loss(1.1)
        .with_profit_target(1.3)
        .with_max_drawdown(0.2)
        .with_cost_average_factor(0.8)
        .with_dynamic_position_multiplier(1.2)
        .with_option_cost(500.0)
        .with_stress_testing(0.8)
        .with_scenario_analysis(0.9);

    let outcome = HedgingEngine::hedge(&inputs, &rules).expect("rules are complete");
    println!("{}", outcome);

    println!("━━━ Summary ━━━\n");
    println!(
        "  Settlement Amount (USD): {}",
        format_money(outcome.settlement_amount())
    );
    println!(
        "  Hedged Amount (USD):     {}",
        format_money(outcome.hedged_amount())
    );
}
