use fx_hedge::core::inputs::{HedgeInputs, RiskRules};
use fx_hedge::core::settlement::settle;
use fx_hedge::hedging::engine::{currency_hedging, HedgingEngine};
use fx_hedge::hedging::policy::PrerequisitePolicy;
use fx_hedge::hedging::rules::RiskRule;
use proptest::prelude::*;

/// Random notional (1 to 10,000,000).
fn arb_amount() -> impl Strategy<Value = f64> {
    1.0f64..10_000_000.0
}

/// Random positive exchange rate.
fn arb_rate() -> impl Strategy<Value = f64> {
    0.01f64..200.0
}

/// Random required inputs.
fn arb_inputs() -> impl Strategy<Value = HedgeInputs> {
    (
        arb_amount(),
        arb_rate(),
        arb_rate(),
        0.0f64..10_000.0,
        0.0f64..0.5,
        0.0f64..1_000_000.0,
    )
        .prop_map(|(amount, current, forward, cost, margin, tolerance)| {
            HedgeInputs::new(amount, current, forward)
                .with_transaction_cost(cost)
                .with_margin_requirement(margin)
                .with_risk_tolerance(tolerance)
        })
}

/// Random factor in [0, 1].
fn arb_unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

/// Random rule set where dependent rules always come with their prerequisite.
fn arb_rules() -> impl Strategy<Value = RiskRules> {
    (
        (
            proptest::option::of(arb_rate()),
            proptest::option::of(arb_rate()),
            proptest::option::of(0.0f64..1.0),
            proptest::option::of(arb_unit()),
            proptest::option::of(arb_unit()),
            proptest::option::of(arb_unit()),
            proptest::option::of(-1.0f64..1.0),
            proptest::option::of(0.0f64..1.0),
        ),
        (
            proptest::option::of(arb_rate()),
            proptest::option::of(arb_unit()),
            proptest::option::of(arb_unit()),
            proptest::option::of(0.0f64..2.0),
            proptest::option::of(0.0f64..1_000.0),
            proptest::option::of(arb_unit()),
            proptest::option::of(arb_unit()),
        ),
    )
        .prop_map(|(a, b)| {
            let mut rules = RiskRules {
                stop_loss: a.0,
                take_profit: a.1,
                trailing_stop: a.2,
                partial_hedging_percentage: a.3,
                diversification_factor: a.4,
                rebalancing_percentage: a.5,
                correlation_threshold: a.6,
                volatility_stop_loss: a.7,
                profit_target: b.0,
                max_drawdown: b.1,
                cost_average_factor: b.2,
                dynamic_position_multiplier: b.3,
                option_cost: b.4,
                stress_testing: b.5,
                scenario_analysis: b.6,
            };
            if rules.stop_loss.is_none() {
                rules.trailing_stop = None;
                rules.volatility_stop_loss = None;
            }
            if rules.partial_hedging_percentage.is_none() {
                rules.diversification_factor = None;
            }
            rules
        })
}

proptest! {
    // ===================================================================
    // PROPERTY 1: settle is plain multiplication, and pure.
    // ===================================================================
    #[test]
    fn settle_is_multiplication(amount in -1e9f64..1e9, rate in -1e3f64..1e3) {
        prop_assert_eq!(settle(amount, rate), amount * rate);
        prop_assert_eq!(settle(amount, rate), settle(amount, rate));
    }

    // ===================================================================
    // PROPERTY 2: With no rules the outputs are the baseline formulas.
    // ===================================================================
    #[test]
    fn no_rules_is_baseline(inputs in arb_inputs()) {
        let (settlement, hedged) = currency_hedging(&inputs, &RiskRules::new()).unwrap();
        let expected_settlement = inputs.amount * inputs.forward_rate - inputs.transaction_cost;
        let expected_hedged = inputs.amount
            + inputs.amount * (inputs.forward_rate - inputs.current_rate)
            - inputs.amount * inputs.margin_requirement;
        prop_assert_eq!(settlement, expected_settlement);
        prop_assert_eq!(hedged, expected_hedged);
    }

    // ===================================================================
    // PROPERTY 3: Rules never touch the settlement amount.
    // ===================================================================
    #[test]
    fn settlement_independent_of_rules(inputs in arb_inputs(), rules in arb_rules()) {
        let (with_rules, _) = currency_hedging(&inputs, &rules).unwrap();
        let (without, _) = currency_hedging(&inputs, &RiskRules::new()).unwrap();
        prop_assert_eq!(with_rules, without);
    }

    // ===================================================================
    // PROPERTY 4: The calculation is deterministic.
    // ===================================================================
    #[test]
    fn hedging_is_deterministic(inputs in arb_inputs(), rules in arb_rules()) {
        let first = HedgingEngine::hedge(&inputs, &rules).unwrap();
        let second = HedgingEngine::hedge(&inputs, &rules).unwrap();
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // PROPERTY 5: Min-clamp rules never increase the position for
    // factors in [0, 1].
    // ===================================================================
    #[test]
    fn clamp_rules_never_increase(inputs in arb_inputs(), rules in arb_rules()) {
        let outcome = HedgingEngine::hedge(&inputs, &rules).unwrap();
        for app in outcome.applications() {
            let clamps = matches!(
                app.rule,
                RiskRule::PartialHedging
                    | RiskRule::CostAveraging
                    | RiskRule::DynamicPositionSizing
                    | RiskRule::StressTesting
                    | RiskRule::ScenarioAnalysis
            );
            if clamps && (0.0..=1.0).contains(&app.parameter) {
                prop_assert!(
                    app.after <= app.before,
                    "{} raised {} to {}",
                    app.rule, app.before, app.after
                );
            }
        }
    }

    // ===================================================================
    // PROPERTY 6: The trace chains: each rule starts where the previous
    // one ended, and the last one ends at the reported amount.
    // ===================================================================
    #[test]
    fn trace_is_contiguous(inputs in arb_inputs(), rules in arb_rules()) {
        let outcome = HedgingEngine::hedge(&inputs, &rules).unwrap();
        let mut expected_before = outcome.baseline_hedged_amount();
        for app in outcome.applications() {
            prop_assert_eq!(app.before, expected_before);
            if !app.fired {
                prop_assert_eq!(app.after, app.before);
            }
            expected_before = app.after;
        }
        prop_assert_eq!(expected_before, outcome.hedged_amount());
        prop_assert_eq!(outcome.applications().len(), rules.active_count());
    }

    // ===================================================================
    // PROPERTY 7: A triggered stop loss zeroes the position unless the
    // take-profit rule fires right after it.
    // ===================================================================
    #[test]
    fn stop_loss_then_take_profit(inputs in arb_inputs(), take_profit in proptest::option::of(arb_rate())) {
        let mut rules = RiskRules::new().with_stop_loss(inputs.current_rate);
        rules.take_profit = take_profit;
        let (_, hedged) = currency_hedging(&inputs, &rules).unwrap();
        match take_profit {
            Some(tp) if inputs.current_rate >= tp => {
                prop_assert_eq!(hedged, inputs.risk_tolerance);
            }
            _ => {
                prop_assert_eq!(hedged, 0.0);
            }
        }
    }

    // ===================================================================
    // PROPERTY 8: Complete rule sets behave identically under every policy.
    // ===================================================================
    #[test]
    fn policies_agree_on_complete_rules(inputs in arb_inputs(), rules in arb_rules()) {
        let strict = HedgingEngine::hedge_with_policy(&inputs, &rules, PrerequisitePolicy::Strict).unwrap();
        let faithful = HedgingEngine::hedge_with_policy(&inputs, &rules, PrerequisitePolicy::AtPointOfUse).unwrap();
        let lenient = HedgingEngine::hedge_with_policy(&inputs, &rules, PrerequisitePolicy::Lenient).unwrap();
        prop_assert_eq!(&strict, &faithful);
        prop_assert_eq!(&strict, &lenient);
    }
}
