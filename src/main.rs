//! fx-hedge CLI
//!
//! Run hedge calculations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Hedge a position described in a JSON file
//! fx-hedge hedge --input position.json
//!
//! # Output as JSON, failing only when a missing prerequisite is reached
//! fx-hedge hedge --input position.json --format json --policy at-point-of-use
//!
//! # Sweep rate shocks
//! fx-hedge shock --input position.json --shocks -0.1,-0.05,0,0.05,0.1
//!
//! # Print the worked example
//! fx-hedge example
//! ```

use fx_hedge::core::currency::{CurrencyCode, CurrencyPair, FxRateTable};
use fx_hedge::core::inputs::{HedgeInputs, RiskRules};
use fx_hedge::core::money::format_money;
use fx_hedge::core::rate_provider::{FixedRate, RateProvider};
use fx_hedge::hedging::engine::{HedgeOutcome, HedgingEngine, RuleApplication};
use fx_hedge::hedging::policy::PrerequisitePolicy;
use fx_hedge::simulation::random_inputs::{generate_random_scenarios, ScenarioConfig};
use fx_hedge::simulation::rate_shock::{run_rate_shocks, DEFAULT_SHOCKS};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-hedge: foreign-exchange hedging calculator

USAGE:
    fx-hedge <COMMAND> [OPTIONS]

COMMANDS:
    hedge       Compute settlement and hedged amounts for a position
    shock       Recompute the hedge under relative rate shocks
    example     Run the built-in worked example
    generate    Generate random positions (for testing)
    help        Show this message

OPTIONS (hedge, shock):
    --input <FILE>          Path to JSON position file
    --format <FORMAT>       Output format: text (default) or json
    --policy <POLICY>       strict (default), at-point-of-use or lenient
    --current-rate <RATE>   Override the spot rate from the file

OPTIONS (shock):
    --shocks <LIST>         Comma-separated relative shocks (default: -0.1,-0.05,0,0.05,0.1)

OPTIONS (example):
    --rate <RATE>           Pre-fetched USD/EUR quote to display

OPTIONS (generate):
    --count <N>             Number of positions (default: 10)
    --output <FILE>         Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG                Log filter, e.g. RUST_LOG=fx_hedge=debug

EXAMPLES:
    fx-hedge hedge --input position.json
    fx-hedge hedge --input position.json --format json --policy lenient
    fx-hedge shock --input position.json --shocks -0.2,0,0.2
    fx-hedge generate --count 5 --output positions.json"#
    );
}

/// JSON schema for an input position.
#[derive(serde::Deserialize)]
struct PositionFile {
    #[serde(default = "default_pair")]
    pair: CurrencyPair,
    inputs: HedgeInputs,
    #[serde(default)]
    rules: RiskRules,
    #[serde(default)]
    policy: PrerequisitePolicy,
}

fn default_pair() -> CurrencyPair {
    CurrencyPair::new(CurrencyCode::new("EUR"), CurrencyCode::new("USD"))
}

/// JSON output schema for a hedge run.
#[derive(serde::Serialize)]
struct HedgeOutput {
    pair: String,
    policy: String,
    rate_difference: f64,
    settlement_amount: String,
    margin_required: String,
    hedged_amount: String,
    fired_rules: Vec<String>,
    trace: Vec<RuleApplication>,
}

impl HedgeOutput {
    fn new(pair: &CurrencyPair, policy: PrerequisitePolicy, outcome: &HedgeOutcome) -> Self {
        Self {
            pair: pair.to_string(),
            policy: policy.to_string(),
            rate_difference: outcome.rate_difference(),
            settlement_amount: format_money(outcome.settlement_amount()),
            margin_required: format_money(outcome.margin_required()),
            hedged_amount: format_money(outcome.hedged_amount()),
            fired_rules: outcome
                .fired_rules()
                .iter()
                .map(|r| r.name().to_string())
                .collect(),
            trace: outcome.applications().to_vec(),
        }
    }
}

/// Options shared by `hedge` and `shock`.
struct RunOptions {
    input_path: String,
    format: String,
    policy: Option<PrerequisitePolicy>,
    current_rate: Option<f64>,
    shocks: Vec<f64>,
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn parse_run_options(args: &[String], allow_shocks: bool) -> RunOptions {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut policy = None;
    let mut current_rate = None;
    let mut shocks = DEFAULT_SHOCKS.to_vec();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(required_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                format = required_value(args, i, "--format", "'text' or 'json'");
                if format != "text" && format != "json" {
                    eprintln!("Unknown format '{}': expected 'text' or 'json'", format);
                    process::exit(1);
                }
            }
            "--policy" => {
                i += 1;
                let raw = required_value(args, i, "--policy", "a policy name");
                policy = Some(raw.parse::<PrerequisitePolicy>().unwrap_or_else(|e| {
                    eprintln!("{}", e);
                    process::exit(1);
                }));
            }
            "--current-rate" => {
                i += 1;
                let raw = required_value(args, i, "--current-rate", "a number");
                current_rate = Some(raw.parse::<f64>().unwrap_or_else(|_| {
                    eprintln!("Invalid rate '{}'", raw);
                    process::exit(1);
                }));
            }
            "--shocks" if allow_shocks => {
                i += 1;
                let raw = required_value(args, i, "--shocks", "a comma-separated list");
                shocks = raw
                    .split(',')
                    .map(|s| {
                        s.trim().parse::<f64>().unwrap_or_else(|_| {
                            eprintln!("Invalid shock '{}'", s);
                            process::exit(1);
                        })
                    })
                    .collect();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    RunOptions {
        input_path,
        format,
        policy,
        current_rate,
        shocks,
    }
}

fn load_position(path: &str) -> PositionFile {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "pair": "EUR/USD",
  "inputs": {{ "amount": 100000, "current_rate": 1.20, "forward_rate": 1.10,
              "transaction_cost": 1000, "margin_requirement": 0.1, "risk_tolerance": 50000 }},
  "rules": {{ "stop_loss": 1.15, "take_profit": 1.05 }},
  "policy": "strict"
}}"#
        );
        process::exit(1);
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

/// Load the position and apply command-line overrides.
fn resolve_position(opts: &RunOptions) -> (PositionFile, PrerequisitePolicy) {
    let mut position = load_position(&opts.input_path);
    if let Some(rate) = opts.current_rate {
        position.inputs.current_rate = rate;
    }
    let policy = opts.policy.unwrap_or(position.policy);
    (position, policy)
}

fn cmd_hedge(args: &[String]) {
    let opts = parse_run_options(args, false);
    let (position, policy) = resolve_position(&opts);

    let outcome = HedgingEngine::hedge_with_policy(&position.inputs, &position.rules, policy)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if opts.format == "json" {
        println!("{}", to_json(&HedgeOutput::new(&position.pair, policy, &outcome)));
    } else {
        println!("Pair:   {}", position.pair);
        println!("Policy: {}\n", policy);
        println!("{}", outcome);
    }
}

fn cmd_shock(args: &[String]) {
    let opts = parse_run_options(args, true);
    let (position, policy) = resolve_position(&opts);

    let report = run_rate_shocks(&position.inputs, &position.rules, policy, &opts.shocks)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if opts.format == "json" {
        println!("{}", to_json(&report));
    } else {
        println!("Pair: {}\n", position.pair);
        println!("{}", report);
    }
}

fn cmd_example(args: &[String]) {
    let mut fixed_rate: Option<f64> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--rate" => {
                i += 1;
                let raw = required_value(args, i, "--rate", "a number");
                fixed_rate = Some(raw.parse::<f64>().unwrap_or_else(|_| {
                    eprintln!("Invalid rate '{}'", raw);
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let display_pair = CurrencyPair::new(CurrencyCode::new("USD"), CurrencyCode::new("EUR"));
    let mut table = FxRateTable::new();
    table
        .set_rate(CurrencyCode::new("EUR"), CurrencyCode::new("USD"), 1.20)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    let provider: Box<dyn RateProvider> = match fixed_rate {
        Some(rate) => Box::new(FixedRate(rate)),
        None => Box::new(table),
    };

    match provider.current_rate(&display_pair) {
        Ok(rate) => println!(
            "Current exchange rate: 1 {} = {} {}",
            display_pair.base, rate, display_pair.quote
        ),
        Err(e) => eprintln!("Rate unavailable: {}", e),
    }

    let inputs = HedgeInputs::new(100_000.0, 1.20, 1.10)
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

    let outcome = HedgingEngine::hedge(&inputs, &rules).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!(
        "Settlement Amount (USD): {}",
        format_money(outcome.settlement_amount())
    );
    println!("Hedged Amount (USD): {}", format_money(outcome.hedged_amount()));
}

fn cmd_generate(args: &[String]) {
    let mut count = 10usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                i += 1;
                count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--count requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(required_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = ScenarioConfig {
        count,
        ..Default::default()
    };
    let scenarios = generate_random_scenarios(&config);
    let json = to_json(&scenarios);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!("Generated {} positions → {}", scenarios.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "hedge" => cmd_hedge(rest),
        "shock" => cmd_shock(rest),
        "example" => cmd_example(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
