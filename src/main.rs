//! fx-risk-engine CLI
//!
//! Run simulations, hedge analytics, and policy cascades from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate one exposure's terminal-rate distribution
//! fx-risk-engine simulate --rate 1.0850 --volatility 0.08 --amount 1000000
//!
//! # Recommend a hedge ratio
//! fx-risk-engine recommend --amount 1000000 --rate 1.0850 --volatility 0.08 --tolerance moderate
//!
//! # Walk an exposure through deterministic rate shifts
//! fx-risk-engine scenario --amount 1000000 --rate 1.0850 --ratio 0.5 --type moderate
//!
//! # Realized P&L of an existing hedge
//! fx-risk-engine pnl --amount 1000000 --contract-rate 1.0800 --rate 1.0950 --ratio 0.75
//!
//! # Cascade a policy across a book loaded from JSON
//! fx-risk-engine cascade --input book.json --policy Balanced --company ACME-TRADING
//! ```

use fx_risk_engine::cascade::book::ExposureBook;
use fx_risk_engine::cascade::engine::PolicyCascadeEngine;
use fx_risk_engine::core::company::CompanyId;
use fx_risk_engine::core::currency::CurrencyPair;
use fx_risk_engine::core::exposure::Exposure;
use fx_risk_engine::core::policy::HedgePolicy;
use fx_risk_engine::hedging::recommendation::RiskTolerance;
use fx_risk_engine::hedging::scenario::ScenarioType;
use fx_risk_engine::hedging::HedgeRecommendationEngine;
use fx_risk_engine::simulation::history::SAMPLE_LIMIT;
use fx_risk_engine::simulation::portfolio::PortfolioAggregator;
use fx_risk_engine::simulation::rate_path::{GbmParams, RatePathSimulator};
use fx_risk_engine::simulation::risk_metrics::{pnl_vector, RatePercentiles, RiskMetrics};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-risk-engine — FX exposure risk simulation and hedge policy engine

USAGE:
    fx-risk-engine <COMMAND> [OPTIONS]

COMMANDS:
    simulate    Monte Carlo terminal-rate simulation for one exposure
    portfolio   Aggregate simulation across a company's JSON book
    recommend   Optimal hedge ratio with a comparison table
    scenario    Deterministic rate-shift scenario analysis
    pnl         Realized P&L impact of an existing hedge
    cascade     Apply (or preview) a tiered policy across a JSON book
    help        Show this message

OPTIONS (simulate):
    --rate <R>            Current spot rate
    --volatility <V>      Annualized volatility (e.g. 0.08)
    --amount <A>          Exposure notional
    --horizon <DAYS>      Horizon in days (default: 90)
    --scenarios <N>       Scenario count (default: 10000)
    --seed <S>            Pin the random seed
    --drift <D>           Annualized drift (default: 0)
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (portfolio):
    --input <FILE>        Path to JSON book (exposures + policies)
    --company <ID>        Company whose exposures to simulate
    --horizon <DAYS>      Horizon in days (default: 90)
    --scenarios <N>       Scenario count (default: 10000)
    --seed <S>            Pin the base random seed
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (recommend):
    --amount, --rate, --volatility, --horizon, --format as above
    --tolerance <T>       low | moderate | high (default: moderate)

OPTIONS (scenario):
    --amount, --rate, --format as above
    --ratio <HR>          Hedge ratio in [0, 1] (default: 0)
    --type <T>            conservative | moderate | aggressive (default: moderate)

OPTIONS (pnl):
    --amount, --rate, --ratio, --format as above
    --contract-rate <R>   Rate locked by the forward contract

OPTIONS (cascade):
    --input <FILE>        Path to JSON book (exposures + policies)
    --policy <NAME>       Policy name to activate
    --company <ID>        Company the cascade is scoped to
    --actor <NAME>        Recorded in the audit trail (default: cli)
    --preview             Dry run: counts only, no mutation
    --format <FORMAT>     Output format: text (default) or json

EXAMPLES:
    fx-risk-engine simulate --rate 1.0850 --volatility 0.08 --amount 1000000 --seed 42
    fx-risk-engine recommend --amount 1000000 --rate 1.0850 --volatility 0.08
    fx-risk-engine cascade --input book.json --policy Balanced --company ACME-TRADING --preview"#
    );
}

/// JSON schema for an input book.
#[derive(serde::Deserialize)]
struct BookFile {
    #[serde(default)]
    exposures: Vec<ExposureInput>,
    #[serde(default)]
    policies: Vec<PolicyInput>,
}

#[derive(serde::Deserialize)]
struct ExposureInput {
    company: String,
    pair: String,
    amount: String,
    rate: String,
    #[serde(default)]
    hedge_ratio: Option<String>,
    #[serde(default)]
    budget_rate: Option<String>,
    #[serde(default, rename = "override")]
    hedge_override: bool,
}

#[derive(serde::Deserialize)]
struct PolicyInput {
    company: String,
    name: String,
    over_5m: String,
    #[serde(rename = "1m_to_5m")]
    from_1m_to_5m: String,
    under_1m: String,
}

/// JSON output schema for simulation runs.
#[derive(serde::Serialize)]
struct SimulationOutput {
    horizon_days: u32,
    num_scenarios: usize,
    metrics: RiskMetrics,
    rate_percentiles: RatePercentiles,
    sampled_pnl: Vec<f64>,
    sampled_rates: Vec<f64>,
}

struct ArgReader<'a> {
    args: &'a [String],
    index: usize,
}

impl<'a> ArgReader<'a> {
    fn new(args: &'a [String]) -> Self {
        Self { args, index: 0 }
    }

    fn next_flag(&mut self) -> Option<&'a str> {
        let flag = self.args.get(self.index).map(String::as_str);
        self.index += 1;
        flag
    }

    fn value(&mut self, flag: &str) -> &'a str {
        let value = self.args.get(self.index).unwrap_or_else(|| {
            eprintln!("{flag} requires a value");
            process::exit(1);
        });
        self.index += 1;
        value
    }

    fn parse<T: std::str::FromStr>(&mut self, flag: &str) -> T {
        let raw = self.value(flag);
        raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid value '{raw}' for {flag}");
            process::exit(1);
        })
    }
}

fn unknown_flag(flag: &str) -> ! {
    eprintln!("Unknown option: {flag}");
    process::exit(1);
}

fn cmd_simulate(args: &[String]) {
    let mut rate: Option<f64> = None;
    let mut volatility: Option<f64> = None;
    let mut amount: Option<f64> = None;
    let mut horizon = 90u32;
    let mut scenarios = 10_000usize;
    let mut seed: Option<u64> = None;
    let mut drift = 0.0f64;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--rate" => rate = Some(reader.parse(flag)),
            "--volatility" => volatility = Some(reader.parse(flag)),
            "--amount" => amount = Some(reader.parse(flag)),
            "--horizon" => horizon = reader.parse(flag),
            "--scenarios" => scenarios = reader.parse(flag),
            "--seed" => seed = Some(reader.parse(flag)),
            "--drift" => drift = reader.parse(flag),
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let rate = require(rate, "--rate");
    let volatility = require(volatility, "--volatility");
    let amount = require(amount, "--amount");

    let mut params = GbmParams::new(rate, volatility, horizon, scenarios).with_drift(drift);
    if let Some(seed) = seed {
        params = params.with_seed(seed);
    }

    let rates = RatePathSimulator::simulate(&params).unwrap_or_else(|e| {
        eprintln!("Simulation error: {e}");
        process::exit(1);
    });
    let pnl = pnl_vector(&rates, amount, rate);
    let metrics = RiskMetrics::from_pnl(&pnl);
    let percentiles = RatePercentiles::from_sample(&rates);

    if format == "json" {
        let output = SimulationOutput {
            horizon_days: horizon,
            num_scenarios: scenarios,
            metrics,
            rate_percentiles: percentiles,
            sampled_pnl: pnl.into_iter().take(SAMPLE_LIMIT).collect(),
            sampled_rates: rates.into_iter().take(SAMPLE_LIMIT).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{metrics}");
        println!("Terminal-rate percentiles:");
        println!("   5%: {:.6}", percentiles.p5);
        println!("  25%: {:.6}", percentiles.p25);
        println!("  50%: {:.6}", percentiles.p50);
        println!("  75%: {:.6}", percentiles.p75);
        println!("  95%: {:.6}", percentiles.p95);
    }
}

fn cmd_portfolio(args: &[String]) {
    let mut input_path: Option<String> = None;
    let mut company: Option<String> = None;
    let mut horizon = 90u32;
    let mut scenarios = 10_000usize;
    let mut seed: Option<u64> = None;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--input" => input_path = Some(reader.value(flag).to_string()),
            "--company" => company = Some(reader.value(flag).to_string()),
            "--horizon" => horizon = reader.parse(flag),
            "--scenarios" => scenarios = reader.parse(flag),
            "--seed" => seed = Some(reader.parse(flag)),
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let path = require(input_path, "--input");
    let company = CompanyId::new(require(company, "--company"));

    let book = load_book(&path);
    let exposures: Vec<Exposure> = book
        .exposures_for_company(&company)
        .into_iter()
        .cloned()
        .collect();

    let result = PortfolioAggregator::aggregate(&exposures, horizon, scenarios, seed)
        .unwrap_or_else(|e| {
            eprintln!("Portfolio error: {e}");
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        println!(
            "Portfolio of {} exposures, total notional {}",
            result.per_exposure.len(),
            result.total_notional.round_dp(2)
        );
        for sim in &result.per_exposure {
            println!(
                "  {:<8} amount {:>14}  VaR95 {:>14.2}  P(loss) {:>5.1}%",
                sim.pair.to_string(),
                sim.amount.to_string(),
                sim.metrics.var_95,
                sim.metrics.probability_of_loss * 100.0
            );
        }
        println!("\n{}", result.metrics);
    }
}

fn cmd_recommend(args: &[String]) {
    let mut amount: Option<f64> = None;
    let mut rate: Option<f64> = None;
    let mut volatility: Option<f64> = None;
    let mut horizon = 90u32;
    let mut tolerance = RiskTolerance::Moderate;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--amount" => amount = Some(reader.parse(flag)),
            "--rate" => rate = Some(reader.parse(flag)),
            "--volatility" => volatility = Some(reader.parse(flag)),
            "--horizon" => horizon = reader.parse(flag),
            "--tolerance" => tolerance = reader.parse(flag),
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let recommendation = HedgeRecommendationEngine::optimal_hedge_ratio(
        require(amount, "--amount"),
        require(rate, "--rate"),
        require(volatility, "--volatility"),
        horizon,
        tolerance,
    )
    .unwrap_or_else(|e| {
        eprintln!("Recommendation error: {e}");
        process::exit(1);
    });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&recommendation).unwrap());
    } else {
        println!("{recommendation}");
    }
}

fn cmd_scenario(args: &[String]) {
    let mut amount: Option<Decimal> = None;
    let mut rate: Option<Decimal> = None;
    let mut ratio = Decimal::ZERO;
    let mut scenario_type = ScenarioType::Moderate;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--amount" => amount = Some(reader.parse(flag)),
            "--rate" => rate = Some(reader.parse(flag)),
            "--ratio" => ratio = reader.parse(flag),
            "--type" => scenario_type = reader.parse(flag),
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let result = HedgeRecommendationEngine::scenario_analysis(
        require(amount, "--amount"),
        require(rate, "--rate"),
        ratio,
        scenario_type,
    )
    .unwrap_or_else(|e| {
        eprintln!("Scenario error: {e}");
        process::exit(1);
    });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        println!("{result}");
    }
}

fn cmd_pnl(args: &[String]) {
    let mut amount: Option<Decimal> = None;
    let mut contract_rate: Option<Decimal> = None;
    let mut rate: Option<Decimal> = None;
    let mut ratio: Option<Decimal> = None;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--amount" => amount = Some(reader.parse(flag)),
            "--contract-rate" => contract_rate = Some(reader.parse(flag)),
            "--rate" => rate = Some(reader.parse(flag)),
            "--ratio" => ratio = Some(reader.parse(flag)),
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let impact = HedgeRecommendationEngine::pnl_impact(
        require(amount, "--amount"),
        require(contract_rate, "--contract-rate"),
        require(rate, "--rate"),
        require(ratio, "--ratio"),
    )
    .unwrap_or_else(|e| {
        eprintln!("P&L error: {e}");
        process::exit(1);
    });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&impact).unwrap());
    } else {
        println!("{impact}");
    }
}

fn cmd_cascade(args: &[String]) {
    let mut input_path: Option<String> = None;
    let mut policy_name: Option<String> = None;
    let mut company: Option<String> = None;
    let mut actor = "cli".to_string();
    let mut preview = false;
    let mut format = "text".to_string();

    let mut reader = ArgReader::new(args);
    while let Some(flag) = reader.next_flag() {
        match flag {
            "--input" => input_path = Some(reader.value(flag).to_string()),
            "--policy" => policy_name = Some(reader.value(flag).to_string()),
            "--company" => company = Some(reader.value(flag).to_string()),
            "--actor" => actor = reader.value(flag).to_string(),
            "--preview" => preview = true,
            "--format" => format = reader.value(flag).to_string(),
            other => unknown_flag(other),
        }
    }

    let path = require(input_path, "--input");
    let policy_name = require(policy_name, "--policy");
    let company = CompanyId::new(require(company, "--company"));

    let mut book = load_book(&path);
    let policy_id = book
        .policies_for_company(&company)
        .into_iter()
        .find(|p| p.name() == policy_name)
        .map(|p| p.id())
        .unwrap_or_else(|| {
            eprintln!("Policy '{policy_name}' not found for company {company}");
            process::exit(1);
        });

    if preview {
        let preview = PolicyCascadeEngine::preview(&book, policy_id, &company)
            .unwrap_or_else(|e| {
                eprintln!("Cascade error: {e}");
                process::exit(1);
            });
        if format == "json" {
            println!("{}", serde_json::to_string_pretty(&preview).unwrap());
        } else {
            println!(
                "Policy '{}' would update {} exposures and skip {} manual overrides.",
                preview.policy_name, preview.will_update, preview.will_skip
            );
        }
        return;
    }

    let result = PolicyCascadeEngine::cascade(&mut book, policy_id, &company, &actor)
        .unwrap_or_else(|e| {
            eprintln!("Cascade error: {e}");
            process::exit(1);
        });

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
    } else {
        println!("{result}");
        for entry in book.audit().recent(&company, 5) {
            println!(
                "  [{}] {} by {}: {}",
                entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
                entry.policy_name(),
                entry.actor(),
                entry.notes()
            );
        }
    }
}

fn load_book(path: &str) -> ExposureBook {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        process::exit(1);
    });

    let file: BookFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {e}");
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "exposures": [
    {{ "company": "ACME-TRADING", "pair": "EUR/USD", "amount": "6000000", "rate": "1.0850" }}
  ],
  "policies": [
    {{ "company": "ACME-TRADING", "name": "Balanced",
       "over_5m": "0.85", "1m_to_5m": "0.65", "under_1m": "0.40" }}
  ]
}}"#
        );
        process::exit(1);
    });

    let mut book = ExposureBook::new();

    for input in file.exposures {
        let pair: CurrencyPair = input.pair.parse().unwrap_or_else(|e| {
            eprintln!("Invalid currency pair '{}': {e}", input.pair);
            process::exit(1);
        });
        let amount = parse_decimal(&input.amount, "amount");
        let rate = parse_decimal(&input.rate, "rate");

        let mut exposure = Exposure::new(CompanyId::new(&input.company), pair, amount, rate);
        if let Some(ratio) = input.hedge_ratio {
            exposure = exposure.with_hedge_ratio(parse_decimal(&ratio, "hedge_ratio"));
        }
        if let Some(budget) = input.budget_rate {
            exposure = exposure.with_budget_rate(parse_decimal(&budget, "budget_rate"));
        }
        if input.hedge_override {
            exposure = exposure.with_override();
        }
        book.add_exposure(exposure);
    }

    for input in file.policies {
        book.add_policy(HedgePolicy::new(
            CompanyId::new(&input.company),
            &input.name,
            parse_decimal(&input.over_5m, "over_5m"),
            parse_decimal(&input.from_1m_to_5m, "1m_to_5m"),
            parse_decimal(&input.under_1m, "under_1m"),
        ));
    }

    book
}

fn parse_decimal(raw: &str, field: &str) -> Decimal {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid {field} '{raw}': {e}");
        process::exit(1);
    })
}

fn require<T>(value: Option<T>, flag: &str) -> T {
    value.unwrap_or_else(|| {
        eprintln!("Error: {flag} is required");
        process::exit(1);
    })
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
        "simulate" => cmd_simulate(rest),
        "portfolio" => cmd_portfolio(rest),
        "recommend" => cmd_recommend(rest),
        "scenario" => cmd_scenario(rest),
        "pnl" => cmd_pnl(rest),
        "cascade" => cmd_cascade(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {command}");
            print_usage();
            process::exit(1);
        }
    }
}
