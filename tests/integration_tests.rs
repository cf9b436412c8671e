use chrono::{Duration, TimeZone, Utc};
use fx_risk_engine::cascade::book::ExposureBook;
use fx_risk_engine::cascade::engine::{CascadeError, PolicyCascadeEngine};
use fx_risk_engine::core::company::CompanyId;
use fx_risk_engine::core::exposure::Exposure;
use fx_risk_engine::core::policy::HedgePolicy;
use fx_risk_engine::hedging::recommendation::RiskTolerance;
use fx_risk_engine::hedging::rollover::{MarketOutlook, RolloverAction};
use fx_risk_engine::hedging::scenario::ScenarioType;
use fx_risk_engine::hedging::HedgeRecommendationEngine;
use fx_risk_engine::simulation::history::{SimulationHistory, SimulationResult};
use fx_risk_engine::simulation::portfolio::PortfolioAggregator;
use fx_risk_engine::simulation::rate_path::SimulationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn acme() -> CompanyId {
    CompanyId::new("ACME-TRADING")
}

fn treasury_book() -> ExposureBook {
    let mut book = ExposureBook::new();

    book.add_exposure(
        Exposure::new(
            acme(),
            "EUR/USD".parse().unwrap(),
            dec!(6_000_000),
            dec!(1.0850),
        )
        .with_budget_rate(dec!(1.0800))
        .with_description("Machinery imports, Q3 payment"),
    );
    book.add_exposure(
        Exposure::new(
            acme(),
            "GBP/USD".parse().unwrap(),
            dec!(2_000_000),
            dec!(1.2850),
        )
        .with_hedge_ratio(dec!(0.30)),
    );
    book.add_exposure(Exposure::new(
        acme(),
        "USD/BRL".parse().unwrap(),
        dec!(400_000),
        dec!(5.1200),
    ));
    book.add_policy(HedgePolicy::new(
        acme(),
        "Balanced",
        dec!(0.85),
        dec!(0.65),
        dec!(0.40),
    ));

    book
}

/// Full pipeline: book → preview → cascade → portfolio simulation →
/// history → hedge analytics.
#[test]
fn full_pipeline_treasury_scenario() {
    let mut book = treasury_book();
    let policy_id = book.policies_for_company(&acme())[0].id();

    // Pin the GBP exposure before the cascade.
    let gbp_id = book
        .exposures()
        .iter()
        .find(|e| e.pair().to_string() == "GBP/USD")
        .unwrap()
        .id();
    PolicyCascadeEngine::set_override(&mut book, gbp_id, dec!(0.30)).unwrap();

    // Preview matches what the cascade then does.
    let preview = PolicyCascadeEngine::preview(&book, policy_id, &acme()).unwrap();
    assert_eq!(preview.will_update, 2);
    assert_eq!(preview.will_skip, 1);

    let result = PolicyCascadeEngine::cascade(&mut book, policy_id, &acme(), "treasurer").unwrap();
    assert_eq!(result.exposures_updated, 2);
    assert_eq!(result.exposures_skipped, 1);
    assert_eq!(
        result.exposures_updated + result.exposures_skipped,
        book.exposures_for_company(&acme()).len()
    );

    // EUR/USD: 6M × 1.0850 ≈ 6.5M notional → top tier.
    // USD/BRL: 400k × 5.12 ≈ 2.05M notional → middle tier.
    // GBP/USD: pinned at 0.30.
    let ratios: Vec<Decimal> = book
        .exposures_for_company(&acme())
        .iter()
        .map(|e| e.hedge_ratio())
        .collect();
    assert!(ratios.contains(&dec!(0.85)));
    assert!(ratios.contains(&dec!(0.65)));
    assert!(ratios.contains(&dec!(0.30)));

    assert_eq!(book.active_policy(&acme()).unwrap().name(), "Balanced");
    assert_eq!(book.audit().recent(&acme(), 10).len(), 1);

    // Simulate the whole company book.
    let exposures: Vec<Exposure> = book
        .exposures_for_company(&acme())
        .into_iter()
        .cloned()
        .collect();
    let portfolio = PortfolioAggregator::aggregate(&exposures, 90, 2_000, Some(42)).unwrap();
    assert_eq!(portfolio.per_exposure.len(), 3);
    assert!(portfolio.metrics.probability_of_loss >= 0.0);
    assert!(portfolio.metrics.probability_of_loss <= 1.0);
    assert!(portfolio.metrics.var_99 <= portfolio.metrics.var_95);

    // Record a run and query it back, newest first.
    let mut history = SimulationHistory::new();
    let first = SimulationResult::run(&exposures[0], 90, 1_000, Some(1)).unwrap();
    let second = SimulationResult::run(&exposures[0], 30, 1_000, Some(2)).unwrap();
    let second_id = second.id();
    history.record(first);
    history.record(second);
    let recent = history.recent(exposures[0].id(), 1);
    assert_eq!(recent[0].id(), second_id);

    // Hedge analytics on the EUR exposure.
    let recommendation = HedgeRecommendationEngine::optimal_hedge_ratio(
        6_000_000.0,
        1.0850,
        0.08,
        90,
        RiskTolerance::Low,
    )
    .unwrap();
    assert_eq!(recommendation.recommended_ratio, 1.0);

    let impact = HedgeRecommendationEngine::pnl_impact_for_exposure(&exposures[0])
        .unwrap()
        .expect("EUR exposure carries a budget rate");
    assert_eq!(impact.contract_rate, dec!(1.0800));

    let maturity = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
    let advice = HedgeRecommendationEngine::recommend_rollover(
        maturity,
        maturity - Duration::days(10),
        dec!(6_000_000),
        MarketOutlook::Bearish,
    );
    assert_eq!(advice.action, RolloverAction::RollOverEarly);
}

/// Cascades for one company never touch another company's rows.
#[test]
fn cascade_is_company_scoped() {
    let mut book = treasury_book();
    let globex = CompanyId::new("GLOBEX");
    book.add_exposure(Exposure::new(
        globex.clone(),
        "EUR/USD".parse().unwrap(),
        dec!(9_000_000),
        dec!(1.0850),
    ));
    book.add_policy(HedgePolicy::new(
        globex.clone(),
        "Globex Default",
        dec!(0.70),
        dec!(0.50),
        dec!(0.30),
    ));

    let acme_policy = book.policies_for_company(&acme())[0].id();
    PolicyCascadeEngine::cascade(&mut book, acme_policy, &acme(), "admin").unwrap();

    // Globex exposures and policies are untouched.
    let globex_exposure = book.exposures_for_company(&globex)[0];
    assert_eq!(globex_exposure.hedge_ratio(), Decimal::ZERO);
    assert!(book.active_policy(&globex).is_none());
    assert!(book.audit().recent(&globex, 10).is_empty());
}

/// Validation faults and reference faults surface as distinct errors.
#[test]
fn error_taxonomy_is_distinct() {
    let mut book = treasury_book();

    let not_found = PolicyCascadeEngine::cascade(&mut book, Uuid::new_v4(), &acme(), "admin");
    assert!(matches!(not_found, Err(CascadeError::PolicyNotFound(_))));

    let exposure_id = book.exposures()[0].id();
    let invalid = PolicyCascadeEngine::set_override(&mut book, exposure_id, dec!(2));
    assert!(matches!(invalid, Err(CascadeError::HedgeRatioOutOfRange(_))));

    let empty = PortfolioAggregator::aggregate(&[], 90, 1_000, None);
    assert!(matches!(empty, Err(SimulationError::NoExposures)));
}

/// Scenario and recommendation agree on the meaning of a full hedge.
#[test]
fn full_hedge_is_consistent_across_engines() {
    let scenario = HedgeRecommendationEngine::scenario_analysis(
        dec!(1_000_000),
        dec!(1.0850),
        Decimal::ONE,
        ScenarioType::Aggressive,
    )
    .unwrap();
    assert!(scenario
        .outcomes
        .iter()
        .all(|o| o.hedged_pnl == Decimal::ZERO));

    let recommendation = HedgeRecommendationEngine::optimal_hedge_ratio(
        1_000_000.0,
        1.0850,
        0.08,
        90,
        RiskTolerance::Low,
    )
    .unwrap();
    let full_row = recommendation
        .comparison
        .iter()
        .find(|row| row.ratio == 1.0)
        .unwrap();
    assert_eq!(full_row.worst_case_pnl, 0.0);
    assert_eq!(full_row.best_case_pnl, 0.0);
}

/// JSON round trip for the book: exposures, policies, audit trail.
#[test]
fn book_json_round_trip() {
    let mut book = treasury_book();
    let policy_id = book.policies_for_company(&acme())[0].id();
    PolicyCascadeEngine::cascade(&mut book, policy_id, &acme(), "admin").unwrap();

    let json = serde_json::to_string_pretty(&book).unwrap();
    let restored: ExposureBook = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.exposures().len(), book.exposures().len());
    assert_eq!(restored.audit().len(), 1);
    assert_eq!(
        restored.active_policy(&acme()).unwrap().name(),
        "Balanced"
    );
    for (a, b) in book.exposures().iter().zip(restored.exposures()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.hedge_ratio(), b.hedge_ratio());
    }
}

/// Simulation output serializes with the fields the API layer expects.
#[test]
fn simulation_result_serializes_for_api() {
    let exposure = Exposure::new(
        acme(),
        "EUR/USD".parse().unwrap(),
        dec!(1_000_000),
        dec!(1.0850),
    );
    let result = SimulationResult::run(&exposure, 90, 1_000, Some(42)).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    for field in [
        "horizon_days",
        "num_scenarios",
        "metrics",
        "rate_percentiles",
        "sampled_pnl",
        "sampled_rates",
    ] {
        assert!(parsed.get(field).is_some(), "missing field {field}");
    }
    assert!(parsed["metrics"].get("var_95").is_some());
    assert!(parsed["metrics"].get("probability_of_loss").is_some());
}
