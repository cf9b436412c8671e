//! Hedge advisory walkthrough.
//!
//! Demonstrates the recommendation, scenario, P&L, and rollover
//! analytics on a single EUR/USD exposure.

use chrono::{Duration, Utc};
use fx_risk_engine::hedging::recommendation::RiskTolerance;
use fx_risk_engine::hedging::rollover::MarketOutlook;
use fx_risk_engine::hedging::scenario::ScenarioType;
use fx_risk_engine::hedging::HedgeRecommendationEngine;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-risk-engine: Hedge Advisor Example   ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: What ratio should we hedge at? ---
    println!("━━━ Scenario 1: Hedge Recommendation ━━━\n");

    let recommendation = HedgeRecommendationEngine::optimal_hedge_ratio(
        1_000_000.0, // $1M exposure
        1.0850,      // EUR/USD spot
        0.08,        // 8% annualized volatility
        90,          // 90 days to payment
        RiskTolerance::Moderate,
    )
    .unwrap();

    println!("{}", recommendation);

    // --- Scenario 2: How does a 50% hedge behave under rate shocks? ---
    println!("\n━━━ Scenario 2: Rate-Shift Analysis ━━━\n");

    let scenarios = HedgeRecommendationEngine::scenario_analysis(
        dec!(1_000_000),
        dec!(1.0850),
        dec!(0.50),
        ScenarioType::Moderate,
    )
    .unwrap();

    println!("{}", scenarios);

    // --- Scenario 3: How did the existing hedge perform? ---
    println!("\n━━━ Scenario 3: Realized P&L Impact ━━━\n");

    let impact = HedgeRecommendationEngine::pnl_impact(
        dec!(1_000_000),
        dec!(1.0800), // forward rate locked in
        dec!(1.0950), // current market rate
        dec!(0.75),   // 75% hedged
    )
    .unwrap();

    println!("{}", impact);

    // --- Scenario 4: Should we roll the expiring hedge? ---
    println!("\n━━━ Scenario 4: Rollover Advice ━━━\n");

    let now = Utc::now();
    let advice = HedgeRecommendationEngine::recommend_rollover(
        now + Duration::days(12),
        now,
        dec!(1_000_000),
        MarketOutlook::Bearish,
    );

    println!("Days to maturity: {}", advice.days_to_maturity);
    println!("Action:           {}", advice.action);
    println!("Guidance:         {}", advice.guidance);
    println!("Urgency:          {:?}", advice.urgency);
}
