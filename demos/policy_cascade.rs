//! Policy cascade walkthrough.
//!
//! Builds a small exposure book, previews and applies a tiered policy,
//! and prints the audit trail it leaves behind.

use fx_risk_engine::cascade::book::ExposureBook;
use fx_risk_engine::cascade::engine::PolicyCascadeEngine;
use fx_risk_engine::core::company::CompanyId;
use fx_risk_engine::core::exposure::Exposure;
use fx_risk_engine::core::policy::HedgePolicy;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-risk-engine: Policy Cascade Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let acme = CompanyId::new("ACME-TRADING");
    let mut book = ExposureBook::new();

    // A web of exposures across size tiers.
    book.add_exposure(
        Exposure::new(
            acme.clone(),
            "EUR/USD".parse().unwrap(),
            dec!(6_000_000),
            dec!(1.0850),
        )
        .with_description("Machinery imports"),
    );
    book.add_exposure(Exposure::new(
        acme.clone(),
        "GBP/USD".parse().unwrap(),
        dec!(2_000_000),
        dec!(1.2850),
    ));
    book.add_exposure(Exposure::new(
        acme.clone(),
        "USD/BRL".parse().unwrap(),
        dec!(150_000),
        dec!(5.1200),
    ));

    // The treasurer pinned the GBP exposure by hand.
    let gbp_id = book.exposures()[1].id();
    PolicyCascadeEngine::set_override(&mut book, gbp_id, dec!(0.30)).unwrap();

    let policy = HedgePolicy::new(acme.clone(), "Balanced Q3", dec!(0.85), dec!(0.65), dec!(0.40));
    let policy_id = policy.id();
    book.add_policy(policy);

    // --- Preview first ---
    println!("━━━ Preview ━━━\n");
    let preview = PolicyCascadeEngine::preview(&book, policy_id, &acme).unwrap();
    println!(
        "Policy '{}' would update {} exposures, skipping {} manual overrides.\n",
        preview.policy_name, preview.will_update, preview.will_skip
    );

    // --- Apply ---
    println!("━━━ Cascade ━━━\n");
    let result = PolicyCascadeEngine::cascade(&mut book, policy_id, &acme, "treasurer").unwrap();
    println!("{}", result);

    println!("Resulting hedge ratios:");
    for exposure in book.exposures_for_company(&acme) {
        println!(
            "  {:<8} {:>12}  ratio {:>5}  {}",
            exposure.pair().to_string(),
            exposure.amount().to_string(),
            exposure.hedge_ratio().to_string(),
            if exposure.hedge_override() {
                "(pinned)"
            } else {
                ""
            }
        );
    }

    // --- Audit trail ---
    println!("\n━━━ Audit Trail ━━━\n");
    for entry in book.audit().recent(&acme, 10) {
        println!(
            "[{}] {} by {} — {}",
            entry.timestamp().format("%Y-%m-%d %H:%M:%S"),
            entry.policy_name(),
            entry.actor(),
            entry.notes()
        );
    }

    // --- Book summary ---
    let summary = book.summary(&acme);
    println!("\n━━━ Book Summary ━━━\n");
    println!("Exposures:        {}", summary.exposure_count);
    println!("Gross notional:   {}", summary.total_notional.round_dp(2));
    println!("Hedged notional:  {}", summary.hedged_notional.round_dp(2));
    println!("Manual overrides: {}", summary.override_count);
}
