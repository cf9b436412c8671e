use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fx_risk_engine::core::company::CompanyId;
use fx_risk_engine::core::exposure::Exposure;
use fx_risk_engine::simulation::portfolio::PortfolioAggregator;
use fx_risk_engine::simulation::rate_path::{GbmParams, RatePathSimulator};
use fx_risk_engine::simulation::risk_metrics::{pnl_vector, RiskMetrics};
use rust_decimal::Decimal;

fn bench_simulate_10k(c: &mut Criterion) {
    let params = GbmParams::new(1.0850, 0.08, 90, 10_000).with_seed(42);

    c.bench_function("simulate_10k_scenarios", |b| {
        b.iter(|| RatePathSimulator::simulate(black_box(&params)))
    });
}

fn bench_simulate_100k(c: &mut Criterion) {
    let params = GbmParams::new(1.0850, 0.08, 90, 100_000).with_seed(42);

    c.bench_function("simulate_100k_scenarios", |b| {
        b.iter(|| RatePathSimulator::simulate(black_box(&params)))
    });
}

fn bench_risk_metrics_100k(c: &mut Criterion) {
    let params = GbmParams::new(1.0850, 0.08, 90, 100_000).with_seed(42);
    let rates = RatePathSimulator::simulate(&params).unwrap();
    let pnl = pnl_vector(&rates, 1_000_000.0, 1.0850);

    c.bench_function("risk_metrics_100k", |b| {
        b.iter(|| RiskMetrics::from_pnl(black_box(&pnl)))
    });
}

fn bench_portfolio_20_exposures(c: &mut Criterion) {
    let company = CompanyId::new("BENCH-CO");
    let exposures: Vec<Exposure> = (0..20)
        .map(|i| {
            Exposure::new(
                company.clone(),
                "EUR/USD".parse().unwrap(),
                Decimal::from(100_000 * (i + 1) as i64),
                Decimal::ONE,
            )
        })
        .collect();

    c.bench_function("portfolio_20_exposures_10k", |b| {
        b.iter(|| PortfolioAggregator::aggregate(black_box(&exposures), 90, 10_000, Some(42)))
    });
}

criterion_group!(
    benches,
    bench_simulate_10k,
    bench_simulate_100k,
    bench_risk_metrics_100k,
    bench_portfolio_20_exposures
);
criterion_main!(benches);
