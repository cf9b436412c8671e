use crate::core::currency::CurrencyPair;
use crate::core::exposure::Exposure;
use crate::simulation::history::SAMPLE_LIMIT;
use crate::simulation::rate_path::{GbmParams, RatePathSimulator, SimulationError};
use crate::simulation::risk_metrics::{pnl_vector, RatePercentiles, RiskMetrics};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulation outcome for one exposure inside a portfolio run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureSimulation {
    pub exposure_id: Uuid,
    pub pair: CurrencyPair,
    pub amount: Decimal,
    pub volatility: f64,
    pub metrics: RiskMetrics,
    pub rate_percentiles: RatePercentiles,
    /// Leading slice of the P&L sample for display, capped at 100 values.
    pub sampled_pnl: Vec<f64>,
    /// Leading slice of the terminal-rate sample, capped at 100 values.
    pub sampled_rates: Vec<f64>,
}

/// Aggregate outcome of a portfolio simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub horizon_days: u32,
    pub num_scenarios: usize,
    pub total_notional: Decimal,
    pub per_exposure: Vec<ExposureSimulation>,
    /// Metrics recomputed on the elementwise sum of per-exposure P&L.
    pub metrics: RiskMetrics,
}

/// Runs every exposure through the rate-path simulator and combines
/// the per-exposure P&L vectors into one portfolio distribution.
///
/// Exposures simulate independently and in parallel; each receives its
/// own RNG. A pinned base seed derives a distinct per-exposure seed so
/// reproducible runs stay reproducible without correlating pairs
/// through seed reuse. The same scenario count applies to every
/// exposure so the vectors align for the elementwise sum.
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn aggregate(
        exposures: &[Exposure],
        horizon_days: u32,
        num_scenarios: usize,
        seed: Option<u64>,
    ) -> Result<PortfolioResult, SimulationError> {
        if exposures.is_empty() {
            return Err(SimulationError::NoExposures);
        }

        log::debug!(
            "portfolio simulation: {} exposures, horizon {}d, {} scenarios",
            exposures.len(),
            horizon_days,
            num_scenarios
        );

        let runs: Vec<(ExposureSimulation, Vec<f64>)> = exposures
            .par_iter()
            .enumerate()
            .map(|(index, exposure)| simulate_one(exposure, horizon_days, num_scenarios, seed, index))
            .collect::<Result<_, _>>()?;

        let mut portfolio_pnl = vec![0.0f64; num_scenarios];
        for (_, pnl) in &runs {
            for (total, value) in portfolio_pnl.iter_mut().zip(pnl) {
                *total += value;
            }
        }

        let metrics = RiskMetrics::from_pnl(&portfolio_pnl);
        let total_notional = exposures
            .iter()
            .map(|e| e.notional_in_settlement())
            .sum();

        Ok(PortfolioResult {
            horizon_days,
            num_scenarios,
            total_notional,
            per_exposure: runs.into_iter().map(|(sim, _)| sim).collect(),
            metrics,
        })
    }
}

fn simulate_one(
    exposure: &Exposure,
    horizon_days: u32,
    num_scenarios: usize,
    base_seed: Option<u64>,
    index: usize,
) -> Result<(ExposureSimulation, Vec<f64>), SimulationError> {
    let amount = exposure.amount_f64();
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SimulationError::InvalidAmount(amount));
    }
    let current_rate = exposure.current_rate_f64();

    let mut params = GbmParams::new(
        current_rate,
        exposure.resolved_volatility(),
        horizon_days,
        num_scenarios,
    );
    if let Some(seed) = base_seed {
        params = params.with_seed(seed.wrapping_add(index as u64));
    }

    let rates = RatePathSimulator::simulate(&params)?;
    let pnl = pnl_vector(&rates, amount, current_rate);

    let sim = ExposureSimulation {
        exposure_id: exposure.id(),
        pair: exposure.pair().clone(),
        amount: exposure.amount(),
        volatility: params.volatility,
        metrics: RiskMetrics::from_pnl(&pnl),
        rate_percentiles: RatePercentiles::from_sample(&rates),
        sampled_pnl: pnl.iter().take(SAMPLE_LIMIT).copied().collect(),
        sampled_rates: rates.iter().take(SAMPLE_LIMIT).copied().collect(),
    };

    Ok((sim, pnl))
}
