use crate::core::exposure::Exposure;
use crate::simulation::rate_path::{GbmParams, RatePathSimulator, SimulationError};
use crate::simulation::risk_metrics::{pnl_vector, RatePercentiles, RiskMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many distribution samples a result retains for display.
pub const SAMPLE_LIMIT: usize = 100;

/// Immutable record of one simulation run against one exposure.
///
/// Captures the inputs, the derived risk metrics, and a capped slice
/// of the sampled distributions. Created once per run and never
/// mutated; [`SimulationHistory`] keeps them for recency queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    id: Uuid,
    exposure_id: Uuid,
    created_at: DateTime<Utc>,
    horizon_days: u32,
    num_scenarios: usize,
    volatility: f64,
    current_rate: f64,
    metrics: RiskMetrics,
    rate_percentiles: RatePercentiles,
    sampled_pnl: Vec<f64>,
    sampled_rates: Vec<f64>,
}

impl SimulationResult {
    /// Simulate one exposure and capture the run as an immutable record.
    pub fn run(
        exposure: &Exposure,
        horizon_days: u32,
        num_scenarios: usize,
        seed: Option<u64>,
    ) -> Result<Self, SimulationError> {
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
        if let Some(seed) = seed {
            params = params.with_seed(seed);
        }

        let rates = RatePathSimulator::simulate(&params)?;
        let pnl = pnl_vector(&rates, amount, current_rate);

        Ok(Self {
            id: Uuid::new_v4(),
            exposure_id: exposure.id(),
            created_at: Utc::now(),
            horizon_days,
            num_scenarios,
            volatility: params.volatility,
            current_rate,
            metrics: RiskMetrics::from_pnl(&pnl),
            rate_percentiles: RatePercentiles::from_sample(&rates),
            sampled_pnl: pnl.into_iter().take(SAMPLE_LIMIT).collect(),
            sampled_rates: rates.into_iter().take(SAMPLE_LIMIT).collect(),
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exposure_id(&self) -> Uuid {
        self.exposure_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn num_scenarios(&self) -> usize {
        self.num_scenarios
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn current_rate(&self) -> f64 {
        self.current_rate
    }

    pub fn metrics(&self) -> &RiskMetrics {
        &self.metrics
    }

    pub fn rate_percentiles(&self) -> &RatePercentiles {
        &self.rate_percentiles
    }

    pub fn sampled_pnl(&self) -> &[f64] {
        &self.sampled_pnl
    }

    pub fn sampled_rates(&self) -> &[f64] {
        &self.sampled_rates
    }
}

/// Append-only store of simulation results, queried newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationHistory {
    results: Vec<SimulationResult>,
}

impl SimulationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed run.
    pub fn record(&mut self, result: SimulationResult) {
        self.results.push(result);
    }

    /// The `limit` most recent results for an exposure, newest first.
    pub fn recent(&self, exposure_id: Uuid, limit: usize) -> Vec<&SimulationResult> {
        self.results
            .iter()
            .rev()
            .filter(|r| r.exposure_id == exposure_id)
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::company::CompanyId;
    use rust_decimal_macros::dec;

    fn sample_exposure() -> Exposure {
        Exposure::new(
            CompanyId::new("ACME-TRADING"),
            "EUR/USD".parse().unwrap(),
            dec!(1_000_000),
            dec!(1.0850),
        )
    }

    #[test]
    fn test_run_captures_inputs_and_samples() {
        let exposure = sample_exposure();
        let result = SimulationResult::run(&exposure, 90, 1_000, Some(42)).unwrap();

        assert_eq!(result.exposure_id(), exposure.id());
        assert_eq!(result.horizon_days(), 90);
        assert_eq!(result.num_scenarios(), 1_000);
        assert_eq!(result.sampled_pnl().len(), SAMPLE_LIMIT);
        assert_eq!(result.sampled_rates().len(), SAMPLE_LIMIT);
    }

    #[test]
    fn test_history_newest_first() {
        let exposure = sample_exposure();
        let mut history = SimulationHistory::new();

        let mut ids = Vec::new();
        for seed in 0..5u64 {
            let result = SimulationResult::run(&exposure, 90, 500, Some(seed)).unwrap();
            ids.push(result.id());
            history.record(result);
        }

        let recent = history.recent(exposure.id(), 3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id(), ids[4]);
        assert_eq!(recent[1].id(), ids[3]);
        assert_eq!(recent[2].id(), ids[2]);
    }

    #[test]
    fn test_history_filters_by_exposure() {
        let a = sample_exposure();
        let b = Exposure::new(
            CompanyId::new("ACME-TRADING"),
            "GBP/USD".parse().unwrap(),
            dec!(250_000),
            dec!(1.2850),
        );

        let mut history = SimulationHistory::new();
        history.record(SimulationResult::run(&a, 90, 500, Some(1)).unwrap());
        history.record(SimulationResult::run(&b, 90, 500, Some(2)).unwrap());
        history.record(SimulationResult::run(&a, 30, 500, Some(3)).unwrap());

        let recent = history.recent(a.id(), 10);
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r.exposure_id() == a.id()));
        assert_eq!(recent[0].horizon_days(), 30);
    }

    #[test]
    fn test_result_serializes() {
        let result = SimulationResult::run(&sample_exposure(), 90, 500, Some(42)).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("metrics").is_some());
        assert!(parsed.get("sampled_rates").is_some());
    }
}
