use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk metrics derived from a simulated profit-and-loss sample.
///
/// Losses are signed: `var_95` is the 5th percentile of the P&L
/// distribution and is negative whenever the distribution has a
/// meaningful downside. For any sample, `var_99 <= var_95`.
///
/// `expected_loss` is the mean of all loss-making scenarios, not the
/// conditional mean beyond the VaR95 threshold; the two coincide only
/// when the probability of loss is near 5%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 5th percentile of the P&L distribution.
    pub var_95: f64,
    /// 1st percentile of the P&L distribution.
    pub var_99: f64,
    /// Mean P&L across all scenarios.
    pub expected_pnl: f64,
    /// Mean of the negative-P&L scenarios; zero when no scenario loses.
    pub expected_loss: f64,
    /// Worst scenario P&L.
    pub max_loss: f64,
    /// Best scenario P&L.
    pub max_gain: f64,
    /// Fraction of scenarios with negative P&L.
    pub probability_of_loss: f64,
}

impl RiskMetrics {
    /// Compute metrics from a P&L sample.
    ///
    /// A degenerate sample (empty, or all-zero as with vanishing
    /// volatility) yields zero VaR and zero probability of loss rather
    /// than an arithmetic fault.
    pub fn from_pnl(pnl: &[f64]) -> Self {
        if pnl.is_empty() {
            return Self::zeroed();
        }

        let n = pnl.len() as f64;
        let expected_pnl = pnl.iter().sum::<f64>() / n;

        let mut loss_sum = 0.0;
        let mut loss_count = 0usize;
        let mut max_loss = f64::INFINITY;
        let mut max_gain = f64::NEG_INFINITY;
        for &value in pnl {
            if value < 0.0 {
                loss_sum += value;
                loss_count += 1;
            }
            max_loss = max_loss.min(value);
            max_gain = max_gain.max(value);
        }

        let mut sorted = pnl.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            var_95: percentile(&sorted, 5.0),
            var_99: percentile(&sorted, 1.0),
            expected_pnl,
            expected_loss: if loss_count > 0 {
                loss_sum / loss_count as f64
            } else {
                0.0
            },
            max_loss,
            max_gain,
            probability_of_loss: loss_count as f64 / n,
        }
    }

    fn zeroed() -> Self {
        Self {
            var_95: 0.0,
            var_99: 0.0,
            expected_pnl: 0.0,
            expected_loss: 0.0,
            max_loss: 0.0,
            max_gain: 0.0,
            probability_of_loss: 0.0,
        }
    }
}

impl fmt::Display for RiskMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Risk Metrics ===")?;
        writeln!(f, "VaR 95%:          {:.2}", self.var_95)?;
        writeln!(f, "VaR 99%:          {:.2}", self.var_99)?;
        writeln!(f, "Expected P&L:     {:.2}", self.expected_pnl)?;
        writeln!(f, "Expected Loss:    {:.2}", self.expected_loss)?;
        writeln!(f, "Max Loss:         {:.2}", self.max_loss)?;
        writeln!(f, "Max Gain:         {:.2}", self.max_gain)?;
        writeln!(
            f,
            "P(Loss):          {:.1}%",
            self.probability_of_loss * 100.0
        )?;
        Ok(())
    }
}

/// Terminal-rate distribution percentiles for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePercentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl RatePercentiles {
    /// Compute the 5/25/50/75/95 percentiles of a rate sample.
    pub fn from_sample(rates: &[f64]) -> Self {
        let mut sorted = rates.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            p5: percentile(&sorted, 5.0),
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

/// Per-scenario P&L: amount × (terminal − current).
pub fn pnl_vector(terminal_rates: &[f64], amount: f64, current_rate: f64) -> Vec<f64> {
    terminal_rates
        .iter()
        .map(|rate| amount * (rate - current_rate))
        .collect()
}

/// Linear-interpolation percentile of an already-sorted sample.
///
/// Matches the numpy default: rank = p/100 × (n − 1), interpolated
/// between the neighboring order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
