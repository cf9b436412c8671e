use crate::hedging::{HedgeRecommendationEngine, HedgingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// z-score for a one-sided 95% confidence level.
const Z_95: f64 = 1.645;
/// z-score for a one-sided 99% confidence level.
const Z_99: f64 = 2.326;

/// The hedge ratios every recommendation compares side by side.
pub const CANONICAL_RATIOS: [f64; 4] = [0.25, 0.50, 0.75, 1.00];

/// How much downside the company is willing to carry unhedged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Moderate,
    High,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::High => "high",
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTolerance::Low),
            "moderate" => Ok(RiskTolerance::Moderate),
            "high" => Ok(RiskTolerance::High),
            other => Err(format!("unknown risk tolerance '{other}'")),
        }
    }
}

/// Outcome profile of one candidate hedge ratio under a ±adjusted-vol shock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeRatioAnalysis {
    pub ratio: f64,
    pub hedged_amount: f64,
    pub unhedged_amount: f64,
    /// P&L if the rate moves one adjusted-volatility against the position.
    pub worst_case_pnl: f64,
    /// P&L if the rate moves one adjusted-volatility in the position's favor.
    pub best_case_pnl: f64,
    pub expected_pnl: f64,
    pub downside_protection_pct: f64,
}

/// A hedge-ratio recommendation with its supporting comparison table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeRecommendation {
    /// Recommended hedge ratio, rounded to two decimals.
    pub recommended_ratio: f64,
    /// Confidence level the recommendation targets (99 / 95 / 90).
    pub confidence_level: u8,
    /// Rate-space VaR at 95%: rate × adjusted volatility × 1.645.
    pub var_95: f64,
    /// Rate-space VaR at 99%: rate × adjusted volatility × 2.326.
    pub var_99: f64,
    /// Volatility scaled to the horizon: σ × √(days/365).
    pub adjusted_volatility: f64,
    pub horizon_days: u32,
    pub risk_tolerance: RiskTolerance,
    /// One row per canonical ratio.
    pub comparison: Vec<HedgeRatioAnalysis>,
    pub rationale: String,
}

impl HedgeRecommendationEngine {
    /// Recommend a hedge ratio for an open exposure.
    ///
    /// Low tolerance always takes the full hedge. Moderate hedges up to
    /// the 95% rate-space VaR, capped at 0.75 — the VaR figure is used
    /// directly as a fraction, which keeps the recommendation
    /// conservative for low-volatility pairs. High tolerance carries
    /// half the notional open.
    pub fn optimal_hedge_ratio(
        exposure_amount: f64,
        current_rate: f64,
        historical_volatility: f64,
        horizon_days: u32,
        risk_tolerance: RiskTolerance,
    ) -> Result<HedgeRecommendation, HedgingError> {
        if !exposure_amount.is_finite() || exposure_amount <= 0.0 {
            return Err(HedgingError::InvalidAmount(exposure_amount));
        }
        if !current_rate.is_finite() || current_rate <= 0.0 {
            return Err(HedgingError::InvalidRate(current_rate));
        }
        if !historical_volatility.is_finite()
            || historical_volatility <= 0.0
            || historical_volatility > 1.0
        {
            return Err(HedgingError::InvalidVolatility(historical_volatility));
        }
        if !(1..=365).contains(&horizon_days) {
            return Err(HedgingError::InvalidHorizon(horizon_days));
        }

        let adjusted_volatility =
            historical_volatility * (f64::from(horizon_days) / 365.0).sqrt();
        let var_95 = current_rate * adjusted_volatility * Z_95;
        let var_99 = current_rate * adjusted_volatility * Z_99;

        let (raw_ratio, confidence_level) = match risk_tolerance {
            RiskTolerance::Low => (1.0, 99),
            RiskTolerance::Moderate => (var_95.min(0.75), 95),
            RiskTolerance::High => (0.5, 90),
        };
        let recommended_ratio = round2(raw_ratio);

        let comparison = CANONICAL_RATIOS
            .iter()
            .map(|&ratio| analyze_ratio(ratio, exposure_amount, current_rate, adjusted_volatility))
            .collect();

        Ok(HedgeRecommendation {
            recommended_ratio,
            confidence_level,
            var_95,
            var_99,
            adjusted_volatility,
            horizon_days,
            risk_tolerance,
            comparison,
            rationale: rationale(recommended_ratio, risk_tolerance, adjusted_volatility),
        })
    }
}

impl fmt::Display for HedgeRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Hedge Recommendation ===")?;
        writeln!(
            f,
            "Recommended Ratio: {:.0}%",
            self.recommended_ratio * 100.0
        )?;
        writeln!(f, "Confidence Level:  {}%", self.confidence_level)?;
        writeln!(f, "Adjusted Vol:      {:.4}", self.adjusted_volatility)?;
        writeln!(f, "VaR 95% (rate):    {:.6}", self.var_95)?;
        writeln!(f, "VaR 99% (rate):    {:.6}", self.var_99)?;
        writeln!(f, "\n{}", self.rationale)?;
        writeln!(f, "\nRatio comparison:")?;
        for row in &self.comparison {
            writeln!(
                f,
                "  {:>4.0}%  hedged {:>14.2}  worst {:>14.2}  best {:>14.2}",
                row.ratio * 100.0,
                row.hedged_amount,
                row.worst_case_pnl,
                row.best_case_pnl
            )?;
        }
        Ok(())
    }
}

fn analyze_ratio(
    ratio: f64,
    exposure_amount: f64,
    current_rate: f64,
    adjusted_volatility: f64,
) -> HedgeRatioAnalysis {
    let hedged_amount = exposure_amount * ratio;
    let unhedged_amount = exposure_amount * (1.0 - ratio);

    // The hedged portion is locked: only the open portion swings.
    let worst_case_pnl = unhedged_amount * current_rate * -adjusted_volatility;
    let best_case_pnl = unhedged_amount * current_rate * adjusted_volatility;

    HedgeRatioAnalysis {
        ratio,
        hedged_amount,
        unhedged_amount,
        worst_case_pnl,
        best_case_pnl,
        expected_pnl: (worst_case_pnl + best_case_pnl) / 2.0,
        downside_protection_pct: ratio * 100.0,
    }
}

fn rationale(ratio: f64, tolerance: RiskTolerance, adjusted_volatility: f64) -> String {
    let ratio_pct = (ratio * 100.0).round() as i64;
    let vol_pct = (adjusted_volatility * 100.0).round() as i64;

    if ratio >= 0.9 {
        format!(
            "Full hedge ({ratio_pct}%) recommended due to {tolerance} risk tolerance \
             and {vol_pct}% expected volatility. This provides maximum protection \
             against adverse rate movements."
        )
    } else if ratio >= 0.65 {
        format!(
            "Substantial hedge ({ratio_pct}%) recommended to balance protection with \
             flexibility. With {vol_pct}% volatility, this covers most downside risk \
             while allowing some upside participation."
        )
    } else if ratio >= 0.4 {
        format!(
            "Moderate hedge ({ratio_pct}%) recommended for a balanced approach. \
             Provides partial protection against the {vol_pct}% expected volatility \
             while maintaining upside potential."
        )
    } else {
        format!(
            "Minimal hedge ({ratio_pct}%) recommended due to {tolerance} risk \
             tolerance and willingness to accept volatility exposure for potential gains."
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
