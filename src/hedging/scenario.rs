use crate::hedging::{HedgeRecommendationEngine, HedgingError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named set of deterministic rate shifts to walk an exposure through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioType {
    Conservative,
    Moderate,
    Aggressive,
}

impl ScenarioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioType::Conservative => "conservative",
            ScenarioType::Moderate => "moderate",
            ScenarioType::Aggressive => "aggressive",
        }
    }

    /// The fractional rate shifts this scenario set applies, adverse first.
    pub fn rate_shifts(&self) -> Vec<Decimal> {
        match self {
            ScenarioType::Conservative => {
                vec![dec!(-0.05), dec!(-0.03), dec!(0), dec!(0.03), dec!(0.05)]
            }
            ScenarioType::Moderate => {
                vec![dec!(-0.10), dec!(-0.05), dec!(0), dec!(0.05), dec!(0.10)]
            }
            ScenarioType::Aggressive => vec![
                dec!(-0.15),
                dec!(-0.10),
                dec!(-0.05),
                dec!(0),
                dec!(0.05),
                dec!(0.10),
                dec!(0.15),
            ],
        }
    }
}

impl fmt::Display for ScenarioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => Ok(ScenarioType::Conservative),
            "moderate" => Ok(ScenarioType::Moderate),
            "aggressive" => Ok(ScenarioType::Aggressive),
            other => Err(format!("unknown scenario type '{other}'")),
        }
    }
}

/// Severity label for one rate shift, keyed by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftSeverity {
    SevereAdverse,
    ModerateAdverse,
    MildAdverse,
    NoChange,
    MildFavorable,
    ModerateFavorable,
    SevereFavorable,
}

impl ShiftSeverity {
    pub fn classify(shift: Decimal) -> Self {
        if shift <= dec!(-0.10) {
            ShiftSeverity::SevereAdverse
        } else if shift <= dec!(-0.05) {
            ShiftSeverity::ModerateAdverse
        } else if shift < Decimal::ZERO {
            ShiftSeverity::MildAdverse
        } else if shift == Decimal::ZERO {
            ShiftSeverity::NoChange
        } else if shift <= dec!(0.05) {
            ShiftSeverity::MildFavorable
        } else if shift <= dec!(0.10) {
            ShiftSeverity::ModerateFavorable
        } else {
            ShiftSeverity::SevereFavorable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftSeverity::SevereAdverse => "Severe Adverse",
            ShiftSeverity::ModerateAdverse => "Moderate Adverse",
            ShiftSeverity::MildAdverse => "Mild Adverse",
            ShiftSeverity::NoChange => "No Change",
            ShiftSeverity::MildFavorable => "Mild Favorable",
            ShiftSeverity::ModerateFavorable => "Moderate Favorable",
            ShiftSeverity::SevereFavorable => "Severe Favorable",
        }
    }
}

impl fmt::Display for ShiftSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// P&L outcome of a single rate shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateShiftOutcome {
    /// Fractional shift applied, e.g. -0.05 for a 5% drop.
    pub rate_shift: Decimal,
    /// Shift expressed in percent for display.
    pub rate_shift_pct: Decimal,
    pub new_rate: Decimal,
    pub unhedged_pnl: Decimal,
    pub hedged_pnl: Decimal,
    /// How much the hedge improved on the unhedged outcome.
    pub hedge_benefit: Decimal,
    pub severity: ShiftSeverity,
}

/// Summary statistics over all shifts in one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub worst_case_hedged: Decimal,
    pub best_case_hedged: Decimal,
    pub worst_case_unhedged: Decimal,
    pub best_case_unhedged: Decimal,
    pub average_hedged: Decimal,
    pub average_unhedged: Decimal,
    pub scenario_count: usize,
}

/// Result of walking one exposure through a scenario set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_type: ScenarioType,
    pub exposure_amount: Decimal,
    pub current_rate: Decimal,
    pub hedge_ratio: Decimal,
    pub outcomes: Vec<RateShiftOutcome>,
    pub summary: ScenarioSummary,
}

impl HedgeRecommendationEngine {
    /// Walk an exposure through a named set of deterministic rate shifts.
    ///
    /// The hedged notional is treated as fully locked at the current
    /// rate: only the open portion contributes P&L. A full hedge
    /// therefore produces zero P&L for every shift, and a zero hedge
    /// reproduces the unhedged outcome exactly.
    pub fn scenario_analysis(
        exposure_amount: Decimal,
        current_rate: Decimal,
        hedge_ratio: Decimal,
        scenario_type: ScenarioType,
    ) -> Result<ScenarioResult, HedgingError> {
        if exposure_amount <= Decimal::ZERO {
            return Err(HedgingError::NonPositiveAmount(exposure_amount));
        }
        if current_rate <= Decimal::ZERO {
            return Err(HedgingError::NonPositiveRate(current_rate));
        }
        if hedge_ratio < Decimal::ZERO || hedge_ratio > Decimal::ONE {
            return Err(HedgingError::RatioOutOfRange(hedge_ratio));
        }

        let open_fraction = Decimal::ONE - hedge_ratio;
        let outcomes: Vec<RateShiftOutcome> = scenario_type
            .rate_shifts()
            .into_iter()
            .map(|shift| {
                let new_rate = (current_rate * (Decimal::ONE + shift)).round_dp(6);
                let rate_delta = new_rate - current_rate;
                let unhedged_pnl = (exposure_amount * rate_delta).round_dp(2);
                let hedged_pnl = (exposure_amount * open_fraction * rate_delta).round_dp(2);
                RateShiftOutcome {
                    rate_shift: shift,
                    rate_shift_pct: shift * dec!(100),
                    new_rate,
                    unhedged_pnl,
                    hedged_pnl,
                    hedge_benefit: unhedged_pnl - hedged_pnl,
                    severity: ShiftSeverity::classify(shift),
                }
            })
            .collect();

        let summary = summarize(&outcomes);

        Ok(ScenarioResult {
            scenario_type,
            exposure_amount,
            current_rate,
            hedge_ratio,
            outcomes,
            summary,
        })
    }
}

fn summarize(outcomes: &[RateShiftOutcome]) -> ScenarioSummary {
    let count = Decimal::from(outcomes.len());
    let hedged: Vec<Decimal> = outcomes.iter().map(|o| o.hedged_pnl).collect();
    let unhedged: Vec<Decimal> = outcomes.iter().map(|o| o.unhedged_pnl).collect();

    ScenarioSummary {
        worst_case_hedged: hedged.iter().copied().min().unwrap_or_default(),
        best_case_hedged: hedged.iter().copied().max().unwrap_or_default(),
        worst_case_unhedged: unhedged.iter().copied().min().unwrap_or_default(),
        best_case_unhedged: unhedged.iter().copied().max().unwrap_or_default(),
        average_hedged: (hedged.iter().sum::<Decimal>() / count).round_dp(2),
        average_unhedged: (unhedged.iter().sum::<Decimal>() / count).round_dp(2),
        scenario_count: outcomes.len(),
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Scenario Analysis ({}) ===", self.scenario_type)?;
        writeln!(f, "Exposure:    {}", self.exposure_amount)?;
        writeln!(f, "Hedge Ratio: {}", self.hedge_ratio)?;
        for o in &self.outcomes {
            writeln!(
                f,
                "  {:>18} {:>6}%  rate {:<10} unhedged {:>14}  hedged {:>14}  benefit {:>14}",
                o.severity.as_str(),
                o.rate_shift_pct,
                o.new_rate,
                o.unhedged_pnl,
                o.hedged_pnl,
                o.hedge_benefit
            )?;
        }
        writeln!(
            f,
            "Worst (hedged/unhedged): {} / {}",
            self.summary.worst_case_hedged, self.summary.worst_case_unhedged
        )?;
        writeln!(
            f,
            "Best  (hedged/unhedged): {} / {}",
            self.summary.best_case_hedged, self.summary.best_case_unhedged
        )?;
        Ok(())
    }
}
