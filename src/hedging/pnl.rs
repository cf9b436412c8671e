use crate::core::exposure::Exposure;
use crate::hedging::{HedgeRecommendationEngine, HedgingError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How well a hedge offset the underlying rate move.
///
/// A hedge "works" when its P&L runs opposite the unhedged position's;
/// the grade then reflects how much of the move it offset. Same-sign
/// P&L is classified Ineffective regardless of magnitude — a coarse
/// rule, kept deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HedgeEffectiveness {
    HighlyEffective,
    Effective,
    PartiallyEffective,
    Ineffective,
    /// The rate did not move against the contract at all.
    Neutral,
}

impl HedgeEffectiveness {
    pub fn as_str(&self) -> &'static str {
        match self {
            HedgeEffectiveness::HighlyEffective => "Highly Effective",
            HedgeEffectiveness::Effective => "Effective",
            HedgeEffectiveness::PartiallyEffective => "Partially Effective",
            HedgeEffectiveness::Ineffective => "Ineffective",
            HedgeEffectiveness::Neutral => "Neutral",
        }
    }

    fn classify(hedged_pnl: Decimal, unhedged_pnl: Decimal) -> Self {
        if unhedged_pnl == Decimal::ZERO {
            return HedgeEffectiveness::Neutral;
        }
        if hedged_pnl * unhedged_pnl < Decimal::ZERO {
            let offset_pct = (hedged_pnl / unhedged_pnl).abs() * dec!(100);
            if offset_pct >= dec!(90) {
                HedgeEffectiveness::HighlyEffective
            } else if offset_pct >= dec!(70) {
                HedgeEffectiveness::Effective
            } else {
                HedgeEffectiveness::PartiallyEffective
            }
        } else {
            HedgeEffectiveness::Ineffective
        }
    }
}

impl fmt::Display for HedgeEffectiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Realized P&L of an existing hedge position against the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnLImpact {
    pub hedged_amount: Decimal,
    pub unhedged_amount: Decimal,
    pub contract_rate: Decimal,
    pub current_rate: Decimal,
    pub rate_difference: Decimal,
    pub rate_difference_pct: Decimal,
    /// P&L on the hedged portion at the contract rate.
    pub hedged_pnl: Decimal,
    /// Counterfactual: P&L had the whole notional stayed unhedged.
    pub unhedged_pnl: Decimal,
    /// hedged_pnl − unhedged_pnl: what the hedge cost or saved.
    pub opportunity_impact: Decimal,
    pub effectiveness: HedgeEffectiveness,
}

impl HedgeRecommendationEngine {
    /// Measure the realized impact of a hedge locked at `contract_rate`.
    pub fn pnl_impact(
        exposure_amount: Decimal,
        contract_rate: Decimal,
        current_rate: Decimal,
        hedge_ratio: Decimal,
    ) -> Result<PnLImpact, HedgingError> {
        if exposure_amount <= Decimal::ZERO {
            return Err(HedgingError::NonPositiveAmount(exposure_amount));
        }
        if contract_rate <= Decimal::ZERO {
            return Err(HedgingError::NonPositiveRate(contract_rate));
        }
        if current_rate <= Decimal::ZERO {
            return Err(HedgingError::NonPositiveRate(current_rate));
        }
        if hedge_ratio < Decimal::ZERO || hedge_ratio > Decimal::ONE {
            return Err(HedgingError::RatioOutOfRange(hedge_ratio));
        }

        let hedged_amount = (exposure_amount * hedge_ratio).round_dp(2);
        let unhedged_amount = (exposure_amount * (Decimal::ONE - hedge_ratio)).round_dp(2);
        let rate_difference = current_rate - contract_rate;

        let hedged_pnl = (hedged_amount * rate_difference).round_dp(2);
        let unhedged_pnl = (exposure_amount * rate_difference).round_dp(2);

        Ok(PnLImpact {
            hedged_amount,
            unhedged_amount,
            contract_rate,
            current_rate,
            rate_difference: rate_difference.round_dp(6),
            rate_difference_pct: (rate_difference / contract_rate * dec!(100)).round_dp(2),
            hedged_pnl,
            unhedged_pnl,
            opportunity_impact: hedged_pnl - unhedged_pnl,
            effectiveness: HedgeEffectiveness::classify(hedged_pnl, unhedged_pnl),
        })
    }

    /// P&L impact for a booked exposure.
    ///
    /// Returns `Ok(None)` when the exposure carries no usable budget or
    /// contract rate — an explicit "no data" outcome rather than an
    /// arithmetic fault.
    pub fn pnl_impact_for_exposure(
        exposure: &Exposure,
    ) -> Result<Option<PnLImpact>, HedgingError> {
        let contract_rate = match exposure.budget_rate() {
            Some(rate) if rate > Decimal::ZERO => rate,
            _ => return Ok(None),
        };
        Self::pnl_impact(
            exposure.amount(),
            contract_rate,
            exposure.current_rate(),
            exposure.hedge_ratio(),
        )
        .map(Some)
    }
}

impl fmt::Display for PnLImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Hedge P&L Impact ===")?;
        writeln!(f, "Contract Rate:      {}", self.contract_rate)?;
        writeln!(f, "Current Rate:       {}", self.current_rate)?;
        writeln!(
            f,
            "Rate Difference:    {} ({}%)",
            self.rate_difference, self.rate_difference_pct
        )?;
        writeln!(f, "Hedged Amount:      {}", self.hedged_amount)?;
        writeln!(f, "Hedged P&L:         {}", self.hedged_pnl)?;
        writeln!(f, "Unhedged P&L:       {}", self.unhedged_pnl)?;
        writeln!(f, "Opportunity Impact: {}", self.opportunity_impact)?;
        writeln!(f, "Effectiveness:      {}", self.effectiveness)?;
        Ok(())
    }
}
