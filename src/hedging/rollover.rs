use crate::hedging::HedgeRecommendationEngine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directional view on the pair over the remaining hedge life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketOutlook {
    Bullish,
    Neutral,
    Bearish,
}

impl MarketOutlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOutlook::Bullish => "bullish",
            MarketOutlook::Neutral => "neutral",
            MarketOutlook::Bearish => "bearish",
        }
    }
}

impl fmt::Display for MarketOutlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarketOutlook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullish" => Ok(MarketOutlook::Bullish),
            "neutral" => Ok(MarketOutlook::Neutral),
            "bearish" => Ok(MarketOutlook::Bearish),
            other => Err(format!("unknown market outlook '{other}'")),
        }
    }
}

/// Recommended course of action for an expiring hedge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RolloverAction {
    Monitor,
    RollOverEarly,
    LetMature,
    PrepareToRoll,
    TakeActionNow,
}

impl RolloverAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RolloverAction::Monitor => "Monitor",
            RolloverAction::RollOverEarly => "Roll Over Early",
            RolloverAction::LetMature => "Let Mature",
            RolloverAction::PrepareToRoll => "Prepare to Roll",
            RolloverAction::TakeActionNow => "Take Action Now",
        }
    }
}

impl fmt::Display for RolloverAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How soon the desk needs to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Advice on whether and when to roll an expiring hedge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverAdvice {
    pub days_to_maturity: i64,
    pub maturity_date: DateTime<Utc>,
    pub action: RolloverAction,
    /// What to actually do, in desk language.
    pub guidance: String,
    pub market_outlook: MarketOutlook,
    pub urgency: Urgency,
}

impl HedgeRecommendationEngine {
    /// Advise on rolling a hedge that matures at `maturity_date`.
    ///
    /// `as_of` is passed explicitly so the engine stays clock-free;
    /// callers supply `Utc::now()` in production and a fixed instant in
    /// tests. More than 30 days out there is nothing to do but watch;
    /// inside a week the decision reduces to whether any exposure is
    /// still open.
    pub fn recommend_rollover(
        maturity_date: DateTime<Utc>,
        as_of: DateTime<Utc>,
        current_exposure: Decimal,
        market_outlook: MarketOutlook,
    ) -> RolloverAdvice {
        let days_to_maturity = (maturity_date - as_of).num_days();

        let (action, guidance) = if days_to_maturity > 30 {
            (
                RolloverAction::Monitor,
                "Review 30 days before maturity".to_string(),
            )
        } else if days_to_maturity > 7 {
            match market_outlook {
                MarketOutlook::Bearish => (
                    RolloverAction::RollOverEarly,
                    "Lock in current rates before further deterioration".to_string(),
                ),
                MarketOutlook::Bullish => (
                    RolloverAction::LetMature,
                    "Wait for potential rate improvement".to_string(),
                ),
                MarketOutlook::Neutral => (
                    RolloverAction::PrepareToRoll,
                    "Assess market conditions and decide next week".to_string(),
                ),
            }
        } else if current_exposure > Decimal::ZERO {
            (
                RolloverAction::TakeActionNow,
                "Roll over to maintain hedge protection".to_string(),
            )
        } else {
            (
                RolloverAction::TakeActionNow,
                "Allow to mature if exposure has reduced".to_string(),
            )
        };

        let urgency = if days_to_maturity <= 7 {
            Urgency::High
        } else if days_to_maturity <= 30 {
            Urgency::Medium
        } else {
            Urgency::Low
        };

        RolloverAdvice {
            days_to_maturity,
            maturity_date,
            action,
            guidance,
            market_outlook,
            urgency,
        }
    }
}
