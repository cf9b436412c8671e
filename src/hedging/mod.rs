//! Hedge recommendation, scenario analysis, P&L impact, and rollover advice.

pub mod pnl;
pub mod recommendation;
pub mod rollover;
pub mod scenario;

use rust_decimal::Decimal;
use thiserror::Error;

/// Closed-form and scenario analytics around hedge positioning.
///
/// Every operation is a pure function of its inputs: amounts, rates,
/// volatilities, and a clock value where one is needed. Nothing here
/// touches the simulator's random source.
pub struct HedgeRecommendationEngine;

/// Errors arising from hedge analytics input validation.
///
/// Like the simulator's, these are caller errors: retries with the
/// same inputs cannot succeed.
#[derive(Debug, Error)]
pub enum HedgingError {
    #[error("exposure amount must be positive and finite, got {0}")]
    InvalidAmount(f64),
    #[error("rate must be positive and finite, got {0}")]
    InvalidRate(f64),
    #[error("volatility must be within (0, 1], got {0}")]
    InvalidVolatility(f64),
    #[error("horizon must be between 1 and 365 days, got {0}")]
    InvalidHorizon(u32),
    #[error("exposure amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("rate must be positive, got {0}")]
    NonPositiveRate(Decimal),
    #[error("hedge ratio must be within [0, 1], got {0}")]
    RatioOutOfRange(Decimal),
}
