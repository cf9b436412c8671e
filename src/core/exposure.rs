use crate::core::company::CompanyId;
use crate::core::currency::CurrencyPair;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A foreign-currency exposure belonging to one company.
///
/// Represents an expected payment or receipt of `amount` units of the
/// pair's base currency, settling `settlement_days` from booking. The
/// hedge ratio records what fraction of the notional is currently
/// covered by a hedging instrument; the override flag pins that ratio
/// against policy cascades.
///
/// Amounts and rates are exact decimals. Statistical inputs such as
/// volatility are floating point and live next to the simulation code.
///
/// # Examples
///
/// ```
/// use fx_risk_engine::core::company::CompanyId;
/// use fx_risk_engine::core::exposure::Exposure;
/// use rust_decimal_macros::dec;
///
/// let exposure = Exposure::new(
///     CompanyId::new("ACME-TRADING"),
///     "EUR/USD".parse().unwrap(),
///     dec!(1_000_000),
///     dec!(1.0850),
/// );
///
/// assert_eq!(exposure.amount(), dec!(1_000_000));
/// assert!(!exposure.hedge_override());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exposure {
    /// Unique identifier for this exposure.
    id: Uuid,
    /// The company that owns this exposure.
    company_id: CompanyId,
    /// Currency pair, amount denominated in the base leg.
    pair: CurrencyPair,
    /// Notional amount. Must be positive.
    amount: Decimal,
    /// Current market rate for the pair. Must be positive.
    current_rate: Decimal,
    /// Rate locked by a forward contract or budget assumption, if any.
    budget_rate: Option<Decimal>,
    /// Fraction of the notional currently hedged, in [0, 1].
    hedge_ratio: Decimal,
    /// Manual pin: exempt from policy cascades while set.
    hedge_override: bool,
    /// Measured annualized volatility. None means estimate from the pair class.
    volatility: Option<f64>,
    /// Days until settlement.
    settlement_days: u32,
    /// Optional concrete settlement date.
    settlement_date: Option<DateTime<Utc>>,
    /// Optional loss limit in quote-currency terms.
    max_loss_limit: Option<Decimal>,
    /// Optional profit-taking threshold in quote-currency terms.
    target_profit: Option<Decimal>,
    /// Optional reference or memo.
    description: Option<String>,
    /// When this exposure was booked.
    created_at: DateTime<Utc>,
    /// Last mutation (cascade or override change).
    updated_at: DateTime<Utc>,
}

impl Exposure {
    /// Default settlement horizon for newly booked exposures.
    pub const DEFAULT_SETTLEMENT_DAYS: u32 = 14;

    /// Create a new exposure.
    ///
    /// # Panics
    ///
    /// Panics if `amount` or `current_rate` is not positive.
    pub fn new(
        company_id: CompanyId,
        pair: CurrencyPair,
        amount: Decimal,
        current_rate: Decimal,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Exposure amount must be positive, got {}",
            amount
        );
        assert!(
            current_rate > Decimal::ZERO,
            "Exposure rate must be positive, got {}",
            current_rate
        );
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_id,
            pair,
            amount,
            current_rate,
            budget_rate: None,
            hedge_ratio: Decimal::ZERO,
            hedge_override: false,
            volatility: None,
            settlement_days: Self::DEFAULT_SETTLEMENT_DAYS,
            settlement_date: None,
            max_loss_limit: None,
            target_profit: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an exposure with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        company_id: CompanyId,
        pair: CurrencyPair,
        amount: Decimal,
        current_rate: Decimal,
    ) -> Self {
        let mut exposure = Self::new(company_id, pair, amount, current_rate);
        exposure.id = id;
        exposure
    }

    /// Set the budget/contract rate.
    pub fn with_budget_rate(mut self, rate: Decimal) -> Self {
        self.budget_rate = Some(rate);
        self
    }

    /// Set the current hedge ratio.
    ///
    /// # Panics
    ///
    /// Panics if the ratio is outside [0, 1].
    pub fn with_hedge_ratio(mut self, ratio: Decimal) -> Self {
        assert!(
            ratio >= Decimal::ZERO && ratio <= Decimal::ONE,
            "Hedge ratio must be within [0, 1], got {}",
            ratio
        );
        self.hedge_ratio = ratio;
        self
    }

    /// Pin the exposure against policy cascades.
    pub fn with_override(mut self) -> Self {
        self.hedge_override = true;
        self
    }

    /// Set a measured annualized volatility.
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Set the settlement horizon in days.
    pub fn with_settlement_days(mut self, days: u32) -> Self {
        self.settlement_days = days;
        self
    }

    /// Set a concrete settlement date.
    pub fn with_settlement_date(mut self, date: DateTime<Utc>) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Set a maximum-loss limit.
    pub fn with_max_loss_limit(mut self, limit: Decimal) -> Self {
        self.max_loss_limit = Some(limit);
        self
    }

    /// Set a target-profit threshold.
    pub fn with_target_profit(mut self, target: Decimal) -> Self {
        self.target_profit = Some(target);
        self
    }

    /// Set a description or memo.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn current_rate(&self) -> Decimal {
        self.current_rate
    }

    pub fn budget_rate(&self) -> Option<Decimal> {
        self.budget_rate
    }

    pub fn hedge_ratio(&self) -> Decimal {
        self.hedge_ratio
    }

    pub fn hedge_override(&self) -> bool {
        self.hedge_override
    }

    pub fn settlement_days(&self) -> u32 {
        self.settlement_days
    }

    pub fn settlement_date(&self) -> Option<DateTime<Utc>> {
        self.settlement_date
    }

    pub fn max_loss_limit(&self) -> Option<Decimal> {
        self.max_loss_limit
    }

    pub fn target_profit(&self) -> Option<Decimal> {
        self.target_profit
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Notional converted into settlement-currency terms at the current rate.
    ///
    /// This is the figure policy tiers bucket on.
    pub fn notional_in_settlement(&self) -> Decimal {
        self.amount * self.current_rate
    }

    /// Annualized volatility: the measured figure if present, otherwise
    /// the default for the pair's volatility class.
    pub fn resolved_volatility(&self) -> f64 {
        self.volatility
            .unwrap_or_else(|| self.pair.volatility_class().default_volatility())
    }

    /// Notional amount as f64 for the simulation boundary.
    pub fn amount_f64(&self) -> f64 {
        self.amount.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Current rate as f64 for the simulation boundary.
    pub fn current_rate_f64(&self) -> f64 {
        self.current_rate.to_string().parse::<f64>().unwrap_or(0.0)
    }

    // --- Mutators used by the cascade engine ---

    /// Apply a policy-derived hedge ratio. Caller has already checked
    /// the override flag.
    pub(crate) fn apply_policy_ratio(&mut self, ratio: Decimal) {
        self.hedge_ratio = ratio;
        self.updated_at = Utc::now();
    }

    /// Pin the hedge ratio manually, exempting the exposure from cascades.
    pub(crate) fn set_override(&mut self, ratio: Decimal) {
        self.hedge_ratio = ratio;
        self.hedge_override = true;
        self.updated_at = Utc::now();
    }

    /// Release the manual pin; the exposure follows future cascades again.
    pub(crate) fn clear_override(&mut self) {
        self.hedge_override = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_exposure_creation() {
        let exp = sample_exposure();
        assert_eq!(exp.company_id().as_str(), "ACME-TRADING");
        assert_eq!(exp.amount(), dec!(1_000_000));
        assert_eq!(exp.current_rate(), dec!(1.0850));
        assert_eq!(exp.hedge_ratio(), Decimal::ZERO);
        assert!(!exp.hedge_override());
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_exposure_zero_amount() {
        Exposure::new(
            CompanyId::new("ACME-TRADING"),
            "EUR/USD".parse().unwrap(),
            Decimal::ZERO,
            dec!(1.0850),
        );
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_exposure_negative_rate() {
        Exposure::new(
            CompanyId::new("ACME-TRADING"),
            "EUR/USD".parse().unwrap(),
            dec!(1_000_000),
            dec!(-1.0850),
        );
    }

    #[test]
    #[should_panic(expected = "within [0, 1]")]
    fn test_exposure_ratio_out_of_range() {
        sample_exposure().with_hedge_ratio(dec!(1.5));
    }

    #[test]
    fn test_notional_in_settlement() {
        let exp = sample_exposure();
        assert_eq!(exp.notional_in_settlement(), dec!(1_085_000.0000));
    }

    #[test]
    fn test_resolved_volatility_defaults_by_class() {
        let exp = sample_exposure();
        // EUR/USD is a major pair.
        assert!((exp.resolved_volatility() - 0.08).abs() < 1e-12);

        let measured = sample_exposure().with_volatility(0.23);
        assert!((measured.resolved_volatility() - 0.23).abs() < 1e-12);
    }

    #[test]
    fn test_f64_boundary_conversion() {
        let exp = sample_exposure();
        assert!((exp.amount_f64() - 1_000_000.0).abs() < 1e-9);
        assert!((exp.current_rate_f64() - 1.0850).abs() < 1e-12);
    }

    #[test]
    fn test_override_lifecycle() {
        let mut exp = sample_exposure();
        exp.set_override(dec!(0.60));
        assert!(exp.hedge_override());
        assert_eq!(exp.hedge_ratio(), dec!(0.60));

        exp.clear_override();
        assert!(!exp.hedge_override());
        // Ratio stays where the override left it until the next cascade.
        assert_eq!(exp.hedge_ratio(), dec!(0.60));
    }
}
