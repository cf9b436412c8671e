use crate::core::company::CompanyId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Notional-size bucket used by a policy to select a hedge ratio.
///
/// Buckets are expressed in settlement-currency terms (amount converted
/// at the current rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyTier {
    /// Notional of 5,000,000 or more.
    Over5M,
    /// Notional from 1,000,000 up to (but excluding) 5,000,000.
    From1MTo5M,
    /// Notional under 1,000,000.
    Under1M,
}

impl PolicyTier {
    /// Select the tier for a settlement-currency notional.
    pub fn for_notional(notional: Decimal) -> Self {
        if notional >= dec!(5_000_000) {
            PolicyTier::Over5M
        } else if notional >= dec!(1_000_000) {
            PolicyTier::From1MTo5M
        } else {
            PolicyTier::Under1M
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyTier::Over5M => "over_5m",
            PolicyTier::From1MTo5M => "1m_to_5m",
            PolicyTier::Under1M => "under_1m",
        }
    }
}

impl fmt::Display for PolicyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tiered hedging policy owned by one company.
///
/// Maps each notional-size bucket to the hedge ratio a cascade applies.
/// A company may keep several policies on file, but at most one is
/// active at any instant; the cascade engine flips activation
/// atomically.
///
/// # Examples
///
/// ```
/// use fx_risk_engine::core::company::CompanyId;
/// use fx_risk_engine::core::policy::{HedgePolicy, PolicyTier};
/// use rust_decimal_macros::dec;
///
/// let policy = HedgePolicy::new(
///     CompanyId::new("ACME-TRADING"),
///     "Conservative Q3",
///     dec!(0.85),
///     dec!(0.65),
///     dec!(0.40),
/// );
///
/// assert_eq!(policy.ratio_for_tier(PolicyTier::Over5M), dec!(0.85));
/// assert!(!policy.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgePolicy {
    /// Unique identifier for this policy.
    id: Uuid,
    /// The company that owns this policy.
    company_id: CompanyId,
    /// Human-readable policy name.
    name: String,
    /// Hedge ratio for notionals of 5M and above.
    ratio_over_5m: Decimal,
    /// Hedge ratio for notionals between 1M and 5M.
    ratio_1m_to_5m: Decimal,
    /// Hedge ratio for notionals under 1M.
    ratio_under_1m: Decimal,
    /// Whether this policy is the company's active one.
    is_active: bool,
    /// When this policy was created.
    created_at: DateTime<Utc>,
}

impl HedgePolicy {
    /// Create a new (inactive) policy.
    ///
    /// # Panics
    ///
    /// Panics if any tier ratio is outside [0, 1].
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        ratio_over_5m: Decimal,
        ratio_1m_to_5m: Decimal,
        ratio_under_1m: Decimal,
    ) -> Self {
        for ratio in [ratio_over_5m, ratio_1m_to_5m, ratio_under_1m] {
            assert!(
                ratio >= Decimal::ZERO && ratio <= Decimal::ONE,
                "Policy tier ratio must be within [0, 1], got {}",
                ratio
            );
        }
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: name.into(),
            ratio_over_5m,
            ratio_1m_to_5m,
            ratio_under_1m,
            is_active: false,
            created_at: Utc::now(),
        }
    }

    /// Create a policy with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        company_id: CompanyId,
        name: impl Into<String>,
        ratio_over_5m: Decimal,
        ratio_1m_to_5m: Decimal,
        ratio_under_1m: Decimal,
    ) -> Self {
        let mut policy = Self::new(
            company_id,
            name,
            ratio_over_5m,
            ratio_1m_to_5m,
            ratio_under_1m,
        );
        policy.id = id;
        policy
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The hedge ratio this policy assigns to a tier.
    pub fn ratio_for_tier(&self, tier: PolicyTier) -> Decimal {
        match tier {
            PolicyTier::Over5M => self.ratio_over_5m,
            PolicyTier::From1MTo5M => self.ratio_1m_to_5m,
            PolicyTier::Under1M => self.ratio_under_1m,
        }
    }

    /// The hedge ratio this policy assigns to a settlement-currency notional.
    pub fn ratio_for_notional(&self, notional: Decimal) -> Decimal {
        self.ratio_for_tier(PolicyTier::for_notional(notional))
    }

    pub(crate) fn activate(&mut self) {
        self.is_active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policy() -> HedgePolicy {
        HedgePolicy::new(
            CompanyId::new("ACME-TRADING"),
            "Balanced",
            dec!(0.85),
            dec!(0.65),
            dec!(0.40),
        )
    }

    #[test]
    fn test_tier_selection_thresholds() {
        assert_eq!(
            PolicyTier::for_notional(dec!(5_000_000)),
            PolicyTier::Over5M
        );
        assert_eq!(
            PolicyTier::for_notional(dec!(4_999_999.99)),
            PolicyTier::From1MTo5M
        );
        assert_eq!(
            PolicyTier::for_notional(dec!(1_000_000)),
            PolicyTier::From1MTo5M
        );
        assert_eq!(
            PolicyTier::for_notional(dec!(999_999.99)),
            PolicyTier::Under1M
        );
    }

    #[test]
    fn test_ratio_lookup() {
        let policy = sample_policy();
        assert_eq!(policy.ratio_for_notional(dec!(6_000_000)), dec!(0.85));
        assert_eq!(policy.ratio_for_notional(dec!(2_000_000)), dec!(0.65));
        assert_eq!(policy.ratio_for_notional(dec!(250_000)), dec!(0.40));
    }

    #[test]
    #[should_panic(expected = "within [0, 1]")]
    fn test_policy_ratio_out_of_range() {
        HedgePolicy::new(
            CompanyId::new("ACME-TRADING"),
            "Broken",
            dec!(1.85),
            dec!(0.65),
            dec!(0.40),
        );
    }

    #[test]
    fn test_new_policy_is_inactive() {
        assert!(!sample_policy().is_active());
    }

    #[test]
    fn test_tier_names() {
        assert_eq!(PolicyTier::Over5M.as_str(), "over_5m");
        assert_eq!(PolicyTier::From1MTo5M.as_str(), "1m_to_5m");
        assert_eq!(PolicyTier::Under1M.as_str(), "under_1m");
    }
}
