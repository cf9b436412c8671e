use crate::cascade::audit::AuditLogEntry;
use crate::cascade::book::ExposureBook;
use crate::core::company::CompanyId;
use crate::core::policy::PolicyTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from cascade and override operations.
///
/// Reference faults (`PolicyNotFound`, `ExposureNotFound`) are distinct
/// from validation faults (`HedgeRatioOutOfRange`): the former name a
/// missing row, the latter a bad input.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("policy {0} not found for this company")]
    PolicyNotFound(Uuid),
    #[error("exposure {0} not found")]
    ExposureNotFound(Uuid),
    #[error("hedge ratio must be within [0, 1], got {0}")]
    HedgeRatioOutOfRange(Decimal),
}

/// Dry-run counts for a prospective cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadePreview {
    pub policy_name: String,
    pub will_update: usize,
    pub will_skip: usize,
}

/// Outcome of an applied cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeResult {
    pub policy_id: Uuid,
    pub policy_name: String,
    pub exposures_updated: usize,
    pub exposures_skipped: usize,
    /// The audit entry this cascade appended.
    pub audit_id: Uuid,
}

impl fmt::Display for CascadeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Policy Cascade ===")?;
        writeln!(f, "Policy:    {}", self.policy_name)?;
        writeln!(f, "Updated:   {}", self.exposures_updated)?;
        writeln!(f, "Skipped:   {}", self.exposures_skipped)?;
        Ok(())
    }
}

/// Applies a company's tiered hedging policy across its exposure set.
///
/// A cascade runs in two phases. The stage phase resolves the policy,
/// buckets every non-overridden exposure by settlement-currency
/// notional, and collects the ratio each will receive; any failure
/// surfaces here, before the book is touched. The commit phase applies
/// the staged ratios, flips policy activation, and appends the audit
/// entry — it is infallible, and the book's exclusive borrow keeps the
/// whole operation atomic with respect to other writers.
pub struct PolicyCascadeEngine;

impl PolicyCascadeEngine {
    /// Count what a cascade would touch, without mutating anything.
    pub fn preview(
        book: &ExposureBook,
        policy_id: Uuid,
        company_id: &CompanyId,
    ) -> Result<CascadePreview, CascadeError> {
        let policy = Self::resolve_policy(book, policy_id, company_id)?;
        let policy_name = policy.name().to_string();

        let exposures = book.exposures_for_company(company_id);
        let will_skip = exposures.iter().filter(|e| e.hedge_override()).count();

        Ok(CascadePreview {
            policy_name,
            will_update: exposures.len() - will_skip,
            will_skip,
        })
    }

    /// Activate a policy and cascade its tier ratios to every
    /// non-overridden exposure of the company.
    pub fn cascade(
        book: &mut ExposureBook,
        policy_id: Uuid,
        company_id: &CompanyId,
        actor: &str,
    ) -> Result<CascadeResult, CascadeError> {
        // Stage: resolve the policy and compute every write up front.
        let policy = Self::resolve_policy(book, policy_id, company_id)?;
        let policy_name = policy.name().to_string();

        let mut staged: Vec<(Uuid, Decimal)> = Vec::new();
        let mut skipped = 0usize;
        for exposure in book.exposures_for_company(company_id) {
            if exposure.hedge_override() {
                skipped += 1;
                continue;
            }
            let tier = PolicyTier::for_notional(exposure.notional_in_settlement());
            staged.push((exposure.id(), policy.ratio_for_tier(tier)));
        }
        let updated = staged.len();

        // Commit: apply ratios, flip activation, write the audit entry.
        // Nothing below can fail — the staged IDs came from the book.
        for (exposure_id, ratio) in staged {
            if let Some(exposure) = book.exposure_mut(exposure_id) {
                exposure.apply_policy_ratio(ratio);
            }
        }
        for policy in book.policies_mut() {
            if policy.company_id() != company_id {
                continue;
            }
            if policy.id() == policy_id {
                policy.activate();
            } else {
                policy.deactivate();
            }
        }

        let entry = AuditLogEntry::new(
            company_id.clone(),
            policy_id,
            policy_name.clone(),
            actor,
            updated,
            skipped,
        );
        let audit_id = entry.id();
        book.audit_mut().append(entry);

        log::info!(
            "cascade of policy '{}' for {}: {} updated, {} skipped",
            policy_name,
            company_id,
            updated,
            skipped
        );

        Ok(CascadeResult {
            policy_id,
            policy_name,
            exposures_updated: updated,
            exposures_skipped: skipped,
            audit_id,
        })
    }

    /// Pin an exposure's hedge ratio, exempting it from future cascades.
    pub fn set_override(
        book: &mut ExposureBook,
        exposure_id: Uuid,
        hedge_ratio: Decimal,
    ) -> Result<(), CascadeError> {
        if hedge_ratio < Decimal::ZERO || hedge_ratio > Decimal::ONE {
            return Err(CascadeError::HedgeRatioOutOfRange(hedge_ratio));
        }
        let exposure = book
            .exposure_mut(exposure_id)
            .ok_or(CascadeError::ExposureNotFound(exposure_id))?;
        exposure.set_override(hedge_ratio);
        Ok(())
    }

    /// Release an exposure back to policy control.
    pub fn clear_override(
        book: &mut ExposureBook,
        exposure_id: Uuid,
    ) -> Result<(), CascadeError> {
        let exposure = book
            .exposure_mut(exposure_id)
            .ok_or(CascadeError::ExposureNotFound(exposure_id))?;
        exposure.clear_override();
        Ok(())
    }

    fn resolve_policy<'a>(
        book: &'a ExposureBook,
        policy_id: Uuid,
        company_id: &CompanyId,
    ) -> Result<&'a crate::core::policy::HedgePolicy, CascadeError> {
        book.policy(policy_id)
            .filter(|p| p.company_id() == company_id)
            .ok_or(CascadeError::PolicyNotFound(policy_id))
    }
}
