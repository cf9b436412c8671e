use crate::cascade::audit::AuditLog;
use crate::core::company::CompanyId;
use crate::core::currency::CurrencyPair;
use crate::core::exposure::Exposure;
use crate::core::policy::HedgePolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory view of the exposures, policies, and audit trail the
/// cascade engine operates on.
///
/// This is the core's picture of the persistence collaborator's rows.
/// The engine takes the book by exclusive borrow, so a cascade can
/// never interleave with another cascade or an override write — the
/// crate-level analogue of a serializable transaction scoped to one
/// company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExposureBook {
    exposures: Vec<Exposure>,
    policies: Vec<HedgePolicy>,
    audit: AuditLog,
}

impl ExposureBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exposure(&mut self, exposure: Exposure) {
        self.exposures.push(exposure);
    }

    pub fn add_policy(&mut self, policy: HedgePolicy) {
        self.policies.push(policy);
    }

    pub fn exposure(&self, id: Uuid) -> Option<&Exposure> {
        self.exposures.iter().find(|e| e.id() == id)
    }

    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    pub fn exposures_for_company(&self, company_id: &CompanyId) -> Vec<&Exposure> {
        self.exposures
            .iter()
            .filter(|e| e.company_id() == company_id)
            .collect()
    }

    pub fn policy(&self, id: Uuid) -> Option<&HedgePolicy> {
        self.policies.iter().find(|p| p.id() == id)
    }

    pub fn policies(&self) -> &[HedgePolicy] {
        &self.policies
    }

    pub fn policies_for_company(&self, company_id: &CompanyId) -> Vec<&HedgePolicy> {
        self.policies
            .iter()
            .filter(|p| p.company_id() == company_id)
            .collect()
    }

    /// The company's active policy, if a cascade has run.
    pub fn active_policy(&self, company_id: &CompanyId) -> Option<&HedgePolicy> {
        self.policies
            .iter()
            .find(|p| p.company_id() == company_id && p.is_active())
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn len(&self) -> usize {
        self.exposures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exposures.is_empty()
    }

    /// Book-level summary for a company: headline figures plus a
    /// per-pair notional breakdown.
    pub fn summary(&self, company_id: &CompanyId) -> ExposureSummary {
        let mut total_notional = Decimal::ZERO;
        let mut hedged_notional = Decimal::ZERO;
        let mut override_count = 0usize;
        let mut by_pair: HashMap<CurrencyPair, Decimal> = HashMap::new();

        for exposure in self.exposures_for_company(company_id) {
            let notional = exposure.notional_in_settlement();
            total_notional += notional;
            hedged_notional += notional * exposure.hedge_ratio();
            if exposure.hedge_override() {
                override_count += 1;
            }
            *by_pair
                .entry(exposure.pair().clone())
                .or_insert(Decimal::ZERO) += notional;
        }

        ExposureSummary {
            exposure_count: self.exposures_for_company(company_id).len(),
            total_notional,
            hedged_notional,
            override_count,
            by_pair,
        }
    }

    // --- Mutable access for the cascade engine ---

    pub(crate) fn exposure_mut(&mut self, id: Uuid) -> Option<&mut Exposure> {
        self.exposures.iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn policies_mut(&mut self) -> &mut [HedgePolicy] {
        &mut self.policies
    }

    pub(crate) fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.audit
    }
}

/// Headline figures for one company's exposure set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureSummary {
    pub exposure_count: usize,
    /// Gross notional in settlement-currency terms.
    pub total_notional: Decimal,
    /// Portion of the gross notional covered by current hedge ratios.
    pub hedged_notional: Decimal,
    pub override_count: usize,
    pub by_pair: HashMap<CurrencyPair, Decimal>,
}
