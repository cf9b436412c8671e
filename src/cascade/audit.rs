use crate::core::company::CompanyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of one policy cascade, for the compliance trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    id: Uuid,
    company_id: CompanyId,
    policy_id: Uuid,
    policy_name: String,
    /// Who triggered the cascade.
    actor: String,
    exposures_updated: usize,
    exposures_skipped: usize,
    timestamp: DateTime<Utc>,
    notes: String,
}

impl AuditLogEntry {
    pub(crate) fn new(
        company_id: CompanyId,
        policy_id: Uuid,
        policy_name: impl Into<String>,
        actor: impl Into<String>,
        exposures_updated: usize,
        exposures_skipped: usize,
    ) -> Self {
        let notes = format!(
            "Cascaded to {exposures_updated} exposures. \
             {exposures_skipped} manual overrides preserved."
        );
        Self {
            id: Uuid::new_v4(),
            company_id,
            policy_id,
            policy_name: policy_name.into(),
            actor: actor.into(),
            exposures_updated,
            exposures_skipped,
            timestamp: Utc::now(),
            notes,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    pub fn policy_id(&self) -> Uuid {
        self.policy_id
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn exposures_updated(&self) -> usize {
        self.exposures_updated
    }

    pub fn exposures_skipped(&self) -> usize {
        self.exposures_skipped
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// Append-only cascade audit trail, queried newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditLogEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, entry: AuditLogEntry) {
        self.entries.push(entry);
    }

    /// The `limit` most recent entries for a company, newest first.
    pub fn recent(&self, company_id: &CompanyId, limit: usize) -> Vec<&AuditLogEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.company_id() == company_id)
            .take(limit)
            .collect()
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_notes_format() {
        let entry = AuditLogEntry::new(
            CompanyId::new("ACME-TRADING"),
            Uuid::new_v4(),
            "Balanced",
            "treasury-admin",
            7,
            2,
        );
        assert_eq!(
            entry.notes(),
            "Cascaded to 7 exposures. 2 manual overrides preserved."
        );
        assert_eq!(entry.actor(), "treasury-admin");
    }

    #[test]
    fn test_recent_is_newest_first_and_scoped() {
        let acme = CompanyId::new("ACME-TRADING");
        let globex = CompanyId::new("GLOBEX");

        let mut log = AuditLog::new();
        let mut acme_ids = Vec::new();
        for i in 0..3 {
            let entry = AuditLogEntry::new(
                acme.clone(),
                Uuid::new_v4(),
                format!("Policy-{i}"),
                "admin",
                i,
                0,
            );
            acme_ids.push(entry.id());
            log.append(entry);
            log.append(AuditLogEntry::new(
                globex.clone(),
                Uuid::new_v4(),
                "Other",
                "admin",
                1,
                0,
            ));
        }

        let recent = log.recent(&acme, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id(), acme_ids[2]);
        assert_eq!(recent[1].id(), acme_ids[1]);
        assert!(recent.iter().all(|e| e.company_id() == &acme));
    }
}
