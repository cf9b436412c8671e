use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a company (tenant) in the platform.
///
/// A company owns a set of exposures and hedging policies; every
/// cascade and audit record is scoped to exactly one company.
///
/// # Examples
///
/// ```
/// use fx_risk_engine::core::company::CompanyId;
///
/// let acme = CompanyId::new("ACME-TRADING");
/// let birk = CompanyId::new("BIRK-COMMODITIES");
/// assert_ne!(acme, birk);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this company ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
