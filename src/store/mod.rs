//! Typed access to the analytics store
//!
//! The core never issues raw queries: every read, partial update, and
//! insert it needs is named here. `MemoryStore` is the in-process
//! reference implementation; a database-backed store plugs in behind
//! the same trait.

pub mod memory;
pub mod records;

pub use memory::MemoryStore;
pub use records::{
    AddressUpdate, ContractTemplate, OrganizationRecord, OutcomeType, PaperField, PaperRecord,
    PatientSummary,
};

use crate::core::error::Result;

/// Typed operations the core is allowed to run against the store
///
/// Implementations synchronize internally; callers hold a shared handle
/// and never lock around it.
pub trait AnalyticsStore: Send + Sync {
    /// Find one organization by name: exact case-insensitive match
    /// first, then substring case-insensitive match
    fn org_by_name(&self, name: &str) -> Option<OrganizationRecord>;

    /// Organizations ranked by ghost-patient count, descending
    fn top_orgs_by_ghost_patients(&self, limit: usize) -> Vec<OrganizationRecord>;

    /// Write resolved address fields and stamp `address_last_updated`.
    /// Returns false when no record carries the given id.
    fn update_org_address(&self, org_id: &str, update: &AddressUpdate) -> Result<bool>;

    /// Internal papers whose author name contains the query
    /// (case-insensitive)
    fn internal_papers_by_author(&self, author: &str, limit: usize) -> Vec<PaperRecord>;

    /// External papers whose author name contains the query
    /// (case-insensitive)
    fn external_papers_by_author(&self, author: &str, limit: usize) -> Vec<PaperRecord>;

    /// Overwrite the given fields on one internal paper. Returns false
    /// when no record carries the given id.
    fn update_internal_paper(&self, paper_id: &str, fields: &[(PaperField, String)])
        -> Result<bool>;

    /// Insert a paper into the internal set, assigning a fresh id
    /// (any incoming id is discarded). Returns the assigned id.
    fn insert_internal_paper(&self, record: PaperRecord) -> Result<String>;

    fn contract_templates(&self) -> Vec<ContractTemplate>;

    fn contract_template_by_id(&self, template_id: &str) -> Option<ContractTemplate>;

    /// Cohort aggregates, or None when no patient data is loaded
    fn patient_summary(&self) -> Option<PatientSummary>;
}
