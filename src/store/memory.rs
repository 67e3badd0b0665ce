//! In-memory analytics store
//!
//! Reference implementation of `AnalyticsStore` used by the binary and
//! the test suite. A single `RwLock` guards all collections; every
//! operation takes the lock once and works on snapshots, matching the
//! single-document read-modify-write model of the store contract.

use crate::core::error::Result;
use crate::store::records::{
    AddressUpdate, ContractTemplate, OrganizationRecord, PaperField, PaperRecord, PatientSummary,
};
use crate::store::AnalyticsStore;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Collections {
    orgs: Vec<OrganizationRecord>,
    internal_papers: Vec<PaperRecord>,
    external_papers: Vec<PaperRecord>,
    templates: Vec<ContractTemplate>,
    patients: Option<PatientSummary>,
    next_paper_id: u64,
}

/// `AnalyticsStore` backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds consistent data for this store: every
    // write either fully applies or returns early. Recover the guard
    // instead of propagating the panic.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert_org(&self, record: OrganizationRecord) {
        self.write().orgs.push(record);
    }

    pub fn insert_external_paper(&self, mut record: PaperRecord) -> String {
        let mut inner = self.write();
        record.id = next_id(&mut inner, "EXT");
        let id = record.id.clone();
        inner.external_papers.push(record);
        id
    }

    pub fn insert_template(&self, template: ContractTemplate) {
        self.write().templates.push(template);
    }

    pub fn set_patient_summary(&self, summary: PatientSummary) {
        self.write().patients = Some(summary);
    }

    /// Test/demo helper: number of internal papers currently stored
    pub fn internal_paper_count(&self) -> usize {
        self.read().internal_papers.len()
    }
}

fn next_id(inner: &mut Collections, prefix: &str) -> String {
    inner.next_paper_id += 1;
    format!("{}-{:04}", prefix, inner.next_paper_id)
}

fn author_matches(record: &PaperRecord, query_lower: &str) -> bool {
    record.author_name.to_lowercase().contains(query_lower)
}

impl AnalyticsStore for MemoryStore {
    fn org_by_name(&self, name: &str) -> Option<OrganizationRecord> {
        let inner = self.read();
        let query = name.trim();

        // Exact match first, substring match as fallback
        if let Some(org) = inner
            .orgs
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(query))
        {
            return Some(org.clone());
        }

        let query_lower = query.to_lowercase();
        inner
            .orgs
            .iter()
            .find(|o| o.name.to_lowercase().contains(&query_lower))
            .cloned()
    }

    fn top_orgs_by_ghost_patients(&self, limit: usize) -> Vec<OrganizationRecord> {
        let inner = self.read();
        let mut orgs = inner.orgs.clone();
        orgs.sort_by(|a, b| b.ghost_patients.cmp(&a.ghost_patients));
        orgs.truncate(limit);
        orgs
    }

    fn update_org_address(&self, org_id: &str, update: &AddressUpdate) -> Result<bool> {
        let mut inner = self.write();
        let Some(org) = inner.orgs.iter_mut().find(|o| o.id == org_id) else {
            return Ok(false);
        };

        if let Some(address) = &update.address {
            org.address = Some(address.clone());
        }
        if let Some(city) = &update.city {
            org.city = Some(city.clone());
        }
        if let Some(state) = &update.state {
            org.state = state.to_uppercase();
        }
        if let Some(zip_code) = &update.zip_code {
            org.zip_code = Some(zip_code.clone());
        }
        org.address_last_updated = Some(Utc::now());

        Ok(true)
    }

    fn internal_papers_by_author(&self, author: &str, limit: usize) -> Vec<PaperRecord> {
        let query = author.to_lowercase();
        self.read()
            .internal_papers
            .iter()
            .filter(|p| author_matches(p, &query))
            .take(limit)
            .cloned()
            .collect()
    }

    fn external_papers_by_author(&self, author: &str, limit: usize) -> Vec<PaperRecord> {
        let query = author.to_lowercase();
        self.read()
            .external_papers
            .iter()
            .filter(|p| author_matches(p, &query))
            .take(limit)
            .cloned()
            .collect()
    }

    fn update_internal_paper(
        &self,
        paper_id: &str,
        fields: &[(PaperField, String)],
    ) -> Result<bool> {
        let mut inner = self.write();
        let Some(paper) = inner.internal_papers.iter_mut().find(|p| p.id == paper_id) else {
            return Ok(false);
        };

        for (field, value) in fields {
            paper.set_field(*field, value);
        }

        Ok(true)
    }

    fn insert_internal_paper(&self, mut record: PaperRecord) -> Result<String> {
        let mut inner = self.write();
        record.id = next_id(&mut inner, "INT");
        let id = record.id.clone();
        inner.internal_papers.push(record);
        Ok(id)
    }

    fn contract_templates(&self) -> Vec<ContractTemplate> {
        self.read().templates.clone()
    }

    fn contract_template_by_id(&self, template_id: &str) -> Option<ContractTemplate> {
        self.read()
            .templates
            .iter()
            .find(|t| t.template_id == template_id)
            .cloned()
    }

    fn patient_summary(&self) -> Option<PatientSummary> {
        self.read().patients.clone()
    }
}
