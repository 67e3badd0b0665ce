//! Paper reconciliation workflow
//!
//! Keeps the internal paper set in sync with the external reference
//! set through explicit, user-driven steps: search the internal set,
//! fetch and diff the external set, then merge selected differences
//! back. Which step runs is encoded in each request; no session state
//! is held between steps.

pub mod diff;

pub use diff::{compare_papers, DiffStatus, FieldDiff, RecordComparison};

use crate::core::error::Result;
use crate::store::records::{PaperField, PaperRecord};
use crate::store::AnalyticsStore;
use std::sync::Arc;

/// The three reconciliation steps, in workflow order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Search,
    FetchExternal,
    UpdateInternal,
}

impl SyncAction {
    pub fn label(&self) -> &'static str {
        match self {
            SyncAction::Search => "search",
            SyncAction::FetchExternal => "fetch_external",
            SyncAction::UpdateInternal => "update_internal",
        }
    }
}

/// Internal-set search result
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub papers: Vec<PaperRecord>,
}

/// Result of diffing the external set against the internal set
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The external set has nothing for this author
    NothingExternal,
    /// The internal set is empty; every external record is new
    AllNew { external: Vec<PaperRecord> },
    /// Both sets populated: per-title comparisons plus external titles
    /// with no internal counterpart
    Compared {
        comparisons: Vec<RecordComparison>,
        unmatched: Vec<PaperRecord>,
    },
}

impl FetchOutcome {
    /// Whether any linked record pair differs. Unmatched external
    /// titles do not count: the update step only patches linked
    /// records when internal data exists.
    pub fn any_differences(&self) -> bool {
        match self {
            FetchOutcome::Compared { comparisons, .. } => {
                comparisons.iter().any(|c| c.has_differences())
            }
            _ => false,
        }
    }
}

/// Result of merging external data into the internal set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub inserted: usize,
    pub updated: usize,
}

/// Drives the three-state reconciliation machine against the store
pub struct PaperReconciler {
    store: Arc<dyn AnalyticsStore>,
    /// Result window per record set per author query
    limit: usize,
}

impl PaperReconciler {
    pub fn new(store: Arc<dyn AnalyticsStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Step 1: fuzzy author search over the internal set
    pub fn search(&self, author: &str) -> SearchOutcome {
        let papers = self.store.internal_papers_by_author(author, self.limit);
        tracing::info!(author, count = papers.len(), "internal paper search");
        SearchOutcome { papers }
    }

    /// Step 2: fetch both sets and diff them
    ///
    /// Records are linked across sets by exact title equality within
    /// the author window; titles that differ at all stay unlinked and
    /// are flagged missing-from-internal instead.
    pub fn fetch_external(&self, author: &str) -> FetchOutcome {
        let internal = self.store.internal_papers_by_author(author, self.limit);
        let external = self.store.external_papers_by_author(author, self.limit);
        tracing::info!(
            author,
            internal = internal.len(),
            external = external.len(),
            "fetching external papers"
        );

        if external.is_empty() {
            return FetchOutcome::NothingExternal;
        }

        if internal.is_empty() {
            return FetchOutcome::AllNew { external };
        }

        let mut comparisons = Vec::new();
        let mut unmatched = Vec::new();

        for ext in external {
            match internal.iter().find(|int| int.title == ext.title) {
                Some(int) => comparisons.push(compare_papers(int, &ext)),
                None => unmatched.push(ext),
            }
        }

        FetchOutcome::Compared {
            comparisons,
            unmatched,
        }
    }

    /// Step 3: merge external data into the internal set
    ///
    /// With an empty internal set every external record is inserted
    /// verbatim (the store assigns fresh ids). Otherwise each linked
    /// record is patched field by field: only differing fields with a
    /// non-empty external value are overwritten, so internal-only data
    /// survives.
    pub fn update_internal(&self, author: &str) -> Result<UpdateOutcome> {
        let internal = self.store.internal_papers_by_author(author, self.limit);
        let external = self.store.external_papers_by_author(author, self.limit);

        let mut outcome = UpdateOutcome::default();

        if external.is_empty() {
            return Ok(outcome);
        }

        if internal.is_empty() {
            for paper in external {
                self.store.insert_internal_paper(paper)?;
                outcome.inserted += 1;
            }
            tracing::info!(author, inserted = outcome.inserted, "imported external papers");
            return Ok(outcome);
        }

        for ext in &external {
            let Some(int) = internal.iter().find(|int| int.title == ext.title) else {
                continue;
            };

            let comparison = compare_papers(int, ext);
            let fields: Vec<(PaperField, String)> = comparison
                .diffs
                .iter()
                .filter_map(|d| d.external.clone().map(|value| (d.field, value)))
                .collect();

            if fields.is_empty() {
                continue;
            }

            if self.store.update_internal_paper(&int.id, &fields)? {
                outcome.updated += 1;
            } else {
                tracing::warn!(paper_id = %int.id, "internal paper vanished during update");
            }
        }

        tracing::info!(author, updated = outcome.updated, "merged external papers");
        Ok(outcome)
    }
}
