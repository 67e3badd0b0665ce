//! Field-level comparison of internal and external paper records

use crate::store::records::{PaperRecord, COMPARE_FIELDS};
use crate::store::PaperField;
use serde::Serialize;

/// How one field differs between the two record sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiffStatus {
    /// Absent internally, present externally
    Missing,
    /// Present on both sides with different values
    Different,
}

/// One differing field with both observed values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: PaperField,
    pub status: DiffStatus,
    pub internal: Option<String>,
    pub external: Option<String>,
}

/// All field diffs for one title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordComparison {
    pub title: String,
    pub diffs: Vec<FieldDiff>,
}

impl RecordComparison {
    pub fn has_differences(&self) -> bool {
        !self.diffs.is_empty()
    }

    /// Fields flagged `Missing`, in comparison order
    pub fn missing_fields(&self) -> Vec<PaperField> {
        self.diffs
            .iter()
            .filter(|d| d.status == DiffStatus::Missing)
            .map(|d| d.field)
            .collect()
    }
}

/// Trim a field value; whitespace-only counts as absent
fn non_empty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Compare two papers field by field
///
/// For each compared field: absent internally but present externally is
/// `Missing`; present on both sides but unequal is `Different`; equal
/// values or an empty external value produce no entry. An external
/// record can therefore never clear internal-only data.
pub fn compare_papers(internal: &PaperRecord, external: &PaperRecord) -> RecordComparison {
    let mut diffs = Vec::new();

    for field in COMPARE_FIELDS {
        let internal_value = non_empty(internal.field(field));
        let external_value = non_empty(external.field(field));

        match (internal_value, external_value) {
            (None, Some(external_value)) => diffs.push(FieldDiff {
                field,
                status: DiffStatus::Missing,
                internal: None,
                external: Some(external_value),
            }),
            (Some(internal_value), Some(external_value)) if internal_value != external_value => {
                diffs.push(FieldDiff {
                    field,
                    status: DiffStatus::Different,
                    internal: Some(internal_value),
                    external: Some(external_value),
                })
            }
            _ => {}
        }
    }

    RecordComparison {
        title: external.title.trim().to_string(),
        diffs,
    }
}
