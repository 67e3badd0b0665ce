//! Record types owned by the analytics store

use crate::core::types::Region;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A healthcare organization tracked by the store
///
/// Address fields and `address_last_updated` are the only parts the
/// core ever mutates; records are never deleted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    /// Stable identifier, e.g. "HCO-001"
    pub id: String,
    pub name: String,
    /// Two-letter state code, uppercase
    pub state: String,
    pub region: Region,
    pub treated_patients: u64,
    /// Eligible but untreated patients
    pub ghost_patients: u64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub address_last_updated: Option<DateTime<Utc>>,
}

impl OrganizationRecord {
    /// Percentage of eligible patients not treated:
    /// ghost / (ghost + treated) * 100, or 0 when both counters are zero
    pub fn leakage_percent(&self) -> f64 {
        let total = self.ghost_patients + self.treated_patients;
        if total == 0 {
            return 0.0;
        }
        self.ghost_patients as f64 / total as f64 * 100.0
    }

    /// Whether any cached address component exists
    pub fn has_address(&self) -> bool {
        self.address.is_some() || self.city.is_some()
    }
}

/// Partial address update applied to an organization record
///
/// Only the populated fields are written; absent fields leave the
/// stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressUpdate {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// A published paper attributed to a surgeon author
///
/// The same schema backs two parallel sets: the internal set (mutable,
/// authoritative) and the external reference set (read-only).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Store-assigned identifier; stripped and reassigned when an
    /// external record is copied into the internal set
    pub id: String,
    pub title: String,
    pub journal: String,
    pub author_name: String,
    pub affiliation: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

/// The fixed field set compared between internal and external papers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperField {
    Title,
    Journal,
    AuthorName,
    Affiliation,
    Website,
    Address,
    Email,
}

/// Comparison and merge order for paper fields
pub const COMPARE_FIELDS: [PaperField; 7] = [
    PaperField::Title,
    PaperField::Journal,
    PaperField::AuthorName,
    PaperField::Affiliation,
    PaperField::Website,
    PaperField::Address,
    PaperField::Email,
];

impl PaperField {
    pub fn label(&self) -> &'static str {
        match self {
            PaperField::Title => "title",
            PaperField::Journal => "journal",
            PaperField::AuthorName => "author_name",
            PaperField::Affiliation => "affiliation",
            PaperField::Website => "website",
            PaperField::Address => "address",
            PaperField::Email => "email",
        }
    }
}

impl std::fmt::Display for PaperField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl PaperRecord {
    /// Read one comparable field; None when the record has no value
    pub fn field(&self, field: PaperField) -> Option<&str> {
        match field {
            PaperField::Title => Some(&self.title),
            PaperField::Journal => Some(&self.journal),
            PaperField::AuthorName => Some(&self.author_name),
            PaperField::Affiliation => Some(&self.affiliation),
            PaperField::Website => self.website.as_deref(),
            PaperField::Address => self.address.as_deref(),
            PaperField::Email => self.email.as_deref(),
        }
    }

    /// Overwrite one comparable field
    pub fn set_field(&mut self, field: PaperField, value: &str) {
        match field {
            PaperField::Title => self.title = value.to_string(),
            PaperField::Journal => self.journal = value.to_string(),
            PaperField::AuthorName => self.author_name = value.to_string(),
            PaperField::Affiliation => self.affiliation = value.to_string(),
            PaperField::Website => self.website = Some(value.to_string()),
            PaperField::Address => self.address = Some(value.to_string()),
            PaperField::Email => self.email = Some(value.to_string()),
        }
    }
}

/// Outcome a contract template pays rebates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeType {
    #[serde(rename = "12-month-survival")]
    Survival12Month,
    #[serde(rename = "toxicity")]
    Toxicity,
    #[serde(rename = "retreatment")]
    Retreatment,
}

impl OutcomeType {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeType::Survival12Month => "12-month-survival",
            OutcomeType::Toxicity => "toxicity",
            OutcomeType::Retreatment => "retreatment",
        }
    }
}

impl std::fmt::Display for OutcomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An outcomes-based contract template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTemplate {
    /// Stable identifier, e.g. "survival-12m"
    pub template_id: String,
    pub name: String,
    pub outcome_type: OutcomeType,
    pub default_rebate_percent: u64,
    /// Months
    pub default_time_window: u64,
}

/// Aggregated patient cohort statistics
///
/// Maintained by the surrounding CRUD layer; the core only reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub total_patients: u64,
    pub avg_age: u64,
    pub male_percent: u64,
    pub avg_prior_lines: f64,
    /// (payer type, patient count)
    pub payer_dist: Vec<(String, u64)>,
    /// (region label, patient count)
    pub region_dist: Vec<(String, u64)>,
    /// Counts for the fixed buckets 50-59, 60-69, 70-79, 80+
    pub age_buckets: [u64; 4],
    pub toxicity_count: u64,
    pub event_12m_count: u64,
    pub retreatment_18m_count: u64,
}

/// Labels for the fixed age buckets, in `age_buckets` order
pub const AGE_BUCKET_LABELS: [&str; 4] = ["50-59", "60-69", "70-79", "80+"];

impl PatientSummary {
    pub fn female_percent(&self) -> u64 {
        100 - self.male_percent
    }

    /// Patients flagged for the given contract outcome
    pub fn outcome_count(&self, outcome: OutcomeType) -> u64 {
        match outcome {
            OutcomeType::Survival12Month => self.event_12m_count,
            OutcomeType::Toxicity => self.toxicity_count,
            OutcomeType::Retreatment => self.retreatment_18m_count,
        }
    }

    fn percent_of_total(&self, count: u64) -> u64 {
        if self.total_patients == 0 {
            return 0;
        }
        (count as f64 / self.total_patients as f64 * 100.0).round() as u64
    }

    pub fn toxicity_percent(&self) -> u64 {
        self.percent_of_total(self.toxicity_count)
    }

    pub fn event_12m_percent(&self) -> u64 {
        self.percent_of_total(self.event_12m_count)
    }

    pub fn retreatment_18m_percent(&self) -> u64 {
        self.percent_of_total(self.retreatment_18m_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(ghost: u64, treated: u64) -> OrganizationRecord {
        OrganizationRecord {
            id: "HCO-001".into(),
            name: "Memorial Hospital".into(),
            state: "CA".into(),
            region: Region::West,
            treated_patients: treated,
            ghost_patients: ghost,
            address: None,
            city: None,
            zip_code: None,
            address_last_updated: None,
        }
    }

    #[test]
    fn test_leakage_percent() {
        assert!((org(25, 75).leakage_percent() - 25.0).abs() < 1e-9);
        assert_eq!(org(0, 0).leakage_percent(), 0.0);
        assert!((org(10, 0).leakage_percent() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_has_address() {
        let mut record = org(1, 1);
        assert!(!record.has_address());
        record.city = Some("Los Angeles".into());
        assert!(record.has_address());
    }

    #[test]
    fn test_paper_field_roundtrip() {
        let mut paper = PaperRecord {
            title: "Outcomes of Valve Repair".into(),
            ..Default::default()
        };
        assert_eq!(paper.field(PaperField::Title), Some("Outcomes of Valve Repair"));
        assert_eq!(paper.field(PaperField::Email), None);

        paper.set_field(PaperField::Email, "a@b.com");
        assert_eq!(paper.field(PaperField::Email), Some("a@b.com"));
    }

    #[test]
    fn test_outcome_counts() {
        let summary = PatientSummary {
            total_patients: 200,
            toxicity_count: 30,
            event_12m_count: 50,
            retreatment_18m_count: 20,
            ..Default::default()
        };
        assert_eq!(summary.outcome_count(OutcomeType::Toxicity), 30);
        assert_eq!(summary.toxicity_percent(), 15);
        assert_eq!(summary.event_12m_percent(), 25);
        assert_eq!(summary.outcome_count(OutcomeType::Survival12Month), 50);
    }
}
