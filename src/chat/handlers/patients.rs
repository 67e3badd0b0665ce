//! Patient cohort statistics and outcome intents

use crate::chat::handlers::IntentHandler;
use crate::chat::params::MatchParams;
use crate::chat::render::fmt_count;
use crate::chat::response::Response;
use crate::core::error::Result;
use crate::store::records::AGE_BUCKET_LABELS;
use crate::store::{AnalyticsStore, PatientSummary};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

fn dist_lines(title: &str, dist: &[(String, u64)], total: u64) -> Vec<String> {
    if dist.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&(String, u64)> = dist.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let mut lines = vec![title.to_string()];
    for (label, count) in sorted {
        let pct = if total > 0 {
            (*count as f64 / total as f64 * 100.0 * 10.0).round() / 10.0
        } else {
            0.0
        };
        lines.push(format!("- {}: {} patients ({}%)", label, fmt_count(*count), pct));
    }
    lines.push(String::new());
    lines
}

/// Clinical outcome counts for the cohort
///
/// Matches queries like "how many patients had toxicity", "retreatment
/// rate", "12-month events". MUST be registered before
/// `PatientStatsHandler`, whose broader pattern also matches these.
pub struct PatientOutcomesHandler {
    store: Arc<dyn AnalyticsStore>,
    pattern: Regex,
}

impl PatientOutcomesHandler {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Result<Self> {
        Ok(Self {
            store,
            pattern: Regex::new(
                r"(?i)(?:toxicity|retreatment|event|outcome).*(?:patient|rate|count)|(?:how many|what percent).*(?:toxicity|retreatment|event)",
            )?,
        })
    }

    fn format_response(&self, stats: &PatientSummary) -> String {
        [
            format!(
                "**Patient Outcome Statistics** ({} total patients)\n",
                fmt_count(stats.total_patients)
            ),
            "**Clinical Outcomes:**".to_string(),
            format!(
                "- **30-Day Toxicity Events:** {} patients ({}%)",
                fmt_count(stats.toxicity_count),
                stats.toxicity_percent()
            ),
            "  - ICU/inpatient readmission with CRS/ICANS within 30 days".to_string(),
            format!(
                "- **12-Month Events:** {} patients ({}%)",
                fmt_count(stats.event_12m_count),
                stats.event_12m_percent()
            ),
            "  - Death or escalation to new MM treatment within 12 months".to_string(),
            format!(
                "- **18-Month Retreatment:** {} patients ({}%)",
                fmt_count(stats.retreatment_18m_count),
                stats.retreatment_18m_percent()
            ),
            "  - Received new high-cost MM treatment within 18 months".to_string(),
        ]
        .join("\n")
    }
}

#[async_trait]
impl IntentHandler for PatientOutcomesHandler {
    fn name(&self) -> &'static str {
        "patient-outcomes"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        self.pattern.find(message)?;
        Some(MatchParams::new())
    }

    async fn handle(&self, _params: MatchParams) -> Result<Response> {
        let Some(stats) = self.store.patient_summary() else {
            return Ok(Response::Text("No patient data available.".into()));
        };
        Ok(Response::Text(self.format_response(&stats)))
    }
}

/// Cohort demographics and distributions
///
/// Matches queries like "patient statistics", "show patient
/// demographics", "what's the average patient age", "payer
/// distribution".
pub struct PatientStatsHandler {
    store: Arc<dyn AnalyticsStore>,
    pattern: Regex,
}

impl PatientStatsHandler {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Result<Self> {
        Ok(Self {
            store,
            pattern: Regex::new(
                r"(?i)(?:patient|cohort|demographic).*(?:stat|age|payer|distribution|info)|(?:average|avg).*(?:age|patient)|payer.*distribution",
            )?,
        })
    }

    fn format_response(&self, stats: &PatientSummary) -> String {
        let mut lines = vec![
            format!(
                "**Patient Cohort Statistics** ({} total patients)\n",
                fmt_count(stats.total_patients)
            ),
            "**Demographics:**".to_string(),
            format!("- Average age: {} years", stats.avg_age),
            format!(
                "- Gender: {}% Male, {}% Female",
                stats.male_percent,
                stats.female_percent()
            ),
            format!(
                "- Average prior treatment lines: {}\n",
                stats.avg_prior_lines
            ),
        ];

        lines.extend(dist_lines(
            "**Payer Distribution:**",
            &stats.payer_dist,
            stats.total_patients,
        ));
        lines.extend(dist_lines(
            "**Regional Distribution:**",
            &stats.region_dist,
            stats.total_patients,
        ));

        lines.push("**Age Distribution:**".to_string());
        for (label, count) in AGE_BUCKET_LABELS.iter().zip(stats.age_buckets.iter()) {
            let pct = if stats.total_patients > 0 {
                (*count as f64 / stats.total_patients as f64 * 100.0 * 10.0).round() / 10.0
            } else {
                0.0
            };
            lines.push(format!(
                "- {}: {} patients ({}%)",
                label,
                fmt_count(*count),
                pct
            ));
        }

        lines.join("\n")
    }
}

#[async_trait]
impl IntentHandler for PatientStatsHandler {
    fn name(&self) -> &'static str {
        "patient-stats"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        self.pattern.find(message)?;
        Some(MatchParams::new())
    }

    async fn handle(&self, _params: MatchParams) -> Result<Response> {
        let Some(stats) = self.store.patient_summary() else {
            return Ok(Response::Text("No patient data available.".into()));
        };
        Ok(Response::Text(self.format_response(&stats)))
    }
}
