//! Contract template and simulation intents

use crate::chat::handlers::IntentHandler;
use crate::chat::params::MatchParams;
use crate::chat::render::{fmt_count, fmt_money};
use crate::chat::response::Response;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::store::{AnalyticsStore, ContractTemplate, PatientSummary};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Rebate exposure computed for one template over the current cohort
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub template_name: String,
    pub outcome_label: &'static str,
    pub total_patients: u64,
    pub failure_count: u64,
    pub failure_rate: f64,
    pub total_rebate: f64,
    pub low_rebate: f64,
    pub high_rebate: f64,
    pub avg_rebate_per_treated: f64,
}

/// Simulate rebate exposure with the template's defaults
///
/// Failure count is the number of cohort patients flagged for the
/// template's outcome. The low/high estimates apply a fixed ±20%
/// sensitivity band. None when the cohort is empty.
pub fn simulate(
    template: &ContractTemplate,
    summary: &PatientSummary,
    therapy_price: u64,
) -> Option<SimulationResult> {
    if summary.total_patients == 0 {
        return None;
    }

    let failure_count = summary.outcome_count(template.outcome_type);
    let failure_rate = failure_count as f64 / summary.total_patients as f64 * 100.0;

    let rebate_per_patient =
        therapy_price as f64 * template.default_rebate_percent as f64 / 100.0;
    let total_rebate = failure_count as f64 * rebate_per_patient;

    Some(SimulationResult {
        template_name: template.name.clone(),
        outcome_label: template.outcome_type.label(),
        total_patients: summary.total_patients,
        failure_count,
        failure_rate,
        total_rebate,
        low_rebate: total_rebate * 0.8,
        high_rebate: total_rebate * 1.2,
        avg_rebate_per_treated: total_rebate / summary.total_patients as f64,
    })
}

/// Simulates an outcome contract over the patient cohort
///
/// Matches queries like "what's the expected rebate for 12-month
/// survival", "simulate the toxicity contract", "calculate retreatment
/// rebate". MUST be registered before `ContractTemplatesHandler`: the
/// templates pattern is a textual superset of these requests.
pub struct ContractSimulationHandler {
    store: Arc<dyn AnalyticsStore>,
    pattern: Regex,
    therapy_price: u64,
}

impl ContractSimulationHandler {
    pub fn new(store: Arc<dyn AnalyticsStore>, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            store,
            pattern: Regex::new(
                r"(?i)(?:simulate|rebate|expected|calculate).*(?:12-month|survival|toxicity|retreatment)",
            )?,
            therapy_price: config.default_therapy_price,
        })
    }

    fn format_response(&self, result: &SimulationResult) -> String {
        let success_count = result.total_patients - result.failure_count;
        let success_rate = 100.0 - result.failure_rate;

        [
            format!("**Contract Simulation: {}**\n", result.template_name),
            format!("**Outcome Type:** {}", result.outcome_label),
            format!(
                "**Patient Cohort:** {} patients\n",
                fmt_count(result.total_patients)
            ),
            "**Outcome Results:**".to_string(),
            format!(
                "- Failures: {} patients ({:.1}%)",
                fmt_count(result.failure_count),
                result.failure_rate
            ),
            format!(
                "- Successes: {} patients ({:.1}%)\n",
                fmt_count(success_count),
                success_rate
            ),
            "**Financial Exposure:**".to_string(),
            format!("- Expected rebate: {}", fmt_money(result.total_rebate)),
            format!("- Low estimate (-20%): {}", fmt_money(result.low_rebate)),
            format!("- High estimate (+20%): {}", fmt_money(result.high_rebate)),
            format!(
                "- Average per patient: {}",
                fmt_money(result.avg_rebate_per_treated)
            ),
        ]
        .join("\n")
    }
}

#[async_trait]
impl IntentHandler for ContractSimulationHandler {
    fn name(&self) -> &'static str {
        "contract-simulation"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        self.pattern.find(message)?;

        // Fixed token priority; first listed keyword wins, and an
        // unclear request falls back to the survival template
        let message_lower = message.to_lowercase();
        let template = if message_lower.contains("12-month") || message_lower.contains("survival") {
            "survival-12m"
        } else if message_lower.contains("toxicity") {
            "toxicity-30d"
        } else if message_lower.contains("retreatment") {
            "retreatment-18m"
        } else {
            "survival-12m"
        };

        Some(MatchParams::new().with_token("template", template))
    }

    async fn handle(&self, params: MatchParams) -> Result<Response> {
        let template_id = params.token("template").unwrap_or("survival-12m");

        let Some(template) = self.store.contract_template_by_id(template_id) else {
            return Ok(Response::Text(format!(
                "Contract template '{}' not found.",
                template_id
            )));
        };

        let simulation = self
            .store
            .patient_summary()
            .and_then(|summary| simulate(&template, &summary, self.therapy_price));

        let Some(result) = simulation else {
            return Ok(Response::Text(
                "Unable to simulate contract. Please check if patient data is available.".into(),
            ));
        };

        tracing::info!(template = template_id, "contract simulation");
        Ok(Response::Text(self.format_response(&result)))
    }
}

/// Lists the available contract templates
///
/// Matches queries like "show contract templates", "list all
/// contracts", "what contract templates are available".
pub struct ContractTemplatesHandler {
    store: Arc<dyn AnalyticsStore>,
    pattern: Regex,
}

impl ContractTemplatesHandler {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Result<Self> {
        Ok(Self {
            store,
            pattern: Regex::new(r"(?i)(?:show|list|what|get).*(?:contract|template)s?")?,
        })
    }

    fn format_response(&self, templates: &[ContractTemplate]) -> String {
        if templates.is_empty() {
            return "No contract templates found.".to_string();
        }

        let mut lines = vec![format!(
            "Here are the available contract templates ({} total):\n",
            templates.len()
        )];

        for (i, template) in templates.iter().enumerate() {
            lines.push(format!(
                "{}. **{}**\n   - Outcome: {}\n   - Default rebate: {}%\n   - Time window: {} months",
                i + 1,
                template.name,
                template.outcome_type,
                template.default_rebate_percent,
                template.default_time_window,
            ));
        }

        lines.join("\n")
    }
}

#[async_trait]
impl IntentHandler for ContractTemplatesHandler {
    fn name(&self) -> &'static str {
        "contract-templates"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        self.pattern.find(message)?;
        Some(MatchParams::new())
    }

    async fn handle(&self, _params: MatchParams) -> Result<Response> {
        let templates = self.store.contract_templates();
        Ok(Response::Text(self.format_response(&templates)))
    }
}
