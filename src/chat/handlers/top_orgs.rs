//! "Top N HCOs by ghost patients" intent

use crate::chat::handlers::IntentHandler;
use crate::chat::params::MatchParams;
use crate::chat::render::fmt_percent;
use crate::chat::response::{org_link, Response};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::store::AnalyticsStore;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Ranks organizations by ghost-patient count
///
/// Matches queries like "top 5 HCOs with highest ghost patients",
/// "show me top 10 hcos ghost patients", "top hcos by ghost patients".
pub struct TopOrgsHandler {
    store: Arc<dyn AnalyticsStore>,
    pattern: Regex,
    default_limit: i64,
    max_limit: i64,
}

impl TopOrgsHandler {
    pub fn new(store: Arc<dyn AnalyticsStore>, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            store,
            pattern: Regex::new(r"(?i)top\s+(\d+)?\s*hcos?.*(?:ghost|patients?)")?,
            default_limit: config.default_top_limit,
            max_limit: config.max_top_limit,
        })
    }

    fn format_response(&self, orgs: &[crate::store::OrganizationRecord]) -> String {
        if orgs.is_empty() {
            return "No HCO data found.".to_string();
        }

        let mut lines = vec![format!(
            "Here are the top {} HCOs with the highest ghost patients:\n",
            orgs.len()
        )];

        for (i, org) in orgs.iter().enumerate() {
            lines.push(format!(
                "{}. **{}** ({}) - {} ghost patients ({} leakage rate)",
                i + 1,
                org_link(&org.name),
                org.state,
                org.ghost_patients,
                fmt_percent(org.leakage_percent()),
            ));
        }

        lines.join("\n")
    }
}

#[async_trait]
impl IntentHandler for TopOrgsHandler {
    fn name(&self) -> &'static str {
        "top-orgs"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        let caps = self.pattern.captures(message)?;

        // Absent count falls back to the default; an unparseable count
        // (only possible through overflow) is treated as "as many as
        // allowed". Either way the result is clamped, never rejected.
        let requested = match caps.get(1) {
            Some(m) => m.as_str().parse::<i64>().unwrap_or(self.max_limit),
            None => self.default_limit,
        };
        let limit = requested.clamp(1, self.max_limit);

        Some(MatchParams::new().with_int("limit", limit))
    }

    async fn handle(&self, params: MatchParams) -> Result<Response> {
        let limit = params.int("limit").unwrap_or(self.default_limit);
        let orgs = self.store.top_orgs_by_ghost_patients(limit as usize);
        tracing::info!(limit, count = orgs.len(), "top organizations query");
        Ok(Response::Text(self.format_response(&orgs)))
    }
}
