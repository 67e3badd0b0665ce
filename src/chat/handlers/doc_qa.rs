//! Document question-answering intent
//!
//! Routes document-directed questions to the external Q&A
//! collaborator. Only registered when one is configured.

use crate::chat::handlers::IntentHandler;
use crate::chat::params::MatchParams;
use crate::chat::response::Response;
use crate::core::error::Result;
use crate::providers::DocumentQa;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Matches questions that reference the uploaded documents, e.g.
/// "according to the documents, what is the dosing schedule?" or
/// "what do the reports say about readmission?"
pub struct DocQaHandler {
    qa: Arc<dyn DocumentQa>,
    pattern: Regex,
}

impl DocQaHandler {
    pub fn new(qa: Arc<dyn DocumentQa>) -> Result<Self> {
        Ok(Self {
            qa,
            pattern: Regex::new(
                r"(?i)(?:according\s+to|based\s+on|from)\s+(?:the\s+)?(?:document|pdf|report)s?|(?:document|pdf|report)s?\s+(?:say|says|state|states|mention)",
            )?,
        })
    }
}

#[async_trait]
impl IntentHandler for DocQaHandler {
    fn name(&self) -> &'static str {
        "document-qa"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        self.pattern.find(message)?;
        Some(MatchParams::new().with_text("question", message.trim()))
    }

    async fn handle(&self, params: MatchParams) -> Result<Response> {
        let question = params.text("question").unwrap_or("");

        let answer = match self.qa.query(question, None).await {
            Ok(answer) => answer,
            Err(e) => {
                // Provider trouble is not the user's problem; report it
                // as an ordinary reply and move on
                tracing::error!(error = %e, "document Q&A collaborator failed");
                return Ok(Response::Text(
                    "The document service is unavailable right now. Please try again later."
                        .into(),
                ));
            }
        };

        if !answer.success {
            let detail = answer
                .error
                .unwrap_or_else(|| "no matching content found".into());
            return Ok(Response::Text(format!(
                "I couldn't answer that from the documents ({}).",
                detail
            )));
        }

        let mut text = answer.answer;
        if !answer.sources.is_empty() {
            text.push_str(&format!("\n\n**Sources:** {}", answer.sources.join(", ")));
        }

        Ok(Response::Text(text))
    }
}
