//! Paper search and reconciliation intent
//!
//! Plain author searches enter the workflow at its first step; the
//! `#fetch-papers:` and `#update-papers:` action tokens emitted in
//! replies re-enter it at the later steps. All state lives in the
//! request text.

use crate::chat::handlers::{clean_capture, IntentHandler};
use crate::chat::params::MatchParams;
use crate::chat::response::{action_token, Response, FETCH_PAPERS, UPDATE_PAPERS};
use crate::core::error::Result;
use crate::reconcile::{DiffStatus, FetchOutcome, PaperReconciler, RecordComparison, SyncAction};
use crate::store::PaperRecord;
use async_trait::async_trait;
use regex::Regex;

/// Searches internal papers by author and drives the fetch/merge steps
///
/// Matches queries like "Find papers by Kahraman E", "What papers did
/// Sharma R publish?", "author Nakamura H papers", and the two action
/// tokens.
pub struct PaperSyncHandler {
    reconciler: PaperReconciler,
    fetch_token: Regex,
    update_token: Regex,
    pattern: Regex,
    /// Filler words that leak into the author capture
    stop_words: Regex,
}

impl PaperSyncHandler {
    pub fn new(reconciler: PaperReconciler) -> Result<Self> {
        Ok(Self {
            reconciler,
            fetch_token: Regex::new(r"#fetch-papers:([^)\n]+)")?,
            update_token: Regex::new(r"#update-papers:([^)\n]+)")?,
            pattern: Regex::new(
                r"(?i)(?:find|search|show|get|list|what).*(?:papers?|publications?).*(?:by|for|from|author)\s+(.+?)(?:\?|$)|(?:papers?|publications?).*(?:by|from)\s+(.+?)(?:\?|$)|(?:author|surgeon)\s+(.+?).*(?:papers?|publications?)",
            )?,
            stop_words: Regex::new(r"(?i)\b(publish|published|write|wrote|author)\b")?,
        })
    }

    fn clean_author(&self, raw: &str) -> String {
        let cleaned = clean_capture(raw);
        self.stop_words.replace_all(&cleaned, "").trim().to_string()
    }

    fn format_papers(&self, author: &str, papers: &[PaperRecord]) -> String {
        let mut lines = vec![format!(
            "**Surgeon Papers by {}** ({} found):\n",
            author,
            papers.len()
        )];

        for (i, paper) in papers.iter().enumerate() {
            lines.push(format!("{}. **{}**", i + 1, paper.title));
            lines.push(format!("   - **Author:** {}", paper.author_name));
            lines.push(format!("   - **Journal:** {}", paper.journal));
            lines.push(format!("   - **Affiliation:** {}", paper.affiliation));
            if let Some(website) = &paper.website {
                lines.push(format!("   - **Link:** [Affiliation Website]({})", website));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn format_comparisons(
        &self,
        author: &str,
        comparisons: &[RecordComparison],
        unmatched: &[PaperRecord],
    ) -> String {
        let mut lines = vec![format!("**External data check for {}:**\n", author)];

        for comparison in comparisons {
            if !comparison.has_differences() {
                lines.push(format!("- **{}**: in sync", comparison.title));
                continue;
            }

            lines.push(format!("- **{}**:", comparison.title));
            for diff in &comparison.diffs {
                match diff.status {
                    DiffStatus::Missing => lines.push(format!(
                        "   - {}: missing internally (external: \"{}\")",
                        diff.field,
                        diff.external.as_deref().unwrap_or(""),
                    )),
                    DiffStatus::Different => lines.push(format!(
                        "   - {}: internal \"{}\" vs external \"{}\"",
                        diff.field,
                        diff.internal.as_deref().unwrap_or(""),
                        diff.external.as_deref().unwrap_or(""),
                    )),
                }
            }
        }

        for paper in unmatched {
            lines.push(format!("- **{}**: missing from internal", paper.title));
        }

        lines.join("\n")
    }

    fn search_response(&self, author: &str) -> Response {
        let outcome = self.reconciler.search(author);

        if outcome.papers.is_empty() {
            return Response::Text(format!(
                "I couldn't find any surgeon papers for author **{}** in our internal \
                 records. You can {} to check the external reference set.",
                author,
                action_token(FETCH_PAPERS, "fetch external data", author),
            ));
        }

        // Two-part reply: the results, then a standalone action token
        // the caller can send back to continue the workflow
        Response::Messages(vec![
            self.format_papers(author, &outcome.papers),
            action_token(FETCH_PAPERS, "Fetch external data", author),
        ])
    }

    fn fetch_response(&self, author: &str) -> Response {
        match self.reconciler.fetch_external(author) {
            FetchOutcome::NothingExternal => Response::Text(format!(
                "There are no external records for author **{}**.",
                author
            )),
            FetchOutcome::AllNew { external } => Response::Text(format!(
                "{}\nAll {} record(s) are missing from the internal set. You can {}.",
                self.format_papers(author, &external),
                external.len(),
                action_token(UPDATE_PAPERS, "update internal data", author),
            )),
            FetchOutcome::Compared {
                comparisons,
                unmatched,
            } => {
                let listing = self.format_comparisons(author, &comparisons, &unmatched);

                // Only differences on linked records unlock the update
                // step; unmatched titles alone would make it a no-op
                if comparisons.iter().any(|c| c.has_differences()) {
                    Response::Messages(vec![
                        listing,
                        action_token(UPDATE_PAPERS, "Update internal data", author),
                    ])
                } else if unmatched.is_empty() {
                    Response::Text(format!(
                        "Internal records for **{}** already match the external data.",
                        author
                    ))
                } else {
                    Response::Text(listing)
                }
            }
        }
    }

    fn update_response(&self, author: &str) -> Result<Response> {
        let outcome = self.reconciler.update_internal(author)?;

        let text = if outcome.inserted > 0 {
            format!(
                "Imported {} external paper(s) for **{}** into the internal records.",
                outcome.inserted, author
            )
        } else if outcome.updated > 0 {
            format!(
                "Updated {} internal paper(s) for **{}** with external data.",
                outcome.updated, author
            )
        } else {
            format!(
                "Internal records for **{}** are already up to date.",
                author
            )
        };

        Ok(Response::Text(text))
    }
}

#[async_trait]
impl IntentHandler for PaperSyncHandler {
    fn name(&self) -> &'static str {
        "paper-sync"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        if let Some(caps) = self.fetch_token.captures(message) {
            return Some(
                MatchParams::new()
                    .with_token("action", "fetch_external")
                    .with_text("author", clean_capture(&caps[1])),
            );
        }

        if let Some(caps) = self.update_token.captures(message) {
            return Some(
                MatchParams::new()
                    .with_token("action", "update_internal")
                    .with_text("author", clean_capture(&caps[1])),
            );
        }

        let caps = self.pattern.captures(message)?;
        let author = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))?
            .as_str();

        Some(
            MatchParams::new()
                .with_token("action", "search")
                .with_text("author", self.clean_author(author)),
        )
    }

    async fn handle(&self, params: MatchParams) -> Result<Response> {
        let author = params.text("author").unwrap_or("").trim().to_string();
        if author.is_empty() {
            return Ok(Response::Text(
                "Please specify an author name to search for surgeon papers.".into(),
            ));
        }

        let action = match params.token("action") {
            Some("fetch_external") => SyncAction::FetchExternal,
            Some("update_internal") => SyncAction::UpdateInternal,
            _ => SyncAction::Search,
        };
        tracing::info!(author = %author, action = action.label(), "paper workflow step");

        match action {
            SyncAction::Search => Ok(self.search_response(&author)),
            SyncAction::FetchExternal => Ok(self.fetch_response(&author)),
            SyncAction::UpdateInternal => self.update_response(&author),
        }
    }
}
