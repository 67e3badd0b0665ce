//! Chat responses and embedded action tokens
//!
//! A handler answers with either one message or an ordered list of
//! messages. Some messages embed an action token, a markdown link of
//! the form `[label](#kind:parameter)`, which the caller can send
//! back verbatim to trigger the named follow-up workflow step. The
//! token's kind and parameter are a machine contract, not decoration.

use serde::Serialize;

/// Rendered reply to one inbound message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Response {
    Text(String),
    /// Ordered multi-message reply; used when a content message is
    /// followed by a standalone action-token message
    Messages(Vec<String>),
}

impl Response {
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Response::Text(text) => vec![text],
            Response::Messages(messages) => messages,
        }
    }

    /// The primary content message
    pub fn first(&self) -> &str {
        match self {
            Response::Text(text) => text,
            Response::Messages(messages) => messages.first().map(String::as_str).unwrap_or(""),
        }
    }
}

/// Token kind: look up an organization's address
pub const LOOKUP_ADDRESS: &str = "lookup-address";
/// Token kind: fetch external papers for an author
pub const FETCH_PAPERS: &str = "fetch-papers";
/// Token kind: merge external paper data into the internal set
pub const UPDATE_PAPERS: &str = "update-papers";

/// Build an action token link
pub fn action_token(kind: &str, label: &str, parameter: &str) -> String {
    format!("[{}](#{}:{})", label, kind, parameter)
}

/// Wrap an organization name in a link that triggers address lookup
pub fn org_link(name: &str) -> String {
    action_token(LOOKUP_ADDRESS, name, name)
}
