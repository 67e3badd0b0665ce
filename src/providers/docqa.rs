//! Document question-answering collaborator
//!
//! The generative call itself lives outside this crate; the core only
//! needs the contract so one intent can route to it.

use crate::core::error::{InsightError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Answer returned by the document Q&A service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaAnswer {
    pub success: bool,
    pub answer: String,
    /// Document names or excerpts the answer was grounded on
    pub sources: Vec<String>,
    pub error: Option<String>,
}

/// Question answering over the uploaded document corpus
#[async_trait]
pub trait DocumentQa: Send + Sync {
    /// Ask a free-text question, optionally scoped to specific
    /// document ids
    async fn query(&self, question: &str, document_ids: Option<&[String]>) -> Result<QaAnswer>;
}

#[derive(Serialize)]
struct QaRequest<'a> {
    question: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_ids: Option<&'a [String]>,
}

/// HTTP client for a document Q&A endpoint
pub struct HttpDocumentQa {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentQa {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl DocumentQa for HttpDocumentQa {
    async fn query(&self, question: &str, document_ids: Option<&[String]>) -> Result<QaAnswer> {
        let request = QaRequest {
            question,
            document_ids,
        };

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InsightError::Provider(format!(
                "document Q&A returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))
    }
}
