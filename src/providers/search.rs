//! Free-text web search provider (Provider B)
//!
//! Fallback source when the structured registry yields nothing. The
//! provider returns ranked hits; all address/website interpretation
//! happens in the resolve module.

use crate::core::error::{InsightError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One ranked search result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    /// Snippet text shown under the result
    #[serde(default, alias = "snippet")]
    pub body: String,
    #[serde(default, alias = "href")]
    pub url: String,
}

/// Ordered free-text search
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// HTTP client for a JSON-over-GET search endpoint
pub struct HttpSearch {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearch {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SearchProvider for HttpSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let max_results_param = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("max_results", max_results_param.as_str())])
            .send()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InsightError::Provider(format!(
                "search returned status {}",
                response.status()
            )));
        }

        let mut hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))?;
        hits.truncate(max_results);

        tracing::debug!(count = hits.len(), "search returned");
        Ok(hits)
    }
}

/// Provider used when no search endpoint is configured
///
/// Reports no results, which the fallback chain already treats as
/// "this provider contributed nothing".
pub struct DisabledSearch;

#[async_trait]
impl SearchProvider for DisabledSearch {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!(query, "search provider disabled, returning no results");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_accepts_alias_fields() {
        let raw = r#"{"title": "Tyrone Hospital", "snippet": "187 Hospital Drive", "href": "https://www.tyronehospital.org"}"#;
        let hit: SearchHit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.body, "187 Hospital Drive");
        assert_eq!(hit.url, "https://www.tyronehospital.org");
    }

    #[tokio::test]
    async fn test_disabled_search_is_empty() {
        let hits = DisabledSearch.search("anything", 5).await.unwrap();
        assert!(hits.is_empty());
    }
}
