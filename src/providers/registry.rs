//! Structured registry provider (Provider A)
//!
//! Queries a government enrollment dataset over HTTP GET using its
//! filter-parameter syntax: name containment plus an optional
//! state-equality narrowing filter. Records come back as flat JSON
//! objects keyed by upper-case column names.

use crate::core::error::{InsightError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One flat record from the registry dataset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "ORGANIZATION NAME", default)]
    pub organization_name: String,
    #[serde(rename = "ENROLLMENT STATE", default)]
    pub state: String,
    #[serde(rename = "ADDRESS LINE 1", default)]
    pub address_line: Option<String>,
    #[serde(rename = "CITY", default)]
    pub city: Option<String>,
    #[serde(rename = "ZIP CODE", default)]
    pub zip_code: Option<String>,
}

/// Authoritative organization lookup
#[async_trait]
pub trait RegistryProvider: Send + Sync {
    /// Fetch candidate records whose organization name contains `name`,
    /// optionally narrowed to one state
    async fn find_organizations(
        &self,
        name: &str,
        state: Option<&str>,
    ) -> Result<Vec<RegistryRecord>>;
}

/// HTTP client for the registry dataset API
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl HttpRegistry {
    /// Create a client with a bounded request timeout
    ///
    /// # Arguments
    /// * `base_url` - Dataset API endpoint
    /// * `timeout` - Per-request timeout; one slow registry call must
    ///   not stall a chat reply indefinitely
    /// * `max_results` - Candidate cap per lookup
    pub fn new(base_url: String, timeout: Duration, max_results: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            max_results,
        })
    }

    fn build_query(&self, name: &str, state: Option<&str>) -> Vec<(&'static str, String)> {
        let clean_name = name.trim().to_string();

        let mut params = vec![
            (
                "filter[ORGANIZATION NAME][condition][path]",
                "ORGANIZATION NAME".to_string(),
            ),
            (
                "filter[ORGANIZATION NAME][condition][operator]",
                "CONTAINS".to_string(),
            ),
            ("filter[ORGANIZATION NAME][condition][value]", clean_name),
            ("limit", self.max_results.to_string()),
            ("offset", "0".to_string()),
        ];

        if let Some(state) = state {
            params.push((
                "filter[ENROLLMENT STATE][condition][path]",
                "ENROLLMENT STATE".to_string(),
            ));
            params.push((
                "filter[ENROLLMENT STATE][condition][operator]",
                "=".to_string(),
            ));
            params.push((
                "filter[ENROLLMENT STATE][condition][value]",
                state.to_uppercase(),
            ));
        }

        params
    }
}

#[async_trait]
impl RegistryProvider for HttpRegistry {
    async fn find_organizations(
        &self,
        name: &str,
        state: Option<&str>,
    ) -> Result<Vec<RegistryRecord>> {
        let params = self.build_query(name, state);

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(InsightError::Provider(format!(
                "registry returned status {}",
                response.status()
            )));
        }

        let records: Vec<RegistryRecord> = response
            .json()
            .await
            .map_err(|e| InsightError::Provider(e.to_string()))?;

        tracing::debug!(count = records.len(), "registry lookup returned");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_state() {
        let registry = HttpRegistry::new(
            "https://registry.example.com/data".into(),
            Duration::from_secs(15),
            10,
        )
        .unwrap();

        let params = registry.build_query("  Tyrone Hospital ", None);
        assert_eq!(params.len(), 5);
        assert!(params
            .iter()
            .any(|(k, v)| *k == "filter[ORGANIZATION NAME][condition][value]"
                && v == "Tyrone Hospital"));
        assert!(params
            .iter()
            .all(|(k, _)| !k.contains("ENROLLMENT STATE")));
    }

    #[test]
    fn test_query_with_state_uppercased() {
        let registry = HttpRegistry::new(
            "https://registry.example.com/data".into(),
            Duration::from_secs(15),
            10,
        )
        .unwrap();

        let params = registry.build_query("Tyrone Hospital", Some("pa"));
        assert!(params
            .iter()
            .any(|(k, v)| *k == "filter[ENROLLMENT STATE][condition][value]" && v == "PA"));
    }

    #[test]
    fn test_record_deserializes_registry_columns() {
        let raw = r#"{
            "ORGANIZATION NAME": "TYRONE HOSPITAL",
            "ENROLLMENT STATE": "PA",
            "ADDRESS LINE 1": "187 Hospital Drive",
            "CITY": "Tyrone",
            "ZIP CODE": "16686"
        }"#;
        let record: RegistryRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.organization_name, "TYRONE HOSPITAL");
        assert_eq!(record.zip_code.as_deref(), Some("16686"));
    }
}
