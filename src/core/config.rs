//! Engine configuration with documented constants
//!
//! All tunables are collected here with explanations of their purpose
//! and how they interact with each other.

use crate::core::error::{InsightError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the chat engine and its workflows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === ADDRESS CACHE ===
    /// How long a cached organization address stays valid (days)
    ///
    /// An address whose `address_last_updated` is strictly newer than
    /// now minus this window is served from the store without any
    /// provider calls. At exactly this age the address is stale.
    pub address_cache_days: i64,

    // === TOP-N QUERIES ===
    /// Result count used when a "top N" query omits the number
    pub default_top_limit: i64,

    /// Hard cap on "top N" queries
    ///
    /// Oversized requests are clamped, never rejected. The floor is 1.
    pub max_top_limit: i64,

    /// Maximum papers returned per author search, per record set
    pub paper_search_limit: usize,

    // === PROVIDERS ===
    /// Request timeout for the structured registry provider (seconds)
    pub registry_timeout_secs: u64,

    /// Maximum candidate records fetched from the registry per lookup
    pub registry_max_results: usize,

    /// Request timeout for the free-text search provider (seconds)
    pub search_timeout_secs: u64,

    /// Maximum hits scanned from the search provider per query
    pub search_max_results: usize,

    /// Base URL of the structured registry dataset API
    pub registry_url: String,

    /// Base URL of the free-text search API; absent means the fallback
    /// provider is disabled and contributes no results
    pub search_url: Option<String>,

    /// Base URL of the document Q&A collaborator; absent means the
    /// document-question intent is not registered
    pub document_qa_url: Option<String>,

    // === CONTRACT SIMULATION ===
    /// Therapy price (dollars) assumed when a simulation request does
    /// not carry one
    pub default_therapy_price: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            address_cache_days: 90,

            default_top_limit: 5,
            max_top_limit: 20,
            paper_search_limit: 20,

            registry_timeout_secs: 15,
            registry_max_results: 10,
            search_timeout_secs: 10,
            search_max_results: 5,
            registry_url:
                "https://data.cms.gov/data-api/v1/dataset/f6f6505c-e8b0-4d57-b258-e2b94133aaf2/data"
                    .into(),
            search_url: None,
            document_qa_url: None,

            default_therapy_price: 150_000,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig =
            toml::from_str(&raw).map_err(|e| InsightError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.address_cache_days <= 0 {
            return Err(InsightError::Config(format!(
                "address_cache_days ({}) must be positive",
                self.address_cache_days
            )));
        }

        if self.max_top_limit < 1 || self.default_top_limit < 1 {
            return Err(InsightError::Config(
                "top-N limits must be at least 1".into(),
            ));
        }

        if self.default_top_limit > self.max_top_limit {
            return Err(InsightError::Config(format!(
                "default_top_limit ({}) must be <= max_top_limit ({})",
                self.default_top_limit, self.max_top_limit
            )));
        }

        if self.registry_timeout_secs == 0 || self.search_timeout_secs == 0 {
            return Err(InsightError::Config(
                "provider timeouts must be positive".into(),
            ));
        }

        Ok(())
    }
}
