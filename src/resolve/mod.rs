//! Address resolution workflow
//!
//! Resolves a best-effort mailing address for an organization named in
//! free text: read-through cache on the organization record, staleness
//! check against a fixed retention window, then fallback across two
//! providers (structured registry first, free-text search second) with
//! write-back of whatever wins. A website lookup runs independently so
//! a failed address search can still report a site.

pub mod address;
pub mod score;
pub mod website;

pub use address::AddressPatterns;

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::providers::{RegistryProvider, SearchProvider};
use crate::store::records::{AddressUpdate, OrganizationRecord};
use crate::store::AnalyticsStore;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Whether a cached address is still inside the retention window
///
/// Fresh means `address_last_updated` exists and is strictly newer
/// than `now - max_age`; a record aged exactly `max_age` is stale.
pub fn address_is_fresh(
    record: &OrganizationRecord,
    now: DateTime<Utc>,
    max_age: Duration,
) -> bool {
    match record.address_last_updated {
        Some(updated) => updated > now - max_age,
        None => false,
    }
}

/// Query sent to the search provider when hunting for an address
pub fn build_address_query(name: &str, state: Option<&str>) -> String {
    match state {
        Some(state) => format!("\"{}\" {} hospital address location", name.trim(), state.to_uppercase()),
        None => format!("\"{}\" hospital address location", name.trim()),
    }
}

/// Query sent to the search provider when hunting for a website
pub fn build_website_query(name: &str, state: Option<&str>) -> String {
    match state {
        Some(state) => format!("\"{}\" {} hospital official website", name.trim(), state.to_uppercase()),
        None => format!("\"{}\" hospital official website", name.trim()),
    }
}

/// Terminal result of one resolution request
#[derive(Debug, Clone)]
pub enum AddressOutcome {
    /// No organization matched the queried name
    NotFound { name: String },
    /// The organization exists; its record reflects the best data
    /// available after the workflow ran
    Resolved {
        org: OrganizationRecord,
        /// True when a provider supplied the address on this request
        /// (as opposed to the cache)
        refreshed: bool,
        website: Option<String>,
    },
}

/// Read-through address cache with provider fallback
pub struct AddressResolver {
    store: Arc<dyn AnalyticsStore>,
    registry: Arc<dyn RegistryProvider>,
    search: Arc<dyn SearchProvider>,
    patterns: AddressPatterns,
    cache_max_age: Duration,
    search_max_results: usize,
}

impl AddressResolver {
    pub fn new(
        store: Arc<dyn AnalyticsStore>,
        registry: Arc<dyn RegistryProvider>,
        search: Arc<dyn SearchProvider>,
        config: &EngineConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            registry,
            search,
            patterns: AddressPatterns::compile()?,
            cache_max_age: Duration::days(config.address_cache_days),
            search_max_results: config.search_max_results,
        })
    }

    /// Run the full workflow for a free-text organization name
    ///
    /// Provider failures are logged and treated as "found nothing";
    /// the request always produces an outcome, never an error for a
    /// missing address.
    pub async fn resolve(&self, name: &str) -> Result<AddressOutcome> {
        let Some(mut org) = self.store.org_by_name(name) else {
            tracing::info!(name, "organization not found for address lookup");
            return Ok(AddressOutcome::NotFound {
                name: name.to_string(),
            });
        };

        let now = Utc::now();
        let fresh = org.has_address() && address_is_fresh(&org, now, self.cache_max_age);
        let mut refreshed = false;

        if fresh {
            tracing::info!(org = %org.name, "using cached address");
        } else {
            tracing::info!(org = %org.name, "address stale or absent, querying providers");
            if let Some(update) = self.lookup_address(&org.name, Some(&org.state)).await {
                match self.store.update_org_address(&org.id, &update) {
                    Ok(true) => {
                        apply_update(&mut org, &update, now);
                        refreshed = true;
                    }
                    Ok(false) => {
                        tracing::warn!(org_id = %org.id, "organization vanished before address write-back")
                    }
                    Err(e) => {
                        tracing::warn!(org_id = %org.id, error = %e, "failed to persist resolved address")
                    }
                }
            } else {
                tracing::warn!(org = %org.name, "no provider produced an address");
            }
        }

        // Website lookup runs regardless of how the address fared
        let website = self.lookup_website(&org.name, Some(&org.state)).await;

        Ok(AddressOutcome::Resolved {
            org,
            refreshed,
            website,
        })
    }

    /// Provider fallback chain: registry first, then free-text search
    async fn lookup_address(&self, name: &str, state: Option<&str>) -> Option<AddressUpdate> {
        match self.registry.find_organizations(name, state).await {
            Ok(records) => {
                if let Some(update) = score::best_registry_match(&records, name, state) {
                    tracing::info!(org = name, "address found via registry");
                    return Some(update);
                }
                tracing::info!(org = name, "registry had no usable candidate, trying web search");
            }
            Err(e) => {
                tracing::warn!(org = name, error = %e, "registry lookup failed, trying web search")
            }
        }

        let query = build_address_query(name, state);
        match self.search.search(&query, self.search_max_results).await {
            Ok(hits) => {
                let update = address::parse_address_from_hits(&self.patterns, &hits, state);
                if update.is_some() {
                    tracing::info!(org = name, "address found via web search");
                }
                update
            }
            Err(e) => {
                tracing::error!(org = name, error = %e, "web search failed");
                None
            }
        }
    }

    async fn lookup_website(&self, name: &str, state: Option<&str>) -> Option<String> {
        let query = build_website_query(name, state);
        match self.search.search(&query, self.search_max_results).await {
            Ok(hits) => website::pick_official_url(&hits, name),
            Err(e) => {
                tracing::error!(org = name, error = %e, "website search failed");
                None
            }
        }
    }
}

fn apply_update(org: &mut OrganizationRecord, update: &AddressUpdate, now: DateTime<Utc>) {
    if let Some(address) = &update.address {
        org.address = Some(address.clone());
    }
    if let Some(city) = &update.city {
        org.city = Some(city.clone());
    }
    if let Some(state) = &update.state {
        org.state = state.to_uppercase();
    }
    if let Some(zip_code) = &update.zip_code {
        org.zip_code = Some(zip_code.clone());
    }
    org.address_last_updated = Some(now);
}
