//! Organization address lookup intent

use crate::chat::handlers::{clean_capture, IntentHandler};
use crate::chat::params::MatchParams;
use crate::chat::response::Response;
use crate::core::error::Result;
use crate::resolve::{AddressOutcome, AddressResolver};
use crate::store::OrganizationRecord;
use async_trait::async_trait;
use regex::Regex;

/// Resolves a mailing address for an organization named in free text
///
/// Matches queries like "What is the address of Memorial Hospital?",
/// "Where is Tyrone Hospital located?", "Find address for City Medical
/// Center", plus the raw `#lookup-address:` action token emitted by
/// other handlers.
pub struct OrgAddressHandler {
    resolver: AddressResolver,
    token: Regex,
    pattern: Regex,
}

impl OrgAddressHandler {
    pub fn new(resolver: AddressResolver) -> Result<Self> {
        Ok(Self {
            resolver,
            token: Regex::new(r"#lookup-address:([^)\n]+)")?,
            pattern: Regex::new(
                r"(?i)(?:what\s+is\s+the\s+)?(?:address|location)(?:\s+of|\s+for)?\s+(.+?)(?:\?|$)|(?:where\s+is)\s+(.+?)\s+(?:located|address)(?:\?|$)|(?:find|get|show)\s+(?:the\s+)?address\s+(?:of|for)\s+(.+?)(?:\?|$)",
            )?,
        })
    }

    fn format_response(
        &self,
        org: &OrganizationRecord,
        refreshed: bool,
        website: Option<&str>,
    ) -> String {
        if !org.has_address() {
            let mut response = format!(
                "I couldn't find address information for **{}**. The address may not \
                 be publicly available or the HCO name might need verification.",
                org.name
            );
            if let Some(url) = website {
                response.push_str(&format!("\n\n🌐 **Website:** {}", url));
            }
            return response;
        }

        let mut lines = vec![format!("**Address for {}:**\n", org.name)];

        if let Some(address) = &org.address {
            lines.push(format!("📍 {}", address));
        }

        let mut location_parts = Vec::new();
        if let Some(city) = &org.city {
            location_parts.push(city.clone());
        }
        location_parts.push(org.state.clone());
        if let Some(zip_code) = &org.zip_code {
            location_parts.push(zip_code.clone());
        }
        lines.push(format!("   {}", location_parts.join(", ")));

        if let Some(url) = website {
            lines.push(format!("\n🌐 **Website:** {}", url));
        }

        if refreshed {
            lines.push("\n*Address found via registry/web search and cached for future queries.*".into());
        } else {
            lines.push("\n*Address retrieved from database.*".into());
        }

        lines.join("\n")
    }
}

#[async_trait]
impl IntentHandler for OrgAddressHandler {
    fn name(&self) -> &'static str {
        "org-address"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        if let Some(caps) = self.token.captures(message) {
            return Some(MatchParams::new().with_text("name", clean_capture(&caps[1])));
        }

        let caps = self.pattern.captures(message)?;
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))?
            .as_str();
        let name = clean_capture(name);
        if name.is_empty() {
            return None;
        }

        Some(MatchParams::new().with_text("name", name))
    }

    async fn handle(&self, params: MatchParams) -> Result<Response> {
        let name = params.text("name").unwrap_or("").trim();
        if name.is_empty() {
            return Ok(Response::Text(
                "Please specify an HCO name to look up the address.".into(),
            ));
        }

        tracing::info!(name, "address lookup requested");

        match self.resolver.resolve(name).await? {
            AddressOutcome::NotFound { name } => Ok(Response::Text(format!(
                "I couldn't find an HCO named **{}** in our database. Please check \
                 the name and try again, or ask me to show you the top HCOs.",
                name
            ))),
            AddressOutcome::Resolved {
                org,
                refreshed,
                website,
            } => Ok(Response::Text(self.format_response(
                &org,
                refreshed,
                website.as_deref(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::providers::{DisabledSearch, RegistryProvider, RegistryRecord};
    use crate::store::{AnalyticsStore, MemoryStore};
    use std::sync::Arc;

    struct EmptyRegistry;

    #[async_trait]
    impl RegistryProvider for EmptyRegistry {
        async fn find_organizations(
            &self,
            _name: &str,
            _state: Option<&str>,
        ) -> Result<Vec<RegistryRecord>> {
            Ok(Vec::new())
        }
    }

    fn handler() -> OrgAddressHandler {
        let resolver = AddressResolver::new(
            Arc::new(MemoryStore::new()) as Arc<dyn AnalyticsStore>,
            Arc::new(EmptyRegistry),
            Arc::new(DisabledSearch),
            &EngineConfig::default(),
        )
        .unwrap();
        OrgAddressHandler::new(resolver).unwrap()
    }

    #[test]
    fn test_matches_question_forms() {
        let handler = handler();

        let params = handler
            .matches("What is the address of Memorial Hospital?")
            .unwrap();
        assert_eq!(params.text("name"), Some("Memorial Hospital"));

        let params = handler.matches("Where is Tyrone Hospital located?").unwrap();
        assert_eq!(params.text("name"), Some("Tyrone Hospital"));

        let params = handler
            .matches("find address for City Medical Center")
            .unwrap();
        assert_eq!(params.text("name"), Some("City Medical Center"));
    }

    #[test]
    fn test_matches_action_token() {
        let handler = handler();
        let params = handler
            .matches("[Memorial Hospital](#lookup-address:Memorial Hospital)")
            .unwrap();
        assert_eq!(params.text("name"), Some("Memorial Hospital"));
    }

    #[test]
    fn test_unrelated_message_ignored() {
        assert!(handler().matches("top 5 hcos ghost patients").is_none());
        assert!(handler().matches("hello there").is_none());
    }

    #[tokio::test]
    async fn test_unknown_org_renders_not_found() {
        let handler = handler();
        let params = handler
            .matches("What is the address of Lakeside Clinic?")
            .unwrap();
        let response = handler.handle(params).await.unwrap();
        assert!(response.first().contains("couldn't find an HCO named **Lakeside Clinic**"));
    }
}
