//! Integration tests for the chat dispatch layer
//!
//! These tests verify the full engine wiring:
//! - First-match-wins ordering across overlapping matchers
//! - The documented specific-before-general registration order
//! - Fallback to the general handler
//! - Dynamic registration of the document Q&A intent
//! - Error propagation from a matched handler

use caresight::chat::{build_engine, ChatEngine, EngineDeps, IntentHandler, MatchParams, Response};
use caresight::core::config::EngineConfig;
use caresight::core::error::{InsightError, Result};
use caresight::core::types::Region;
use caresight::providers::{DisabledSearch, DocumentQa, QaAnswer, RegistryProvider, RegistryRecord};
use caresight::store::{
    ContractTemplate, MemoryStore, OrganizationRecord, OutcomeType, PatientSummary,
};
use async_trait::async_trait;
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

struct CannedQa;

#[async_trait]
impl DocumentQa for CannedQa {
    async fn query(&self, _question: &str, _ids: Option<&[String]>) -> Result<QaAnswer> {
        Ok(QaAnswer {
            success: true,
            answer: "The protocol requires weight-based dosing.".into(),
            sources: vec!["protocol.pdf".into()],
            error: None,
        })
    }
}

fn org(id: &str, name: &str, state: &str, region: Region, ghost: u64) -> OrganizationRecord {
    OrganizationRecord {
        id: id.into(),
        name: name.into(),
        state: state.into(),
        region,
        treated_patients: ghost * 3,
        ghost_patients: ghost,
        address: None,
        city: None,
        zip_code: None,
        address_last_updated: None,
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert_org(org("HCO-001", "Memorial Hospital", "CA", Region::West, 1250));
    store.insert_org(org("HCO-002", "City Medical Center", "NY", Region::Northeast, 980));
    store.insert_org(org("HCO-003", "Regional Health System", "TX", Region::South, 875));
    store.insert_org(org("HCO-004", "Lakeside Clinic", "IL", Region::Midwest, 640));

    store.insert_template(ContractTemplate {
        template_id: "toxicity-30d".into(),
        name: "30-Day Toxicity".into(),
        outcome_type: OutcomeType::Toxicity,
        default_rebate_percent: 30,
        default_time_window: 1,
    });

    store.set_patient_summary(PatientSummary {
        total_patients: 2000,
        avg_age: 67,
        male_percent: 58,
        avg_prior_lines: 3.2,
        toxicity_count: 240,
        event_12m_count: 500,
        retreatment_18m_count: 160,
        ..Default::default()
    });

    store
}

fn engine(document_qa: Option<Arc<dyn DocumentQa>>) -> ChatEngine {
    build_engine(EngineDeps {
        store: seeded_store(),
        registry: Arc::new(EmptyRegistry),
        search: Arc::new(DisabledSearch),
        document_qa,
        config: EngineConfig::default(),
    })
    .unwrap()
}

// ============================================================================
// Ordering Tests
// ============================================================================

/// A message matching both the simulation and the templates matcher
/// must be claimed by the simulation handler (registered earlier)
#[tokio::test]
async fn test_simulation_claims_message_before_templates() {
    let engine = engine(None);

    let response = engine
        .process_message("what is the expected rebate for the toxicity contract")
        .await
        .unwrap();

    assert!(
        response.first().contains("**Contract Simulation: 30-Day Toxicity**"),
        "expected a simulation reply, got: {}",
        response.first()
    );
}

/// A message matching both the outcomes and the stats matcher must be
/// claimed by the outcomes handler (registered earlier)
#[tokio::test]
async fn test_outcomes_claims_message_before_stats() {
    let engine = engine(None);

    let response = engine
        .process_message("patient toxicity event counts and statistics")
        .await
        .unwrap();

    assert!(
        response.first().contains("**Patient Outcome Statistics**"),
        "expected an outcomes reply, got: {}",
        response.first()
    );
}

// ============================================================================
// Scenario Tests
// ============================================================================

/// "top 3 HCOs with highest ghost patients" lists exactly 3 entries
/// in descending ghost-count order
#[tokio::test]
async fn test_top_three_orgs_scenario() {
    let engine = engine(None);

    let response = engine
        .process_message("top 3 HCOs with highest ghost patients")
        .await
        .unwrap();
    let text = response.first().to_string();

    assert!(text.starts_with("Here are the top 3 HCOs"));
    let memorial = text.find("Memorial Hospital").expect("first entry");
    let city = text.find("City Medical Center").expect("second entry");
    let regional = text.find("Regional Health System").expect("third entry");
    assert!(memorial < city && city < regional);
    assert!(!text.contains("Lakeside Clinic"), "limit must cut at 3");
}

#[tokio::test]
async fn test_oversized_top_request_is_clamped() {
    let engine = engine(None);

    let response = engine
        .process_message("top 500 hcos ghost patients")
        .await
        .unwrap();

    // Only 4 organizations exist; the clamp to 20 must not reject
    assert!(response.first().starts_with("Here are the top 4 HCOs"));
}

#[tokio::test]
async fn test_unmatched_message_falls_back() {
    let engine = engine(None);

    let response = engine.process_message("hello").await.unwrap();
    assert!(response.first().contains("How can I assist"));

    let response = engine.process_message("tell me a story").await.unwrap();
    assert!(response.first().starts_with("I understand."));
}

// ============================================================================
// Dynamic Registration Tests
// ============================================================================

#[tokio::test]
async fn test_document_intent_absent_without_collaborator() {
    let engine = engine(None);

    let response = engine
        .process_message("according to the documents, how is dosing set?")
        .await
        .unwrap();

    // No document handler registered: the general fallback answers
    assert!(response.first().starts_with("I understand."));
}

#[tokio::test]
async fn test_document_intent_registered_with_collaborator() {
    let engine = engine(Some(Arc::new(CannedQa)));

    let response = engine
        .process_message("according to the documents, how is dosing set?")
        .await
        .unwrap();

    assert!(response.first().contains("weight-based dosing"));
    assert!(response.first().contains("**Sources:** protocol.pdf"));
}

/// A document question that happens to mention contracts belongs to
/// the document intent, which sits ahead of the contract handlers
#[tokio::test]
async fn test_document_intent_precedes_contract_handlers() {
    let engine = engine(Some(Arc::new(CannedQa)));

    let response = engine
        .process_message("what do the reports say about contract terms?")
        .await
        .unwrap();

    assert!(response.first().contains("weight-based dosing"));
}

// ============================================================================
// Error Propagation Tests
// ============================================================================

struct ExplodingHandler;

#[async_trait]
impl IntentHandler for ExplodingHandler {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn matches(&self, message: &str) -> Option<MatchParams> {
        message.contains("explode").then(MatchParams::new)
    }

    async fn handle(&self, _params: MatchParams) -> Result<Response> {
        Err(InsightError::Store("simulated store outage".into()))
    }
}

/// An unexpected handler error reaches the caller unmodified; the
/// engine neither retries nor swallows
#[tokio::test]
async fn test_handler_error_propagates() {
    let mut engine = engine(None);
    engine.register_handler(Box::new(ExplodingHandler));

    let err = engine.process_message("please explode").await.unwrap_err();
    assert!(matches!(err, InsightError::Store(_)));
}
