//! Integration tests for the paper reconciliation workflow
//!
//! These tests walk the three-state action machine through the chat
//! engine exactly as a caller would:
//! 1. Free-text author search
//! 2. Re-invocation with the fetch-external action token
//! 3. Re-invocation with the update-internal action token
//! 4. A final search served from the internal set

use caresight::chat::{build_engine, ChatEngine, EngineDeps};
use caresight::core::config::EngineConfig;
use caresight::core::error::Result;
use caresight::providers::{DisabledSearch, RegistryProvider, RegistryRecord};
use caresight::store::{AnalyticsStore, MemoryStore, PaperRecord};
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

fn engine_over(store: Arc<MemoryStore>) -> ChatEngine {
    build_engine(EngineDeps {
        store,
        registry: Arc::new(EmptyRegistry),
        search: Arc::new(DisabledSearch),
        document_qa: None,
        config: EngineConfig::default(),
    })
    .unwrap()
}

fn paper(title: &str, author: &str, email: Option<&str>) -> PaperRecord {
    PaperRecord {
        title: title.into(),
        journal: "J Cardiol".into(),
        author_name: author.into(),
        affiliation: "Ankara University".into(),
        email: email.map(String::from),
        ..Default::default()
    }
}

// ============================================================================
// Full Import Walkthrough
// ============================================================================

/// Scenario: empty internal set, one external record titled "X".
/// fetch_external then update_internal imports exactly one record, and
/// a subsequent search finds it internally.
#[tokio::test]
async fn test_import_walkthrough_via_action_tokens() {
    let store = Arc::new(MemoryStore::new());
    store.insert_external_paper(paper("X", "Kahraman E", None));
    let engine = engine_over(store.clone());

    // Step 1: nothing internal yet; the reply carries the fetch token
    let messages = engine
        .process_message("Find papers by Kahraman E")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("couldn't find any surgeon papers"));
    assert!(messages[0].contains("(#fetch-papers:Kahraman E)"));

    // Step 2: send the token back, as the caller would
    let messages = engine
        .process_message("#fetch-papers:Kahraman E")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("**X**"));
    assert!(messages[0].contains("missing from the internal set"));
    assert!(messages[0].contains("(#update-papers:Kahraman E)"));

    // Step 3: trigger the import
    let messages = engine
        .process_message("#update-papers:Kahraman E")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Imported 1 external paper(s)"));
    assert_eq!(store.internal_paper_count(), 1);

    // Step 4: the search now hits the internal set and answers with
    // the two-part response (content, then a standalone action token)
    let messages = engine
        .process_message("Find papers by Kahraman E")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("**Surgeon Papers by Kahraman E** (1 found)"));
    assert!(messages[0].contains("**X**"));
    assert_eq!(messages[1], "[Fetch external data](#fetch-papers:Kahraman E)");
}

// ============================================================================
// Field Merge Walkthrough
// ============================================================================

/// Scenario: internal record with an empty email, external record with
/// a populated one. The diff reports the email as missing; the update
/// sets exactly that field and leaves everything else untouched.
#[tokio::test]
async fn test_missing_email_merge() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_internal_paper(PaperRecord {
            website: Some("https://internal.example.org".into()),
            ..paper("X", "Sharma R", Some(""))
        })
        .unwrap();
    store.insert_external_paper(paper("X", "Sharma R", Some("a@b.com")));
    let engine = engine_over(store.clone());

    // The diff listing is a two-part response because differences exist
    let messages = engine
        .process_message("#fetch-papers:Sharma R")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("email: missing internally (external: \"a@b.com\")"));
    assert_eq!(messages[1], "[Update internal data](#update-papers:Sharma R)");

    let messages = engine
        .process_message("#update-papers:Sharma R")
        .await
        .unwrap()
        .into_messages();
    assert!(messages[0].contains("Updated 1 internal paper(s)"));

    let papers = store.internal_papers_by_author("Sharma", 20);
    let merged = &papers[0];
    assert_eq!(merged.email.as_deref(), Some("a@b.com"));
    // Untouched fields survive, including internal-only data
    assert_eq!(merged.journal, "J Cardiol");
    assert_eq!(merged.website.as_deref(), Some("https://internal.example.org"));
}

// ============================================================================
// Terminal Outcomes
// ============================================================================

#[tokio::test]
async fn test_fetch_with_no_external_data_is_terminal() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_internal_paper(paper("X", "Nakamura H", None))
        .unwrap();
    let engine = engine_over(store);

    let messages = engine
        .process_message("#fetch-papers:Nakamura H")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("no external records for author **Nakamura H**"));
}

#[tokio::test]
async fn test_in_sync_sets_offer_no_update() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_internal_paper(paper("X", "Nakamura H", Some("n@kyoto.jp")))
        .unwrap();
    store.insert_external_paper(paper("X", "Nakamura H", Some("n@kyoto.jp")));
    let engine = engine_over(store.clone());

    let messages = engine
        .process_message("#fetch-papers:Nakamura H")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("already match"));
    assert!(!messages[0].contains("#update-papers:"));

    // Running the update anyway is a harmless no-op
    let messages = engine
        .process_message("#update-papers:Nakamura H")
        .await
        .unwrap()
        .into_messages();
    assert!(messages[0].contains("already up to date"));
    assert_eq!(store.internal_paper_count(), 1);
}

/// Externally retitled papers stay unlinked: flagged in the listing,
/// never merged, and they alone do not unlock the update step
#[tokio::test]
async fn test_retitled_paper_stays_unlinked() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_internal_paper(paper("X", "Sharma R", None))
        .unwrap();
    store.insert_external_paper(paper("X (revised edition)", "Sharma R", None));
    let engine = engine_over(store.clone());

    let messages = engine
        .process_message("#fetch-papers:Sharma R")
        .await
        .unwrap()
        .into_messages();
    assert_eq!(messages.len(), 1, "unmatched titles alone must not offer the update token");
    assert!(messages[0].contains("**X (revised edition)**: missing from internal"));

    let messages = engine
        .process_message("#update-papers:Sharma R")
        .await
        .unwrap()
        .into_messages();
    assert!(messages[0].contains("already up to date"));
    assert_eq!(store.internal_paper_count(), 1);
}
