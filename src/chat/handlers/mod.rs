//! Intent handlers
//!
//! One handler per supported intent, each pairing a pattern matcher
//! with an execution routine. Handlers receive their collaborators at
//! construction; nothing here reaches for globals.

pub mod contracts;
pub mod doc_qa;
pub mod general;
pub mod org_address;
pub mod papers;
pub mod patients;
pub mod top_orgs;

use crate::chat::engine::ChatEngine;
use crate::chat::params::MatchParams;
use crate::chat::response::Response;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::providers::{DocumentQa, RegistryProvider, SearchProvider};
use crate::reconcile::PaperReconciler;
use crate::resolve::AddressResolver;
use crate::store::AnalyticsStore;
use async_trait::async_trait;
use std::sync::Arc;

/// A recognized intent: a matcher plus its execution routine
#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Decide whether this message belongs to the intent and extract
    /// its parameters. Pure; no side effects.
    fn matches(&self, message: &str) -> Option<MatchParams>;

    /// Execute the intent. Errors propagate to the dispatcher's caller.
    async fn handle(&self, params: MatchParams) -> Result<Response>;
}

/// Trim captured free text: surrounding whitespace plus trailing
/// sentence punctuation
pub(crate) fn clean_capture(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c| matches!(c, '?' | '.' | ',' | '!'))
        .trim_end()
        .to_string()
}

/// Everything the default handler chain needs
pub struct EngineDeps {
    pub store: Arc<dyn AnalyticsStore>,
    pub registry: Arc<dyn RegistryProvider>,
    pub search: Arc<dyn SearchProvider>,
    /// When absent, the document-question intent is not registered
    pub document_qa: Option<Arc<dyn DocumentQa>>,
    pub config: EngineConfig,
}

/// Build the engine with the default handler chain
///
/// Registration order is an invariant: a message is claimed by the
/// first matching handler, so specific matchers must precede the
/// general matchers whose patterns subsume them. The ordering
/// constraints that matter today are commented inline.
pub fn build_engine(deps: EngineDeps) -> Result<ChatEngine> {
    let resolver = AddressResolver::new(
        deps.store.clone(),
        deps.registry,
        deps.search,
        &deps.config,
    )?;
    let reconciler = PaperReconciler::new(deps.store.clone(), deps.config.paper_search_limit);

    let mut handlers: Vec<Box<dyn IntentHandler>> = vec![
        Box::new(top_orgs::TopOrgsHandler::new(deps.store.clone(), &deps.config)?),
        Box::new(org_address::OrgAddressHandler::new(resolver)?),
        Box::new(papers::PaperSyncHandler::new(reconciler)?),
    ];

    // The document-question intent only exists when a collaborator is
    // configured. It sits ahead of the contract handlers so that a
    // document question mentioning contracts is not claimed by them.
    if let Some(qa) = deps.document_qa {
        handlers.push(Box::new(doc_qa::DocQaHandler::new(qa)?));
    }

    // Simulation before templates: the templates pattern is a textual
    // superset of most simulation requests
    handlers.push(Box::new(contracts::ContractSimulationHandler::new(
        deps.store.clone(),
        &deps.config,
    )?));
    handlers.push(Box::new(contracts::ContractTemplatesHandler::new(
        deps.store.clone(),
    )?));
    // Outcomes before stats: the stats pattern matches most outcome
    // questions too
    handlers.push(Box::new(patients::PatientOutcomesHandler::new(
        deps.store.clone(),
    )?));
    handlers.push(Box::new(patients::PatientStatsHandler::new(
        deps.store.clone(),
    )?));

    Ok(ChatEngine::new(handlers, general::GeneralHandler::new()))
}
