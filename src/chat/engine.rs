//! Intent-routed message dispatch

use crate::chat::handlers::general::GeneralHandler;
use crate::chat::handlers::IntentHandler;
use crate::chat::response::Response;
use crate::core::error::Result;

/// Routes each inbound message to the first intent handler whose
/// matcher accepts it
///
/// Handlers are evaluated strictly in registration order and the first
/// match wins; later handlers are never consulted for that message.
/// The order is therefore an invariant: specific matchers must be
/// registered before the general matchers whose patterns subsume them.
/// A message no handler claims goes to the fallback handler.
pub struct ChatEngine {
    handlers: Vec<Box<dyn IntentHandler>>,
    fallback: GeneralHandler,
}

impl ChatEngine {
    pub fn new(handlers: Vec<Box<dyn IntentHandler>>, fallback: GeneralHandler) -> Self {
        Self { handlers, fallback }
    }

    /// Process one user message and produce a reply
    ///
    /// Errors raised by the matched handler propagate unmodified; the
    /// engine performs no retry or recovery.
    pub async fn process_message(&self, message: &str) -> Result<Response> {
        for handler in &self.handlers {
            if let Some(params) = handler.matches(message) {
                tracing::debug!(handler = handler.name(), "intent matched");
                return handler.handle(params).await;
            }
        }

        tracing::debug!("no intent matched, using general handler");
        Ok(self.fallback.reply(message))
    }

    /// Append a handler at the end of the evaluation order (lowest
    /// priority)
    pub fn register_handler(&mut self, handler: Box<dyn IntentHandler>) {
        tracing::info!(handler = handler.name(), "registering intent handler");
        self.handlers.push(handler);
    }

    /// Registered handler names in evaluation order
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}
