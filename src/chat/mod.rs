//! Chat dispatch pipeline
//!
//! Free text -> matched intent handler -> store reads or workflow ->
//! one or more rendered messages.

pub mod engine;
pub mod handlers;
pub mod params;
pub mod render;
pub mod response;

pub use engine::ChatEngine;
pub use handlers::{build_engine, EngineDeps, IntentHandler};
pub use params::{MatchParams, ParamValue};
pub use response::Response;
