//! Caresight - chat-driven analytics insights
//!
//! An intent-routed dispatcher over a healthcare analytics store:
//! free-text questions are matched against an ordered handler chain
//! and answered from typed store reads, an address-resolution workflow
//! with two-provider fallback, and an internal/external paper
//! reconciliation workflow.

pub mod chat;
pub mod core;
pub mod providers;
pub mod reconcile;
pub mod resolve;
pub mod store;
