//! Parameters extracted by intent matchers

use std::collections::HashMap;

/// One extracted parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Free text captured from the message (already trimmed)
    Text(String),
    Int(i64),
    /// One value from a matcher's fixed token set
    Token(&'static str),
}

/// Named parameters handed from a matcher to its handler
///
/// Consumed immediately by the matched handler; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchParams {
    values: HashMap<&'static str, ParamValue>,
}

impl MatchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, ParamValue::Text(value.into()));
        self
    }

    pub fn with_int(mut self, key: &'static str, value: i64) -> Self {
        self.values.insert(key, ParamValue::Int(value));
        self
    }

    pub fn with_token(mut self, key: &'static str, value: &'static str) -> Self {
        self.values.insert(key, ParamValue::Token(value));
        self
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ParamValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ParamValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn token(&self, key: &str) -> Option<&'static str> {
        match self.values.get(key) {
            Some(ParamValue::Token(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
