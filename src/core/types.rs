//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Geographic region an organization reports under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    West,
    South,
    Northeast,
    Midwest,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::West => "West",
            Region::South => "South",
            Region::Northeast => "Northeast",
            Region::Midwest => "Midwest",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-letter US state and district codes accepted in parsed addresses
const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// Check whether a token is a valid US state code (case-insensitive)
pub fn is_us_state(code: &str) -> bool {
    let upper = code.to_ascii_uppercase();
    US_STATES.contains(&upper.as_str())
}
