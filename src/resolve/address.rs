//! Address extraction from free-text search results
//!
//! Search snippets are scanned with three address-shaped patterns in
//! priority order: a full street/city/state/zip line, a street+zip
//! line with city/state appearing nearby, and a bare city/state
//! mention. Every extracted state token is validated against the US
//! state-code set before the match is accepted.

use crate::core::error::Result;
use crate::core::types::is_us_state;
use crate::providers::SearchHit;
use crate::store::records::AddressUpdate;
use regex::Regex;

/// Compiled address patterns, built once per resolver
pub struct AddressPatterns {
    /// "123 Main St, Los Angeles, CA 90015"
    full: Regex,
    /// "123 Main Street 90015"
    street_zip: Regex,
    /// "Los Angeles, CA"
    city_state: Regex,
    /// "located in Los Angeles, CA" / "address: Los Angeles, CA"
    city_state_ctx: Regex,
}

impl AddressPatterns {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            full: Regex::new(
                r"(?i)(\d+\s+[A-Za-z0-9\s,\.]+?),\s*([A-Za-z\s]+),\s*([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)",
            )?,
            street_zip: Regex::new(r"(?i)(\d+\s+[A-Za-z0-9\s,\.]+?)\s+(\d{5}(?:-\d{4})?)")?,
            city_state: Regex::new(r"(?i)([A-Za-z\s]+),\s*([A-Za-z]{2})")?,
            city_state_ctx: Regex::new(
                r"(?i)(?:located\s+in|address[:\s]+|in\s+)([A-Za-z\s]+),\s*([A-Za-z]{2})",
            )?,
        })
    }

    /// Extract address components from one blob of result text
    pub fn extract(&self, text: &str, expected_state: Option<&str>) -> Option<AddressUpdate> {
        // Priority 1: full street, city, state, zip
        if let Some(caps) = self.full.captures(text) {
            let state = caps[3].to_uppercase();
            if is_us_state(&state) {
                if let Some(expected) = expected_state {
                    if !state.eq_ignore_ascii_case(expected) {
                        tracing::debug!(found = %state, expected, "state mismatch in parsed address");
                    }
                }
                return Some(AddressUpdate {
                    address: Some(caps[1].trim().to_string()),
                    city: Some(caps[2].trim().to_string()),
                    state: Some(state),
                    zip_code: Some(caps[4].to_string()),
                });
            }
        }

        // Priority 2: street + zip, with city/state somewhere nearby
        if let Some(caps) = self.street_zip.captures(text) {
            let street = caps[1].trim().to_string();
            let zip_code = caps[2].to_string();

            if let Some(city_caps) = self.city_state.captures(text) {
                let state = city_caps[2].to_uppercase();
                if is_us_state(&state) {
                    return Some(AddressUpdate {
                        address: Some(street),
                        city: Some(city_caps[1].trim().to_string()),
                        state: Some(state),
                        zip_code: Some(zip_code),
                    });
                }
            }
        }

        // Priority 3: bare city/state with a locating cue
        if let Some(caps) = self.city_state_ctx.captures(text) {
            let state = caps[2].to_uppercase();
            if is_us_state(&state) {
                return Some(AddressUpdate {
                    address: None,
                    city: Some(caps[1].trim().to_string()),
                    state: Some(state),
                    zip_code: None,
                });
            }
        }

        None
    }
}

/// Scan ranked hits and return the first extractable address
pub fn parse_address_from_hits(
    patterns: &AddressPatterns,
    hits: &[SearchHit],
    expected_state: Option<&str>,
) -> Option<AddressUpdate> {
    for hit in hits {
        let text = format!("{} {} {}", hit.title, hit.body, hit.url);
        if let Some(update) = patterns.extract(&text, expected_state) {
            return Some(update);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> AddressPatterns {
        AddressPatterns::compile().unwrap()
    }

    #[test]
    fn test_full_address_extracted() {
        let update = patterns()
            .extract("Visit us at 123 Health Way, Los Angeles, CA 90015 today", Some("CA"))
            .unwrap();
        assert_eq!(update.address.as_deref(), Some("123 Health Way"));
        assert_eq!(update.city.as_deref(), Some("Los Angeles"));
        assert_eq!(update.state.as_deref(), Some("CA"));
        assert_eq!(update.zip_code.as_deref(), Some("90015"));
    }

    #[test]
    fn test_extended_zip_accepted() {
        let update = patterns()
            .extract("187 Hospital Drive, Tyrone, PA 16686-1234", None)
            .unwrap();
        assert_eq!(update.zip_code.as_deref(), Some("16686-1234"));
    }

    #[test]
    fn test_invalid_state_rejected() {
        assert!(patterns()
            .extract("123 Main St, Springfield, ZZ 12345", None)
            .is_none());
    }

    #[test]
    fn test_street_zip_with_nearby_city_state() {
        let update = patterns()
            .extract("Tyrone Hospital 187 Hospital Drive 16686. Tyrone, PA campus map", None)
            .unwrap();
        assert_eq!(update.zip_code.as_deref(), Some("16686"));
        assert_eq!(update.state.as_deref(), Some("PA"));
    }

    #[test]
    fn test_bare_city_state_is_partial() {
        let update = patterns()
            .extract("The facility is located in Tyrone, PA near the river", None)
            .unwrap();
        assert!(update.address.is_none());
        assert!(update.zip_code.is_none());
        assert_eq!(update.city.as_deref(), Some("Tyrone"));
        assert_eq!(update.state.as_deref(), Some("PA"));
    }

    #[test]
    fn test_plain_prose_yields_nothing() {
        assert!(patterns()
            .extract("Quality care for the whole family since 1952", None)
            .is_none());
    }

    #[test]
    fn test_first_hit_with_address_wins() {
        let hits = vec![
            SearchHit {
                title: "About us".into(),
                body: "Award-winning care".into(),
                url: "https://example.org".into(),
            },
            SearchHit {
                title: "Contact".into(),
                body: "123 Health Way, Los Angeles, CA 90015".into(),
                url: "https://example.org/contact".into(),
            },
        ];
        let update = parse_address_from_hits(&patterns(), &hits, None).unwrap();
        assert_eq!(update.city.as_deref(), Some("Los Angeles"));
    }
}
