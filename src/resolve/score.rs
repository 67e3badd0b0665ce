//! Best-match scoring over registry candidates

use crate::providers::RegistryRecord;
use crate::store::records::AddressUpdate;
use std::collections::HashSet;

/// Score one registry candidate against the queried name
///
/// Exact name match scores 100; substring containment in either
/// direction 50; otherwise 10 points per shared whole word. A candidate
/// in the expected state earns a further 25.
pub fn score_candidate(
    candidate_name: &str,
    candidate_state: &str,
    query: &str,
    expected_state: Option<&str>,
) -> i64 {
    let candidate = candidate_name.to_lowercase();
    let query = query.to_lowercase();

    let mut score = if candidate == query {
        100
    } else if candidate.contains(&query) || query.contains(&candidate) {
        50
    } else {
        let query_words: HashSet<&str> = query.split_whitespace().collect();
        let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();
        query_words.intersection(&candidate_words).count() as i64 * 10
    };

    if let Some(expected) = expected_state {
        if candidate_state.eq_ignore_ascii_case(expected) {
            score += 25;
        }
    }

    score
}

/// Pick the best-scoring candidate and extract its address
///
/// Only a candidate with a positive score is considered, and only when
/// it carries at least a city and a state; ties keep the earlier
/// candidate (registry order). Returns None when nothing qualifies.
pub fn best_registry_match(
    records: &[RegistryRecord],
    query: &str,
    expected_state: Option<&str>,
) -> Option<AddressUpdate> {
    let mut best: Option<(i64, &RegistryRecord)> = None;

    for record in records {
        let score = score_candidate(&record.organization_name, &record.state, query, expected_state);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, record));
        }
    }

    let (score, record) = best?;
    if score <= 0 {
        return None;
    }

    let city = record.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let state = Some(record.state.trim()).filter(|s| !s.is_empty());
    let (city, state) = (city?, state?);

    Some(AddressUpdate {
        address: record
            .address_line
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from),
        city: Some(city.to_string()),
        state: Some(state.to_string()),
        zip_code: record
            .zip_code
            .as_deref()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .map(String::from),
    })
}
