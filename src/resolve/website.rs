//! Official-website selection from search results

use crate::providers::SearchHit;

/// Domains that host pages about an organization without being the
/// organization
const BLOCKED_DOMAINS: [&str; 8] = [
    "facebook.com",
    "twitter.com",
    "linkedin.com",
    "wikipedia.org",
    "yelp.com",
    "healthgrades.com",
    "vitals.com",
    "google.com",
];

/// Pick the most likely official website URL from ranked hits
///
/// Candidates from blocked domains are discarded; the rest are scored
/// by rank position, a name token appearing in the domain, preferred
/// top-level domain (.org over .edu over .com), and the organization
/// name appearing in the result title. The winner's query string is
/// stripped.
pub fn pick_official_url(hits: &[SearchHit], org_name: &str) -> Option<String> {
    let name_lower = org_name.to_lowercase();
    let name_tokens: Vec<String> = name_lower
        .split_whitespace()
        .map(|t| t.replace('-', ""))
        .filter(|t| t.len() > 3)
        .collect();

    let mut best: Option<(i64, &str)> = None;

    for (rank, hit) in hits.iter().enumerate() {
        let url = hit.url.as_str();
        if !url.starts_with("http") {
            continue;
        }

        let url_lower = url.to_lowercase();
        if BLOCKED_DOMAINS.iter().any(|d| url_lower.contains(d)) {
            continue;
        }

        let Some(domain) = url_lower.split('/').nth(2) else {
            continue;
        };

        // Earlier results are usually the more authoritative ones
        let mut score = (10 - rank as i64) * 10;

        if name_tokens.iter().any(|t| domain.contains(t.as_str())) {
            score += 50;
        }

        if domain.ends_with(".org") {
            score += 30;
        } else if domain.ends_with(".edu") {
            score += 25;
        } else if domain.ends_with(".com") {
            score += 20;
        }

        if hit.title.to_lowercase().contains(&name_lower) {
            score += 20;
        }

        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, url));
        }
    }

    let (_, url) = best?;
    Some(url.split('?').next().unwrap_or(url).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str, url: &str) -> SearchHit {
        SearchHit {
            title: title.into(),
            body: String::new(),
            url: url.into(),
        }
    }

    #[test]
    fn test_blocked_domains_skipped() {
        let hits = vec![
            hit("Tyrone Hospital - Facebook", "https://facebook.com/tyronehospital"),
            hit("Tyrone Hospital", "https://www.tyronehospital.org/"),
        ];
        let url = pick_official_url(&hits, "Tyrone Hospital").unwrap();
        assert_eq!(url, "https://www.tyronehospital.org/");
    }

    #[test]
    fn test_name_in_domain_beats_rank() {
        let hits = vec![
            hit("Hospital directory", "https://hospitals.example.net/listing"),
            hit("Tyrone Hospital | Home", "https://www.tyronehospital.org/"),
        ];
        let url = pick_official_url(&hits, "Tyrone Hospital").unwrap();
        assert_eq!(url, "https://www.tyronehospital.org/");
    }

    #[test]
    fn test_query_string_stripped() {
        let hits = vec![hit(
            "Tyrone Hospital",
            "https://www.tyronehospital.org/home?utm_source=search",
        )];
        let url = pick_official_url(&hits, "Tyrone Hospital").unwrap();
        assert_eq!(url, "https://www.tyronehospital.org/home");
    }

    #[test]
    fn test_non_http_and_empty_yield_none() {
        let hits = vec![hit("Tyrone Hospital", "ftp://archive.example.org")];
        assert!(pick_official_url(&hits, "Tyrone Hospital").is_none());
        assert!(pick_official_url(&[], "Tyrone Hospital").is_none());
    }
}
