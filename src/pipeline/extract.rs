//! Indicator extraction for reputation screening.
//!
//! Pulls candidate domains, IPv4 addresses, and URLs out of raw prompt text.
//! The patterns are intentionally coarse: the domain heuristic also matches
//! IPv4-like and URL-host substrings, and the IPv4 pattern accepts 0-999
//! groups. False positives are tolerated because the reputation oracle
//! independently validates every candidate it is asked about.

use regex::Regex;
use std::sync::OnceLock;

static DOMAIN_REGEX: OnceLock<Regex> = OnceLock::new();
static IP_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

/// The three indicator categories screened by the reputation guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Domain,
    Ip,
    Url,
}

impl IndicatorKind {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Domain => "domain",
            IndicatorKind::Ip => "ip",
            IndicatorKind::Url => "url",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            IndicatorKind::Domain => DOMAIN_REGEX.get_or_init(|| {
                Regex::new(r"\b(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}\b").unwrap()
            }),
            IndicatorKind::Ip => {
                IP_REGEX.get_or_init(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap())
            }
            IndicatorKind::Url => URL_REGEX
                .get_or_init(|| Regex::new(r"https?://(?:[-\w.]|%[\da-fA-F]{2})+").unwrap()),
        }
    }
}

/// Extracts the distinct indicators of one kind from `text`, preserving
/// first-occurrence order. Pure and deterministic; an empty result means the
/// calling guard skips its oracle round-trip entirely.
pub fn extract(text: &str, kind: IndicatorKind) -> Vec<String> {
    let mut seen = Vec::new();
    for found in kind.regex().find_iter(text) {
        let candidate = found.as_str();
        if !seen.iter().any(|existing| existing == candidate) {
            seen.push(candidate.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domains() {
        let found = extract(
            "Contact admin at evil-domain.test or visit sub.example.com",
            IndicatorKind::Domain,
        );
        assert_eq!(found, vec!["evil-domain.test", "sub.example.com"]);
    }

    #[test]
    fn test_extract_domains_deduplicates() {
        let found = extract("example.com and example.com again", IndicatorKind::Domain);
        assert_eq!(found, vec!["example.com"]);
    }

    #[test]
    fn test_extract_ips_without_range_validation() {
        let found = extract("ping 10.0.0.1 then 999.999.999.999", IndicatorKind::Ip);
        assert_eq!(found, vec!["10.0.0.1", "999.999.999.999"]);
    }

    #[test]
    fn test_extract_urls() {
        let found = extract(
            "see http://example.com and https://evil.test today",
            IndicatorKind::Url,
        );
        assert_eq!(found, vec!["http://example.com", "https://evil.test"]);
    }

    #[test]
    fn test_extract_urls_with_percent_encoded_bytes() {
        let found = extract("grab https://evil.test%2Fstage", IndicatorKind::Url);
        assert_eq!(found, vec!["https://evil.test%2Fstage"]);
    }

    #[test]
    fn test_non_http_schemes_ignored() {
        let found = extract("ftp://example.com is not screened", IndicatorKind::Url);
        assert!(found.is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(extract("Hello, how are you?", IndicatorKind::Domain).is_empty());
        assert!(extract("Hello, how are you?", IndicatorKind::Ip).is_empty());
        assert!(extract("Hello, how are you?", IndicatorKind::Url).is_empty());
    }

    #[test]
    fn test_domain_heuristic_also_matches_url_hosts() {
        // Coarse by design: the oracle validates candidates, not the regex.
        let found = extract("fetch https://evil.test/payload", IndicatorKind::Domain);
        assert_eq!(found, vec!["evil.test"]);
    }
}
