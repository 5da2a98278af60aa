//! Lexical URL features.
//!
//! Every feature is computed from the URL string alone; nothing is fetched
//! or resolved. Counts are plain substring counts over the raw input, so
//! `http://a.b.c.com` has `nb_dots = 3` whatever the URL means.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::DomainParts;
use crate::error::{DetectError, Result};
use crate::ipv4::parse_legacy_ipv4;
use crate::url_parts::split_url;

/// Words that commonly appear in credential-harvesting URLs.
pub const SUSPICIOUS_WORDS: [&str; 8] = [
    "login", "secure", "account", "update", "verify", "bank", "ebay", "paypal",
];

/// Known URL shortening services, matched as substrings.
pub const SHORTENING_SERVICES: [&str; 9] = [
    "bit.ly",
    "goo.gl",
    "shorte.st",
    "tinyurl",
    "ow.ly",
    "t.co",
    "is.gd",
    "buff.ly",
    "adf.ly",
];

/// Characters whose raw occurrences are counted, with their feature names.
const CHAR_COUNTS: [(&str, char); 11] = [
    ("nb_dots", '.'),
    ("nb_hyphens", '-'),
    ("nb_at", '@'),
    ("nb_qm", '?'),
    ("nb_and", '&'),
    ("nb_eq", '='),
    ("nb_underscore", '_'),
    ("nb_tilde", '~'),
    ("nb_percent", '%'),
    ("nb_slash", '/'),
    ("nb_colon", ':'),
];

/// Named numeric signals for one URL, in extraction order.
///
/// Built fresh per URL and read-only once built. An empty vector means
/// extraction failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector(IndexMap<String, f32>);

impl FeatureVector {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: f32) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Extract features, returning an empty vector if the URL cannot be parsed.
///
/// Callers must treat an empty result as "extraction failed".
pub fn extract_features(url: &str) -> FeatureVector {
    match try_extract_features(url) {
        Ok(features) => features,
        Err(e) => {
            tracing::warn!(url, error = %e, "feature extraction failed");
            FeatureVector::default()
        }
    }
}

/// Extract features, reporting why extraction failed.
pub fn try_extract_features(url: &str) -> Result<FeatureVector> {
    if url.trim().is_empty() {
        return Err(DetectError::Extraction("empty URL".into()));
    }

    let parts = split_url(url)?;
    let hostname = parts.netloc.as_str();
    let lower = url.to_lowercase();
    let length = url.chars().count();

    let mut f = FeatureVector::default();

    f.insert("length_url", length as f32);
    f.insert("length_hostname", hostname.chars().count() as f32);
    for (name, c) in CHAR_COUNTS {
        f.insert(name, url.matches(c).count() as f32);
    }
    f.insert("nb_www", lower.matches("www").count() as f32);
    f.insert(
        "https_token",
        flag(parts.path.contains("https") || hostname.contains("https")),
    );

    let domain = DomainParts::from_url(url);
    f.insert("nb_subdomains", domain.subdomain_count() as f32);
    f.insert("tld_length", domain.suffix.chars().count() as f32);
    f.insert("prefix_suffix", flag(domain.domain.contains('-')));

    let hints = SUSPICIOUS_WORDS
        .iter()
        .filter(|w| lower.contains(*w))
        .count();
    f.insert("phish_hints", hints as f32);

    // Any Unicode digit counts (`٣`, `¹`), not just ASCII.
    let digits = url.chars().filter(|c| c.is_numeric()).count();
    let ratio = if length > 0 {
        digits as f32 / length as f32
    } else {
        0.0
    };
    f.insert("ratio_digits_url", ratio);

    f.insert("ip", flag(parse_legacy_ipv4(hostname).is_some()));
    f.insert(
        "shortening_service",
        flag(SHORTENING_SERVICES.iter().any(|s| url.contains(s))),
    );

    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(url: &str, name: &str) -> f32 {
        extract_features(url)
            .get(name)
            .unwrap_or_else(|| panic!("missing feature {name} for {url}"))
    }

    #[test]
    fn emits_the_full_vocabulary_in_order() {
        let f = extract_features("https://www.example.com/index.html");
        let names: Vec<&str> = f.names().collect();
        assert_eq!(
            names,
            [
                "length_url",
                "length_hostname",
                "nb_dots",
                "nb_hyphens",
                "nb_at",
                "nb_qm",
                "nb_and",
                "nb_eq",
                "nb_underscore",
                "nb_tilde",
                "nb_percent",
                "nb_slash",
                "nb_colon",
                "nb_www",
                "https_token",
                "nb_subdomains",
                "tld_length",
                "prefix_suffix",
                "phish_hints",
                "ratio_digits_url",
                "ip",
                "shortening_service",
            ]
        );
    }

    #[test]
    fn character_counts_are_raw() {
        let url = "http://user@a-b.c_d.com/~x/%20?a=1&b=2";
        let f = extract_features(url);
        assert_eq!(f.get("nb_dots"), Some(2.0));
        assert_eq!(f.get("nb_hyphens"), Some(1.0));
        assert_eq!(f.get("nb_at"), Some(1.0));
        assert_eq!(f.get("nb_qm"), Some(1.0));
        assert_eq!(f.get("nb_and"), Some(1.0));
        assert_eq!(f.get("nb_eq"), Some(2.0));
        assert_eq!(f.get("nb_underscore"), Some(1.0));
        assert_eq!(f.get("nb_tilde"), Some(1.0));
        assert_eq!(f.get("nb_percent"), Some(1.0));
        assert_eq!(f.get("nb_slash"), Some(4.0));
        assert_eq!(f.get("nb_colon"), Some(1.0));
        assert_eq!(f.get("length_url"), Some(url.len() as f32));
        assert_eq!(f.get("length_hostname"), Some("user@a-b.c_d.com".len() as f32));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let f = extract_features("http://exämple.com/");
        assert_eq!(f.get("length_url"), Some(19.0));
        assert_eq!(f.get("length_hostname"), Some(11.0));
    }

    #[test]
    fn www_is_case_insensitive() {
        assert_eq!(feature("http://WWW.wwwexample.com", "nb_www"), 2.0);
    }

    #[test]
    fn https_token_is_a_substring_check() {
        assert_eq!(feature("https://example.com/", "https_token"), 0.0);
        assert_eq!(feature("http://https-example.com/", "https_token"), 1.0);
        assert_eq!(feature("http://example.com/https/login", "https_token"), 1.0);
        assert_eq!(feature("http://example.com/?next=https", "https_token"), 0.0);
        // Path parameters are not part of the path.
        assert_eq!(feature("http://example.com/a;https", "https_token"), 0.0);
    }

    #[test]
    fn prefix_suffix_looks_at_registrable_domain_only() {
        assert_eq!(feature("http://my-bank.com/", "prefix_suffix"), 1.0);
        assert_eq!(feature("http://my-sub.bank.com/a-b", "prefix_suffix"), 0.0);
    }

    #[test]
    fn phish_hints_count_distinct_words() {
        assert_eq!(feature("http://login.example.com/login/LOGIN", "phish_hints"), 1.0);
        assert_eq!(feature("http://example.com/Account/Update", "phish_hints"), 2.0);
        assert_eq!(feature("http://example.com/", "phish_hints"), 0.0);
    }

    #[test]
    fn digit_ratio() {
        assert_eq!(feature("http://a1.com/2", "ratio_digits_url"), 2.0 / 15.0);
        assert_eq!(feature("http://", "ratio_digits_url"), 0.0);
    }

    #[test]
    fn digit_ratio_counts_non_ascii_digits() {
        // Arabic-Indic three and a superscript one.
        assert_eq!(feature("http://a.com/\u{663}\u{b9}", "ratio_digits_url"), 2.0 / 15.0);
    }

    #[test]
    fn ip_flag_uses_the_raw_netloc() {
        assert_eq!(feature("http://0x7f.1/", "ip"), 1.0);
        assert_eq!(feature("http://1.2.3.4:8080/", "ip"), 0.0);
        assert_eq!(feature("1.2.3.4/login", "ip"), 0.0);
    }

    #[test]
    fn suffix_length() {
        assert_eq!(feature("http://example.co.uk/", "tld_length"), 5.0);
        assert_eq!(feature("http://example.invalidtld/", "tld_length"), 0.0);
    }

    #[test]
    fn malformed_urls_fail() {
        assert!(extract_features("").is_empty());
        assert!(extract_features("   ").is_empty());
        assert!(extract_features("http://[::1/").is_empty());
        assert!(matches!(
            try_extract_features("http://[zz]/"),
            Err(DetectError::Extraction(_))
        ));
    }
}
