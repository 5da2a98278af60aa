use phishscan_core::{extract_features, FeatureLayout};

fn feature(url: &str, name: &str) -> f32 {
    extract_features(url)
        .get(name)
        .unwrap_or_else(|| panic!("{name} missing for {url}"))
}

#[test]
fn digit_ratio_is_zero_without_digits_after_the_scheme() {
    assert_eq!(feature("http://", "ratio_digits_url"), 0.0);
    assert_eq!(feature("https://", "ratio_digits_url"), 0.0);
}

#[test]
fn dot_count_is_a_raw_character_count() {
    assert_eq!(feature("http://a.b.c.com", "nb_dots"), 3.0);
    for url in ["...", "http://x.y/z.html?q=a.b#c.d", "no dots here"] {
        let expected = url.matches('.').count() as f32;
        assert_eq!(feature(url, "nb_dots"), expected, "{url}");
    }
}

#[test]
fn ip_host_with_login_path() {
    let f = extract_features("http://192.168.1.1/login");
    assert_eq!(f.get("ip"), Some(1.0));
    assert!(f.get("phish_hints").unwrap() >= 1.0);
    assert_eq!(f.get("https_token"), Some(0.0));
}

#[test]
fn shortener_is_flagged() {
    assert_eq!(feature("https://bit.ly/abc", "shortening_service"), 1.0);
    assert_eq!(feature("https://example.com/abc", "shortening_service"), 0.0);
}

#[test]
fn brand_lookalike_on_unknown_tld() {
    let f = extract_features("http://secure-login.paypal.com.evil.tld/verify");
    // secure, login, verify and paypal.
    assert_eq!(f.get("phish_hints"), Some(4.0));
    // The hyphen sits in a subdomain label, not in the registrable domain.
    assert_eq!(f.get("prefix_suffix"), Some(0.0));
    assert_eq!(f.get("nb_subdomains"), Some(4.0));
    assert_eq!(f.get("nb_hyphens"), Some(1.0));
}

#[test]
fn alignment_is_idempotent() {
    let layout = FeatureLayout::training();
    let f = extract_features("http://secure-login.paypal.com.evil.tld/verify");
    let first = layout.align(&f);
    let second = layout.align(&f);
    assert_eq!(first, second);
    assert_eq!(first.len(), layout.len());
}

#[test]
fn malformed_input_yields_an_empty_vector() {
    for url in ["", "http://[::1", "http://[garbage]/"] {
        let f = extract_features(url);
        assert!(f.is_empty(), "{url:?} should fail extraction");
    }
}
