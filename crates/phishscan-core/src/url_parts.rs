//! Raw URL splitting.
//!
//! Nothing here validates or normalizes a URL. Phishing URLs are frequently
//! malformed on purpose, so the splitter only cuts the string into generic
//! components and keeps every byte of the netloc (userinfo and port included).
//! The only rejections are hosts no resolver could use: broken brackets and
//! netlocs that change meaning under NFKC.

use std::net::Ipv6Addr;

use unicode_normalization::UnicodeNormalization;

use crate::error::{DetectError, Result};

/// Label separators treated as a trailing root dot on a host.
const ROOT_DOTS: [char; 4] = ['.', '\u{3002}', '\u{ff0e}', '\u{ff61}'];

/// Schemes whose last path segment may carry `;params`.
const PARAM_SCHEMES: [&str; 15] = [
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

/// Generic components of a URL string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    /// `;params` of the last path segment, for schemes that use them.
    pub params: String,
    pub query: String,
    pub fragment: String,
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// Split a URL into scheme, netloc, path, query and fragment.
///
/// A netloc only exists when the text after the scheme starts with `//`, so
/// `example.com/login` has an empty netloc and a path of `example.com/login`.
pub fn split_url(url: &str) -> Result<UrlParts> {
    let cleaned: String = url
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
        .collect();

    let mut rest = cleaned.as_str();
    let mut scheme = String::new();
    if let Some(i) = rest.find(':') {
        let candidate = &rest[..i];
        if candidate.starts_with(|c: char| c.is_ascii_alphabetic())
            && candidate.chars().all(is_scheme_char)
        {
            scheme = candidate.to_ascii_lowercase();
            rest = &rest[i + 1..];
        }
    }

    let mut netloc = "";
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        netloc = &after[..end];
        rest = &after[end..];
        check_netloc(netloc)?;
    }

    let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    let (path, params) = if PARAM_SCHEMES.contains(&scheme.as_str()) {
        split_params(path)
    } else {
        (path, "")
    };

    Ok(UrlParts {
        scheme,
        netloc: netloc.to_string(),
        path: path.to_string(),
        params: params.to_string(),
        query: query.to_string(),
        fragment: fragment.to_string(),
    })
}

fn invalid_ipv6(netloc: &str) -> DetectError {
    DetectError::Extraction(format!("invalid IPv6 URL: {netloc}"))
}

fn split_params(path: &str) -> (&str, &str) {
    let from = path.rfind('/').unwrap_or(0);
    match path[from..].find(';') {
        Some(i) => (&path[..from + i], &path[from + i + 1..]),
        None => (path, ""),
    }
}

fn check_netloc(netloc: &str) -> Result<()> {
    let open = netloc.contains('[');
    let close = netloc.contains(']');
    if open != close {
        return Err(invalid_ipv6(netloc));
    }
    if open {
        // First `[` anywhere in the netloc, userinfo included.
        let (_, after) = netloc.split_once('[').unwrap_or_default();
        let host = after.split_once(']').map_or(after, |(h, _)| h);
        check_bracketed_host(netloc, host)?;
    }
    check_nfkc(netloc)
}

fn check_bracketed_host(netloc: &str, host: &str) -> Result<()> {
    if let Some(future) = host.strip_prefix('v') {
        let valid = future
            .split_once('.')
            .is_some_and(|(ver, rest)| {
                !ver.is_empty() && ver.chars().all(|c| c.is_ascii_hexdigit()) && !rest.is_empty()
            });
        return if valid { Ok(()) } else { Err(invalid_ipv6(netloc)) };
    }

    let (address, zone) = host.split_once('%').map_or((host, None), |(a, z)| (a, Some(z)));
    if zone.is_some_and(str::is_empty) {
        return Err(invalid_ipv6(netloc));
    }
    // A bracketed IPv4 address is rejected too.
    address
        .parse::<Ipv6Addr>()
        .map(|_| ())
        .map_err(|_| invalid_ipv6(netloc))
}

/// Reject a non-ASCII netloc whose NFKC form gains a URL delimiter.
fn check_nfkc(netloc: &str) -> Result<()> {
    if netloc.is_ascii() {
        return Ok(());
    }

    let stripped: String = netloc
        .chars()
        .filter(|c| !matches!(c, '@' | ':' | '#' | '?'))
        .collect();
    let normalized: String = stripped.nfkc().collect();
    if normalized == stripped {
        return Ok(());
    }

    if normalized.contains(['/', '?', '#', '@', ':']) {
        return Err(DetectError::Extraction(format!(
            "netloc {netloc:?} contains invalid characters under NFKC normalization"
        )));
    }
    Ok(())
}

fn schemeless(url: &str) -> &str {
    match url.find("//") {
        Some(0) => &url[2..],
        Some(i) if i >= 2 && url[..i].ends_with(':') && url[..i - 1].chars().all(is_scheme_char) => {
            &url[i + 2..]
        }
        _ => url,
    }
}

/// Best-effort host of a URL, used for domain decomposition.
///
/// Unlike [`split_url`] this also finds the host of scheme-less input such as
/// `example.com/path`. Userinfo, port and trailing root dots are removed; a
/// bracketed IPv6 host keeps its brackets.
pub fn lenient_netloc(url: &str) -> String {
    let authority = schemeless(url)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let after_userinfo = authority.rsplit('@').next().unwrap_or_default();

    if after_userinfo.starts_with('[') {
        if let Some((inner, _)) = after_userinfo.split_once(']') {
            return format!("{inner}]");
        }
    }

    let host = after_userinfo.split(':').next().unwrap_or_default().trim();
    host.trim_end_matches(ROOT_DOTS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_all_components() {
        let parts = split_url("HTTPS://user:pw@Example.com:8443/a/b?x=1&y=2#frag").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.netloc, "user:pw@Example.com:8443");
        assert_eq!(parts.path, "/a/b");
        assert_eq!(parts.query, "x=1&y=2");
        assert_eq!(parts.fragment, "frag");
    }

    #[test]
    fn scheme_less_input_has_no_netloc() {
        let parts = split_url("example.com/login").unwrap();
        assert_eq!(parts.scheme, "");
        assert_eq!(parts.netloc, "");
        assert_eq!(parts.path, "example.com/login");
    }

    #[test]
    fn host_port_without_scheme_is_read_as_scheme() {
        let parts = split_url("localhost:8080/x").unwrap();
        assert_eq!(parts.scheme, "localhost");
        assert_eq!(parts.path, "8080/x");
    }

    #[test]
    fn scheme_relative_url_has_netloc() {
        let parts = split_url("//cdn.example.org/lib.js").unwrap();
        assert_eq!(parts.netloc, "cdn.example.org");
        assert_eq!(parts.path, "/lib.js");
    }

    #[test]
    fn strips_leading_controls_and_embedded_newlines() {
        let parts = split_url("  \thttp://exa\nmple.com/p").unwrap();
        assert_eq!(parts.scheme, "http");
        assert_eq!(parts.netloc, "example.com");
    }

    #[test]
    fn rejects_unbalanced_brackets() {
        assert!(split_url("http://[::1/x").is_err());
        assert!(split_url("http://::1]/x").is_err());
    }

    #[test]
    fn validates_bracketed_hosts() {
        assert!(split_url("http://[::1]:8080/").is_ok());
        assert!(split_url("http://[fe80::1%eth0]/").is_ok());
        assert!(split_url("http://[v1.fe]/").is_ok());
        assert!(split_url("http://[not-an-ip]/").is_err());
        assert!(split_url("http://[fe80::1%]/").is_err());
    }

    #[test]
    fn bracketed_ipv4_is_rejected() {
        assert!(split_url("http://[1.2.3.4]/").is_err());
        assert!(split_url("http://[::ffff:1.2.3.4]/").is_ok());
    }

    #[test]
    fn brackets_in_userinfo_are_validated() {
        assert!(split_url("http://[a]@example.com/").is_err());
        assert!(split_url("http://[::1]@example.com/").is_ok());
    }

    #[test]
    fn nfkc_delimiters_in_netloc_are_rejected() {
        assert!(matches!(
            split_url("http://evil\u{FF0F}example.com/"),
            Err(DetectError::Extraction(_))
        ));
        assert!(split_url("http://user\u{FF20}example.com/").is_err());
        // Normalizes, but to nothing that splits the URL differently.
        assert!(split_url("http://\u{FF45}xample.com/").is_ok());
        assert!(split_url("http://b\u{FC}cher.de/").is_ok());
    }

    #[test]
    fn params_split_from_web_paths() {
        let parts = split_url("http://example.com/a;x/b;https?q=1").unwrap();
        assert_eq!(parts.path, "/a;x/b");
        assert_eq!(parts.params, "https");
        assert_eq!(parts.query, "q=1");

        let parts = split_url("http://example.com/a;b/c").unwrap();
        assert_eq!(parts.path, "/a;b/c");
        assert_eq!(parts.params, "");

        let parts = split_url("git://example.com/a;b").unwrap();
        assert_eq!(parts.path, "/a;b");
        assert_eq!(parts.params, "");
    }

    #[test]
    fn lenient_netloc_handles_scheme_less_and_userinfo() {
        assert_eq!(lenient_netloc("example.com/login"), "example.com");
        assert_eq!(lenient_netloc("http://me@Example.COM:81/x"), "Example.COM");
        assert_eq!(lenient_netloc("https://www.example.com./"), "www.example.com");
        assert_eq!(lenient_netloc("//a.b.c?q"), "a.b.c");
        assert_eq!(lenient_netloc("http://[::1]:80/"), "[::1]");
        assert_eq!(lenient_netloc(""), "");
    }
}
