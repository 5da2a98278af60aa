//! Registrable-domain decomposition against the public suffix list.
//!
//! `secure.paypal.co.uk` splits into subdomain `secure`, domain `paypal` and
//! suffix `co.uk`. Only ICANN suffixes count: `user.github.io` is subdomain
//! `user`, domain `github`, suffix `io`. Hosts under an unknown TLD get an
//! empty suffix, so their last label is the domain.

use std::net::Ipv6Addr;

use psl::Type;

use crate::url_parts::lenient_netloc;

const DOT_VARIANTS: [char; 3] = ['\u{3002}', '\u{ff0e}', '\u{ff61}'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
}

impl DomainParts {
    /// Decompose the host of a (possibly scheme-less) URL.
    pub fn from_url(url: &str) -> Self {
        Self::from_host(&lenient_netloc(url))
    }

    pub fn from_host(host: &str) -> Self {
        let host = host.replace(DOT_VARIANTS, ".");

        if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            if inner.parse::<Ipv6Addr>().is_ok() {
                return Self::literal(host);
            }
        }

        let labels: Vec<&str> = host.split('.').collect();
        let suffix_labels = icann_suffix_labels(&host.to_ascii_lowercase());
        let suffix_index = labels.len().saturating_sub(suffix_labels);

        if suffix_labels == 0 && looks_like_ipv4(&labels) {
            return Self::literal(host);
        }

        let subdomain = if suffix_index >= 2 {
            labels[..suffix_index - 1].join(".")
        } else {
            String::new()
        };
        let domain = match suffix_index {
            0 => String::new(),
            i => labels[i - 1].to_string(),
        };

        Self {
            subdomain,
            domain,
            suffix: labels[suffix_index..].join("."),
        }
    }

    fn literal(host: String) -> Self {
        Self {
            domain: host,
            ..Self::default()
        }
    }

    pub fn subdomain_count(&self) -> usize {
        if self.subdomain.is_empty() {
            0
        } else {
            self.subdomain.split('.').count()
        }
    }

}

/// Four dotted octets of one to three ASCII digits, each at most 255.
/// Leading zeros are fine (`010.1.1.1`).
fn looks_like_ipv4(labels: &[&str]) -> bool {
    labels.len() == 4
        && labels.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().is_ok_and(|v| v <= 255)
        })
}

/// Number of trailing labels covered by the longest ICANN suffix rule.
fn icann_suffix_labels(host: &str) -> usize {
    let mut candidate = host;
    loop {
        let Some(suffix) = psl::suffix(candidate.as_bytes()) else {
            return 0;
        };
        let Ok(text) = std::str::from_utf8(suffix.as_bytes()) else {
            return 0;
        };
        match suffix.typ() {
            Some(Type::Icann) => return text.split('.').count(),
            // A private rule sits on top of an ICANN one; look beneath it.
            Some(Type::Private) => match text.split_once('.') {
                Some((_, rest)) => candidate = rest,
                None => return 0,
            },
            None => return 0,
        }
    }
}
