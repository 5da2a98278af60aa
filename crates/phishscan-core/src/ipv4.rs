//! Legacy IPv4 literal parsing with classic `inet_aton` acceptance rules.
//!
//! `std::net::Ipv4Addr::from_str` only takes canonical dotted quads. Hosts such
//! as `0x7f.1`, `017700000001` or `3232235777` are valid addresses to a browser
//! resolver and are common in phishing links, so they are accepted here too.

use std::net::Ipv4Addr;

/// Parse `s` the way `inet_aton(3)` does.
///
/// Returns `None` for anything that is not an address, including hosts with a
/// `:port` suffix. Text after a whitespace character is ignored.
pub fn parse_legacy_ipv4(s: &str) -> Option<Ipv4Addr> {
    if s.contains('\0') {
        return None;
    }

    let bytes = s.as_bytes();
    let mut pos = 0;
    let mut parts: Vec<u32> = Vec::with_capacity(4);

    loop {
        let (value, next) = parse_part(bytes, pos)?;
        pos = next;
        parts.push(value);
        match bytes.get(pos) {
            Some(b'.') if parts.len() < 4 => pos += 1,
            Some(b'.') => return None,
            _ => break,
        }
    }

    if let Some(&c) = bytes.get(pos) {
        if !c.is_ascii_whitespace() && c != 0x0b {
            return None;
        }
    }

    let addr = match parts.as_slice() {
        [a] => *a,
        [a, b] if *a <= 0xff && *b <= 0x00ff_ffff => (a << 24) | b,
        [a, b, c] if *a <= 0xff && *b <= 0xff && *c <= 0xffff => (a << 24) | (b << 16) | c,
        [a, b, c, d] if [a, b, c, d].iter().all(|p| **p <= 0xff) => {
            (a << 24) | (b << 16) | (c << 8) | d
        }
        _ => return None,
    };
    Some(Ipv4Addr::from(addr))
}

/// One numeric part starting at `pos`: decimal, `0`-prefixed octal or `0x` hex.
fn parse_part(bytes: &[u8], mut pos: usize) -> Option<(u32, usize)> {
    if !bytes.get(pos)?.is_ascii_digit() {
        return None;
    }

    let mut radix = 10;
    if bytes[pos] == b'0' {
        pos += 1;
        radix = 8;
        if matches!(bytes.get(pos), Some(b'x' | b'X')) {
            pos += 1;
            radix = 16;
            // strtoul stops before a bare `x`, which then rejects the address.
            if !bytes.get(pos)?.is_ascii_hexdigit() {
                return None;
            }
        }
    }

    let mut value: u64 = 0;
    while let Some(&c) = bytes.get(pos) {
        let Some(digit) = (c as char).to_digit(radix) else {
            // glibc rejects 8 and 9 in an octal part rather than ending it.
            if radix == 8 && c.is_ascii_digit() {
                return None;
            }
            break;
        };
        value = value * u64::from(radix) + u64::from(digit);
        if value > u64::from(u32::MAX) {
            return None;
        }
        pos += 1;
    }

    Some((value as u32, pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Option<String> {
        parse_legacy_ipv4(s).map(|a| a.to_string())
    }

    #[test]
    fn dotted_quad() {
        assert_eq!(ip("192.168.1.1").as_deref(), Some("192.168.1.1"));
        assert_eq!(ip("0.0.0.0").as_deref(), Some("0.0.0.0"));
        assert_eq!(ip("256.1.1.1"), None);
    }

    #[test]
    fn short_forms() {
        assert_eq!(ip("127.1").as_deref(), Some("127.0.0.1"));
        assert_eq!(ip("10.1.258").as_deref(), Some("10.1.1.2"));
        assert_eq!(ip("3232235777").as_deref(), Some("192.168.1.1"));
        assert_eq!(ip("1").as_deref(), Some("0.0.0.1"));
    }

    #[test]
    fn octal_and_hex_parts() {
        assert_eq!(ip("0x7f.0.0.01").as_deref(), Some("127.0.0.1"));
        assert_eq!(ip("0300.0250.1.1").as_deref(), Some("192.168.1.1"));
        assert_eq!(ip("0X0A.0.0.1").as_deref(), Some("10.0.0.1"));
        assert_eq!(ip("0x"), None);
        assert_eq!(ip("0x.1.1.1"), None);
        assert_eq!(ip("1.0xg.1.1"), None);
        assert_eq!(ip("08.1.1.1"), None);
    }

    #[test]
    fn trailing_text() {
        assert_eq!(ip("1.2.3.4 trailing").as_deref(), Some("1.2.3.4"));
        assert_eq!(ip("1.2.3.4:80"), None);
        assert_eq!(ip("1.2.3.4."), None);
        assert_eq!(ip("1.2.3.4.5"), None);
        assert_eq!(ip("1.2.3.4\0"), None);
    }

    #[test]
    fn non_addresses() {
        assert_eq!(ip(""), None);
        assert_eq!(ip("example.com"), None);
        assert_eq!(ip("bit.ly"), None);
        assert_eq!(ip("4294967296"), None);
        assert_eq!(ip(".1.2.3"), None);
    }
}
