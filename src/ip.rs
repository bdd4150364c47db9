//! IP address validation as per RFC 3986 and RFC 6874.

use crate::encoding::{decode_escaped_scalar, IPV_FUTURE, UNRESERVED};
use crate::error::{Error, ErrorKind, Ipv4Error};

/// Tells whether `host` reads as a dotted-decimal attempt, i.e.
/// consists solely of ASCII digits and at least one `.` separator.
/// Such a host must be a valid strict IPv4 literal under every scheme.
pub(crate) fn looks_like_ipv4(host: &str) -> bool {
    host.bytes().any(|x| x.is_ascii_digit())
        && host.bytes().any(|x| x == b'.')
        && host.bytes().all(|x| x.is_ascii_digit() || x == b'.')
}

/// Validates a strict dotted-decimal IPv4 literal.
///
/// Exactly four octets separated by single dots; each octet is one to
/// three decimal digits in 0..=255 with no leading zero. No
/// percent-encoding anywhere.
pub(crate) fn validate_ipv4(s: &str) -> Result<(), Ipv4Error> {
    let mut octets = 0;
    for part in s.split('.') {
        octets += 1;
        if octets > 4 {
            return Err(Ipv4Error::TooLong);
        }
        if part.is_empty() {
            return Err(Ipv4Error::AtLeastOneDigit);
        }
        if part.len() > 3 {
            return Err(Ipv4Error::TooLong);
        }
        if !part.bytes().all(|x| x.is_ascii_digit()) {
            return Err(Ipv4Error::InvalidCharacter);
        }
        if part.len() > 1 && part.starts_with('0') {
            return Err(Ipv4Error::LeadingZero);
        }
        if part.parse::<u16>().map_or(true, |v| v > 255) {
            return Err(Ipv4Error::ValueOver255);
        }
    }
    if octets < 4 {
        return Err(Ipv4Error::TooShort);
    }
    Ok(())
}

/// Validates the content of an IPv6 literal (the bytes between the
/// brackets), which may carry an RFC 6874 zone identifier after the
/// literal `%25` sequence.
pub(crate) fn validate_ipv6(host: &str) -> Result<(), Error> {
    let (addr, zone) = match host.find('%') {
        Some(i) => {
            if !host[i..].starts_with("%25") {
                return Err(Error::new(ErrorKind::InvalidHostAddress).with_context(format!(
                    "a zone identifier must be introduced by \"%25\", near: {:?}",
                    &host[i..]
                )));
            }
            (&host[..i], Some(&host[i + 3..]))
        }
        None => (host, None),
    };

    if let Some(zone) = zone {
        validate_zone_id(zone)?;
    }

    if !is_ipv6_address(addr) {
        return Err(Error::new(ErrorKind::InvalidHostAddress)
            .with_context(format!("not a well-formed IPv6 address: {addr:?}")));
    }
    Ok(())
}

/// The zone identifier must be non-empty and consist of unreserved
/// characters or percent-escapes of unreserved characters.
fn validate_zone_id(zone: &str) -> Result<(), Error> {
    if zone.is_empty() {
        return Err(Error::new(ErrorKind::InvalidHostAddress)
            .with_context("empty zone identifier after \"%25\""));
    }
    let mut i = 0;
    while i < zone.len() {
        let c = match zone[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        if c == '%' {
            let (decoded, consumed) = decode_escaped_scalar(&zone[i + 1..])
                .map_err(|e| e.wrap(ErrorKind::InvalidHostAddress))?;
            if !decoded.is_ascii() || !UNRESERVED.allows_ascii(decoded as u8) {
                return Err(Error::new(ErrorKind::InvalidHostAddress).with_context(format!(
                    "zone identifier escapes must decode to unreserved characters, near: {:?}",
                    &zone[i..]
                )));
            }
            i += 1 + consumed;
            continue;
        }
        if !c.is_ascii() || !UNRESERVED.allows_ascii(c as u8) {
            return Err(Error::new(ErrorKind::InvalidHostAddress).with_context(format!(
                "invalid character {:?} in zone identifier",
                c
            )));
        }
        i += 1;
    }
    Ok(())
}

// An IPv6 address is eight groups of one to four hexadecimal digits
// separated by ":". A single "::" stands in for one elided run of zero
// groups, and a dotted-decimal tail may take the place of the last two
// groups.

fn is_hex_group(group: &str) -> bool {
    !group.is_empty() && group.len() <= 4 && group.bytes().all(|x| x.is_ascii_hexdigit())
}

/// Counts the 16-bit groups in one colon-separated run. An embedded
/// dotted-decimal tail may close the run and counts as two groups.
/// Returns `None` if any group is malformed.
fn count_groups(run: &str, allow_v4_tail: bool) -> Option<usize> {
    if run.is_empty() {
        return Some(0);
    }
    let mut n = 0;
    let mut groups = run.split(':').peekable();
    while let Some(group) = groups.next() {
        if groups.peek().is_none() && allow_v4_tail && group.contains('.') {
            if validate_ipv4(group).is_err() {
                return None;
            }
            n += 2;
        } else if is_hex_group(group) {
            n += 1;
        } else {
            return None;
        }
    }
    Some(n)
}

fn is_ipv6_address(s: &str) -> bool {
    match s.split_once("::") {
        Some((head, tail)) => {
            // The elision stands for at least one zero group, and a
            // second "::" is not allowed. A dotted-decimal tail can
            // only close the address, so it never occurs in the head.
            if tail.contains("::") {
                return false;
            }
            match (count_groups(head, false), count_groups(tail, true)) {
                (Some(h), Some(t)) => h + t <= 7,
                _ => false,
            }
        }
        None => count_groups(s, true) == Some(8),
    }
}

/// Validates an IPvFuture literal, `host` being the bracket content
/// starting with `v` or `V`.
pub(crate) fn validate_ipv_future(host: &str) -> Result<(), Error> {
    let err = |context: String| Error::new(ErrorKind::InvalidHostAddress).with_context(context);

    let rest = &host[1..];
    let dot = match rest.find('.') {
        Some(dot) => dot,
        None => return Err(err(format!("IPvFuture literal without a '.': {host:?}"))),
    };
    let (version, addr) = (&rest[..dot], &rest[dot + 1..]);

    if version.is_empty() || !version.bytes().all(|x| x.is_ascii_hexdigit()) {
        return Err(err(format!(
            "IPvFuture version must be one or more hexadecimal digits: {version:?}"
        )));
    }
    if addr.is_empty() {
        return Err(err(format!("empty IPvFuture address in {host:?}")));
    }
    if !addr.bytes().all(|x| IPV_FUTURE.allows_ascii(x)) {
        return Err(err(format!("invalid character in IPvFuture address {addr:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_v4() {
        assert!(validate_ipv4("127.0.0.1").is_ok());
        assert!(validate_ipv4("255.255.255.255").is_ok());
        assert!(validate_ipv4("0.0.0.0").is_ok());

        // out of range
        assert_eq!(validate_ipv4("256.0.0.1"), Err(Ipv4Error::ValueOver255));
        // too short
        assert_eq!(validate_ipv4("255.0.0"), Err(Ipv4Error::TooShort));
        // too long
        assert_eq!(validate_ipv4("255.0.0.1.2"), Err(Ipv4Error::TooLong));
        assert_eq!(validate_ipv4("1.2.3.1000"), Err(Ipv4Error::TooLong));
        // no digit between dots
        assert_eq!(validate_ipv4("255.0..1"), Err(Ipv4Error::AtLeastOneDigit));
        // leading zeros
        assert_eq!(validate_ipv4("255.0.0.01"), Err(Ipv4Error::LeadingZero));
        assert_eq!(validate_ipv4("255.0.00.0"), Err(Ipv4Error::LeadingZero));
        // preceding and trailing dots
        assert_eq!(validate_ipv4(".0.0.0.0"), Err(Ipv4Error::AtLeastOneDigit));
        assert_eq!(validate_ipv4("0.0.0.0."), Err(Ipv4Error::TooLong));
        // stray characters
        assert_eq!(validate_ipv4("1.2.3.a"), Err(Ipv4Error::InvalidCharacter));
        assert_eq!(validate_ipv4("1.2.3.%34"), Err(Ipv4Error::InvalidCharacter));
    }

    #[test]
    fn v6_canonical_forms() {
        assert!(is_ipv6_address("0:0:0:0:0:0:0:0"));
        assert!(is_ipv6_address("1:02:003:0004:0005:006:07:8"));
        assert!(is_ipv6_address("::1"));
        assert!(is_ipv6_address("1::"));
        assert!(is_ipv6_address("::"));
        assert!(is_ipv6_address("2a02:6b8::11:11"));
        assert!(is_ipv6_address("::2:3:4:5:6:7:8"));
        assert!(is_ipv6_address("1:2:3:4::6:7:8"));
        assert!(is_ipv6_address("1:2:3:4:5:6:7::"));
    }

    #[test]
    fn v6_malformed() {
        // only a colon
        assert!(!is_ipv6_address(":"));
        // too long group
        assert!(!is_ipv6_address("::00000"));
        // too short
        assert!(!is_ipv6_address("1:2:3:4:5:6:7"));
        // too long
        assert!(!is_ipv6_address("1:2:3:4:5:6:7:8:9"));
        // triple colon
        assert!(!is_ipv6_address("1:2:::6:7:8"));
        assert!(!is_ipv6_address(":::"));
        // two double colons
        assert!(!is_ipv6_address("1:2::6::8"));
        assert!(!is_ipv6_address("::2:6::"));
        // "::" indicating zero groups of zeros
        assert!(!is_ipv6_address("::1:2:3:4:5:6:7:8"));
        assert!(!is_ipv6_address("1:2:3:4::5:6:7:8"));
        assert!(!is_ipv6_address("1:2:3:4:5:6:7:8::"));
        // preceding colon
        assert!(!is_ipv6_address(":1:2:3:4:5:6:7:8"));
        assert!(!is_ipv6_address(":1.2.3.4"));
        // trailing colon
        assert!(!is_ipv6_address("1:2:3:4:5:6:7:8:"));
    }

    #[test]
    fn v6_with_embedded_v4() {
        assert!(is_ipv6_address("::192.0.2.33"));
        assert!(is_ipv6_address("::FFFF:192.0.2.33"));
        assert!(is_ipv6_address("64:ff9b::192.0.2.33"));
        assert!(is_ipv6_address("2001:db8:122:c000:2:2100:192.0.2.33"));

        // colon after the dotted tail
        assert!(!is_ipv6_address("::127.0.0.1:"));
        // not enough groups
        assert!(!is_ipv6_address("1:2:3:4:5:127.0.0.1"));
        // too many groups
        assert!(!is_ipv6_address("1:2:3:4:5:6:7:127.0.0.1"));
        // the tail is strict dotted-decimal
        assert!(!is_ipv6_address("::01.1.1.1"));
        assert!(!is_ipv6_address("::1.1.1.256"));
    }

    #[test]
    fn v6_zone_identifiers() {
        assert!(validate_ipv6("fe80::1%25en0").is_ok());
        assert!(validate_ipv6("fe80::1%25%65n0").is_ok());
        assert!(validate_ipv6("fe80::1").is_ok());

        // empty zone
        assert!(validate_ipv6("fe80::1%25").is_err());
        // a bare "%" that is not "%25"
        assert!(validate_ipv6("fe80::1%24x").is_err());
        assert!(validate_ipv6("fe80::1%en0").is_err());
        // reserved character in the zone
        assert!(validate_ipv6("fe80::1%25a/b").is_err());
        // escape decoding to a reserved character
        assert!(validate_ipv6("fe80::1%25%2F").is_err());
        // incomplete escape in the zone
        assert!(validate_ipv6("fe80::1%25a%4").is_err());
        // the address literal itself must not be escaped
        assert!(validate_ipv6("fe80%3A:1%25en0").is_err());
    }

    #[test]
    fn ipv_future() {
        assert!(validate_ipv_future("v1.x").is_ok());
        assert!(validate_ipv_future("vFe.foo.bar").is_ok());
        assert!(validate_ipv_future("V1a2.addr:port").is_ok());

        // empty version
        assert!(validate_ipv_future("v.addr").is_err());
        // non-hexadecimal version
        assert!(validate_ipv_future("vG.addr").is_err());
        // missing dot
        assert!(validate_ipv_future("v1").is_err());
        // empty address
        assert!(validate_ipv_future("vF.").is_err());
        // escapes are not allowed
        assert!(validate_ipv_future("vF.%20").is_err());
    }
}
