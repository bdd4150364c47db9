//! DNS host name validation as per RFC 1034/1035, and the scheme
//! classifier deciding which schemes get it.

use crate::encoding::decode_escaped_scalar;
use crate::error::{Error, ErrorKind};

/// A label may not exceed 63 bytes, counted on the escaped form.
const MAX_LABEL_BYTES: usize = 63;
/// A name may not exceed 255 bytes, counted on the escaped form.
const MAX_NAME_BYTES: usize = 255;

/// Schemes whose hosts are conventionally Internet domain names,
/// drawn from the IANA URI scheme registry. Sorted for binary search.
static DNS_SCHEMES: &[&str] = &[
    "aaa", "aaas", "acap", "acct", "cap", "cid", "coap", "coap+tcp", "coap+ws", "coaps",
    "coaps+tcp", "coaps+ws", "dav", "dict", "dns", "dntp", "finger", "ftp", "git", "gopher",
    "h323", "http", "https", "iax", "icap", "im", "imap", "ipp", "ipps", "irc", "irc6", "ircs",
    "jms", "ldap", "mailto", "mid", "msrp", "msrps", "nfs", "nntp", "ntp", "postgresql", "radius",
    "redis", "rmi", "rsync", "rtsp", "rtsps", "rtspu", "sftp", "skype", "smtp", "snmp", "soap",
    "ssh", "steam", "svn", "tcp", "telnet", "udp", "vnc", "wais", "ws", "wss",
];

/// Tells whether hosts of the given lowercase scheme are validated as
/// DNS host names (RFC 1035) rather than as generic RFC 3986
/// registered names.
///
/// This is the default classifier; it can be replaced per call with
/// [`Options::with_scheme_is_dns`] or process-wide with
/// [`set_default_options`], for instance to wrap it with additional
/// schemes of your own.
///
/// [`Options::with_scheme_is_dns`]: crate::Options::with_scheme_is_dns
/// [`set_default_options`]: crate::set_default_options
///
/// # Examples
///
/// ```
/// use strict_uri::uses_dns_host_validation;
///
/// assert!(uses_dns_host_validation("https"));
/// assert!(uses_dns_host_validation("ldap"));
/// assert!(!uses_dns_host_validation("file"));
/// assert!(!uses_dns_host_validation("urn"));
/// ```
pub fn uses_dns_host_validation(scheme: &str) -> bool {
    DNS_SCHEMES.binary_search(&scheme).is_ok()
}

fn dns_error(context: String) -> Error {
    Error::new(ErrorKind::InvalidDnsName).with_context(context)
}

/// Validates `host` as a DNS name, label by label.
///
/// Percent-escapes are decoded on the fly and the decoded scalar is
/// held to the same rules, so an escaped dot separates labels and an
/// escaped letter may start one.
pub(crate) fn validate_dns_name(host: &str) -> Result<(), Error> {
    if host.len() > MAX_NAME_BYTES {
        return Err(dns_error(format!(
            "a DNS name is limited to {MAX_NAME_BYTES} bytes"
        )));
    }
    if host.is_empty() {
        return Err(dns_error("a DNS name must not be empty".to_owned()));
    }

    let mut i = 0;
    let mut label_start = 0;
    let mut first = true;
    let mut last = '\0';
    while i < host.len() {
        let raw = match host[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        let (c, next) = if raw == '%' {
            let (c, consumed) = decode_escaped_scalar(&host[i + 1..])
                .map_err(|e| e.wrap(ErrorKind::InvalidDnsName))?;
            (c, i + 1 + consumed)
        } else {
            (raw, i + raw.len_utf8())
        };

        if c == '.' {
            if first {
                return Err(dns_error(format!(
                    "a DNS name must not contain an empty label, near: {:?}",
                    &host[i..]
                )));
            }
            if !last.is_ascii_alphanumeric() {
                return Err(dns_error(format!(
                    "a label must end with a letter or a digit, not {last:?}"
                )));
            }
            if next >= host.len() {
                return Err(dns_error("a DNS name must not end with a dot".to_owned()));
            }
            label_start = next;
            first = true;
            i = next;
            continue;
        }

        if next - label_start > MAX_LABEL_BYTES {
            return Err(dns_error(format!(
                "a label is limited to {MAX_LABEL_BYTES} bytes, near: {:?}",
                &host[label_start..]
            )));
        }
        if first {
            if !c.is_ascii_alphabetic() {
                return Err(dns_error(format!(
                    "a label must start with a letter, near: {:?}",
                    &host[label_start..]
                )));
            }
            first = false;
        } else if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(dns_error(format!(
                "a label may contain only letters, digits and '-', found {c:?}"
            )));
        }
        last = c;
        i = next;
    }

    if !last.is_ascii_alphanumeric() {
        return Err(dns_error(format!(
            "a label must end with a letter or a digit, not {last:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_defaults() {
        for scheme in ["http", "https", "ftp", "ssh", "ldap", "smtp", "mailto", "ws", "wss"] {
            assert!(uses_dns_host_validation(scheme), "{scheme} should be DNS");
        }
        for scheme in ["file", "urn", "tel", "news", "example"] {
            assert!(!uses_dns_host_validation(scheme), "{scheme} should not be DNS");
        }
    }

    #[test]
    fn classifier_table_is_sorted() {
        assert!(DNS_SCHEMES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn accepts_common_names() {
        assert!(validate_dns_name("example.com").is_ok());
        assert!(validate_dns_name("a.b.c.d.e").is_ok());
        assert!(validate_dns_name("x").is_ok());
        assert!(validate_dns_name("sub-domain.example.com").is_ok());
        assert!(validate_dns_name("host42").is_ok());
    }

    #[test]
    fn accepts_escaped_labels() {
        // "ex%61mple" decodes to "example"
        assert!(validate_dns_name("ex%61mple.com").is_ok());
        // an escaped dot still separates labels
        assert!(validate_dns_name("example%2Ecom").is_ok());
        // an escaped letter may start a label
        assert!(validate_dns_name("%65xample.com").is_ok());
    }

    #[test]
    fn rejects_bad_labels() {
        assert!(validate_dns_name("").is_err());
        assert!(validate_dns_name(".").is_err());
        assert!(validate_dns_name("........").is_err());
        assert!(validate_dns_name("example..com").is_err());
        assert!(validate_dns_name("example.com.").is_err());
        assert!(validate_dns_name("-example.com").is_err());
        assert!(validate_dns_name("example-.com").is_err());
        assert!(validate_dns_name("3xample.com").is_err());
        assert!(validate_dns_name("exam_ple.com").is_err());
        assert!(validate_dns_name("exa mple.com").is_err());
        // an escape decoding outside the letter/digit/'-' set
        assert!(validate_dns_name("ex%20ample.com").is_err());
        // incomplete escapes propagate as escaping errors
        let e = validate_dns_name("example%2").unwrap_err();
        assert!(e.is(ErrorKind::InvalidDnsName));
        assert!(e.is(ErrorKind::InvalidEscaping));
    }

    #[test]
    fn enforces_length_limits() {
        let label63 = "a".repeat(63);
        assert!(validate_dns_name(&label63).is_ok());
        let label64 = "a".repeat(64);
        assert!(validate_dns_name(&label64).is_err());

        // four 63-byte labels: 63 * 4 + 3 = 255 bytes
        let name255 = [label63.as_str(); 4].join(".");
        assert_eq!(name255.len(), 255);
        assert!(validate_dns_name(&name255).is_ok());
        let name257 = format!("a.{name255}");
        assert!(validate_dns_name(&name257).is_err());
    }
}
