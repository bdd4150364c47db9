#![warn(rust_2018_idioms, unreachable_pub, missing_docs)]
//! A strict URI parser, validator and builder adhering to IETF
//! [RFC 3986], with IRI characters from [RFC 3987], IPv6 zone
//! identifiers from [RFC 6874] and DNS host names from RFC 1034/1035.
//!
//! Parsing decomposes a raw string into scheme, authority (userinfo,
//! host, port), path, query and fragment in a single left-to-right
//! pass, without regular expressions, and then validates every
//! component against its RFC grammar. Percent-escapes are held to a
//! stricter rule than RFC 3986's "should": every escape sequence must
//! decode to a well-formed UTF-8 scalar.
//!
//! Rather than failing outright, parsing returns a [`Uri`] carrying a
//! best-effort decomposition and the first validation error, if any:
//!
//! ```
//! use strict_uri::{ErrorKind, Uri};
//!
//! let uri = Uri::parse("https://user@example.com:8042/over/there?name=ferret#nose");
//! assert!(uri.is_valid());
//! assert_eq!(uri.host(), "example.com");
//!
//! let uri = Uri::parse("https://host:8080a");
//! assert!(uri.err().map_or(false, |e| e.is(ErrorKind::InvalidPort)));
//! ```
//!
//! Hosts of schemes known to name Internet domains (`http`, `ftp`,
//! `ldap` and some sixty others) are additionally validated as DNS
//! names; every other scheme falls back to the permissive RFC 3986
//! registered-name rule. The classifier is replaceable through
//! [`Options`].
//!
//! Builder operations derive a new value from an existing one,
//! re-validating only the affected components:
//!
//! ```
//! use strict_uri::Uri;
//!
//! let uri = Uri::parse("http://example.com/a/b")
//!     .with_port("8080")
//!     .with_join_path(["..", "c"]);
//! assert_eq!(uri.to_string(), "http://example.com:8080/a/c");
//! ```
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//! [RFC 3987]: https://datatracker.ietf.org/doc/html/rfc3987/
//! [RFC 6874]: https://datatracker.ietf.org/doc/html/rfc6874/

mod builder;
mod dns;
mod encoding;
mod error;
mod ip;
mod options;
mod parser;
mod uri;

pub use dns::uses_dns_host_validation;
pub use error::{Error, ErrorKind, Ipv4Error};
pub use options::{set_default_options, Options};
pub use uri::{Authority, IpKind, Uri};

/// Tells whether `raw` is a valid URI under the default options.
///
/// # Examples
///
/// ```
/// use strict_uri::is_uri;
///
/// assert!(is_uri("http://example.com/path?a=1#frag"));
/// assert!(!is_uri("//host.example/p"));
/// ```
pub fn is_uri(raw: &str) -> bool {
    Uri::parse(raw).is_valid()
}

/// Tells whether `raw` is a valid URI reference under the default
/// options, i.e. with the scheme optional.
///
/// # Examples
///
/// ```
/// use strict_uri::is_uri_reference;
///
/// assert!(is_uri_reference("//host.example/p"));
/// assert!(is_uri_reference("http://example.com/"));
/// assert!(!is_uri_reference("#"));
/// ```
pub fn is_uri_reference(raw: &str) -> bool {
    Uri::parse_reference(raw).is_valid()
}
