//! The decomposed URI value and its read-only surface.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::options::{default_options, Options};
use crate::parser;

/// The kind of IP literal a host was validated as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IpKind {
    /// The host is not an IP literal (a DNS or registered name, or
    /// empty).
    #[default]
    None,
    /// A strict dotted-decimal IPv4 address.
    Ipv4,
    /// A bracketed IPv6 address, possibly with a zone identifier.
    Ipv6,
    /// A bracketed IPvFuture literal.
    IpvFuture,
}

/// The authority component of a URI, together with the path of the
/// hier-part, as specified by RFC 3986.
///
/// The host is stored raw: an IPv6 literal keeps its zone identifier
/// but loses the surrounding brackets, which [`Display`] restores.
///
/// [`Display`]: fmt::Display
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Authority {
    pub(crate) prefixed: bool,
    pub(crate) userinfo: String,
    pub(crate) host: String,
    pub(crate) port: String,
    pub(crate) path: String,
    pub(crate) ip: IpKind,
}

impl Authority {
    /// Assembles an authority from its subcomponents, for use with
    /// [`Uri::with_authority`].
    ///
    /// A bracketed `host` is stored without the brackets and marked as
    /// an IP literal. The `//` prefix is set whenever userinfo, host
    /// or port is non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Authority;
    ///
    /// let authority = Authority::new("user", "example.com", "8042", "/over/there");
    /// assert_eq!(authority.to_string(), "//user@example.com:8042/over/there");
    /// ```
    pub fn new(userinfo: &str, host: &str, port: &str, path: &str) -> Authority {
        let (host, ip) = strip_brackets(host);
        let mut authority = Authority {
            prefixed: false,
            userinfo: userinfo.to_owned(),
            host: host.to_owned(),
            port: port.to_owned(),
            path: path.to_owned(),
            ip,
        };
        authority.ensure_prefix();
        authority
    }

    /// Returns the authority prefix, either `//` or empty.
    pub fn prefix(&self) -> &'static str {
        if self.prefixed {
            "//"
        } else {
            ""
        }
    }

    /// Returns the raw userinfo subcomponent, possibly empty.
    pub fn user_info(&self) -> &str {
        &self.userinfo
    }

    /// Returns the raw host subcomponent, possibly empty. IPv6 and
    /// IPvFuture literals are reported without their brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the raw port subcomponent, possibly empty.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Returns the path of the hier-part, possibly empty. A non-empty
    /// path includes its leading `/` when the input had one.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the kind of IP literal the host was validated as.
    pub fn ip_kind(&self) -> IpKind {
        self.ip
    }

    pub(crate) fn ensure_prefix(&mut self) {
        if !self.userinfo.is_empty() || !self.host.is_empty() || !self.port.is_empty() {
            self.prefixed = true;
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        !self.prefixed
            && self.userinfo.is_empty()
            && self.host.is_empty()
            && self.port.is_empty()
            && self.path.is_empty()
    }
}

pub(crate) fn strip_brackets(host: &str) -> (&str, IpKind) {
    if host.len() > 2 && host.starts_with('[') && host.ends_with(']') {
        (&host[1..host.len() - 1], IpKind::Ipv6)
    } else {
        (host, IpKind::None)
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())?;
        if !self.userinfo.is_empty() {
            write!(f, "{}@", self.userinfo)?;
        }
        match self.ip {
            IpKind::Ipv6 | IpKind::IpvFuture => write!(f, "[{}]", self.host)?,
            _ => f.write_str(&self.host)?,
        }
        if !self.port.is_empty() {
            write!(f, ":{}", self.port)?;
        }
        f.write_str(&self.path)
    }
}

/// A decomposed URI or URI reference as specified by RFC 3986.
///
/// A `Uri` is produced by [`parse`], [`parse_reference`] or a builder
/// operation, and is immutable. Rather than failing outright, parsing
/// always returns a best-effort decomposition: the first validation
/// error, if any, is embedded in the value and exposed by [`err`].
/// Builder operations on an erroring value are no-ops, so the error
/// sticks until inspected.
///
/// [`parse`]: Self::parse
/// [`parse_reference`]: Self::parse_reference
/// [`err`]: Self::err
///
/// # Examples
///
/// ```
/// use strict_uri::{IpKind, Uri};
///
/// let uri = Uri::parse("http://user@example.com:8042/over/there?name=ferret#nose");
/// assert!(uri.err().is_none());
/// assert_eq!(uri.scheme(), "http");
/// assert_eq!(uri.user_info(), "user");
/// assert_eq!(uri.host(), "example.com");
/// assert_eq!(uri.port(), "8042");
/// assert_eq!(uri.path(), "/over/there");
/// assert_eq!(uri.query(), Some("name=ferret"));
/// assert_eq!(uri.fragment(), Some("nose"));
/// assert_eq!(uri.ip_kind(), IpKind::None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Uri {
    pub(crate) scheme: String,
    pub(crate) authority: Authority,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) err: Option<Error>,
}

impl Uri {
    /// Parses a URI in strict mode: a scheme is required.
    ///
    /// Uses the process-wide default options.
    pub fn parse(raw: &str) -> Uri {
        parser::parse(raw, &default_options())
    }

    /// Parses a URI reference: the scheme is optional.
    ///
    /// Uses the process-wide default options.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// let uri = Uri::parse_reference("//host.example:8080/p");
    /// assert!(uri.err().is_none());
    /// assert_eq!(uri.scheme(), "");
    /// assert_eq!(uri.host(), "host.example");
    /// ```
    pub fn parse_reference(raw: &str) -> Uri {
        parser::parse(raw, &default_options().with_reference(true))
    }

    /// Parses a URI with explicit options.
    pub fn parse_with(raw: &str, opts: &Options) -> Uri {
        parser::parse(raw, opts)
    }

    /// Returns the scheme component, possibly empty for a reference.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the authority component.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Returns the raw userinfo subcomponent of the authority.
    pub fn user_info(&self) -> &str {
        self.authority.user_info()
    }

    /// Returns the raw host subcomponent of the authority.
    pub fn host(&self) -> &str {
        self.authority.host()
    }

    /// Returns the raw port subcomponent of the authority.
    pub fn port(&self) -> &str {
        self.authority.port()
    }

    /// Parses the port as a number. An empty port is `None`.
    pub fn port_number(&self) -> Option<u16> {
        self.authority.port.parse().ok()
    }

    /// Returns the path component.
    pub fn path(&self) -> &str {
        self.authority.path()
    }

    /// Returns the query component, without its leading `?`.
    ///
    /// `Some("")` means the input carried a `?` with an empty query,
    /// which renders back with its delimiter.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment component, without its leading `#`.
    ///
    /// `Some("")` means the input carried a `#` with an empty
    /// fragment, which renders back with its delimiter.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns the kind of IP literal the host was validated as.
    pub fn ip_kind(&self) -> IpKind {
        self.authority.ip
    }

    /// Returns `true` if the URI reference is relative, i.e. without a
    /// scheme.
    ///
    /// Note that this function is not the opposite of [`is_absolute`].
    ///
    /// [`is_absolute`]: Self::is_absolute
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// assert!(Uri::parse_reference("/path/to/file").is_relative());
    /// assert!(!Uri::parse("http://example.com/").is_relative());
    /// ```
    pub fn is_relative(&self) -> bool {
        self.scheme.is_empty()
    }

    /// Returns `true` if the URI is absolute, i.e. with a scheme and
    /// without a fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// assert!(Uri::parse("http://example.com/").is_absolute());
    /// assert!(!Uri::parse("http://example.com/#title1").is_absolute());
    /// assert!(!Uri::parse_reference("/path/to/file").is_absolute());
    /// ```
    pub fn is_absolute(&self) -> bool {
        !self.scheme.is_empty() && self.fragment.is_none()
    }

    /// Returns the first validation error, if the value carries one.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Tells whether the value is free of validation errors.
    pub fn is_valid(&self) -> bool {
        self.err.is_none()
    }

    /// Converts the value into a `Result`, consuming it.
    pub fn into_result(self) -> Result<Uri, Error> {
        match self.err {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}

impl fmt::Display for Uri {
    /// Renders the URI back to its string form.
    ///
    /// Each separator is emitted only when the component that follows
    /// is non-empty, except that `?` and `#` are kept when the query
    /// or fragment was present but empty in the input. Brackets are
    /// restored around IPv6 and IPvFuture hosts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        write!(f, "{}", self.authority)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;

    /// Parses a URI in strict mode, failing on any validation error.
    fn from_str(s: &str) -> Result<Uri, Error> {
        Uri::parse(s).into_result()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::Uri;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Uri {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Uri {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Uri, D::Error> {
            let raw = String::deserialize(deserializer)?;
            Uri::parse(&raw).into_result().map_err(de::Error::custom)
        }
    }
}
