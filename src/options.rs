//! Parsing and validation options.

use std::sync::Mutex;

use crate::dns::uses_dns_host_validation;

/// A bit-set selecting which components a validation pass covers.
/// Builder operations re-validate with a narrowed scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Scope(u16);

impl Scope {
    pub(crate) const SCHEME: Scope = Scope(1);
    pub(crate) const HOST: Scope = Scope(1 << 1);
    pub(crate) const PORT: Scope = Scope(1 << 2);
    pub(crate) const USER_INFO: Scope = Scope(1 << 3);
    pub(crate) const PATH: Scope = Scope(1 << 4);
    pub(crate) const QUERY: Scope = Scope(1 << 5);
    pub(crate) const FRAGMENT: Scope = Scope(1 << 6);
    pub(crate) const ALL: Scope = Scope(u16::MAX);

    pub(crate) const fn union(self, other: Scope) -> Scope {
        Scope(self.0 | other.0)
    }

    pub(crate) const fn contains(self, other: Scope) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Fine-grained tuning of tolerances to the standards when parsing
/// and validating a URI.
///
/// An `Options` value is plain data: it is `Copy`, const-constructible
/// and carries function pointers rather than closures, so parses on
/// different threads share nothing.
///
/// # Examples
///
/// ```
/// use strict_uri::{Options, Uri};
///
/// const OPTS: Options = Options::new().with_reference(true).with_strict_uri(true);
///
/// let uri = Uri::parse_with("//example.com/caf%C3%A9", &OPTS);
/// assert!(uri.err().is_none());
/// ```
#[derive(Clone, Copy)]
pub struct Options {
    pub(crate) scheme_is_dns: fn(&str) -> bool,
    pub(crate) default_port: fn(&str) -> Option<u16>,
    pub(crate) accept_reference: bool,
    pub(crate) strict_uri: bool,
    pub(crate) strict_iri: bool,
    pub(crate) windows_friendly: bool,
    pub(crate) scope: Scope,
}

impl Options {
    /// Creates the default options: strict URI mode (scheme required),
    /// the built-in DNS scheme classifier and default port table,
    /// and `ucschar` characters accepted unescaped.
    pub const fn new() -> Options {
        Options {
            scheme_is_dns: uses_dns_host_validation,
            default_port: builtin_default_port,
            accept_reference: false,
            strict_uri: false,
            strict_iri: false,
            windows_friendly: false,
            scope: Scope::ALL,
        }
    }

    /// Replaces the DNS scheme classifier.
    ///
    /// The function receives the scheme lowercased and returns whether
    /// hosts of that scheme are validated as DNS names.
    pub const fn with_scheme_is_dns(mut self, f: fn(&str) -> bool) -> Options {
        self.scheme_is_dns = f;
        self
    }

    /// Replaces the scheme-to-default-port function consumed by
    /// downstream normalization.
    pub const fn with_default_port(mut self, f: fn(&str) -> Option<u16>) -> Options {
        self.default_port = f;
        self
    }

    /// Permits scheme-less input (URI references).
    pub const fn with_reference(mut self, enabled: bool) -> Options {
        self.accept_reference = enabled;
        self
    }

    /// Restricts unescaped characters to ASCII, as RFC 3986 demands of
    /// a URI proper. Takes precedence over [`with_strict_iri`].
    ///
    /// [`with_strict_iri`]: Self::with_strict_iri
    pub const fn with_strict_uri(mut self, enabled: bool) -> Options {
        self.strict_uri = enabled;
        self
    }

    /// Admits the full RFC 3987 repertoire unescaped, including
    /// `iprivate` characters in the query.
    pub const fn with_strict_iri(mut self, enabled: bool) -> Options {
        self.strict_iri = enabled;
        self
    }

    /// For the `file` scheme, tolerates `\` in the hier-part by
    /// treating it as `/` before validation, so common Windows paths
    /// such as `file://C:\dir\file.txt` parse.
    pub const fn with_windows_friendly(mut self, enabled: bool) -> Options {
        self.windows_friendly = enabled;
        self
    }

    /// Looks up the default port for a lowercase scheme through the
    /// configured function.
    pub fn default_port_for(&self, scheme: &str) -> Option<u16> {
        (self.default_port)(scheme)
    }

    pub(crate) const fn with_scope(mut self, scope: Scope) -> Options {
        self.scope = scope;
        self
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("accept_reference", &self.accept_reference)
            .field("strict_uri", &self.strict_uri)
            .field("strict_iri", &self.strict_iri)
            .field("windows_friendly", &self.windows_friendly)
            .finish_non_exhaustive()
    }
}

/// Well-known default ports, for the schemes the classifier knows.
fn builtin_default_port(scheme: &str) -> Option<u16> {
    Some(match scheme {
        "ftp" => 21,
        "ssh" | "sftp" => 22,
        "telnet" => 23,
        "smtp" => 25,
        "dns" => 53,
        "finger" => 79,
        "gopher" => 70,
        "http" | "ws" => 80,
        "nntp" => 119,
        "imap" => 143,
        "snmp" => 161,
        "irc" => 194,
        "ldap" => 389,
        "https" | "wss" => 443,
        "rtsp" => 554,
        "ipp" | "ipps" => 631,
        "rsync" => 873,
        "nfs" => 2049,
        "postgresql" => 5432,
        "redis" => 6379,
        _ => return None,
    })
}

static DEFAULTS: Mutex<Options> = Mutex::new(Options::new());

/// Replaces the process-wide default options used by [`Uri::parse`],
/// [`Uri::parse_reference`] and the builder operations.
///
/// Intended for initialization only; the defaults are read under a
/// lock at the start of each parse and never mutated mid-parse.
///
/// [`Uri::parse`]: crate::Uri::parse
/// [`Uri::parse_reference`]: crate::Uri::parse_reference
pub fn set_default_options(opts: Options) {
    *DEFAULTS.lock().unwrap_or_else(|e| e.into_inner()) = opts;
}

/// Returns a copy of the process-wide default options.
pub(crate) fn default_options() -> Options {
    *DEFAULTS.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_compose() {
        const OPTS: Options = Options::new().with_reference(true).with_strict_uri(true);
        assert!(OPTS.accept_reference);
        assert!(OPTS.strict_uri);
        assert!(!OPTS.windows_friendly);
    }

    #[test]
    fn default_ports() {
        let opts = Options::new();
        assert_eq!(opts.default_port_for("http"), Some(80));
        assert_eq!(opts.default_port_for("https"), Some(443));
        assert_eq!(opts.default_port_for("postgresql"), Some(5432));
        assert_eq!(opts.default_port_for("example"), None);
    }

    #[test]
    fn scope_set_operations() {
        let s = Scope::HOST.union(Scope::PORT);
        assert!(s.contains(Scope::HOST));
        assert!(s.contains(Scope::PORT));
        assert!(!s.contains(Scope::PATH));
        assert!(Scope::ALL.contains(s));
    }
}
