//! Error types.

use std::fmt;
use thiserror::Error;

/// The component-level kind of a validation error.
///
/// Kinds are sentinels: callers test them by identity with
/// [`Error::is`], which also searches the wrapped causes of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input could not be decomposed into URI components.
    #[error("invalid URI")]
    InvalidUri,
    /// A scheme is required but was not found.
    #[error("no scheme found")]
    NoSchemeFound,
    /// The scheme component is malformed.
    #[error("invalid scheme")]
    InvalidScheme,
    /// The host subcomponent was rejected.
    #[error("invalid host")]
    InvalidHost,
    /// The host is not a well-formed DNS name.
    #[error("invalid DNS name")]
    InvalidDnsName,
    /// The host is not a well-formed registered name.
    #[error("invalid registered name")]
    InvalidRegisteredName,
    /// The host is not a well-formed IP literal.
    #[error("invalid host address")]
    InvalidHostAddress,
    /// The port subcomponent is malformed or out of range.
    #[error("invalid port")]
    InvalidPort,
    /// A port was given without a host.
    #[error("missing host")]
    MissingHost,
    /// The path component was rejected.
    #[error("invalid path")]
    InvalidPath,
    /// The query component was rejected.
    #[error("invalid query")]
    InvalidQuery,
    /// The fragment component was rejected.
    #[error("invalid fragment")]
    InvalidFragment,
    /// The userinfo subcomponent was rejected.
    #[error("invalid userinfo")]
    InvalidUserInfo,
    /// A percent-escape is incomplete, non-hexadecimal, or does not
    /// decode to a valid UTF-8 scalar.
    #[error("invalid escaping")]
    InvalidEscaping,
}

/// The detailed cause of a strict dotted-decimal IPv4 rejection,
/// surfaced under [`ErrorKind::InvalidHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Ipv4Error {
    /// A character other than an ASCII digit or `.` was found.
    #[error("invalid character in a dotted-decimal address")]
    InvalidCharacter,
    /// An octet decodes to a value greater than 255.
    #[error("octet value is greater than 255")]
    ValueOver255,
    /// An octet is empty.
    #[error("at least one digit is expected in each octet")]
    AtLeastOneDigit,
    /// A multi-digit octet starts with a zero.
    #[error("octet has a leading zero")]
    LeadingZero,
    /// More than four octets, or an octet with more than three digits.
    #[error("address is too long")]
    TooLong,
    /// Fewer than four octets.
    #[error("address is too short")]
    TooShort,
}

/// A URI validation error.
///
/// An error carries the [`ErrorKind`] of the rejecting validator, an
/// optional chain of wrapped causes, and a human-readable context
/// naming the offending slice of the input. The first error found in
/// the canonical component order is the one reported; it is also
/// embedded in the [`Uri`] value itself and is sticky across builder
/// operations.
///
/// [`Uri`]: crate::Uri
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    ipv4: Option<Ipv4Error>,
    context: Option<String>,
    cause: Option<Box<Error>>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error {
            kind,
            ipv4: None,
            context: None,
            cause: None,
        }
    }

    pub(crate) fn with_context(mut self, context: impl Into<String>) -> Error {
        self.context = Some(context.into());
        self
    }

    /// Wraps this error under an outer kind, preserving it as the cause.
    pub(crate) fn wrap(self, outer: ErrorKind) -> Error {
        Error {
            kind: outer,
            ipv4: None,
            context: None,
            cause: Some(Box::new(self)),
        }
    }

    pub(crate) fn ipv4(cause: Ipv4Error, host: &str) -> Error {
        Error {
            kind: ErrorKind::InvalidHost,
            ipv4: Some(cause),
            context: Some(format!("near: {host:?}")),
            cause: None,
        }
    }

    /// Returns the outermost kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Tests whether `kind` occurs anywhere in this error's chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::{ErrorKind, Uri};
    ///
    /// let uri = Uri::parse("https://..../");
    /// let e = uri.err().unwrap();
    /// assert!(e.is(ErrorKind::InvalidHost));
    /// assert!(e.is(ErrorKind::InvalidDnsName));
    /// ```
    pub fn is(&self, kind: ErrorKind) -> bool {
        let mut cur = Some(self);
        while let Some(e) = cur {
            if e.kind == kind {
                return true;
            }
            cur = e.cause.as_deref();
        }
        false
    }

    /// Returns the strict IPv4 cause, if this error carries one.
    pub fn ipv4_cause(&self) -> Option<Ipv4Error> {
        let mut cur = Some(self);
        while let Some(e) = cur {
            if let Some(v4) = e.ipv4 {
                return Some(v4);
            }
            cur = e.cause.as_deref();
        }
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(v4) = self.ipv4 {
            write!(f, ": {v4}")?;
        }
        if let Some(context) = &self.context {
            write!(f, ": {context}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|e| e as _)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_searches_the_chain() {
        let inner = Error::new(ErrorKind::InvalidEscaping).with_context("near: \"%4\"");
        let outer = inner
            .wrap(ErrorKind::InvalidDnsName)
            .wrap(ErrorKind::InvalidHost);
        assert_eq!(outer.kind(), ErrorKind::InvalidHost);
        assert!(outer.is(ErrorKind::InvalidHost));
        assert!(outer.is(ErrorKind::InvalidDnsName));
        assert!(outer.is(ErrorKind::InvalidEscaping));
        assert!(!outer.is(ErrorKind::InvalidPort));
    }

    #[test]
    fn display_joins_the_chain() {
        let e = Error::new(ErrorKind::InvalidEscaping)
            .with_context("incomplete escape sequence")
            .wrap(ErrorKind::InvalidQuery);
        assert_eq!(
            e.to_string(),
            "invalid query: invalid escaping: incomplete escape sequence"
        );
    }

    #[test]
    fn ipv4_cause_surfaces() {
        let e = Error::ipv4(Ipv4Error::ValueOver255, "256.0.0.1");
        assert_eq!(e.kind(), ErrorKind::InvalidHost);
        assert_eq!(e.ipv4_cause(), Some(Ipv4Error::ValueOver255));
        assert!(e.to_string().contains("greater than 255"));
    }
}
