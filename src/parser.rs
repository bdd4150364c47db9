//! The single-pass decomposer and the per-component validation
//! dispatch.
//!
//! Decomposition locates the first `:`, `?` and `#` delimiters, checks
//! their ordering, and slices the input into scheme, hier-part, query
//! and fragment without backtracking. The hier-part is then split into
//! authority and path. Validation runs afterwards over the components
//! in the canonical order scheme, query, fragment, path, host, port,
//! userinfo, and reports the first rejection.

use std::borrow::Cow;

use crate::dns::validate_dns_name;
use crate::encoding::{validate_component, FRAGMENT, PCHAR, QUERY, REG_NAME, USERINFO};
use crate::error::{Error, ErrorKind};
use crate::ip::{looks_like_ipv4, validate_ipv4, validate_ipv6, validate_ipv_future};
use crate::options::{Options, Scope};
use crate::uri::{Authority, IpKind, Uri};

/// Parses `raw` under the given options, returning a value that
/// carries the first validation error, if any.
pub(crate) fn parse(raw: &str, opts: &Options) -> Uri {
    let mut uri = match decompose(raw, opts) {
        Ok(uri) => uri,
        Err(e) => {
            return Uri {
                err: Some(e),
                ..Uri::default()
            }
        }
    };
    match validate(&uri, opts) {
        Ok(ip) => uri.authority.ip = ip,
        Err(e) => uri.err = Some(e),
    }
    uri
}

fn decompose(raw: &str, opts: &Options) -> Result<Uri, Error> {
    let scheme_end = raw.find(':');
    let query_start = raw.find('?');
    let frag_start = raw.find('#');

    // Pathological prefixes first.
    if scheme_end == Some(0) || query_start == Some(0) || frag_start == Some(0) {
        return Err(Error::new(ErrorKind::InvalidUri)
            .with_context("must not start with a ':', '?' or '#' delimiter"));
    }
    if scheme_end == Some(1) {
        return Err(Error::new(ErrorKind::InvalidScheme)
            .with_context("a scheme has a minimum length of two characters"));
    }
    if query_start == Some(1) || frag_start == Some(1) {
        return Err(Error::new(ErrorKind::InvalidUri).with_context(format!(
            "invalid combination of start markers, near: {:?}",
            &raw[..2]
        )));
    }
    if let Some(se) = scheme_end {
        // A '?' or '#' before the first ':' puts the delimiters out of
        // order, whatever the parsing mode.
        if query_start.map_or(false, |q| q < se) || frag_start.map_or(false, |f| f < se) {
            return Err(Error::new(ErrorKind::InvalidUri)
                .with_context("the ':', '?' and '#' delimiters are out of order"));
        }
    }

    // A '?' after '#' belongs to the fragment.
    let query_start = match (query_start, frag_start) {
        (Some(q), Some(f)) if q > f => None,
        (q, _) => q,
    };

    let is_relative = raw.starts_with("//");
    let (scheme, hier_start) = match scheme_end {
        Some(se) if !is_relative => (&raw[..se], se + 1),
        _ if !opts.accept_reference => {
            return Err(Error::new(ErrorKind::NoSchemeFound)
                .with_context("a URI requires a scheme, unlike a URI reference"))
        }
        // In reference mode an authority-only form keeps any ':' for
        // the port, and a scheme-less input is all hier-part.
        _ => ("", 0),
    };

    let hier_end = query_start
        .unwrap_or(raw.len())
        .min(frag_start.unwrap_or(raw.len()));
    let hier = &raw[hier_start..hier_end];
    let query = query_start.map(|q| raw[q + 1..frag_start.unwrap_or(raw.len())].to_owned());
    let fragment = frag_start.map(|f| raw[f + 1..].to_owned());

    let hier = if opts.windows_friendly && scheme.eq_ignore_ascii_case("file") {
        Cow::Owned(hier.replace('\\', "/"))
    } else {
        Cow::Borrowed(hier)
    };

    let authority = split_authority(&hier).map_err(|e| e.wrap(ErrorKind::InvalidUri))?;

    Ok(Uri {
        scheme: scheme.to_owned(),
        authority,
        query,
        fragment,
        err: None,
    })
}

/// Splits a hier-part into authority and path. Only the structure is
/// checked here; character validation comes later.
fn split_authority(hier: &str) -> Result<Authority, Error> {
    let rest = match hier.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            return Ok(Authority {
                path: hier.to_owned(),
                ..Authority::default()
            })
        }
    };

    let (auth, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };

    // An '@' at offset zero would denote an empty userinfo, which is
    // not split off; the host validator then rejects the '@'.
    let (userinfo, host_region) = match auth.find('@') {
        Some(at) if at > 0 => (&auth[..at], &auth[at + 1..]),
        _ => ("", auth),
    };

    let mut ip = IpKind::None;
    let (host, port) = if host_region.starts_with('[') {
        match host_region.find(']') {
            Some(1) => {
                return Err(Error::new(ErrorKind::InvalidHostAddress)
                    .with_context("empty IP literal between brackets"))
            }
            Some(end) => {
                ip = IpKind::Ipv6;
                let after = &host_region[end + 1..];
                let port = match after.find(':') {
                    Some(colon) => &after[colon + 1..],
                    None => "",
                };
                (&host_region[1..end], port)
            }
            None => {
                return Err(Error::new(ErrorKind::InvalidHostAddress)
                    .with_context("mismatched square brackets around an IP literal"))
            }
        }
    } else {
        match host_region.find(':') {
            Some(colon) => (&host_region[..colon], &host_region[colon + 1..]),
            None => (host_region, ""),
        }
    };

    Ok(Authority {
        prefixed: true,
        userinfo: userinfo.to_owned(),
        host: host.to_owned(),
        port: port.to_owned(),
        path: path.to_owned(),
        ip,
    })
}

/// Validates the components of `uri` selected by the options' scope,
/// in canonical order, and returns the refined IP kind of the host.
pub(crate) fn validate(uri: &Uri, opts: &Options) -> Result<IpKind, Error> {
    let scope = opts.scope;

    if !uri.scheme.is_empty() && scope.contains(Scope::SCHEME) {
        validate_scheme(&uri.scheme)?;
    }
    if let Some(query) = &uri.query {
        if !query.is_empty() && scope.contains(Scope::QUERY) {
            validate_component(query, QUERY, ErrorKind::InvalidQuery, opts)?;
        }
    }
    if let Some(fragment) = &uri.fragment {
        if !fragment.is_empty() && scope.contains(Scope::FRAGMENT) {
            validate_component(fragment, FRAGMENT, ErrorKind::InvalidFragment, opts)?;
        }
    }

    let a = &uri.authority;
    let mut ip = a.ip;
    if a.is_empty() {
        return Ok(ip);
    }

    if !a.path.is_empty() && scope.contains(Scope::PATH) {
        validate_path(a, opts)?;
    }
    if !a.host.is_empty() && scope.contains(Scope::HOST) {
        let bracketed = matches!(a.ip, IpKind::Ipv6 | IpKind::IpvFuture);
        ip = validate_host(&a.host, bracketed, &uri.scheme, opts)?;
    }
    if !a.port.is_empty() && scope.contains(Scope::PORT) {
        validate_port(&a.port, &a.host)?;
    }
    if !a.userinfo.is_empty() && scope.contains(Scope::USER_INFO) {
        validate_component(&a.userinfo, USERINFO, ErrorKind::InvalidUserInfo, opts)?;
    }

    Ok(ip)
}

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, length two
/// or more. Percent-escapes are not allowed in a scheme.
fn validate_scheme(scheme: &str) -> Result<(), Error> {
    if scheme.len() < 2 {
        return Err(Error::new(ErrorKind::InvalidScheme)
            .with_context("a scheme has a minimum length of two characters"));
    }
    let bytes = scheme.as_bytes();
    if !bytes[0].is_ascii_alphabetic() {
        return Err(Error::new(ErrorKind::InvalidScheme)
            .with_context("a scheme must start with an ASCII letter"));
    }
    for &x in &bytes[1..] {
        if !x.is_ascii_alphanumeric() && x != b'+' && x != b'-' && x != b'.' {
            return Err(Error::new(ErrorKind::InvalidScheme).with_context(format!(
                "invalid character {:?} in scheme {scheme:?}",
                x as char
            )));
        }
    }
    Ok(())
}

fn validate_path(a: &Authority, opts: &Options) -> Result<(), Error> {
    if a.userinfo.is_empty()
        && a.host.is_empty()
        && a.port.is_empty()
        && a.path.starts_with("//")
    {
        return Err(Error::new(ErrorKind::InvalidPath).with_context(format!(
            "without an authority, a path must not begin with \"//\": {:?}",
            a.path
        )));
    }
    for segment in a.path.split('/') {
        if !segment.is_empty() {
            validate_component(segment, PCHAR, ErrorKind::InvalidPath, opts)?;
        }
    }
    Ok(())
}

fn validate_host(host: &str, bracketed: bool, scheme: &str, opts: &Options) -> Result<IpKind, Error> {
    if bracketed {
        // IPv6 literals must not be escaped; an RFC 6874 zone may
        // follow after the literal "%25". IPvFuture is recognized by
        // its leading version marker.
        if host.starts_with('v') || host.starts_with('V') {
            validate_ipv_future(host)?;
            return Ok(IpKind::IpvFuture);
        }
        validate_ipv6(host)?;
        return Ok(IpKind::Ipv6);
    }

    if looks_like_ipv4(host) {
        return match validate_ipv4(host) {
            Ok(()) => Ok(IpKind::Ipv4),
            Err(cause) => Err(Error::ipv4(cause, host)),
        };
    }

    if (opts.scheme_is_dns)(&scheme.to_ascii_lowercase()) {
        validate_dns_name(host).map_err(|e| e.wrap(ErrorKind::InvalidHost))?;
    }
    validate_component(host, REG_NAME, ErrorKind::InvalidRegisteredName, opts)
        .map_err(|e| e.wrap(ErrorKind::InvalidHost))?;
    Ok(IpKind::None)
}

/// `port = *DIGIT`, bounded by 65535; a port demands a host.
fn validate_port(port: &str, host: &str) -> Result<(), Error> {
    if !port.bytes().all(|x| x.is_ascii_digit()) {
        return Err(Error::new(ErrorKind::InvalidPort)
            .with_context(format!("a port may contain only digits: {port:?}")));
    }
    if host.is_empty() {
        return Err(Error::new(ErrorKind::MissingHost)
            .with_context("a host must be present whenever a port is given"));
    }
    if port.len() > 5 || port.parse::<u32>().map_or(true, |v| v > 65535) {
        return Err(Error::new(ErrorKind::InvalidPort)
            .with_context(format!("a valid port lies in the range 0-65535: {port:?}")));
    }
    Ok(())
}
