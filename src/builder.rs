//! Builder operations deriving a new URI from an existing one.
//!
//! Each operation replaces one component and re-runs validation scoped
//! to the components the replacement can affect. Operations on a value
//! that already carries an error return it unchanged.

use crate::options::{default_options, Scope};
use crate::parser;
use crate::uri::{strip_brackets, Authority, Uri};

impl Uri {
    fn revalidate(mut self, scope: Scope) -> Uri {
        let opts = default_options().with_scope(scope);
        match parser::validate(&self, &opts) {
            Ok(ip) => self.authority.ip = ip,
            Err(e) => self.err = Some(e),
        }
        self
    }

    /// Returns a new URI with the scheme replaced.
    ///
    /// The host is re-validated along with the scheme, since host
    /// rules depend on the scheme classification.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// let uri = Uri::parse("http://example.com/a").with_scheme("ftp");
    /// assert_eq!(uri.to_string(), "ftp://example.com/a");
    /// ```
    pub fn with_scheme(mut self, scheme: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.scheme = scheme.to_owned();
        self.revalidate(Scope::SCHEME.union(Scope::HOST))
    }

    /// Returns a new URI with the whole authority replaced, including
    /// the path carried by the hier-part.
    pub fn with_authority(mut self, authority: Authority) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.authority = authority;
        self.authority.ensure_prefix();
        self.revalidate(
            Scope::HOST
                .union(Scope::PORT)
                .union(Scope::USER_INFO)
                .union(Scope::PATH),
        )
    }

    /// Returns a new URI with the userinfo replaced.
    pub fn with_user_info(mut self, userinfo: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.authority.userinfo = userinfo.to_owned();
        self.authority.ensure_prefix();
        self.revalidate(Scope::USER_INFO)
    }

    /// Returns a new URI with the host replaced.
    ///
    /// A bracketed host such as `[::1]` is stored without the brackets
    /// and validated as an IP literal. The port is re-validated along
    /// with the host.
    pub fn with_host(mut self, host: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        let (host, ip) = strip_brackets(host);
        self.authority.host = host.to_owned();
        self.authority.ip = ip;
        self.authority.ensure_prefix();
        self.revalidate(Scope::HOST.union(Scope::PORT))
    }

    /// Returns a new URI with the port replaced.
    pub fn with_port(mut self, port: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.authority.port = port.to_owned();
        self.authority.ensure_prefix();
        self.revalidate(Scope::PORT)
    }

    /// Returns a new URI with the path replaced.
    pub fn with_path(mut self, path: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.authority.path = path.to_owned();
        self.revalidate(Scope::PATH)
    }

    /// Returns a new URI with the query replaced.
    ///
    /// The query becomes present even when `query` is empty, so the
    /// rendering keeps a trailing `?`.
    pub fn with_query(mut self, query: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.query = Some(query.to_owned());
        self.revalidate(Scope::QUERY)
    }

    /// Returns a new URI with the fragment replaced.
    ///
    /// The fragment becomes present even when `fragment` is empty, so
    /// the rendering keeps a trailing `#`.
    pub fn with_fragment(mut self, fragment: &str) -> Uri {
        if self.err.is_some() {
            return self;
        }
        self.fragment = Some(fragment.to_owned());
        self.revalidate(Scope::FRAGMENT)
    }

    /// Returns a new URI whose path is the current path joined with
    /// the given elements and simplified lexically.
    ///
    /// Elements are joined with single slashes; empty elements, `.`
    /// and `..` segments, and redundant slashes are resolved without
    /// touching the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use strict_uri::Uri;
    ///
    /// let uri = Uri::parse("http://example.com/a/b").with_join_path(["../c", "d"]);
    /// assert_eq!(uri.path(), "/a/c/d");
    /// ```
    pub fn with_join_path<I, S>(mut self, elems: I) -> Uri
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.err.is_some() {
            return self;
        }
        let mut joined = self.authority.path.clone();
        for elem in elems {
            let elem = elem.as_ref();
            if elem.is_empty() {
                continue;
            }
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(elem);
        }
        self.authority.path = if joined.is_empty() {
            joined
        } else {
            clean(&joined)
        };
        self.authority.ensure_prefix();
        self.revalidate(Scope::PATH)
    }
}

/// Simplifies a path lexically: collapses repeated slashes, drops `.`
/// segments, and resolves `..` against the preceding segment. A rooted
/// path stays rooted and `..` cannot climb above its root; a relative
/// path keeps the leading `..` segments that cannot be resolved.
fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if out.last().map_or(false, |last| *last != "..") {
                    out.pop();
                } else if !rooted {
                    out.push("..");
                }
            }
            seg => out.push(seg),
        }
    }

    let body = out.join("/");
    if rooted {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_owned()
    } else {
        body
    }
}
