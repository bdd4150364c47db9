//! Byte pattern tables from RFC 3986 and RFC 3987, and the strict
//! percent-escape decoder.
//!
//! The predefined table constants in this module are documented with
//! the ABNF notation of [RFC 5234].
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234

use crate::error::{Error, ErrorKind};
use crate::options::Options;

/// Matches the `ucschar` ABNF rule from RFC 3987.
pub(crate) const fn is_ucschar(x: u32) -> bool {
    matches!(x, 0xa0..=0xd7ff | 0xf900..=0xfdcf | 0xfdf0..=0xffef)
        || (x >= 0x10000 && x <= 0xdffff && (x & 0xffff) <= 0xfffd)
        || (x >= 0xe1000 && x <= 0xefffd)
}

/// Matches the `iprivate` ABNF rule from RFC 3987.
pub(crate) const fn is_iprivate(x: u32) -> bool {
    (x >= 0xe000 && x <= 0xf8ff) || (x >= 0xf0000 && (x & 0xffff) <= 0xfffd)
}

/// A table specifying the code points allowed unescaped in a component.
///
/// ASCII bytes are looked up directly; characters above ASCII are
/// admitted through the `ucschar` and `iprivate` markers, subject to
/// the strictness options in effect.
#[derive(Clone, Copy)]
pub(crate) struct Table {
    table: [bool; 256],
    ucschar: bool,
    iprivate: bool,
}

impl Table {
    /// Creates a table that only allows the given bytes.
    const fn new(mut bytes: &[u8]) -> Table {
        let mut table = [false; 256];
        while let [cur, rem @ ..] = bytes {
            table[*cur as usize] = true;
            bytes = rem;
        }
        Table {
            table,
            ucschar: false,
            iprivate: false,
        }
    }

    /// Combines two tables into one.
    const fn or(mut self, other: &Table) -> Table {
        let mut i = 0;
        while i < 256 {
            self.table[i] |= other.table[i];
            i += 1;
        }
        self.ucschar |= other.ucschar;
        self.iprivate |= other.iprivate;
        self
    }

    /// Marks this table as allowing `ucschar` characters.
    const fn or_ucschar(mut self) -> Table {
        self.ucschar = true;
        self
    }

    /// Marks this table as allowing `iprivate` characters.
    const fn or_iprivate(mut self) -> Table {
        self.iprivate = true;
        self
    }

    pub(crate) const fn allows_ascii(&self, x: u8) -> bool {
        self.table[x as usize]
    }

    /// Checks a scalar against the table under the given strictness
    /// options. `strict_uri` confines the input to ASCII; `strict_iri`
    /// additionally admits `iprivate` scalars where marked.
    pub(crate) fn allows(&self, c: char, opts: &Options) -> bool {
        if c.is_ascii() {
            return self.allows_ascii(c as u8);
        }
        if opts.strict_uri {
            return false;
        }
        (self.ucschar && is_ucschar(c as u32))
            || (opts.strict_iri && self.iprivate && is_iprivate(c as u32))
    }
}

const fn gen(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

/// `ALPHA = %x41-5A / %x61-7A`
const ALPHA: &Table = &gen(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
const DIGIT: &Table = &gen(b"0123456789");

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub(crate) const UNRESERVED: &Table = &ALPHA.or(DIGIT).or(&gen(b"-._~"));

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub(crate) const SUB_DELIMS: &Table = &gen(b"!$&'()*+,;=");

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub(crate) const PCHAR: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":@")).or_ucschar();

/// `query = *( pchar / "/" / "?" )`, with `iprivate` per RFC 3987.
pub(crate) const QUERY: &Table = &PCHAR.or(&gen(b"/?")).or_iprivate();

/// `fragment = *( pchar / "/" / "?" )`
pub(crate) const FRAGMENT: &Table = &PCHAR.or(&gen(b"/?"));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
pub(crate) const USERINFO: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":")).or_ucschar();

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub(crate) const REG_NAME: &Table = &UNRESERVED.or(SUB_DELIMS).or_ucschar();

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
pub(crate) const IPV_FUTURE: &Table = &UNRESERVED.or(SUB_DELIMS).or(&gen(b":"));

fn escape_error(context: String) -> Error {
    Error::new(ErrorKind::InvalidEscaping).with_context(context)
}

fn decode_hex_pair(s: &str, i: usize) -> Result<u8, Error> {
    let bytes = s.as_bytes();
    let (hi, lo) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(&hi), Some(&lo)) => (hi, lo),
        _ => {
            return Err(escape_error(format!(
                "expected two hexadecimal digits after '%', near: {:?}",
                &s[i.min(s.len())..]
            )))
        }
    };
    match ((hi as char).to_digit(16), (lo as char).to_digit(16)) {
        (Some(hi), Some(lo)) => Ok((hi << 4 | lo) as u8),
        _ => Err(escape_error(format!(
            "malformed hexadecimal digit in escape sequence, near: {:?}",
            &s[i..]
        ))),
    }
}

/// Decodes one percent-escaped scalar from `s`, which is positioned
/// right after an introducing `%`.
///
/// One to four `%HH` groups are consumed, as demanded by the UTF-8 lead
/// byte pattern of the first decoded octet. The collected octets must
/// form the encoding of exactly one scalar. Returns the scalar and the
/// number of bytes consumed.
pub(crate) fn decode_escaped_scalar(s: &str) -> Result<(char, usize), Error> {
    let mut buf = [0u8; 4];
    buf[0] = decode_hex_pair(s, 0)?;
    let mut len = 1;
    let mut consumed = 2;

    // A lead byte of 110xxxxx, 1110xxxx or 11110xxx announces one, two
    // or three continuation octets, each escaped in its own right.
    let want: usize = match buf[0] {
        x if x >= 0xf0 => 4,
        x if x >= 0xe0 => 3,
        x if x >= 0xc0 => 2,
        _ => 1,
    };

    while len < want {
        if s.as_bytes().get(consumed) != Some(&b'%') {
            return Err(escape_error(format!(
                "expected a '%' escape to continue the sequence, near: {:?}",
                &s[consumed.min(s.len())..]
            )));
        }
        buf[len] = decode_hex_pair(s, consumed + 1)?;
        len += 1;
        consumed += 3;
    }

    match std::str::from_utf8(&buf[..len]).ok().and_then(|t| t.chars().next()) {
        Some(c) => Ok((c, consumed)),
        None => Err(escape_error(format!(
            "escaped octets do not encode a valid scalar, near: {:?}",
            &s[..consumed.min(s.len())]
        ))),
    }
}

/// Walks `s` one scalar at a time, checking every scalar against
/// `table` and every `%` against the strict escape decoder.
///
/// Escape defects are reported as [`ErrorKind::InvalidEscaping`]
/// wrapped under `kind`; a disallowed scalar is reported as `kind`
/// alone with the offending slice in the context.
pub(crate) fn validate_component(
    s: &str,
    table: &Table,
    kind: ErrorKind,
    opts: &Options,
) -> Result<(), Error> {
    let mut i = 0;
    while i < s.len() {
        let c = match s[i..].chars().next() {
            Some(c) => c,
            None => break,
        };
        if c == '%' {
            let (_, consumed) = decode_escaped_scalar(&s[i + 1..]).map_err(|e| e.wrap(kind))?;
            i += 1 + consumed;
            continue;
        }
        if !table.allows(c, opts) {
            return Err(Error::new(kind).with_context(format!(
                "contains an invalid character {:?}, near: {:?}",
                c,
                &s[i..]
            )));
        }
        i += c.len_utf8();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_single_octet() {
        assert_eq!(decode_escaped_scalar("41").unwrap(), ('A', 2));
        assert_eq!(decode_escaped_scalar("7e").unwrap(), ('~', 2));
        assert_eq!(decode_escaped_scalar("2Fxyz").unwrap(), ('/', 2));
    }

    #[test]
    fn decode_multi_octet() {
        // U+00E9, U+6D4B and U+1F603 need two, three and four octets.
        assert_eq!(decode_escaped_scalar("C3%A9").unwrap(), ('é', 5));
        assert_eq!(decode_escaped_scalar("E6%B5%8B").unwrap(), ('测', 8));
        assert_eq!(decode_escaped_scalar("F0%9F%98%83").unwrap(), ('😃', 11));
    }

    #[test]
    fn decode_rejects_malformed_sequences() {
        // short input
        assert!(decode_escaped_scalar("").is_err());
        assert!(decode_escaped_scalar("4").is_err());
        // non-hexadecimal digits
        assert!(decode_escaped_scalar("zz").is_err());
        assert!(decode_escaped_scalar("4z").is_err());
        // missing continuation escape
        assert!(decode_escaped_scalar("C3").is_err());
        assert!(decode_escaped_scalar("C3A9").is_err());
        assert!(decode_escaped_scalar("E6%B5").is_err());
        // bare continuation octet
        assert!(decode_escaped_scalar("80").is_err());
        // overlong encoding of '/'
        assert!(decode_escaped_scalar("C0%AF").is_err());
        // invalid lead byte
        assert!(decode_escaped_scalar("FF%80%80%80").is_err());
    }

    #[test]
    fn walker_accepts_escapes_and_ucschar() {
        let opts = Options::new();
        assert!(validate_component("a%20b", QUERY, ErrorKind::InvalidQuery, &opts).is_ok());
        assert!(validate_component("名前=值", QUERY, ErrorKind::InvalidQuery, &opts).is_ok());
        assert!(validate_component("a b", QUERY, ErrorKind::InvalidQuery, &opts).is_err());
    }

    #[test]
    fn walker_respects_strictness() {
        let strict = Options::new().with_strict_uri(true);
        let e = validate_component("café", PCHAR, ErrorKind::InvalidPath, &strict).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidPath);
        assert!(validate_component("caf%C3%A9", PCHAR, ErrorKind::InvalidPath, &strict).is_ok());
    }

    #[test]
    fn walker_reports_escape_defects() {
        let opts = Options::new();
        let e = validate_component("a%4", PCHAR, ErrorKind::InvalidPath, &opts).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidPath);
        assert!(e.is(ErrorKind::InvalidEscaping));
    }
}
