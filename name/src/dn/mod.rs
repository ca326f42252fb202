//! Distinguished name strings (RFC 2253, with RFC 1779 leniencies).
//!
//! ```text
//! name-component  = attributeTypeAndValue *("+" attributeTypeAndValue)
//! attributeType   = (ALPHA 1*keychar) / oid
//! attributeValue  = string / "#" hexstring / QUOTATION *( quotechar / pair ) QUOTATION
//! pair            = "\" ( special / "\" / QUOTATION / SPACE / hexpair )
//! ```
//!
//! `;` is accepted as a component separator and spaces are allowed around
//! `=`, `,` and `+`. Components come out most-significant first, i.e. the
//! reverse of the string order.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;
use x501_asn1::Element;

pub mod error;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Characters that terminate an unquoted value and must be escaped in one.
const SPECIAL_CHARS: &[u8] = b",=+<>#;";

static OID_TYPE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:oid\.)?([0-9]+(?:\.[0-9]+)*)"));
static NAME_TYPE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9\-]*"));
static HEX_STRING: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:[0-9a-f]{2})+"));
static CONTROL: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\p{C}"));

fn regex(cell: &'static LazyLock<std::result::Result<Regex, regex::Error>>) -> Result<&'static Regex> {
    LazyLock::force(cell).as_ref().map_err(|e| Error::Regex(e.clone()))
}

/// An attribute value as written in a DN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnValue {
    /// A string value with escapes resolved.
    String(String),
    /// A `#hexstring` value, decoded from DER.
    Element(Element),
}

/// One RDN as parsed: attribute type names (or dotted OIDs) and values.
pub type NameComponent = Vec<(String, DnValue)>;

/// Parses a distinguished name string.
///
/// The result is ordered most-significant component first. An empty string
/// is the empty name.
pub fn parse(dn: &str) -> Result<Vec<NameComponent>> {
    trace!(input_len = dn.len(), "parsing distinguished name");
    let mut parser = Parser { dn, idx: 0 };
    let name = parser.parse_name()?;
    if parser.idx < dn.len() {
        return Err(Error::TrailingInput(parser.remaining()));
    }
    Ok(name)
}

/// Escapes a string for use as an RFC 2253 attribute value.
pub fn escape_string(value: &str) -> Result<String> {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' ' if i == last => escaped.push_str("\\ "),
            ' ' | '#' if i == 0 => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    // control and format characters become hexpairs of their UTF-8 octets
    let control = regex(&CONTROL)?;
    let escaped = control.replace_all(&escaped, |caps: &Captures| {
        caps[0]
            .bytes()
            .map(|b| format!("\\{:02X}", b))
            .collect::<String>()
    });
    Ok(escaped.into_owned())
}

struct Parser<'a> {
    dn: &'a str,
    idx: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.dn.as_bytes().get(self.idx).copied()
    }

    fn rest(&self) -> &'a str {
        self.dn.get(self.idx..).unwrap_or("")
    }

    fn remaining(&self) -> String {
        let bytes = self.dn.as_bytes();
        String::from_utf8_lossy(bytes.get(self.idx..).unwrap_or(&[])).into_owned()
    }

    fn skip_ws(&mut self) {
        while self.peek() == Some(b' ') {
            self.idx += 1;
        }
    }

    fn parse_name(&mut self) -> Result<Vec<NameComponent>> {
        let mut names = Vec::new();
        while self.idx < self.dn.len() {
            names.push(self.parse_name_component()?);
            if self.idx >= self.dn.len() {
                break;
            }
            self.skip_ws();
            if !matches!(self.peek(), Some(b',' | b';')) {
                break;
            }
            self.idx += 1;
            self.skip_ws();
        }
        names.reverse();
        Ok(names)
    }

    fn parse_name_component(&mut self) -> Result<NameComponent> {
        let mut pairs = Vec::new();
        while self.idx < self.dn.len() {
            pairs.push(self.parse_attr_type_and_value()?);
            self.skip_ws();
            if self.peek() != Some(b'+') {
                break;
            }
            self.idx += 1;
            self.skip_ws();
        }
        Ok(pairs)
    }

    fn parse_attr_type_and_value(&mut self) -> Result<(String, DnValue)> {
        let attr_type = self.parse_attr_type()?;
        self.skip_ws();
        if self.peek() != Some(b'=') {
            return Err(Error::InvalidTypeAndValuePair(self.remaining()));
        }
        self.idx += 1;
        self.skip_ws();
        let value = if self.peek() == Some(b'#') {
            self.idx += 1;
            let data = self.parse_attr_hex_value()?;
            DnValue::Element(Element::from_der(&data).map_err(Error::InvalidHexDer)?)
        } else {
            DnValue::String(self.parse_attr_string_value()?)
        };
        trace!(%attr_type, ?value, "parsed attribute type and value");
        Ok((attr_type, value))
    }

    fn parse_attr_type(&mut self) -> Result<String> {
        let rest = self.rest();
        if let Some(caps) = regex(&OID_TYPE)?.captures(rest) {
            if let (Some(whole), Some(oid)) = (caps.get(0), caps.get(1)) {
                self.idx += whole.end();
                return Ok(oid.as_str().to_string());
            }
        }
        if let Some(m) = regex(&NAME_TYPE)?.find(rest) {
            self.idx += m.end();
            return Ok(m.as_str().to_string());
        }
        Err(Error::InvalidAttributeType(self.remaining()))
    }

    fn parse_attr_hex_value(&mut self) -> Result<Vec<u8>> {
        let Some(m) = regex(&HEX_STRING)?.find(self.rest()) else {
            return Err(Error::InvalidHexString(self.remaining()));
        };
        let data = hex::decode(m.as_str()).map_err(|_| Error::InvalidHexString(self.remaining()))?;
        self.idx += m.end();
        Ok(data)
    }

    fn parse_attr_string_value(&mut self) -> Result<String> {
        match self.peek() {
            None => Ok(String::new()),
            Some(b'"') => self.parse_quoted_attr_string(),
            Some(_) => self.parse_attr_string(),
        }
    }

    fn parse_attr_string(&mut self) -> Result<String> {
        let mut val = Vec::new();
        // start of a run of unescaped trailing spaces
        let mut wsidx: Option<usize> = None;
        while let Some(c) = self.peek() {
            match c {
                b'\\' => {
                    self.idx += 1;
                    val.push(self.parse_pair_after_slash()?);
                    wsidx = None;
                    continue;
                }
                b'"' => return Err(Error::UnexpectedQuotation(self.remaining())),
                c if SPECIAL_CHARS.contains(&c) => break,
                b' ' => {
                    wsidx.get_or_insert(self.idx);
                }
                _ => wsidx = None,
            }
            val.push(c);
            self.idx += 1;
        }
        if let Some(ws) = wsidx {
            val.truncate(val.len().saturating_sub(self.idx - ws));
        }
        String::from_utf8(val).map_err(|_| Error::InvalidUtf8)
    }

    fn parse_quoted_attr_string(&mut self) -> Result<String> {
        let start = self.idx;
        self.idx += 1;
        let mut val = Vec::new();
        loop {
            match self.peek() {
                None => {
                    let quoted = self.dn.as_bytes().get(start..).unwrap_or(&[]);
                    return Err(Error::UnterminatedQuote(
                        String::from_utf8_lossy(quoted).into_owned(),
                    ));
                }
                Some(b'\\') => {
                    self.idx += 1;
                    val.push(self.parse_pair_after_slash()?);
                }
                Some(b'"') => {
                    self.idx += 1;
                    break;
                }
                Some(c) => {
                    val.push(c);
                    self.idx += 1;
                }
            }
        }
        String::from_utf8(val).map_err(|_| Error::InvalidUtf8)
    }

    fn parse_pair_after_slash(&mut self) -> Result<u8> {
        let Some(c) = self.peek() else {
            return Err(Error::UnexpectedEndOfEscape);
        };
        self.idx += 1;
        if SPECIAL_CHARS.contains(&c) || matches!(c, b'\\' | b'"' | b' ') {
            return Ok(c);
        }
        let Some(c2) = self.peek() else {
            return Err(Error::UnexpectedEndOfHexPair);
        };
        self.idx += 1;
        let pair = [c, c2];
        hex::decode(pair)
            .ok()
            .and_then(|decoded| decoded.first().copied())
            .ok_or_else(|| Error::InvalidHexPair(String::from_utf8_lossy(&pair).into_owned()))
    }
}
