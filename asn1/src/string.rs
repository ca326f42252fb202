//! String types whose content octets are not UTF-8.
//!
//! These keep the raw content octets. Turning them into text is the job of
//! the caller, which decides how (or whether) each encoding is transcoded.

use std::fmt;

use crate::error::{Error, Result};

/// PrintableString character set (X.680 §41.4).
pub fn is_printable_string(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '?'
            )
    })
}

/// BMPString: UCS-2, big endian.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BMPString {
    inner: Vec<u8>,
}

impl BMPString {
    pub fn new(s: &str) -> Result<Self> {
        let mut inner = Vec::with_capacity(s.len() * 2);
        for c in s.chars() {
            let code_point =
                u16::try_from(u32::from(c)).map_err(|_| Error::BmpStringRequiresSurrogatePair)?;
            inner.extend(code_point.to_be_bytes());
        }
        Ok(BMPString { inner })
    }

    /// Validates content octets read off the wire.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(Error::BmpStringOddLength(bytes.len()));
        }
        for (position, unit) in bytes.chunks_exact(2).enumerate() {
            let code_point = u16::from_be_bytes([unit[0], unit[1]]);
            if (0xd800..=0xdfff).contains(&code_point) {
                return Err(Error::BmpStringInvalidCodePoint {
                    position,
                    code_point,
                });
            }
        }
        Ok(BMPString { inner: bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

/// UniversalString: UCS-4, big endian.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniversalString {
    inner: Vec<u8>,
}

impl UniversalString {
    pub fn new(s: &str) -> Self {
        let inner = s.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect();
        UniversalString { inner }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(Error::UniversalStringInvalidLength(bytes.len()));
        }
        for (position, unit) in bytes.chunks_exact(4).enumerate() {
            let code_point = u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]]);
            if char::from_u32(code_point).is_none() {
                return Err(Error::UniversalStringInvalidCodePoint {
                    position,
                    code_point,
                });
            }
        }
        Ok(UniversalString { inner: bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

/// TeletexString (T.61). There is no reliable mapping to Unicode, so the
/// octets are carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeletexString {
    inner: Vec<u8>,
}

impl TeletexString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl From<&[u8]> for TeletexString {
    fn from(value: &[u8]) -> Self {
        TeletexString {
            inner: value.to_vec(),
        }
    }
}

impl From<Vec<u8>> for TeletexString {
    fn from(value: Vec<u8>) -> Self {
        TeletexString { inner: value }
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    bytes.iter().try_for_each(|b| write!(f, "{:02x}", b))
}

impl fmt::Display for BMPString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.inner)
    }
}

impl fmt::Display for UniversalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.inner)
    }
}

impl fmt::Display for TeletexString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.inner)
    }
}
