use thiserror::Error;

/// Distinguished name string errors.
///
/// Variants that point into the input carry the unparsed remainder.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid attribute type at '{0}'")]
    InvalidAttributeType(String),
    #[error("invalid type and value pair at '{0}'")]
    InvalidTypeAndValuePair(String),
    #[error("invalid hexstring at '{0}'")]
    InvalidHexString(String),
    #[error("invalid DER encoding from hexstring: {0}")]
    InvalidHexDer(#[source] x501_asn1::error::Error),
    #[error("unexpected quotation at '{0}'")]
    UnexpectedQuotation(String),
    #[error("unterminated quoted string '{0}'")]
    UnterminatedQuote(String),
    #[error("unexpected end of escape sequence")]
    UnexpectedEndOfEscape,
    #[error("unexpected end of hexpair")]
    UnexpectedEndOfHexPair,
    #[error("invalid hexpair '{0}'")]
    InvalidHexPair(String),
    #[error("attribute value is not valid UTF-8")]
    InvalidUtf8,
    #[error("parser finished before the end of string, remaining: '{0}'")]
    TrailingInput(String),
    #[error("regex: {0}")]
    Regex(#[from] regex::Error),
}
