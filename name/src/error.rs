//! Error types for distinguished names

use thiserror::Error;
use x501_asn1::ObjectIdentifier;
use x501_der::{PrimitiveTag, Tag};

use crate::dn;

/// Result type for distinguished name operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: DN grammar, hex, DER structure or an unsupported string type.
    Parse,
    /// A value that parsed fine but breaks a construction rule.
    Invariant,
}

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("DN: {0}")]
    Parse(#[from] dn::Error),

    // attribute value errors
    #[error("{syntax}: unsupported string type {tag:?}")]
    UnsupportedStringType { syntax: &'static str, tag: Tag },
    #[error("unsupported string type for transcoding: {0:?}")]
    TranscodeUnsupportedTag(PrimitiveTag),
    #[error("invalid {0:?} content octets")]
    InvalidStringEncoding(PrimitiveTag),
    #[error("'{value}' can not be represented as {tag:?}")]
    StringNotRepresentable { tag: PrimitiveTag, value: String },

    // attribute type errors
    #[error("unknown attribute name '{0}'")]
    UnknownAttributeName(String),
    #[error("attribute OID mismatch: expected {expected}, got {actual}")]
    OidMismatch {
        expected: ObjectIdentifier,
        actual: ObjectIdentifier,
    },

    // collection errors
    #[error("RDN must have at least one member")]
    EmptyRdn,
    #[error("Attribute: no values")]
    NoValues,
    #[error("attribute '{0}' not found")]
    AttributeNotFound(String),
    #[error("attribute '{0}' is ambiguous")]
    AmbiguousAttribute(String),

    // Name errors
    #[error("Name: expected SEQUENCE")]
    NameExpectedSequence,

    // RelativeDistinguishedName errors
    #[error("RelativeDistinguishedName: expected SET")]
    RdnExpectedSet,

    // AttributeTypeAndValue errors
    #[error("AttributeTypeAndValue: expected SEQUENCE")]
    AttributeTypeAndValueExpectedSequence,
    #[error("AttributeTypeAndValue: expected OBJECT IDENTIFIER for attribute type")]
    AttributeTypeAndValueExpectedOid,
    #[error("AttributeTypeAndValue: expected 2 elements, got {0}")]
    AttributeTypeAndValueInvalidElementCount(usize),

    // Attribute errors
    #[error("Attribute: expected SEQUENCE")]
    AttributeExpectedSequence,
    #[error("Attribute: expected OBJECT IDENTIFIER for attribute type")]
    AttributeExpectedOid,
    #[error("Attribute: expected SET OF values")]
    AttributeExpectedSet,

    #[error("regex: {0}")]
    Regex(#[from] regex::Error),

    /// ASN.1 encoding/decoding error
    #[error("ASN.1 error: {0}")]
    ASN1Error(#[from] x501_asn1::error::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::StringNotRepresentable { .. }
            | Error::OidMismatch { .. }
            | Error::EmptyRdn
            | Error::NoValues
            | Error::AttributeNotFound(_)
            | Error::AmbiguousAttribute(_) => ErrorKind::Invariant,
            _ => ErrorKind::Parse,
        }
    }
}
