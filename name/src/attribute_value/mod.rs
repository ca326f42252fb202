//! Attribute values.
//!
//! Values of the attribute types listed in [`ValueKind`] are decoded into a
//! [`StringValue`] checked against the kind's [`Syntax`]. Values of any other
//! attribute type are kept as an opaque [`UnknownAttributeValue`].

use std::fmt;
use std::str::FromStr;

use tracing::trace;
use x501_asn1::{Element, ObjectIdentifier};
use x501_der::PrimitiveTag;

use crate::attribute::Attribute;
use crate::attribute_type::AttributeType;
use crate::attribute_type_and_value::AttributeTypeAndValue;
use crate::error::{Error, Result};
use crate::matching_rule::MatchingRule;

mod string_value;
mod syntax;
mod unknown;

pub use string_value::StringValue;
pub use syntax::Syntax;
pub use unknown::UnknownAttributeValue;

/// Attribute types with a known value syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    CommonName,
    Surname,
    SerialNumber,
    CountryName,
    LocalityName,
    StateOrProvinceName,
    OrganizationName,
    OrganizationalUnitName,
    Title,
    Description,
    Name,
    GivenName,
    Pseudonym,
}

impl ValueKind {
    const ALL: [ValueKind; 13] = [
        ValueKind::CommonName,
        ValueKind::Surname,
        ValueKind::SerialNumber,
        ValueKind::CountryName,
        ValueKind::LocalityName,
        ValueKind::StateOrProvinceName,
        ValueKind::OrganizationName,
        ValueKind::OrganizationalUnitName,
        ValueKind::Title,
        ValueKind::Description,
        ValueKind::Name,
        ValueKind::GivenName,
        ValueKind::Pseudonym,
    ];

    pub fn oid_str(&self) -> &'static str {
        match self {
            ValueKind::CommonName => AttributeType::OID_COMMON_NAME,
            ValueKind::Surname => AttributeType::OID_SURNAME,
            ValueKind::SerialNumber => AttributeType::OID_SERIAL_NUMBER,
            ValueKind::CountryName => AttributeType::OID_COUNTRY_NAME,
            ValueKind::LocalityName => AttributeType::OID_LOCALITY_NAME,
            ValueKind::StateOrProvinceName => AttributeType::OID_STATE_OR_PROVINCE_NAME,
            ValueKind::OrganizationName => AttributeType::OID_ORGANIZATION_NAME,
            ValueKind::OrganizationalUnitName => AttributeType::OID_ORGANIZATIONAL_UNIT_NAME,
            ValueKind::Title => AttributeType::OID_TITLE,
            ValueKind::Description => AttributeType::OID_DESCRIPTION,
            ValueKind::Name => AttributeType::OID_NAME,
            ValueKind::GivenName => AttributeType::OID_GIVEN_NAME,
            ValueKind::Pseudonym => AttributeType::OID_PSEUDONYM,
        }
    }

    pub fn oid(&self) -> Result<ObjectIdentifier> {
        Ok(ObjectIdentifier::from_str(self.oid_str())?)
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        let oid = oid.to_string();
        Self::ALL.into_iter().find(|kind| kind.oid_str() == oid)
    }

    pub fn syntax(&self) -> Syntax {
        match self {
            ValueKind::SerialNumber | ValueKind::CountryName => Syntax::PRINTABLE_STRING,
            _ => Syntax::DIRECTORY_STRING,
        }
    }

    /// A value of this kind from text, in the syntax's default string type.
    pub fn value(self, value: &str) -> Result<AttributeValue> {
        AttributeValue::new(self, value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// DirectoryString syntax
    DirectoryString(StringValue),
    /// PrintableString syntax
    PrintableString(StringValue),
    /// Attribute type without a registered syntax
    Unknown(UnknownAttributeValue),
}

impl AttributeValue {
    /// A value of `kind` from text, in the syntax's default string type.
    pub fn new(kind: ValueKind, value: &str) -> Result<Self> {
        Self::with_string_type(kind, kind.syntax().default_tag(), value)
    }

    /// A value of `kind` from text, in the given string type.
    pub fn with_string_type(kind: ValueKind, tag: PrimitiveTag, value: &str) -> Result<Self> {
        let element = string_value::string_element(tag, value)?;
        Self::from_element(kind, element)
    }

    /// Decodes the element as a value of `kind`.
    pub fn from_element(kind: ValueKind, element: Element) -> Result<Self> {
        let value = StringValue::from_element(kind, element)?;
        if kind.syntax() == Syntax::PRINTABLE_STRING {
            return Ok(AttributeValue::PrintableString(value));
        }
        Ok(AttributeValue::DirectoryString(value))
    }

    /// Decodes the element according to the attribute type. Unregistered
    /// types give an [`UnknownAttributeValue`].
    pub fn from_element_by_oid(oid: &ObjectIdentifier, element: Element) -> Result<Self> {
        match ValueKind::from_oid(oid) {
            Some(kind) => {
                trace!(%oid, ?kind, "decoding attribute value");
                Self::from_element(kind, element)
            }
            None => {
                trace!(%oid, "attribute type without syntax, keeping value opaque");
                Ok(AttributeValue::Unknown(UnknownAttributeValue::new(
                    oid.clone(),
                    element,
                )))
            }
        }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => v.oid(),
            AttributeValue::Unknown(v) => v.oid(),
        }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => {
                Some(v.kind())
            }
            AttributeValue::Unknown(_) => None,
        }
    }

    pub fn element(&self) -> &Element {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => v.element(),
            AttributeValue::Unknown(v) => v.element(),
        }
    }

    /// String type of a string value.
    pub fn string_tag(&self) -> Option<PrimitiveTag> {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => {
                Some(v.string_tag())
            }
            AttributeValue::Unknown(_) => None,
        }
    }

    /// The octets handed to the equality matching rule: content octets of a
    /// string value, the whole DER encoding of an opaque one.
    pub fn comparison_bytes(&self) -> Result<Vec<u8>> {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => {
                Ok(v.as_bytes().to_vec())
            }
            AttributeValue::Unknown(v) => v.to_der(),
        }
    }

    pub fn equality_matching_rule(&self) -> MatchingRule {
        match self.string_tag() {
            Some(tag) => MatchingRule::CaseIgnore(tag),
            None => MatchingRule::Binary,
        }
    }

    /// Canonical string for a DN string.
    pub fn rfc2253_string(&self) -> Result<String> {
        match self {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => {
                v.rfc2253_string()
            }
            AttributeValue::Unknown(v) => v.rfc2253_string(),
        }
    }

    /// Re-reads the value as `kind`. The OIDs have to agree.
    pub fn cast(&self, kind: ValueKind) -> Result<Self> {
        let expected = kind.oid()?;
        if &expected != self.oid() {
            return Err(Error::OidMismatch {
                expected,
                actual: self.oid().clone(),
            });
        }
        let element = Element::from_der(&self.element().to_der()?)?;
        Self::from_element(kind, element)
    }

    pub fn to_attribute(&self) -> Result<Attribute> {
        Attribute::from_values(vec![self.clone()])
    }

    pub fn to_type_and_value(&self) -> AttributeTypeAndValue {
        AttributeTypeAndValue::from_value(self.clone())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.rfc2253_string().map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}
