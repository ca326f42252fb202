//! Attribute
//!
//! ```asn1
//! Attribute ::= SEQUENCE {
//!     type    AttributeType,
//!     values  SET OF AttributeValue
//! }
//! ```

use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_asn1::Element;

use crate::attribute_type::AttributeType;
use crate::attribute_value::{AttributeValue, ValueKind};
use crate::error::{Error, Result};
use crate::sort_set_of;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    attr_type: AttributeType,
    values: Vec<AttributeValue>,
}

impl Attribute {
    /// Every value must belong to `attr_type`.
    pub fn new(attr_type: AttributeType, values: Vec<AttributeValue>) -> Result<Self> {
        if let Some(value) = values.iter().find(|v| v.oid() != attr_type.oid()) {
            return Err(Error::OidMismatch {
                expected: attr_type.oid().clone(),
                actual: value.oid().clone(),
            });
        }
        Ok(Self { attr_type, values })
    }

    /// The attribute type is taken from the first value.
    pub fn from_values(values: Vec<AttributeValue>) -> Result<Self> {
        let first = values.first().ok_or(Error::NoValues)?;
        let attr_type = AttributeType::new(first.oid().clone());
        Self::new(attr_type, values)
    }

    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn first(&self) -> Result<&AttributeValue> {
        self.values.first().ok_or(Error::NoValues)
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeValue> {
        self.values.iter()
    }

    /// Re-reads every value as `kind`.
    pub fn cast_values(&self, kind: ValueKind) -> Result<Self> {
        let expected = kind.oid()?;
        if &expected != self.attr_type.oid() {
            return Err(Error::OidMismatch {
                expected,
                actual: self.attr_type.oid().clone(),
            });
        }
        let values = self
            .values
            .iter()
            .map(|v| v.cast(kind))
            .collect::<Result<Vec<_>>>()?;
        Self::new(self.attr_type.clone(), values)
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.to_der()?)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }
}

impl<'a> IntoIterator for &'a Attribute {
    type Item = &'a AttributeValue;
    type IntoIter = std::slice::Iter<'a, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl DecodableFrom<Element> for Attribute {}

impl Decoder<Element, Attribute> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Attribute> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeExpectedSequence);
        };
        let [oid_elm, values_elm] = seq.as_slice() else {
            return Err(Error::AttributeExpectedSequence);
        };
        let Element::ObjectIdentifier(oid) = oid_elm else {
            return Err(Error::AttributeExpectedOid);
        };
        let Element::Set(values) = values_elm else {
            return Err(Error::AttributeExpectedSet);
        };
        let values = values
            .iter()
            .map(|v| AttributeValue::from_element_by_oid(oid, v.clone()))
            .collect::<Result<Vec<_>>>()?;
        Attribute::new(AttributeType::new(oid.clone()), values)
    }
}

impl EncodableTo<Attribute> for Element {}

impl Encoder<Attribute, Element> for Attribute {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let values: Vec<&AttributeValue> = self.values.iter().collect();
        let values = sort_set_of(values, |v| Ok(v.element().to_der()?))?;
        Ok(Element::Sequence(vec![
            self.attr_type.encode()?,
            Element::Set(values.into_iter().map(|v| v.element().clone()).collect()),
        ]))
    }
}
