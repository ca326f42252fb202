//! AttributeTypeAndValue
//!
//! ```asn1
//! AttributeTypeAndValue ::= SEQUENCE {
//!     type     AttributeType,
//!     value    AttributeValue
//! }
//! ```

use std::fmt;

use tracing::debug;
use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_asn1::Element;
use x501_der::PrimitiveTag;

use crate::attribute_type::AttributeType;
use crate::attribute_value::AttributeValue;
use crate::error::{Error, Result};
use crate::matching_rule::{MatchResult, MatchingRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    attr_type: AttributeType,
    value: AttributeValue,
}

impl AttributeTypeAndValue {
    /// Fails if the value belongs to another attribute type.
    pub fn new(attr_type: AttributeType, value: AttributeValue) -> Result<Self> {
        if attr_type.oid() != value.oid() {
            return Err(Error::OidMismatch {
                expected: attr_type.oid().clone(),
                actual: value.oid().clone(),
            });
        }
        Ok(Self { attr_type, value })
    }

    pub fn from_value(value: AttributeValue) -> Self {
        Self {
            attr_type: AttributeType::new(value.oid().clone()),
            value,
        }
    }

    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.to_der()?)
    }

    /// Compares the values with this value's equality matching rule.
    ///
    /// String values of different string types are compared after both are
    /// transcoded to UTF-8.
    pub fn compare(&self, other: &Self) -> MatchResult {
        if self.attr_type.oid() != other.attr_type.oid() {
            return MatchResult::NoMatch;
        }
        let rule = self.value.equality_matching_rule();
        let result = match (rule, self.value.string_tag(), other.value.string_tag()) {
            (MatchingRule::Binary, _, _) => {
                match (self.value.comparison_bytes(), other.value.comparison_bytes()) {
                    (Ok(a), Ok(b)) => rule.compare(&a, &b),
                    _ => MatchResult::Undefined,
                }
            }
            (_, Some(a), Some(b)) if a == b => {
                match (self.value.comparison_bytes(), other.value.comparison_bytes()) {
                    (Ok(a), Ok(b)) => rule.compare(&a, &b),
                    _ => MatchResult::Undefined,
                }
            }
            (_, Some(_), Some(_)) => match (self.transcoded(), other.transcoded()) {
                (Some(a), Some(b)) => rule
                    .for_string_type(PrimitiveTag::UTF8String)
                    .compare(a.as_bytes(), b.as_bytes()),
                _ => MatchResult::Undefined,
            },
            _ => MatchResult::Undefined,
        };
        if !result.is_match() {
            debug!(
                oid = %self.attr_type.oid(),
                ?result,
                "attribute values do not match"
            );
        }
        result
    }

    pub fn matches(&self, other: &Self) -> bool {
        self.compare(other).is_match()
    }

    fn transcoded(&self) -> Option<String> {
        match &self.value {
            AttributeValue::DirectoryString(v) | AttributeValue::PrintableString(v) => {
                v.transcoded().ok()
            }
            AttributeValue::Unknown(_) => None,
        }
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.attr_type, self.value)
    }
}

impl DecodableFrom<Element> for AttributeTypeAndValue {}

impl Decoder<Element, AttributeTypeAndValue> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeTypeAndValue> {
        let Element::Sequence(seq) = self else {
            return Err(Error::AttributeTypeAndValueExpectedSequence);
        };

        match seq.as_slice() {
            [Element::ObjectIdentifier(oid), value] => {
                let value = AttributeValue::from_element_by_oid(oid, value.clone())?;
                AttributeTypeAndValue::new(AttributeType::new(oid.clone()), value)
            }
            [_, _] => Err(Error::AttributeTypeAndValueExpectedOid),
            _ => Err(Error::AttributeTypeAndValueInvalidElementCount(seq.len())),
        }
    }
}

impl EncodableTo<AttributeTypeAndValue> for Element {}

impl Encoder<AttributeTypeAndValue, Element> for AttributeTypeAndValue {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let oid_elm = self.attr_type.encode()?;
        let value_elm = self.value.element().clone();
        Ok(Element::Sequence(vec![oid_elm, value_elm]))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;
    use x501_asn1::{BMPString, ObjectIdentifier, UniversalString};

    use super::*;
    use crate::attribute_value::{UnknownAttributeValue, ValueKind};

    fn cn(text: &str) -> AttributeTypeAndValue {
        AttributeValue::new(ValueKind::CommonName, text)
            .unwrap()
            .to_type_and_value()
    }

    fn cn_element(element: Element) -> AttributeTypeAndValue {
        AttributeValue::from_element(ValueKind::CommonName, element)
            .unwrap()
            .to_type_and_value()
    }

    #[test]
    fn test_oid_mismatch() {
        let value = AttributeValue::new(ValueKind::CommonName, "name").unwrap();
        let result = AttributeTypeAndValue::new(AttributeType::from_name("o").unwrap(), value);
        assert!(matches!(result, Err(Error::OidMismatch { .. })));
    }

    #[test]
    fn test_encode_decode() {
        let tv = cn("name");
        let der = tv.to_der().unwrap();
        let decoded: AttributeTypeAndValue = Element::from_der(&der).unwrap().decode().unwrap();
        assert_eq!(tv, decoded);
    }

    #[rstest]
    #[case(Element::Null, Error::AttributeTypeAndValueExpectedSequence)]
    #[case(Element::Sequence(vec![Element::Null, Element::Null]), Error::AttributeTypeAndValueExpectedOid)]
    #[case(Element::Sequence(vec![Element::Null]), Error::AttributeTypeAndValueInvalidElementCount(1))]
    fn test_decode_errors(#[case] element: Element, #[case] expected: Error) {
        let result: Result<AttributeTypeAndValue> = element.decode();
        assert_eq!(Err(expected), result);
    }

    #[rstest]
    #[case("one", "one", MatchResult::Match)]
    #[case("one", "ONE", MatchResult::Match)]
    #[case("one", " one ", MatchResult::Match)]
    #[case("o n e ", " o  n  e ", MatchResult::Match)]
    #[case("test1", "test2", MatchResult::NoMatch)]
    fn test_compare_strings(#[case] a: &str, #[case] b: &str, #[case] expected: MatchResult) {
        assert_eq!(expected, cn(a).compare(&cn(b)));
    }

    #[rstest]
    #[case(Element::BMPString(BMPString::new("Name").unwrap()))]
    #[case(Element::UniversalString(UniversalString::new("NAME")))]
    #[case(Element::PrintableString("name".to_string()))]
    fn test_compare_across_string_types(#[case] element: Element) {
        assert!(cn("name").matches(&cn_element(element.clone())));
        assert!(cn_element(element).matches(&cn("name")));
    }

    #[test]
    fn test_compare_different_types() {
        let o = AttributeValue::new(ValueKind::OrganizationName, "one")
            .unwrap()
            .to_type_and_value();
        assert_eq!(MatchResult::NoMatch, cn("one").compare(&o));
    }

    #[test]
    fn test_compare_unknown_values() {
        let oid = ObjectIdentifier::from_str("1.3.6.1.3").unwrap();
        let value = |element: Element| {
            AttributeValue::Unknown(UnknownAttributeValue::new(oid.clone(), element))
                .to_type_and_value()
        };
        let t = value(Element::Boolean(true));
        assert!(t.matches(&value(Element::Boolean(true))));
        assert!(!t.matches(&value(Element::Boolean(false))));
    }

    #[test]
    fn test_string_against_opaque_value_is_undefined() {
        let oid = ObjectIdentifier::from_str(AttributeType::OID_COMMON_NAME).unwrap();
        let opaque = AttributeValue::Unknown(UnknownAttributeValue::new(
            oid,
            Element::UTF8String("one".to_string()),
        ))
        .to_type_and_value();
        assert_eq!(MatchResult::Undefined, cn("one").compare(&opaque));
    }

    #[rstest]
    #[case("name", "cn=name")]
    #[case("a+b", r"cn=a\+b")]
    fn test_display(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(expected, cn(text).to_string());
    }
}
