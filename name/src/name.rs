//! Name
//!
//! ```asn1
//! Name ::= CHOICE { -- only one possibility for now --
//!     rdnSequence  RDNSequence
//! }
//!
//! RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_asn1::Element;

use crate::attribute_type::AttributeType;
use crate::attribute_type_and_value::AttributeTypeAndValue;
use crate::attribute_value::AttributeValue;
use crate::dn::{self, DnValue, NameComponent};
use crate::error::{Error, Result};
use crate::rdn::Rdn;

/// A distinguished name.
///
/// RDNs are stored in encoding order, most significant first. That is the
/// reverse of the usual string notation: `cn=a,o=b` holds `o=b` first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
    rdns: Vec<Rdn>,
}

impl Name {
    pub fn new(rdns: Vec<Rdn>) -> Self {
        Self { rdns }
    }

    /// Parses an RFC 2253 string.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_name_components(dn::parse(s)?)
    }

    /// Builds a name from parser output.
    ///
    /// String values are encoded in the string type conventional for their
    /// attribute type; hexstring values are used as decoded.
    pub fn from_name_components(components: Vec<NameComponent>) -> Result<Self> {
        let rdns = components
            .into_iter()
            .map(|component| {
                let attributes = component
                    .into_iter()
                    .map(|(name, value)| {
                        let attr_type = AttributeType::from_name(&name)?;
                        let element = match value {
                            DnValue::String(s) => attr_type.string_element(&s)?,
                            DnValue::Element(element) => element,
                        };
                        let value = AttributeValue::from_element_by_oid(attr_type.oid(), element)?;
                        AttributeTypeAndValue::new(attr_type, value)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Rdn::new(attributes)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rdns })
    }

    pub fn rdns(&self) -> &[Rdn] {
        &self.rdns
    }

    pub fn len(&self) -> usize {
        self.rdns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rdn> {
        self.rdns.iter()
    }

    /// Equality under the matching rules of the values.
    ///
    /// RDNs are compared from the last to the first.
    pub fn matches(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            trace!(left = self.len(), right = other.len(), "RDN count differs");
            return false;
        }
        let matched = self
            .rdns
            .iter()
            .rev()
            .zip(other.rdns.iter().rev())
            .all(|(a, b)| a.matches(b));
        if !matched {
            debug!(left = %self, right = %other, "names do not match");
        }
        matched
    }

    /// Value of the first RDN holding an attribute of the given type.
    ///
    /// An RDN with more than one attribute of that type is ambiguous.
    pub fn first_value_of(&self, name: &str) -> Result<&AttributeValue> {
        for rdn in &self.rdns {
            match rdn.all_of(name)?.as_slice() {
                [] => continue,
                [tv] => return Ok(tv.value()),
                _ => return Err(Error::AmbiguousAttribute(name.to_string())),
            }
        }
        Err(Error::AttributeNotFound(name.to_string()))
    }

    /// Number of attributes of the given type over all RDNs.
    pub fn count_of_type(&self, name: &str) -> Result<usize> {
        self.rdns
            .iter()
            .map(|rdn| rdn.all_of(name).map(|tvs| tvs.len()))
            .sum()
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.to_der()?)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }
}

impl<'a> IntoIterator for &'a Name {
    type Item = &'a Rdn;
    type IntoIter = std::slice::Iter<'a, Rdn>;

    fn into_iter(self) -> Self::IntoIter {
        self.rdns.iter()
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.rdns.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", rdn)?;
        }
        Ok(())
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Name::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl DecodableFrom<Element> for Name {}

impl Decoder<Element, Name> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Name> {
        match self {
            Element::Sequence(elements) => {
                let rdns = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<Rdn>>>()?;
                Ok(Name { rdns })
            }
            _ => Err(Error::NameExpectedSequence),
        }
    }
}

impl EncodableTo<Name> for Element {}

impl Encoder<Name, Element> for Name {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let rdn_elements: Result<Vec<Element>> = self.rdns.iter().map(|rdn| rdn.encode()).collect();
        Ok(Element::Sequence(rdn_elements?))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use x501_der::PrimitiveTag;

    use super::*;
    use crate::attribute_value::ValueKind;

    #[test]
    fn test_name_round_trip() {
        let name = Name::parse("name=one,name=two").unwrap();
        assert_eq!(2, name.len());
        assert_eq!("name=one,name=two", name.to_string());

        let decoded = Name::from_der(&name.to_der().unwrap()).unwrap();
        assert_eq!(name, decoded);
        assert_eq!(2, decoded.count_of_type("name").unwrap());
    }

    #[test]
    fn test_encoding_order() {
        let name = Name::parse("cn=a,o=b").unwrap();
        assert_eq!("o=b", name.rdns()[0].to_string());
        assert_eq!("cn=a", name.rdns()[1].to_string());
    }

    #[rstest]
    #[case("cn=one", "cn=one", true)]
    #[case("cn=one", "cn=ONE", true)]
    #[case("cn=one", r"cn=\ one\ ", true)]
    #[case("cn=o n e ", r"cn=\ o  n  e\ ", true)]
    #[case("cn=test1", "cn=test2", false)]
    #[case("cn=one,o=org", "cn=one", false)]
    #[case("cn=one+cn=two,o=org", "cn=two+cn=one,o=ORG", true)]
    #[case("cn=one,o=org", "o=org,cn=one", false)]
    #[case("", "", true)]
    fn test_matches(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        let a = Name::parse(a).unwrap();
        let b = Name::parse(b).unwrap();
        assert_eq!(expected, a.matches(&b));
        assert_eq!(expected, b.matches(&a));
    }

    #[test]
    fn test_string_values_use_conventional_string_type() {
        let name = Name::parse("c=FI,cn=Test").unwrap();
        let cn = name.first_value_of("cn").unwrap();
        let c = name.first_value_of("countryName").unwrap();
        assert_eq!(Some(PrimitiveTag::UTF8String), cn.string_tag());
        assert_eq!(Some(PrimitiveTag::PrintableString), c.string_tag());
        assert_eq!(Some(ValueKind::CountryName), c.kind());
    }

    #[test]
    fn test_first_value_of() {
        let name = Name::parse("cn=one,o=first,o=second").unwrap();
        // encoding order: o=second is the first RDN
        assert_eq!("second", name.first_value_of("o").unwrap().to_string());
        assert_eq!("one", name.first_value_of("2.5.4.3").unwrap().to_string());
    }

    #[test]
    fn test_first_value_of_ambiguous() {
        let name = Name::parse("cn=one+cn=two").unwrap();
        assert_eq!(
            Err(Error::AmbiguousAttribute("cn".to_string())),
            name.first_value_of("cn")
        );
        assert_eq!(2, name.count_of_type("cn").unwrap());
    }

    #[test]
    fn test_first_value_of_absent() {
        let name = Name::parse("cn=one").unwrap();
        assert_eq!(
            Err(Error::AttributeNotFound("ou".to_string())),
            name.first_value_of("ou")
        );
        assert_eq!(0, name.count_of_type("ou").unwrap());
    }

    #[test]
    fn test_unknown_attribute_name() {
        assert_eq!(
            Err(Error::UnknownAttributeName("foo".to_string())),
            Name::parse("foo=bar")
        );
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(
            Err(Error::Parse(dn::Error::UnexpectedEndOfEscape)),
            Name::parse(r"cn=\")
        );
    }

    #[test]
    fn test_hexstring_value() {
        let name = Name::parse("1.3.6.1.3=#0101ff").unwrap();
        assert_eq!(&Element::Boolean(true), name.rdns()[0].all()[0].value().element());
        assert_eq!("1.3.6.1.3=#0101ff", name.to_string());
        assert!(name.matches(&Name::parse("1.3.6.1.3=#0101FF").unwrap()));
        assert!(!name.matches(&Name::parse("1.3.6.1.3=#010100").unwrap()));
    }

    #[test]
    fn test_hexstring_for_string_attribute() {
        let hex = format!("cn=#0c04{}", hex::encode("Test"));
        let name = Name::parse(&hex).unwrap();
        assert_eq!("cn=Test", name.to_string());
        assert!(name.matches(&Name::parse("cn=test").unwrap()));
    }

    #[test]
    fn test_decode_errors() {
        let result: Result<Name> = Element::Set(vec![]).decode();
        assert_eq!(Err(Error::NameExpectedSequence), result);
        let result: Result<Name> = Element::Sequence(vec![Element::Null]).decode();
        assert_eq!(Err(Error::RdnExpectedSet), result);
    }

    fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        let mut out = vec![tag, content.len() as u8];
        out.extend_from_slice(content);
        out
    }

    #[test]
    fn test_from_der_rejects_oversized_oid_arc() {
        // 2.5.4.(2^70 + 3): must not decode as commonName
        let mut oid = vec![0x55, 0x04, 0x81];
        oid.extend([0x80; 9]);
        oid.push(0x03);
        let tv = [tlv(0x06, &oid), tlv(0x0c, b"evil")].concat();
        let der = tlv(0x30, &tlv(0x31, &tlv(0x30, &tv)));
        assert_eq!(
            Err(Error::ASN1Error(
                x501_asn1::error::Error::ObjectIdentifierArcTooLarge
            )),
            Name::from_der(&der)
        );
    }

    #[test]
    fn test_parse_rejects_unencodable_oid() {
        assert_eq!(
            Err(Error::ASN1Error(
                x501_asn1::error::Error::ObjectIdentifierArcTooLarge
            )),
            Name::parse("2.18446744073709551615=x")
        );
    }

    #[test]
    fn test_largest_encodable_oid() {
        let name = Name::parse("2.18446744073709551535=x+cn=y").unwrap();
        assert!(name.matches(&Name::parse("cn=y+2.18446744073709551535=x").unwrap()));
        let decoded = Name::from_der(&name.to_der().unwrap()).unwrap();
        assert!(name.matches(&decoded));
        assert_eq!("2.18446744073709551535=#0c0178+cn=y", name.to_string());
    }

    #[test]
    fn test_opaque_value_keeps_its_encoding() {
        // INTEGER 127 with a redundant leading zero octet
        let name = Name::parse("1.3.6.1.3=#0202007f").unwrap();
        assert_eq!("1.3.6.1.3=#0202007f", name.to_string());
        assert!(!name.matches(&Name::parse("1.3.6.1.3=#02017f").unwrap()));
    }

    #[test]
    fn test_serde() {
        let name = Name::parse("cn=John Doe,o=Example\\, Inc.,c=US").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(r#""cn=John Doe,o=Example\\, Inc.,c=US""#, json);
        let deserialized: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name, deserialized);
    }
}
