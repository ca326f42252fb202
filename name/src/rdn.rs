//! RelativeDistinguishedName
//!
//! ```asn1
//! RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue
//! ```

use std::fmt;

use tracing::debug;
use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_asn1::Element;

use crate::attribute_type::AttributeType;
use crate::attribute_type_and_value::AttributeTypeAndValue;
use crate::attribute_value::AttributeValue;
use crate::error::{Error, Result};
use crate::sort_set_of;

/// A non-empty set of attribute type and value pairs.
///
/// Members keep their insertion order. `PartialEq` compares that order as
/// is; use [`Rdn::matches`] for equality under the matching rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rdn {
    attributes: Vec<AttributeTypeAndValue>,
}

impl Rdn {
    pub fn new(attributes: Vec<AttributeTypeAndValue>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(Error::EmptyRdn);
        }
        Ok(Self { attributes })
    }

    pub fn from_values(values: Vec<AttributeValue>) -> Result<Self> {
        Self::new(
            values
                .into_iter()
                .map(AttributeTypeAndValue::from_value)
                .collect(),
        )
    }

    pub fn all(&self) -> &[AttributeTypeAndValue] {
        &self.attributes
    }

    /// Members of the given type, by short name or dotted OID.
    pub fn all_of(&self, name: &str) -> Result<Vec<&AttributeTypeAndValue>> {
        let attr_type = AttributeType::from_name(name)?;
        Ok(self
            .attributes
            .iter()
            .filter(|tv| tv.attr_type().oid() == attr_type.oid())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeTypeAndValue> {
        self.attributes.iter()
    }

    /// Members in DER SET OF order.
    pub fn canonical(&self) -> Result<Self> {
        Ok(Self {
            attributes: sort_set_of(self.attributes.clone(), AttributeTypeAndValue::to_der)?,
        })
    }

    /// Equality under the members' matching rules, regardless of member order.
    pub fn matches(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        if self.len() == 1 {
            return self.attributes[0].matches(&other.attributes[0]);
        }
        let (a, b) = match (self.canonical(), other.canonical()) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "failed to canonicalize RDN");
                return false;
            }
        };
        a.iter().zip(b.iter()).all(|(x, y)| x.matches(y))
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.to_der()?)
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Element::from_der(der)?.decode()
    }
}

impl<'a> IntoIterator for &'a Rdn {
    type Item = &'a AttributeTypeAndValue;
    type IntoIter = std::slice::Iter<'a, AttributeTypeAndValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl fmt::Display for Rdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tv) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{}", tv)?;
        }
        Ok(())
    }
}

impl DecodableFrom<Element> for Rdn {}

impl Decoder<Element, Rdn> for Element {
    type Error = Error;

    fn decode(&self) -> Result<Rdn> {
        match self {
            Element::Set(elements) => {
                let attributes = elements
                    .iter()
                    .map(|elem| elem.decode())
                    .collect::<Result<Vec<AttributeTypeAndValue>>>()?;
                Rdn::new(attributes)
            }
            _ => Err(Error::RdnExpectedSet),
        }
    }
}

impl EncodableTo<Rdn> for Element {}

impl Encoder<Rdn, Element> for Rdn {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        let canonical = self.canonical()?;
        let attr_elements: Result<Vec<Element>> =
            canonical.attributes.iter().map(|attr| attr.encode()).collect();
        Ok(Element::Set(attr_elements?))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::attribute_value::ValueKind;

    fn cn(text: &str) -> AttributeTypeAndValue {
        AttributeValue::new(ValueKind::CommonName, text)
            .unwrap()
            .to_type_and_value()
    }

    fn rdn(values: &[&str]) -> Rdn {
        Rdn::new(values.iter().map(|v| cn(v)).collect()).unwrap()
    }

    #[test]
    fn test_empty_rdn() {
        assert_eq!(Err(Error::EmptyRdn), Rdn::new(vec![]));
        assert_eq!(Err(Error::EmptyRdn), Rdn::from_values(vec![]));
    }

    #[test]
    fn test_from_values() {
        let rdn = Rdn::from_values(vec![
            AttributeValue::new(ValueKind::CommonName, "one").unwrap(),
            AttributeValue::new(ValueKind::Name, "two").unwrap(),
        ])
        .unwrap();
        assert_eq!(2, rdn.len());
        assert_eq!(1, rdn.all_of("cn").unwrap().len());
        assert_eq!(1, rdn.all_of("2.5.4.41").unwrap().len());
        assert!(rdn.all_of("o").unwrap().is_empty());
        assert!(matches!(rdn.all_of("nope"), Err(Error::UnknownAttributeName(_))));
    }

    #[rstest]
    #[case(&["one"], &["ONE"], true)]
    #[case(&["one", "two"], &["two", "one"], true)]
    #[case(&["one", "two"], &["TWO", " one "], true)]
    #[case(&["one", "two"], &["one"], false)]
    #[case(&["one", "two"], &["one", "three"], false)]
    fn test_matches(#[case] a: &[&str], #[case] b: &[&str], #[case] expected: bool) {
        assert_eq!(expected, rdn(a).matches(&rdn(b)));
    }

    #[test]
    fn test_canonical_order() {
        let a = rdn(&["one", "two"]);
        let b = rdn(&["two", "one"]);
        assert_ne!(a, b);
        assert_eq!(a.canonical().unwrap(), b.canonical().unwrap());
        assert_eq!(a.to_der().unwrap(), b.to_der().unwrap());
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let once = rdn(&["two", "one", "three"]).canonical().unwrap();
        let twice = once.canonical().unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.to_der().unwrap(), twice.to_der().unwrap());
    }

    #[test]
    fn test_encode_decode() {
        let rdn = rdn(&["one", "two"]);
        let decoded = Rdn::from_der(&rdn.to_der().unwrap()).unwrap();
        assert!(rdn.matches(&decoded));
        assert_eq!(rdn.canonical().unwrap(), decoded);
    }

    #[test]
    fn test_decode_empty_set() {
        let result: Result<Rdn> = Element::Set(vec![]).decode();
        assert_eq!(Err(Error::EmptyRdn), result);
    }

    #[test]
    fn test_display_keeps_member_order() {
        assert_eq!("cn=two+cn=one", rdn(&["two", "one"]).to_string());
    }
}
