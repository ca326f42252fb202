use x501_asn1::{Element, ObjectIdentifier};

use crate::error::Result;

/// Value of an attribute type without a registered syntax.
///
/// The element is kept verbatim and only ever compared byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttributeValue {
    oid: ObjectIdentifier,
    element: Element,
}

impl UnknownAttributeValue {
    pub fn new(oid: ObjectIdentifier, element: Element) -> Self {
        Self { oid, element }
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.element.to_der()?)
    }

    /// `#` followed by the hex encoded DER.
    pub fn rfc2253_string(&self) -> Result<String> {
        Ok(format!("#{}", hex::encode(self.to_der()?)))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Element::UTF8String("Test".to_string()), format!("#0c04{}", hex::encode("Test")))]
    #[case(Element::Boolean(true), "#0101ff".to_string())]
    #[case(Element::Null, "#0500".to_string())]
    fn test_rfc2253_string(#[case] element: Element, #[case] expected: String) {
        let oid = ObjectIdentifier::from_str("1.3.6.1.3").unwrap();
        let value = UnknownAttributeValue::new(oid, element);
        assert_eq!(expected, value.rfc2253_string().unwrap());
    }
}
