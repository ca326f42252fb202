//! Attribute types and the short name registry.
//!
//! Short names follow the LDAP schemas (RFC 4519, RFC 4524) plus the PKCS #9
//! `emailAddress`. Lookups by name are case-insensitive; the first name in
//! each entry is the one used for display.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_asn1::{Element, ObjectIdentifier, is_printable_string};
use x501_der::PrimitiveTag;

use crate::OidName;
use crate::error::{Error, Result};

#[rustfmt::skip]
const REGISTRY: &[(&str, &[&str])] = &[
    (AttributeType::OID_OBJECT_CLASS, &["objectClass"]),
    (AttributeType::OID_ALIASED_OBJECT_NAME, &["aliasedObjectName", "aliasedEntryName"]),
    (AttributeType::OID_KNOWLEDGE_INFORMATION, &["knowledgeInformation"]),
    (AttributeType::OID_COMMON_NAME, &["cn", "commonName"]),
    (AttributeType::OID_SURNAME, &["sn", "surname"]),
    (AttributeType::OID_SERIAL_NUMBER, &["serialNumber"]),
    (AttributeType::OID_COUNTRY_NAME, &["c", "countryName"]),
    (AttributeType::OID_LOCALITY_NAME, &["l", "localityName"]),
    (AttributeType::OID_STATE_OR_PROVINCE_NAME, &["st", "stateOrProvinceName"]),
    (AttributeType::OID_STREET_ADDRESS, &["street", "streetAddress"]),
    (AttributeType::OID_ORGANIZATION_NAME, &["o", "organizationName"]),
    (AttributeType::OID_ORGANIZATIONAL_UNIT_NAME, &["ou", "organizationalUnitName"]),
    (AttributeType::OID_TITLE, &["title"]),
    (AttributeType::OID_DESCRIPTION, &["description"]),
    (AttributeType::OID_BUSINESS_CATEGORY, &["businessCategory"]),
    (AttributeType::OID_POSTAL_ADDRESS, &["postalAddress"]),
    (AttributeType::OID_POSTAL_CODE, &["postalCode"]),
    (AttributeType::OID_POST_OFFICE_BOX, &["postOfficeBox"]),
    (AttributeType::OID_TELEPHONE_NUMBER, &["telephoneNumber"]),
    (AttributeType::OID_NAME, &["name"]),
    (AttributeType::OID_GIVEN_NAME, &["givenName", "gn"]),
    (AttributeType::OID_INITIALS, &["initials"]),
    (AttributeType::OID_GENERATION_QUALIFIER, &["generationQualifier"]),
    (AttributeType::OID_UNIQUE_IDENTIFIER, &["x500UniqueIdentifier"]),
    (AttributeType::OID_DN_QUALIFIER, &["dnQualifier"]),
    (AttributeType::OID_DISTINGUISHED_NAME, &["distinguishedName"]),
    (AttributeType::OID_PSEUDONYM, &["pseudonym"]),
    (AttributeType::OID_USER_ID, &["uid", "userid"]),
    (AttributeType::OID_MAIL, &["mail", "rfc822Mailbox"]),
    (AttributeType::OID_DOMAIN_COMPONENT, &["dc", "domainComponent"]),
    (AttributeType::OID_EMAIL_ADDRESS, &["emailAddress", "email", "pkcs9email"]),
];

static NAME_TO_OID: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    REGISTRY
        .iter()
        .flat_map(|(oid, names)| names.iter().map(move |name| (name.to_ascii_lowercase(), *oid)))
        .collect()
});

static OID_TO_NAME: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    REGISTRY
        .iter()
        .filter_map(|(oid, names)| names.first().map(|name| (*oid, *name)))
        .collect()
});

/// An attribute type: an OID and, when registered, its short name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeType {
    oid: ObjectIdentifier,
    name: Option<&'static str>,
}

impl AttributeType {
    pub const OID_OBJECT_CLASS: &'static str = "2.5.4.0";
    pub const OID_ALIASED_OBJECT_NAME: &'static str = "2.5.4.1";
    pub const OID_KNOWLEDGE_INFORMATION: &'static str = "2.5.4.2";
    /// OID for commonName (cn)
    pub const OID_COMMON_NAME: &'static str = "2.5.4.3";
    /// OID for surname (sn)
    pub const OID_SURNAME: &'static str = "2.5.4.4";
    pub const OID_SERIAL_NUMBER: &'static str = "2.5.4.5";
    /// OID for countryName (c)
    pub const OID_COUNTRY_NAME: &'static str = "2.5.4.6";
    /// OID for localityName (l)
    pub const OID_LOCALITY_NAME: &'static str = "2.5.4.7";
    /// OID for stateOrProvinceName (st)
    pub const OID_STATE_OR_PROVINCE_NAME: &'static str = "2.5.4.8";
    pub const OID_STREET_ADDRESS: &'static str = "2.5.4.9";
    /// OID for organizationName (o)
    pub const OID_ORGANIZATION_NAME: &'static str = "2.5.4.10";
    /// OID for organizationalUnitName (ou)
    pub const OID_ORGANIZATIONAL_UNIT_NAME: &'static str = "2.5.4.11";
    pub const OID_TITLE: &'static str = "2.5.4.12";
    pub const OID_DESCRIPTION: &'static str = "2.5.4.13";
    pub const OID_BUSINESS_CATEGORY: &'static str = "2.5.4.15";
    pub const OID_POSTAL_ADDRESS: &'static str = "2.5.4.16";
    pub const OID_POSTAL_CODE: &'static str = "2.5.4.17";
    pub const OID_POST_OFFICE_BOX: &'static str = "2.5.4.18";
    pub const OID_TELEPHONE_NUMBER: &'static str = "2.5.4.20";
    pub const OID_NAME: &'static str = "2.5.4.41";
    pub const OID_GIVEN_NAME: &'static str = "2.5.4.42";
    pub const OID_INITIALS: &'static str = "2.5.4.43";
    pub const OID_GENERATION_QUALIFIER: &'static str = "2.5.4.44";
    pub const OID_UNIQUE_IDENTIFIER: &'static str = "2.5.4.45";
    pub const OID_DN_QUALIFIER: &'static str = "2.5.4.46";
    pub const OID_DISTINGUISHED_NAME: &'static str = "2.5.4.49";
    pub const OID_PSEUDONYM: &'static str = "2.5.4.65";
    pub const OID_USER_ID: &'static str = "0.9.2342.19200300.100.1.1";
    pub const OID_MAIL: &'static str = "0.9.2342.19200300.100.1.3";
    /// OID for domainComponent (dc)
    pub const OID_DOMAIN_COMPONENT: &'static str = "0.9.2342.19200300.100.1.25";
    /// OID for the PKCS #9 emailAddress
    pub const OID_EMAIL_ADDRESS: &'static str = "1.2.840.113549.1.9.1";

    pub fn new(oid: ObjectIdentifier) -> Self {
        let name = OID_TO_NAME.get(oid.to_string().as_str()).copied();
        Self { oid, name }
    }

    /// Resolves a short name (any case) or a dotted OID.
    pub fn from_name(name: &str) -> Result<Self> {
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(Self::new(ObjectIdentifier::from_str(name)?));
        }
        let oid = NAME_TO_OID
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownAttributeName(name.to_string()))?;
        Ok(Self::new(ObjectIdentifier::from_str(oid)?))
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Short name if registered, otherwise the dotted OID.
    pub fn type_name(&self) -> String {
        self.name
            .map(str::to_string)
            .unwrap_or_else(|| self.oid.to_string())
    }

    /// Wraps a DN string value in the string type conventionally used for
    /// this attribute.
    pub fn string_element(&self, value: &str) -> Result<Element> {
        match self.oid.to_string().as_str() {
            Self::OID_COUNTRY_NAME | Self::OID_SERIAL_NUMBER | Self::OID_DN_QUALIFIER => {
                if !is_printable_string(value) {
                    return Err(Error::StringNotRepresentable {
                        tag: PrimitiveTag::PrintableString,
                        value: value.to_string(),
                    });
                }
                Ok(Element::PrintableString(value.to_string()))
            }
            Self::OID_EMAIL_ADDRESS | Self::OID_DOMAIN_COMPONENT => {
                if !value.is_ascii() {
                    return Err(Error::StringNotRepresentable {
                        tag: PrimitiveTag::IA5String,
                        value: value.to_string(),
                    });
                }
                Ok(Element::IA5String(value.to_string()))
            }
            _ => Ok(Element::UTF8String(value.to_string())),
        }
    }
}

impl From<ObjectIdentifier> for AttributeType {
    fn from(oid: ObjectIdentifier) -> Self {
        Self::new(oid)
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl OidName for AttributeType {
    fn oid_name(&self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl DecodableFrom<Element> for AttributeType {}

impl Decoder<Element, AttributeType> for Element {
    type Error = Error;

    fn decode(&self) -> Result<AttributeType> {
        let Element::ObjectIdentifier(oid) = self else {
            return Err(Error::AttributeTypeAndValueExpectedOid);
        };
        Ok(AttributeType::new(oid.clone()))
    }
}

impl EncodableTo<AttributeType> for Element {}

impl Encoder<AttributeType, Element> for AttributeType {
    type Error = Error;

    fn encode(&self) -> Result<Element> {
        Ok(Element::ObjectIdentifier(self.oid.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("cn", AttributeType::OID_COMMON_NAME, "cn")]
    #[case("CN", AttributeType::OID_COMMON_NAME, "cn")]
    #[case("commonName", AttributeType::OID_COMMON_NAME, "cn")]
    #[case("C", AttributeType::OID_COUNTRY_NAME, "c")]
    #[case("name", AttributeType::OID_NAME, "name")]
    #[case("gn", AttributeType::OID_GIVEN_NAME, "givenName")]
    #[case("DC", AttributeType::OID_DOMAIN_COMPONENT, "dc")]
    #[case("email", AttributeType::OID_EMAIL_ADDRESS, "emailAddress")]
    #[case("2.5.4.10", AttributeType::OID_ORGANIZATION_NAME, "o")]
    #[case("1.3.6.1.3", "1.3.6.1.3", "1.3.6.1.3")]
    fn test_from_name(#[case] input: &str, #[case] oid: &str, #[case] type_name: &str) {
        let attr_type = AttributeType::from_name(input).unwrap();
        assert_eq!(oid, attr_type.oid().to_string());
        assert_eq!(type_name, attr_type.type_name());
    }

    #[test]
    fn test_from_unknown_name() {
        assert_eq!(
            Err(Error::UnknownAttributeName("unknown".to_string())),
            AttributeType::from_name("unknown")
        );
    }

    #[test]
    fn test_unknown_oid_has_no_name() {
        let attr_type = AttributeType::new(ObjectIdentifier::from_str("1.3.6.1.3").unwrap());
        assert_eq!(None, attr_type.name());
        assert_eq!(None, attr_type.oid_name());
        assert_eq!("1.3.6.1.3", attr_type.to_string());
    }

    #[test]
    fn test_every_registered_oid_parses() {
        for (oid, names) in REGISTRY {
            let attr_type = AttributeType::from_str(oid).unwrap();
            assert_eq!(names.first().copied(), attr_type.name());
        }
    }

    #[test]
    fn test_encode_decode() {
        let attr_type = AttributeType::from_name("name").unwrap();
        let element = attr_type.encode().unwrap();
        let der = element.to_der().unwrap();
        let decoded: AttributeType = Element::from_der(&der).unwrap().decode().unwrap();
        assert_eq!(attr_type, decoded);
        assert_eq!(AttributeType::OID_NAME, decoded.oid().to_string());
    }

    #[rstest]
    #[case("c", "FI", Element::PrintableString("FI".to_string()))]
    #[case("serialNumber", "1234", Element::PrintableString("1234".to_string()))]
    #[case("dc", "example", Element::IA5String("example".to_string()))]
    #[case("cn", "Ädmin", Element::UTF8String("Ädmin".to_string()))]
    #[case("1.3.6.1.3", "Test", Element::UTF8String("Test".to_string()))]
    fn test_string_element(#[case] name: &str, #[case] value: &str, #[case] expected: Element) {
        let attr_type = AttributeType::from_name(name).unwrap();
        assert_eq!(expected, attr_type.string_element(value).unwrap());
    }

    #[rstest]
    #[case("c", "F*", PrimitiveTag::PrintableString)]
    #[case("emailAddress", "ä@example.com", PrimitiveTag::IA5String)]
    fn test_string_element_not_representable(
        #[case] name: &str,
        #[case] value: &str,
        #[case] tag: PrimitiveTag,
    ) {
        let attr_type = AttributeType::from_name(name).unwrap();
        let error = attr_type.string_element(value).unwrap_err();
        assert_eq!(
            Error::StringNotRepresentable {
                tag,
                value: value.to_string()
            },
            error
        );
    }
}
