//! X.501 Distinguished Names
//!
//! This crate parses and renders distinguished names in their string form
//! and decides whether two names denote the same entity.
//!
//! Defined in:
//! - X.501 / X.520: Name, RelativeDistinguishedName, attribute types and syntaxes
//! - RFC 2253 (and RFC 1779): string representation of distinguished names
//! - RFC 4517 / RFC 4518: matching rules and string preparation
//!
//! ```
//! use x501_name::Name;
//!
//! let name: Name = "cn=John Doe,o=Example".parse().unwrap();
//! let other: Name = "CN=john  doe , O=EXAMPLE".parse().unwrap();
//! assert!(name.matches(&other));
//! assert_eq!("cn=John Doe,o=Example", name.to_string());
//! ```

pub mod attribute;
pub mod attribute_type;
pub mod attribute_type_and_value;
pub mod attribute_value;
pub mod dn;
pub mod error;
pub mod matching_rule;
pub mod name;
pub mod oid_name;
pub mod rdn;
pub mod string_prep;

pub use attribute::Attribute;
pub use attribute_type::AttributeType;
pub use attribute_type_and_value::AttributeTypeAndValue;
pub use attribute_value::{AttributeValue, ValueKind};
pub use error::{Error, ErrorKind, Result};
pub use matching_rule::{MatchResult, MatchingRule};
pub use name::Name;
pub use oid_name::OidName;
pub use rdn::Rdn;
pub use string_prep::StringPreparer;

/// Sorts SET OF members into DER order: ascending by their encodings.
pub(crate) fn sort_set_of<T>(
    members: Vec<T>,
    to_der: impl Fn(&T) -> Result<Vec<u8>>,
) -> Result<Vec<T>> {
    let mut keyed = members
        .into_iter()
        .map(|member| -> Result<(Vec<u8>, T)> { Ok((to_der(&member)?, member)) })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, member)| member).collect())
}

#[cfg(test)]
mod tests {
    use x501_asn1::Element;

    use super::*;

    #[test]
    fn test_sort_set_of() {
        let elements = vec![
            Element::UTF8String("b".to_string()),
            Element::Boolean(true),
            Element::UTF8String("a".to_string()),
            Element::UTF8String("aa".to_string()),
        ];
        let sorted = sort_set_of(elements, |e| Ok(e.to_der()?)).unwrap();
        assert_eq!(
            vec![
                Element::Boolean(true),
                Element::UTF8String("a".to_string()),
                Element::UTF8String("b".to_string()),
                Element::UTF8String("aa".to_string()),
            ],
            sorted
        );
    }
}
