use x501_asn1::{BMPString, Element, ObjectIdentifier, TeletexString, UniversalString, is_printable_string};
use x501_der::PrimitiveTag;

use super::ValueKind;
use super::syntax::Syntax;
use crate::dn;
use crate::error::{Error, Result};
use crate::string_prep::TranscodeStep;

/// A string-typed attribute value.
///
/// Keeps the element it was built from, so the chosen string type survives
/// re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    kind: ValueKind,
    oid: ObjectIdentifier,
    element: Element,
}

/// String type of an element, if it is one of the character string types.
pub(crate) fn string_tag(element: &Element) -> Option<PrimitiveTag> {
    match element {
        Element::UTF8String(_) => Some(PrimitiveTag::UTF8String),
        Element::PrintableString(_) => Some(PrimitiveTag::PrintableString),
        Element::TeletexString(_) => Some(PrimitiveTag::TeletexString),
        Element::IA5String(_) => Some(PrimitiveTag::IA5String),
        Element::UniversalString(_) => Some(PrimitiveTag::UniversalString),
        Element::BMPString(_) => Some(PrimitiveTag::BMPString),
        _ => None,
    }
}

/// Builds a string element of the given type from text.
pub(crate) fn string_element(tag: PrimitiveTag, value: &str) -> Result<Element> {
    let element = match tag {
        PrimitiveTag::UTF8String => Element::UTF8String(value.to_string()),
        PrimitiveTag::PrintableString => {
            if !is_printable_string(value) {
                return Err(Error::StringNotRepresentable {
                    tag,
                    value: value.to_string(),
                });
            }
            Element::PrintableString(value.to_string())
        }
        PrimitiveTag::BMPString => Element::BMPString(BMPString::new(value)?),
        PrimitiveTag::UniversalString => Element::UniversalString(UniversalString::new(value)),
        // T.61 octets are taken as given
        PrimitiveTag::TeletexString => Element::TeletexString(TeletexString::from(value.as_bytes())),
        _ => return Err(Error::TranscodeUnsupportedTag(tag)),
    };
    Ok(element)
}

impl StringValue {
    pub fn from_element(kind: ValueKind, element: Element) -> Result<Self> {
        let syntax = kind.syntax();
        match string_tag(&element) {
            Some(tag) if syntax.accepts(tag) => Ok(Self {
                kind,
                oid: kind.oid()?,
                element,
            }),
            _ => Err(Error::UnsupportedStringType {
                syntax: syntax.name(),
                tag: element.tag(),
            }),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn syntax(&self) -> Syntax {
        self.kind.syntax()
    }

    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn string_tag(&self) -> PrimitiveTag {
        // from_element only admits string elements
        string_tag(&self.element).unwrap_or(PrimitiveTag::UTF8String)
    }

    /// Content octets of the string element.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.element {
            Element::UTF8String(s) | Element::PrintableString(s) | Element::IA5String(s) => {
                s.as_bytes()
            }
            Element::TeletexString(s) => s.as_bytes(),
            Element::UniversalString(s) => s.as_bytes(),
            Element::BMPString(s) => s.as_bytes(),
            _ => &[],
        }
    }

    /// The value as UTF-8 text. TeletexString comes out as a `#` hexstring.
    pub fn transcoded(&self) -> Result<String> {
        TranscodeStep::new(self.string_tag()).apply(self.as_bytes())
    }

    pub fn rfc2253_string(&self) -> Result<String> {
        let transcoded = self.transcoded()?;
        // already a hexstring
        if self.string_tag() == PrimitiveTag::TeletexString {
            return Ok(transcoded);
        }
        Ok(dn::escape_string(&transcoded)?)
    }
}
