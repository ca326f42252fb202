use std::{fmt::Display, str::FromStr};

use chrono::NaiveDateTime;
use error::{Error, Result};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};
use x501_der::{Der, PrimitiveTag, Tag, Tlv};

pub mod error;
mod string;

pub use string::{BMPString, TeletexString, UniversalString, is_printable_string};

#[derive(Debug, Clone)]
pub struct ASN1Object {
    elements: Vec<Element>,
}

impl ASN1Object {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn new(elements: Vec<Element>) -> Self {
        ASN1Object { elements }
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl DecodableFrom<Der> for ASN1Object {}

impl Decoder<Der, ASN1Object> for Der {
    type Error = Error;

    fn decode(&self) -> Result<ASN1Object> {
        let elements = self
            .elements()
            .iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(ASN1Object { elements })
    }
}

impl EncodableTo<ASN1Object> for Der {}

impl Encoder<ASN1Object, Der> for ASN1Object {
    type Error = Error;

    fn encode(&self) -> Result<Der> {
        let tlvs = self
            .elements
            .iter()
            .map(|element| element.encode())
            .collect::<Result<Vec<Tlv>>>()?;
        Ok(Der::new(tlvs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(OctetString),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    UTF8String(String),
    Sequence(Vec<Element>),
    Set(Vec<Element>),
    PrintableString(String),
    TeletexString(TeletexString),
    IA5String(String),
    UTCTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    UniversalString(UniversalString),
    BMPString(BMPString),
    /// Any tag this crate does not model. Re-encodes byte for byte.
    Unimplemented(Tlv),
}

impl Element {
    /// Decodes a buffer holding exactly one DER element.
    pub fn from_der(bytes: &[u8]) -> Result<Element> {
        let der: Der = bytes.decode().map_err(Error::FailedToDecodeDer)?;
        let object: ASN1Object = der.decode()?;
        let mut elements = object.into_elements();
        match elements.len() {
            1 => Ok(elements.remove(0)),
            n => Err(Error::ExpectedSingleElement(n)),
        }
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let tlv: Tlv = self.encode()?;
        Ok(tlv.to_bytes())
    }

    pub fn tag(&self) -> Tag {
        let primitive = match self {
            Element::Boolean(_) => PrimitiveTag::Boolean,
            Element::Integer(_) => PrimitiveTag::Integer,
            Element::BitString(_) => PrimitiveTag::BitString,
            Element::OctetString(_) => PrimitiveTag::OctetString,
            Element::Null => PrimitiveTag::Null,
            Element::ObjectIdentifier(_) => PrimitiveTag::ObjectIdentifier,
            Element::UTF8String(_) => PrimitiveTag::UTF8String,
            Element::Sequence(_) => PrimitiveTag::Sequence,
            Element::Set(_) => PrimitiveTag::Set,
            Element::PrintableString(_) => PrimitiveTag::PrintableString,
            Element::TeletexString(_) => PrimitiveTag::TeletexString,
            Element::IA5String(_) => PrimitiveTag::IA5String,
            Element::UTCTime(_) => PrimitiveTag::UTCTime,
            Element::GeneralizedTime(_) => PrimitiveTag::GeneralizedTime,
            Element::UniversalString(_) => PrimitiveTag::UniversalString,
            Element::BMPString(_) => PrimitiveTag::BMPString,
            Element::Unimplemented(tlv) => return *tlv.tag(),
        };
        Tag::from(primitive)
    }
}

impl TryFrom<&Tlv> for Element {
    type Error = Error;

    fn try_from(tlv: &Tlv) -> Result<Self> {
        let Tag::Primitive(primitive_tag, _) = tlv.tag() else {
            return Ok(Element::Unimplemented(tlv.clone()));
        };

        match (primitive_tag, tlv.data(), tlv.tlvs()) {
            (PrimitiveTag::Sequence, _, Some(tlvs)) => Ok(Element::Sequence(decode_all(tlvs)?)),
            (PrimitiveTag::Set, _, Some(tlvs)) => Ok(Element::Set(decode_all(tlvs)?)),
            (tag, Some(data), _) => {
                Ok(decode_primitive(*tag, data)?.unwrap_or_else(|| Element::Unimplemented(tlv.clone())))
            }
            // constructed encodings of string types are not valid DER
            _ => Ok(Element::Unimplemented(tlv.clone())),
        }
    }
}

fn decode_all(tlvs: &[Tlv]) -> Result<Vec<Element>> {
    tlvs.iter().map(Element::try_from).collect()
}

fn decode_primitive(tag: PrimitiveTag, data: &[u8]) -> Result<Option<Element>> {
    let element = match tag {
        PrimitiveTag::Boolean => match data {
            [0x00] => Element::Boolean(false),
            [0xff] => Element::Boolean(true),
            _ => return Err(Error::InvalidBoolean),
        },
        PrimitiveTag::Integer => {
            if data.is_empty() {
                return Err(Error::IntegerNoData);
            }
            Element::Integer(Integer::from(data))
        }
        PrimitiveTag::BitString => Element::BitString(BitString::try_from(data)?),
        PrimitiveTag::OctetString => Element::OctetString(OctetString::from(data)),
        PrimitiveTag::Null => {
            if !data.is_empty() {
                return Err(Error::NullWithContent(data.len()));
            }
            Element::Null
        }
        PrimitiveTag::ObjectIdentifier => {
            Element::ObjectIdentifier(ObjectIdentifier::try_from(data)?)
        }
        PrimitiveTag::UTF8String => Element::UTF8String(
            String::from_utf8(data.to_vec()).map_err(|_| Error::Utf8StringInvalidUtf8)?,
        ),
        PrimitiveTag::PrintableString => {
            let s = std::str::from_utf8(data).map_err(|_| Error::PrintableStringInvalidEncoding)?;
            if !is_printable_string(s) {
                return Err(Error::PrintableStringInvalidEncoding);
            }
            Element::PrintableString(s.to_string())
        }
        PrimitiveTag::TeletexString => Element::TeletexString(TeletexString::from(data)),
        PrimitiveTag::IA5String => {
            if !data.is_ascii() {
                return Err(Error::Ia5StringInvalidEncoding);
            }
            Element::IA5String(
                String::from_utf8(data.to_vec()).map_err(|_| Error::Ia5StringInvalidEncoding)?,
            )
        }
        PrimitiveTag::UTCTime => Element::UTCTime(parse_utc_time(data)?),
        PrimitiveTag::GeneralizedTime => Element::GeneralizedTime(parse_generalized_time(data)?),
        PrimitiveTag::UniversalString => {
            Element::UniversalString(UniversalString::from_bytes(data.to_vec())?)
        }
        PrimitiveTag::BMPString => Element::BMPString(BMPString::from_bytes(data.to_vec())?),
        PrimitiveTag::Sequence | PrimitiveTag::Set | PrimitiveTag::Unimplemented(_) => {
            return Ok(None);
        }
    };
    Ok(Some(element))
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Boolean(b) => write!(f, "Boolean({})", b),
            Element::Integer(i) => write!(f, "Integer({})", i),
            Element::BitString(bs) => write!(f, "BitString({})", bs),
            Element::OctetString(os) => write!(f, "OctetString({})", os),
            Element::Null => write!(f, "Null"),
            Element::ObjectIdentifier(oid) => write!(f, "ObjectIdentifier({})", oid),
            Element::UTF8String(s) => write!(f, "UTF8String({})", s),
            Element::Sequence(seq) => write!(f, "Sequence({:?})", seq),
            Element::Set(set) => write!(f, "Set({:?})", set),
            Element::PrintableString(s) => write!(f, "PrintableString({})", s),
            Element::TeletexString(s) => write!(f, "TeletexString({})", s),
            Element::IA5String(s) => write!(f, "IA5String({})", s),
            Element::UTCTime(dt) => write!(f, "UTCTime({})", dt),
            Element::GeneralizedTime(dt) => write!(f, "GeneralizedTime({})", dt),
            Element::UniversalString(s) => write!(f, "UniversalString({})", s),
            Element::BMPString(s) => write!(f, "BMPString({})", s),
            Element::Unimplemented(tlv) => write!(f, "Unimplemented({:?})", tlv),
        }
    }
}

fn primitive(tag: PrimitiveTag, data: Vec<u8>) -> Tlv {
    Tlv::new_primitive(Tag::from(tag), data)
}

fn constructed(tag: PrimitiveTag, elements: &[Element]) -> Result<Tlv> {
    let tlvs = elements
        .iter()
        .map(Tlv::try_from)
        .collect::<Result<Vec<_>>>()?;
    Ok(Tlv::new_constructed(Tag::from(tag), tlvs))
}

impl TryFrom<&Element> for Tlv {
    type Error = Error;

    fn try_from(element: &Element) -> Result<Self> {
        let tlv = match element {
            Element::Boolean(b) => primitive(PrimitiveTag::Boolean, vec![if *b { 0xff } else { 0x00 }]),
            Element::Integer(i) => primitive(PrimitiveTag::Integer, i.as_bytes().to_vec()),
            Element::BitString(bs) => primitive(PrimitiveTag::BitString, Vec::from(bs.clone())),
            Element::OctetString(os) => primitive(PrimitiveTag::OctetString, os.as_bytes().to_vec()),
            Element::Null => primitive(PrimitiveTag::Null, vec![]),
            Element::ObjectIdentifier(oid) => {
                primitive(PrimitiveTag::ObjectIdentifier, Vec::try_from(oid)?)
            }
            Element::UTF8String(s) => primitive(PrimitiveTag::UTF8String, s.as_bytes().to_vec()),
            Element::Sequence(elements) => constructed(PrimitiveTag::Sequence, elements)?,
            Element::Set(elements) => constructed(PrimitiveTag::Set, elements)?,
            Element::PrintableString(s) => {
                primitive(PrimitiveTag::PrintableString, s.as_bytes().to_vec())
            }
            Element::TeletexString(s) => {
                primitive(PrimitiveTag::TeletexString, s.as_bytes().to_vec())
            }
            Element::IA5String(s) => primitive(PrimitiveTag::IA5String, s.as_bytes().to_vec()),
            Element::UTCTime(dt) => {
                let time_str = dt.format("%y%m%d%H%M%SZ").to_string();
                primitive(PrimitiveTag::UTCTime, time_str.into_bytes())
            }
            Element::GeneralizedTime(dt) => {
                let time_str = dt.format("%Y%m%d%H%M%SZ").to_string();
                primitive(PrimitiveTag::GeneralizedTime, time_str.into_bytes())
            }
            Element::UniversalString(s) => {
                primitive(PrimitiveTag::UniversalString, s.as_bytes().to_vec())
            }
            Element::BMPString(s) => primitive(PrimitiveTag::BMPString, s.as_bytes().to_vec()),
            Element::Unimplemented(tlv) => tlv.clone(),
        };
        Ok(tlv)
    }
}

impl EncodableTo<Element> for Tlv {}

impl Encoder<Element, Tlv> for Element {
    type Error = Error;

    fn encode(&self) -> Result<Tlv> {
        Tlv::try_from(self)
    }
}

// ASN1 integer is possible to be a positive and negative value.
// This can be arbitrary sized values.
// The content octets are kept as read so that a decoded value re-encodes
// byte for byte, even when the input was not minimal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
    content: Vec<u8>,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer::from(inner))
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
            content: value.to_vec(),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        let content = inner.to_signed_bytes_be();
        Integer { inner, content }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::from(BigInt::from(value))
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        // base-128 sub-identifiers, high bit set on all but the last octet
        let mut sub_identifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for &v in value {
            if !pending && v == 0x80 {
                return Err(Error::ObjectIdentifierNonMinimalEncoding);
            }
            if val >> 57 != 0 {
                return Err(Error::ObjectIdentifierArcTooLarge);
            }
            val = (val << 7) | u64::from(v & 0x7f);
            pending = v & 0x80 != 0;
            if !pending {
                sub_identifiers.push(val);
                val = 0;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // the first sub-identifier packs the first two arcs
        let first = sub_identifiers[0];
        let (arc0, arc1) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = vec![arc0, arc1];
        inner.extend_from_slice(&sub_identifiers[1..]);

        Ok(ObjectIdentifier { inner })
    }
}

impl TryFrom<&ObjectIdentifier> for Vec<u8> {
    type Error = Error;

    fn try_from(oid: &ObjectIdentifier) -> Result<Self> {
        let [arc0, arc1, rest @ ..] = oid.inner.as_slice() else {
            return Err(Error::ObjectIdentifierTooFewComponents);
        };

        let first = arc0
            .checked_mul(40)
            .and_then(|v| v.checked_add(*arc1))
            .ok_or(Error::ObjectIdentifierArcTooLarge)?;

        let mut result = Vec::new();
        for v in std::iter::once(first).chain(rest.iter().copied()) {
            let mut encoded = vec![(v & 0x7f) as u8];
            let mut value = v >> 7;
            while value > 0 {
                encoded.push((value & 0x7f) as u8 | 0x80);
                value >>= 7;
            }
            result.extend(encoded.iter().rev());
        }

        Ok(result)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::ObjectIdentifierEmptyString);
        }
        let inner = s
            .split('.')
            .map(|component| {
                if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::ObjectIdentifierInvalidComponent(component.to_string()));
                }
                component.parse::<u64>().map_err(Error::ParseInt)
            })
            .collect::<Result<Vec<u64>>>()?;

        match inner.as_slice() {
            [_] => Err(Error::ObjectIdentifierTooFewComponents),
            [arc0, ..] if *arc0 > 2 => {
                Err(Error::ObjectIdentifierInvalidComponent(arc0.to_string()))
            }
            [arc0, arc1, ..] if *arc0 < 2 && *arc1 >= 40 => {
                Err(Error::ObjectIdentifierInvalidComponent(arc1.to_string()))
            }
            // the first two arcs share one sub-identifier: 80 + arc1
            [2, arc1, ..] if *arc1 > u64::MAX - 80 => {
                Err(Error::ObjectIdentifierArcTooLarge)
            }
            _ => Ok(ObjectIdentifier { inner }),
        }
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<ObjectIdentifier> for &str {
    fn eq(&self, other: &ObjectIdentifier) -> bool {
        *self == other.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Self {
        BitString { unused, data }
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        match value {
            [] => Err(Error::BitStringNoData),
            [unused, ..] if *unused > 7 => Err(Error::BitStringUnusedBitsOutOfRange(*unused)),
            [unused, data @ ..] => Ok(BitString {
                unused: *unused,
                data: data.to_vec(),
            }),
        }
    }
}

impl From<BitString> for Vec<u8> {
    fn from(value: BitString) -> Self {
        let mut result = Vec::with_capacity(value.data.len() + 1);
        result.push(value.unused);
        result.extend(value.data);
        result
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut result = String::new();

        for (i, byte) in self.data.iter().enumerate() {
            if i == self.data.len() - 1 && self.unused > 0 {
                // Handle the last byte with unused bits
                let valid_bits = byte >> self.unused;
                let bit_count = 8 - self.unused as usize;
                result.push_str(&format!("{:0bit_count$b}", valid_bits));
            } else {
                result.push_str(&format!("{:08b}", byte));
            }
        }

        write!(f, "{}", result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OctetString {
    inner: Vec<u8>,
}

impl OctetString {
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(value: Vec<u8>) -> Self {
        OctetString { inner: value }
    }
}

impl From<&[u8]> for OctetString {
    fn from(value: &[u8]) -> Self {
        OctetString {
            inner: value.to_vec(),
        }
    }
}

impl Display for OctetString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        write!(f, "{}", s)
    }
}

fn parse_utc_time(data: &[u8]) -> Result<NaiveDateTime> {
    let s = std::str::from_utf8(data).map_err(|_| Error::UtcTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%y%m%d%H%M%SZ").map_err(|_| Error::UtcTimeInvalidFormat)
}

fn parse_generalized_time(data: &[u8]) -> Result<NaiveDateTime> {
    let s = std::str::from_utf8(data).map_err(|_| Error::GeneralizedTimeInvalidFormat)?;
    NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ")
        .map_err(|_| Error::GeneralizedTimeInvalidFormat)
}
