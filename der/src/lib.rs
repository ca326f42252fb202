//! Distinguished Encoding Rules (DER) framing.
//!
//! This crate only knows about identifier octets, definite lengths and
//! nesting. Interpreting the content octets is left to `x501-asn1`.

use nom::{IResult, Parser, bytes::complete::take, number::complete::be_u8};
use x501::decoder::{DecodableFrom, Decoder};
use x501::encoder::{EncodableTo, Encoder};

pub mod error;

use error::Error;

/// Bit 6 of the identifier octet.
pub const TAG_CONSTRUCTED: u8 = 0x20;

const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_CLASS_UNIVERSAL: u8 = 0x00;
const TAG_CLASS_CONTEXT_SPECIFIC: u8 = 0x80;
const TAG_NUMBER_MASK: u8 = 0x1f;

const LENGTH_LONG_FORM: u8 = 0x80;

/// Deepest nesting of constructed TLVs accepted by [`Tlv::parse`].
pub const MAX_NESTING_DEPTH: usize = 64;

type ParseResult<'a, T> = IResult<&'a [u8], T, Error>;

impl<'a> nom::error::ParseError<&'a [u8]> for Error {
    fn from_error_kind(_input: &'a [u8], kind: nom::error::ErrorKind) -> Self {
        Error::Parser(kind)
    }

    fn append(_input: &'a [u8], _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }
}

/// Sequence of top-level TLVs read from a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Der {}

impl<'a> Decoder<&'a [u8], Der> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        let mut input: &[u8] = self;
        let mut elements = Vec::new();
        while !input.is_empty() {
            let (rest, tlv) = Tlv::parse(input).map_err(flatten)?;
            elements.push(tlv);
            input = rest;
        }
        Ok(Der { elements })
    }
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        self.as_slice().decode()
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.elements.iter().flat_map(Tlv::to_bytes).collect())
    }
}

fn flatten(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
        nom::Err::Incomplete(_) => Error::Parser(nom::error::ErrorKind::Eof),
    }
}

/// Universal tags understood by `x501-asn1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTag {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    UTF8String,
    Sequence,
    Set,
    PrintableString,
    TeletexString,
    IA5String,
    UTCTime,
    GeneralizedTime,
    UniversalString,
    BMPString,
    /// Any other identifier octet, kept verbatim.
    Unimplemented(u8),
}

impl From<u8> for PrimitiveTag {
    fn from(identifier: u8) -> Self {
        if identifier & TAG_CLASS_MASK != TAG_CLASS_UNIVERSAL {
            return PrimitiveTag::Unimplemented(identifier);
        }
        match identifier & TAG_NUMBER_MASK {
            0x01 => PrimitiveTag::Boolean,
            0x02 => PrimitiveTag::Integer,
            0x03 => PrimitiveTag::BitString,
            0x04 => PrimitiveTag::OctetString,
            0x05 => PrimitiveTag::Null,
            0x06 => PrimitiveTag::ObjectIdentifier,
            0x0c => PrimitiveTag::UTF8String,
            0x10 => PrimitiveTag::Sequence,
            0x11 => PrimitiveTag::Set,
            0x13 => PrimitiveTag::PrintableString,
            0x14 => PrimitiveTag::TeletexString,
            0x16 => PrimitiveTag::IA5String,
            0x17 => PrimitiveTag::UTCTime,
            0x18 => PrimitiveTag::GeneralizedTime,
            0x1c => PrimitiveTag::UniversalString,
            0x1e => PrimitiveTag::BMPString,
            _ => PrimitiveTag::Unimplemented(identifier),
        }
    }
}

/// Tag number without the constructed bit.
impl From<&PrimitiveTag> for u8 {
    fn from(tag: &PrimitiveTag) -> Self {
        match tag {
            PrimitiveTag::Boolean => 0x01,
            PrimitiveTag::Integer => 0x02,
            PrimitiveTag::BitString => 0x03,
            PrimitiveTag::OctetString => 0x04,
            PrimitiveTag::Null => 0x05,
            PrimitiveTag::ObjectIdentifier => 0x06,
            PrimitiveTag::UTF8String => 0x0c,
            PrimitiveTag::Sequence => 0x10,
            PrimitiveTag::Set => 0x11,
            PrimitiveTag::PrintableString => 0x13,
            PrimitiveTag::TeletexString => 0x14,
            PrimitiveTag::IA5String => 0x16,
            PrimitiveTag::UTCTime => 0x17,
            PrimitiveTag::GeneralizedTime => 0x18,
            PrimitiveTag::UniversalString => 0x1c,
            PrimitiveTag::BMPString => 0x1e,
            PrimitiveTag::Unimplemented(identifier) => *identifier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Universal (or unrecognised) tag and its raw identifier octet.
    Primitive(PrimitiveTag, u8),
    ContextSpecific { slot: u8, constructed: bool },
}

impl Tag {
    pub fn identifier(&self) -> u8 {
        match self {
            Tag::Primitive(_, identifier) => *identifier,
            Tag::ContextSpecific { slot, constructed } => {
                let constructed = if *constructed { TAG_CONSTRUCTED } else { 0 };
                TAG_CLASS_CONTEXT_SPECIFIC | constructed | (slot & TAG_NUMBER_MASK)
            }
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.identifier() & TAG_CONSTRUCTED == TAG_CONSTRUCTED
    }
}

impl From<u8> for Tag {
    fn from(identifier: u8) -> Self {
        if identifier & TAG_CLASS_MASK == TAG_CLASS_CONTEXT_SPECIFIC {
            return Tag::ContextSpecific {
                slot: identifier & TAG_NUMBER_MASK,
                constructed: identifier & TAG_CONSTRUCTED == TAG_CONSTRUCTED,
            };
        }
        Tag::Primitive(PrimitiveTag::from(identifier), identifier)
    }
}

/// Universal tag with its canonical identifier octet.
///
/// SEQUENCE and SET are always constructed in DER, everything else here is
/// primitive.
impl From<PrimitiveTag> for Tag {
    fn from(tag: PrimitiveTag) -> Self {
        let identifier = match tag {
            PrimitiveTag::Sequence | PrimitiveTag::Set => u8::from(&tag) | TAG_CONSTRUCTED,
            _ => u8::from(&tag),
        };
        Tag::Primitive(tag, identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Data(Vec<u8>),
    Tlvs(Vec<Tlv>),
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Data(data),
        }
    }

    pub fn new_constructed(tag: Tag, tlvs: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Tlvs(tlvs),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Content octets of a primitive TLV.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlvs(_) => None,
        }
    }

    /// Children of a constructed TLV.
    pub fn tlvs(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Data(_) => None,
            Value::Tlvs(tlvs) => Some(tlvs),
        }
    }

    /// Serializes the TLV with minimal definite lengths.
    pub fn to_bytes(&self) -> Vec<u8> {
        let content = match &self.value {
            Value::Data(data) => data.clone(),
            Value::Tlvs(tlvs) => tlvs.iter().flat_map(Tlv::to_bytes).collect(),
        };
        let length = encode_length(content.len());

        let mut out = Vec::with_capacity(1 + length.len() + content.len());
        out.push(self.tag.identifier());
        out.extend(length);
        out.extend(content);
        out
    }

    pub fn parse(input: &[u8]) -> ParseResult<'_, Tlv> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> ParseResult<'_, Tlv> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let content: ParseResult<'_, &[u8]> = take(length).parse(input);
        let (input, mut data) = content?;

        if !tag.is_constructed() {
            return Ok((input, Tlv::new_primitive(tag, data.to_vec())));
        }

        if depth >= MAX_NESTING_DEPTH {
            return Err(nom::Err::Failure(Error::NestingTooDeep(MAX_NESTING_DEPTH)));
        }

        // parse TLV recursively.
        let mut tlvs = Vec::new();
        while !data.is_empty() {
            let (rest, tlv) = Self::parse_nested(data, depth + 1)?;
            data = rest;
            tlvs.push(tlv);
        }
        Ok((input, Tlv::new_constructed(tag, tlvs)))
    }
}

fn parse_tag(input: &[u8]) -> ParseResult<'_, Tag> {
    let identifier: ParseResult<'_, u8> = be_u8(input);
    let (input, identifier) = identifier?;
    if identifier & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        return Err(nom::Err::Failure(Error::HighTagNumber(identifier)));
    }
    Ok((input, Tag::from(identifier)))
}

fn parse_length(input: &[u8]) -> ParseResult<'_, usize> {
    let first: ParseResult<'_, u8> = be_u8(input);
    let (input, n) = first?;
    if n & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((input, n as usize));
    }

    // long form: the low 7 bits count the length octets that follow.
    let count = (n & !LENGTH_LONG_FORM) as usize;
    if count == 0 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if count > size_of::<usize>() {
        return Err(nom::Err::Failure(Error::LengthOverflow(count)));
    }
    let octets: ParseResult<'_, &[u8]> = take(count).parse(input);
    let (input, bs) = octets?;
    if bs.first() == Some(&0) {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    let length = bs.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
    if length < LENGTH_LONG_FORM as usize {
        return Err(nom::Err::Failure(Error::NonMinimalLength));
    }
    Ok((input, length))
}

fn encode_length(length: usize) -> Vec<u8> {
    if length < LENGTH_LONG_FORM as usize {
        return vec![length as u8];
    }
    let octets: Vec<u8> = length
        .to_be_bytes()
        .into_iter()
        .skip_while(|b| *b == 0)
        .collect();
    let mut out = Vec::with_capacity(octets.len() + 1);
    out.push(LENGTH_LONG_FORM | octets.len() as u8);
    out.extend(octets);
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use x501::decoder::Decoder;
    use x501::encoder::Encoder;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x02], Tag::Primitive(PrimitiveTag::Integer, 0x02)),
        case(vec![0x02, 0x01], Tag::Primitive(PrimitiveTag::Integer, 0x02)),
        case(vec![0x30, 0x01], Tag::Primitive(PrimitiveTag::Sequence, 0x30)),
        case(vec![0x31], Tag::Primitive(PrimitiveTag::Set, 0x31)),
        case(vec![0x14], Tag::Primitive(PrimitiveTag::TeletexString, 0x14)),
        case(vec![0x1e], Tag::Primitive(PrimitiveTag::BMPString, 0x1e)),
        case(vec![0x1c], Tag::Primitive(PrimitiveTag::UniversalString, 0x1c)),
        case(vec![0x42], Tag::Primitive(PrimitiveTag::Unimplemented(0x42), 0x42)),
        case(vec![0xa0], Tag::ContextSpecific { slot: 0, constructed: true }),
        case(vec![0x81], Tag::ContextSpecific { slot: 1, constructed: false }),
    )]
    fn test_parse_tag(input: Vec<u8>, expected: Tag) {
        let (_, actual) = parse_tag(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input[0], actual.identifier());
    }

    #[test]
    fn test_parse_tag_rejects_high_tag_number() {
        let err = parse_tag(&[0x1f, 0x81, 0x00]).unwrap_err();
        assert_eq!(nom::Err::Failure(Error::HighTagNumber(0x1f)), err);
    }

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: usize) {
        let (_, actual) = parse_length(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x80], Error::IndefiniteLength),
        case(vec![0x81, 0x05], Error::NonMinimalLength),
        case(vec![0x82, 0x00, 0x90], Error::NonMinimalLength),
        case(vec![0x89, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], Error::LengthOverflow(9)),
    )]
    fn test_parse_length_rejects(input: Vec<u8>, expected: Error) {
        let err = parse_length(&input).unwrap_err();
        assert_eq!(nom::Err::Failure(expected), err);
    }

    #[rstest(input, expected_tag, expected_data,
        case(vec![0x01, 0x01, 0xff], PrimitiveTag::Boolean, vec![0xff]),
        case(vec![0x02, 0x01, 0x01], PrimitiveTag::Integer, vec![0x01]),
        case(vec![0x13, 0x02, 0x68, 0x69], PrimitiveTag::PrintableString, vec![0x68, 0x69]),
        case(vec![0x14, 0x04, 0x6e, 0x61, 0x6d, 0x65], PrimitiveTag::TeletexString, vec![0x6e, 0x61, 0x6d, 0x65]),
        case(vec![0x16, 0x02, 0x68, 0x69], PrimitiveTag::IA5String, vec![0x68, 0x69]),
        case(vec![0x0c, 0x04, 0xf0, 0x9f, 0x98, 0x8e], PrimitiveTag::UTF8String, vec![0xf0, 0x9f, 0x98, 0x8e]),
        case(vec![0x1e, 0x04, 0x00, 0x68, 0x00, 0x69], PrimitiveTag::BMPString, vec![0x00, 0x68, 0x00, 0x69]),
        case(vec![0x06, 0x03, 0x55, 0x04, 0x03], PrimitiveTag::ObjectIdentifier, vec![0x55, 0x04, 0x03]),
        case(vec![0x05, 0x00], PrimitiveTag::Null, vec![]),
    )]
    fn test_tlv_parse_primitive(input: Vec<u8>, expected_tag: PrimitiveTag, expected_data: Vec<u8>) {
        let (rest, actual) = Tlv::parse(&input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(&Tag::from(expected_tag), actual.tag());
        assert_eq!(Some(expected_data.as_slice()), actual.data());
        assert_eq!(None, actual.tlvs());
    }

    #[test]
    fn test_tlv_parse_structured() {
        // SET { SEQUENCE { OID 2.5.4.3, UTF8String "a" } }
        let input = vec![
            0x31, 0x0a, 0x30, 0x08, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c, 0x01, 0x61,
        ];
        let (rest, set) = Tlv::parse(&input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(&Tag::from(PrimitiveTag::Set), set.tag());

        let [sequence] = set.tlvs().unwrap() else {
            panic!("expected exactly one child");
        };
        assert_eq!(&Tag::from(PrimitiveTag::Sequence), sequence.tag());
        let children = sequence.tlvs().unwrap();
        assert_eq!(2, children.len());
        assert_eq!(Some([0x55, 0x04, 0x03].as_slice()), children[0].data());
        assert_eq!(Some(b"a".as_slice()), children[1].data());
    }

    #[rstest(input,
        case(vec![0x05, 0x00]),
        case(vec![0x30, 0x09, 0x02, 0x01, 0x07, 0x02, 0x01, 0x08, 0x02, 0x01, 0x09]),
        case(vec![0x31, 0x0a, 0x30, 0x08, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0c, 0x01, 0x61]),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x02]),
        case(vec![0x01, 0x01, 0xff, 0x05, 0x00]),
    )]
    fn test_der_bytes_reencode_identically(input: Vec<u8>) {
        let der: Der = input.decode().unwrap();
        let encoded: Vec<u8> = der.encode().unwrap();
        assert_eq!(input, encoded);
    }

    #[test]
    fn test_long_form_length_encoding() {
        let tlv = Tlv::new_primitive(Tag::from(PrimitiveTag::OctetString), vec![0xab; 300]);
        let bytes = tlv.to_bytes();
        assert_eq!(&[0x04, 0x82, 0x01, 0x2c], &bytes[..4]);
        assert_eq!(304, bytes.len());

        let (_, parsed) = Tlv::parse(&bytes).unwrap();
        assert_eq!(tlv, parsed);
    }

    fn nested_sequences(levels: usize) -> Vec<u8> {
        let mut tlv = Tlv::new_primitive(Tag::from(PrimitiveTag::Null), vec![]);
        for _ in 0..levels {
            tlv = Tlv::new_constructed(Tag::from(PrimitiveTag::Sequence), vec![tlv]);
        }
        tlv.to_bytes()
    }

    #[test]
    fn test_tlv_parse_nesting_limit() {
        let input = nested_sequences(MAX_NESTING_DEPTH);
        let (rest, tlv) = Tlv::parse(&input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(input, tlv.to_bytes());

        let err = Tlv::parse(&nested_sequences(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(nom::Err::Failure(Error::NestingTooDeep(MAX_NESTING_DEPTH)), err);
    }

    #[rstest(input, expected,
        case(vec![0x04, 0x05, 0x00], Error::Parser(nom::error::ErrorKind::Eof)),
        case(vec![0x30, 0x80, 0x05, 0x00, 0x00, 0x00], Error::IndefiniteLength),
        case(vec![0x30, 0x03, 0x02, 0x05, 0x00], Error::Parser(nom::error::ErrorKind::Eof)),
    )]
    fn test_der_decode_errors(input: Vec<u8>, expected: Error) {
        let result: Result<Der, Error> = input.decode();
        assert_eq!(Err(expected), result);
    }
}
