use x501_asn1::{BMPString, Element, TeletexString, UniversalString};
use x501_der::PrimitiveTag;

use crate::error::{Error, Result};

/// First preparation step: content octets of a string type to UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeStep {
    tag: PrimitiveTag,
}

impl TranscodeStep {
    pub fn new(tag: PrimitiveTag) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> PrimitiveTag {
        self.tag
    }

    pub fn apply(&self, bytes: &[u8]) -> Result<String> {
        match self.tag {
            PrimitiveTag::UTF8String | PrimitiveTag::PrintableString => String::from_utf8(bytes.to_vec())
                .map_err(|_| Error::InvalidStringEncoding(self.tag)),
            PrimitiveTag::BMPString => {
                let bmp = BMPString::from_bytes(bytes.to_vec())?;
                bmp.as_bytes()
                    .chunks_exact(2)
                    .map(|unit| {
                        char::from_u32(u32::from(u16::from_be_bytes([unit[0], unit[1]])))
                            .ok_or(Error::InvalidStringEncoding(self.tag))
                    })
                    .collect()
            }
            PrimitiveTag::UniversalString => {
                let universal = UniversalString::from_bytes(bytes.to_vec())?;
                universal
                    .as_bytes()
                    .chunks_exact(4)
                    .map(|unit| {
                        char::from_u32(u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]]))
                            .ok_or(Error::InvalidStringEncoding(self.tag))
                    })
                    .collect()
            }
            // T.61 has no dependable mapping, compare as a hexstring of the DER encoding
            PrimitiveTag::TeletexString => {
                let der = Element::TeletexString(TeletexString::from(bytes)).to_der()?;
                Ok(format!("#{}", hex::encode(der)))
            }
            tag => Err(Error::TranscodeUnsupportedTag(tag)),
        }
    }
}
