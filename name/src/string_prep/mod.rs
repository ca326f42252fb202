//! String preparation for matching rules (RFC 4518).
//!
//! Content octets of a string value pass through six steps in a fixed order:
//!
//! 1. Transcode to UTF-8
//! 2. Map (case folding)
//! 3. Normalize (NFKC)
//! 4. Prohibit
//! 5. Check bidi
//! 6. Insignificant space handling
//!
//! The output is only meant for comparison, never for display.

use x501_der::PrimitiveTag;

use crate::error::Result;

mod insignificant_space;
mod steps;
mod transcode;

pub use insignificant_space::InsignificantSpaceStep;
pub use steps::{CheckBidiStep, MapStep, NormalizeStep, ProhibitStep};
pub use transcode::TranscodeStep;

/// A preparation step over UTF-8 text.
pub trait PrepareStep {
    fn apply(&self, input: String) -> Result<String>;
}

/// The preparation pipeline for one source string type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringPreparer {
    transcode: TranscodeStep,
    map: MapStep,
    normalize: NormalizeStep,
    prohibit: ProhibitStep,
    check_bidi: CheckBidiStep,
    insignificant_space: InsignificantSpaceStep,
}

impl StringPreparer {
    /// Pipeline for content octets of the given string type, without case folding.
    pub fn for_string_type(tag: PrimitiveTag) -> Self {
        Self {
            transcode: TranscodeStep::new(tag),
            map: MapStep::new(false),
            normalize: NormalizeStep,
            prohibit: ProhibitStep,
            check_bidi: CheckBidiStep,
            insignificant_space: InsignificantSpaceStep,
        }
    }

    pub fn with_case_folding(self, fold_case: bool) -> Self {
        Self {
            map: MapStep::new(fold_case),
            ..self
        }
    }

    pub fn string_type(&self) -> PrimitiveTag {
        self.transcode.tag()
    }

    pub fn prepare(&self, bytes: &[u8]) -> Result<String> {
        let utf8 = self.transcode.apply(bytes)?;
        let steps: [&dyn PrepareStep; 5] = [
            &self.map,
            &self.normalize,
            &self.prohibit,
            &self.check_bidi,
            &self.insignificant_space,
        ];
        steps.iter().try_fold(utf8, |s, step| step.apply(s))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use x501_asn1::BMPString;

    use super::*;

    #[test]
    fn test_prepare_folds_case() {
        let preparer = StringPreparer::for_string_type(PrimitiveTag::UTF8String).with_case_folding(true);
        assert_eq!(" test ", preparer.prepare(b"TEST").unwrap());
    }

    #[rstest]
    #[case(false, "  Hello   World ", " Hello  World ")]
    #[case(true, "  Hello   World ", " hello  world ")]
    #[case(true, "\u{fb01}ne", " fine ")]
    #[case(false, "", "  ")]
    fn test_prepare_utf8(#[case] fold_case: bool, #[case] input: &str, #[case] expected: &str) {
        let preparer =
            StringPreparer::for_string_type(PrimitiveTag::UTF8String).with_case_folding(fold_case);
        assert_eq!(expected, preparer.prepare(input.as_bytes()).unwrap());
    }

    #[test]
    fn test_prepare_bmp_string() {
        let preparer = StringPreparer::for_string_type(PrimitiveTag::BMPString).with_case_folding(true);
        let bmp = BMPString::new("Grüße").unwrap();
        assert_eq!(" grüße ", preparer.prepare(bmp.as_bytes()).unwrap());
    }

    #[test]
    fn test_prepare_keeps_string_type() {
        let preparer = StringPreparer::for_string_type(PrimitiveTag::PrintableString);
        assert_eq!(PrimitiveTag::PrintableString, preparer.string_type());
    }
}
