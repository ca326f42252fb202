use x501_der::PrimitiveTag;

/// Describes which string types an attribute syntax accepts.
///
/// Value kinds share their string handling through a syntax rather than
/// through one type per syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    name: &'static str,
    accepted: &'static [PrimitiveTag],
    default_tag: PrimitiveTag,
}

impl Syntax {
    /// DirectoryString (X.520)
    ///
    /// ```asn1
    /// DirectoryString ::= CHOICE {
    ///     teletexString     TeletexString,
    ///     printableString   PrintableString,
    ///     universalString   UniversalString,
    ///     utf8String        UTF8String,
    ///     bmpString         BMPString }
    /// ```
    pub const DIRECTORY_STRING: Syntax = Syntax {
        name: "DirectoryString",
        accepted: &[
            PrimitiveTag::TeletexString,
            PrimitiveTag::PrintableString,
            PrimitiveTag::UniversalString,
            PrimitiveTag::UTF8String,
            PrimitiveTag::BMPString,
        ],
        default_tag: PrimitiveTag::UTF8String,
    };

    /// PrintableString only, as used by countryName and serialNumber.
    pub const PRINTABLE_STRING: Syntax = Syntax {
        name: "PrintableString",
        accepted: &[PrimitiveTag::PrintableString],
        default_tag: PrimitiveTag::PrintableString,
    };

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn accepts(&self, tag: PrimitiveTag) -> bool {
        self.accepted.contains(&tag)
    }

    /// String type used when a value is built from text.
    pub fn default_tag(&self) -> PrimitiveTag {
        self.default_tag
    }
}
