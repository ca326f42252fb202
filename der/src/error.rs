use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("indefinite length is not allowed in DER")]
    IndefiniteLength,
    #[error("high tag number form is not supported (identifier 0x{0:02x})")]
    HighTagNumber(u8),
    #[error("length is not minimally encoded")]
    NonMinimalLength,
    #[error("length field of {0} octets is too large")]
    LengthOverflow(usize),
    #[error("constructed values nested deeper than {0} levels")]
    NestingTooDeep(usize),
}
