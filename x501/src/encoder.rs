//! Encoding half of the conversion pattern.
//!
//! [`Encoder`] is the reverse of [`crate::decoder::Decoder`]: a structured
//! value is lowered to the next representation down, ending in bytes.
//!
//! ```text
//! Name → Element → Tlv → Vec<u8>
//! ```

/// Converts `self` (of type `T`) into an `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// The error type returned when encoding fails.
    type Error;

    /// Encodes `self` into type `E`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` has no valid representation as `E`.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait: `Self` can be produced from a `T` by an [`Encoder`].
pub trait EncodableTo<T> {}
