//! Decoding half of the conversion pattern.
//!
//! Every layer of the workspace converts "downwards" into a richer
//! representation through [`Decoder`]:
//!
//! ```text
//! &[u8] → Der → Element → Name
//! ```
//!
//! The destination type opts in with the [`DecodableFrom`] marker, so a
//! conversion only exists when both sides agree on it.
//!
//! ```no_run
//! use x501::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets(Vec<u8>);
//! struct Text(String);
//!
//! #[derive(Debug)]
//! struct NotUtf8;
//!
//! impl DecodableFrom<Octets> for Text {}
//!
//! impl Decoder<Octets, Text> for Octets {
//!     type Error = NotUtf8;
//!
//!     fn decode(&self) -> Result<Text, Self::Error> {
//!         String::from_utf8(self.0.clone()).map(Text).map_err(|_| NotUtf8)
//!     }
//! }
//! ```

/// Converts `self` (of type `T`) into a `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is not a valid representation of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait: `Self` can be produced from a `T` by a [`Decoder`].
pub trait DecodableFrom<T> {}
