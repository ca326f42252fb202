//! # x501
//!
//! Core conversion traits shared by the x501 directory-name crates.
//!
//! Each crate in the workspace moves data one representation up or down:
//!
//! ```text
//! Vec<u8> ⇄ Der ⇄ Element ⇄ Name
//! ```
//!
//! Upward steps implement [`decoder::Decoder`], downward steps implement
//! [`encoder::Encoder`]. The marker traits [`decoder::DecodableFrom`] and
//! [`encoder::EncodableTo`] restrict which pairs of types may be converted.
//!
//! ```ignore
//! use x501::decoder::Decoder;
//! use x501::encoder::Encoder;
//! use x501_der::Der;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! let back: Vec<u8> = der.encode().unwrap();
//! assert_eq!(bytes, back);
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
