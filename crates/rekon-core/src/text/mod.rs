//! Text decoding for letters of unknown encoding.

mod decoder;

pub use decoder::{printable_ascii, DecodedText, TextDecoder};
