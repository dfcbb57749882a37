//! Cascading byte-to-text decoding using encoding_rs.

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, trace, warn};

use crate::models::config::DecodeConfig;

/// Text decoded from a letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// Printable ASCII text, newlines and tabs kept.
    pub text: String,
    /// Name of the encoding that produced the text.
    pub encoding: &'static str,
    /// Whether undecodable bytes had to be dropped.
    pub lossy: bool,
}

/// Decoder trying a list of encodings in order.
pub struct TextDecoder {
    encodings: Vec<&'static Encoding>,
}

impl TextDecoder {
    /// Create a decoder with the default cascade.
    pub fn new() -> Self {
        Self::from_config(&DecodeConfig::default())
    }

    /// Create a decoder from configured encoding labels.
    ///
    /// Unknown labels are skipped.
    pub fn from_config(config: &DecodeConfig) -> Self {
        let mut encodings = Vec::with_capacity(config.encodings.len());
        for label in &config.encodings {
            match Encoding::for_label(label.trim().as_bytes()) {
                Some(encoding) if !encodings.contains(&encoding) => encodings.push(encoding),
                Some(_) => {}
                None => warn!("Ignoring unknown encoding label: {}", label),
            }
        }
        Self { encodings }
    }

    /// Encodings tried, in order.
    pub fn encodings(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.encodings.iter().map(|e| e.name())
    }

    /// Decode bytes to printable ASCII text. Never fails.
    pub fn decode(&self, bytes: &[u8]) -> DecodedText {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            let (text, lossy) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            debug!("Decoded {} bytes as {} (BOM)", bytes.len(), encoding.name());
            return DecodedText {
                text: printable_ascii(&text),
                encoding: encoding.name(),
                lossy,
            };
        }

        for encoding in &self.encodings {
            match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
                Some(text) => {
                    debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());
                    return DecodedText {
                        text: printable_ascii(&text),
                        encoding: encoding.name(),
                        lossy: false,
                    };
                }
                None => trace!("{} rejected input, trying next encoding", encoding.name()),
            }
        }

        let (text, _) = UTF_8.decode_without_bom_handling(bytes);
        debug!("Decoded {} bytes as lossy UTF-8", bytes.len());
        DecodedText {
            text: printable_ascii(&text),
            encoding: UTF_8.name(),
            lossy: true,
        }
    }
}

impl Default for TextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only printable ASCII characters, newlines and tabs.
pub fn printable_ascii(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, ' '..='~' | '\n' | '\t'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_printable_ascii_strips_controls() {
        assert_eq!(
            printable_ascii("Rp.\u{1b}E 1.057.000\r\n\tuntuk 5 Konsumen\u{a0}"),
            "Rp.E 1.057.000\n\tuntuk 5 Konsumen"
        );
    }

    #[test]
    fn test_decode_utf8() {
        let decoder = TextDecoder::new();
        let decoded = decoder.decode("Dana sejumlah Rp. 1.000 – terima kasih".as_bytes());

        assert_eq!(decoded.encoding, "UTF-8");
        assert!(!decoded.lossy);
        assert_eq!(decoded.text, "Dana sejumlah Rp. 1.000  terima kasih");
    }

    #[test]
    fn test_decode_falls_back_to_single_byte() {
        let decoder = TextDecoder::new();
        // 0xE9 is not valid UTF-8 on its own.
        let decoded = decoder.decode(b"Caf\xe9 sebesar Rp. 250.000");

        assert_eq!(decoded.encoding, "windows-1252");
        assert_eq!(decoded.text, "Caf sebesar Rp. 250.000");
    }

    #[test]
    fn test_decode_lossy_when_no_encoding_accepts() {
        let decoder = TextDecoder::from_config(&DecodeConfig {
            encodings: vec!["utf-8".to_string()],
        });
        let decoded = decoder.decode(b"Rp. 1.\xff000");

        assert!(decoded.lossy);
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, "Rp. 1.000");
    }

    #[test]
    fn test_decode_honours_bom() {
        let decoder = TextDecoder::new();
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"SOFCODE: JFCS2");

        let decoded = decoder.decode(&bytes);
        assert_eq!(decoded.text, "SOFCODE: JFCS2");
    }

    #[test]
    fn test_unknown_labels_are_skipped() {
        let decoder = TextDecoder::from_config(&DecodeConfig {
            encodings: vec!["no-such-charset".to_string(), "latin1".to_string()],
        });
        assert_eq!(decoder.encodings().collect::<Vec<_>>(), vec!["windows-1252"]);
    }
}
