//! Rule-based parser for JF payment-confirmation letters.

use std::time::Instant;

use tracing::{debug, error, info};

use crate::error::ExtractionError;
use crate::models::config::{DecodeConfig, IntakeConfig};
use crate::models::record::ParsedRecord;
use crate::text::TextDecoder;

use super::rules::{resolve_sofcode, FieldExtractor, FundingExtractor, CATEGORY_RULES};
use super::LetterParser;

/// Parser applying the fixed rule table to decoded letter text.
pub struct JfParser {
    decoder: TextDecoder,
    /// Reject inputs larger than this many bytes.
    max_file_size: Option<u64>,
}

impl JfParser {
    /// Create a parser with the default decoder and no size limit.
    pub fn new() -> Self {
        Self {
            decoder: TextDecoder::new(),
            max_file_size: None,
        }
    }

    /// Create a parser from configuration sections.
    pub fn from_config(decode: &DecodeConfig, intake: &IntakeConfig) -> Self {
        Self {
            decoder: TextDecoder::from_config(decode),
            max_file_size: Some(intake.max_file_size),
        }
    }

    /// Set the per-file size limit.
    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = Some(limit);
        self
    }

    /// Parse raw bytes, reporting file-level faults.
    pub fn try_parse(&self, bytes: &[u8], filename: &str) -> Result<ParsedRecord, ExtractionError> {
        if let Some(limit) = self.max_file_size {
            let size = bytes.len() as u64;
            if size > limit {
                return Err(ExtractionError::TooLarge { size, limit });
            }
        }

        let decoded = self.decoder.decode(bytes);
        debug!(
            "{}: {} characters via {}{}",
            filename,
            decoded.text.len(),
            decoded.encoding,
            if decoded.lossy { " (lossy)" } else { "" }
        );

        Ok(self.parse_text(&decoded.text, filename))
    }

    /// Apply every extraction rule to already decoded text.
    ///
    /// A rule that does not match leaves its field at zero.
    pub fn parse_text(&self, text: &str, filename: &str) -> ParsedRecord {
        let start = Instant::now();
        let mut record = ParsedRecord::empty(filename);

        record.sofcode = resolve_sofcode(filename, text);

        match FundingExtractor.extract(text) {
            Some(m) => {
                debug!("Dana Pembayaran {} from {:?} at {:?}", m.value, m.source, m.position);
                record.funding_amount = m.value;
            }
            None => debug!("Dana Pembayaran not found in {}", filename),
        }

        for rule in CATEGORY_RULES.iter() {
            match rule.extract(text) {
                Some(m) => {
                    debug!(
                        "{}: amount {} for {} consumers at {:?}",
                        rule.category,
                        m.value.amount(),
                        m.value.count(),
                        m.position
                    );
                    record.totals.insert(rule.category, m.value);
                }
                None => debug!("{} not found in {}", rule.category, filename),
            }
        }

        info!(
            "Processed {} (SOFCODE {:?}) in {:?}",
            filename,
            record.sofcode,
            start.elapsed()
        );
        record
    }
}

impl Default for JfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterParser for JfParser {
    fn parse(&self, bytes: &[u8], filename: &str) -> ParsedRecord {
        match self.try_parse(bytes, filename) {
            Ok(record) => record,
            Err(e) => {
                error!("Error processing file {}: {}", filename, e);
                ParsedRecord::degraded(filename, e.to_string())
            }
        }
    }
}
