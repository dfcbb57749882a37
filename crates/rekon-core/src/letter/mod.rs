//! JF letter field extraction module.

mod parser;
pub mod rules;

pub use parser::JfParser;

use crate::models::record::ParsedRecord;

/// Trait for letter parsers.
pub trait LetterParser {
    /// Turn one file into a record.
    ///
    /// Never fails: a file that cannot be processed yields a degraded record.
    fn parse(&self, bytes: &[u8], filename: &str) -> ParsedRecord;
}
