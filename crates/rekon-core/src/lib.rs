//! Core library for JF payment-confirmation reconciliation.
//!
//! This crate provides:
//! - Text decoding of letters with an encoding fallback chain
//! - Rule-based extraction of SOFCODE, funding amount and per-category totals
//! - Batch processing of a directory of letters into report rows
//! - Styled and plain xlsx reports
//! - Temporary batch workspaces for uploaded letters

pub mod batch;
pub mod error;
pub mod letter;
pub mod models;
pub mod report;
pub mod text;
pub mod workspace;

pub use batch::{BatchOutput, BatchProcessor, BatchSummary};
pub use error::{BatchError, ExtractionError, IntakeError, RekonError, ReportError, Result};
pub use letter::{JfParser, LetterParser};
pub use models::config::{DecodeConfig, IntakeConfig, RekonConfig, ReportConfig};
pub use models::record::{Category, CategoryTotal, Cell, ParsedRecord, ReportRow, COLUMNS};
pub use report::{writer_for, PlainReport, ReportWriter, StyledReport};
pub use text::{DecodedText, TextDecoder};
pub use workspace::{BatchWorkspace, IntakeReport};
