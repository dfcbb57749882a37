//! Error types for the rekon-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the rekon library.
#[derive(Error, Debug)]
pub enum RekonError {
    /// Letter extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Batch processing error.
    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    /// Report generation error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Upload intake error.
    #[error("intake error: {0}")]
    Intake(#[from] IntakeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// File-level faults raised while turning one letter into a record.
///
/// These never escape the parser: they are folded into a degraded record.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file is larger than the configured per-file limit.
    #[error("file is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a whole batch.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input directory could not be listed.
    #[error("failed to list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory holds more letters than one batch may contain.
    #[error("Too many files. Maximum {limit} files allowed")]
    TooManyFiles { count: usize, limit: usize },

    /// No file in the batch produced a row.
    #[error("No valid data found in uploaded files")]
    NoRows,
}

/// Errors related to spreadsheet generation.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The spreadsheet could not be built or saved.
    #[error("failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// The finished spreadsheet could not be saved.
    #[error("failed to save spreadsheet: {0}")]
    Io(#[from] std::io::Error),

    /// There was nothing to write.
    #[error("report has no rows")]
    Empty,
}

/// Errors raised while staging uploaded files into a batch workspace.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// More files than the configured maximum.
    #[error("Too many files. Maximum {limit} files allowed")]
    TooManyFiles { count: usize, limit: usize },

    /// A file has an extension other than the accepted one.
    #[error("{name} (invalid type)")]
    InvalidType { name: String },

    /// A file exceeds the per-file size limit.
    #[error("{name} (too large)")]
    TooLarge { name: String, size: u64 },

    /// The file name is empty once sanitized.
    #[error("{name} (invalid name)")]
    InvalidName { name: String },

    /// Nothing in the upload was acceptable.
    #[error("No valid files uploaded{}", format_issues(.issues))]
    NoValidFiles { issues: Vec<String> },

    /// The workspace directory could not be created or written.
    #[error("workspace I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_issues(issues: &[String]) -> String {
    if issues.is_empty() {
        String::new()
    } else {
        format!(". Issues: {}", issues.join(", "))
    }
}

/// Result type for the rekon library.
pub type Result<T> = std::result::Result<T, RekonError>;
