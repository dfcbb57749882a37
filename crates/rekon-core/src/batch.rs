//! Batch processing of a directory of letters.

use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{BatchError, ExtractionError};
use crate::letter::LetterParser;
use crate::models::config::IntakeConfig;
use crate::models::record::{ParsedRecord, ReportRow};

/// Outcome of a batch that produced at least one row.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Rows in directory-listing order, numbered from 1.
    pub rows: Vec<ReportRow>,
    /// Records the rows were projected from, same order.
    pub records: Vec<ParsedRecord>,
    /// Counts for the user-facing message.
    pub summary: BatchSummary,
}

/// How many files were processed and how many carried errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    /// File names of degraded records.
    pub failed: Vec<String>,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Successfully processed {} file(s)", self.processed)?;
        if !self.failed.is_empty() {
            write!(f, " ({} file(s) had errors)", self.failed.len())?;
        }
        Ok(())
    }
}

/// Runs a letter parser over every matching file of a directory.
pub struct BatchProcessor<P> {
    parser: P,
    intake: IntakeConfig,
}

impl<P: LetterParser> BatchProcessor<P> {
    /// Create a processor with the given parser and limits.
    pub fn new(parser: P, intake: IntakeConfig) -> Self {
        Self { parser, intake }
    }

    /// Process every file with the accepted extension in `dir`.
    ///
    /// Fails when the directory holds more than `max_files` letters or no
    /// file produced a row.
    pub fn process_directory(&self, dir: &Path) -> Result<BatchOutput, BatchError> {
        self.process_directory_with(dir, |_| {})
    }

    /// Like [`process_directory`](Self::process_directory), calling
    /// `on_record` after each file.
    pub fn process_directory_with<F>(&self, dir: &Path, mut on_record: F) -> Result<BatchOutput, BatchError>
    where
        F: FnMut(&ParsedRecord),
    {
        let inputs = self.list_inputs(dir)?;
        info!("Found {} file(s) in {}", inputs.len(), dir.display());
        if inputs.len() > self.intake.max_files {
            warn!(
                "{} holds {} files, limit is {}",
                dir.display(),
                inputs.len(),
                self.intake.max_files
            );
            return Err(BatchError::TooManyFiles {
                count: inputs.len(),
                limit: self.intake.max_files,
            });
        }

        let mut rows = Vec::with_capacity(inputs.len());
        let mut records = Vec::with_capacity(inputs.len());
        let mut summary = BatchSummary::default();

        for path in inputs {
            let record = self.process_file(&path);
            if let Some(e) = &record.error {
                warn!("Error in file {}: {}", record.filename, e);
                summary.failed.push(record.filename.clone());
            }
            on_record(&record);

            let number = (rows.len() + 1) as u32;
            rows.push(ReportRow::from_record(number, &record));
            records.push(record);
            summary.processed += 1;
        }

        if rows.is_empty() {
            warn!("No valid data found in {}", dir.display());
            return Err(BatchError::NoRows);
        }

        info!("{}", summary);
        Ok(BatchOutput {
            rows,
            records,
            summary,
        })
    }

    /// Files with the accepted extension, in listing order, not recursive.
    pub fn list_inputs(&self, dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
        let list_error = |source| BatchError::List {
            path: dir.to_path_buf(),
            source,
        };

        let mut inputs = Vec::new();
        for entry in fs::read_dir(dir).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|n| self.intake.accepts(n)) {
                inputs.push(entry.path());
            }
        }
        Ok(inputs)
    }

    /// Read and parse one file; read faults become a degraded record.
    pub fn process_file(&self, path: &Path) -> ParsedRecord {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match read_bounded(path, self.intake.max_file_size) {
            Ok(bytes) => self.parser.parse(&bytes, &filename),
            Err(e) => ParsedRecord::degraded(filename, e.to_string()),
        }
    }
}

/// Read a file, refusing to go past `limit` bytes.
pub(crate) fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>, ExtractionError> {
    let read_error = |source| ExtractionError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();
    if size > limit {
        return Err(ExtractionError::TooLarge { size, limit });
    }

    let mut bytes = Vec::with_capacity(size as usize);
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(read_error)?;
    if bytes.len() as u64 > limit {
        return Err(ExtractionError::TooLarge {
            size: bytes.len() as u64,
            limit,
        });
    }
    Ok(bytes)
}
