//! Configuration structures for the reconciliation pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the rekon pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RekonConfig {
    /// Upload limits.
    pub intake: IntakeConfig,

    /// Text decoding configuration.
    pub decode: DecodeConfig,

    /// Spreadsheet output configuration.
    pub report: ReportConfig,
}

/// Limits applied to each batch of letters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Maximum size of a single file in bytes.
    pub max_file_size: u64,

    /// Maximum number of files per batch.
    pub max_files: usize,

    /// Accepted file extension, without the dot.
    pub extension: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: 16 * 1024 * 1024,
            max_files: 50,
            extension: "txt".to_string(),
        }
    }
}

impl IntakeConfig {
    /// Check whether a file name carries the accepted extension.
    pub fn accepts(&self, name: &str) -> bool {
        name.rsplit_once('.')
            .map(|(_, ext)| ext.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

/// Text decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Encoding labels tried in order (WHATWG names).
    pub encodings: Vec<String>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            encodings: vec![
                "utf-8".to_string(),
                "windows-1252".to_string(),
                "iso-8859-15".to_string(),
            ],
        }
    }
}

/// Spreadsheet output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Apply grouped headers, borders and widths.
    pub styled: bool,

    /// Minimum column width in characters.
    pub min_column_width: f64,

    /// Maximum column width in characters.
    pub max_column_width: f64,

    /// Prefix of generated file names.
    pub output_prefix: String,

    /// Worksheet name of styled reports; `Sheet1` when unset.
    pub sheet_name: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            styled: true,
            min_column_width: 10.0,
            max_column_width: 30.0,
            output_prefix: "rekon_jf".to_string(),
            sheet_name: None,
        }
    }
}

impl ReportConfig {
    /// Timestamped output file name, e.g. `rekon_jf_20250107_134501.xlsx`.
    pub fn output_file_name(&self, at: chrono::NaiveDateTime) -> String {
        format!("{}_{}.xlsx", self.output_prefix, at.format("%Y%m%d_%H%M%S"))
    }
}

impl RekonConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
