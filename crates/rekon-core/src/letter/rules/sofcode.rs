//! BANK JF/SOFCODE extraction from file names and letter bodies.

use std::path::Path;

use tracing::{debug, warn};

use super::patterns::{COVID_SUFFIX, FILENAME_TOKEN_SEPARATOR, SOFCODE_PATTERNS};
use super::{ExtractionMatch, FieldExtractor};

/// Legacy code that is reported under a different name.
const LEGACY_ALIASES: &[(&str, &str)] = &[("JFJ", "JASA")];

/// SOFCODE extractor for letter bodies.
pub struct SofcodeExtractor;

impl SofcodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SofcodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SofcodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        SOFCODE_PATTERNS.iter().find_map(|pattern| {
            let caps = pattern.captures(text)?;
            let full_match = caps.get(0)?;
            Some(
                ExtractionMatch::new(caps[1].to_uppercase(), full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
    }
}

/// Derive the code from a file name such as `JFCS2COVI-1_FIFJIN_250107.txt`.
///
/// Takes the token before the first `-` or `_`, upper-cases it, strips a
/// trailing `COVID`/`COVI` marker with optional digits, and maps legacy
/// aliases (`JFJ` becomes `JASA`). Returns an empty string when no code
/// can be derived.
pub fn extract_from_filename(name: &str) -> String {
    let Some(stem) = Path::new(name).file_stem().and_then(|s| s.to_str()) else {
        warn!("Cannot derive code from file name {:?}", name);
        return String::new();
    };

    let token = FILENAME_TOKEN_SEPARATOR
        .split(stem)
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    let code = COVID_SUFFIX.replace(&token, "");

    LEGACY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == code)
        .map(|(_, alias)| alias.to_string())
        .unwrap_or_else(|| code.into_owned())
}

/// Search the letter body for a code.
pub fn extract_from_text(text: &str) -> String {
    SofcodeExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

/// Resolve the code from the file name, falling back to the letter body.
pub fn resolve_sofcode(filename: &str, text: &str) -> String {
    let from_name = extract_from_filename(filename);
    if !from_name.is_empty() {
        debug!("SOFCODE {} from file name {}", from_name, filename);
        return from_name;
    }

    match SofcodeExtractor::new().extract(text) {
        Some(m) => {
            debug!(
                "SOFCODE {} from text {:?} at {:?} ({})",
                m.value, m.source, m.position, filename
            );
            m.value
        }
        None => {
            warn!("SOFCODE not found in file name or text of {}", filename);
            String::new()
        }
    }
}
