//! Rule-based field extractors for JF letters.

pub mod categories;
pub mod numbers;
pub mod patterns;
pub mod sofcode;

pub use categories::{extract_funding, ExtractionRule, FundingExtractor, CATEGORY_RULES};
pub use numbers::normalize;
pub use sofcode::{extract_from_filename, extract_from_text, resolve_sofcode, SofcodeExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// An extracted value together with the text it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
