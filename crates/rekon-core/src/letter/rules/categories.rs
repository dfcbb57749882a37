//! Category and funding amount rules.

use lazy_static::lazy_static;
use regex::Regex;

use super::numbers::normalize;
use super::patterns::*;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::record::{Category, CategoryTotal};

/// A category paired with the pattern that locates its amount and count.
///
/// The pattern must define `amt` and `cnt` capture groups.
pub struct ExtractionRule {
    pub category: Category,
    pub pattern: &'static Regex,
}

impl FieldExtractor for ExtractionRule {
    type Output = ExtractionMatch<CategoryTotal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = self.pattern.captures(text)?;
        let full_match = caps.get(0)?;

        let amount = caps.name("amt").map(|m| normalize(m.as_str())).unwrap_or(0);
        let count = caps.name("cnt").map(|m| normalize(m.as_str())).unwrap_or(0);

        Some(
            ExtractionMatch::new(CategoryTotal::new(amount, count), full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

lazy_static! {
    /// One rule per category, in report column order.
    pub static ref CATEGORY_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule { category: Category::Installment, pattern: &INSTALLMENT },
        ExtractionRule { category: Category::LateFee, pattern: &LATE_FEE },
        ExtractionRule { category: Category::EarlySettlement, pattern: &EARLY_SETTLEMENT },
        ExtractionRule { category: Category::EarlySettlementFee, pattern: &EARLY_SETTLEMENT_FEE },
        ExtractionRule { category: Category::EarlySettlementPenalty, pattern: &EARLY_SETTLEMENT_PENALTY },
        ExtractionRule { category: Category::InsuranceSettlement, pattern: &INSURANCE_SETTLEMENT },
        ExtractionRule { category: Category::InsuranceSettlementPenalty, pattern: &INSURANCE_SETTLEMENT_PENALTY },
        ExtractionRule { category: Category::Recovery, pattern: &RECOVERY },
        ExtractionRule { category: Category::FeeWaiver, pattern: &FEE_WAIVER },
    ];
}

/// Dana Pembayaran extractor: first matching phrasing wins.
pub struct FundingExtractor;

impl FieldExtractor for FundingExtractor {
    type Output = ExtractionMatch<u64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        FUNDING_PATTERNS.iter().find_map(|pattern| {
            let caps = pattern.captures(text)?;
            let full_match = caps.get(0)?;
            Some(
                ExtractionMatch::new(normalize(&caps["amt"]), full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
    }
}

/// Extract the funding amount, `0` when absent.
pub fn extract_funding(text: &str) -> u64 {
    FundingExtractor.extract(text).map(|m| m.value).unwrap_or(0)
}
