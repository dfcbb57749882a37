//! Common regex patterns for JF letter extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Amount followed by a `untuk <n> Konsumen` clause, after a category label.
///
/// The label, the amount and the count may be separated by arbitrary prose,
/// including newlines.
pub fn dual_capture(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?is){label}.*?Rp\.\s*[^\d]*(?P<amt>[\d.,]+).*?untuk\s+[^\d]*(?P<cnt>[\d.,]+)[^\d]*\s+Konsumen"
    ))
    .unwrap()
}

lazy_static! {
    // Filename code: leading token, COVID marker, separators
    pub static ref FILENAME_TOKEN_SEPARATOR: Regex = Regex::new(r"[-_]").unwrap();

    pub static ref COVID_SUFFIX: Regex = Regex::new(r"(?i)(?:COVID|COVI)\d*$").unwrap();

    // SOFCODE fallbacks inside the letter body, tried in order
    pub static ref SOFCODE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\(\s*([A-Z0-9]+)\s*\)").unwrap(),
        Regex::new(r"(?i)SOFCODE\s*[:\s]*([A-Z0-9]+)").unwrap(),
        Regex::new(r"(?i)Bank\s+[^(]*\(\s*([A-Z0-9]+)\s*\)").unwrap(),
    ];

    // Dana Pembayaran phrasings, tried in order
    pub static ref FUNDING_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)sejumlah\s+Rp\.\s*[^\d]*(?P<amt>[\d.,]+)").unwrap(),
        Regex::new(r"(?i)jumlah\s+Rp\.\s*[^\d]*(?P<amt>[\d.,]+)").unwrap(),
        Regex::new(r"(?i)sebesar\s+Rp\.\s*[^\d]*(?P<amt>[\d.,]+)").unwrap(),
    ];

    // Point a) reports its consumer count inline
    pub static ref INSTALLMENT: Regex = Regex::new(
        r"(?is)a\)\s*Pembayaran\s+angsuran\s+sebesar\s+Rp\.\s*[^\d]*(?P<amt>[\d.,]+).*?untuk\s+[^\d]*(?P<cnt>[\d.,]+)[^\d]*\s+Konsumen"
    ).unwrap();

    pub static ref LATE_FEE: Regex = dual_capture(r"Pembayaran\s+denda");

    pub static ref EARLY_SETTLEMENT: Regex = dual_capture(r"Pembayaran\s+pelunasan\s+dipercepat");

    pub static ref EARLY_SETTLEMENT_FEE: Regex = dual_capture(r"Denda\s+pelunasan\s+dipercepat");

    pub static ref EARLY_SETTLEMENT_PENALTY: Regex =
        dual_capture(r"Pembayaran\s+penalti\s+pelunasan\s+dipercepat");

    pub static ref INSURANCE_SETTLEMENT: Regex = dual_capture(
        r"pelunasan\s+dipercepat\s+karena\s+pencairan\s+tagihan\s+asuransi"
    );

    pub static ref INSURANCE_SETTLEMENT_PENALTY: Regex = dual_capture(
        r"penalti\s+pelunasan\s+dipercepat\s+karena\s+pencairan\s+tagihan\s+asuransi"
    );

    pub static ref RECOVERY: Regex = dual_capture(r"Pembayaran\s+recovery");

    pub static ref FEE_WAIVER: Regex = dual_capture(r"Penghapusan\s+denda");
}
