//! Records extracted from JF payment-confirmation letters and their
//! projection onto the report schema.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Flat column names of the report, in order.
pub const COLUMNS: [&str; 21] = [
    "NO",
    "BANK JF/SOFCODE",
    "Dana Pembayaran Jumlah",
    "Pembayaran Angsuran Jumlah",
    "Pembayaran Angsuran Acc",
    "Pembayaran Denda Jumlah",
    "Pembayaran Denda Acc",
    "Pelunasan dipercepat Jumlah",
    "Pelunasan dipercepat Acc",
    "Denda Pelunasan dipercepat Jumlah",
    "Denda Pelunasan dipercepat Acc",
    "Penalti Pelunasan dipercepat Jumlah",
    "Penalti Pelunasan dipercepat Acc",
    "Pelunasan dipercepat case Asuransi Jumlah",
    "Pelunasan dipercepat case Asuransi Acc",
    "Penalti pelunasan dipercepat case Asuransi Jumlah",
    "Penalti pelunasan dipercepat case Asuransi Acc",
    "Pembayaran Recovery Jumlah",
    "Pembayaran Recovery Acc",
    "Penghapusan denda konsumen Jumlah",
    "Penghapusan denda konsumen Acc",
];

/// Payment or waiver classification reported in a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pembayaran angsuran (point a of the letter).
    Installment,
    /// Pembayaran denda.
    LateFee,
    /// Pembayaran pelunasan dipercepat.
    EarlySettlement,
    /// Denda pelunasan dipercepat.
    EarlySettlementFee,
    /// Pembayaran penalti pelunasan dipercepat.
    EarlySettlementPenalty,
    /// Pelunasan dipercepat karena pencairan tagihan asuransi.
    InsuranceSettlement,
    /// Penalti pelunasan dipercepat karena pencairan tagihan asuransi.
    InsuranceSettlementPenalty,
    /// Pembayaran recovery.
    Recovery,
    /// Penghapusan denda konsumen.
    FeeWaiver,
}

impl Category {
    /// All categories in report column order.
    pub const ALL: [Category; 9] = [
        Category::Installment,
        Category::LateFee,
        Category::EarlySettlement,
        Category::EarlySettlementFee,
        Category::EarlySettlementPenalty,
        Category::InsuranceSettlement,
        Category::InsuranceSettlementPenalty,
        Category::Recovery,
        Category::FeeWaiver,
    ];

    /// Group title used in the report header.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Installment => "Pembayaran Angsuran",
            Category::LateFee => "Pembayaran Denda",
            Category::EarlySettlement => "Pelunasan dipercepat",
            Category::EarlySettlementFee => "Denda Pelunasan dipercepat",
            Category::EarlySettlementPenalty => "Penalti Pelunasan dipercepat",
            Category::InsuranceSettlement => "Pelunasan dipercepat case Asuransi",
            Category::InsuranceSettlementPenalty => "Penalti pelunasan dipercepat case Asuransi",
            Category::Recovery => "Pembayaran Recovery",
            Category::FeeWaiver => "Penghapusan denda konsumen",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Amount and consumer count of one category.
///
/// A zero amount always carries a zero count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    amount: u64,
    count: u64,
}

impl CategoryTotal {
    /// Create a total, zeroing the count when the amount is zero.
    pub fn new(amount: u64, count: u64) -> Self {
        let count = if amount == 0 { 0 } else { count };
        Self { amount, count }
    }

    /// Monetary total (Jumlah).
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Number of consumers (Acc).
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Fields extracted from a single letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRecord {
    /// Source file name.
    pub filename: String,

    /// Institutional code (BANK JF/SOFCODE), empty when unknown.
    pub sofcode: String,

    /// Dana Pembayaran: total funds transferred.
    pub funding_amount: u64,

    /// Per-category totals; every category is present.
    pub totals: BTreeMap<Category, CategoryTotal>,

    /// Set when the file could not be processed; all numbers are then zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedRecord {
    /// A record with every field at its zero default.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sofcode: String::new(),
            funding_amount: 0,
            totals: Category::ALL
                .iter()
                .map(|c| (*c, CategoryTotal::default()))
                .collect(),
            error: None,
        }
    }

    /// A zero-filled record carrying an error marker.
    pub fn degraded(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(filename)
        }
    }

    /// Total for a category.
    pub fn total(&self, category: Category) -> CategoryTotal {
        self.totals.get(&category).copied().unwrap_or_default()
    }

    /// Replace a category total.
    pub fn with_total(mut self, category: Category, total: CategoryTotal) -> Self {
        self.totals.insert(category, total);
        self
    }

    /// Whether the record carries an error marker.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(u64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// A record projected onto [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    cells: Vec<Cell>,
}

impl ReportRow {
    /// Project a record into report column order.
    pub fn from_record(number: u32, record: &ParsedRecord) -> Self {
        let mut cells = Vec::with_capacity(COLUMNS.len());
        cells.push(Cell::Number(u64::from(number)));
        cells.push(Cell::Text(record.sofcode.clone()));
        cells.push(Cell::Number(record.funding_amount));

        for category in Category::ALL {
            let total = record.total(category);
            cells.push(Cell::Number(total.amount()));
            cells.push(Cell::Number(total.count()));
        }

        Self { cells }
    }

    /// Cells in column order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// 1-based sequence number.
    pub fn number(&self) -> u64 {
        match self.cells.first() {
            Some(Cell::Number(n)) => *n,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_amount_forces_zero_count() {
        let total = CategoryTotal::new(0, 7);
        assert_eq!(total.count(), 0);

        let total = CategoryTotal::new(1_057_000, 5);
        assert_eq!((total.amount(), total.count()), (1_057_000, 5));
    }

    #[test]
    fn test_nonzero_count_zero_amount_is_not_reversed() {
        // Only amount drives count, never the other way round.
        let total = CategoryTotal::new(500, 0);
        assert_eq!((total.amount(), total.count()), (500, 0));
    }

    #[test]
    fn test_degraded_record_is_zero_filled() {
        let record = ParsedRecord::degraded("bad.txt", "boom");

        assert!(record.is_degraded());
        assert_eq!(record.sofcode, "");
        assert_eq!(record.funding_amount, 0);
        assert_eq!(record.totals.len(), Category::ALL.len());
        assert!(record.totals.values().all(|t| *t == CategoryTotal::default()));
    }

    #[test]
    fn test_report_row_follows_columns() {
        let record = ParsedRecord {
            sofcode: "JFCS2".to_string(),
            funding_amount: 2_000_000,
            ..ParsedRecord::empty("a.txt")
        }
        .with_total(Category::Installment, CategoryTotal::new(1_500_000, 12))
        .with_total(Category::FeeWaiver, CategoryTotal::new(3_000, 1));

        let row = ReportRow::from_record(3, &record);
        let cells = row.cells();

        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(row.number(), 3);
        assert_eq!(cells[1], Cell::Text("JFCS2".to_string()));
        assert_eq!(cells[2], Cell::Number(2_000_000));
        assert_eq!(cells[3], Cell::Number(1_500_000));
        assert_eq!(cells[4], Cell::Number(12));
        assert_eq!(cells[19], Cell::Number(3_000));
        assert_eq!(cells[20], Cell::Number(1));
    }

    #[test]
    fn test_category_titles_match_columns() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(COLUMNS[3 + i * 2], format!("{} Jumlah", category.title()));
            assert_eq!(COLUMNS[4 + i * 2], format!("{} Acc", category.title()));
        }
    }
}
