//! Unstyled column dump.

use rust_xlsxwriter::Workbook;
use tracing::debug;

use super::{write_cells, ReportWriter};
use crate::error::ReportError;
use crate::models::record::{ReportRow, COLUMNS};

/// One header row of flat column names followed by the data, no formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainReport;

impl ReportWriter for PlainReport {
    fn build(&self, rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
        if rows.is_empty() {
            return Err(ReportError::Empty);
        }

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (col, name) in COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *name)?;
        }
        write_cells(sheet, rows, 1, |_| None)?;

        debug!("Built plain report with {} rows", rows.len());
        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Category, CategoryTotal, ParsedRecord};
    use crate::report::test_support::{cell_matches, read_back};
    use calamine::Data;

    #[test]
    fn test_plain_report_layout() {
        let record = ParsedRecord {
            sofcode: "JASA".to_string(),
            funding_amount: 58_321_500,
            ..ParsedRecord::empty("JFJ-1.txt")
        }
        .with_total(Category::LateFee, CategoryTotal::new(1_057_000, 5));
        let rows = vec![ReportRow::from_record(1, &record)];

        let sheet = read_back(PlainReport.build(&rows).unwrap());

        assert_eq!(sheet.len(), 2);
        for (col, name) in COLUMNS.iter().enumerate() {
            assert_eq!(sheet[0][col], Data::String(name.to_string()));
        }
        for (cell, data) in rows[0].cells().iter().zip(&sheet[1]) {
            assert!(cell_matches(cell, data), "{:?} != {:?}", cell, data);
        }
    }

    #[test]
    fn test_plain_report_rejects_empty() {
        assert!(matches!(PlainReport.build(&[]), Err(ReportError::Empty)));
    }
}
