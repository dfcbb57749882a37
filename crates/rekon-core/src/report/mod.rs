//! Spreadsheet reports.
//!
//! [`PlainReport`] writes a flat column dump. [`StyledReport`] wraps any
//! other writer, adds grouped headers and formatting, and falls back to
//! the wrapped writer when the styled workbook cannot be produced.

mod plain;
mod styled;

pub use plain::PlainReport;
pub use styled::{StyleContext, StyleStep, StyledReport};

use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Worksheet, XlsxError};

use crate::error::ReportError;
use crate::models::config::ReportConfig;
use crate::models::record::{Category, Cell, ReportRow, COLUMNS};

/// Sub-labels of two-column groups.
pub const SUB_LABELS: [&str; 2] = ["Jumlah", "Acc"];

/// A top-level header spanning one or two columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderGroup {
    pub title: &'static str,
    pub span: u16,
}

/// Header groups in column order; spans add up to [`COLUMNS`].
pub fn header_groups() -> Vec<HeaderGroup> {
    let mut groups = vec![
        HeaderGroup { title: "NO", span: 1 },
        HeaderGroup { title: "BANK JF/SOFCODE", span: 1 },
        HeaderGroup { title: "Dana Pembayaran", span: 1 },
    ];
    groups.extend(Category::ALL.iter().map(|c| HeaderGroup {
        title: c.title(),
        span: 2,
    }));
    groups
}

/// Trait for report writers.
pub trait ReportWriter {
    /// Render rows into an xlsx document.
    fn build(&self, rows: &[ReportRow]) -> Result<Vec<u8>, ReportError>;

    /// Render rows and save the document to `path`.
    fn write(&self, rows: &[ReportRow], path: &Path) -> Result<(), ReportError> {
        let bytes = self.build(rows)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Writer selected by configuration.
pub fn writer_for(config: &ReportConfig) -> Box<dyn ReportWriter> {
    if config.styled {
        let mut report = StyledReport::new(PlainReport)
            .with_width_bounds(config.min_column_width, config.max_column_width);
        if let Some(name) = &config.sheet_name {
            report = report.with_sheet_name(name.clone());
        }
        Box::new(report)
    } else {
        Box::new(PlainReport)
    }
}

/// Largest integer an xlsx number cell holds exactly (2^53).
pub const MAX_EXACT_NUMBER: u64 = 1 << 53;

/// Write every row's cells starting at `first_row`.
///
/// `format_for` picks an optional format per column. Numbers above
/// [`MAX_EXACT_NUMBER`] are written as text so no digit is lost.
pub(crate) fn write_cells<'a, F>(
    sheet: &mut Worksheet,
    rows: &[ReportRow],
    first_row: u32,
    format_for: F,
) -> Result<(), XlsxError>
where
    F: Fn(u16) -> Option<&'a Format>,
{
    for (i, row) in rows.iter().enumerate() {
        let r = first_row + i as u32;
        for (c, cell) in row.cells().iter().enumerate() {
            let c = c as u16;
            match (cell, format_for(c)) {
                (Cell::Number(n), Some(format)) if *n > MAX_EXACT_NUMBER => {
                    sheet.write_string_with_format(r, c, n.to_string(), format)?;
                }
                (Cell::Number(n), None) if *n > MAX_EXACT_NUMBER => {
                    sheet.write_string(r, c, n.to_string())?;
                }
                (Cell::Number(n), Some(format)) => {
                    sheet.write_number_with_format(r, c, *n as f64, format)?;
                }
                (Cell::Number(n), None) => {
                    sheet.write_number(r, c, *n as f64)?;
                }
                (Cell::Text(s), Some(format)) => {
                    sheet.write_string_with_format(r, c, s, format)?;
                }
                (Cell::Text(s), None) => {
                    sheet.write_string(r, c, s)?;
                }
            }
        }
    }
    Ok(())
}

/// Column widths: longest header or cell text plus two, bounded.
pub fn column_widths(rows: &[ReportRow], min: f64, max: f64) -> Vec<f64> {
    let mut longest = vec![0usize; COLUMNS.len()];

    let mut col = 0usize;
    for group in header_groups() {
        longest[col] = longest[col].max(group.title.chars().count());
        if group.span == 2 {
            for (offset, label) in SUB_LABELS.iter().enumerate() {
                longest[col + offset] = longest[col + offset].max(label.len());
            }
        }
        col += group.span as usize;
    }

    for row in rows {
        for (c, cell) in row.cells().iter().enumerate().take(COLUMNS.len()) {
            longest[c] = longest[c].max(cell.to_string().chars().count());
        }
    }

    longest
        .into_iter()
        .map(|len| ((len + 2) as f64).max(min).min(max))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    use super::MAX_EXACT_NUMBER;
    use crate::models::record::Cell;

    /// Read the first worksheet of an xlsx document.
    pub fn read_back(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    /// Compare a written cell with the value read back.
    pub fn cell_matches(cell: &Cell, data: &Data) -> bool {
        match (cell, data) {
            (Cell::Number(n), Data::Float(f)) => *n as f64 == *f,
            (Cell::Number(n), Data::Int(i)) => *n as i64 == *i,
            (Cell::Number(n), Data::String(d)) => *n > MAX_EXACT_NUMBER && n.to_string() == *d,
            (Cell::Text(s), Data::String(d)) => s == d,
            (Cell::Text(s), Data::Empty) => s.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{CategoryTotal, ParsedRecord};
    use calamine::Data;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_groups_span_all_columns() {
        let groups = header_groups();
        let total: u16 = groups.iter().map(|g| g.span).sum();

        assert_eq!(total as usize, COLUMNS.len());
        assert_eq!(groups.len(), 12);
        assert_eq!(groups[3].title, "Pembayaran Angsuran");
    }

    #[test]
    fn test_column_widths_are_bounded() {
        let record = ParsedRecord {
            sofcode: "JFCS2".to_string(),
            funding_amount: 123_456_789_012,
            ..ParsedRecord::empty("a.txt")
        }
        .with_total(Category::Installment, CategoryTotal::new(5, 1));
        let rows = vec![ReportRow::from_record(1, &record)];

        let widths = column_widths(&rows, 10.0, 30.0);

        assert_eq!(widths.len(), COLUMNS.len());
        // "NO" and "1" are short: minimum applies.
        assert_eq!(widths[0], 10.0);
        // "BANK JF/SOFCODE" is 15 characters.
        assert_eq!(widths[1], 17.0);
        // "Dana Pembayaran" vs "123456789012".
        assert_eq!(widths[2], 17.0);
        // Long group titles hit the maximum.
        assert_eq!(widths[15], 30.0);
        // Second column of a group only sees "Acc" and counts.
        assert_eq!(widths[4], 10.0);
    }

    #[test]
    fn test_writer_for_config() {
        let rows = vec![ReportRow::from_record(1, &ParsedRecord::empty("a.txt"))];

        let styled = writer_for(&ReportConfig::default()).build(&rows).unwrap();
        let plain = writer_for(&ReportConfig {
            styled: false,
            ..ReportConfig::default()
        })
        .build(&rows)
        .unwrap();

        let styled = test_support::read_back(styled);
        let plain = test_support::read_back(plain);
        assert_eq!(styled.len(), 3);
        assert_eq!(plain.len(), 2);
    }

    #[test]
    fn test_large_numbers_keep_every_digit() {
        let record = ParsedRecord {
            funding_amount: 12_345_678_901_234_567,
            ..ParsedRecord::empty("a.txt")
        }
        .with_total(Category::Installment, CategoryTotal::new(MAX_EXACT_NUMBER, 1));
        let rows = vec![ReportRow::from_record(1, &record)];

        for bytes in [
            PlainReport.build(&rows).unwrap(),
            writer_for(&ReportConfig::default()).build(&rows).unwrap(),
        ] {
            let sheet = test_support::read_back(bytes);
            let data = sheet.last().unwrap();

            assert_eq!(data[2], Data::String("12345678901234567".to_string()));
            assert_eq!(data[3], Data::Float(MAX_EXACT_NUMBER as f64));
            assert!(test_support::cell_matches(&rows[0].cells()[2], &data[2]));
        }
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rekon_jf.xlsx");
        let rows = vec![ReportRow::from_record(1, &ParsedRecord::empty("a.txt"))];

        PlainReport.write(&rows, &path).unwrap();

        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
