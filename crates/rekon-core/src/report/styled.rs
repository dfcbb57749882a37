//! Grouped-header report with best-effort styling.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, error, warn};

use super::{column_widths, header_groups, write_cells, HeaderGroup, ReportWriter, SUB_LABELS};
use crate::error::ReportError;
use crate::models::record::ReportRow;

/// Number of header rows above the data.
const HEADER_ROWS: u32 = 2;

/// First column that holds amounts and counts only.
const FIRST_NUMERIC_COLUMN: u16 = 3;

/// Inputs shared by the styling steps.
pub struct StyleContext<'a> {
    pub rows: &'a [ReportRow],
    pub header: Format,
    pub text: Format,
    pub number: Format,
    pub min_width: f64,
    pub max_width: f64,
}

impl<'a> StyleContext<'a> {
    fn new(rows: &'a [ReportRow], min_width: f64, max_width: f64) -> Self {
        let bordered = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::Black);

        Self {
            rows,
            header: bordered
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x366092))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            text: bordered.clone().set_align(FormatAlign::Center),
            number: bordered.set_align(FormatAlign::Right),
            min_width,
            max_width,
        }
    }
}

/// A styling pass over a worksheet whose data is already written.
pub type StyleStep = fn(&mut Worksheet, &StyleContext<'_>) -> Result<(), XlsxError>;

/// Report writer adding grouped headers and formats on top of another writer.
///
/// Data is written first. Each styling step that fails is logged and
/// skipped. If the styled workbook itself cannot be produced, the wrapped
/// writer renders the rows instead.
pub struct StyledReport<W> {
    fallback: W,
    min_width: f64,
    max_width: f64,
    sheet_name: Option<String>,
    steps: Vec<(&'static str, StyleStep)>,
}

impl<W: ReportWriter> StyledReport<W> {
    /// Wrap `fallback` with the standard styling steps.
    pub fn new(fallback: W) -> Self {
        Self {
            fallback,
            min_width: 10.0,
            max_width: 30.0,
            sheet_name: None,
            steps: vec![
                ("header", write_header as StyleStep),
                ("data cells", format_data),
                ("column widths", size_columns),
            ],
        }
    }

    /// Set the column width bounds in characters.
    pub fn with_width_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_width = min;
        self.max_width = max.max(min);
        self
    }

    /// Name the worksheet instead of using the default `Sheet1`.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Append a styling step.
    pub fn with_step(mut self, name: &'static str, step: StyleStep) -> Self {
        self.steps.push((name, step));
        self
    }

    /// Render the data, then keep each step that applies cleanly on top of
    /// the steps kept so far.
    ///
    /// A failed step can leave cells half written, so every attempt starts
    /// from a fresh workbook and only the accepted steps reach the output.
    fn build_styled(&self, rows: &[ReportRow]) -> Result<Vec<u8>, XlsxError> {
        let ctx = StyleContext::new(rows, self.min_width, self.max_width);
        self.render(&ctx, &[])?;

        let mut accepted: Vec<StyleStep> = Vec::with_capacity(self.steps.len());
        for (name, step) in &self.steps {
            accepted.push(*step);
            match self.render(&ctx, &accepted) {
                Ok(_) => debug!("Applied {} styling", name),
                Err(e) => {
                    warn!("Error applying {} styling: {}", name, e);
                    accepted.pop();
                }
            }
        }

        self.render(&ctx, &accepted)?.save_to_buffer()
    }

    fn render(&self, ctx: &StyleContext<'_>, steps: &[StyleStep]) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        if let Some(name) = &self.sheet_name {
            sheet.set_name(name)?;
        }

        write_cells(sheet, ctx.rows, HEADER_ROWS, |_| None)?;
        for step in steps {
            step(sheet, ctx)?;
        }
        Ok(workbook)
    }
}

impl<W: ReportWriter> ReportWriter for StyledReport<W> {
    fn build(&self, rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
        if rows.is_empty() {
            return Err(ReportError::Empty);
        }

        match self.build_styled(rows) {
            Ok(bytes) => {
                debug!("Built styled report with {} rows", rows.len());
                Ok(bytes)
            }
            Err(e) => {
                error!("Critical error creating styled report: {}", e);
                warn!("Falling back to a plain report");
                self.fallback.build(rows)
            }
        }
    }
}

/// Two header rows: group titles merged over their columns, sub-labels below.
fn write_header(sheet: &mut Worksheet, ctx: &StyleContext<'_>) -> Result<(), XlsxError> {
    let mut col = 0u16;
    for group in header_groups() {
        if let Err(e) = write_group(sheet, ctx, col, group) {
            warn!("Error creating header for {}: {}", group.title, e);
            sheet.write_string(0, col, group.title)?;
            if group.span == 2 {
                for (offset, label) in SUB_LABELS.iter().enumerate() {
                    sheet.write_string(1, col + offset as u16, *label)?;
                }
            }
        }
        col += group.span;
    }
    Ok(())
}

fn write_group(
    sheet: &mut Worksheet,
    ctx: &StyleContext<'_>,
    col: u16,
    group: HeaderGroup,
) -> Result<(), XlsxError> {
    if group.span == 1 {
        sheet.merge_range(0, col, 1, col, group.title, &ctx.header)?;
        return Ok(());
    }

    sheet.merge_range(0, col, 0, col + group.span - 1, group.title, &ctx.header)?;
    for (offset, label) in SUB_LABELS.iter().enumerate() {
        sheet.write_string_with_format(1, col + offset as u16, *label, &ctx.header)?;
    }
    Ok(())
}

/// Borders on every data cell; numbers right-aligned, the rest centered.
fn format_data(sheet: &mut Worksheet, ctx: &StyleContext<'_>) -> Result<(), XlsxError> {
    write_cells(sheet, ctx.rows, HEADER_ROWS, |col| {
        if col >= FIRST_NUMERIC_COLUMN {
            Some(&ctx.number)
        } else {
            Some(&ctx.text)
        }
    })
}

fn size_columns(sheet: &mut Worksheet, ctx: &StyleContext<'_>) -> Result<(), XlsxError> {
    for (col, width) in column_widths(ctx.rows, ctx.min_width, ctx.max_width)
        .into_iter()
        .enumerate()
    {
        sheet.set_column_width(col as u16, width)?;
    }
    Ok(())
}
