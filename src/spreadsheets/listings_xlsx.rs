use crate::errors::{ExportError, Result};
use crate::listings::{CellValue, Row, COLUMNS};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::warn;

/// Longest string a single Excel cell can hold.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Receives mapped rows in order.
pub trait RowSink {
    fn append_row(&mut self, row: &Row) -> Result<()>;
}

/// In-memory worksheet that grows one listing at a time and is written to
/// disk once, by [`SheetWriter::finalize`].
pub struct SheetWriter {
    worksheet: Worksheet,
    next_row: u32,
}

impl SheetWriter {
    /// Worksheet named `title` with the bold, frozen header already in place.
    pub fn new(title: &str) -> Result<Self> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(title).map_err(sheet_err("set sheet name"))?;

        let mut writer = Self {
            worksheet,
            next_row: 0,
        };
        writer.write_header(&COLUMNS)?;
        Ok(writer)
    }

    fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        let bold = Format::new().set_bold();

        for (col, header) in columns.iter().enumerate() {
            self.worksheet
                .write_string_with_format(0, col as u16, *header, &bold)
                .map_err(sheet_err(&format!("write header '{header}'")))?;
        }

        // Keep the header visible while scrolling.
        self.worksheet
            .set_freeze_panes(1, 0)
            .map_err(sheet_err("freeze header"))?;

        self.next_row = 1;
        Ok(())
    }

    /// Data rows appended so far (header excluded).
    pub fn rows_written(&self) -> usize {
        (self.next_row - 1) as usize
    }

    /// Autofit the columns and save the workbook to `path`.
    pub fn finalize(self, path: &Path) -> Result<usize> {
        let rows = self.rows_written();
        let mut worksheet = self.worksheet;
        worksheet.autofit();

        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        workbook.save(path).map_err(|e| match e {
            XlsxError::IoError(io) => ExportError::Io(io),
            other => ExportError::Sheet(format!("Failed to save workbook: {other}")),
        })?;

        Ok(rows)
    }
}

impl RowSink for SheetWriter {
    fn append_row(&mut self, row: &Row) -> Result<()> {
        let r = self.next_row;

        for (col, cell) in row.cells().iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let col = col as u16;
            let written = match cell {
                CellValue::Text(s) => {
                    let text = truncate_chars(s, MAX_CELL_CHARS);
                    if text.len() < s.len() {
                        warn!(
                            row = r,
                            column = COLUMNS[col as usize],
                            chars = s.chars().count(),
                            "cell text truncated to Excel's limit"
                        );
                    }
                    self.worksheet.write_string(r, col, text)
                }
                CellValue::Number(n) => self.worksheet.write_number(r, col, *n),
                CellValue::Bool(b) => self.worksheet.write_boolean(r, col, *b),
            };
            written.map_err(|e| {
                ExportError::Sheet(format!(
                    "Failed to write row {r} column '{}': {e}",
                    COLUMNS[col as usize]
                ))
            })?;
        }

        self.next_row += 1;
        Ok(())
    }
}

/// Longest prefix of `s` with at most `max` chars, cut on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn sheet_err(context: &str) -> impl Fn(XlsxError) -> ExportError + '_ {
    move |e| ExportError::Sheet(format!("Failed to {context}: {e}"))
}
