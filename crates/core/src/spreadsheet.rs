//! xlsx encoding of an [`ExportTable`].
//!
//! One worksheet, a bold header row, then one row per response. Text longer
//! than Excel's per-cell limit is cut to fit instead of failing the export.

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use crate::error::CoreError;
use crate::export::{Cell, ExportTable};

/// MIME type of an xlsx workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Name of the only worksheet in the workbook.
pub const SHEET_NAME: &str = "Sheet1";

/// Most characters Excel stores in a single cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Encode `table` as xlsx bytes.
pub fn write_xlsx(table: &ExportTable) -> Result<Vec<u8>, CoreError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_sheet(worksheet, table)?;
    workbook.save_to_buffer().map_err(internal)
}

fn fill_sheet(worksheet: &mut Worksheet, table: &ExportTable) -> Result<(), CoreError> {
    worksheet.set_name(SHEET_NAME).map_err(internal)?;

    let bold = Format::new().set_bold();
    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col_num(col)?, clamp_cell(header), &bold)
            .map_err(internal)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = row_num(index + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let col_num = col_num(col)?;
            let written = match cell {
                // Ids stay well inside f64's exact integer range.
                Cell::Number(n) => worksheet.write_number(row_num, col_num, *n as f64),
                Cell::Text(text) => worksheet.write_string(row_num, col_num, clamp_cell(text)),
            };
            written.map_err(internal)?;
        }
    }
    Ok(())
}

/// Longest prefix of `text` that fits in one cell, cut on a char boundary.
pub fn clamp_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn row_num(index: usize) -> Result<RowNum, CoreError> {
    RowNum::try_from(index).map_err(|_| internal(format!("row {index} is out of range")))
}

fn col_num(index: usize) -> Result<ColNum, CoreError> {
    ColNum::try_from(index).map_err(|_| internal(format!("column {index} is out of range")))
}

fn internal(err: impl std::fmt::Display) -> CoreError {
    CoreError::Internal(format!("Failed to encode spreadsheet: {err}"))
}
