use super::ParsedTable;
use crate::error::AppError;
use calamine::{open_workbook_auto_from_rs, Reader};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;

/// Reads the first worksheet of an XLS/XLSX upload. The first row is the
/// header list; every cell is coerced to its string form, empty cells to "".
pub fn parse(bytes: &[u8]) -> Result<ParsedTable, AppError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::Validation(format!("Could not read spreadsheet: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Validation("The spreadsheet has no worksheets".into()))?
        .map_err(|e| AppError::Validation(format!("Could not read worksheet: {}", e)))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| AppError::Validation("The spreadsheet contains no data".into()))?
        .iter()
        .map(|cell| cell.to_string())
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::Validation("The spreadsheet has no header row".into()));
    }

    let rows = rows_iter
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            cells.resize(headers.len(), String::new());
            cells.truncate(headers.len());
            cells
        })
        .filter(|cells| !cells.iter().all(|c| c.is_empty()))
        .collect();

    Ok(ParsedTable { headers, rows })
}

/// Builds a single-worksheet XLSX export with autofitted columns.
pub fn write(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Mitglieder")
        .map_err(|e| AppError::InternalWithMsg(format!("xlsx worksheet: {}", e)))?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| AppError::InternalWithMsg(format!("xlsx header: {}", e)))?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, value)
                .map_err(|e| AppError::InternalWithMsg(format!("xlsx cell: {}", e)))?;
        }
    }

    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::InternalWithMsg(format!("xlsx save: {}", e)))
}
