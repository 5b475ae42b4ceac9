// Workbooks (.xlsx / .xls) via calamine. Only the first sheet is read.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::InputError;

/// Read the first worksheet into a header row and string records.
pub fn read_table(bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), InputError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| InputError::Malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InputError::Malformed("workbook has no sheets".to_string()))?
        .map_err(|e| InputError::Malformed(e.to_string()))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    Ok((headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
