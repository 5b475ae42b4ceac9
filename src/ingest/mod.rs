// Bulk ingestion — turning an uploaded table into comments.
//
// The format is chosen by file extension: delimited text (.csv, .tsv) goes
// through the csv crate, workbooks (.xlsx, .xls) through calamine. Both end
// up as a header row plus string cells, and `collect_rows` does the rest:
// locate the `text` column (and optional `category` column) by trimmed,
// case-insensitive name, then drop rows whose text is blank.

pub mod delimited;
pub mod spreadsheet;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Tsv,
    Xlsx,
    Xls,
}

impl Format {
    /// Pick a format from a filename's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, InputError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(Format::Csv),
            Some("tsv") => Ok(Format::Tsv),
            Some("xlsx") => Ok(Format::Xlsx),
            Some("xls") => Ok(Format::Xls),
            _ => Err(InputError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// One usable row from an upload. `row` is the 1-based data row number
/// (the header is row 0), kept for log messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkRow {
    pub row: usize,
    pub text: String,
    pub category: Option<String>,
}

/// The usable rows of an upload, plus how many were blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upload {
    pub rows: Vec<BulkRow>,
    pub empty_rows: usize,
}

/// Parse an uploaded file's bytes.
pub fn parse_upload(filename: &str, bytes: &[u8]) -> Result<Upload, InputError> {
    let (headers, records) = match Format::from_filename(filename)? {
        Format::Csv => delimited::read_table(bytes, b',')?,
        Format::Tsv => delimited::read_table(bytes, b'\t')?,
        Format::Xlsx | Format::Xls => spreadsheet::read_table(bytes)?,
    };
    collect_rows(&headers, records)
}

/// Read and parse a file from disk (used by `pulse ingest`).
pub fn read_path(path: &Path) -> Result<Upload> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Upload path has no file name")?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_upload(filename, &bytes)?)
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
}

/// Map a header row and data rows to comments.
pub fn collect_rows<I>(headers: &[String], records: I) -> Result<Upload, InputError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let text_col = find_column(headers, "text").ok_or(InputError::MissingTextColumn)?;
    let category_col = find_column(headers, "category");

    let mut upload = Upload::default();
    for (i, record) in records.into_iter().enumerate() {
        let text = record.get(text_col).map(|t| t.trim()).unwrap_or_default();
        if text.is_empty() {
            upload.empty_rows += 1;
            continue;
        }

        let category = category_col
            .and_then(|c| record.get(c))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        upload.rows.push(BulkRow {
            row: i + 1,
            text: text.to_string(),
            category,
        });
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(Format::from_filename("feedback.csv").unwrap(), Format::Csv);
        assert_eq!(Format::from_filename("Feedback.XLSX").unwrap(), Format::Xlsx);
        assert_eq!(Format::from_filename("a.b.tsv").unwrap(), Format::Tsv);
        assert_eq!(Format::from_filename("old.xls").unwrap(), Format::Xls);
        assert!(matches!(
            Format::from_filename("notes.txt"),
            Err(InputError::UnsupportedFormat(_))
        ));
        assert!(Format::from_filename("csv").is_err());
    }

    #[test]
    fn test_collect_rows_matches_headers_loosely() {
        let headers = strings(&[" Category ", "TEXT"]);
        let records = vec![
            strings(&["events", "Great fest"]),
            strings(&["", "Lab is cold"]),
        ];
        let upload = collect_rows(&headers, records).unwrap();
        assert_eq!(upload.rows.len(), 2);
        assert_eq!(upload.rows[0].category.as_deref(), Some("events"));
        assert_eq!(upload.rows[1].category, None);
        assert_eq!(upload.rows[1].text, "Lab is cold");
    }

    #[test]
    fn test_collect_rows_skips_blank_text() {
        let headers = strings(&["text"]);
        let records = vec![
            strings(&["first"]),
            strings(&["   "]),
            strings(&[]),
            strings(&["fourth"]),
        ];
        let upload = collect_rows(&headers, records).unwrap();
        assert_eq!(upload.empty_rows, 2);
        let rows: Vec<usize> = upload.rows.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 4]);
    }

    #[test]
    fn test_collect_rows_requires_text_column() {
        let headers = strings(&["comment", "category"]);
        let err = collect_rows(&headers, Vec::<Vec<String>>::new()).unwrap_err();
        assert_eq!(err, InputError::MissingTextColumn);
    }

    #[test]
    fn test_parse_upload_rejects_unknown_extension() {
        let err = parse_upload("feedback.json", b"[]").unwrap_err();
        assert_eq!(err, InputError::UnsupportedFormat("feedback.json".to_string()));
    }
}
