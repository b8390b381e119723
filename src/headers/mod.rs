// src/headers/mod.rs

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod scan;

/// One entry of the resource mapping: a labeled spreadsheet plus the
/// zero-relative row index that holds its column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSource {
    pub name: String,
    pub path: PathBuf,
    pub header_row: usize,
}

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("resource not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read workbook {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook has no worksheet: {0}")]
    NoWorksheet(PathBuf),

    #[error("header row {row} is out of range: sheet has {rows} row(s)")]
    RowOutOfRange { row: usize, rows: usize },
}

/// Outcome of inspecting a single resource.
#[derive(Debug)]
pub struct HeaderReport {
    pub name: String,
    pub header_row: usize,
    pub outcome: Result<Vec<String>, HeaderError>,
}

/// Open the first worksheet of the workbook at `path`.
///
/// Classifies failures per `HeaderError` rather than collapsing them into a
/// single generic read failure.
pub(crate) fn open_first_sheet(path: &Path) -> Result<Range<Data>, HeaderError> {
    if !path.exists() {
        return Err(HeaderError::NotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path).map_err(|source| HeaderError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| HeaderError::NoWorksheet(path.to_path_buf()))?
        .map_err(|source| HeaderError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the column names at `header_row` of the first worksheet.
///
/// Reads zero data rows. Row indices are absolute (row 0 is the first row of
/// the sheet, whether or not it is populated); trailing empty cells are
/// dropped so merged-title padding does not show up as phantom columns.
pub fn read_headers(path: &Path, header_row: usize) -> Result<Vec<String>, HeaderError> {
    let range = open_first_sheet(path)?;
    debug!(path = %path.display(), header_row, "reading header row");

    let Some((end_row, end_col)) = range.end() else {
        // Sheet exists but has no populated cells at all.
        return Err(HeaderError::RowOutOfRange {
            row: header_row,
            rows: 0,
        });
    };
    let rows = end_row as usize + 1;
    if header_row > end_row as usize {
        return Err(HeaderError::RowOutOfRange {
            row: header_row,
            rows,
        });
    }

    let mut headers: Vec<String> = (0..=end_col)
        .map(|col| {
            range
                .get_value((header_row as u32, col))
                .map(|cell| cell.to_string().trim().to_string())
                .unwrap_or_default()
        })
        .collect();
    while headers.last().is_some_and(|h| h.is_empty()) {
        headers.pop();
    }
    Ok(headers)
}

/// Inspect every source in the batch. A failure on one resource never aborts
/// processing of the others; each report carries its own outcome.
pub fn inspect_all(sources: &[HeaderSource]) -> Vec<HeaderReport> {
    sources
        .iter()
        .map(|source| HeaderReport {
            name: source.name.clone(),
            header_row: source.header_row,
            outcome: read_headers(&source.path, source.header_row),
        })
        .collect()
}

/// Render a column list as `['ID', 'Name', 'Date']`.
pub fn format_header_list(headers: &[String]) -> String {
    let quoted: Vec<String> = headers.iter().map(|h| format!("'{}'", h)).collect();
    format!("[{}]", quoted.join(", "))
}
