// src/headers/scan.rs

use std::path::Path;

use super::{open_first_sheet, HeaderError};

/// A row that looks like it could be the real header row.
#[derive(Debug, PartialEq, Eq)]
pub struct CandidateRow {
    pub row: usize,
    pub cells: Vec<String>,
}

/// Scan the first `max_rows` rows of the first worksheet and return every row
/// with at least `min_cells` non-empty cells.
///
/// Exported spreadsheets often carry a title line or two above the real
/// header row; this narrows down where the column labels actually sit.
pub fn scan_candidate_rows(
    path: &Path,
    max_rows: usize,
    min_cells: usize,
) -> Result<Vec<CandidateRow>, HeaderError> {
    let range = open_first_sheet(path)?;
    let Some((end_row, end_col)) = range.end() else {
        return Ok(Vec::new());
    };

    let limit = (end_row as usize + 1).min(max_rows);
    let mut candidates = Vec::new();
    for row in 0..limit {
        let cells: Vec<String> = (0..=end_col)
            .filter_map(|col| {
                range
                    .get_value((row as u32, col))
                    .map(|cell| cell.to_string().trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .collect();
        if cells.len() >= min_cells {
            candidates.push(CandidateRow { row, cells });
        }
    }
    Ok(candidates)
}
