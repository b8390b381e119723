// src/bin/check_headers.rs
//
// Header Inspector: print the column names found at each resource's declared
// header row. One labeled block per resource; a failure on one resource never
// aborts the others.

use anyhow::{bail, ensure, Result};
use importaudit::headers::{format_header_list, inspect_all, scan::scan_candidate_rows, HeaderSource};
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str = "Usage:
  check_headers [NAME=]PATH[:ROW] ...
  check_headers --scan PATH ...

ROW is the zero-based header row offset (default 0). With --scan, the first
20 rows of each file are searched for rows that look like headers.";

/// Rows searched in `--scan` mode.
const SCAN_ROWS: usize = 20;
/// Minimum populated cells for a row to count as a header candidate.
const SCAN_MIN_CELLS: usize = 3;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        bail!("no resources given\n\n{USAGE}");
    }

    if args[0] == "--scan" {
        ensure!(args.len() > 1, "no files to scan\n\n{USAGE}");
        for path in &args[1..] {
            scan_one(path);
        }
        return Ok(());
    }

    let sources = args
        .iter()
        .map(|spec| parse_source_spec(spec))
        .collect::<Result<Vec<_>>>()?;

    for report in inspect_all(&sources) {
        println!("\n--- {} Headers (Row {}) ---", report.name, report.header_row);
        match report.outcome {
            Ok(headers) => println!("{}", format_header_list(&headers)),
            Err(e) => println!("Error: {e}"),
        }
    }
    Ok(())
}

fn scan_one(path: &str) {
    println!("\n--- Scanning {path} (first {SCAN_ROWS} rows) ---");
    match scan_candidate_rows(Path::new(path), SCAN_ROWS, SCAN_MIN_CELLS) {
        Ok(candidates) if candidates.is_empty() => println!("No candidate header rows found"),
        Ok(candidates) => {
            for candidate in candidates {
                println!("Row {}: {}", candidate.row, format_header_list(&candidate.cells));
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

/// Parse `NAME=PATH[:ROW]`. The name defaults to the file stem and the row to
/// 0. Only a trailing all-digit segment counts as a row, so Windows drive
/// colons (`c:/...`) pass through untouched.
fn parse_source_spec(spec: &str) -> Result<HeaderSource> {
    let (name, rest) = match spec.split_once('=') {
        Some((name, rest)) => (Some(name.to_string()), rest),
        None => (None, spec),
    };

    let (path_str, header_row) = match rest.rsplit_once(':') {
        Some((path, digits))
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) =>
        {
            (path, digits.parse()?)
        }
        _ => (rest, 0),
    };
    ensure!(!path_str.is_empty(), "empty path in resource spec {spec:?}");

    let path = PathBuf::from(path_str);
    let name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path_str.to_string())
    });

    Ok(HeaderSource {
        name,
        path,
        header_row,
    })
}
