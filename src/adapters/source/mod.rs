//! Source file reader
//!
//! Reads the flat transaction export: a CSV file with fixed column names in
//! ISO-8859-1 encoding. Acquisition and caching of the file are external
//! collaborators; this adapter only parses a local path.
//!
//! Structural problems — an unreadable file, missing required columns — are
//! fatal configuration errors. Individual records that fail to parse (bad
//! numeric fields, wrong field count) are skipped and counted, matching the
//! pipeline's bulk-filter semantics; per-row cleaning predicates are the
//! sanitizer's job, not the reader's.

use crate::domain::{RawRow, Result, TallyError};
use std::fs;
use std::path::Path;

/// Required export columns, as spelled in the file header
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "InvoiceNo",
    "StockCode",
    "Description",
    "Quantity",
    "InvoiceDate",
    "UnitPrice",
    "CustomerID",
    "Country",
];

/// Rows read from one source file
#[derive(Debug, Clone)]
pub struct SourceRows {
    /// Successfully parsed records, in file order
    pub rows: Vec<RawRow>,

    /// Records skipped because they could not be parsed
    pub rows_unreadable: usize,
}

/// Read raw rows from the export file at `path`
///
/// # Errors
///
/// Returns `TallyError::Configuration` when the header is missing required
/// columns, `TallyError::Io` when the file cannot be read.
pub fn read_raw_rows(path: impl AsRef<Path>) -> Result<SourceRows> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        TallyError::Io(format!("Failed to read source file {}: {}", path.display(), e))
    })?;

    // The export is ISO-8859-1; every byte maps directly to the same code point.
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let source = parse_rows(&text)?;

    tracing::info!(
        path = %path.display(),
        rows = source.rows.len(),
        unreadable = source.rows_unreadable,
        "Loaded source file"
    );

    Ok(source)
}

/// Parse raw rows from decoded CSV text
fn parse_rows(text: &str) -> Result<SourceRows> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| TallyError::Source(format!("Failed to read CSV header: {e}")))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == *required))
        .collect();

    if !missing.is_empty() {
        return Err(TallyError::Configuration(format!(
            "Source file is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut rows_unreadable = 0usize;

    for record in reader.deserialize::<RawRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                rows_unreadable += 1;
                tracing::debug!(error = %e, "Skipping unreadable record");
            }
        }
    }

    Ok(SourceRows {
        rows,
        rows_unreadable,
    })
}
