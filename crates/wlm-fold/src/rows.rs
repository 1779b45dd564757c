//! Row files: JSONL (one row per line) or a single JSON array.

use crate::Row;
use crate::value_kind;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read rows from a JSONL reader. Blank lines and `#` comments are skipped.
pub fn read_rows(reader: impl BufRead) -> Result<Vec<Row>, RowsError> {
    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| RowsError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| RowsError::Parse(line_no + 1, e.to_string()))?;
        rows.push(expect_object(line_no + 1, value)?);
    }
    Ok(rows)
}

/// Read rows from bytes holding either a JSON array or JSONL.
pub fn read_rows_from_slice(bytes: &[u8]) -> Result<Vec<Row>, RowsError> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first != Some(&b'[') {
        return read_rows(BufReader::new(bytes));
    }

    let values: Vec<Value> =
        serde_json::from_slice(bytes).map_err(|e| RowsError::Parse(e.line(), e.to_string()))?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| expect_object(index, value))
        .collect()
}

/// Read rows from a file path.
pub fn read_rows_from_path(path: impl AsRef<Path>) -> Result<Vec<Row>, RowsError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| RowsError::Io(0, format!("{}: {e}", path.display())))?;
    read_rows_from_slice(&bytes)
}

/// Write values as JSONL.
pub fn write_rows(writer: &mut impl Write, values: &[Value]) -> Result<(), RowsError> {
    for value in values {
        let line = serde_json::to_string(value).map_err(|e| RowsError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| RowsError::Io(0, e.to_string()))?;
    }
    Ok(())
}

fn expect_object(position: usize, value: Value) -> Result<Row, RowsError> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(RowsError::NotAnObject(position, value_kind(&other))),
    }
}

/// Errors from reading or writing row files.
///
/// Positions are 1-based line numbers for JSONL, 0-based element indices for
/// JSON arrays, and 0 when no position applies.
#[derive(Debug, thiserror::Error)]
pub enum RowsError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("row {0}: expected an object, found {1}")]
    NotAnObject(usize, &'static str),

    #[error("serialization error: {0}")]
    Serialize(String),
}
