//! Output formatting for result rows.
//!
//! Rows are plain JSON objects, ready for the rendering layer to merge into
//! a chart descriptor's `data` field. This module only serializes them.

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::Record;

/// Serializes rows as a pretty-printed JSON array.
pub fn rows_to_json(rows: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Prints rows as JSON to stdout.
pub fn print_rows(rows: &[Record]) -> Result<()> {
    println!("{}", rows_to_json(rows)?);
    Ok(())
}

/// Writes rows as JSON to a file, replacing any previous content.
pub fn write_rows(path: &str, rows: &[Record]) -> Result<()> {
    debug!(path, count = rows.len(), "Writing result rows");
    let mut file = std::fs::File::create(Path::new(path))?;
    file.write_all(rows_to_json(rows)?.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
