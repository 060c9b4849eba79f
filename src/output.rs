//! Output column naming and the tab-separated row sink.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};
use crate::join::OutputShape;

/// Column names for a table's value cells.
///
/// Matrix identifiers follow `^([A-Z]+)(\d+)([A-Z]*)$`: a letter prefix,
/// the table number, and an optional iteration suffix. Cell `i` (1-based)
/// is named with the number and ordinal zero-padded to three digits, so
/// `P1` yields `P001001`, `P001002`, … and `P12A` yields `P012A001`, ….
pub fn table_column_names(table: &str, cell_count: usize) -> Result<Vec<String>> {
    let pattern = Regex::new(r"^([A-Z]+)(\d+)([A-Z]*)$")?;
    let captures = pattern
        .captures(table)
        .ok_or_else(|| Error::MalformedTable(table.to_string()))?;

    let prefix = &captures[1];
    let number: u32 = captures[2]
        .parse()
        .map_err(|_| Error::MalformedTable(table.to_string()))?;
    let suffix = &captures[3];

    Ok((1..=cell_count)
        .map(|cell| format!("{prefix}{number:03}{suffix}{cell:03}"))
        .collect())
}

/// Full header row: geography titles for `shape`, then the table columns.
pub fn header_row(shape: OutputShape, table: &str, cell_count: usize) -> Result<Vec<String>> {
    let mut header: Vec<String> = shape.titles().iter().map(|t| t.to_string()).collect();
    header.extend(table_column_names(table, cell_count)?);
    Ok(header)
}

/// Tab-separated row sink writing to stdout or a file.
///
/// Census cells never contain tabs or newlines, so rows are plain joins.
/// Every row is flushed as soon as it is written; output keeps pace with
/// the network, and an interrupted run leaves only complete rows behind.
pub struct TabWriter {
    inner: Box<dyn Write>,
}

impl TabWriter {
    /// Write to `path`, or to stdout when `path` is `None`.
    pub fn create(path: Option<&Path>) -> Result<Self> {
        let inner: Box<dyn Write> = match path {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout()),
        };
        Ok(Self { inner })
    }

    pub fn write_row(&mut self, cells: &[String]) -> Result<()> {
        writeln!(self.inner, "{}", cells.join("\t"))?;
        self.inner.flush()?;
        Ok(())
    }
}
