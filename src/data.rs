use std::io::{BufRead, BufReader, Read};

use crate::error::Result;

/// Index of the logical record number inside a data row. SF1 data rows
/// open with five bookkeeping cells (file id, state, characteristic
/// iteration, part number, logical record number).
pub const LOGRECNO_INDEX: usize = 4;

/// One raw comma-delimited row.
pub type DataRow = Vec<String>;

/// Lazy sequence of comma-delimited rows read off a byte stream.
///
/// Cells are kept verbatim; only line endings are stripped and blank
/// lines skipped. Validation of row shape happens at the join, which
/// knows which cells it needs.
pub struct DataRows<R: Read> {
    reader: BufReader<R>,
    line: String,
}

impl<R: Read> DataRows<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: String::new(),
        }
    }
}

impl<R: Read> Iterator for DataRows<R> {
    type Item = Result<DataRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    let row = self.line.trim_end_matches(['\r', '\n']);
                    if row.is_empty() {
                        continue;
                    }
                    return Some(Ok(row.split(',').map(String::from).collect()));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
