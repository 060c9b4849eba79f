//! Locating tables and archives within the Census 2000 SF1 release.
//!
//! The release is organized as one geography archive plus 39 data archives
//! per state (and a national pair). Which data archive holds a given table,
//! and where its cells sit inside a data row, comes from a remote packing
//! index: a tab-delimited file listing every table in packing order with
//! its archive file-name fragment and cell count.

use std::io::{BufRead, BufReader, Read};

use tracing::debug;

use crate::data::LOGRECNO_INDEX;
use crate::error::{Error, Result};

/// Base URL of the Census 2000 data sets.
pub const DATASET_BASE_URL: &str = "https://www2.census.gov/census_2000/datasets/";

/// Packing index for the SF1 release.
pub const PACKING_INDEX_URL: &str = "http://census-tools.teczno.com/SF1.txt";

/// Data rows open with this many bookkeeping cells, the last of which is
/// the logical record number; table values start right after them.
const LEADING_CELLS: usize = LOGRECNO_INDEX + 1;

const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("American Samoa", "AS"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Marshall Islands", "MH"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Puerto Rico", "PR"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Resolve a geography argument to a numeric summary-level code.
///
/// Accepts the four named levels or any literal 3-digit code; the join
/// compares codes as strings, so unnamed levels work unchanged.
pub fn resolve_summary_level(input: &str) -> Result<String> {
    match input {
        "state" => Ok("040".to_string()),
        "county" => Ok("050".to_string()),
        "tract" => Ok("080".to_string()),
        "block" => Ok("101".to_string()),
        code if code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(code.to_string())
        }
        other => Err(Error::UnknownSummaryLevel(other.to_string())),
    }
}

/// USPS abbreviation for a full state name.
pub fn state_abbreviation(name: &str) -> Result<&'static str> {
    STATES
        .iter()
        .find(|(full, _)| *full == name)
        .map(|(_, abbrev)| *abbrev)
        .ok_or_else(|| Error::UnknownState(name.to_string()))
}

/// URLs of the geography and data archives for one run.
///
/// Per-state archives live under a directory named after the state
/// (spaces become underscores) and are prefixed with the lowercase
/// abbreviation; the national pair lives under `0Final_National` with a
/// `us` prefix. `file_name` is the packing-index fragment naming the data
/// archive, e.g. `"01"`.
pub fn archive_urls(state: Option<&str>, file_name: &str) -> Result<(String, String)> {
    let (directory, prefix) = match state {
        Some(name) => (
            name.replace(' ', "_"),
            state_abbreviation(name)?.to_lowercase(),
        ),
        None => ("0Final_National".to_string(), "us".to_string()),
    };

    let geo = format!("{DATASET_BASE_URL}Summary_File_1/{directory}/{prefix}geo_uf1.zip");
    let data =
        format!("{DATASET_BASE_URL}Summary_File_1/{directory}/{prefix}000{file_name}_uf1.zip");
    Ok((geo, data))
}

/// Where a table's values live: which data archive, and which cells of a
/// data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLocation {
    /// Archive file-name fragment from the packing index, e.g. `"01"`.
    pub file_name: String,
    /// Index of the table's first cell within a data row.
    pub column_offset: usize,
    /// Number of cells the table occupies.
    pub cell_count: usize,
    /// Human-readable table name.
    pub name: String,
    /// The universe the table counts.
    pub universe: String,
}

/// Fetch the packing index and locate `table` in it.
pub fn locate_table(index_url: &str, table: &str) -> Result<TableLocation> {
    let resp = reqwest::blocking::get(index_url)
        .and_then(|resp| resp.error_for_status())
        .map_err(|source| Error::IndexFetch {
            url: index_url.to_string(),
            source,
        })?;

    locate_table_in(resp, index_url, table)
}

/// Walk a packing index read from `reader` until `table` is found.
///
/// The index has a tab-delimited header row naming at least `File Name`,
/// `Matrix Number`, `Cell Count`, `Name` and `Universe`. Tables appear in
/// packing order, grouped by archive; the running column offset restarts
/// at the first value cell whenever the archive fragment changes, and
/// grows by each preceding table's cell count within an archive.
pub fn locate_table_in<R: Read>(reader: R, source: &str, table: &str) -> Result<TableLocation> {
    let mut lines = BufReader::new(reader).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(Error::IndexFormat {
                url: source.to_string(),
                reason: "index is empty".to_string(),
            });
        }
    };
    let columns: Vec<&str> = header.trim_end().split('\t').collect();
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| Error::IndexFormat {
                url: source.to_string(),
                reason: format!("missing column {name:?}"),
            })
    };

    let file_col = column("File Name")?;
    let matrix_col = column("Matrix Number")?;
    let count_col = column("Cell Count")?;
    let name_col = column("Name")?;
    let universe_col = column("Universe")?;

    let mut current_file = String::new();
    let mut column_offset = LEADING_CELLS;

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();

        let file_name = index_cell(&row, file_col, source)?;
        let matrix = index_cell(&row, matrix_col, source)?;
        let raw_count = index_cell(&row, count_col, source)?;
        let cell_count: usize = raw_count.parse().map_err(|_| Error::IndexFormat {
            url: source.to_string(),
            reason: format!("cell count {raw_count:?} for {matrix} is not a number"),
        })?;

        if file_name != current_file {
            current_file = file_name.to_string();
            column_offset = LEADING_CELLS;
        }

        if matrix == table {
            debug!(table, file_name, column_offset, cell_count, "located table");
            return Ok(TableLocation {
                file_name: file_name.to_string(),
                column_offset,
                cell_count,
                name: index_cell(&row, name_col, source)?.to_string(),
                universe: index_cell(&row, universe_col, source)?.to_string(),
            });
        }

        column_offset += cell_count;
    }

    Err(Error::UnknownTable(table.to_string()))
}

fn index_cell<'a>(row: &[&'a str], index: usize, source: &str) -> Result<&'a str> {
    row.get(index)
        .map(|cell| cell.trim())
        .ok_or_else(|| Error::IndexFormat {
            url: source.to_string(),
            reason: format!("row is missing column {index}"),
        })
}
