//! Forward-only merge join of the geography and data streams.
//!
//! Both SF1 files of a release are sorted by ascending logical record
//! number with no duplicates, one data row per geography record. The join
//! walks the geography stream once, filters it down to the requested
//! scope, and advances a one-way cursor through the data stream to the
//! matching row. The cursor never rewinds; running out of data rows
//! before a match means the two inputs are not the matched pair they are
//! supposed to be.

use crate::data::{DataRow, LOGRECNO_INDEX};
use crate::error::{Error, Result};
use crate::geo::GeoRecord;

/// Component code for the whole of a geographic entity, as opposed to an
/// urban/rural or other sub-component split.
const WHOLE_COMPONENT: &str = "00";

/// One output row: selected geography fields followed by table values.
pub type JoinedRecord = Vec<String>;

/// Which geography fields precede the table values in each output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// The four FIPS/geography identifiers.
    Narrow,
    /// Summary level and component in front, entity name behind.
    Normal,
    /// Everything in `Normal` plus the decoded coordinates.
    Wide,
}

impl OutputShape {
    /// Column titles for the geography side of the output.
    pub fn titles(self) -> &'static [&'static str] {
        match self {
            OutputShape::Narrow => &["State FIPS", "County FIPS", "Tract", "Block"],
            OutputShape::Normal => &[
                "Summary Level",
                "Geographic Component",
                "State FIPS",
                "County FIPS",
                "Tract",
                "Block",
                "Name",
            ],
            OutputShape::Wide => &[
                "Summary Level",
                "Geographic Component",
                "State FIPS",
                "County FIPS",
                "Tract",
                "Block",
                "Name",
                "Latitude",
                "Longitude",
            ],
        }
    }

    fn geo_cells(self, geo: &GeoRecord) -> Vec<String> {
        let mut cells = Vec::new();
        if self != OutputShape::Narrow {
            cells.push(geo.sumlev.clone());
            cells.push(geo.geocomp.clone());
        }
        cells.extend([
            geo.state.clone(),
            geo.county.clone(),
            geo.tract.clone(),
            geo.block.clone(),
        ]);
        if self != OutputShape::Narrow {
            cells.push(geo.name.clone());
        }
        if self == OutputShape::Wide {
            cells.push(geo.latitude.clone());
            cells.push(geo.longitude.clone());
        }
        cells
    }
}

/// The cells of a data row that belong to one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSlice {
    /// Index of the table's first cell within a data row.
    pub offset: usize,
    /// Number of cells the table occupies.
    pub count: usize,
}

/// Iterator yielding joined output rows.
pub struct MergeJoin<G, D> {
    geo: G,
    data: D,
    summary_level: String,
    shape: OutputShape,
    slice: TableSlice,
    rows_consumed: usize,
}

impl<G, D> MergeJoin<G, D>
where
    G: Iterator<Item = Result<GeoRecord>>,
    D: Iterator<Item = Result<DataRow>>,
{
    pub fn new(
        geo: G,
        data: D,
        summary_level: impl Into<String>,
        shape: OutputShape,
        slice: TableSlice,
    ) -> Self {
        Self {
            geo,
            data,
            summary_level: summary_level.into(),
            shape,
            slice,
            rows_consumed: 0,
        }
    }

    /// Advance the data cursor until the row for `logrecno` appears.
    fn matching_row(&mut self, logrecno: &str) -> Result<DataRow> {
        loop {
            let row = match self.data.next() {
                None => {
                    return Err(Error::Alignment {
                        logrecno: logrecno.to_string(),
                    });
                }
                Some(Err(e)) => return Err(e),
                Some(Ok(row)) => row,
            };
            self.rows_consumed += 1;

            let cell = row.get(LOGRECNO_INDEX).ok_or_else(|| Error::DataDecode {
                line: self.rows_consumed,
                reason: format!("no logical record number at index {LOGRECNO_INDEX}"),
            })?;

            if cell == logrecno {
                return Ok(row);
            }
        }
    }

    fn emit(&self, geo: GeoRecord, row: DataRow) -> Result<JoinedRecord> {
        let end = self.slice.offset + self.slice.count;
        if row.len() < end {
            return Err(Error::DataDecode {
                line: self.rows_consumed,
                reason: format!(
                    "row has {} cells, table occupies {}..{}",
                    row.len(),
                    self.slice.offset,
                    end
                ),
            });
        }

        let mut cells = self.shape.geo_cells(&geo);
        cells.extend_from_slice(&row[self.slice.offset..end]);
        Ok(cells)
    }
}

impl<G, D> Iterator for MergeJoin<G, D>
where
    G: Iterator<Item = Result<GeoRecord>>,
    D: Iterator<Item = Result<DataRow>>,
{
    type Item = Result<JoinedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let geo = match self.geo.next()? {
                Ok(geo) => geo,
                Err(e) => return Some(Err(e)),
            };

            if geo.geocomp != WHOLE_COMPONENT || geo.sumlev != self.summary_level {
                continue;
            }

            let joined = self
                .matching_row(&geo.logrecno)
                .and_then(|row| self.emit(geo, row));
            return Some(joined);
        }
    }
}
