//! Stream tabular data out of the US Census 2000 Summary File 1 archives
//! without downloading them.
//!
//! The bureau publishes SF1 as per-state ZIP archives of fixed-width
//! geography files and comma-separated data files. This crate reads both
//! directly over HTTP range requests, caching 256 KiB blocks as the ZIP
//! reader seeks, and merge-joins geography to data on the logical record
//! number, so pulling one table for a whole state costs a few hundred KiB
//! of transfer instead of tens of megabytes.
//!
//! ## Features
//!
//! - Range-probed remote files with block caching ([`RemoteFile`])
//! - Single-member ZIP streaming ([`RemoteArchive`])
//! - Fixed-width geography decoding, including the sign-magnitude
//!   coordinate format ([`GeoRecord`])
//! - Forward-only merge join with selectable output shape ([`MergeJoin`])
//! - SF1 packing-index lookup to find a table's file and columns
//!   ([`lookup::locate_table`])
//! - GeoJSON conversion for joined rows ([`geojson`])
//!
//! ## Example
//!
//! ```no_run
//! use census_tools::{
//!     open_remote_archive, DataRows, GeoRecords, MergeJoin, OutputShape, Progress, TableSlice,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let base = "https://www2.census.gov/census_2000/datasets/Summary_File_1";
//!     let mut geo = open_remote_archive(&format!("{base}/Delaware/degeo_uf1.zip"), Progress::Quiet)?;
//!     let mut data = open_remote_archive(&format!("{base}/Delaware/de00001_uf1.zip"), Progress::Quiet)?;
//!
//!     let join = MergeJoin::new(
//!         GeoRecords::new(geo.sole_member()?),
//!         DataRows::new(data.sole_member()?),
//!         "050",
//!         OutputShape::Narrow,
//!         TableSlice { offset: 5, count: 1 },
//!     );
//!     for row in join {
//!         println!("{}", row?.join("\t"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod data;
pub mod error;
pub mod geo;
pub mod geojson;
pub mod io;
pub mod join;
pub mod lookup;
pub mod output;

pub use archive::{open_remote_archive, RemoteArchive};
pub use cli::Cli;
pub use data::{DataRow, DataRows, LOGRECNO_INDEX};
pub use error::{Error, Result};
pub use geo::{GeoRecord, GeoRecords};
pub use io::{HttpRangeFetcher, Progress, RangeFetch, RemoteFile, DEFAULT_BLOCK_SIZE};
pub use join::{JoinedRecord, MergeJoin, OutputShape, TableSlice};
pub use lookup::TableLocation;
