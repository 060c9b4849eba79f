mod http;
mod remote;

pub use http::HttpRangeFetcher;
pub use remote::{Progress, RemoteFile, DEFAULT_BLOCK_SIZE};

use crate::error::Result;

/// Trait for fetching byte ranges from a data source.
pub trait RangeFetch {
    /// Resolve the total size of the resource in bytes.
    fn probe_length(&mut self) -> Result<u64>;

    /// Fetch the inclusive byte range `start..=end`.
    fn fetch_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>>;

    /// Identity of the underlying resource, for progress and error reporting.
    fn resource(&self) -> &str;
}
