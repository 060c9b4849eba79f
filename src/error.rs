//! Error types for the census-tools library.
//!
//! Every failure in the pipeline is fatal and propagates to the caller as a
//! typed variant; nothing here is retried or recovered locally. Variants
//! carry the resource identity and byte range (or line number) needed to
//! diagnose a failed run.

use std::io;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for census-tools operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client itself could not be constructed.
    #[error("HTTP client construction failed")]
    Client(#[source] reqwest::Error),

    /// A byte-range request failed at the transport level.
    #[error("range request failed for {url} (bytes {start}-{end})")]
    Fetch {
        url: String,
        start: u64,
        end: u64,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered a range request with something other than
    /// partial content, so range support cannot be relied on.
    #[error("unexpected HTTP status {status} for {url} (requested bytes {start}-{end})")]
    RangeStatus {
        url: String,
        status: reqwest::StatusCode,
        start: u64,
        end: u64,
    },

    /// The length probe could not establish the total resource size.
    #[error("length probe failed for {url}: {reason}")]
    Probe { url: String, reason: String },

    /// The response body did not cover the requested range.
    #[error("truncated response for {url}: requested bytes {start}-{end}, got {got} bytes")]
    Truncated {
        url: String,
        start: u64,
        end: u64,
        got: usize,
    },

    /// An archive did not contain exactly one member.
    #[error("expected exactly one member in {resource}, found {count}: {names:?}")]
    ArchiveShape {
        resource: String,
        count: usize,
        names: Vec<String>,
    },

    /// The ZIP container could not be opened or read.
    #[error("archive error in {resource}")]
    Archive {
        resource: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// A fixed-width geography record could not be decoded.
    #[error("geography record {line} could not be decoded: {reason}")]
    GeoDecode { line: usize, reason: String },

    /// A delimited data row was malformed.
    #[error("data row {line} could not be decoded: {reason}")]
    DataDecode { line: usize, reason: String },

    /// A logical record number from the geography stream never appeared in
    /// the remaining data stream. The two archives are published as a
    /// matched pair, so this means mismatched or corrupted inputs.
    #[error("logical record {logrecno} missing from the data sequence")]
    Alignment { logrecno: String },

    /// The packing index does not list the requested table.
    #[error("unknown table {0:?}")]
    UnknownTable(String),

    /// The packing index could not be fetched.
    #[error("failed to fetch packing index from {url}")]
    IndexFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The packing index is missing a column or holds a non-numeric count.
    #[error("packing index at {url} is malformed: {reason}")]
    IndexFormat { url: String, reason: String },

    /// A table identifier that does not follow the matrix naming pattern.
    #[error("table identifier {0:?} does not match the matrix naming pattern")]
    MalformedTable(String),

    /// An unrecognized summary level name or code.
    #[error("unknown summary level {0:?}")]
    UnknownSummaryLevel(String),

    /// An unrecognized state name.
    #[error("unknown state {0:?}")]
    UnknownState(String),

    /// A tabular row could not be converted to a GeoJSON feature.
    #[error("cannot convert row {line} to GeoJSON: {reason}")]
    GeoJson { line: usize, reason: String },

    /// Regular-expression compilation failure.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error (local files, stdout, or a wrapped stream failure).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_shape_names_members() {
        let err = Error::ArchiveShape {
            resource: "https://example.com/degeo_uf1.zip".to_string(),
            count: 2,
            names: vec!["degeo.uf1".to_string(), "extra.txt".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("exactly one member"));
        assert!(msg.contains("found 2"));
        assert!(msg.contains("degeo.uf1"));
    }

    #[test]
    fn alignment_names_logical_record() {
        let err = Error::Alignment {
            logrecno: "0000042".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "logical record 0000042 missing from the data sequence"
        );
    }

    #[test]
    fn truncated_reports_requested_range() {
        let err = Error::Truncated {
            url: "https://example.com/us00001_uf1.zip".to_string(),
            start: 1024,
            end: 2047,
            got: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("bytes 1024-2047"));
        assert!(msg.contains("got 100 bytes"));
    }

    #[test]
    fn decode_errors_carry_line_numbers() {
        let geo = Error::GeoDecode {
            line: 17,
            reason: "record too short: 12 bytes".to_string(),
        };
        assert!(geo.to_string().contains("record 17"));

        let data = Error::DataDecode {
            line: 3,
            reason: "no cell at index 4".to_string(),
        };
        assert!(data.to_string().contains("row 3"));
    }

    #[test]
    fn io_errors_convert() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
