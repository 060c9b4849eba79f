use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

use super::RangeFetch;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("census-tools/", env!("CARGO_PKG_VERSION"));

/// HTTP Range fetcher for remote archives.
///
/// Performs one request-response exchange per call and never retries; a
/// transport or protocol failure is surfaced to the caller unchanged.
pub struct HttpRangeFetcher {
    client: Client,
    url: String,
}

impl HttpRangeFetcher {
    /// Create a fetcher for `url`. No request is issued until the first
    /// probe or range fetch.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn range_get(&self, start: u64, end: u64) -> Result<reqwest::blocking::Response> {
        self.client
            .get(&self.url)
            .header("Range", format!("bytes={}-{}", start, end))
            .send()
            .map_err(|source| Error::Fetch {
                url: self.url.clone(),
                start,
                end,
                source,
            })
    }
}

impl RangeFetch for HttpRangeFetcher {
    /// Resolve the total resource size by requesting the first byte and
    /// reading the total out of the `Content-Range` header.
    ///
    /// A server that does not answer with partial content cannot serve the
    /// scattered reads this crate depends on, so anything other than a 206
    /// with a well-formed total is an error here.
    fn probe_length(&mut self) -> Result<u64> {
        let resp = self.range_get(0, 0)?;
        let status = resp.status();

        if status != StatusCode::PARTIAL_CONTENT {
            return Err(Error::Probe {
                url: self.url.clone(),
                reason: format!("no partial-content support (status {})", status),
            });
        }

        let content_range = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::Probe {
                url: self.url.clone(),
                reason: "response carried no Content-Range header".to_string(),
            })?;

        // Content-Range: bytes 0-0/57226000
        let length = content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<u64>().ok())
            .ok_or_else(|| Error::Probe {
                url: self.url.clone(),
                reason: format!("unparseable Content-Range {:?}", content_range),
            })?;

        debug!(url = %self.url, length, "probed resource length");
        Ok(length)
    }

    fn fetch_range(&mut self, start: u64, end: u64) -> Result<Vec<u8>> {
        let resp = self.range_get(start, end)?;
        let status = resp.status();

        if status != StatusCode::PARTIAL_CONTENT {
            return Err(Error::RangeStatus {
                url: self.url.clone(),
                status,
                start,
                end,
            });
        }

        let bytes = resp.bytes().map_err(|source| Error::Fetch {
            url: self.url.clone(),
            start,
            end,
            source,
        })?;

        let expected = (end - start + 1) as usize;
        if bytes.len() != expected {
            return Err(Error::Truncated {
                url: self.url.clone(),
                start,
                end,
                got: bytes.len(),
            });
        }

        debug!(url = %self.url, start, end, "fetched range");
        Ok(bytes.to_vec())
    }

    fn resource(&self) -> &str {
        &self.url
    }
}
