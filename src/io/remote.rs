use std::collections::HashMap;
use std::io::{self, Read, Seek, SeekFrom};

use tracing::trace;

use super::RangeFetch;
use crate::error::Result;

/// Block size used for the census archives.
///
/// A ZIP reader issues many small scattered reads (central directory at the
/// tail, local headers) interleaved with long sequential reads of the
/// compressed payload. 256 KB blocks keep the request count low for the
/// sequential phase without transferring too much for a directory-only
/// visit to the tail of a multi-hundred-megabyte archive.
pub const DEFAULT_BLOCK_SIZE: u64 = 256 * 1024;

/// How much fetch progress is reported on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing.
    Quiet,
    /// The resource length once, at open.
    Normal,
    /// The length at open plus a cumulative percentage per fetched block.
    Verbose,
}

/// A remote resource exposed as a seekable file.
///
/// Reads are served from fixed-size blocks fetched on demand through a
/// [`RangeFetch`] and memoized for the life of the value; a block is never
/// fetched twice and never evicted. One `RemoteFile` exclusively owns its
/// fetcher and block map, so no synchronization is involved.
pub struct RemoteFile<F: RangeFetch> {
    fetcher: F,
    length: u64,
    block_size: u64,
    position: u64,
    blocks: HashMap<u64, Vec<u8>>,
    label: String,
    progress: Progress,
}

impl<F: RangeFetch> RemoteFile<F> {
    /// Open the resource, resolving its total length with one probe
    /// request.
    pub fn open(mut fetcher: F, block_size: u64, progress: Progress) -> Result<Self> {
        let length = fetcher.probe_length()?;
        let label = basename(fetcher.resource()).to_string();

        if progress != Progress::Quiet {
            eprintln!("{} bytes in {}", length, label);
        }

        Ok(Self {
            fetcher,
            length,
            block_size,
            position: 0,
            blocks: HashMap::new(),
            label,
            progress,
        })
    }

    /// Total length of the resource in bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Current stream offset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes fetched into the block cache so far.
    pub fn transferred_bytes(&self) -> u64 {
        self.blocks.values().map(|b| b.len() as u64).sum()
    }

    /// Identity of the underlying resource.
    pub fn resource(&self) -> &str {
        self.fetcher.resource()
    }

    fn ensure_block(&mut self, index: u64) -> Result<()> {
        if self.blocks.contains_key(&index) {
            return Ok(());
        }

        let start = index * self.block_size;
        let end = (start + self.block_size).min(self.length) - 1;
        let block = self.fetcher.fetch_range(start, end)?;
        trace!(resource = %self.label, index, start, end, "fetched block");
        self.blocks.insert(index, block);

        if self.progress == Progress::Verbose {
            let fetched = self.blocks.len() as f64 * self.block_size as f64;
            let percent = (100.0 * fetched / self.length as f64).min(100.0);
            eprintln!("{:.1}% of {}", percent, self.label);
        }

        Ok(())
    }
}

impl<F: RangeFetch> Read for RemoteFile<F> {
    /// Fill `buf` from the current offset, crossing block boundaries as
    /// needed. A read starting at or past the end returns `Ok(0)`; a fetch
    /// failure midway returns the bytes copied so far and reports the
    /// error on the next call.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;

        while filled < buf.len() && self.position < self.length {
            let index = self.position / self.block_size;
            match self.ensure_block(index) {
                Ok(()) => {}
                // A failed fetch is never cached, so the next call hits
                // the same error with nothing copied yet.
                Err(_) if filled > 0 => return Ok(filled),
                Err(err) => return Err(io::Error::other(err)),
            }

            let block = &self.blocks[&index];
            let in_block = (self.position - index * self.block_size) as usize;
            let take = (buf.len() - filled).min(block.len() - in_block);

            buf[filled..filled + take].copy_from_slice(&block[in_block..in_block + take]);
            filled += take;
            self.position += take as u64;
        }

        Ok(filled)
    }
}

impl<F: RangeFetch> Seek for RemoteFile<F> {
    /// Move the stream offset. Seeking past the end is allowed and only
    /// surfaces on the next read; seeking before byte zero is rejected.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, delta) = match pos {
            SeekFrom::Start(offset) => {
                self.position = offset;
                return Ok(offset);
            }
            SeekFrom::Current(delta) => (self.position, delta),
            SeekFrom::End(delta) => (self.length, delta),
        };

        match base.checked_add_signed(delta) {
            Some(offset) => {
                self.position = offset;
                Ok(offset)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}

fn basename(resource: &str) -> &str {
    let path = resource.split(['?', '#']).next().unwrap_or(resource);
    path.rsplit('/').next().unwrap_or(path)
}
