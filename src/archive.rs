//! Remote ZIP archives holding exactly one member.
//!
//! Each census release packages one geography or data file per archive, so
//! anything other than a single member means the wrong resource was
//! addressed. Container parsing and inflation are delegated to the `zip`
//! crate, which drives the block-cached stream through `Read + Seek`.

use std::io::{Read, Seek};

use tracing::debug;
use zip::ZipArchive;
use zip::read::ZipFile;

use crate::error::{Error, Result};
use crate::io::{DEFAULT_BLOCK_SIZE, HttpRangeFetcher, Progress, RemoteFile};

/// A ZIP archive constrained to the one-member shape of census releases.
pub struct RemoteArchive<R: Read + Seek> {
    archive: ZipArchive<R>,
    resource: String,
}

impl<R: Read + Seek> RemoteArchive<R> {
    /// Read the archive's central directory from `reader`.
    pub fn open(reader: R, resource: impl Into<String>) -> Result<Self> {
        let resource = resource.into();
        let archive = ZipArchive::new(reader).map_err(|source| Error::Archive {
            resource: resource.clone(),
            source,
        })?;

        Ok(Self { archive, resource })
    }

    /// The sole member of the archive as a sequential decompressed stream.
    ///
    /// Fails with [`Error::ArchiveShape`] when the archive holds zero or
    /// more than one member. The returned stream is forward-only; bytes
    /// are inflated on demand as it is read.
    pub fn sole_member(&mut self) -> Result<ZipFile<'_>> {
        let count = self.archive.len();
        if count != 1 {
            let names = self.archive.file_names().map(String::from).collect();
            return Err(Error::ArchiveShape {
                resource: self.resource.clone(),
                count,
                names,
            });
        }

        let member = self
            .archive
            .by_index(0)
            .map_err(|source| Error::Archive {
                resource: self.resource.clone(),
                source,
            })?;

        debug!(
            resource = %self.resource,
            member = member.name(),
            size = member.size(),
            "opened sole archive member"
        );
        Ok(member)
    }

    /// Consume the archive and hand back the underlying reader.
    pub fn into_reader(self) -> R {
        self.archive.into_inner()
    }
}

/// Open a remote archive end to end: range fetcher, block-cached stream,
/// then the ZIP directory read off the tail of the resource.
pub fn open_remote_archive(
    url: &str,
    progress: Progress,
) -> Result<RemoteArchive<RemoteFile<HttpRangeFetcher>>> {
    let fetcher = HttpRangeFetcher::new(url)?;
    let file = RemoteFile::open(fetcher, DEFAULT_BLOCK_SIZE, progress)?;
    RemoteArchive::open(file, url)
}
