//! TAR archive format handler.

use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::UnpackReport;
use crate::VerifyError;
use crate::error::IoResultExt;

use super::traits::ArchiveFormat;

/// TAR archive handler over any reader, compressed or not.
pub struct TarArchive<R: Read> {
    inner: tar::Archive<R>,
}

impl<R: Read> TarArchive<R> {
    /// Wraps a reader that yields raw tar data.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            inner: tar::Archive::new(reader),
        }
    }
}

impl<R: Read> ArchiveFormat for TarArchive<R> {
    fn unpack(&mut self, destination: &Path) -> Result<UnpackReport> {
        let mut report = UnpackReport::new(destination);

        let entries = self
            .inner
            .entries()
            .map_err(|e| VerifyError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| {
                VerifyError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;
            let entry_type = entry.header().entry_type();
            let size = entry.size();

            // Entries that would land outside the destination are skipped.
            if !entry.unpack_in(destination).at(destination)? {
                continue;
            }

            if entry_type.is_dir() {
                report.directories_created += 1;
            } else if entry_type.is_file() {
                report.files_unpacked += 1;
                report.bytes_written += size;
            }
        }

        Ok(report)
    }

    fn format_name(&self) -> &str {
        "tar"
    }
}
