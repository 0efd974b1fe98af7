//! ZIP archive format handler.

use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use crate::Result;
use crate::UnpackReport;
use crate::VerifyError;
use crate::error::IoResultExt;

use super::traits::ArchiveFormat;

/// ZIP archive handler, also used for `jar`, `war` and `ear` files.
pub struct ZipArchive<R: Read + Seek> {
    inner: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Opens a ZIP archive from a seekable reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the central directory cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        let inner = zip::ZipArchive::new(reader)
            .map_err(|e| VerifyError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;
        Ok(Self { inner })
    }
}

impl<R: Read + Seek> ArchiveFormat for ZipArchive<R> {
    fn unpack(&mut self, destination: &Path) -> Result<UnpackReport> {
        let mut report = UnpackReport::new(destination);

        for i in 0..self.inner.len() {
            let mut entry = self.inner.by_index(i).map_err(|e| {
                VerifyError::InvalidArchive(format!("failed to read ZIP entry: {e}"))
            })?;

            let relative = entry.enclosed_name().ok_or_else(|| {
                VerifyError::InvalidArchive(format!(
                    "entry escapes the destination directory: {}",
                    entry.name()
                ))
            })?;
            let target = destination.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).at(&target)?;
                report.directories_created += 1;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }
            let mut file = File::create(&target).at(&target)?;
            report.bytes_written += io::copy(&mut entry, &mut file).at(&target)?;
            report.files_unpacked += 1;
        }

        Ok(report)
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}
