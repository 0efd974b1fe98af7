//! Archive format implementations.
//!
//! A distribution is unpacked into `<work dir>/<archive file name>-unzipped`
//! before reconciliation. Without a work dir the destination sits next to
//! the archive.

pub mod detect;
pub mod tar;
pub mod traits;
pub mod zip;

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::Result;
use crate::UnpackReport;
use crate::VerifyError;
use crate::error::IoResultExt;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use detect::detect_format;
pub use tar::TarArchive;
pub use traits::ArchiveFormat;
pub use zip::ZipArchive;

/// Suffix appended to the archive file name to form the unpack directory.
pub const UNPACK_SUFFIX: &str = "-unzipped";

/// Computes the directory an archive is unpacked into.
///
/// # Examples
///
/// ```
/// use distverify_core::formats::destination_dir;
/// use std::path::Path;
///
/// let dest = destination_dir(Path::new("dist/app-1.0.zip"), Some(Path::new("target")));
/// assert_eq!(dest, Path::new("target/app-1.0.zip-unzipped"));
///
/// let dest = destination_dir(Path::new("dist/app-1.0.zip"), None);
/// assert_eq!(dest, Path::new("dist/app-1.0.zip-unzipped"));
/// ```
#[must_use]
pub fn destination_dir(archive: &Path, work_dir: Option<&Path>) -> PathBuf {
    let name = archive
        .file_name()
        .map_or_else(|| "archive".to_string(), |n| n.to_string_lossy().into_owned());
    let base = work_dir
        .or_else(|| archive.parent())
        .unwrap_or_else(|| Path::new(""));
    base.join(format!("{name}{UNPACK_SUFFIX}"))
}

/// Unpacks `archive` into `destination`.
///
/// When `clean` is set an existing destination is removed first, so files
/// from an earlier run cannot leak into the tree.
///
/// # Errors
///
/// Returns an error if the archive does not exist, its format is
/// unsupported, it is corrupt, or the destination cannot be written.
pub fn unpack_archive(archive: &Path, destination: &Path, clean: bool) -> Result<UnpackReport> {
    if !archive.is_file() {
        return Err(VerifyError::ArchiveNotFound {
            path: archive.to_path_buf(),
        });
    }
    let format = detect_format(archive)?;

    if clean && destination.exists() {
        debug!(path = %destination.display(), "removing previous unpack directory");
        fs::remove_dir_all(destination).at(destination)?;
    }
    fs::create_dir_all(destination).at(destination)?;

    let start = Instant::now();
    let file = BufReader::new(File::open(archive).at(archive)?);
    let mut handler: Box<dyn ArchiveFormat> = match format {
        ArchiveType::Zip => Box::new(ZipArchive::new(file)?),
        ArchiveType::Tar => Box::new(TarArchive::new(file)),
        ArchiveType::TarGz => Box::new(TarArchive::new(GzDecoder::new(file))),
    };

    let mut report = handler.unpack(destination)?;
    report.duration = start.elapsed();

    debug!(
        archive = %archive.display(),
        format = handler.format_name(),
        files = report.files_unpacked,
        bytes = report.bytes_written,
        "archive unpacked"
    );

    Ok(report)
}
