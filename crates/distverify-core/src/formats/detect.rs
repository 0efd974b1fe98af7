//! Archive format detection.

use std::path::Path;

use crate::Result;
use crate::VerifyError;

/// Supported distribution archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// ZIP archive, including Java containers (`jar`, `war`, `ear`).
    Zip,
}

impl ArchiveType {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// Detects the archive type from a file path.
///
/// Detection is by extension only and ignores case.
///
/// # Errors
///
/// Returns [`VerifyError::UnsupportedFormat`] if the extension is unknown.
///
/// # Examples
///
/// ```
/// use distverify_core::formats::detect::ArchiveType;
/// use distverify_core::formats::detect::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("app.war"))?, ArchiveType::Zip);
/// assert_eq!(detect_format(Path::new("app-1.0.tar.gz"))?, ArchiveType::TarGz);
/// # Ok::<(), distverify_core::VerifyError>(())
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    let unsupported = || VerifyError::UnsupportedFormat {
        path: path.to_path_buf(),
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(unsupported)?;

    match extension.to_ascii_lowercase().as_str() {
        "zip" | "jar" | "war" | "ear" => Ok(ArchiveType::Zip),
        "tar" => Ok(ArchiveType::Tar),
        "tgz" => Ok(ArchiveType::TarGz),
        "gz" => {
            let is_tar = path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().to_ascii_lowercase().ends_with(".tar"));
            if is_tar {
                Ok(ArchiveType::TarGz)
            } else {
                Err(unsupported())
            }
        }
        _ => Err(unsupported()),
    }
}
