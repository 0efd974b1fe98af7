//! Error types for distribution verification.
//!
//! Only setup-phase failures are errors. A file that is missing, mismatched
//! or undeclared is recorded as an [`OutcomeEntry`](crate::OutcomeEntry) and
//! never surfaces here.

use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `VerifyError`.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors that abort a verification or generation run.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// I/O operation on a specific path failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The distribution archive does not exist.
    #[error("distribution archive not found: {path}")]
    ArchiveNotFound {
        /// The archive path that was requested.
        path: PathBuf,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format: {path}")]
    UnsupportedFormat {
        /// The archive path whose format could not be determined.
        path: PathBuf,
    },

    /// Archive is corrupted or contains an entry that cannot be unpacked.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The whitelist document does not exist.
    #[error("whitelist not found: {path}")]
    ManifestNotFound {
        /// The whitelist path that was requested.
        path: PathBuf,
    },

    /// The whitelist document could not be parsed.
    #[error("invalid whitelist: {reason}")]
    InvalidManifest {
        /// What was wrong with the document.
        reason: String,
    },

    /// Report format name is not one of the supported sinks.
    #[error("report type [{name}] is not a valid report type, use [xml] or [junit]")]
    UnknownReportFormat {
        /// The rejected name.
        name: String,
    },

    /// Checksum algorithm name is not supported.
    #[error("unknown checksum algorithm [{name}], use [md5] or [sha256]")]
    UnknownAlgorithm {
        /// The rejected name.
        name: String,
    },

    /// Directory traversal of the unpacked tree failed.
    #[error("cannot walk {path}: {reason}")]
    Walk {
        /// The path being visited when the walk failed.
        path: PathBuf,
        /// Underlying walk error.
        reason: String,
    },
}

impl VerifyError {
    /// Returns `true` if this error stems from missing or malformed inputs
    /// rather than a failing filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use distverify_core::VerifyError;
    /// use std::path::PathBuf;
    ///
    /// let err = VerifyError::ManifestNotFound {
    ///     path: PathBuf::from("whitelist.xml"),
    /// };
    /// assert!(err.is_input_error());
    ///
    /// let err = VerifyError::Io {
    ///     path: PathBuf::from("report.xml"),
    ///     source: std::io::Error::other("disk full"),
    /// };
    /// assert!(!err.is_input_error());
    /// ```
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ArchiveNotFound { .. }
                | Self::UnsupportedFormat { .. }
                | Self::InvalidArchive(_)
                | Self::ManifestNotFound { .. }
                | Self::InvalidManifest { .. }
                | Self::UnknownReportFormat { .. }
                | Self::UnknownAlgorithm { .. }
        )
    }
}

/// Attaches the accessed path to I/O errors.
pub(crate) trait IoResultExt<T> {
    /// Maps the error into [`VerifyError::Io`] for `path`.
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| VerifyError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
