//! Error conversion utilities for CLI.
//!
//! Converts distverify-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use distverify_core::VerifyError;
use std::path::Path;

/// Converts `VerifyError` to user-friendly anyhow error with context
pub fn convert_verify_error(err: VerifyError, source: &Path) -> anyhow::Error {
    match err {
        VerifyError::ArchiveNotFound { path } => {
            anyhow!(
                "Distribution archive not found: {}\n\
                 HINT: Build the distribution first or check the ARCHIVE argument.",
                path.display()
            )
        }
        VerifyError::ManifestNotFound { path } => {
            anyhow!(
                "Whitelist not found: {}\n\
                 HINT: Run 'distverify generate' to create a whitelist template.",
                path.display()
            )
        }
        VerifyError::UnsupportedFormat { path } => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: zip, jar, war, ear, tar, tar.gz, tgz",
                path.display()
            )
        }
        VerifyError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or malformed.",
                source.display(),
                reason
            )
        }
        VerifyError::InvalidManifest { reason } => {
            anyhow!(
                "Invalid whitelist: {reason}\n\
                 HINT: Each <entry> inside <whitelist> needs a path attribute."
            )
        }
        VerifyError::Io { path, source: io_err } => anyhow::Error::new(io_err)
            .context(format!("I/O error on '{}'", path.display())),
        err if err.is_input_error() => anyhow!(
            "{err}\n\
             HINT: Run 'distverify --help' for the accepted values."
        ),
        _ => anyhow::Error::from(err).context(format!("Error processing '{}'", source.display())),
    }
}
