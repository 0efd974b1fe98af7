//! Common trait for archive format handlers.

use std::path::Path;

use crate::Result;
use crate::UnpackReport;

/// Trait for archive format handlers.
pub trait ArchiveFormat {
    /// Unpacks every entry of the archive below `destination`.
    ///
    /// The destination directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is corrupt, an entry escapes the
    /// destination, or writing fails.
    fn unpack(&mut self, destination: &Path) -> Result<UnpackReport>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}
