//! Per-path verification outcomes.

use std::fmt;
use std::path::Path;

/// Detail message for a file that matched its whitelist entry.
pub const DETAIL_MATCH: &str = "Validation passed successfully";
/// Detail message for a declared file that is absent.
pub const DETAIL_MISSING: &str = "Defined file not found";
/// Detail message prefix for a checksum mismatch; the actual digest follows.
pub const DETAIL_MISMATCH: &str = "File found but with a different checksum";
/// Detail message for a file that the whitelist does not declare.
pub const DETAIL_UNDECLARED: &str = "File is not defined in whitelist";

/// Classification of a single checked path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    /// File exists and its checksum (if declared) matches.
    Match,
    /// File exists but its digest differs from the declared checksum.
    ChecksumMismatch,
    /// Declared file does not exist in the unpacked tree.
    Missing,
    /// File exists but is not declared in the whitelist.
    Undeclared,
}

impl OutcomeStatus {
    /// All statuses in report order.
    pub const ALL: [Self; 4] = [
        Self::Match,
        Self::ChecksumMismatch,
        Self::Missing,
        Self::Undeclared,
    ];

    /// Returns the status name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::ChecksumMismatch => "CHECKSUM_MISMATCH",
            Self::Missing => "MISSING",
            Self::Undeclared => "UNDECLARED",
        }
    }

    /// Returns `true` for every status except [`OutcomeStatus::Match`].
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, Self::Match)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one declared or discovered path.
///
/// For declared paths `checksum` is the expected checksum from the whitelist
/// (if any); for undeclared files it is the digest computed from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEntry {
    /// Whitelist path, or the `/`-prefixed relative path of a discovered file.
    pub path: String,
    /// Expected checksum, or the actual one for undeclared files.
    pub checksum: Option<String>,
    /// Classification.
    pub status: OutcomeStatus,
    /// Human-readable explanation.
    pub detail: String,
}

impl OutcomeEntry {
    /// Declared file present with a matching (or no) checksum.
    #[must_use]
    pub fn matched(path: impl Into<String>, checksum: Option<String>) -> Self {
        Self {
            path: path.into(),
            checksum,
            status: OutcomeStatus::Match,
            detail: DETAIL_MATCH.to_string(),
        }
    }

    /// Declared file absent from the tree.
    #[must_use]
    pub fn missing(path: impl Into<String>, checksum: Option<String>) -> Self {
        Self {
            path: path.into(),
            checksum,
            status: OutcomeStatus::Missing,
            detail: DETAIL_MISSING.to_string(),
        }
    }

    /// Declared file present with a different digest.
    ///
    /// The detail message carries the actual digest.
    #[must_use]
    pub fn mismatch(path: impl Into<String>, expected: String, actual: &str) -> Self {
        Self {
            path: path.into(),
            checksum: Some(expected),
            status: OutcomeStatus::ChecksumMismatch,
            detail: format!("{DETAIL_MISMATCH} {actual}"),
        }
    }

    /// File present in the tree but absent from the whitelist.
    #[must_use]
    pub fn undeclared(path: impl Into<String>, actual: String) -> Self {
        Self {
            path: path.into(),
            checksum: Some(actual),
            status: OutcomeStatus::Undeclared,
            detail: DETAIL_UNDECLARED.to_string(),
        }
    }

    /// Symlink present in the tree but absent from the whitelist.
    ///
    /// The link is dangling or points at a directory, so there is no content
    /// to hash; the detail names the target instead.
    #[must_use]
    pub fn undeclared_link(path: impl Into<String>, target: &Path) -> Self {
        Self {
            path: path.into(),
            checksum: None,
            status: OutcomeStatus::Undeclared,
            detail: format!("{DETAIL_UNDECLARED} (symbolic link to {})", target.display()),
        }
    }

    /// Returns `true` if this outcome makes the run invalid.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    /// Checksum or empty string, for sinks that always print the attribute.
    #[must_use]
    pub fn checksum_or_empty(&self) -> &str {
        self.checksum.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        let names: Vec<&str> = OutcomeStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["MATCH", "CHECKSUM_MISMATCH", "MISSING", "UNDECLARED"]
        );
    }

    #[test]
    fn test_only_match_is_success() {
        assert!(!OutcomeStatus::Match.is_failure());
        assert!(OutcomeStatus::ChecksumMismatch.is_failure());
        assert!(OutcomeStatus::Missing.is_failure());
        assert!(OutcomeStatus::Undeclared.is_failure());
    }

    #[test]
    fn test_mismatch_detail_contains_actual() {
        let outcome = OutcomeEntry::mismatch("/c.txt", "Y".into(), "Z");
        assert_eq!(outcome.status, OutcomeStatus::ChecksumMismatch);
        assert_eq!(outcome.checksum.as_deref(), Some("Y"));
        assert_eq!(outcome.detail, "File found but with a different checksum Z");
    }

    #[test]
    fn test_missing_keeps_expected_checksum() {
        let outcome = OutcomeEntry::missing("/b.txt", Some("X".into()));
        assert_eq!(outcome.detail, DETAIL_MISSING);
        assert_eq!(outcome.checksum_or_empty(), "X");
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_undeclared_link_names_target() {
        let outcome = OutcomeEntry::undeclared_link("/lib/current", Path::new("../v2"));
        assert_eq!(outcome.status, OutcomeStatus::Undeclared);
        assert_eq!(outcome.checksum_or_empty(), "");
        assert_eq!(
            outcome.detail,
            "File is not defined in whitelist (symbolic link to ../v2)"
        );
    }

    #[test]
    fn test_presence_only_match_has_no_checksum() {
        let outcome = OutcomeEntry::matched("/a.txt", None);
        assert_eq!(outcome.checksum_or_empty(), "");
        assert!(!outcome.is_failure());
    }
}
