//! Verification run configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::checksum::ChecksumAlgorithm;

/// Variables available to `${name}` placeholders in whitelist paths.
///
/// Ordered so that logs and reports listing them are stable between runs.
pub type Variables = BTreeMap<String, String>;

/// Configuration for a verification or generation run.
///
/// # Examples
///
/// ```
/// use distverify_core::ChecksumAlgorithm;
/// use distverify_core::VerifyConfig;
///
/// // Defaults: unpack next to the archive, MD5 checksums, no variables
/// let config = VerifyConfig::default();
/// assert_eq!(config.algorithm, ChecksumAlgorithm::Md5);
///
/// let custom = VerifyConfig::default()
///     .with_work_dir("target")
///     .with_algorithm(ChecksumAlgorithm::Sha256)
///     .with_variable("project.artifactId", "app");
/// assert_eq!(custom.variables.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Directory in which the archive is unpacked.
    ///
    /// `None` unpacks into a sibling directory of the archive.
    pub work_dir: Option<PathBuf>,

    /// Digest used for whitelist checksums.
    pub algorithm: ChecksumAlgorithm,

    /// Values substituted into `${name}` placeholders of whitelist paths.
    pub variables: Variables,

    /// Remove a previously unpacked tree before extracting again.
    ///
    /// Leftover files from an earlier run would otherwise show up as
    /// undeclared.
    pub clean_destination: bool,
}

impl Default for VerifyConfig {
    /// Default values:
    /// - `work_dir`: `None` (next to the archive)
    /// - `algorithm`: MD5
    /// - `variables`: empty
    /// - `clean_destination`: true
    fn default() -> Self {
        Self {
            work_dir: None,
            algorithm: ChecksumAlgorithm::default(),
            variables: Variables::new(),
            clean_destination: true,
        }
    }
}

impl VerifyConfig {
    /// Sets the directory used for unpacking.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Sets the checksum algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Adds or replaces a single path variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replaces all path variables.
    #[must_use]
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Controls whether a stale unpack directory is removed first.
    #[must_use]
    pub fn with_clean_destination(mut self, clean: bool) -> Self {
        self.clean_destination = clean;
        self
    }
}
