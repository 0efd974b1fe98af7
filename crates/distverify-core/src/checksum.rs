//! Content checksums for whitelist entries.
//!
//! Checksums are lowercase hex digests of a file's full byte content. MD5 is
//! the default since existing whitelists carry `md5` attributes.

use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::Digest;
use sha2::Sha256;

use crate::VerifyError;

/// Read buffer size used while hashing files.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Computes the content digest of a file.
///
/// The reconciliation engine only depends on this trait, so tests and callers
/// can plug in any digest.
pub trait ChecksumProvider {
    /// Returns the hex-encoded digest of the file's full content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn digest(&self, path: &Path) -> io::Result<String>;

    /// Short algorithm name, also used as the whitelist attribute name.
    fn name(&self) -> &str;
}

/// Built-in checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumAlgorithm {
    /// MD5, the digest used by existing whitelists.
    #[default]
    Md5,
    /// SHA-256.
    Sha256,
}

impl ChecksumAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 2] = [Self::Md5, Self::Sha256];

    /// Returns the algorithm name (`md5` or `sha256`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
        }
    }

    /// Computes the digest of an in-memory buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use distverify_core::ChecksumAlgorithm;
    ///
    /// assert_eq!(
    ///     ChecksumAlgorithm::Md5.digest_bytes(b""),
    ///     "d41d8cd98f00b204e9800998ecf8427e"
    /// );
    /// ```
    #[must_use]
    pub fn digest_bytes(self, data: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(data)),
            Self::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }

    /// Computes the digest of everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn digest_reader<R: Read>(self, reader: R) -> io::Result<String> {
        match self {
            Self::Md5 => hash_reader::<Md5, R>(reader),
            Self::Sha256 => hash_reader::<Sha256, R>(reader),
        }
    }
}

fn hash_reader<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

impl ChecksumProvider for ChecksumAlgorithm {
    fn digest(&self, path: &Path) -> io::Result<String> {
        let file = File::open(path)?;
        self.digest_reader(file)
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(VerifyError::UnknownAlgorithm { name: s.to_string() }),
        }
    }
}
