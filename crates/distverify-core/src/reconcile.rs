//! Whitelist reconciliation engine.
//!
//! Reconciliation runs two independent passes over an unpacked tree:
//!
//! 1. [`check_manifest`] visits every whitelist entry in order and classifies
//!    it as `MATCH`, `CHECKSUM_MISMATCH` or `MISSING`.
//! 2. [`find_undeclared`] walks the tree and reports every file that no
//!    whitelist entry declares as `UNDECLARED`.
//!
//! Neither pass stops at the first failure, so one run yields a complete
//! diagnostic. Only I/O failures while walking or hashing abort the run.
//!
//! Symlinks that are dangling or point at a directory are never followed.
//! Undeclared ones are still reported, so a link cannot hide from the tree
//! pass.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::ChecksumProvider;
use crate::ManifestEntry;
use crate::OutcomeEntry;
use crate::ReconciliationResult;
use crate::Result;
use crate::VerifyObserver;
use crate::error::IoResultExt;
use crate::walker::normalize_path;
use crate::walker::walk_files;

/// Reconciles `entries` against the files below `root`.
///
/// Outcomes for whitelist entries come first in whitelist order, followed by
/// undeclared files in traversal order.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be read.
/// Verification failures are never errors; they are outcomes.
///
/// # Examples
///
/// ```no_run
/// use distverify_core::ChecksumAlgorithm;
/// use distverify_core::ManifestEntry;
/// use distverify_core::TracingObserver;
/// use distverify_core::reconcile;
/// use std::path::Path;
///
/// let entries = vec![ManifestEntry::new("/README.md", Some("4114b3e750902c5404ffe4864b3e11b8"))];
/// let result = reconcile(
///     Path::new("target/app.zip-unzipped"),
///     &entries,
///     &ChecksumAlgorithm::Md5,
///     &mut TracingObserver,
/// )?;
/// println!("valid: {}", result.is_valid());
/// # Ok::<(), distverify_core::VerifyError>(())
/// ```
pub fn reconcile(
    root: &Path,
    entries: &[ManifestEntry],
    provider: &dyn ChecksumProvider,
    observer: &mut dyn VerifyObserver,
) -> Result<ReconciliationResult> {
    let declared = check_manifest(root, entries, provider, observer)?;
    let undeclared = find_undeclared(root, entries, provider, observer)?;
    let result = ReconciliationResult::from_passes(declared, undeclared);
    observer.on_complete(&result);
    Ok(result)
}

/// Checks each whitelist entry against the tree, in whitelist order.
///
/// Exactly one outcome is produced per entry. Only regular files satisfy an
/// entry; a directory at the entry's path counts as missing. Entries without
/// a checksum only require the file to exist. Checksums are compared as exact,
/// case-sensitive strings.
///
/// # Errors
///
/// Returns an error if an existing file cannot be hashed.
pub fn check_manifest(
    root: &Path,
    entries: &[ManifestEntry],
    provider: &dyn ChecksumProvider,
    observer: &mut dyn VerifyObserver,
) -> Result<Vec<OutcomeEntry>> {
    let mut outcomes = Vec::with_capacity(entries.len());

    for entry in entries {
        let candidate = candidate_path(root, &entry.path);

        let outcome = if !candidate.is_file() {
            OutcomeEntry::missing(&entry.path, entry.checksum.clone())
        } else if let Some(expected) = entry.expected_checksum() {
            let actual = provider.digest(&candidate).at(&candidate)?;
            if actual == expected {
                OutcomeEntry::matched(&entry.path, Some(expected.to_string()))
            } else {
                OutcomeEntry::mismatch(&entry.path, expected.to_string(), &actual)
            }
        } else {
            OutcomeEntry::matched(&entry.path, entry.checksum.clone())
        };

        observer.on_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Reports every file below `root` that no whitelist entry declares.
///
/// Relative paths and whitelist paths are compared after
/// [`normalize_path`]; the comparison is case-sensitive. Declared files are
/// skipped here since [`check_manifest`] already reports them.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or an undeclared file cannot
/// be hashed.
pub fn find_undeclared(
    root: &Path,
    entries: &[ManifestEntry],
    provider: &dyn ChecksumProvider,
    observer: &mut dyn VerifyObserver,
) -> Result<Vec<OutcomeEntry>> {
    let declared: HashSet<String> = entries.iter().map(|e| normalize_path(&e.path)).collect();
    let mut outcomes = Vec::new();

    for file in walk_files(root) {
        let file = file?;
        if declared.contains(&normalize_path(&file.relative)) {
            continue;
        }

        let outcome = match &file.link_target {
            Some(target) => OutcomeEntry::undeclared_link(file.relative, target),
            None => {
                let actual = provider.digest(&file.path).at(&file.path)?;
                OutcomeEntry::undeclared(file.relative, actual)
            }
        };
        observer.on_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Resolves a whitelist path below `root`.
///
/// The path goes through [`normalize_path`] like the tree pass, so both
/// passes agree on which file an entry names. A leading separator does not
/// make it absolute. No containment check is made.
fn candidate_path(root: &Path, path: &str) -> PathBuf {
    root.join(normalize_path(path).trim_start_matches('/'))
}
