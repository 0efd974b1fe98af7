//! High-level public API for verifying distributions and generating
//! whitelists.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::ChecksumProvider;
use crate::GenerateReport;
use crate::ReconciliationResult;
use crate::Result;
use crate::TracingObserver;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::VerifyObserver;
use crate::error::IoResultExt;
use crate::formats::destination_dir;
use crate::formats::unpack_archive;
use crate::manifest::generate_manifest;
use crate::manifest::load_manifest;
use crate::manifest::write_manifest;
use crate::reconcile::reconcile;
use crate::walker::relative_path;

/// File name used for generated whitelist templates.
pub const DEFAULT_TEMPLATE_NAME: &str = "whitelist.tmpl.xml";

/// Verifies a distribution archive against a whitelist.
///
/// The archive is unpacked (see [`destination_dir`]), the whitelist is loaded
/// with `config.variables`, and the tree is reconciled. Events are logged
/// through [`TracingObserver`].
///
/// # Arguments
///
/// * `archive` - Path to the distribution archive
/// * `whitelist` - Path to the whitelist XML document
/// * `config` - Run configuration
///
/// # Errors
///
/// Returns an error if:
/// - The archive or whitelist does not exist
/// - The archive format is unsupported or the archive is corrupt
/// - The whitelist is malformed
/// - I/O operations fail
///
/// A distribution that does not match the whitelist is not an error; check
/// [`ReconciliationResult::is_valid`].
///
/// # Examples
///
/// ```no_run
/// use distverify_core::VerifyConfig;
/// use distverify_core::verify_distribution;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VerifyConfig::default().with_work_dir("target");
/// let result = verify_distribution("target/app.zip", "src/whitelist.xml", &config)?;
/// println!("{} paths checked, {} failures", result.len(), result.failure_count());
/// # Ok(())
/// # }
/// ```
pub fn verify_distribution<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    whitelist: Q,
    config: &VerifyConfig,
) -> Result<ReconciliationResult> {
    verify_distribution_with_observer(archive, whitelist, config, &mut TracingObserver)
}

/// Verifies a distribution archive, reporting events to `observer`.
///
/// # Errors
///
/// Same as [`verify_distribution`].
pub fn verify_distribution_with_observer<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    whitelist: Q,
    config: &VerifyConfig,
    observer: &mut dyn VerifyObserver,
) -> Result<ReconciliationResult> {
    let archive = archive.as_ref();
    let whitelist = whitelist.as_ref();

    if !archive.is_file() {
        return Err(VerifyError::ArchiveNotFound {
            path: archive.to_path_buf(),
        });
    }
    if !whitelist.is_file() {
        return Err(VerifyError::ManifestNotFound {
            path: whitelist.to_path_buf(),
        });
    }

    let destination = destination_dir(archive, config.work_dir.as_deref());
    info!(
        archive = %archive.display(),
        destination = %destination.display(),
        "unpacking distribution"
    );
    let unpacked = unpack_archive(archive, &destination, config.clean_destination)?;
    debug!(
        files = unpacked.files_unpacked,
        duration_ms = unpacked.duration.as_millis(),
        "unpack finished"
    );

    let entries = load_manifest(whitelist, &config.variables, observer)?;
    debug!(entries = entries.len(), whitelist = %whitelist.display(), "whitelist loaded");

    reconcile(&destination, &entries, &config.algorithm, observer)
}

/// Generates a whitelist template from a directory or an archive.
///
/// A directory `source` is walked directly; anything else is treated as an
/// archive and unpacked first. Every file is listed with a freshly computed
/// checksum; nothing is reconciled. When `output` lies inside a directory
/// `source`, a template left there by an earlier run is not listed.
///
/// # Errors
///
/// Returns an error if the source cannot be unpacked or walked, or the
/// output cannot be written.
///
/// # Examples
///
/// ```no_run
/// use distverify_core::VerifyConfig;
/// use distverify_core::generate_whitelist;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = generate_whitelist(
///     "target/app.zip",
///     "target/whitelist.tmpl.xml",
///     &VerifyConfig::default(),
/// )?;
/// println!("{} entries written", report.entries);
/// # Ok(())
/// # }
/// ```
pub fn generate_whitelist<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    output: Q,
    config: &VerifyConfig,
) -> Result<GenerateReport> {
    let source = source.as_ref();
    let output = output.as_ref();

    let source_root: PathBuf = if source.is_dir() {
        source.to_path_buf()
    } else {
        let destination = destination_dir(source, config.work_dir.as_deref());
        unpack_archive(source, &destination, config.clean_destination)?;
        destination
    };

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).at(parent)?;
    }

    let provider: &dyn ChecksumProvider = &config.algorithm;
    let mut entries = generate_manifest(&source_root, provider)?;
    if let Some(own_entry) = entry_path_below(&source_root, output) {
        debug!(path = %own_entry, "skipping the template itself");
        entries.retain(|entry| entry.path != own_entry);
    }

    let mut writer = BufWriter::new(File::create(output).at(output)?);
    write_manifest(&entries, provider.name(), &mut writer).at(output)?;
    writer.flush().at(output)?;

    info!(
        output = %output.display(),
        entries = entries.len(),
        "whitelist template generated"
    );

    Ok(GenerateReport {
        source_root,
        output: output.to_path_buf(),
        entries: entries.len(),
    })
}

/// Returns the whitelist path `file` would have below `root`, if it lies
/// inside it. The file itself need not exist, but its parent must.
fn entry_path_below(root: &Path, file: &Path) -> Option<String> {
    let root = root.canonicalize().ok()?;
    let parent = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let location = parent.canonicalize().ok()?.join(file.file_name()?);
    location
        .starts_with(&root)
        .then(|| relative_path(&root, &location))
}
