//! Whitelist documents.
//!
//! A whitelist lists the files a distribution must contain:
//!
//! ```xml
//! <whitelist>
//!   <entry path="/README.md" md5="4114b3e750902c5404ffe4864b3e11b8"/>
//!   <entry path="/lib/app-${project.version}.jar"/>
//! </whitelist>
//! ```
//!
//! Only `entry` elements directly inside a `whitelist` element are read. The
//! checksum comes from the `checksum`, `md5` or `sha256` attribute, in that
//! order; without one the entry is only checked for presence.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::warn;

use crate::ChecksumProvider;
use crate::Result;
use crate::Variables;
use crate::VerifyError;
use crate::VerifyObserver;
use crate::error::IoResultExt;
use crate::resolve::resolve;
use crate::sink::finish_document;
use crate::sink::start_document;
use crate::walker::walk_files;

const ROOT_ELEMENT: &[u8] = b"whitelist";
const ENTRY_ELEMENT: &[u8] = b"entry";
const PATH_ATTRIBUTE: &[u8] = b"path";
const CHECKSUM_ATTRIBUTES: [&[u8]; 3] = [b"checksum", b"md5", b"sha256"];

/// One expected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Root-relative path with `/` separators, placeholders already resolved.
    pub path: String,

    /// Expected checksum; `None` or empty means presence-only.
    pub checksum: Option<String>,
}

impl ManifestEntry {
    /// Creates an entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use distverify_core::ManifestEntry;
    ///
    /// let entry = ManifestEntry::new("/README.md", None::<String>);
    /// assert!(entry.expected_checksum().is_none());
    /// ```
    #[must_use]
    pub fn new(path: impl Into<String>, checksum: Option<impl Into<String>>) -> Self {
        Self {
            path: path.into(),
            checksum: checksum.map(Into::into),
        }
    }

    /// Returns the checksum to compare against, treating empty as absent.
    #[must_use]
    pub fn expected_checksum(&self) -> Option<&str> {
        self.checksum.as_deref().filter(|c| !c.is_empty())
    }
}

/// Loads a whitelist file and resolves its paths against `variables`.
///
/// Unresolved placeholders are reported to `observer` and left in the path.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read or is not a
/// valid whitelist.
pub fn load_manifest(
    path: &Path,
    variables: &Variables,
    observer: &mut dyn VerifyObserver,
) -> Result<Vec<ManifestEntry>> {
    if !path.is_file() {
        return Err(VerifyError::ManifestNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).at(path)?;
    parse_manifest(&content, variables, observer)
}

/// Parses a whitelist document.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML, has no
/// `whitelist` element, or contains an `entry` without a `path`.
///
/// # Examples
///
/// ```
/// use distverify_core::NoopObserver;
/// use distverify_core::Variables;
/// use distverify_core::manifest::parse_manifest;
///
/// let mut vars = Variables::new();
/// vars.insert("v".into(), "1.0".into());
/// let xml = r#"<whitelist><entry path="/app-${v}.jar" md5="abc"/></whitelist>"#;
///
/// let entries = parse_manifest(xml, &vars, &mut NoopObserver)?;
/// assert_eq!(entries[0].path, "/app-1.0.jar");
/// assert_eq!(entries[0].checksum.as_deref(), Some("abc"));
/// # Ok::<(), distverify_core::VerifyError>(())
/// ```
pub fn parse_manifest(
    content: &str,
    variables: &Variables,
    observer: &mut dyn VerifyObserver,
) -> Result<Vec<ManifestEntry>> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut open_elements: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;
    let mut entries = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| VerifyError::InvalidManifest {
            reason: format!("malformed XML at byte {}: {e}", reader.buffer_position()),
        })?;

        match event {
            Event::Start(element) => {
                seen_root |= element.name().as_ref() == ROOT_ELEMENT;
                if is_entry(&element, &open_elements) {
                    entries.push(read_entry(&element, variables, observer)?);
                }
                open_elements.push(element.name().as_ref().to_vec());
            }
            Event::Empty(element) => {
                seen_root |= element.name().as_ref() == ROOT_ELEMENT;
                if is_entry(&element, &open_elements) {
                    entries.push(read_entry(&element, variables, observer)?);
                }
            }
            Event::End(_) => {
                open_elements.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(VerifyError::InvalidManifest {
            reason: "document has no <whitelist> element".to_string(),
        });
    }

    Ok(entries)
}

fn is_entry(element: &BytesStart<'_>, open_elements: &[Vec<u8>]) -> bool {
    element.name().as_ref() == ENTRY_ELEMENT
        && open_elements.last().is_some_and(|parent| parent == ROOT_ELEMENT)
}

fn read_entry(
    element: &BytesStart<'_>,
    variables: &Variables,
    observer: &mut dyn VerifyObserver,
) -> Result<ManifestEntry> {
    let mut raw_path = None;
    let mut checksums: [Option<String>; 3] = [None, None, None];

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| VerifyError::InvalidManifest {
            reason: format!("invalid entry attribute: {e}"),
        })?;
        let key = attribute.key.as_ref();
        let value = attribute
            .unescape_value()
            .map_err(|e| VerifyError::InvalidManifest {
                reason: format!("invalid entry attribute value: {e}"),
            })?
            .into_owned();

        if key == PATH_ATTRIBUTE {
            raw_path = Some(value);
        } else if let Some(slot) = CHECKSUM_ATTRIBUTES.iter().position(|name| *name == key) {
            checksums[slot] = Some(value);
        }
    }

    let raw_path = raw_path.ok_or_else(|| VerifyError::InvalidManifest {
        reason: "entry without path attribute".to_string(),
    })?;

    let resolved = resolve(&raw_path, variables);
    for name in &resolved.unresolved {
        observer.on_unresolved_variable(&raw_path, name);
    }

    Ok(ManifestEntry {
        path: resolved.path,
        checksum: checksums.into_iter().flatten().next(),
    })
}

/// Writes a whitelist document.
///
/// The checksum attribute is named after `algorithm` so that the document
/// records which digest it was generated with.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_manifest<W: Write>(
    entries: &[ManifestEntry],
    algorithm: &str,
    writer: &mut W,
) -> io::Result<()> {
    let mut xml = start_document(writer)?;
    xml.create_element("whitelist").write_inner_content(|xml| {
        for entry in entries {
            let element = xml
                .create_element("entry")
                .with_attribute(("path", entry.path.as_str()));
            match entry.expected_checksum() {
                Some(checksum) => element.with_attribute((algorithm, checksum)).write_empty()?,
                None => element.write_empty()?,
            };
        }
        Ok(())
    })?;
    finish_document(xml)
}

/// Builds whitelist entries for every file below `root`.
///
/// Entries are in traversal order with freshly computed checksums. No
/// reconciliation takes place. Symlinks without hashable content are left
/// out, so verifying against the template reports them as undeclared.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be hashed.
pub fn generate_manifest(root: &Path, provider: &dyn ChecksumProvider) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    for file in walk_files(root) {
        let file = file?;
        if let Some(target) = &file.link_target {
            warn!(
                path = %file.relative,
                target = %target.display(),
                "symbolic link left out of the whitelist template"
            );
            continue;
        }
        let checksum = provider.digest(&file.path).at(&file.path)?;
        entries.push(ManifestEntry {
            path: file.relative,
            checksum: Some(checksum),
        });
    }
    Ok(entries)
}
