//! Deterministic traversal of an unpacked tree.
//!
//! Entries are visited depth-first and sorted by file name within each
//! directory, so reports are stable across filesystems. Regular files and
//! symlinks resolving to one are yielded as files. Any other symlink
//! (dangling, or pointing at a directory) is yielded as a link and never
//! followed. Directories themselves are never reported.

use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::Result;
use crate::VerifyError;
use crate::error::IoResultExt;

/// A file found below the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Path relative to the root, `/`-prefixed with forward slashes.
    pub relative: String,

    /// Target of a symlink that does not resolve to a regular file.
    ///
    /// `None` for anything whose content can be hashed.
    pub link_target: Option<PathBuf>,
}

impl TreeFile {
    /// Returns `true` if this is a link without hashable content.
    #[must_use]
    pub const fn is_unresolved_link(&self) -> bool {
        self.link_target.is_some()
    }
}

/// Walks every regular file below `root`.
///
/// # Errors
///
/// Items are errors if a directory cannot be read.
///
/// # Examples
///
/// ```no_run
/// use distverify_core::walker::walk_files;
/// use std::path::Path;
///
/// for file in walk_files(Path::new("target/app.zip-unzipped")) {
///     let file = file?;
///     println!("{}", file.relative);
/// }
/// # Ok::<(), distverify_core::VerifyError>(())
/// ```
pub fn walk_files(root: &Path) -> impl Iterator<Item = Result<TreeFile>> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                let link_target = if file_type.is_file() {
                    None
                } else if file_type.is_symlink() {
                    if entry.path().is_file() {
                        None
                    } else {
                        match fs::read_link(entry.path()).at(entry.path()) {
                            Ok(target) => Some(target),
                            Err(e) => return Some(Err(e)),
                        }
                    }
                } else {
                    return None;
                };
                let relative = relative_path(root, entry.path());
                Some(Ok(TreeFile {
                    path: entry.into_path(),
                    relative,
                    link_target,
                }))
            }
            Err(e) => Some(Err(VerifyError::Walk {
                path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
                reason: e.to_string(),
            })),
        })
}

/// Computes the `/`-prefixed relative path of `path` below `root`.
///
/// Platform separators become `/`. A path outside `root` is rendered as is.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> String {
    let stripped = path.strip_prefix(root).unwrap_or(path);
    let mut relative = String::new();
    for component in stripped.components() {
        if let Component::Normal(part) = component {
            relative.push('/');
            relative.push_str(&part.to_string_lossy());
        }
    }
    if relative.is_empty() {
        relative.push('/');
    }
    relative
}

/// Normalizes a whitelist or relative path for comparison.
///
/// Backslashes become `/`, empty and `.` segments are dropped, `..` removes
/// the preceding segment, and the result always starts with `/`. Case is
/// preserved.
///
/// # Examples
///
/// ```
/// use distverify_core::walker::normalize_path;
///
/// assert_eq!(normalize_path("lib\\app.jar"), "/lib/app.jar");
/// assert_eq!(normalize_path("/lib/./x/../app.jar"), "/lib/app.jar");
/// assert_eq!(normalize_path("//a//b"), "/a/b");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
