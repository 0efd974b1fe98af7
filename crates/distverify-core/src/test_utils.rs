//! Test utilities for building distributions and unpacked trees.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use distverify_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut ar = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        ar.append_data(&mut header, path, data).unwrap();
    }
    ar.into_inner().unwrap()
}

/// Creates an in-memory gzip-compressed TAR archive.
#[must_use]
pub fn create_test_tar_gz(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let tar_data = create_test_tar(entries);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_data).unwrap();
    encoder.finish().unwrap()
}

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Entries ending in `/` become directory entries; all others are files
/// stored uncompressed with mode 0o644.
///
/// # Examples
///
/// ```
/// use distverify_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("docs/", b""), ("docs/a.txt", b"hello")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);

    for (path, data) in entries {
        if path.ends_with('/') {
            zip.add_directory(path, options).unwrap();
        } else {
            zip.start_file(path, options).unwrap();
            zip.write_all(data).unwrap();
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Writes files below `root`, creating parent directories as needed.
///
/// Each entry is a tuple of (relative path, content).
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
