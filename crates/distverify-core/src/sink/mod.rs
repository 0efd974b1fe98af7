//! Report sinks.
//!
//! A sink serializes a complete [`ReconciliationResult`] into a document.
//! Two formats are available: a flat XML report listing every outcome, and a
//! JUnit-style test suite that CI servers can display natively.

mod junit;
mod xml;

use std::fmt;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use quick_xml::Writer;
use quick_xml::events::BytesDecl;
use quick_xml::events::Event;
use tracing::debug;

use crate::ReconciliationResult;
use crate::Result;
use crate::VerifyError;
use crate::error::IoResultExt;

pub use junit::JUnitReport;
pub use xml::XmlReport;

/// Serializes a reconciliation result.
pub trait ReportSink {
    /// Writes the whole result to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, result: &ReconciliationResult, writer: &mut dyn Write) -> io::Result<()>;

    /// Returns the format name.
    fn format_name(&self) -> &str;
}

/// Available report formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Flat `<report>` document.
    #[default]
    Xml,
    /// JUnit `<testsuite>` document.
    JUnit,
}

impl ReportFormat {
    /// All formats.
    pub const ALL: [Self; 2] = [Self::Xml, Self::JUnit];

    /// Returns the format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::JUnit => "junit",
        }
    }

    /// Returns the sink for this format.
    #[must_use]
    pub fn sink(self) -> Box<dyn ReportSink> {
        match self {
            Self::Xml => Box::new(XmlReport),
            Self::JUnit => Box::new(JUnitReport),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = VerifyError;

    /// Parses a format name, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use distverify_core::ReportFormat;
    ///
    /// assert_eq!(" JUnit ".parse::<ReportFormat>()?, ReportFormat::JUnit);
    /// assert!("html".parse::<ReportFormat>().is_err());
    /// # Ok::<(), distverify_core::VerifyError>(())
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == name)
            .ok_or_else(|| VerifyError::UnknownReportFormat {
                name: s.to_string(),
            })
    }
}

/// Report file opened ahead of a run.
///
/// Opening the destination before anything is unpacked turns an unwritable
/// report location into a setup error. A report file dropped without a
/// successful [`ReportFile::write`] is removed again, so an aborted run
/// leaves no empty or partial report behind.
#[derive(Debug)]
pub struct ReportFile {
    path: PathBuf,
    writer: BufWriter<File>,
    written: bool,
}

impl ReportFile {
    /// Creates (or truncates) `destination`, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory or the file cannot be created.
    pub fn create(destination: &Path) -> Result<Self> {
        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).at(parent)?;
        }
        let file = File::create(destination).at(destination)?;
        Ok(Self {
            path: destination.to_path_buf(),
            writer: BufWriter::new(file),
            written: false,
        })
    }

    /// Path of the report file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `result` in the given format and flushes the file.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write(mut self, result: &ReconciliationResult, format: ReportFormat) -> Result<()> {
        format.sink().write(result, &mut self.writer).at(&self.path)?;
        self.writer.flush().at(&self.path)?;
        self.written = true;
        Ok(())
    }
}

impl Drop for ReportFile {
    fn drop(&mut self) {
        if !self.written && let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "cannot remove unwritten report");
        }
    }
}

/// Writes `result` to `destination` in the given format.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_report(
    result: &ReconciliationResult,
    format: ReportFormat,
    destination: &Path,
) -> Result<()> {
    ReportFile::create(destination)?.write(result, format)
}

/// Starts an indented document with an XML declaration.
///
/// Shared with the whitelist writer so every document distverify emits has
/// the same shape.
pub(crate) fn start_document<W: Write>(writer: W) -> io::Result<Writer<W>> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(xml)
}

/// Terminates the document with a newline.
pub(crate) fn finish_document<W: Write>(mut xml: Writer<W>) -> io::Result<()> {
    xml.get_mut().write_all(b"\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::OutcomeEntry;
    use tempfile::TempDir;

    #[test]
    fn test_parse_format() {
        assert_eq!("xml".parse::<ReportFormat>().unwrap(), ReportFormat::Xml);
        assert_eq!("XML".parse::<ReportFormat>().unwrap(), ReportFormat::Xml);
        assert_eq!(" junit\n".parse::<ReportFormat>().unwrap(), ReportFormat::JUnit);
    }

    #[test]
    fn test_unknown_format_message() {
        let err = "html".parse::<ReportFormat>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "report type [html] is not a valid report type, use [xml] or [junit]"
        );
    }

    #[test]
    fn test_write_report_creates_parents() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("reports/nested/verify.xml");
        let result = ReconciliationResult::new(vec![OutcomeEntry::matched("/a", None)]);

        write_report(&result, ReportFormat::Xml, &destination).unwrap();

        let content = fs::read_to_string(destination).unwrap();
        assert!(content.contains("<report>"));
    }

    #[test]
    fn test_report_file_fails_under_regular_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = ReportFile::create(&blocker.join("report.xml"));

        assert!(matches!(result, Err(VerifyError::Io { path, .. }) if path == blocker));
    }

    #[test]
    fn test_report_file_written_after_open() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("junit.xml");
        let report = ReportFile::create(&destination).unwrap();
        assert_eq!(report.path(), destination);

        let result = ReconciliationResult::new(vec![OutcomeEntry::missing("/a", None)]);
        report.write(&result, ReportFormat::JUnit).unwrap();

        let content = fs::read_to_string(destination).unwrap();
        assert!(content.contains(r#"failures="1""#));
    }

    #[test]
    fn test_unwritten_report_file_is_removed() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("report.xml");

        let report = ReportFile::create(&destination).unwrap();
        assert!(destination.is_file());
        drop(report);

        assert!(!destination.exists());
    }

    #[test]
    fn test_sink_names() {
        for format in ReportFormat::ALL {
            assert_eq!(format.sink().format_name(), format.as_str());
        }
    }
}
