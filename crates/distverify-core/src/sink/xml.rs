use std::io;
use std::io::Write;

use super::ReportSink;
use super::finish_document;
use super::start_document;
use crate::ReconciliationResult;

/// Flat XML report.
///
/// ```xml
/// <report>
///   <entry path="/a.txt" checksum="...">
///     <result status="MATCH" detail="Validation passed successfully"/>
///   </entry>
/// </report>
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlReport;

impl ReportSink for XmlReport {
    fn write(&self, result: &ReconciliationResult, writer: &mut dyn Write) -> io::Result<()> {
        let mut xml = start_document(writer)?;
        xml.create_element("report").write_inner_content(|xml| {
            for outcome in result.outcomes() {
                xml.create_element("entry")
                    .with_attributes([
                        ("path", outcome.path.as_str()),
                        ("checksum", outcome.checksum_or_empty()),
                    ])
                    .write_inner_content(|xml| {
                        xml.create_element("result")
                            .with_attributes([
                                ("status", outcome.status.as_str()),
                                ("detail", outcome.detail.as_str()),
                            ])
                            .write_empty()?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;
        finish_document(xml)
    }

    fn format_name(&self) -> &str {
        "xml"
    }
}
