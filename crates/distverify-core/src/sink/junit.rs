use std::io;
use std::io::Write;

use quick_xml::events::BytesText;

use super::ReportSink;
use super::finish_document;
use super::start_document;
use crate::ReconciliationResult;

const SUITE_NAME: &str = "distverify";

/// JUnit-style report: one test case per outcome.
///
/// Undeclared files appear as synthetic cases named by their discovered
/// path. Every non-matching case carries a `<failure>` whose `type` is the
/// outcome status.
#[derive(Debug, Default, Clone, Copy)]
pub struct JUnitReport;

impl ReportSink for JUnitReport {
    fn write(&self, result: &ReconciliationResult, writer: &mut dyn Write) -> io::Result<()> {
        let tests = result.len().to_string();
        let failures = result.failure_count().to_string();

        let mut xml = start_document(writer)?;
        xml.create_element("testsuite")
            .with_attributes([
                ("name", SUITE_NAME),
                ("tests", tests.as_str()),
                ("failures", failures.as_str()),
                ("errors", "0"),
                ("skipped", "0"),
                ("time", "0"),
            ])
            .write_inner_content(|xml| {
                for outcome in result.outcomes() {
                    let case = xml.create_element("testcase").with_attributes([
                        ("classname", outcome.path.as_str()),
                        ("name", outcome.path.as_str()),
                        ("time", "0"),
                    ]);
                    if !outcome.is_failure() {
                        case.write_empty()?;
                        continue;
                    }
                    case.write_inner_content(|xml| {
                        xml.create_element("failure")
                            .with_attributes([
                                ("message", outcome.detail.as_str()),
                                ("type", outcome.status.as_str()),
                            ])
                            .write_text_content(BytesText::new(&outcome.detail))?;
                        Ok(())
                    })?;
                }
                Ok(())
            })?;
        finish_document(xml)
    }

    fn format_name(&self) -> &str {
        "junit"
    }
}
