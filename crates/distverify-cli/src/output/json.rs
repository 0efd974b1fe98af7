//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use distverify_core::GenerateReport;
use distverify_core::OutcomeEntry;
use distverify_core::OutcomeStatus;
use distverify_core::ReconciliationResult;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct OutcomeOutput {
    path: String,
    status: &'static str,
    checksum: Option<String>,
    detail: String,
}

impl From<&OutcomeEntry> for OutcomeOutput {
    fn from(outcome: &OutcomeEntry) -> Self {
        Self {
            path: outcome.path.clone(),
            status: outcome.status.as_str(),
            checksum: outcome.checksum.clone(),
            detail: outcome.detail.clone(),
        }
    }
}

#[derive(Serialize)]
struct VerifyOutput {
    archive: String,
    report: String,
    valid: bool,
    checked: usize,
    matched: usize,
    checksum_mismatches: usize,
    missing: usize,
    undeclared: usize,
    failures: Vec<OutcomeOutput>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_verify_result(
        &self,
        archive: &Path,
        report_path: &Path,
        result: &ReconciliationResult,
    ) -> Result<()> {
        let data = VerifyOutput {
            archive: archive.display().to_string(),
            report: report_path.display().to_string(),
            valid: result.is_valid(),
            checked: result.len(),
            matched: result.count(OutcomeStatus::Match),
            checksum_mismatches: result.count(OutcomeStatus::ChecksumMismatch),
            missing: result.count(OutcomeStatus::Missing),
            undeclared: result.count(OutcomeStatus::Undeclared),
            failures: result.failures().map(OutcomeOutput::from).collect(),
        };

        let output = if result.is_valid() {
            JsonOutput::success("verify", data)
        } else {
            JsonOutput::failure("verify", data, "verification failed")
        };
        Self::output(&output)
    }

    fn format_generate_result(&self, report: &GenerateReport) -> Result<()> {
        #[derive(Serialize)]
        struct GenerateOutput {
            source: String,
            output: String,
            entries: usize,
        }

        let data = GenerateOutput {
            source: report.source_root.display().to_string(),
            output: report.output.display().to_string(),
            entries: report.entries,
        };

        let output = JsonOutput::success("generate", data);
        Self::output(&output)
    }
}
