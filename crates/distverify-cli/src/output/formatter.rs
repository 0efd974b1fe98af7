//! Output formatter trait for CLI results.

use anyhow::Result;
use distverify_core::GenerateReport;
use distverify_core::ReconciliationResult;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a verification result and where its report was written
    fn format_verify_result(
        &self,
        archive: &Path,
        report_path: &Path,
        result: &ReconciliationResult,
    ) -> Result<()>;

    /// Format a whitelist generation result
    fn format_generate_result(&self, report: &GenerateReport) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    /// Output for a run that completed but did not pass.
    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Failure,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
