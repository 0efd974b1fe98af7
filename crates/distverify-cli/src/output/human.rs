//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use distverify_core::GenerateReport;
use distverify_core::OutcomeStatus;
use distverify_core::ReconciliationResult;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn status_label(&self, status: OutcomeStatus) -> String {
        if !self.use_colors {
            return format!("[{status}]");
        }
        match status {
            OutcomeStatus::Match => style(status).green().to_string(),
            OutcomeStatus::ChecksumMismatch => style(status).red().bold().to_string(),
            OutcomeStatus::Missing => style(status).red().to_string(),
            OutcomeStatus::Undeclared => style(status).yellow().to_string(),
        }
    }

    fn write_headline(&self, passed: bool, text: &str) {
        if self.use_colors {
            let mark = if passed {
                style("✓").green().bold()
            } else {
                style("✗").red().bold()
            };
            let _ = self.term.write_line(&format!("{mark} {text}"));
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_verify_result(
        &self,
        archive: &Path,
        report_path: &Path,
        result: &ReconciliationResult,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if result.is_valid() {
            self.write_headline(true, "Verification passed");
        } else {
            self.write_headline(false, "Verification failed");
        }

        let _ = self
            .term
            .write_line(&format!("  Archive:             {}", archive.display()));
        let _ = self.term.write_line(&format!(
            "  Paths checked:       {}",
            Self::format_number(result.len())
        ));
        let _ = self.term.write_line(&format!(
            "  Matched:             {}",
            Self::format_number(result.count(OutcomeStatus::Match))
        ));
        let _ = self.term.write_line(&format!(
            "  Checksum mismatches: {}",
            Self::format_number(result.count(OutcomeStatus::ChecksumMismatch))
        ));
        let _ = self.term.write_line(&format!(
            "  Missing:             {}",
            Self::format_number(result.count(OutcomeStatus::Missing))
        ));
        let _ = self.term.write_line(&format!(
            "  Undeclared:          {}",
            Self::format_number(result.count(OutcomeStatus::Undeclared))
        ));
        let _ = self
            .term
            .write_line(&format!("  Report:              {}", report_path.display()));

        let shown: Vec<_> = if self.verbose {
            result.outcomes().iter().collect()
        } else {
            result.failures().collect()
        };
        if !shown.is_empty() {
            let _ = self.term.write_line("");
            for outcome in shown {
                let _ = self.term.write_line(&format!(
                    "  {} {}: {}",
                    self.status_label(outcome.status),
                    outcome.path,
                    outcome.detail
                ));
            }
        }

        Ok(())
    }

    fn format_generate_result(&self, report: &GenerateReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_headline(
            true,
            &format!("Whitelist template generated: {}", report.output.display()),
        );
        let _ = self.term.write_line(&format!(
            "  Entries: {}",
            Self::format_number(report.entries)
        ));
        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Source:  {}", report.source_root.display()));
        }

        Ok(())
    }
}
