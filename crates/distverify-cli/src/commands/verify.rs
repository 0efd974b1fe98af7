//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use distverify_core::verify_distribution_with_observer;
use distverify_core::ReportFile;
use tracing::info;

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<()> {
    let config = args.run.config(args.variables());
    let report_path = args.report_path();

    // An unwritable report location must fail before anything is unpacked.
    let report = ReportFile::create(&report_path)
        .with_context(|| format!("Cannot create report file: {}", report_path.display()))?;

    info!(archive = %args.archive.display(), "verifying the distribution archive");

    let mut progress = CliProgress::new(show_progress);
    let result =
        verify_distribution_with_observer(&args.archive, &args.whitelist, &config, &mut progress)
            .map_err(|e| convert_verify_error(e, &args.archive))?;
    drop(progress);

    // The report is written before the verdict so a failed run still leaves it.
    report
        .write(&result, args.report_type)
        .with_context(|| format!("Report generation failed: {}", report_path.display()))?;

    formatter.format_verify_result(&args.archive, &report_path, &result)?;

    if result.is_valid() {
        info!("verification finished successfully");
        Ok(())
    } else {
        bail!(
            "Verification failed! Report file generated: {}",
            report_path.display()
        )
    }
}
