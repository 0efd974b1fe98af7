//! Generate command implementation

use crate::cli::GenerateArgs;
use crate::error::convert_verify_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use distverify_core::Variables;
use distverify_core::generate_whitelist;

pub fn execute(args: &GenerateArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.run.config(Variables::new());
    let output = args.output_path();

    let report = generate_whitelist(&args.source, &output, &config)
        .map_err(|e| convert_verify_error(e, &args.source))?;

    formatter.format_generate_result(&report)
}
