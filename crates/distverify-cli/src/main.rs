//! Distverify CLI - verifies distribution archives against a checksum
//! whitelist.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet)?;

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json && progress::CliProgress::should_show();

    match &cli.command {
        cli::Commands::Verify(args) => commands::verify::execute(args, &*formatter, show_progress),
        cli::Commands::Generate(args) => commands::generate::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
