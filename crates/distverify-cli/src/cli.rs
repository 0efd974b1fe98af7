//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use distverify_core::ChecksumAlgorithm;
use distverify_core::ReportFormat;
use distverify_core::Variables;
use distverify_core::VerifyConfig;
use std::path::PathBuf;

/// Report file name used when `--report` is not given.
pub const DEFAULT_REPORT_NAME: &str = "report.xml";

#[derive(Parser)]
#[command(name = "distverify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a distribution archive against a whitelist
    Verify(VerifyArgs),
    /// Generate a whitelist template from an archive or directory
    Generate(GenerateArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Options shared by commands that unpack and hash.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Directory used to unpack the archive (default: next to the archive)
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Checksum algorithm (md5, sha256)
    #[arg(long, default_value = "md5", value_name = "ALGORITHM")]
    pub algorithm: ChecksumAlgorithm,

    /// Keep a previously unpacked tree instead of removing it first
    #[arg(long)]
    pub keep_existing: bool,
}

impl RunArgs {
    /// Builds the run configuration with the given variables.
    pub fn config(&self, variables: Variables) -> VerifyConfig {
        let config = VerifyConfig::default()
            .with_algorithm(self.algorithm)
            .with_variables(variables)
            .with_clean_destination(!self.keep_existing);
        match &self.work_dir {
            Some(dir) => config.with_work_dir(dir),
            None => config,
        }
    }

    /// Resolves `name` inside the work dir, or the current directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.work_dir
            .as_deref()
            .map_or_else(|| PathBuf::from(name), |dir| dir.join(name))
    }
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the distribution archive (zip, jar, war, ear, tar, tar.gz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Whitelist document listing the expected files
    #[arg(short, long, value_name = "FILE")]
    pub whitelist: PathBuf,

    /// Report destination (default: report.xml in the work dir)
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format (xml, junit)
    #[arg(short = 't', long, default_value = "xml", value_name = "TYPE")]
    pub report_type: ReportFormat,

    /// Variable for ${name} placeholders in whitelist paths (repeatable)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl VerifyArgs {
    /// Collects `--define` values; later definitions win.
    pub fn variables(&self) -> Variables {
        self.defines.iter().cloned().collect()
    }

    /// Returns the report destination.
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.run.output_path(DEFAULT_REPORT_NAME))
    }
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Distribution archive or an already unpacked directory
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Whitelist template destination (default: whitelist.tmpl.xml in the work dir)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunArgs,
}

impl GenerateArgs {
    /// Returns the template destination.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.run
                .output_path(distverify_core::api::DEFAULT_TEMPLATE_NAME)
        })
    }
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parses a `KEY=VALUE` variable definition.
///
/// Only the first `=` separates key and value; the value may be empty.
fn parse_define(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid variable definition '{s}', expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
