//! Whitelist verification for packaged distribution archives.
//!
//! `distverify-core` unpacks a distribution archive and reconciles the
//! extracted tree against a whitelist of expected files and their content
//! checksums. Every file is classified as a match, a checksum mismatch, a
//! missing declared file or an undeclared extra file, and the complete result
//! can be written out as a flat XML report or a JUnit-style test suite.
//!
//! # Examples
//!
//! ```no_run
//! use distverify_core::VerifyConfig;
//! use distverify_core::verify_distribution;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VerifyConfig::default().with_variable("project.version", "1.0.0");
//! let result = verify_distribution("target/app-1.0.0.zip", "whitelist.xml", &config)?;
//! if !result.is_valid() {
//!     for outcome in result.failures() {
//!         eprintln!("{}: {}", outcome.path, outcome.detail);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod checksum;
pub mod config;
pub mod error;
pub mod formats;
pub mod manifest;
pub mod outcome;
pub mod reconcile;
pub mod report;
pub mod resolve;
pub mod sink;
pub mod test_utils;
pub mod walker;

// Re-export main API types
pub use api::generate_whitelist;
pub use api::verify_distribution;
pub use api::verify_distribution_with_observer;
pub use checksum::ChecksumAlgorithm;
pub use checksum::ChecksumProvider;
pub use config::Variables;
pub use config::VerifyConfig;
pub use error::Result;
pub use error::VerifyError;
pub use manifest::ManifestEntry;
pub use outcome::OutcomeEntry;
pub use outcome::OutcomeStatus;
pub use reconcile::reconcile;
pub use report::GenerateReport;
pub use report::NoopObserver;
pub use report::ReconciliationResult;
pub use report::TracingObserver;
pub use report::UnpackReport;
pub use report::VerifyObserver;
pub use resolve::resolve;
pub use sink::ReportFile;
pub use sink::ReportFormat;
pub use sink::ReportSink;
pub use sink::write_report;
