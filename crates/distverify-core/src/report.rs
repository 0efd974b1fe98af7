//! Run results and the observer port.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::outcome::OutcomeEntry;
use crate::outcome::OutcomeStatus;

/// Outcome of one reconciliation run.
///
/// Outcomes for whitelist entries come first, in whitelist order, followed by
/// undeclared files in traversal order. The result is valid iff every outcome
/// is [`OutcomeStatus::Match`]; the verdict is derived on construction so the
/// two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    valid: bool,
    outcomes: Vec<OutcomeEntry>,
}

impl ReconciliationResult {
    /// Wraps outcomes and derives the verdict.
    #[must_use]
    pub fn new(outcomes: Vec<OutcomeEntry>) -> Self {
        let valid = outcomes.iter().all(|o| !o.is_failure());
        Self { valid, outcomes }
    }

    /// Concatenates the manifest pass and the tree pass.
    #[must_use]
    pub fn from_passes(mut declared: Vec<OutcomeEntry>, undeclared: Vec<OutcomeEntry>) -> Self {
        declared.extend(undeclared);
        Self::new(declared)
    }

    /// Returns `true` if every outcome matched.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// All outcomes in emission order.
    #[must_use]
    pub fn outcomes(&self) -> &[OutcomeEntry] {
        &self.outcomes
    }

    /// Number of outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if nothing was checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of outcomes with the given status.
    #[must_use]
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Number of non-matching outcomes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Iterates over non-matching outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &OutcomeEntry> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Statistics of an archive unpack.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Directory the archive was unpacked into.
    pub destination: PathBuf,

    /// Number of regular files written.
    pub files_unpacked: usize,

    /// Number of directory entries created.
    pub directories_created: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the unpack.
    pub duration: Duration,
}

impl UnpackReport {
    /// Creates an empty report for the given destination.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }
}

/// Summary of a whitelist template generation.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Directory that was walked.
    pub source_root: PathBuf,

    /// Whitelist file that was written.
    pub output: PathBuf,

    /// Number of entries written.
    pub entries: usize,
}

/// Receives events while a whitelist is loaded and reconciled.
///
/// The engine never logs on its own; everything observable goes through this
/// port, so callers decide whether events end up in logs, a progress bar or
/// nowhere.
///
/// # Examples
///
/// ```
/// use distverify_core::OutcomeEntry;
/// use distverify_core::ReconciliationResult;
/// use distverify_core::VerifyObserver;
///
/// #[derive(Default)]
/// struct Counter {
///     seen: usize,
/// }
///
/// impl VerifyObserver for Counter {
///     fn on_unresolved_variable(&mut self, _template: &str, _name: &str) {}
///
///     fn on_outcome(&mut self, _outcome: &OutcomeEntry) {
///         self.seen += 1;
///     }
///
///     fn on_complete(&mut self, _result: &ReconciliationResult) {}
/// }
/// ```
pub trait VerifyObserver {
    /// Called when a whitelist path references a variable that is not set.
    ///
    /// # Arguments
    ///
    /// * `template` - The raw whitelist path
    /// * `name` - The placeholder name that could not be resolved
    fn on_unresolved_variable(&mut self, template: &str, name: &str);

    /// Called once per outcome, in emission order.
    fn on_outcome(&mut self, outcome: &OutcomeEntry);

    /// Called after both passes have finished.
    fn on_complete(&mut self, result: &ReconciliationResult);
}

/// Observer that discards every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl VerifyObserver for NoopObserver {
    fn on_unresolved_variable(&mut self, _template: &str, _name: &str) {}

    fn on_outcome(&mut self, _outcome: &OutcomeEntry) {}

    fn on_complete(&mut self, _result: &ReconciliationResult) {}
}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl VerifyObserver for TracingObserver {
    fn on_unresolved_variable(&mut self, template: &str, name: &str) {
        warn!(
            variable = name,
            path = template,
            "variable is defined but could not be resolved by the given variables"
        );
    }

    fn on_outcome(&mut self, outcome: &OutcomeEntry) {
        debug!(
            path = %outcome.path,
            status = %outcome.status,
            "{}",
            outcome.detail
        );
    }

    fn on_complete(&mut self, result: &ReconciliationResult) {
        info!(
            valid = result.is_valid(),
            checked = result.len(),
            failures = result.failure_count(),
            "verification completed"
        );
    }
}
