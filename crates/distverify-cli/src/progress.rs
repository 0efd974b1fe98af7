//! Progress spinner for verification runs.

use console::Term;
use distverify_core::OutcomeEntry;
use distverify_core::ReconciliationResult;
use distverify_core::TracingObserver;
use distverify_core::VerifyObserver;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;

/// CLI spinner implementing `VerifyObserver`.
///
/// Ticks once per outcome and shows the path being checked. Every event is
/// also forwarded to the tracing log. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    log: TracingObserver,
    failures: usize,
}

impl CliProgress {
    /// Creates a spinner; a hidden one when `visible` is false.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {prefix} {pos} checked, {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_prefix("Verifying");
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            log: TracingObserver,
            failures: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl VerifyObserver for CliProgress {
    fn on_unresolved_variable(&mut self, template: &str, name: &str) {
        self.bar
            .suspend(|| self.log.on_unresolved_variable(template, name));
    }

    fn on_outcome(&mut self, outcome: &OutcomeEntry) {
        if outcome.is_failure() {
            self.failures += 1;
        }
        self.bar.inc(1);
        self.bar
            .set_message(format!("{} failed ({})", self.failures, outcome.path));
        self.bar.suspend(|| self.log.on_outcome(outcome));
    }

    fn on_complete(&mut self, result: &ReconciliationResult) {
        self.bar.finish_and_clear();
        self.log.on_complete(result);
    }
}
