//! Console reporting and the run verdict.

use crate::engine::RunResult;
use crate::patch::{Patch, PatchOutcome};
use colored::Colorize;

/// Prints one symbol-coded status line per patch as outcomes are produced,
/// then a summary with counts and before/after byte sizes.
#[derive(Debug, Default)]
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Reporter
    }

    /// Status line for one settled patch: `✓` applied, `○` already present,
    /// `✗` precondition not found. All three go to stdout so the per-patch
    /// report stays in order under redirection; a miss is an outcome here,
    /// not an error.
    pub fn outcome(&self, patch: &Patch, outcome: PatchOutcome) {
        let symbol = match outcome {
            PatchOutcome::Applied => "✓".green(),
            PatchOutcome::AlreadyPresent => "○".yellow(),
            PatchOutcome::PreconditionNotFound => "✗".red(),
        };
        println!("{} {}: {}", symbol, patch.name, outcome);
    }

    /// Summary block after the full set has run.
    pub fn summary(&self, result: &RunResult, bytes_before: usize, bytes_after: usize) {
        println!();
        println!("{}", "Summary:".bold());
        println!(
            "  {} applied",
            format!("{}", result.applied).green()
        );
        println!(
            "  {} already present",
            format!("{}", result.already_present()).yellow()
        );
        println!(
            "  {} precondition not found",
            format!("{}", result.not_found()).red()
        );
        println!("  file size: {} -> {} bytes", bytes_before, bytes_after);
    }
}

/// Classify one full run: success iff something applied this run, or the
/// overall feature marker is already present in the final buffer.
pub fn run_verdict(result: &RunResult, final_buffer: &str, feature_marker: &str) -> bool {
    result.applied > 0 || final_buffer.contains(feature_marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PatchOutcome;

    fn result_with(applied: usize, missing: usize) -> RunResult {
        let mut outcomes = Vec::new();
        for i in 0..applied {
            outcomes.push((format!("applied-{i}"), PatchOutcome::Applied));
        }
        for i in 0..missing {
            outcomes.push((format!("missing-{i}"), PatchOutcome::PreconditionNotFound));
        }
        RunResult {
            applied,
            total: outcomes.len(),
            changed: applied > 0,
            outcomes,
        }
    }

    #[test]
    fn fresh_application_is_success() {
        let result = result_with(6, 0);
        assert!(run_verdict(&result, "anything", "LEDGER_IMPL"));
    }

    #[test]
    fn noop_run_succeeds_when_marker_present() {
        let result = result_with(0, 0);
        assert!(run_verdict(
            &result,
            "export const LEDGER_IMPL = ...;",
            "LEDGER_IMPL"
        ));
    }

    #[test]
    fn nothing_applied_and_no_marker_fails() {
        let result = result_with(0, 6);
        assert!(!run_verdict(&result, "a drifted harness", "LEDGER_IMPL"));
    }

    #[test]
    fn partial_application_still_succeeds() {
        let result = result_with(5, 1);
        assert!(run_verdict(&result, "whatever", "LEDGER_IMPL"));
    }
}
