//! Sequential fold of an ordered patch set over a single owned buffer.
//!
//! Order is part of the patch set's identity: later preconditions may depend
//! on text inserted by earlier patches, so the set is applied strictly in
//! definition order against the evolving buffer. Individual misses are
//! outcomes, not errors; the buffer is never rolled back mid-run.

use crate::patch::{Patch, PatchOutcome};

/// Aggregate result of one full patch-set application.
#[derive(Debug, Clone)]
#[must_use = "RunResult carries the verdict inputs"]
pub struct RunResult {
    /// One `(patch name, outcome)` pair per patch, in set order.
    pub outcomes: Vec<(String, PatchOutcome)>,
    /// Count of `Applied` outcomes.
    pub applied: usize,
    /// Total patches attempted.
    pub total: usize,
    /// True iff the final buffer differs from the input buffer.
    pub changed: bool,
}

impl RunResult {
    pub fn already_present(&self) -> usize {
        self.count(PatchOutcome::AlreadyPresent)
    }

    pub fn not_found(&self) -> usize {
        self.count(PatchOutcome::PreconditionNotFound)
    }

    fn count(&self, wanted: PatchOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == wanted).count()
    }
}

/// Apply every patch in order against `buffer`, invoking `on_outcome` as each
/// patch settles so the caller can report immediately.
///
/// A `PreconditionNotFound` for one patch does not revert or block the others;
/// partial application is the intended behavior when the harness has drifted.
pub fn apply_patch_set(
    patches: &[Patch],
    buffer: &mut String,
    mut on_outcome: impl FnMut(&Patch, PatchOutcome),
) -> RunResult {
    let original_len = buffer.len();
    let original = buffer.clone();

    let mut outcomes = Vec::with_capacity(patches.len());
    for patch in patches {
        let outcome = patch.apply(buffer);
        on_outcome(patch, outcome);
        outcomes.push((patch.name.clone(), outcome));
    }

    let applied = outcomes
        .iter()
        .filter(|(_, o)| *o == PatchOutcome::Applied)
        .count();

    RunResult {
        applied,
        total: patches.len(),
        changed: buffer.len() != original_len || *buffer != original,
        outcomes,
    }
}
