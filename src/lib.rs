//! Harness Patcher: Motoko ledger support for the devefi ledger test harness
//!
//! Applies a fixed, ordered set of six textual patches to the externally
//! sourced `common.ts` module of `devefi_ledger_tests`, so the suite can
//! drive the PanIndustrial Motoko ICRC_fungible ledger alongside the default
//! DFINITY ledger. The harness is treated as opaque text, never parsed.
//!
//! # Architecture
//!
//! The engine is generic: a [`Patch`] combines a structural precondition
//! ([`Pattern`]), an idempotency [`Guard`], and a replacement template with
//! capture-group back-references. [`apply_patch_set`] folds the ordered set
//! over a single exclusively owned buffer; an individual miss is an outcome,
//! not an error, so a partially drifted harness still receives every patch
//! that applies. The concrete six-patch set lives in [`motoko`] and is pure
//! configuration over the engine.
//!
//! # Safety
//!
//! - Guards are checked before preconditions, so re-runs never stack
//! - The buffer is never rolled back mid-run
//! - The harness file is read once at the start and atomically rewritten
//!   once at the end (tempfile + fsync + rename)
//!
//! # Example
//!
//! ```no_run
//! use harness_patcher::{apply_patch_set, motoko_support_patches, source};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let target = Path::new("/tmp/devefi_ledger_tests/common.ts");
//! let mut buffer = source::load(target)?;
//! let patches = motoko_support_patches()?;
//!
//! let result = apply_patch_set(&patches, &mut buffer, |patch, outcome| {
//!     println!("{}: {}", patch.name, outcome);
//! });
//!
//! source::persist(target, &buffer)?;
//! println!("{} of {} patches applied", result.applied, result.total);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod matcher;
pub mod motoko;
pub mod patch;
pub mod report;
pub mod source;

// Re-exports
pub use engine::{apply_patch_set, RunResult};
pub use matcher::{Pattern, PatternError, StructuralMatch};
pub use motoko::{motoko_support_patches, FEATURE_MARKER};
pub use patch::{Guard, Patch, PatchOutcome};
pub use report::{run_verdict, Reporter};
pub use source::{load, persist, resolve_target, SourceError};
