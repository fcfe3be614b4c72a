//! Full-workflow tests against a realistic harness fixture.
//!
//! Covers the three concrete scenarios (pristine apply, missing file, fully
//! patched input) plus partial-failure tolerance and guard precedence, driving
//! the same load -> apply -> persist pipeline the binary uses.

use harness_patcher::{
    apply_patch_set, load, motoko_support_patches, persist, run_verdict, PatchOutcome,
    SourceError, FEATURE_MARKER,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BASELINE: &str = include_str!("fixtures/common_baseline.ts");

/// Write the given harness content into a fresh checkout directory.
fn checkout_with(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("common.ts");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn pristine_harness_takes_all_six_patches() {
    let (_dir, path) = checkout_with(BASELINE);
    let patches = motoko_support_patches().unwrap();

    let original = load(&path).unwrap();
    let mut buffer = original.clone();
    let result = apply_patch_set(&patches, &mut buffer, |_, _| {});
    persist(&path, &buffer).unwrap();

    assert_eq!(result.applied, 6);
    assert_eq!(result.total, 6);
    assert!(result.changed);
    assert!(buffer.len() > original.len());
    assert!(run_verdict(&result, &buffer, FEATURE_MARKER));

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, buffer);

    // Spot-check each patch's effect in the persisted harness.
    assert!(written.contains("MotokoLedgerIdlFactory"));
    assert!(written.contains("export const LEDGER_IMPL"));
    assert!(written.contains("motoko_ledger.wasm.gz"));
    assert!(written.contains("function get_motoko_args"));
    assert!(written.contains("const proxyActor = pic.createActor<ICRCLedgerService>"));
    assert!(written.contains("IDL.encode(motokoInit({ IDL }), [[]])"));
}

#[test]
fn missing_harness_is_fatal_before_any_patch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("common.ts");

    let result = load(&path);
    assert!(matches!(result, Err(SourceError::Missing { .. })));
}

#[test]
fn second_run_is_a_byte_identical_noop() {
    let (_dir, path) = checkout_with(BASELINE);
    let patches = motoko_support_patches().unwrap();

    let mut buffer = load(&path).unwrap();
    let _ = apply_patch_set(&patches, &mut buffer, |_, _| {});
    persist(&path, &buffer).unwrap();
    let first_pass = buffer.clone();

    let mut buffer = load(&path).unwrap();
    let second = apply_patch_set(&patches, &mut buffer, |_, _| {});

    assert_eq!(second.applied, 0);
    assert_eq!(second.already_present(), 6);
    assert!(!second.changed);
    assert_eq!(buffer, first_pass);
    // Zero applied, but the feature marker is present: still a success.
    assert!(run_verdict(&second, &buffer, FEATURE_MARKER));
}

#[test]
fn drifted_wasm_block_only_misses_that_patch() {
    // Drop the env-var conditional so patch 3's precondition cannot match;
    // the other five must still land and the harness must still be written.
    let drifted = BASELINE.replace(
        r#"if (process.env['LEDGER'] === "motoko") {
    ICRC_WASM_PATH = resolve(__dirname, "./icrc_ledger/motoko_ledger.wasm");
}
"#,
        "",
    );
    assert_ne!(drifted, BASELINE, "fixture drift surgery missed its target");

    let (_dir, path) = checkout_with(&drifted);
    let patches = motoko_support_patches().unwrap();

    let mut buffer = load(&path).unwrap();
    let result = apply_patch_set(&patches, &mut buffer, |_, _| {});
    persist(&path, &buffer).unwrap();

    assert_eq!(result.not_found(), 1);
    assert_eq!(result.applied, 5);
    assert_eq!(
        result.outcomes[2],
        ("wasm-paths".to_string(), PatchOutcome::PreconditionNotFound)
    );
    assert!(run_verdict(&result, &buffer, FEATURE_MARKER));
    assert_eq!(fs::read_to_string(&path).unwrap(), buffer);
}

#[test]
fn fully_marked_harness_is_never_mutated() {
    let patches = motoko_support_patches().unwrap();

    let mut patched = BASELINE.to_string();
    let _ = apply_patch_set(&patches, &mut patched, |_, _| {});

    let mut buffer = patched.clone();
    let mut seen = Vec::new();
    let result = apply_patch_set(&patches, &mut buffer, |patch, outcome| {
        seen.push((patch.name.clone(), outcome));
    });

    assert!(seen
        .iter()
        .all(|(_, outcome)| *outcome == PatchOutcome::AlreadyPresent));
    assert_eq!(seen.len(), 6);
    assert_eq!(buffer, patched);
    assert!(!result.changed);
    assert!(run_verdict(&result, &buffer, FEATURE_MARKER));
}

#[test]
fn unrecognizable_harness_fails_the_verdict() {
    let (_dir, path) = checkout_with("// completely unrelated file\nconst x = 1;\n");
    let patches = motoko_support_patches().unwrap();

    let mut buffer = load(&path).unwrap();
    let result = apply_patch_set(&patches, &mut buffer, |_, _| {});

    assert_eq!(result.applied, 0);
    assert_eq!(result.not_found(), 6);
    assert!(!result.changed);
    assert!(!run_verdict(&result, &buffer, FEATURE_MARKER));
}

#[test]
fn constructor_rewrite_keeps_default_branch() {
    let patches = motoko_support_patches().unwrap();
    let mut buffer = BASELINE.to_string();
    let _ = apply_patch_set(&patches, &mut buffer, |_, _| {});

    // The Motoko branch wraps the fixture behind a proxy actor with the
    // DFINITY-shaped IDL; the default branch is the original behavior.
    let constructor_at = buffer.find("export async function ICRCLedger(").unwrap();
    let constructor = &buffer[constructor_at..];
    assert!(constructor.contains(r#"if (LEDGER_IMPL === "motoko")"#));
    assert!(constructor.contains("wasm: MOTOKO_WASM_PATH"));
    assert!(constructor.contains("idlFactory: ICRCLedgerIdlFactory"));
    assert!(constructor.contains("arg: IDL.encode(icrcInit({IDL}), [get_args(me)]),"));
}
