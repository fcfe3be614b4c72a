use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use harness_patcher::{
    apply_patch_set, load, motoko_support_patches, persist, resolve_target, run_verdict, Reporter,
    FEATURE_MARKER,
};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "harness-patcher")]
#[command(about = "Inject Motoko ICRC_fungible ledger support into the devefi ledger test harness", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the Motoko support patch set to the harness
    Apply {
        /// Path to the harness file (default: $DEVEFI_LEDGER_TESTS/common.ts)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Dry run - report outcomes without writing the harness
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Check patch status without touching the harness
    Status {
        /// Path to the harness file (default: $DEVEFI_LEDGER_TESTS/common.ts)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            file,
            dry_run,
            diff,
        } => cmd_apply(file, dry_run, diff),

        Commands::Status { file } => cmd_status(file),
    }
}

fn cmd_apply(file: Option<PathBuf>, dry_run: bool, show_diff: bool) -> Result<()> {
    let target = resolve_target(file);
    let original = load(&target)?;

    println!("Harness: {}", target.display());
    println!();

    let patches = motoko_support_patches()?;
    let reporter = Reporter::new();

    let mut buffer = original.clone();
    let result = apply_patch_set(&patches, &mut buffer, |patch, outcome| {
        reporter.outcome(patch, outcome)
    });

    reporter.summary(&result, original.len(), buffer.len());

    if show_diff && result.changed {
        display_diff(&target, &original, &buffer);
    }

    if dry_run {
        println!("{}", "[dry run] harness left untouched".cyan());
    } else {
        persist(&target, &buffer)?;
    }

    if !run_verdict(&result, &buffer, FEATURE_MARKER) {
        eprintln!(
            "{}",
            "✗ No patches applied - harness may already have drifted from the expected shape".red()
        );
        std::process::exit(1);
    }

    println!("{}", "✓ Motoko ledger support is in place".green());
    Ok(())
}

/// Read-only status report: runs the set against an in-memory copy and shows
/// what a real run would do, without ever writing the harness.
fn cmd_status(file: Option<PathBuf>) -> Result<()> {
    let target = resolve_target(file);
    let original = load(&target)?;

    println!("{}", "Patch Status Report".bold());
    println!("Harness: {}", target.display());
    println!();

    let patches = motoko_support_patches()?;
    let reporter = Reporter::new();

    let mut scratch = original.clone();
    let result = apply_patch_set(&patches, &mut scratch, |patch, outcome| {
        reporter.outcome(patch, outcome)
    });

    reporter.summary(&result, original.len(), scratch.len());

    if result.applied > 0 {
        println!(
            "{}",
            format!("{} patch(es) would be applied by `apply`", result.applied).cyan()
        );
    } else if run_verdict(&result, &scratch, FEATURE_MARKER) {
        println!("{}", "Harness is fully patched".green());
    }

    Ok(())
}

/// Unified diff between the original and patched harness.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}
