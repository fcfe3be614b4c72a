//! Loading and persisting the single target harness file.
//!
//! The file is read once before any patch runs and written back exactly once
//! after every patch has been attempted. The write is atomic (tempfile in the
//! same directory + fsync + rename) so a crash mid-run never leaves a
//! half-patched harness on disk.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the harness module inside the checkout.
pub const HARNESS_FILE: &str = "common.ts";

/// Environment variable naming the `devefi_ledger_tests` checkout directory.
pub const CHECKOUT_ENV: &str = "DEVEFI_LEDGER_TESTS";

/// Conventional checkout location when nothing else is configured.
pub const DEFAULT_CHECKOUT: &str = "/tmp/devefi_ledger_tests";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{path} not found. Make sure devefi_ledger_tests is cloned.")]
    Missing { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolve the harness file path.
///
/// Priority order:
/// 1. Explicit `--file` flag
/// 2. `DEVEFI_LEDGER_TESTS` environment variable (checkout directory)
/// 3. The conventional `/tmp/devefi_ledger_tests` checkout
pub fn resolve_target(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    if let Ok(checkout) = env::var(CHECKOUT_ENV) {
        return PathBuf::from(checkout).join(HARNESS_FILE);
    }

    PathBuf::from(DEFAULT_CHECKOUT).join(HARNESS_FILE)
}

/// Read the harness into a buffer. A missing file is fatal before any patch
/// executes.
pub fn load(path: &Path) -> Result<String, SourceError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(source) if source.kind() == io::ErrorKind::NotFound => Err(SourceError::Missing {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(SourceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write the final buffer back, atomically.
pub fn persist(path: &Path, content: &str) -> Result<(), SourceError> {
    atomic_write(path, content.as_bytes()).map_err(|source| SourceError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    // Tempfile in the same directory so the rename stays on one filesystem.
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
