// ── Core error types ──
//
// Errors that stop a whole run. Per-row problems (bad columns, HTTP
// failures, faults) never surface here; they become failed `Outcome`s.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("cannot read input file '{}': {source}", path.display())]
    InputFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ── Run control ──────────────────────────────────────────────────
    #[error("Not confirmed, nothing was changed")]
    NotConfirmed,

    #[error("'{}' already exists, rename it or delete it", path.display())]
    TemplateExists { path: PathBuf },

    // ── Output ───────────────────────────────────────────────────────
    #[error("cannot open log file '{}': {reason}", path.display())]
    LogFile { path: PathBuf, reason: String },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Transport (client construction, not per-row calls) ───────────
    #[error(transparent)]
    Api(#[from] zfssa_api::Error),
}
