//! Batch operations and data collection for Oracle ZFS Storage Appliances.
//!
//! This crate sits between `zfssa-api` and the `zfssa` binary:
//!
//! - **Row records** ([`ops`]): each CSV row is bound to a typed record
//!   ([`ProjectSpec`], [`FilesystemKey`], [`SnapshotSpec`], ...) before any
//!   request is made. The first bad column becomes a row failure.
//!
//! - **[`Operation`]** / **[`BatchRunner`]**: run one operation over every
//!   row, in order, asking a [`Prompt`] first when the operation is
//!   destructive. Every row yields an [`Outcome`]; nothing per-row aborts
//!   the batch.
//!
//! - **Reporters** ([`report`]): [`ConsoleReporter`] prints each message;
//!   [`ProgressReporter`] draws a progress bar and logs to a file.
//!
//! - **[`Explorer`]**: fetches the read-only endpoints four at a time,
//!   writes one CSV per [`Category`] and zips the result.
//!
//! - **Templates** ([`templates`]): sample input files.

pub mod batch;
pub mod error;
pub mod explorer;
pub mod operation;
pub mod ops;
pub mod outcome;
pub mod report;
pub mod row;
pub mod size;
pub mod templates;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{BatchRunner, Preview, Prompt, ensure_confirmed};
pub use error::CoreError;
pub use explorer::{Category, Explorer, ExplorerReport};
pub use operation::Operation;
pub use outcome::{Action, Outcome, Verb};
pub use report::{ConsoleReporter, ProgressReporter, Reporter};
pub use row::{Row, RowError, Widths, read_rows};
pub use templates::{TemplateKind, TemplateMode, write_template};

pub use ops::{
    Component, FilesystemKey, FilesystemSpec, LunKey, LunSpec, ProjectKey, ProjectSpec,
    SnapshotKind, SnapshotSpec, UpdateDirective,
};
