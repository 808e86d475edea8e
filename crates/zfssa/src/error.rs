//! CLI error types with miette diagnostics.
//!
//! Everything here ends the process. Per-row failures never get this far;
//! they are printed or logged as outcomes.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use zfssa_config::ConfigError;
use zfssa_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input files ──────────────────────────────────────────────────
    #[error("The {kind} file '{}' doesn't exist", path.display())]
    #[diagnostic(code(zfssa::file_not_found), help("Check the path given on the command line."))]
    FileNotFound { kind: &'static str, path: PathBuf },

    #[error(transparent)]
    #[diagnostic(
        code(zfssa::config),
        help("The server file is YAML with the keys ip, username and password.")
    )]
    Config(#[from] ConfigError),

    #[error("Cannot read input file '{}'", path.display())]
    #[diagnostic(
        code(zfssa::input_file),
        help("Input files are comma separated; lines starting with # are ignored.")
    )]
    InputFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // ── Confirmation ─────────────────────────────────────────────────
    #[error("Not confirmed, nothing was changed")]
    #[diagnostic(code(zfssa::not_confirmed))]
    NotConfirmed,

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(zfssa::confirmation_required),
        help("Use --noconfirm to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("File '{}' already exists", path.display())]
    #[diagnostic(code(zfssa::exists), help("Rename it or delete it."))]
    AlreadyExists { path: PathBuf },

    // ── Appliance ────────────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(zfssa::auth_failed),
        help("Verify the username and password in the server file.")
    )]
    AuthFailed,

    #[error(transparent)]
    #[diagnostic(
        code(zfssa::client),
        help("Check the --cert file, or leave it out to skip certificate verification.")
    )]
    Client(zfssa_api::Error),

    #[error("{failed} of {total} explorer runs failed")]
    #[diagnostic(code(zfssa::explorer_failed), help("Each failure is printed above."))]
    ExplorersFailed { failed: usize, total: usize },

    // ── Other ────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(zfssa::core))]
    Core(CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::Config(ConfigError::NoServers { .. }) => {
                exit_code::NOT_FOUND
            }
            Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::AlreadyExists { .. } => exit_code::CONFLICT,
            Self::AuthFailed => exit_code::AUTH,
            Self::Client(_) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InputFile { path, source } => Self::InputFile { path, source },
            CoreError::NotConfirmed => Self::NotConfirmed,
            CoreError::TemplateExists { path } => Self::AlreadyExists { path },
            CoreError::Api(e) => e.into(),
            CoreError::Io(e) => Self::Io(e),
            other => Self::Core(other),
        }
    }
}

impl From<zfssa_api::Error> for CliError {
    fn from(err: zfssa_api::Error) -> Self {
        if err.is_auth() {
            Self::AuthFailed
        } else {
            Self::Client(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let missing = CliError::FileNotFound {
            kind: "server",
            path: PathBuf::from("zfssa.yml"),
        };
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(missing.to_string(), "The server file 'zfssa.yml' doesn't exist");

        let exists: CliError = CoreError::TemplateExists {
            path: PathBuf::from("create_luns.csv"),
        }
        .into();
        assert_eq!(exists.exit_code(), exit_code::CONFLICT);

        let tls: CliError = CoreError::Api(zfssa_api::Error::Tls("bad pem".into())).into();
        assert_eq!(tls.exit_code(), exit_code::CONNECTION);

        assert_eq!(CliError::from(CoreError::NotConfirmed).exit_code(), exit_code::GENERAL);
    }
}
