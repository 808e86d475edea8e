use thiserror::Error;

/// Top-level error type for the `zfssa-api` crate.
///
/// Covers every way a single REST call can fail: transport, TLS setup,
/// HTTP status, and application faults reported inside the JSON body.
/// `zfssa-core` folds these into per-row failure messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The appliance rejected the basic-auth credentials (HTTP 401).
    #[error("HTTP 401 Unauthorized: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Appliance responses ─────────────────────────────────────────
    /// Non-success HTTP status without an embedded fault.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// `{"fault": {"message": ...}}` in the response body, whatever the status.
    #[error("{message}")]
    Fault { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the appliance rejected the credentials.
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Fault { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } | Self::Fault { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status carried by the error, when the appliance answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Status { status, .. } | Self::Fault { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
