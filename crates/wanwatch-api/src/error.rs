use thiserror::Error;

/// Top-level error type for the `wanwatch-api` crate.
///
/// Covers every failure mode of the two HTTP surfaces: controller login,
/// alarm retrieval, and ntfy publishing. `wanwatch-core` maps these into
/// the auth / fetch / notify taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the controller (wrong credentials, locked account).
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    // ── Responses ───────────────────────────────────────────────────
    /// Any non-200 response outside of login.
    #[error("Unexpected HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The controller answered 200 but flagged an error in the envelope.
    #[error("Controller error: {message}")]
    Controller { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status attached to this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the request could never succeed as built
    /// (bad URL, invalid header value). Retrying is pointless.
    pub fn is_malformed_request(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_builder(),
            Self::InvalidUrl(_) => true,
            _ => false,
        }
    }
}
