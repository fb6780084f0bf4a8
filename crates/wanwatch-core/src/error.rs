// ── Core error types ──
//
// One type per failure domain of the loop. All of them are recoverable
// except `CoreError`, which only surfaces when the loop cannot start.
// The `From<wanwatch_api::Error>` impls translate transport-layer errors.

use thiserror::Error;

/// Login against the controller failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("controller rejected login (HTTP {status})")]
    Rejected { status: u16 },

    #[error("login request failed: {reason}")]
    Transport { reason: String },

    #[error("cannot build controller client: {message}")]
    Setup { message: String },
}

impl From<wanwatch_api::Error> for AuthError {
    fn from(err: wanwatch_api::Error) -> Self {
        match err {
            wanwatch_api::Error::Authentication { status, .. }
            | wanwatch_api::Error::Status { status, .. } => Self::Rejected { status },
            wanwatch_api::Error::Transport(e) => Self::Transport {
                reason: e.to_string(),
            },
            other @ (wanwatch_api::Error::InvalidUrl(_) | wanwatch_api::Error::Tls(_)) => {
                Self::Setup {
                    message: other.to_string(),
                }
            }
            other => Self::Transport {
                reason: other.to_string(),
            },
        }
    }
}

/// Reading the alarm log failed. An expired session looks the same as
/// any other failure here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("controller answered HTTP {status}")]
    Status { status: u16 },

    #[error("alarm request failed: {reason}")]
    Transport { reason: String },

    #[error("unreadable alarm response: {message}")]
    Malformed { message: String },
}

impl From<wanwatch_api::Error> for FetchError {
    fn from(err: wanwatch_api::Error) -> Self {
        match err {
            wanwatch_api::Error::Authentication { status, .. }
            | wanwatch_api::Error::Status { status, .. } => Self::Status { status },
            wanwatch_api::Error::Transport(e) => Self::Transport {
                reason: e.to_string(),
            },
            wanwatch_api::Error::Controller { message }
            | wanwatch_api::Error::Deserialization { message, .. } => Self::Malformed { message },
            other => Self::Transport {
                reason: other.to_string(),
            },
        }
    }
}

/// Delivering a notification failed for good.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Client-side problem (4xx). Never retried.
    #[error("ntfy rejected the notification (HTTP {status})")]
    Rejected { status: u16 },

    /// The request could not be built. Never retried.
    #[error("notification request is malformed: {message}")]
    Malformed { message: String },

    /// Every attempt hit a server error or transport failure.
    #[error("gave up after {attempts} attempts, last failure: {last_failure}")]
    Exhausted { attempts: u32, last_failure: String },
}

/// A WAN transition alarm that matched the watched interface but lacks
/// what the tracker needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedAlert {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unknown WAN state `{0}`")]
    UnknownState(String),
}

/// Fatal conditions of the poll loop.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("initial authentication failed: {0}")]
    InitialAuth(#[source] AuthError),
}
