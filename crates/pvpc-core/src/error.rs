// ── Core error types ──
//
// A collection fails in one of two ways: the request never produced a usable
// response (transport), or the response could not be decoded (decode). The
// underlying `pvpc_api::Error` is kept intact as the source.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// DNS, connect, timeout, or non-success HTTP status.
    #[error("Price request failed: {0}")]
    Transport(#[source] pvpc_api::Error),

    /// Body was not JSON, did not match the envelope, or carried a
    /// timestamp that is not RFC 3339.
    #[error("Price response could not be decoded: {0}")]
    Decode(#[source] pvpc_api::Error),

    /// Collector could not be set up from its configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the request hit the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// The API-layer error behind a transport or decode failure.
    pub fn api_error(&self) -> Option<&pvpc_api::Error> {
        match self {
            Self::Transport(e) | Self::Decode(e) => Some(e),
            Self::Config { .. } => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pvpc_api::Error> for CoreError {
    fn from(err: pvpc_api::Error) -> Self {
        match err {
            pvpc_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            pvpc_api::Error::ClientBuild(message) => CoreError::Config { message },
            err if err.is_decode() => CoreError::Decode(err),
            err => CoreError::Transport(err),
        }
    }
}
