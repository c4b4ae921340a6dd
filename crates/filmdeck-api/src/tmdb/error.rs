//! TMDB request failure type.

use reqwest::StatusCode;

/// Error returned by every TMDB request.
///
/// There is a single kind: the request did not produce a usable payload.
/// The underlying status or cause is kept in [`FailureCause`].
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// Transport error, non-success HTTP status, or undecodable body.
    #[error("TMDB request failed: {path}: {cause}")]
    NetworkFailure {
        /// Request path relative to the API base URL.
        path: String,
        /// What went wrong.
        #[source]
        cause: FailureCause,
    },
}

/// Underlying cause of a [`TmdbError::NetworkFailure`].
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    /// The request URL could not be built.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[source] url::ParseError),
    /// Connection, TLS, or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// TMDB `status_message`, or the raw body when it is not a TMDB error envelope.
        message: String,
    },
    /// The body was not the JSON shape expected for this endpoint.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TmdbError {
    /// Wraps a cause for the given request path.
    pub(crate) fn network(path: &str, cause: FailureCause) -> Self {
        Self::NetworkFailure {
            path: String::from(path),
            cause,
        }
    }

    /// Returns the HTTP status when the server answered with one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NetworkFailure { cause, .. } => match cause {
                FailureCause::Status { status, .. } => Some(*status),
                FailureCause::Transport(err) => err.status(),
                FailureCause::InvalidUrl(_) | FailureCause::Decode(_) => None,
            },
        }
    }

    /// Returns the request path that failed.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NetworkFailure { path, .. } => path,
        }
    }
}
