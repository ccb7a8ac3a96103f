//! Errors returned by processor executions.

use thiserror::Error;

use crate::traits::HttpError;

/// Error from a single `execute` or `execute_stream` call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a usable response (connection refused,
    /// broken stream, invalid URL). The transport error is kept unchanged.
    #[error("{0}")]
    Transport(HttpError),

    /// The service answered with a non-2xx status other than 204.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A success response carried a body that is not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the failed response, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of the failed response, if the service answered.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(HttpError::ConnectionFailed(_)) => "E_NET_CONN",
            ClientError::Transport(HttpError::Timeout(_)) => "E_NET_TIMEOUT",
            ClientError::Transport(HttpError::InvalidUrl(_)) => "E_NET_URL",
            ClientError::Transport(HttpError::Io(_)) => "E_NET_IO",
            ClientError::Transport(_) => "E_NET_OTHER",
            ClientError::Http { .. } => "E_HTTP_STATUS",
            ClientError::Decode(_) => "E_DECODE",
            ClientError::Encode(_) => "E_ENCODE",
        }
    }
}

impl From<HttpError> for ClientError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, body } => ClientError::Http { status, body },
            other => ClientError::Transport(other),
        }
    }
}
