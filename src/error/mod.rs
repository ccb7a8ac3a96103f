//! Error types for the QueryFlow SDK.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`HttpError`](crate::traits::HttpError) | transport implementations |
//! | [`ClientError`] | `execute` / `execute_stream` |
//! | [`SequenceError`] | `execute_sequence` |
//! | [`ConfigError`] | [`ClientConfig::from_env`](crate::config::ClientConfig::from_env) |
//! | [`DefinitionError`] | loading processor or sequence JSON files |
//!
//! Nothing is retried and nothing is swallowed: every failure reaches the
//! caller.

mod client;
mod sequence;

pub use client::ClientError;
pub use sequence::SequenceError;

use thiserror::Error;

/// Type alias for Results of single processor executions.
pub type QueryFlowResult<T> = Result<T, ClientError>;

/// Invalid or missing client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Unknown deployment '{0}' (expected 'inference' or 'sandbox')")]
    InvalidDeployment(String),
}

/// A processor or sequence definition file could not be loaded.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid definition in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
