//! Sequence abort error.

use thiserror::Error;

use super::ClientError;

/// A sequence stopped at its first failing step.
///
/// Earlier steps are not rolled back and no partial result is returned.
/// For HTTP failures the display text is the failing response body, which
/// is what callers usually want to surface.
#[derive(Debug, Error)]
#[error("{}", display_failure(.source))]
pub struct SequenceError {
    /// Zero-based index of the failing step
    pub step: usize,
    /// Description of the failing step's processor
    pub processor: String,
    #[source]
    pub source: ClientError,
}

fn display_failure(source: &ClientError) -> String {
    match source {
        ClientError::Http { body, .. } => body.clone(),
        other => other.to_string(),
    }
}

impl SequenceError {
    /// Raw response body of the failing step, for HTTP failures.
    pub fn body(&self) -> Option<&str> {
        self.source.body()
    }

    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}
