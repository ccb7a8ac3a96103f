//! Entity model for processor execution.
//!
//! All types here are plain values. They carry no connection state and
//! never perform I/O on their own; only [`QueryFlowClient`](crate::client::QueryFlowClient)
//! talks to the network.
//!
//! - [`Credential`] is owned by a [`Server`]
//! - [`Server`] is owned by a [`Processor`]
//! - [`ProcessorRef`] addresses a processor by value or by remote id
//! - [`Sequence`] is an ordered list of [`SequenceStep`]s

mod credential;
mod processor;
mod sequence;
mod server;
mod timeout;

pub use credential::Credential;
pub use processor::{Processor, ProcessorRef};
pub use sequence::{Sequence, SequenceStep};
pub use server::Server;
pub use timeout::Timeout;

use std::path::Path;

use crate::error::DefinitionError;

/// Schema-less configuration bag attached to servers and processors.
pub type Config = serde_json::Map<String, serde_json::Value>;

/// Read and decode a JSON definition file.
pub(crate) fn read_definition<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, DefinitionError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DefinitionError::Json {
        path: display,
        source,
    })
}
