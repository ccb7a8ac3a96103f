use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

use super::{read_definition, Config, Server};
use crate::error::DefinitionError;

/// One unit of remote computation.
///
/// Executed by value, the whole descriptor (including the nested server and
/// credential) is sent as the `processor` field of the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processor {
    /// Processor type (e.g. `openai-chat`, `elasticsearch-query`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider-specific configuration, not validated by the client
    #[serde(default)]
    pub config: Config,
    /// Server the processor runs on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,
}

impl Processor {
    /// Create a processor with an empty configuration and no server.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: Config::new(),
            server: None,
        }
    }

    /// Set a single configuration entry.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Replace the whole configuration map.
    pub fn with_config_map(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_server(mut self, server: Server) -> Self {
        self.server = Some(server);
        self
    }

    /// Load a processor descriptor from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        read_definition(path.as_ref())
    }
}

/// How a processor is addressed in an execution call.
///
/// `Entity` sends the full descriptor; `Id` designates a processor already
/// registered on the service, so no server or config is sent.
///
/// In JSON a string is an id and an object is an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessorRef {
    Id(String),
    Entity(Processor),
}

impl ProcessorRef {
    /// The remote identifier, when addressing by id.
    pub fn id(&self) -> Option<&str> {
        match self {
            ProcessorRef::Id(id) => Some(id),
            ProcessorRef::Entity(_) => None,
        }
    }

    /// The processor descriptor, when addressing by value.
    pub fn entity(&self) -> Option<&Processor> {
        match self {
            ProcessorRef::Id(_) => None,
            ProcessorRef::Entity(processor) => Some(processor),
        }
    }

    /// Addressing mode name used in logs.
    pub fn mode(&self) -> &'static str {
        match self {
            ProcessorRef::Id(_) => "id",
            ProcessorRef::Entity(_) => "entity",
        }
    }
}

impl fmt::Display for ProcessorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorRef::Id(id) => write!(f, "processor {}", id),
            ProcessorRef::Entity(processor) => write!(f, "{} processor", processor.kind),
        }
    }
}

impl From<Processor> for ProcessorRef {
    fn from(processor: Processor) -> Self {
        ProcessorRef::Entity(processor)
    }
}

impl From<&Processor> for ProcessorRef {
    fn from(processor: &Processor) -> Self {
        ProcessorRef::Entity(processor.clone())
    }
}

impl From<String> for ProcessorRef {
    fn from(id: String) -> Self {
        ProcessorRef::Id(id)
    }
}

impl From<&str> for ProcessorRef {
    fn from(id: &str) -> Self {
        ProcessorRef::Id(id.to_string())
    }
}

impl From<Uuid> for ProcessorRef {
    fn from(id: Uuid) -> Self {
        ProcessorRef::Id(id.to_string())
    }
}

impl From<&ProcessorRef> for ProcessorRef {
    fn from(processor: &ProcessorRef) -> Self {
        processor.clone()
    }
}
