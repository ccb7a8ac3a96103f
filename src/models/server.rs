use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Config, Credential};

/// Remote backend (AI provider, search engine, ...) a processor runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Server type (e.g. `openai`, `elasticsearch`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider-specific configuration, not validated by the client
    #[serde(default)]
    pub config: Config,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
}

impl Server {
    /// Create a server with an empty configuration and no credential.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            config: Config::new(),
            credential: None,
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

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }
}
