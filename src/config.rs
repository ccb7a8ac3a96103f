//! Client connection configuration.
//!
//! Holds the read-only settings shared by every call a client makes: the
//! service base URL, the API key and the deployment path.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Environment variable holding the service base URL.
pub const HOST_ENV: &str = "QF_HOST";
/// Environment variable holding the API key.
pub const KEY_ENV: &str = "QF_KEY";
/// Environment variable selecting the deployment (`inference` or `sandbox`).
pub const DEPLOYMENT_ENV: &str = "QF_DEPLOYMENT";

/// Which execution API of the service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// `/v2/inference/`
    #[default]
    Inference,
    /// `/v2/sandbox/`
    Sandbox,
}

impl Deployment {
    /// API path, with leading and trailing slash.
    pub fn path(&self) -> &'static str {
        match self {
            Deployment::Inference => "/v2/inference/",
            Deployment::Sandbox => "/v2/sandbox/",
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deployment::Inference => f.write_str("inference"),
            Deployment::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl FromStr for Deployment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inference" => Ok(Deployment::Inference),
            "sandbox" => Ok(Deployment::Sandbox),
            _ => Err(ConfigError::InvalidDeployment(s.to_string())),
        }
    }
}

/// Configuration for a [`QueryFlowClient`](crate::client::QueryFlowClient).
///
/// # Example
///
/// ```
/// use queryflow::config::{ClientConfig, Deployment};
///
/// let config = ClientConfig::new("https://qf.example.com/", "key")
///     .with_deployment(Deployment::Sandbox);
/// assert_eq!(config.endpoint(), "https://qf.example.com/v2/sandbox/");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// Sent as `x-api-key` on every request
    pub api_key: String,
    pub deployment: Deployment,
}

impl ClientConfig {
    /// Create a config for the inference deployment.
    ///
    /// Trailing slashes are trimmed from `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment: Deployment::default(),
        }
    }

    /// Set the deployment.
    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = deployment;
        self
    }

    /// Build the config from `QF_HOST`, `QF_KEY` and `QF_DEPLOYMENT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var(HOST_ENV).map_err(|_| ConfigError::MissingVar(HOST_ENV))?;
        let key = std::env::var(KEY_ENV).map_err(|_| ConfigError::MissingVar(KEY_ENV))?;
        let deployment = match std::env::var(DEPLOYMENT_ENV) {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Deployment::default(),
        };
        Ok(Self::new(host, key).with_deployment(deployment))
    }

    /// URL for by-value executions.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.deployment.path())
    }

    /// URL for executing a registered processor.
    pub fn processor_endpoint(&self, processor_id: &str) -> String {
        format!("{}{}{}", self.base_url, self.deployment.path(), processor_id)
    }
}

// The API key stays out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .finish()
    }
}
