use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Authentication payload for a [`Server`](super::Server).
///
/// The SDK never interprets the secret; it is forwarded verbatim as part of
/// the server descriptor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Credential type (e.g. `openai`, `elasticsearch`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Secret fields such as `apiKey` or `username`/`password`
    #[serde(default)]
    pub secret: BTreeMap<String, String>,
}

impl Credential {
    /// Create a credential with an empty secret.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            secret: BTreeMap::new(),
        }
    }

    /// Add a secret field.
    pub fn with_secret(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secret.insert(key.into(), value.into());
        self
    }
}

// Secret values stay out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .secret
            .keys()
            .map(|key| (key.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("Credential")
            .field("kind", &self.kind)
            .field("secret", &redacted)
            .finish()
    }
}
