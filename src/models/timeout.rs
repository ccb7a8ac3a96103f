use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Server-observed execution timeout, as an ISO-8601 duration (`PT30S`).
///
/// The value is passed through as the `timeout` query parameter without
/// validation; the service decides how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeout(String);

impl Timeout {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timeout {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Timeout {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Renders as `PT<seconds>S` with millisecond precision.
impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        let secs = duration.as_secs();
        let millis = duration.subsec_millis();
        if millis == 0 {
            Self(format!("PT{}S", secs))
        } else {
            let fraction = format!("{:03}", millis);
            Self(format!("PT{}.{}S", secs, fraction.trim_end_matches('0')))
        }
    }
}
