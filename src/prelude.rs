//! Prelude module for convenient imports.
//!
//! ```ignore
//! use queryflow::prelude::*;
//! ```

// Client
pub use crate::client::{ProcessorStream, QueryFlowClient};
pub use crate::config::{ClientConfig, Deployment};

// Model types
pub use crate::models::{
    Config, Credential, Processor, ProcessorRef, Sequence, SequenceStep, Server, Timeout,
};

// Errors
pub use crate::error::{ClientError, ConfigError, QueryFlowResult, SequenceError};

// Transport
pub use crate::adapters::ReqwestHttpClient;
pub use crate::traits::{HttpClient, HttpError};
