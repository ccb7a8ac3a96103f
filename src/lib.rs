//! QueryFlow SDK - a client for executing QueryFlow processors
//!
//! Processors are addressed either by value (a [`models::Processor`]
//! descriptor sent with the request) or by the id under which they are
//! registered on the service. Results come back buffered, as a stream of
//! server-sent events, or chained through a [`models::Sequence`].
//!
//! ```no_run
//! use queryflow::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), ClientError> {
//! let client = QueryFlowClient::new(ClientConfig::new("https://qf.example.com", "key"));
//! let result = client.execute("processor-id", &json!({"q": "hello"}), None).await?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod sse;
pub mod traits;
