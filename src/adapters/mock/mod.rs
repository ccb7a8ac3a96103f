//! Mock implementations for testing.
//!
//! Enables exercising the execution client without network access.
//!
//! - [`MockHttpClient`] - HTTP transport with configurable responses

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
