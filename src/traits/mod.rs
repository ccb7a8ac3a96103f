//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - buffered and streaming POST transport

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, HttpRequest, RequestBody, Response};
