//! HTTP transport trait abstraction.
//!
//! The execution client only needs POST in two flavours: buffered (wait for
//! the whole body) and streamed (hand back the body as raw chunks). Both are
//! behind [`HttpClient`] so the client can run against reqwest in production
//! and against [`MockHttpClient`](crate::adapters::MockHttpClient) in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Raw response body chunks of a streaming request.
///
/// Dropping the stream closes the underlying connection.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Pre-encoded text sent as is; the caller sets `Content-Type`.
    Raw(String),
    /// Structured value encoded by the transport, which also sets the JSON
    /// content type.
    Json(Value),
}

impl RequestBody {
    /// Body as text, as it would go on the wire.
    pub fn to_text(&self) -> String {
        match self {
            RequestBody::Raw(text) => text.clone(),
            RequestBody::Json(value) => value.to_string(),
        }
    }

    /// Body decoded as JSON, if it is valid JSON.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            RequestBody::Raw(text) => serde_json::from_str(text).ok(),
            RequestBody::Json(value) => Some(value.clone()),
        }
    }
}

/// A single POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    /// Query parameters in the order they are appended
    pub query: Vec<(String, String)>,
    pub headers: Headers,
    pub body: RequestBody,
}

impl HttpRequest {
    /// Create a request with no query parameters or headers.
    pub fn new(url: impl Into<String>, body: RequestBody) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Headers::new(),
            body,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a 200 response with a JSON body.
    pub fn json_body(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check for `204 No Content`.
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// HTTP transport errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server answered a streaming request with a non-2xx status
    Status { status: u16, body: String },
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for the POST operations the execution client performs.
///
/// Implementations must not retry and must not impose a client-side
/// timeout: the execution timeout is a server-side query parameter.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a buffered POST.
    ///
    /// Returns the response for any status code; interpreting the status is
    /// up to the caller.
    async fn post(&self, request: &HttpRequest) -> Result<Response, HttpError>;

    /// Perform a POST and return the response body as a stream of chunks.
    ///
    /// A non-2xx status is reported as [`HttpError::Status`] before any
    /// chunk is produced.
    async fn post_stream(&self, request: &HttpRequest) -> Result<ByteStream, HttpError>;
}
