//! Reqwest-based HTTP transport adapter.
//!
//! Production implementation of the [`HttpClient`] trait.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, HttpRequest, RequestBody, Response};

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// The default client has no request timeout: waits are unbounded and the
/// execution timeout is enforced by the service.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Transport over a default `reqwest::Client`.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Transport over a caller-built `reqwest::Client`.
    ///
    /// Connection pooling, proxies and TLS are configured here by the caller.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Headers with non-UTF-8 values are skipped.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Build a reqwest POST from our request type.
    fn build(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(&request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.body {
            RequestBody::Raw(text) => builder.body(text.clone()),
            RequestBody::Json(value) => builder.json(value),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn post_stream(&self, request: &HttpRequest) -> Result<ByteStream, HttpError> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::Status { status, body });
        }

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(Box::pin(stream))
    }
}
