//! QueryFlow execution client.
//!
//! Runs processors against the service in three ways:
//! - [`QueryFlowClient::execute`]: one buffered request/response
//! - [`QueryFlowClient::execute_stream`]: a server-sent-event stream
//! - [`QueryFlowClient::execute_sequence`]: a pipeline of buffered calls
//!
//! Every operation takes anything convertible into a [`ProcessorRef`], so
//! the same call addresses a processor by value or by registered id.

mod stream;

pub use stream::ProcessorStream;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, QueryFlowResult, SequenceError};
use crate::models::{Processor, ProcessorRef, Sequence, Timeout};
use crate::traits::{HttpClient, HttpRequest, RequestBody};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const TIMEOUT_PARAM: &str = "timeout";

/// By-value request body.
#[derive(Serialize)]
struct ExecuteBody<'a> {
    processor: &'a Processor,
    input: &'a Value,
}

/// Client for executing processors on the service.
///
/// Holds only read-only configuration and a transport, so it is cheap to
/// clone and safe to share between tasks.
#[derive(Debug, Clone)]
pub struct QueryFlowClient<C = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl QueryFlowClient<ReqwestHttpClient> {
    /// Create a client using the reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, ReqwestHttpClient::new())
    }
}

impl<C: HttpClient> QueryFlowClient<C> {
    /// Create a client over a custom transport.
    pub fn with_http_client(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http_client(&self) -> &C {
        &self.http
    }

    /// Execute a processor and wait for its full result.
    ///
    /// A `204 No Content` answer yields an empty JSON object. Any other
    /// non-2xx answer fails with [`ClientError::Http`] carrying the raw
    /// response body.
    pub async fn execute(
        &self,
        processor: impl Into<ProcessorRef>,
        input: &Value,
        timeout: Option<&Timeout>,
    ) -> QueryFlowResult<Value> {
        let processor = processor.into();
        let request = self.build_request(&processor, input, timeout)?;

        tracing::debug!(
            url = %request.url,
            mode = processor.mode(),
            timeout = timeout.map(Timeout::as_str),
            "Executing processor"
        );

        let response = self.http.post(&request).await?;
        tracing::debug!(status = response.status, "Processor response received");

        if response.is_no_content() {
            return Ok(Value::Object(Map::new()));
        }

        if !response.is_success() {
            let err = ClientError::Http {
                status: response.status,
                body: response.text(),
            };
            tracing::warn!(
                status = response.status,
                code = err.error_code(),
                "{} failed",
                processor
            );
            return Err(err);
        }

        response.json().map_err(ClientError::Decode)
    }

    /// Execute a processor and stream its server-sent events.
    ///
    /// Each chunk received is decoded with [`parse_data`](crate::sse::parse_data)
    /// and yielded as one item. The connection is held by the returned
    /// [`ProcessorStream`] and released when it is exhausted or dropped.
    pub async fn execute_stream(
        &self,
        processor: impl Into<ProcessorRef>,
        input: &Value,
        timeout: Option<&Timeout>,
    ) -> QueryFlowResult<ProcessorStream> {
        let processor = processor.into();
        let request = self
            .build_request(&processor, input, timeout)?
            .with_header("Accept", "text/event-stream");

        tracing::debug!(
            url = %request.url,
            mode = processor.mode(),
            timeout = timeout.map(Timeout::as_str),
            "Opening processor stream"
        );

        let bytes = self.http.post_stream(&request).await.map_err(|err| {
            let err = ClientError::from(err);
            tracing::warn!(code = err.error_code(), "{} stream failed: {}", processor, err);
            err
        })?;

        Ok(ProcessorStream::new(bytes))
    }

    /// Run the steps of a sequence in order, feeding each step's output to
    /// the next step.
    ///
    /// The first failing step aborts the sequence. Steps already executed
    /// are not undone and no partial result is returned. An empty sequence
    /// returns `input` unchanged.
    pub async fn execute_sequence(
        &self,
        sequence: &Sequence,
        input: Value,
    ) -> Result<Value, SequenceError> {
        let total = sequence.len();
        let mut current = input;

        for (step, entry) in sequence.steps.iter().enumerate() {
            tracing::info!(step = step + 1, total, "Running sequence step: {}", entry.processor);

            current = self
                .execute(&entry.processor, &current, entry.timeout.as_ref())
                .await
                .map_err(|source| {
                    tracing::warn!(step = step + 1, total, "Sequence aborted: {}", source);
                    SequenceError {
                        step,
                        processor: entry.processor.to_string(),
                        source,
                    }
                })?;
        }

        tracing::info!(total, "Sequence completed");
        Ok(current)
    }

    /// Build the request shared by buffered and streaming executions.
    fn build_request(
        &self,
        processor: &ProcessorRef,
        input: &Value,
        timeout: Option<&Timeout>,
    ) -> QueryFlowResult<HttpRequest> {
        let request = match processor {
            ProcessorRef::Entity(entity) => {
                let body = serde_json::to_string(&ExecuteBody {
                    processor: entity,
                    input,
                })
                .map_err(ClientError::Encode)?;
                HttpRequest::new(self.config.endpoint(), RequestBody::Raw(body))
                    .with_header("Content-Type", "application/json")
            }
            ProcessorRef::Id(id) => HttpRequest::new(
                self.config.processor_endpoint(id),
                RequestBody::Json(input.clone()),
            ),
        }
        .with_header(API_KEY_HEADER, self.config.api_key.as_str());

        Ok(match timeout {
            Some(timeout) => request.with_query(TIMEOUT_PARAM, timeout.as_str()),
            None => request,
        })
    }
}
