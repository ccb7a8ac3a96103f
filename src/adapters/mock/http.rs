//! In-memory transport for exercising the execution client.
//!
//! Provides a configurable mock transport that returns predefined responses
//! or errors, records every request, and tracks how many streams it has
//! handed out that are still alive.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, HttpClient, HttpError, HttpRequest, Response};

/// A request seen by the mock, kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// `POST` or `POST (stream)`
    pub method: String,
    pub request: HttpRequest,
}

impl RecordedRequest {
    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// Whether the request went through `post_stream`.
    pub fn is_stream(&self) -> bool {
        self.method == "POST (stream)"
    }
}

/// Canned answer for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return an error
    Error(HttpError),
    /// Return a stream of chunks
    Stream(Vec<Bytes>),
    /// Return a stream that yields the chunks, then fails
    StreamThenError(Vec<Bytes>, HttpError),
}

/// Recording [`HttpClient`] with canned answers.
///
/// Responses are looked up in this order: queued responses for the exact
/// URL (consumed one per request), the fixed response for the exact URL, a
/// fixed response whose URL is a prefix of the request URL, the default.
///
/// # Example
///
/// ```ignore
/// use queryflow::adapters::mock::{MockHttpClient, MockResponse};
/// use queryflow::traits::Response;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://api.example.com/v2/inference/",
///     MockResponse::Success(Response::new(200, r#"{"ok":true}"#)),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Fixed responses, by exact URL or URL prefix
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// One-shot responses by exact URL
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Fallback when nothing else matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Every request, in arrival order
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Streams handed out and not yet dropped
    open_streams: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a mock with no responses configured.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            queued: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer every request to `url` (or below it) with `response`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Queue a one-shot response for an exact URL.
    ///
    /// Queued responses are returned in FIFO order before any fixed
    /// response for the same URL.
    pub fn queue_response(&self, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued.entry(url.to_string()).or_default().push_back(response);
    }

    /// Answer requests no other response matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Snapshot of the requests seen so far.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Forget the requests seen so far.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of streams handed out that have not been dropped yet.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    fn record_request(&self, method: &str, request: &HttpRequest) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            request: request.clone(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn tracked(&self, items: Vec<Result<Bytes, HttpError>>) -> ByteStream {
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedStream {
            items: items.into(),
            open_streams: Arc::clone(&self.open_streams),
        })
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream that decrements the owner's open-stream counter when dropped.
struct TrackedStream {
    items: VecDeque<Result<Bytes, HttpError>>,
    open_streams: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.get_mut().items.pop_front())
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.record_request("POST", request);

        match self.get_response(&request.url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(_)) | Some(MockResponse::StreamThenError(..)) => Err(
                HttpError::Other("Stream response on non-stream request".to_string()),
            ),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }

    async fn post_stream(&self, request: &HttpRequest) -> Result<ByteStream, HttpError> {
        self.record_request("POST (stream)", request);

        match self.get_response(&request.url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(self.tracked(chunks.into_iter().map(Ok).collect()))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let mut items: Vec<_> = chunks.into_iter().map(Ok).collect();
                items.push(Err(err));
                Ok(self.tracked(items))
            }
            // Mirrors the reqwest adapter: non-2xx fails before streaming
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::Status {
                    status: response.status,
                    body: response.text(),
                })
            }
            Some(MockResponse::Success(response)) => Ok(self.tracked(vec![Ok(response.body)])),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RequestBody;
    use futures_util::StreamExt;
    use serde_json::json;

    fn request(url: &str) -> HttpRequest {
        HttpRequest::new(url, RequestBody::Json(json!({})))
    }

    #[test]
    fn test_mock_http_client_new() {
        let client = MockHttpClient::new();
        assert!(client.get_requests().is_empty());
        assert_eq!(client.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_post_with_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://qf.test/v2/inference/abc",
            MockResponse::Success(Response::new(201, r#"{"id": 1}"#)),
        );

        let response = client
            .post(&request("http://qf.test/v2/inference/abc").with_header("x-api-key", "k"))
            .await
            .unwrap();
        assert_eq!(response.status, 201);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].url(), "http://qf.test/v2/inference/abc");
        assert_eq!(requests[0].request.header("x-api-key"), Some("k"));
        assert!(!requests[0].is_stream());
    }

    #[tokio::test]
    async fn test_queued_responses_before_fixed() {
        let client = MockHttpClient::new();
        let url = "http://qf.test/v2/inference/abc";
        client.set_response(url, MockResponse::Success(Response::new(200, "fixed")));
        client.queue_response(url, MockResponse::Success(Response::new(200, "first")));
        client.queue_response(url, MockResponse::Success(Response::new(200, "second")));

        let mut bodies = Vec::new();
        for _ in 0..3 {
            bodies.push(client.post(&request(url)).await.unwrap().text());
        }
        assert_eq!(bodies, vec!["first", "second", "fixed"]);
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.post(&request("http://qf.test/v2/inference/missing")).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_prefix_and_default_match() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://qf.test/v2/inference/",
            MockResponse::Success(Response::new(200, "prefix")),
        );
        client.set_default_response(MockResponse::Success(Response::new(404, "default")));

        let prefixed = client
            .post(&request("http://qf.test/v2/inference/abc-123"))
            .await
            .unwrap();
        assert_eq!(prefixed.text(), "prefix");

        let fallback = client
            .post(&request("http://qf.test/v2/sandbox/abc-123"))
            .await
            .unwrap();
        assert_eq!(fallback.status, 404);
    }

    #[tokio::test]
    async fn test_stream_tracks_open_connections() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://qf.test/v2/inference/chat",
            MockResponse::Stream(vec![Bytes::from("chunk1"), Bytes::from("chunk2")]),
        );

        let mut stream = client
            .post_stream(&request("http://qf.test/v2/inference/chat"))
            .await
            .unwrap();
        assert_eq!(client.open_streams(), 1);

        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from("chunk1"));
        drop(stream);
        assert_eq!(client.open_streams(), 0);
        assert!(client.get_requests()[0].is_stream());
    }

    #[tokio::test]
    async fn test_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://qf.test/v2/inference/chat",
            MockResponse::StreamThenError(
                vec![Bytes::from("ok")],
                HttpError::Io("reset".to_string()),
            ),
        );

        let items: Vec<_> = client
            .post_stream(&request("http://qf.test/v2/inference/chat"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert_eq!(items[1], Err(HttpError::Io("reset".to_string())));
    }

    #[tokio::test]
    async fn test_stream_error_status_fails_before_streaming() {
        let client = MockHttpClient::new();
        client.set_response(
            "http://qf.test/v2/inference/chat",
            MockResponse::Success(Response::new(401, "unauthorized")),
        );

        let result = client.post_stream(&request("http://qf.test/v2/inference/chat")).await;
        match result {
            Err(HttpError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            _ => panic!("Expected status error"),
        }
        assert_eq!(client.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Success(Response::new(200, "{}")));

        let cloned = client.clone();
        cloned.post(&request("http://qf.test/v2/inference/")).await.unwrap();

        assert_eq!(client.get_requests().len(), 1);
        client.clear_requests();
        assert!(cloned.get_requests().is_empty());
    }
}
