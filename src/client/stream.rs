//! Decoded SSE stream of a streaming execution.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::ClientError;
use crate::sse::parse_data;
use crate::traits::ByteStream;

/// Lazy, forward-only stream of decoded SSE payloads.
///
/// Yields one string per chunk received from the service, in receipt order.
/// The connection is owned by this value and is released as soon as the
/// body ends, on the first error (the stream is fused afterwards), or when
/// the `ProcessorStream` is dropped before being exhausted.
pub struct ProcessorStream {
    inner: Option<ByteStream>,
    /// Bytes of a UTF-8 character split across chunks
    pending: Vec<u8>,
}

impl ProcessorStream {
    pub(crate) fn new(inner: ByteStream) -> Self {
        Self {
            inner: Some(inner),
            pending: Vec::new(),
        }
    }

    /// Whether the underlying connection is still held.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    fn release(&mut self) {
        if self.inner.take().is_some() && !self.pending.is_empty() {
            tracing::warn!(
                bytes = self.pending.len(),
                "Stream ended inside a UTF-8 sequence, dropping incomplete bytes"
            );
        }
        self.pending.clear();
    }

    /// Decode a chunk, carrying an incomplete trailing character over to
    /// the next chunk. Invalid bytes are replaced.
    fn decode_chunk(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let buffer = std::mem::take(&mut self.pending);
        let mut text = String::with_capacity(buffer.len());
        let mut rest = buffer.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // Checked by from_utf8 up to valid_up_to
                    text.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        text
    }
}

impl Stream for ProcessorStream {
    type Item = Result<String, ClientError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(Ok(chunk))) => {
                let text = this.decode_chunk(&chunk);
                Poll::Ready(Some(Ok(parse_data(&text))))
            }
            Poll::Ready(Some(Err(err))) => {
                this.release();
                Poll::Ready(Some(Err(err.into())))
            }
            Poll::Ready(None) => {
                this.release();
                Poll::Ready(None)
            }
        }
    }
}

impl std::fmt::Debug for ProcessorStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorStream")
            .field("open", &self.is_open())
            .field("pending", &self.pending.len())
            .finish()
    }
}
