//! Provider for OpenAI-compatible `/chat/completions` endpoints.
//!
//! Sends the whole outbound message list with `stream: true` and decodes the
//! SSE body with [`SseDecoder`]. Every wait on the network (response headers,
//! then each body chunk) is bounded by the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::mpsc::Sender;

use crate::inference::sse::{SseDecoder, SseEvent};
use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError, StreamChunk};

/// The request body for the chat-completions endpoint
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [Message],
    stream: bool,
}

/// Chat-completions provider (hosted or local OpenAI-compatible server)
pub struct ChatCompletionsProvider {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// Creates a new provider.
    ///
    /// # Arguments
    /// * `base_url` - API root; `/chat/completions` is appended
    /// * `api_key` - Sent as a bearer token when present
    /// * `timeout` - Bound on each network wait
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends the request and waits for a success status.
    async fn send_request(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self.client.post(self.endpoint()).json(body);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_builder() {
                    ProviderError::Config(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            // The error body is bounded like every other network wait
            let err_body = match tokio::time::timeout(self.timeout, response.text()).await {
                Ok(Ok(text)) => text,
                Ok(Err(_)) => "unknown error".to_string(),
                Err(_) => {
                    warn!("Timed out reading error body after {:?}", self.timeout);
                    "unknown error".to_string()
                }
            };
            warn!("Chat API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        let body = ChatRequest {
            model: request.model,
            messages: request.messages,
            stream: true,
        };

        info!(
            "Chat request: endpoint={}, model={:?}, message_count={}",
            self.endpoint(),
            request.model,
            request.messages.len()
        );

        let mut response = tokio::select! {
            _ = request.cancel.cancelled() => return Err(ProviderError::Cancelled),
            result = self.send_request(&body) => result?,
        };

        let mut decoder = SseDecoder::new();
        let mut chunk_count = 0usize;
        let mut total_content_len = 0usize;

        loop {
            let next = tokio::select! {
                _ = request.cancel.cancelled() => {
                    info!("Stream cancelled after {} chunks", chunk_count);
                    return Err(ProviderError::Cancelled);
                }
                next = tokio::time::timeout(self.timeout, response.chunk()) => next,
            };

            let (events, body_ended) = match next
                .map_err(|_| ProviderError::Timeout(self.timeout))?
                .map_err(|e| ProviderError::Network(e.to_string()))?
            {
                Some(bytes) => {
                    debug!("Raw chunk received: {} bytes", bytes.len());
                    (decoder.feed(&bytes), false)
                }
                None => (decoder.finish(), true),
            };

            for event in events {
                match event {
                    SseEvent::Delta(text) => {
                        chunk_count += 1;
                        total_content_len += text.len();
                        if sender.send(StreamChunk::Content(text)).await.is_err() {
                            warn!("Content chunk send failed: receiver dropped");
                            return Err(ProviderError::ChannelClosed);
                        }
                    }
                    SseEvent::Done => {
                        info!(
                            "Stream complete: {} chunks, {} content bytes, {} skipped records",
                            chunk_count,
                            total_content_len,
                            decoder.skipped()
                        );
                        return Ok(());
                    }
                }
            }

            // A body that closes cleanly without the sentinel still ends the turn.
            if body_ended {
                info!(
                    "Stream ended without sentinel: {} chunks, {} content bytes",
                    chunk_count, total_content_len
                );
                return Ok(());
            }
        }
    }
}
