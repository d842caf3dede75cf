use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;

use super::types::{Message, StreamChunk};

/// Errors that can occur during provider operations.
///
/// Every variant except `Cancelled` ends a turn with the fallback message;
/// none of them is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider misconfigured (bad URL, unusable API key header).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset mid-body).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// No response headers, or no body bytes, within the request timeout.
    Timeout(Duration),
    /// The request was superseded or cancelled by the user.
    Cancelled,
    /// The mpsc channel was closed (transport task dropped the receiver).
    ChannelClosed,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Timeout(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
            ProviderError::Cancelled => write!(f, "request cancelled"),
            ProviderError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    /// Full outbound list: system prompt first, then the transcript.
    pub messages: &'a [Message],
    /// Model name; omitted from the body when `None`.
    pub model: Option<&'a str>,
    /// Cancelled when a newer request supersedes this one.
    pub cancel: CancellationToken,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Streams a completion, sending each text delta to `sender` in arrival order.
    /// Returns `Ok(())` once the stream has ended normally.
    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError>;
}
