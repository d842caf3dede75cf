//! # Transport
//!
//! Dispatches one streamed completion per user turn and reports back to the
//! event loop as `Action`s, in order: zero or more `ResponseChunk`s, then
//! exactly one `ResponseDone` or `ResponseFailed`. A cancelled request
//! reports nothing further.
//!
//! Each request owns a `CancellationToken`. Sending a new request cancels
//! the previous token first, so two streams never write to the UI at once.

use std::sync::{Arc, mpsc};

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::core::action::Action;
use crate::core::profile::{self, UserProfile};
use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError, StreamChunk};

/// Capacity of the provider → transport chunk channel.
const CHUNK_BUFFER: usize = 100;

pub struct Transport {
    provider: Arc<dyn CompletionProvider>,
    model: Option<String>,
    active: Option<CancellationToken>,
}

impl Transport {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: Option<String>) -> Self {
        Self {
            provider,
            model,
            active: None,
        }
    }

    /// Sends `[system(profile)] + history` and streams the reply as actions
    /// tagged with `generation`. Must be called inside a tokio runtime.
    pub fn send(
        &mut self,
        generation: u64,
        history: &[Message],
        profile: &UserProfile,
        tx: mpsc::Sender<Action>,
    ) -> CancellationToken {
        self.cancel();

        let token = CancellationToken::new();
        self.active = Some(token.clone());

        let messages = profile::outbound_messages(profile, history);
        info!(
            "Spawning request: generation={}, provider={}, messages={}",
            generation,
            self.provider.name(),
            messages.len()
        );

        let provider = self.provider.clone();
        let model = self.model.clone();
        let cancel = token.clone();

        tokio::spawn(async move {
            let (chunk_tx, mut chunk_rx) = tokio::sync::mpsc::channel::<StreamChunk>(CHUNK_BUFFER);

            let request = CompletionRequest {
                messages: &messages,
                model: model.as_deref(),
                cancel: cancel.clone(),
            };

            let forward = async {
                let mut forwarded = 0usize;
                while let Some(chunk) = chunk_rx.recv().await {
                    let StreamChunk::Content(text) = chunk;
                    if cancel.is_cancelled() {
                        continue;
                    }
                    forwarded += 1;
                    if tx.send(Action::ResponseChunk { generation, text }).is_err() {
                        warn!("Failed to forward ResponseChunk: receiver dropped");
                        break;
                    }
                }
                forwarded
            };

            let (result, forwarded) =
                tokio::join!(provider.stream_completion(request, chunk_tx), forward);

            let action = match result {
                Err(ProviderError::Cancelled) => {
                    debug!("Generation {generation} cancelled after {forwarded} chunks");
                    return;
                }
                _ if cancel.is_cancelled() => return,
                Ok(()) => {
                    info!("Generation {generation} finished: {forwarded} chunks forwarded");
                    Action::ResponseDone { generation }
                }
                Err(error) => {
                    info!("Generation {generation} failed: {error}");
                    Action::ResponseFailed { generation, error }
                }
            };

            if tx.send(action).is_err() {
                warn!("Failed to send terminal action: receiver dropped");
            }
        });

        token
    }

    /// Cancels the in-flight request, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.active.take() {
            debug!("Cancelling in-flight request");
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}
