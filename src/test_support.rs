//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::inference::{CompletionProvider, CompletionRequest, Message, ProviderError, StreamChunk};

/// What a `ScriptedProvider` does when asked for a completion.
pub enum ScriptedReply {
    /// Send these deltas, then finish normally.
    Deltas(Vec<String>),
    /// Send these deltas, then fail with the error.
    FailAfter(Vec<String>, ProviderError),
    /// Never finish until cancelled.
    Hang,
}

/// A provider that replays a fixed script and records what it was sent.
pub struct ScriptedProvider {
    reply: ScriptedReply,
    seen: Mutex<Vec<Message>>,
}

impl ScriptedProvider {
    pub fn new(reply: ScriptedReply) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Messages from the most recent request.
    pub fn last_messages(&self) -> Vec<Message> {
        self.seen.lock().unwrap().clone()
    }
}

async fn send_all(deltas: &[String], sender: &Sender<StreamChunk>) -> Result<(), ProviderError> {
    for d in deltas {
        sender
            .send(StreamChunk::Content(d.clone()))
            .await
            .map_err(|_| ProviderError::ChannelClosed)?;
    }
    Ok(())
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_completion(
        &self,
        request: CompletionRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        *self.seen.lock().unwrap() = request.messages.to_vec();
        match &self.reply {
            ScriptedReply::Deltas(deltas) => send_all(deltas, &sender).await,
            ScriptedReply::FailAfter(deltas, error) => {
                send_all(deltas, &sender).await?;
                Err(error.clone())
            }
            ScriptedReply::Hang => {
                request.cancel.cancelled().await;
                Err(ProviderError::Cancelled)
            }
        }
    }
}

/// Creates a test App.
pub fn test_app() -> App {
    App::new("test-model".to_string())
}
