//! # Actions
//!
//! Everything that can happen in Coach becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A delta arrives? That's `Action::ResponseChunk { generation, text }`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! event loop must carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Response actions carry the generation id of the request that produced
//! them; anything from a superseded or cancelled request is dropped.

use log::{debug, info, warn};

use crate::core::profile::ProfileField;
use crate::core::state::{App, FALLBACK_REPLY};
use crate::core::stream::StreamState;
use crate::inference::{Message, ProviderError};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User sent a message.
    Submit(String),
    /// User advanced one of the profile selectors.
    CycleProfile(ProfileField),
    /// A delta for the given request.
    ResponseChunk { generation: u64, text: String },
    /// The given request's stream ended normally.
    ResponseDone { generation: u64 },
    /// The given request failed before or during streaming.
    ResponseFailed { generation: u64, error: ProviderError },
    /// User abandoned the in-flight response.
    CancelGeneration,
    Quit,
}

/// Side effects requested by `update()`, executed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Dispatch a request for the current transcript under this generation.
    SpawnRequest { generation: u64 },
    /// Cancel whatever request is in flight.
    CancelRequest,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            if text.trim().is_empty() {
                debug!("Ignoring empty submission");
                return Effect::None;
            }

            if let Some(previous) = app.stream.take() {
                info!(
                    "Superseding generation {} ({} deltas discarded)",
                    previous.generation(),
                    previous.delta_count()
                );
            }

            app.conversation.push(Message::user(text));

            let generation = app.next_generation;
            app.next_generation += 1;
            app.stream = Some(StreamState::new(generation));
            app.is_loading = true;
            app.status_message = String::from("Thinking...");
            Effect::SpawnRequest { generation }
        }
        Action::CycleProfile(field) => {
            app.profile.cycle(field);
            app.status_message = app.profile.label(field).to_string();
            Effect::None
        }
        Action::ResponseChunk { generation, text } => {
            match app.stream.as_mut() {
                Some(stream) if stream.generation() == generation => {
                    stream.append(&text);
                }
                _ => debug!("Dropping stale chunk from generation {generation}"),
            }
            Effect::None
        }
        Action::ResponseDone { generation } => {
            let Some(stream) = take_active(app, generation) else {
                debug!("Ignoring completion of stale generation {generation}");
                return Effect::None;
            };
            info!(
                "Generation {} complete: {} deltas, {} bytes",
                generation,
                stream.delta_count(),
                stream.partial_text().len()
            );
            app.conversation.push(stream.finalize());
            app.is_loading = false;
            app.status_message.clear();
            Effect::None
        }
        Action::ResponseFailed { generation, error } => {
            let Some(stream) = take_active(app, generation) else {
                debug!("Ignoring failure of stale generation {generation}: {error}");
                return Effect::None;
            };
            warn!(
                "Generation {} failed after {} deltas: {}",
                generation,
                stream.delta_count(),
                error
            );
            // Partial output is never presented as a finished answer.
            drop(stream);
            app.conversation.push(Message::assistant(FALLBACK_REPLY));
            app.is_loading = false;
            app.status_message = String::from("Connection problem");
            Effect::None
        }
        Action::CancelGeneration => match app.stream.take() {
            Some(stream) => {
                info!("Generation {} cancelled by user", stream.generation());
                app.is_loading = false;
                app.status_message = String::from("Cancelled");
                Effect::CancelRequest
            }
            None => Effect::None,
        },
        Action::Quit => Effect::Quit,
    }
}

/// Removes the active stream if it belongs to `generation`.
fn take_active(app: &mut App, generation: u64) -> Option<StreamState> {
    if app.active_generation() == Some(generation) {
        app.stream.take()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::SkinType;
    use crate::inference::Role;
    use crate::test_support::test_app;

    fn submit(app: &mut App, text: &str) -> u64 {
        match update(app, Action::Submit(text.to_string())) {
            Effect::SpawnRequest { generation } => generation,
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    fn chunk(generation: u64, text: &str) -> Action {
        Action::ResponseChunk {
            generation,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_submit_appends_user_message_and_starts_stream() {
        let mut app = test_app();
        let generation = submit(&mut app, "How do I start running?");

        assert!(app.is_loading);
        assert_eq!(app.active_generation(), Some(generation));
        assert_eq!(app.partial_text(), Some(""));
        let last = app.conversation.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "How do I start running?");
    }

    #[test]
    fn test_empty_or_whitespace_submit_issues_no_request() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit(String::new())), Effect::None);
        assert_eq!(update(&mut app, Action::Submit("  \n\t ".to_string())), Effect::None);
        assert!(!app.is_loading);
        assert_eq!(app.conversation.len(), 1);
    }

    #[test]
    fn test_done_commits_exact_concatenation() {
        let mut app = test_app();
        let generation = submit(&mut app, "hi");
        let deltas = ["Use ", "_niacinamide_", " daily", ".\n", "Stay hydrated!"];
        for d in deltas {
            update(&mut app, chunk(generation, d));
            assert!(app.partial_text().unwrap().ends_with(d));
        }
        assert_eq!(update(&mut app, Action::ResponseDone { generation }), Effect::None);

        assert!(!app.is_loading);
        assert!(app.stream.is_none());
        let last = app.conversation.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, deltas.concat());
    }

    #[test]
    fn test_failure_commits_single_fallback_and_drops_partial() {
        let mut app = test_app();
        let generation = submit(&mut app, "hi");
        update(&mut app, chunk(generation, "half an ans"));
        let before = app.conversation.len();

        update(
            &mut app,
            Action::ResponseFailed {
                generation,
                error: ProviderError::Network("connection reset".to_string()),
            },
        );

        assert_eq!(app.conversation.len(), before + 1);
        assert_eq!(app.conversation.last().unwrap().content, FALLBACK_REPLY);
        assert!(!app.is_loading);
        assert!(app.stream.is_none());
        assert!(
            !app.conversation
                .messages()
                .iter()
                .any(|m| m.content.contains("half an ans"))
        );
    }

    #[test]
    fn test_failure_before_any_delta_also_falls_back() {
        let mut app = test_app();
        let generation = submit(&mut app, "hi");
        update(
            &mut app,
            Action::ResponseFailed {
                generation,
                error: ProviderError::Api {
                    status: 500,
                    message: "boom".to_string(),
                },
            },
        );
        assert_eq!(app.conversation.last().unwrap().content, FALLBACK_REPLY);
        assert!(!app.is_loading);
    }

    #[test]
    fn test_submit_while_streaming_supersedes_previous_generation() {
        let mut app = test_app();
        let first = submit(&mut app, "first");
        update(&mut app, chunk(first, "old text"));

        let second = submit(&mut app, "second");
        assert_ne!(first, second);
        assert_eq!(app.partial_text(), Some(""));

        // Late output from the first request must not cross into the second
        update(&mut app, chunk(first, "stale"));
        update(&mut app, Action::ResponseDone { generation: first });
        assert!(app.is_loading);
        assert_eq!(app.partial_text(), Some(""));

        update(&mut app, chunk(second, "fresh"));
        update(&mut app, Action::ResponseDone { generation: second });
        let contents: Vec<&str> = app
            .conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(&contents[1..], &["first", "second", "fresh"]);
    }

    #[test]
    fn test_cancel_discards_partial_and_requests_cancellation() {
        let mut app = test_app();
        let generation = submit(&mut app, "hi");
        update(&mut app, chunk(generation, "partial"));
        let before = app.conversation.len();

        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::CancelRequest);
        assert!(!app.is_loading);
        assert!(app.stream.is_none());
        assert_eq!(app.conversation.len(), before);

        // A completion racing the cancel is ignored
        update(&mut app, Action::ResponseDone { generation });
        assert_eq!(app.conversation.len(), before);
    }

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::CancelGeneration), Effect::None);
        assert_eq!(app.status_message, "Welcome to Coach!");
    }

    #[test]
    fn test_cycle_profile_updates_prompt_for_next_request() {
        let mut app = test_app();
        update(&mut app, Action::CycleProfile(ProfileField::SkinType));
        assert_eq!(app.profile.skin_type, Some(SkinType::Oily));
        assert_eq!(app.status_message, "Oily");
        let outbound = app.outbound_messages();
        assert!(outbound[0].content.contains("Skin Type: oily"));
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
