//! # Application State
//!
//! Core business state for Coach. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── conversation: Conversation     // committed transcript
//! ├── profile: UserProfile           // selections feeding the system prompt
//! ├── stream: Option<StreamState>    // in-flight response, at most one
//! ├── is_loading: bool               // a request is outstanding
//! ├── next_generation: u64           // id for the next request
//! ├── status_message: String         // status bar text
//! └── model_name: String             // shown in the title bar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::profile::{self, UserProfile};
use crate::core::stream::StreamState;
use crate::inference::{Conversation, Message};

/// Assistant reply committed when a request fails at the transport level.
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. Please try again.";

pub struct App {
    pub conversation: Conversation,
    pub profile: UserProfile,
    pub stream: Option<StreamState>,
    pub is_loading: bool,
    pub next_generation: u64,
    pub status_message: String,
    pub model_name: String,
}

impl App {
    pub fn new(model_name: String) -> Self {
        Self {
            conversation: Conversation::new(),
            profile: UserProfile::default(),
            stream: None,
            is_loading: false,
            next_generation: 1,
            status_message: String::from("Welcome to Coach!"),
            model_name,
        }
    }

    /// Create an App from resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(config.display_model().to_string());
        app.profile = config.profile.clone();
        app
    }

    /// Text of the in-flight response, if one is streaming.
    pub fn partial_text(&self) -> Option<&str> {
        self.stream.as_ref().map(|s| s.partial_text())
    }

    /// Generation id of the in-flight request, if any.
    pub fn active_generation(&self) -> Option<u64> {
        self.stream.as_ref().map(|s| s.generation())
    }

    /// What the next request sends: system prompt + full transcript.
    pub fn outbound_messages(&self) -> Vec<Message> {
        profile::outbound_messages(&self.profile, self.conversation.messages())
    }
}
