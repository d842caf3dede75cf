use serde::{Deserialize, Serialize};

/// Opening line shown before the user has said anything. It is part of the
/// transcript and goes back to the model like any other assistant turn.
pub const GREETING: &str = "Hi! 👋 I'm your personal health and wellness coach. \
    Let's start by understanding your goals. Are you interested in skincare advice, \
    fitness guidance, or both?";

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The session transcript. Append-only: messages are never edited or removed
/// once pushed, and their order is exactly what the model sees next turn.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Creates a conversation seeded with the coach greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// A chunk of streamed output handed from a provider to the transport task.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Content(String),
}
