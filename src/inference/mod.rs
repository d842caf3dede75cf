pub mod provider;
pub mod providers;
pub mod sse;
pub mod transport;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::ChatCompletionsProvider;
pub use transport::Transport;
pub use types::{Conversation, Message, Role, StreamChunk};
