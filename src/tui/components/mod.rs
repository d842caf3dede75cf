//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, model, status
//! - `ProfileBar`: the three profile selectors
//! - `Message`: one chat bubble
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: message field, owns its buffer
//! - `MessageList`: scrollable transcript, state in `MessageListState`
//!
//! Components receive external data as props rather than reaching into `App`,
//! which keeps each one testable against a `TestBackend`.

mod title_bar;
pub use title_bar::TitleBar;

mod profile_bar;
pub use profile_bar::ProfileBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};

pub mod message;

pub mod message_list;
pub use message_list::{MessageList, MessageListState};
