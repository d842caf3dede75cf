//! # Core Application Logic
//!
//! This module contains Coach's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │ Transport  │
//!             │  Adapter   │          │ (inference)│
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`stream`]: The in-flight response accumulator
//! - [`profile`]: Profile selections and the system prompt
//! - [`config`]: Config file, env, and CLI resolution

pub mod action;
pub mod config;
pub mod profile;
pub mod state;
pub mod stream;
