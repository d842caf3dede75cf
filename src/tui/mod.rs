//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Streaming**: draws every ~80ms so deltas and the pulsing border show up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or terminal resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
pub mod emphasis;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::inference::{ChatCompletionsProvider, CompletionProvider, Transport};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const STREAMING_FRAME: Duration = Duration::from_millis(80);
const IDLE_FRAME: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub pulse_value: f32,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            pulse_value: 0.0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals without it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the chat-completions provider from resolved configuration.
pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn CompletionProvider> {
    Arc::new(ChatCompletionsProvider::new(
        config.base_url.clone(),
        config.api_key.clone(),
        config.request_timeout,
    ))
}

/// Carries out an effect returned by `update()`. Returns true on quit.
fn apply_effect(
    effect: Effect,
    app: &App,
    transport: &mut Transport,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::SpawnRequest { generation } => {
            transport.send(
                generation,
                app.conversation.messages(),
                &app.profile,
                tx.clone(),
            );
            false
        }
        Effect::CancelRequest => {
            transport.cancel();
            false
        }
        Effect::Quit => true,
    }
}

/// Maps a terminal event to a core action, routing editing keys to the input box.
fn dispatch(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::Escape if app.is_loading => Some(Action::CancelGeneration),
        TuiEvent::Escape | TuiEvent::Resize => None,
        TuiEvent::CycleProfile(field) => Some(Action::CycleProfile(*field)),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        _ => match tui.input_box.handle_event(event)? {
            InputEvent::Submit(text) => {
                // New turn: follow the reply even if the user had scrolled up
                tui.message_list.stick_to_bottom = true;
                Some(Action::Submit(text))
            }
            InputEvent::ContentChanged => None,
        },
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let mut transport = Transport::new(provider, config.model.clone());
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'event_loop: loop {
        tui.input_box.disabled = app.is_loading;

        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading {
            STREAMING_FRAME
        } else {
            IDLE_FRAME
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = dispatch(&event, &app, &mut tui) else {
                continue;
            };
            let effect = update(&mut app, action);
            if apply_effect(effect, &app, &mut transport, &tx) {
                break 'event_loop;
            }
            tui.input_box.disabled = app.is_loading;
        }

        // Streaming actions from the transport
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if apply_effect(effect, &app, &mut transport, &tx) {
                break 'event_loop;
            }
        }
    }

    transport.cancel();
    ratatui::restore();
    info!("Coach shutting down");
    Ok(())
}
