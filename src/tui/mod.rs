//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the session,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy**: draws every ~80ms so the loading spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or responses.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod palette;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, PendingRequest, SubmitOrigin, update};
use crate::core::config::ResolvedConfig;
use crate::core::controller::Controller;
use crate::core::state::Session;
use crate::core::theme::{Theme, ThemeStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{EXAMPLE_PROMPTS, InputEvent, QueryInput, TranscriptState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::palette::Palette;

/// TUI-specific presentation state (not part of the session)
pub(crate) struct TuiState {
    pub transcript: TranscriptState,
    pub input: QueryInput,
    /// Highlighted follow-up of the latest assistant entry (Tab/Shift+Tab).
    pub selected_suggestion: Option<usize>,
    pub theme: Theme,
    theme_store: ThemeStore,
}

impl TuiState {
    pub fn new(theme: Theme, theme_store: ThemeStore) -> Self {
        Self {
            transcript: TranscriptState::new(),
            input: QueryInput::new(Palette::for_theme(theme)),
            selected_suggestion: None,
            theme,
            theme_store,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme)
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        info!("Theme switched to {}", self.theme.label());
        if let Err(e) = self.theme_store.save(self.theme) {
            warn!("Failed to save theme preference: {}", e);
        }
    }
}

/// What the event loop does after one event.
#[derive(Debug, PartialEq)]
enum Dispatch {
    Continue,
    Spawn(PendingRequest),
    Quit,
}

impl From<Effect> for Dispatch {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::None => Dispatch::Continue,
            Effect::SpawnRequest(request) => Dispatch::Spawn(request),
            Effect::Quit => Dispatch::Quit,
        }
    }
}

/// Follow-ups offered by the latest assistant entry. Empty while busy or
/// when that entry is an error.
fn live_suggestions(session: &Session) -> Vec<String> {
    if session.busy {
        return Vec::new();
    }
    session
        .last_assistant()
        .and_then(|entry| entry.payload.as_ref())
        .filter(|payload| payload.error_message().is_none())
        .and_then(|payload| payload.follow_up_suggestions.clone())
        .unwrap_or_default()
}

fn cycle(selected: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (selected, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    })
}

fn dispatch(session: &mut Session, tui: &mut TuiState, event: TuiEvent) -> Dispatch {
    tui.input.disabled = session.busy;

    match event {
        TuiEvent::Resize => Dispatch::Continue,
        TuiEvent::ForceQuit => update(session, Action::Quit).into(),
        TuiEvent::Quit => {
            if tui.selected_suggestion.take().is_some() {
                return Dispatch::Continue;
            }
            update(session, Action::Quit).into()
        }
        TuiEvent::ToggleTheme => {
            tui.toggle_theme();
            Dispatch::Continue
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.transcript.handle_event(&event);
            Dispatch::Continue
        }
        TuiEvent::NextSuggestion | TuiEvent::PrevSuggestion => {
            let len = live_suggestions(session).len();
            tui.selected_suggestion = cycle(
                tui.selected_suggestion,
                len,
                event == TuiEvent::NextSuggestion,
            );
            Dispatch::Continue
        }
        TuiEvent::ExamplePrompt(index) => {
            if let Some(prompt) = EXAMPLE_PROMPTS.get(index)
                && !session.busy
            {
                update(session, Action::DraftChanged(prompt.to_string()));
                tui.input.sync(&session.draft);
            }
            Dispatch::Continue
        }
        TuiEvent::Submit if tui.selected_suggestion.is_some() && !session.busy => {
            let chosen = tui
                .selected_suggestion
                .take()
                .and_then(|i| live_suggestions(session).into_iter().nth(i));
            match chosen {
                Some(text) => update(
                    session,
                    Action::Submit {
                        text,
                        origin: SubmitOrigin::FollowUp,
                    },
                )
                .into(),
                None => Dispatch::Continue,
            }
        }
        other => match tui.input.handle_event(&other) {
            Some(InputEvent::Changed) => {
                tui.selected_suggestion = None;
                update(session, Action::DraftChanged(tui.input.buffer.clone()));
                Dispatch::Continue
            }
            Some(InputEvent::Submit(text)) => {
                let effect = update(
                    session,
                    Action::Submit {
                        text,
                        origin: SubmitOrigin::Draft,
                    },
                );
                tui.input.sync(&session.draft);
                effect.into()
            }
            None => Dispatch::Continue,
        },
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            // Key release reporting; release events are filtered in event.rs
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
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

/// Runs the interactive UI until the user quits.
///
/// Must be called from inside a tokio runtime: requests are spawned onto it.
pub fn run(controller: Controller, config: &ResolvedConfig) -> std::io::Result<()> {
    let theme_store = ThemeStore::default_location();
    let theme = theme_store.initial(config.default_theme);
    let mut session = Session::new();
    let mut tui = TuiState::new(theme, theme_store);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        if session.busy {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| {
                ui::draw_ui(f, &session, &mut tui, &config.backend_url, spinner_frame)
            })?;
            needs_redraw = false;
        }

        let timeout = if session.busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match dispatch(&mut session, &mut tui, event) {
                Dispatch::Continue => {}
                Dispatch::Spawn(request) => {
                    controller.spawn(request, tx.clone());
                }
                Dispatch::Quit => {
                    should_quit = true;
                    break;
                }
            }
        }

        if should_quit {
            break;
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            // Any previous highlight pointed into the old suggestions.
            tui.selected_suggestion = None;
            if let Effect::SpawnRequest(request) = update(&mut session, action) {
                controller.spawn(request, tx.clone());
            }
        }
    }

    info!("Exiting with {} transcript entries", session.transcript.len());
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ResponsePayload;
    use crate::core::state::Role;
    use serde_json::json;

    fn tui_state() -> TuiState {
        TuiState::new(Theme::Dark, ThemeStore::at("/nonexistent/dir/theme"))
    }

    fn type_str(session: &mut Session, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            dispatch(session, tui, TuiEvent::InputChar(c));
        }
    }

    /// Session with one answered exchange that offers two follow-ups.
    fn answered_session() -> Session {
        let mut session = Session::new();
        update(
            &mut session,
            Action::Submit {
                text: "Solar".into(),
                origin: SubmitOrigin::Draft,
            },
        );
        let payload: ResponsePayload = serde_json::from_value(json!({
            "follow_up_suggestions": ["Tell me more", "Compare with wind"]
        }))
        .unwrap();
        update(
            &mut session,
            Action::ResponseReceived {
                seq: 0,
                outcome: Ok(payload),
            },
        );
        session
    }

    #[test]
    fn test_typing_updates_draft_and_enter_submits() {
        let mut session = Session::new();
        let mut tui = tui_state();
        type_str(&mut session, &mut tui, "Solar power");
        assert_eq!(session.draft, "Solar power");

        let outcome = dispatch(&mut session, &mut tui, TuiEvent::Submit);
        let Dispatch::Spawn(request) = outcome else {
            panic!("expected a spawned request, got {:?}", outcome);
        };
        assert_eq!(request.query, "Solar power");
        assert!(session.busy);
        assert!(session.draft.is_empty());
        assert!(tui.input.buffer.is_empty());
    }

    #[test]
    fn test_input_ignored_while_busy() {
        let mut session = Session::new();
        let mut tui = tui_state();
        type_str(&mut session, &mut tui, "first");
        dispatch(&mut session, &mut tui, TuiEvent::Submit);

        type_str(&mut session, &mut tui, "second");
        assert!(session.draft.is_empty());
        assert_eq!(
            dispatch(&mut session, &mut tui, TuiEvent::Submit),
            Dispatch::Continue
        );
        assert_eq!(session.transcript.len(), 1);
    }

    #[test]
    fn test_example_prompt_fills_draft() {
        let mut session = Session::new();
        let mut tui = tui_state();
        dispatch(&mut session, &mut tui, TuiEvent::ExamplePrompt(1));
        assert_eq!(session.draft, EXAMPLE_PROMPTS[1]);
        assert_eq!(tui.input.buffer, EXAMPLE_PROMPTS[1]);

        dispatch(&mut session, &mut tui, TuiEvent::ExamplePrompt(7));
        assert_eq!(session.draft, EXAMPLE_PROMPTS[1]);
    }

    #[test]
    fn test_tab_cycles_suggestions() {
        let mut session = answered_session();
        let mut tui = tui_state();

        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        assert_eq!(tui.selected_suggestion, Some(0));
        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        assert_eq!(tui.selected_suggestion, Some(1));
        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        assert_eq!(tui.selected_suggestion, Some(0));
        dispatch(&mut session, &mut tui, TuiEvent::PrevSuggestion);
        assert_eq!(tui.selected_suggestion, Some(1));
    }

    #[test]
    fn test_enter_on_suggestion_submits_follow_up_and_keeps_draft() {
        let mut session = answered_session();
        let mut tui = tui_state();
        type_str(&mut session, &mut tui, "half-typed");

        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        let outcome = dispatch(&mut session, &mut tui, TuiEvent::Submit);

        let Dispatch::Spawn(request) = outcome else {
            panic!("expected a spawned request, got {:?}", outcome);
        };
        assert_eq!(request.query, "Compare with wind");
        assert_eq!(session.draft, "half-typed");
        assert_eq!(tui.selected_suggestion, None);

        let last = session.transcript.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "Compare with wind");
    }

    #[test]
    fn test_no_suggestions_after_error() {
        let mut session = Session::new();
        update(
            &mut session,
            Action::Submit {
                text: "Solar".into(),
                origin: SubmitOrigin::Draft,
            },
        );
        update(
            &mut session,
            Action::ResponseReceived {
                seq: 0,
                outcome: Ok(ResponsePayload::error("bad input")),
            },
        );
        let mut tui = tui_state();
        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);
        assert_eq!(tui.selected_suggestion, None);
    }

    #[test]
    fn test_escape_clears_selection_before_quitting() {
        let mut session = answered_session();
        let mut tui = tui_state();
        dispatch(&mut session, &mut tui, TuiEvent::NextSuggestion);

        assert_eq!(
            dispatch(&mut session, &mut tui, TuiEvent::Quit),
            Dispatch::Continue
        );
        assert_eq!(tui.selected_suggestion, None);
        assert_eq!(dispatch(&mut session, &mut tui, TuiEvent::Quit), Dispatch::Quit);
    }

    #[test]
    fn test_force_quit() {
        let mut session = Session::new();
        let mut tui = tui_state();
        assert_eq!(
            dispatch(&mut session, &mut tui, TuiEvent::ForceQuit),
            Dispatch::Quit
        );
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::at(dir.path().join("theme"));
        let mut tui = TuiState::new(Theme::Dark, store.clone());
        let mut session = Session::new();

        dispatch(&mut session, &mut tui, TuiEvent::ToggleTheme);
        assert_eq!(tui.theme, Theme::Light);
        assert_eq!(store.load(), Some(Theme::Light));
    }

    #[test]
    fn test_cycle_wraps_and_handles_empty() {
        assert_eq!(cycle(None, 0, true), None);
        assert_eq!(cycle(None, 3, false), Some(2));
        assert_eq!(cycle(Some(0), 3, false), Some(2));
        assert_eq!(cycle(Some(2), 3, true), Some(0));
    }
}
