//! Routing of terminal events to the session.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::AudioController;
use crate::session::{SelectionState, Session};
use crate::ui::list::ListAction;

/// An input the dispatcher acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A key press.
    Key(KeyEvent),
    /// The terminal changed size.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
}

impl UiEvent {
    /// Converts a raw terminal event, dropping key releases/repeats and
    /// events the program does not use.
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            Event::Resize(width, height) => Some(Self::Resize { width, height }),
            _ => None,
        }
    }
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading events.
    Continue,
    /// The session has been torn down; leave the loop.
    Exit,
}

/// ctrl+c: quits from any screen.
pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// q or esc: stops playback.
pub fn is_stop(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}

/// enter: accepts the highlighted item.
pub fn is_confirm(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
}

/// Applies one event to the session.
///
/// Force-quit is checked before anything state specific. On the selection
/// screens the list decides whether `q`/`esc` quit or edit its filter.
/// Every path that returns [`Flow::Exit`] has already torn the session
/// down.
pub fn dispatch(session: &mut Session, controller: &AudioController, event: UiEvent) -> Flow {
    if let UiEvent::Key(key) = &event {
        if is_force_quit(key) {
            tracing::debug!(state = ?session.state(), "force quit");
            session.teardown();
            return Flow::Exit;
        }
    }

    match session.state() {
        SelectionState::Playing => match event {
            UiEvent::Key(key) if is_stop(&key) => {
                tracing::debug!("stop requested");
                session.teardown();
                Flow::Exit
            }
            UiEvent::Key(_) | UiEvent::Resize { .. } => Flow::Continue,
        },
        SelectionState::SelectInput | SelectionState::SelectOutput | SelectionState::SelectEffect => {
            match event {
                UiEvent::Key(key) if is_confirm(&key) => session.confirm(controller),
                UiEvent::Resize { width, height } => session.resize(width, height),
                UiEvent::Key(key) => {
                    if session.pass_through(key) == ListAction::Quit {
                        tracing::debug!(state = ?session.state(), "quit from selection");
                        session.teardown();
                        return Flow::Exit;
                    }
                }
            }
            Flow::Continue
        }
    }
}
