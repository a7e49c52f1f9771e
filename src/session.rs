//! The selection state machine.
//!
//! A [`Session`] is created once at startup and owns everything the event
//! loop mutates: the current screen, the list being shown, the committed
//! choices, and the running stream.

use crossterm::event::KeyEvent;

use crate::catalog::{Catalog, Item, MenuItem};
use crate::controller::{self, ActiveStream, AudioController};
use crate::engine::device_label;
use crate::ui::list::{ListAction, SelectList};
use crate::ui::{FRAME_HEIGHT, FRAME_WIDTH};
use crate::EngineError;

/// Which screen is active.
///
/// Screens advance strictly in declaration order and never go back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionState {
    /// Choosing the capture device.
    SelectInput,
    /// Choosing the playback device.
    SelectOutput,
    /// Choosing the effect.
    SelectEffect,
    /// Audio is running, or failed to start.
    Playing,
}

impl SelectionState {
    /// Title of the list shown in this state; `None` while playing.
    #[must_use]
    pub fn list_title(self) -> Option<&'static str> {
        match self {
            Self::SelectInput => Some("Select Input Device"),
            Self::SelectOutput => Some("Select Output Device"),
            Self::SelectEffect => Some("Select Effect"),
            Self::Playing => None,
        }
    }

    /// Returns `true` on the three list screens.
    #[must_use]
    pub fn is_selecting(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// The program's single mutable record.
///
/// Invariants:
/// - `selected_input` / `selected_output` are empty exactly when the user
///   picked the default entry;
/// - a stream is held only in [`SelectionState::Playing`] with no
///   `last_error`, and nothing else holds it.
#[derive(Debug)]
pub struct Session {
    state: SelectionState,
    catalog: Catalog,
    list: SelectList<MenuItem>,
    selected_input: String,
    selected_output: String,
    selected_effect: String,
    active: Option<ActiveStream>,
    last_error: Option<EngineError>,
    status_text: String,
}

impl Session {
    /// Creates a session on the input screen.
    pub fn new(catalog: Catalog) -> Self {
        let state = SelectionState::SelectInput;
        let list = SelectList::new(
            state.list_title().unwrap_or_default(),
            catalog.inputs().to_vec(),
        );
        Self {
            state,
            catalog,
            list,
            selected_input: String::new(),
            selected_output: String::new(),
            selected_effect: String::new(),
            active: None,
            last_error: None,
            status_text: String::new(),
        }
    }

    /// Current screen.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Committed input device id (empty for the default device).
    pub fn selected_input(&self) -> &str {
        &self.selected_input
    }

    /// Committed output device id (empty for the default device).
    pub fn selected_output(&self) -> &str {
        &self.selected_output
    }

    /// Committed effect name.
    pub fn selected_effect(&self) -> &str {
        &self.selected_effect
    }

    /// Returns `true` while a stream is held.
    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Why the stream failed to start, if it did.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// One-line summary of the playing screen.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// The list shown on the current screen.
    pub fn list(&self) -> &SelectList<MenuItem> {
        &self.list
    }

    /// Commits the highlighted item and advances to the next screen.
    ///
    /// Leaving the effect screen starts audio through `controller`. The
    /// session reaches [`SelectionState::Playing`] whether or not that
    /// succeeds; a failure is kept in [`last_error`](Self::last_error).
    ///
    /// Does nothing while playing, or when the filter hides every item.
    pub fn confirm(&mut self, controller: &AudioController) {
        if !self.state.is_selecting() {
            return;
        }
        let Some(item) = self.list.selected_item().cloned() else {
            tracing::debug!(state = ?self.state, "confirm with nothing highlighted");
            return;
        };

        match self.state {
            SelectionState::SelectInput => {
                self.selected_input = item.device_id().to_string();
                self.advance(SelectionState::SelectOutput);
            }
            SelectionState::SelectOutput => {
                self.selected_output = item.device_id().to_string();
                self.advance(SelectionState::SelectEffect);
            }
            SelectionState::SelectEffect => {
                self.selected_effect = item.title().to_string();
                self.start_audio(controller);
                self.state = SelectionState::Playing;
            }
            SelectionState::Playing => {}
        }
    }

    /// Forwards a key to the list widget on the selection screens and
    /// reports what the list made of it. Always
    /// [`ListAction::Ignored`] while playing.
    pub fn pass_through(&mut self, key: KeyEvent) -> ListAction {
        if self.state.is_selecting() {
            self.list.handle_key(key)
        } else {
            ListAction::Ignored
        }
    }

    /// Recomputes the list layout for a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.list.set_size(
            width.saturating_sub(FRAME_WIDTH),
            height.saturating_sub(FRAME_HEIGHT),
        );
    }

    /// Stops and closes the running stream, if any. Idempotent.
    pub fn teardown(&mut self) {
        controller::teardown(&mut self.active);
    }

    fn advance(&mut self, next: SelectionState) {
        let items = match next {
            SelectionState::SelectOutput => self.catalog.outputs(),
            SelectionState::SelectEffect => self.catalog.effects(),
            SelectionState::SelectInput | SelectionState::Playing => return,
        };
        tracing::debug!(from = ?self.state, to = ?next, "selection advanced");
        self.state = next;
        self.list.set_items(items.to_vec());
        self.list.set_title(next.list_title().unwrap_or_default());
        self.list.reset_selected();
    }

    fn start_audio(&mut self, controller: &AudioController) {
        let input = device_label(&self.selected_input);
        let output = device_label(&self.selected_output);
        match controller.launch(
            &self.selected_effect,
            &self.selected_input,
            &self.selected_output,
        ) {
            Ok(active) => {
                self.status_text = format!(
                    "Playing... Using {input} -> {output} with {}",
                    self.selected_effect
                );
                self.active = Some(active);
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "audio session failed to start");
                self.status_text = format!("Error: {err}");
                self.last_error = Some(err);
            }
        }
    }
}
