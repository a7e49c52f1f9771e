//! # stream-pedal
//!
//! An interactive terminal pedalboard. The user picks an input device, an
//! output device and an effect from three successive lists; audio then
//! runs live from input, through the effect, to output until they quit.
//!
//! ## Structure
//!
//! - [`Session`] is the selection state machine and the program's single
//!   mutable record. It advances `SelectInput -> SelectOutput ->
//!   SelectEffect -> Playing` and never goes back.
//! - [`AudioController`] turns the committed choices into a running
//!   [`AudioStream`] and guarantees stop-then-close happens exactly once.
//! - [`AudioEngine`] is the seam to the audio backend. [`CpalEngine`] drives
//!   real hardware; [`MockEngine`] records calls for tests.
//! - [`dispatch`] routes terminal events to the session.
//!
//! ## Threads
//!
//! - **CPAL input callback** downmixes to mono and pushes into a lock-free
//!   ring buffer.
//! - **CPAL output callback** pops, runs the effect and writes every output
//!   channel. Neither callback blocks.
//! - **Main task** owns the session and the terminal.
//!
//! ```rust
//! use stream_pedal::{dispatch, AudioController, Catalog, Flow, MockEngine, Session, UiEvent};
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let engine = MockEngine::new(["Mic1"], ["Speaker1"]);
//! let controller = AudioController::new(engine);
//! let catalog = Catalog::load(controller.engine()).unwrap();
//! let mut session = Session::new(catalog);
//!
//! let enter = UiEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
//! for _ in 0..3 {
//!     dispatch(&mut session, &controller, enter);
//! }
//! assert!(session.is_streaming());
//!
//! let quit = UiEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
//! assert_eq!(dispatch(&mut session, &controller, quit), Flow::Exit);
//! assert!(!session.is_streaming());
//! ```

#![warn(missing_docs)]
// Audio code requires intentional numeric casts between sample formats
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
// These doc lints are too strict for internal implementation details
#![allow(
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod catalog;
mod config;
mod controller;
mod dispatch;
pub mod effects;
pub mod engine;
mod error;
mod session;
pub mod ui;

pub use catalog::{Catalog, Item, MenuItem, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
pub use config::EngineConfig;
pub use controller::{teardown, AcquiredStream, ActiveStream, AudioController};
pub use dispatch::{dispatch, is_confirm, is_force_quit, is_stop, Flow, UiEvent};
pub use effects::{EffectKind, Processor};
pub use engine::{device_label, AudioEngine, AudioStream, CpalEngine, EngineCall, MockEngine};
pub use error::{DeviceRole, EngineError, EnumerationError};
pub use session::{SelectionState, Session};
