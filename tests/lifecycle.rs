//! End-to-end selection and playback flows against the mock engine.
//!
//! Hardware-backed behavior is covered by the ignored tests in the engine
//! module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stream_pedal::ui::playing_text;
use stream_pedal::{
    dispatch, AudioController, Catalog, EngineCall, EngineError, Flow, MockEngine,
    SelectionState, Session, UiEvent,
};

fn key(code: KeyCode) -> UiEvent {
    UiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl_c() -> UiEvent {
    UiEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
}

struct Harness {
    engine: MockEngine,
    controller: AudioController,
    session: Session,
}

impl Harness {
    fn new(engine: MockEngine) -> Self {
        let controller = AudioController::new(engine.clone());
        let catalog = Catalog::load(controller.engine()).unwrap();
        Self {
            engine,
            controller,
            session: Session::new(catalog),
        }
    }

    fn send(&mut self, event: UiEvent) -> Flow {
        dispatch(&mut self.session, &self.controller, event)
    }

    /// Moves the cursor down `rows` times, then confirms.
    fn pick(&mut self, rows: usize) -> Flow {
        for _ in 0..rows {
            self.send(key(KeyCode::Down));
        }
        self.send(key(KeyCode::Enter))
    }
}

fn mic_and_speaker() -> MockEngine {
    MockEngine::new(["Mic1"], ["Speaker1"])
}

#[test]
fn test_default_input_speaker_output_gain() {
    let mut h = Harness::new(mic_and_speaker());
    h.pick(0);
    h.pick(1);
    h.pick(0);

    assert_eq!(h.session.state(), SelectionState::Playing);
    assert_eq!(
        h.engine.stream_requests(),
        vec![EngineCall::CreateStream {
            effect: "Gain".to_string(),
            input: String::new(),
            output: "Speaker1".to_string(),
        }]
    );
    assert_eq!(
        h.session.status_text(),
        "Playing... Using Default -> Speaker1 with Gain"
    );
    assert!(h.session.is_streaming());
}

#[test]
fn test_device_error_still_reaches_playing() {
    let engine = mic_and_speaker().fail_stream(EngineError::device("Speaker1 busy"));
    let mut h = Harness::new(engine);
    h.pick(0);
    h.pick(1);
    h.pick(0);

    assert_eq!(h.session.state(), SelectionState::Playing);
    assert!(!h.session.is_streaming());
    assert!(h.session.status_text().contains("Speaker1 busy"));
    assert!(playing_text(&h.session).starts_with("Error: Speaker1 busy"));
    assert_eq!(h.engine.count(&EngineCall::Start), 0);

    // Only quitting is possible from here
    assert_eq!(h.send(key(KeyCode::Enter)), Flow::Continue);
    assert_eq!(h.send(key(KeyCode::Char('q'))), Flow::Exit);
    assert_eq!(h.engine.count(&EngineCall::Stop), 0);
}

#[test]
fn test_force_quit_on_output_screen() {
    let mut h = Harness::new(mic_and_speaker());
    h.pick(0);
    assert_eq!(h.session.state(), SelectionState::SelectOutput);

    assert_eq!(h.send(ctrl_c()), Flow::Exit);
    h.session.teardown();

    assert!(h.engine.stream_requests().is_empty());
    assert_eq!(h.engine.count(&EngineCall::Start), 0);
    assert_eq!(h.engine.count(&EngineCall::Stop), 0);
    assert_eq!(h.engine.count(&EngineCall::Close), 0);
}

#[test]
fn test_stop_while_playing_stops_then_closes_once() {
    let mut h = Harness::new(mic_and_speaker());
    h.pick(1);
    h.pick(0);
    h.pick(3);
    assert!(h.session.is_streaming());

    assert_eq!(h.send(key(KeyCode::Char('q'))), Flow::Exit);
    // The binary tears down again after the loop exits
    h.session.teardown();

    let lifecycle: Vec<_> = h
        .engine
        .calls()
        .into_iter()
        .filter(|call| matches!(call, EngineCall::Start | EngineCall::Stop | EngineCall::Close))
        .collect();
    assert_eq!(
        lifecycle,
        vec![EngineCall::Start, EngineCall::Stop, EngineCall::Close]
    );
}

#[test]
fn test_selections_track_last_confirmed_titles() {
    let engine = MockEngine::new(["Mic1", "Mic2"], ["Speaker1", "Headphones"]);
    for (input_rows, output_rows, effect_rows) in [(0, 0, 0), (2, 1, 5), (1, 2, 2)] {
        let mut h = Harness::new(engine.clone());
        h.pick(input_rows);
        h.pick(output_rows);
        h.pick(effect_rows);

        let inputs = ["", "Mic1", "Mic2"];
        let outputs = ["", "Speaker1", "Headphones"];
        let effects = ["Gain", "Reverb", "Distortion", "Delay", "Chorus", "Phaser"];
        assert_eq!(h.session.state(), SelectionState::Playing);
        assert_eq!(h.session.selected_input(), inputs[input_rows]);
        assert_eq!(h.session.selected_output(), outputs[output_rows]);
        assert_eq!(h.session.selected_effect(), effects[effect_rows]);
    }
}

#[test]
fn test_stream_held_only_while_playing_without_error() {
    let mut h = Harness::new(mic_and_speaker());
    assert!(!h.session.is_streaming());
    h.pick(0);
    assert!(!h.session.is_streaming());
    h.pick(0);
    assert!(!h.session.is_streaming());
    h.pick(0);
    assert!(h.session.is_streaming());
    assert!(h.session.last_error().is_none());
}

#[test]
fn test_filtered_pick_uses_matching_device() {
    let mut h = Harness::new(MockEngine::new(["Mic1", "USB Mic"], ["Speaker1"]));
    for c in "/usb".chars() {
        h.send(key(KeyCode::Char(c)));
    }
    h.pick(0);
    assert_eq!(h.session.selected_input(), "USB Mic");
    assert_eq!(h.session.list().title(), "Select Output Device");
}

#[test]
fn test_failed_start_closes_and_reports() {
    let engine = mic_and_speaker().fail_start(EngineError::backend("stream rejected"));
    let mut h = Harness::new(engine);
    h.pick(0);
    h.pick(0);
    h.pick(0);

    assert!(!h.session.is_streaming());
    assert_eq!(
        h.session.status_text(),
        "Error: audio backend error: stream rejected"
    );
    assert_eq!(h.engine.count(&EngineCall::Close), 1);
}

#[test]
fn test_enumeration_failure_is_reported() {
    let engine = mic_and_speaker().fail_output_enumeration("no backend");
    let controller = AudioController::new(engine);
    let err = Catalog::load(controller.engine()).unwrap_err();
    assert_eq!(err.to_string(), "failed to list output devices: no backend");
}

#[test]
fn test_q_on_selection_screen_exits_without_streaming() {
    let mut h = Harness::new(mic_and_speaker());
    h.pick(0);
    h.pick(0);
    assert_eq!(h.session.state(), SelectionState::SelectEffect);

    assert_eq!(h.send(key(KeyCode::Char('q'))), Flow::Exit);
    h.session.teardown();
    assert_eq!(
        h.engine.calls(),
        vec![EngineCall::ListInputs, EngineCall::ListOutputs]
    );
}

#[test]
fn test_failed_stop_still_closes_on_quit() {
    let engine = mic_and_speaker().fail_stop(EngineError::backend("device lost"));
    let mut h = Harness::new(engine);
    h.pick(0);
    h.pick(0);
    h.pick(0);

    assert_eq!(h.send(key(KeyCode::Esc)), Flow::Exit);
    assert!(!h.session.is_streaming());
    assert_eq!(h.engine.count(&EngineCall::Stop), 1);
    assert_eq!(h.engine.count(&EngineCall::Close), 1);
}
