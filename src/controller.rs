//! Audio session lifecycle.
//!
//! The controller is the only component that starts an engine stream.
//! A started stream is wrapped in an [`ActiveStream`], whose teardown
//! (stop, then close) runs exactly once: explicitly through
//! [`teardown`], or on drop if the owner unwinds or returns early.

use crate::engine::{AudioEngine, AudioStream};
use crate::EngineError;

/// Turns committed choices into running engine streams.
pub struct AudioController {
    engine: Box<dyn AudioEngine>,
}

impl AudioController {
    /// Creates a controller over the given engine.
    pub fn new(engine: impl AudioEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    /// Returns the engine, e.g. to enumerate devices.
    pub fn engine(&self) -> &dyn AudioEngine {
        self.engine.as_ref()
    }

    /// Builds a paused stream running `effect` between two devices.
    ///
    /// An empty device id selects the system default for that role.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownEffect`] if the effect is not recognized,
    /// [`EngineError::Device`] if either device cannot be opened.
    pub fn acquire(
        &self,
        effect: &str,
        input_id: &str,
        output_id: &str,
    ) -> Result<AcquiredStream, EngineError> {
        let processor = self.engine.create_processor(effect)?;
        let stream = self.engine.create_stream(processor, input_id, output_id)?;
        Ok(AcquiredStream {
            stream: Some(stream),
        })
    }

    /// Begins audio flow on an acquired stream.
    ///
    /// # Errors
    ///
    /// Returns the engine's start error. The stream is closed before
    /// returning, so nothing is left holding the devices.
    pub fn start(&self, mut acquired: AcquiredStream) -> Result<ActiveStream, EngineError> {
        let Some(mut stream) = acquired.stream.take() else {
            return Err(EngineError::AlreadyClosed);
        };
        if let Err(err) = stream.start() {
            if let Err(close_err) = stream.close() {
                tracing::warn!("closing stream after failed start: {}", close_err);
            }
            return Err(err);
        }
        Ok(ActiveStream {
            stream: Some(stream),
        })
    }

    /// Acquires and starts in one step.
    ///
    /// Either returns a running stream, or an error with nothing held.
    ///
    /// # Errors
    ///
    /// Any error from [`acquire`](Self::acquire) or [`start`](Self::start).
    pub fn launch(
        &self,
        effect: &str,
        input_id: &str,
        output_id: &str,
    ) -> Result<ActiveStream, EngineError> {
        let acquired = self.acquire(effect, input_id, output_id)?;
        self.start(acquired)
    }
}

/// A stream returned by [`AudioController::acquire`] that has not started.
///
/// The only way to run it is [`AudioController::start`], which guarantees
/// `start` is never called on a handle that wasn't successfully acquired.
/// Dropping it closes the stream.
#[must_use = "an acquired stream does nothing until started"]
pub struct AcquiredStream {
    stream: Option<Box<dyn AudioStream>>,
}

impl Drop for AcquiredStream {
    fn drop(&mut self) {
        // Empty once AudioController::start has taken the stream
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.close() {
                tracing::warn!("closing abandoned stream: {}", err);
            }
        }
    }
}

/// A running stream.
///
/// Dropping an `ActiveStream` stops and closes it. Prefer the explicit
/// [`teardown`] so shutdown happens at a predictable point.
pub struct ActiveStream {
    stream: Option<Box<dyn AudioStream>>,
}

impl ActiveStream {
    /// Stops then closes the stream. Errors are logged, not returned.
    fn shut_down(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        if let Err(err) = stream.stop() {
            tracing::warn!("stopping stream: {}", err);
        }
        if let Err(err) = stream.close() {
            tracing::warn!("closing stream: {}", err);
        }
        tracing::debug!("stream torn down");
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        self.shut_down();
    }
}

impl std::fmt::Debug for ActiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveStream")
            .field("open", &self.stream.is_some())
            .finish()
    }
}

/// Tears down the stream in `slot`, if any, and leaves the slot empty.
///
/// Safe to call when nothing is running and safe to call repeatedly:
/// only the first call on a given stream reaches the engine.
pub fn teardown(slot: &mut Option<ActiveStream>) {
    if let Some(mut active) = slot.take() {
        active.shut_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCall, MockEngine};

    fn controller() -> (AudioController, MockEngine) {
        let engine = MockEngine::new(["Mic1"], ["Speaker1"]);
        (AudioController::new(engine.clone()), engine)
    }

    #[test]
    fn test_acquire_does_not_start() {
        let (controller, engine) = controller();
        let acquired = controller.acquire("Gain", "", "Speaker1").unwrap();
        assert_eq!(engine.count(&EngineCall::Start), 0);
        drop(acquired);
        assert_eq!(engine.count(&EngineCall::Close), 1);
    }

    #[test]
    fn test_acquire_unknown_effect_never_requests_stream() {
        let (controller, engine) = controller();
        let err = controller.acquire("Flanger", "", "").err();
        assert_eq!(err, Some(EngineError::unknown_effect("Flanger")));
        assert!(engine.stream_requests().is_empty());
    }

    #[test]
    fn test_launch_then_teardown() {
        let (controller, engine) = controller();
        let mut slot = Some(controller.launch("Reverb", "Mic1", "").unwrap());
        assert_eq!(engine.count(&EngineCall::Start), 1);

        teardown(&mut slot);
        assert!(slot.is_none());
        assert_eq!(
            engine.calls()[1..],
            [EngineCall::Start, EngineCall::Stop, EngineCall::Close]
        );
    }

    #[test]
    fn test_teardown_twice_reaches_engine_once() {
        let (controller, engine) = controller();
        let mut slot = Some(controller.launch("Gain", "", "").unwrap());
        teardown(&mut slot);
        teardown(&mut slot);
        assert_eq!(engine.count(&EngineCall::Stop), 1);
        assert_eq!(engine.count(&EngineCall::Close), 1);
    }

    #[test]
    fn test_teardown_of_empty_slot_is_noop() {
        let (_, engine) = controller();
        let mut slot = None;
        teardown(&mut slot);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn test_failed_start_closes_stream() {
        let engine = MockEngine::new(["Mic1"], ["Speaker1"])
            .fail_start(EngineError::backend("device lost"));
        let controller = AudioController::new(engine.clone());

        let err = controller.launch("Delay", "", "").err();
        assert_eq!(err, Some(EngineError::backend("device lost")));
        assert_eq!(engine.count(&EngineCall::Close), 1);
        assert_eq!(engine.count(&EngineCall::Stop), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let (controller, engine) = controller();
        let active = controller.launch("Phaser", "", "").unwrap();
        drop(active);
        assert_eq!(engine.count(&EngineCall::Stop), 1);
        assert_eq!(engine.count(&EngineCall::Close), 1);
    }

    #[test]
    fn test_failed_stop_still_closes() {
        let engine = MockEngine::new(["Mic1"], ["Speaker1"])
            .fail_stop(EngineError::backend("device lost"));
        let controller = AudioController::new(engine.clone());

        let mut slot = Some(controller.launch("Gain", "", "").unwrap());
        teardown(&mut slot);
        assert!(slot.is_none());
        assert_eq!(engine.count(&EngineCall::Stop), 1);
        assert_eq!(engine.count(&EngineCall::Close), 1);

        teardown(&mut slot);
        assert_eq!(engine.count(&EngineCall::Stop), 1);
        assert_eq!(engine.count(&EngineCall::Close), 1);
    }

    #[test]
    fn test_teardown_errors_are_swallowed() {
        let engine = MockEngine::new(["Mic1"], ["Speaker1"])
            .fail_stop(EngineError::backend("device lost"))
            .fail_close(EngineError::AlreadyClosed);
        let controller = AudioController::new(engine.clone());

        let mut slot = Some(controller.launch("Reverb", "Mic1", "Speaker1").unwrap());
        teardown(&mut slot);
        assert!(slot.is_none());
        assert_eq!(
            engine.calls()[1..],
            [EngineCall::Start, EngineCall::Stop, EngineCall::Close]
        );
    }
}
