//! Mock engine for testing without hardware.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{AudioEngine, AudioStream};
use crate::effects::Processor;
use crate::error::DeviceRole;
use crate::{EngineError, EnumerationError};

/// A call made against a [`MockEngine`] or one of its streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `list_input_devices`
    ListInputs,
    /// `list_output_devices`
    ListOutputs,
    /// `create_stream`, with the processor's effect name.
    CreateStream {
        /// Effect the stream was built with.
        effect: String,
        /// Requested input id.
        input: String,
        /// Requested output id.
        output: String,
    },
    /// `AudioStream::start`
    Start,
    /// `AudioStream::stop`
    Stop,
    /// `AudioStream::close`
    Close,
}

#[derive(Debug, Default)]
struct Failures {
    input_enumeration: Option<String>,
    output_enumeration: Option<String>,
    stream: Option<EngineError>,
    start: Option<EngineError>,
    stop: Option<EngineError>,
    close: Option<EngineError>,
}

/// An engine that records every call instead of touching hardware.
///
/// Clones share the same call log, so a test can keep one clone for
/// inspection and hand another to the code under test.
///
/// # Example
///
/// ```
/// use stream_pedal::engine::{AudioEngine, AudioStream, EngineCall, MockEngine};
///
/// let engine = MockEngine::new(["Mic1"], ["Speaker1"]);
/// let handle = engine.clone();
///
/// let processor = engine.create_processor("Gain").unwrap();
/// let mut stream = engine.create_stream(processor, "", "Speaker1").unwrap();
/// stream.start().unwrap();
///
/// assert_eq!(handle.count(&EngineCall::Start), 1);
/// ```
#[derive(Clone)]
pub struct MockEngine {
    inputs: Vec<String>,
    outputs: Vec<String>,
    failures: Arc<Mutex<Failures>>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl MockEngine {
    /// Creates a mock with the given device names.
    pub fn new<I, O>(inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: outputs.into_iter().map(Into::into).collect(),
            failures: Arc::new(Mutex::new(Failures::default())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes `list_input_devices` fail with the given reason.
    #[must_use]
    pub fn fail_input_enumeration(self, reason: impl Into<String>) -> Self {
        self.failures.lock().input_enumeration = Some(reason.into());
        self
    }

    /// Makes `list_output_devices` fail with the given reason.
    #[must_use]
    pub fn fail_output_enumeration(self, reason: impl Into<String>) -> Self {
        self.failures.lock().output_enumeration = Some(reason.into());
        self
    }

    /// Makes `create_stream` fail with the given error.
    #[must_use]
    pub fn fail_stream(self, err: EngineError) -> Self {
        self.failures.lock().stream = Some(err);
        self
    }

    /// Makes `start` on created streams fail with the given error.
    #[must_use]
    pub fn fail_start(self, err: EngineError) -> Self {
        self.failures.lock().start = Some(err);
        self
    }

    /// Makes `stop` on created streams fail with the given error.
    #[must_use]
    pub fn fail_stop(self, err: EngineError) -> Self {
        self.failures.lock().stop = Some(err);
        self
    }

    /// Makes `close` on created streams fail with the given error.
    ///
    /// The stream still counts as closed afterwards.
    #[must_use]
    pub fn fail_close(self, err: EngineError) -> Self {
        self.failures.lock().close = Some(err);
        self
    }

    /// Returns every call recorded so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Counts recorded calls equal to `call`.
    pub fn count(&self, call: &EngineCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    /// Returns the `create_stream` calls.
    pub fn stream_requests(&self) -> Vec<EngineCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, EngineCall::CreateStream { .. }))
            .cloned()
            .collect()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }

    fn list(&self, role: DeviceRole) -> Result<Vec<String>, EnumerationError> {
        let (call, failure, devices) = match role {
            DeviceRole::Input => (
                EngineCall::ListInputs,
                self.failures.lock().input_enumeration.clone(),
                &self.inputs,
            ),
            DeviceRole::Output => (
                EngineCall::ListOutputs,
                self.failures.lock().output_enumeration.clone(),
                &self.outputs,
            ),
        };
        self.record(call);
        match failure {
            Some(reason) => Err(EnumerationError::new(role, reason)),
            None => Ok(devices.clone()),
        }
    }
}

impl AudioEngine for MockEngine {
    fn list_input_devices(&self) -> Result<Vec<String>, EnumerationError> {
        self.list(DeviceRole::Input)
    }

    fn list_output_devices(&self) -> Result<Vec<String>, EnumerationError> {
        self.list(DeviceRole::Output)
    }

    fn create_stream(
        &self,
        processor: Box<dyn Processor>,
        input_id: &str,
        output_id: &str,
    ) -> Result<Box<dyn AudioStream>, EngineError> {
        self.record(EngineCall::CreateStream {
            effect: processor.name().to_string(),
            input: input_id.to_string(),
            output: output_id.to_string(),
        });

        let failures = self.failures.lock();
        if let Some(err) = &failures.stream {
            return Err(err.clone());
        }

        Ok(Box::new(MockStream {
            calls: Arc::clone(&self.calls),
            start_error: failures.start.clone(),
            stop_error: failures.stop.clone(),
            close_error: failures.close.clone(),
            running: false,
            closed: false,
        }))
    }
}

/// Stream handed out by [`MockEngine`]; mirrors the single-use rules of a
/// real device stream.
struct MockStream {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    start_error: Option<EngineError>,
    stop_error: Option<EngineError>,
    close_error: Option<EngineError>,
    running: bool,
    closed: bool,
}

impl AudioStream for MockStream {
    fn start(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push(EngineCall::Start);
        if self.closed {
            return Err(EngineError::AlreadyClosed);
        }
        if let Some(err) = &self.start_error {
            return Err(err.clone());
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push(EngineCall::Stop);
        if !self.running {
            return Err(EngineError::AlreadyStopped);
        }
        if let Some(err) = &self.stop_error {
            return Err(err.clone());
        }
        self.running = false;
        Ok(())
    }

    fn close(&mut self) -> Result<(), EngineError> {
        self.calls.lock().push(EngineCall::Close);
        if self.closed {
            return Err(EngineError::AlreadyClosed);
        }
        self.running = false;
        self.closed = true;
        match &self.close_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
