//! Audio engine abstraction.
//!
//! The rest of the crate talks to audio hardware only through the two
//! traits defined here. [`CpalEngine`] drives real devices; [`MockEngine`]
//! records every call so the selection flow can be exercised without
//! hardware.

mod cpal_engine;
mod mock;

pub use cpal_engine::CpalEngine;
pub use mock::{EngineCall, MockEngine};

use crate::effects::{EffectKind, Processor};
use crate::{EngineError, EnumerationError};

/// Source of devices, effect processors and streams.
///
/// Device ids are the names returned by the `list_*` calls; the empty
/// string selects the system default device for that role.
pub trait AudioEngine {
    /// Lists input device ids in host order.
    fn list_input_devices(&self) -> Result<Vec<String>, EnumerationError>;

    /// Lists output device ids in host order.
    fn list_output_devices(&self) -> Result<Vec<String>, EnumerationError>;

    /// Builds the processor for an effect name.
    ///
    /// The default implementation resolves the name against the built-in
    /// [`EffectKind`] set.
    fn create_processor(&self, effect: &str) -> Result<Box<dyn Processor>, EngineError> {
        effect.parse::<EffectKind>().map(EffectKind::processor)
    }

    /// Builds a paused stream that runs `processor` between two devices.
    fn create_stream(
        &self,
        processor: Box<dyn Processor>,
        input_id: &str,
        output_id: &str,
    ) -> Result<Box<dyn AudioStream>, EngineError>;
}

/// A stream returned by [`AudioEngine::create_stream`].
///
/// Each operation is meaningful once; repeating `stop` or `close` reports
/// [`EngineError::AlreadyStopped`] / [`EngineError::AlreadyClosed`].
pub trait AudioStream {
    /// Begins audio flow.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Halts audio flow.
    fn stop(&mut self) -> Result<(), EngineError>;

    /// Releases the devices.
    fn close(&mut self) -> Result<(), EngineError>;
}

/// Label for a device id, showing the empty id as "Default".
#[must_use]
pub fn device_label(id: &str) -> &str {
    if id.is_empty() {
        "Default"
    } else {
        id
    }
}
