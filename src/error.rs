//! Error types for stream-pedal.
//!
//! Errors are split into two categories:
//! - **Fatal errors** ([`EnumerationError`]): the device lists could not be
//!   read, so no selection screen can be shown
//! - **Recoverable errors** ([`EngineError`]): the engine refused the chosen
//!   effect or devices; the session still reaches its playing screen and
//!   shows the error

use std::fmt;

/// Which side of the audio path a device belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    /// Capture device.
    Input,
    /// Playback device.
    Output,
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// The engine failed to list the devices for one role.
///
/// Returned before the UI starts; the binary reports it on stderr and exits
/// with status 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to list {role} devices: {reason}")]
pub struct EnumerationError {
    /// The enumeration call that failed.
    pub role: DeviceRole,
    /// Backend description of the failure.
    pub reason: String,
}

impl EnumerationError {
    /// Creates an enumeration error for the given role.
    pub fn new(role: DeviceRole, reason: impl Into<String>) -> Self {
        Self {
            role,
            reason: reason.into(),
        }
    }
}

/// Errors reported by an [`AudioEngine`](crate::AudioEngine) or one of its
/// streams.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No processor exists for the requested effect name.
    #[error("unknown effect: {name}")]
    UnknownEffect {
        /// The effect name that wasn't recognized.
        name: String,
    },

    /// A device could not be opened or configured.
    ///
    /// The message is shown to the user as-is.
    #[error("{reason}")]
    Device {
        /// Why the device could not be used.
        reason: String,
    },

    /// An error from the underlying audio library.
    #[error("audio backend error: {0}")]
    Backend(String),

    /// `stop` was called on a stream that is not running.
    #[error("stream already stopped")]
    AlreadyStopped,

    /// `close` was called on a stream that was already closed.
    #[error("stream already closed")]
    AlreadyClosed,
}

impl EngineError {
    /// Creates an unknown effect error.
    pub fn unknown_effect(name: impl Into<String>) -> Self {
        Self::UnknownEffect { name: name.into() }
    }

    /// Creates a device error with the given reason.
    pub fn device(reason: impl Into<String>) -> Self {
        Self::Device {
            reason: reason.into(),
        }
    }

    /// Creates a backend error from anything displayable.
    pub fn backend(err: impl fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}
