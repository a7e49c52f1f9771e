//! Built-in effects offered on the effect selection screen.
//!
//! Every effect is a mono, sample-by-sample [`Processor`] with fixed
//! parameters. The engine downmixes the input to mono, runs it through the
//! processor and copies the result to every output channel.

mod delay_line;
mod dynamics;
mod modulation;
mod time;

pub use dynamics::{Distortion, Gain};
pub use modulation::{Chorus, Phaser};
pub use time::{Delay, Reverb};

use std::fmt;
use std::str::FromStr;

use crate::EngineError;

/// Sample rate processors assume until told otherwise.
pub(crate) const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// A single-channel audio effect.
///
/// Processors run on the audio thread, so `process` must not allocate or
/// block. Buffers are sized in [`set_sample_rate`](Processor::set_sample_rate),
/// which the engine calls once before audio flows.
pub trait Processor: Send {
    /// Display name of the effect.
    fn name(&self) -> &str;

    /// Processes one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Resizes internal state for a new sample rate and clears it.
    fn set_sample_rate(&mut self, sample_rate: f32);
}

/// The fixed set of effects the program offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Simple volume boost.
    Gain,
    /// Room simulation.
    Reverb,
    /// Waveshaping distortion.
    Distortion,
    /// Single echo.
    Delay,
    /// Modulated short delay.
    Chorus,
    /// Swept allpass cascade.
    Phaser,
}

impl EffectKind {
    /// All effects in menu order.
    pub const ALL: [EffectKind; 6] = [
        Self::Gain,
        Self::Reverb,
        Self::Distortion,
        Self::Delay,
        Self::Chorus,
        Self::Phaser,
    ];

    /// Name shown in the menu and accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Gain => "Gain",
            Self::Reverb => "Reverb",
            Self::Distortion => "Distortion",
            Self::Delay => "Delay",
            Self::Chorus => "Chorus",
            Self::Phaser => "Phaser",
        }
    }

    /// One-line description shown under the name.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Gain => "Simple volume control",
            Self::Reverb => "Room simulation",
            Self::Distortion => "Waveshaping distortion",
            Self::Delay => "Echo effect",
            Self::Chorus => "Modulation effect",
            Self::Phaser => "Phase shifting",
        }
    }

    /// Builds a fresh processor for this effect.
    #[must_use]
    pub fn processor(self) -> Box<dyn Processor> {
        match self {
            Self::Gain => Box::new(Gain::default()),
            Self::Reverb => Box::new(Reverb::default()),
            Self::Distortion => Box::new(Distortion::default()),
            Self::Delay => Box::new(Delay::default()),
            Self::Chorus => Box::new(Chorus::default()),
            Self::Phaser => Box::new(Phaser::default()),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EngineError::unknown_effect(s))
    }
}

/// Converts decibels to a linear amplitude factor.
pub(crate) fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Linear blend of dry and wet signals.
pub(crate) fn mix(dry: f32, wet: f32, amount: f32) -> f32 {
    dry * (1.0 - amount) + wet * amount
}

#[cfg(test)]
pub(crate) fn sine(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate).sin())
        .collect()
}
