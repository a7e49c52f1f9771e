//! Configuration for the cpal engine.

use std::time::Duration;

/// Buffering behaviour of a duplex stream built by
/// [`CpalEngine`](crate::engine::CpalEngine).
///
/// Use [`EngineConfig::default()`] for sensible defaults, or customize as needed.
///
/// # Example
///
/// ```
/// use stream_pedal::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig {
///     prefill: Duration::from_millis(40),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Capacity of the ring buffer between the input and output callbacks.
    ///
    /// If the output side stalls for longer than this, newest input is
    /// dropped until there is room again.
    /// Default: 500ms
    pub ring_buffer_duration: Duration,

    /// Silence queued ahead of the first input samples.
    ///
    /// Absorbs jitter between the two device callbacks at the cost of
    /// added latency.
    /// Default: 20ms
    pub prefill: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_buffer_duration: Duration::from_millis(500),
            prefill: Duration::from_millis(20),
        }
    }
}

impl EngineConfig {
    /// Ring buffer capacity in mono samples at the given rate.
    #[must_use]
    pub fn ring_buffer_capacity(&self, sample_rate: u32) -> usize {
        samples_for(self.ring_buffer_duration, sample_rate).max(1)
    }

    /// Number of silent samples to queue before starting, clamped to the
    /// ring buffer capacity.
    #[must_use]
    pub fn prefill_samples(&self, sample_rate: u32) -> usize {
        samples_for(self.prefill, sample_rate).min(self.ring_buffer_capacity(sample_rate))
    }
}

fn samples_for(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * f64::from(sample_rate)) as usize
}
