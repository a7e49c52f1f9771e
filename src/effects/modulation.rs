use std::f32::consts::TAU;

use super::delay_line::DelayLine;
use super::{mix, Processor, DEFAULT_SAMPLE_RATE};

/// Sine low-frequency oscillator in `-1.0..=1.0`.
#[derive(Debug, Clone)]
struct Lfo {
    rate_hz: f32,
    phase: f32,
    increment: f32,
}

impl Lfo {
    fn new(rate_hz: f32) -> Self {
        Self {
            rate_hz,
            phase: 0.0,
            increment: rate_hz / DEFAULT_SAMPLE_RATE,
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.increment = self.rate_hz / sample_rate;
        self.phase = 0.0;
    }

    fn next(&mut self) -> f32 {
        let value = (self.phase * TAU).sin();
        self.phase = (self.phase + self.increment).fract();
        value
    }
}

/// Short delay whose length is swept by an LFO.
#[derive(Debug, Clone)]
pub struct Chorus {
    centre_ms: f32,
    depth: f32,
    mix: f32,
    samples_per_ms: f32,
    lfo: Lfo,
    line: DelayLine,
}

impl Chorus {
    /// Creates a chorus sweeping `depth` (fraction of `centre_ms`) at `rate_hz`.
    #[must_use]
    pub fn new(rate_hz: f32, centre_ms: f32, depth: f32, mix: f32) -> Self {
        let mut chorus = Self {
            centre_ms,
            depth: depth.clamp(0.0, 1.0),
            mix,
            samples_per_ms: 1.0,
            lfo: Lfo::new(rate_hz),
            line: DelayLine::new(1),
        };
        chorus.set_sample_rate(DEFAULT_SAMPLE_RATE);
        chorus
    }
}

impl Default for Chorus {
    fn default() -> Self {
        Self::new(1.0, 7.0, 0.25, 0.5)
    }
}

impl Processor for Chorus {
    fn name(&self) -> &str {
        "Chorus"
    }

    fn process(&mut self, input: f32) -> f32 {
        let delay_ms = self.centre_ms * (1.0 + self.depth * self.lfo.next());
        let wet = self.line.read(delay_ms * self.samples_per_ms);
        self.line.write(input);
        mix(input, wet, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.samples_per_ms = sample_rate / 1000.0;
        let longest = self.centre_ms * (1.0 + self.depth) * self.samples_per_ms;
        self.line = DelayLine::new(longest.ceil() as usize + 2);
        self.lfo.set_sample_rate(sample_rate);
    }
}

const PHASER_STAGES: usize = 4;

/// Cascade of first-order allpass filters with a swept corner frequency.
#[derive(Debug, Clone)]
pub struct Phaser {
    centre_hz: f32,
    depth: f32,
    mix: f32,
    sample_rate: f32,
    lfo: Lfo,
    state: [f32; PHASER_STAGES],
}

impl Phaser {
    /// Creates a phaser sweeping `depth` (fraction of `centre_hz`) at `rate_hz`.
    #[must_use]
    pub fn new(rate_hz: f32, centre_hz: f32, depth: f32, mix: f32) -> Self {
        Self {
            centre_hz,
            depth: depth.clamp(0.0, 0.95),
            mix,
            sample_rate: DEFAULT_SAMPLE_RATE,
            lfo: Lfo::new(rate_hz),
            state: [0.0; PHASER_STAGES],
        }
    }

    fn coefficient(&self, corner_hz: f32) -> f32 {
        let nyquist_safe = corner_hz.min(self.sample_rate * 0.49);
        let t = (std::f32::consts::PI * nyquist_safe / self.sample_rate).tan();
        (t - 1.0) / (t + 1.0)
    }
}

impl Default for Phaser {
    fn default() -> Self {
        Self::new(1.0, 1300.0, 0.5, 0.5)
    }
}

impl Processor for Phaser {
    fn name(&self) -> &str {
        "Phaser"
    }

    fn process(&mut self, input: f32) -> f32 {
        let corner = self.centre_hz * (1.0 + self.depth * self.lfo.next());
        let a = self.coefficient(corner);

        let mut signal = input;
        for z in &mut self.state {
            let out = a * signal + *z;
            *z = signal - a * out;
            signal = out;
        }
        mix(input, signal, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.state = [0.0; PHASER_STAGES];
        self.lfo.set_sample_rate(sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::sine;

    #[test]
    fn test_lfo_stays_in_range() {
        let mut lfo = Lfo::new(5.0);
        lfo.set_sample_rate(1000.0);
        for _ in 0..1000 {
            let v = lfo.next();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_chorus_changes_signal() {
        let mut chorus = Chorus::default();
        chorus.set_sample_rate(48_000.0);
        let input = sine(440.0, 48_000.0, 4800);
        let changed = input
            .iter()
            .skip(1000)
            .any(|&s| (chorus.process(s) - s).abs() > 1e-3);
        assert!(changed);
    }

    #[test]
    fn test_phaser_passes_dc() {
        let mut phaser = Phaser::default();
        phaser.set_sample_rate(48_000.0);
        let mut out = 0.0;
        for _ in 0..48_000 {
            out = phaser.process(0.5);
        }
        assert!((out - 0.5).abs() < 1e-2);
    }
}
