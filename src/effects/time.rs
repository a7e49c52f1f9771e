use super::delay_line::DelayLine;
use super::{mix, Processor, DEFAULT_SAMPLE_RATE};

/// Single echo with optional feedback.
#[derive(Debug, Clone)]
pub struct Delay {
    seconds: f32,
    feedback: f32,
    mix: f32,
    delay_samples: f32,
    line: DelayLine,
}

impl Delay {
    /// Creates an echo `seconds` long.
    #[must_use]
    pub fn new(seconds: f32, feedback: f32, mix: f32) -> Self {
        let mut delay = Self {
            seconds,
            feedback: feedback.clamp(0.0, 0.95),
            mix,
            delay_samples: 1.0,
            line: DelayLine::new(1),
        };
        delay.set_sample_rate(DEFAULT_SAMPLE_RATE);
        delay
    }
}

impl Default for Delay {
    fn default() -> Self {
        Self::new(0.5, 0.0, 0.5)
    }
}

impl Processor for Delay {
    fn name(&self) -> &str {
        "Delay"
    }

    fn process(&mut self, input: f32) -> f32 {
        let echo = self.line.read(self.delay_samples);
        self.line.write(input + echo * self.feedback);
        mix(input, echo, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.delay_samples = (self.seconds * sample_rate).max(1.0);
        self.line = DelayLine::new(self.delay_samples.ceil() as usize + 1);
    }
}

// Comb and allpass lengths tuned at 44.1kHz, scaled to the actual rate.
const COMB_TUNING: [usize; 4] = [1116, 1188, 1277, 1356];
const ALLPASS_TUNING: [usize; 2] = [556, 441];

const COMB_FEEDBACK: f32 = 0.84;
const COMB_DAMPING: f32 = 0.2;
const ALLPASS_FEEDBACK: f32 = 0.5;

#[derive(Debug, Clone)]
struct Comb {
    line: DelayLine,
    length: f32,
    store: f32,
}

impl Comb {
    fn new(length: usize) -> Self {
        Self {
            line: DelayLine::new(length),
            length: length as f32,
            store: 0.0,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let out = self.line.read(self.length);
        self.store = out * (1.0 - COMB_DAMPING) + self.store * COMB_DAMPING;
        self.line.write(input + self.store * COMB_FEEDBACK);
        out
    }
}

#[derive(Debug, Clone)]
struct Allpass {
    line: DelayLine,
    length: f32,
}

impl Allpass {
    fn new(length: usize) -> Self {
        Self {
            line: DelayLine::new(length),
            length: length as f32,
        }
    }

    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.line.read(self.length);
        self.line.write(input + delayed * ALLPASS_FEEDBACK);
        delayed - input
    }
}

/// Small Schroeder-style room: parallel damped combs into series allpasses.
#[derive(Debug, Clone)]
pub struct Reverb {
    mix: f32,
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
}

impl Reverb {
    /// Creates a reverb blending `mix` of the wet signal.
    #[must_use]
    pub fn new(mix: f32) -> Self {
        let mut reverb = Self {
            mix,
            combs: Vec::new(),
            allpasses: Vec::new(),
        };
        reverb.set_sample_rate(DEFAULT_SAMPLE_RATE);
        reverb
    }
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new(0.33)
    }
}

impl Processor for Reverb {
    fn name(&self) -> &str {
        "Reverb"
    }

    fn process(&mut self, input: f32) -> f32 {
        let scaled = input * 0.25;
        let mut wet: f32 = self.combs.iter_mut().map(|c| c.process(scaled)).sum();
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }
        mix(input, wet, self.mix)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        let scale = sample_rate / DEFAULT_SAMPLE_RATE;
        let scaled = |n: usize| ((n as f32 * scale) as usize).max(1);
        self.combs = COMB_TUNING.iter().map(|&n| Comb::new(scaled(n))).collect();
        self.allpasses = ALLPASS_TUNING
            .iter()
            .map(|&n| Allpass::new(scaled(n)))
            .collect();
    }
}
