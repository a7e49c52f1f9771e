use super::{db_to_gain, Processor};

/// Fixed +6 dB volume boost.
#[derive(Debug, Clone)]
pub struct Gain {
    factor: f32,
}

impl Gain {
    /// Creates a gain stage boosting by `db` decibels.
    #[must_use]
    pub fn new(db: f32) -> Self {
        Self {
            factor: db_to_gain(db),
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl Processor for Gain {
    fn name(&self) -> &str {
        "Gain"
    }

    fn process(&mut self, input: f32) -> f32 {
        input * self.factor
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}
}

/// Hyperbolic tangent waveshaper.
#[derive(Debug, Clone)]
pub struct Distortion {
    drive: f32,
}

impl Distortion {
    /// Creates a waveshaper driving the input by `drive_db` decibels.
    #[must_use]
    pub fn new(drive_db: f32) -> Self {
        Self {
            drive: db_to_gain(drive_db),
        }
    }
}

impl Default for Distortion {
    fn default() -> Self {
        Self::new(25.0)
    }
}

impl Processor for Distortion {
    fn name(&self) -> &str {
        "Distortion"
    }

    fn process(&mut self, input: f32) -> f32 {
        (input * self.drive).tanh()
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {}
}
