/// Circular buffer of past samples with fractional read access.
#[derive(Debug, Clone)]
pub(crate) struct DelayLine {
    buffer: Vec<f32>,
    write: usize,
}

impl DelayLine {
    /// Creates a line able to look back `max_delay` samples.
    pub fn new(max_delay: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay + 1],
            write: 0,
        }
    }

    /// Longest delay that can be read.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Returns the sample written `delay` samples ago, interpolating between
    /// neighbours. `delay` is clamped to `1..=max_delay`.
    pub fn read(&self, delay: f32) -> f32 {
        let delay = delay.clamp(1.0, self.max_delay().max(1) as f32);
        let whole = delay.floor();
        let frac = delay - whole;
        let a = self.tap(whole as usize);
        let b = self.tap(whole as usize + 1);
        a + (b - a) * frac
    }

    /// Appends a sample, overwriting the oldest one.
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write] = sample;
        self.write = (self.write + 1) % self.buffer.len();
    }

    fn tap(&self, delay: usize) -> f32 {
        let len = self.buffer.len();
        let delay = delay.min(len - 1);
        self.buffer[(self.write + len - delay) % len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_read() {
        let mut line = DelayLine::new(4);
        for s in [1.0, 2.0, 3.0] {
            line.write(s);
        }
        assert_eq!(line.read(1.0), 3.0);
        assert_eq!(line.read(3.0), 1.0);
    }

    #[test]
    fn test_fractional_read_interpolates() {
        let mut line = DelayLine::new(4);
        line.write(0.0);
        line.write(1.0);
        assert!((line.read(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_wraps_around() {
        let mut line = DelayLine::new(2);
        for s in [1.0, 2.0, 3.0, 4.0] {
            line.write(s);
        }
        assert_eq!(line.read(1.0), 4.0);
        assert_eq!(line.read(2.0), 3.0);
    }
}
