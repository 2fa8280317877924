//! Incremental statistics over an unbounded value stream
//!
//! Each update blends the new value in with ratio `max(1/k, ratio)` for the
//! k-th sample. The first ~1/ratio samples form a plain cumulative average;
//! after that the statistics decay like an exponential moving average.

/// Running mean, variance, min and max in O(1) memory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    mean: f64,
    var: f64,
    max: f64,
    min: f64,
    ratio: f64,
    count: usize,
}

/// Default floor on the blend ratio
pub const DEFAULT_RATIO: f64 = 0.01;

impl Default for Stats {
    fn default() -> Self {
        Self {
            mean: 0.0,
            var: 0.0,
            max: f64::MIN,
            min: f64::MAX,
            ratio: DEFAULT_RATIO,
            count: 0,
        }
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn var(&self) -> f64 {
        self.var
    }

    pub fn stdev(&self) -> f64 {
        self.var.sqrt()
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn update(&mut self, value: f64) {
        if self.count == 0 {
            self.mean = value;
            self.max = value;
            self.min = value;
            self.count = 1;
            return;
        }

        self.count += 1;
        let r = (1.0 / self.count as f64).max(self.ratio);
        let new_mean = self.mean * (1.0 - r) + r * value;
        self.var = self.var * (1.0 - r) + r * (value - self.mean) * (value - new_mean);
        self.mean = new_mean;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }
}
