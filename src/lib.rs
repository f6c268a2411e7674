pub mod consensus;
pub mod error;
pub mod history;
pub mod label;
pub mod models;
pub mod predictor;
pub mod sweep;
pub mod window;

pub use error::Error;
pub use label::Label;
pub use predictor::Predictor;

use models::mixer::DEFAULT_CONTEXT_WEIGHT;

/// Stores the parameters of an analysis session.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// The longest context that is tracked, which is also the window size.
    pub order: usize,
    /// The weight of the context model in the weighted policy.
    pub weight: f64,
    /// Only analyze the most recent observations. Zero means no limit.
    pub history_limit: usize,
}

impl Config {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            weight: DEFAULT_CONTEXT_WEIGHT,
            history_limit: 0,
        }
    }

    /// Set the context weight. Weights outside [0, 1] are clamped, and NaN
    /// keeps the default weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        if weight.is_nan() {
            log::warn!("Weight is NaN, using {}", DEFAULT_CONTEXT_WEIGHT);
            self.weight = DEFAULT_CONTEXT_WEIGHT;
            return self;
        }
        if !(0.0..=1.0).contains(&weight) {
            log::warn!("Weight {} is out of range, clamping", weight);
        }
        self.weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(3)
    }
}

#[test]
fn test_config_weight() {
    assert_eq!(Config::new(2).weight, DEFAULT_CONTEXT_WEIGHT);
    assert_eq!(Config::new(2).with_weight(0.25).weight, 0.25);
    assert_eq!(Config::new(2).with_weight(3.0).weight, 1.0);
    assert_eq!(Config::new(2).with_weight(-0.5).weight, 0.0);
    assert_eq!(Config::new(2).with_weight(f64::NAN).weight, 0.7);
}
