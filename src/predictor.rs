//! The predictor feeds observations into the run model and the context model
//! and answers the global, context and combined queries.

use serde_json::Value;

use crate::label::{label_from_json, Label};
use crate::models::mixer::{combine, Combined, Policy, DEFAULT_CONTEXT_WEIGHT};
use crate::models::model::{Counts, Model, Prediction};
use crate::models::runs::RunModel;
use crate::models::transitions::{ContextPrediction, TransitionModel};
use crate::window::Window;
use crate::{Config, Error};

/// Predicts the label of the next observation. Observations must be fed in
/// chronological order.
#[derive(Debug, Clone)]
pub struct Predictor {
    config: Config,
    /// The last 'order' labels.
    window: Window,
    runs: RunModel,
    transitions: TransitionModel,
    /// The number of observations that were processed.
    observations: usize,
}

impl Predictor {
    pub fn new(config: Config) -> Result<Self, Error> {
        if config.order == 0 {
            return Err(Error::InvalidOrder(config.order));
        }
        Ok(Self {
            config,
            window: Window::new(config.order),
            runs: RunModel::new(config.order),
            transitions: TransitionModel::new(config.order),
            observations: 0,
        })
    }

    /// Process the next observation 'num'.
    pub fn update(&mut self, num: i64) {
        self.update_label(Label::from_observation(num));
    }

    /// Process the next observation from a raw JSON value. The model is not
    /// modified if the value is not an integer.
    pub fn update_json(&mut self, value: &Value) -> Result<(), Error> {
        let label = label_from_json(value)?;
        self.update_label(label);
        Ok(())
    }

    /// Process the labels in order. Both models read the window before the
    /// new label is pushed.
    pub fn update_label(&mut self, label: Label) {
        self.transitions.update(&self.window, label);
        self.runs.update(&self.window, label);
        self.window.push(label);
        self.observations += 1;
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn observations(&self) -> usize {
        self.observations
    }

    pub fn run_counts(&self) -> &Counts {
        self.runs.run_counts()
    }

    /// Return the labels that followed a full run of 'label'.
    pub fn after_run_counts(&self, label: Label) -> &Counts {
        self.runs.after_run_counts(label)
    }

    /// Return the transition counts of the context 'key'.
    pub fn transition_counts(&self, key: &[Label]) -> Option<&Counts> {
        self.transitions.counts(key)
    }

    /// Return the number of distinct contexts of length 'k' that were seen.
    pub fn num_contexts(&self, k: usize) -> usize {
        self.transitions.num_contexts(k)
    }

    /// Predict using the frequency of full-window runs.
    pub fn predict_global(&self) -> Prediction {
        self.runs.predict(&self.window)
    }

    /// Predict using the longest context that has samples, or fall back to
    /// the global prediction with an empty context.
    pub fn predict_with_context(&self) -> ContextPrediction {
        if let Some(pred) = self.transitions.predict(&self.window) {
            return pred;
        }
        let global = self.predict_global();
        ContextPrediction {
            order_used: 0,
            key: Vec::new(),
            label: global.label,
            distribution: global.distribution,
        }
    }

    /// Combine the global and context predictions using 'policy'. The
    /// context weight 'weight' is only used by the weighted policy.
    pub fn predict_combined(&self, policy: Policy, weight: f64) -> Combined {
        let global = self.predict_global();
        let context = self.predict_with_context();
        combine(policy, self.clamp_weight(weight), &global, &context)
    }

    /// Look up the policy by name. Unknown names use the default policy.
    pub fn predict_combined_by_name(
        &self,
        name: &str,
        weight: f64,
    ) -> Combined {
        self.predict_combined(Policy::from_name(name), weight)
    }

    /// Weights are validated with a warning by 'Config::with_weight'. Here
    /// they are only forced into range.
    fn clamp_weight(&self, weight: f64) -> f64 {
        if !weight.is_nan() {
            return weight.clamp(0.0, 1.0);
        }
        match self.config.weight {
            w if w.is_nan() => DEFAULT_CONTEXT_WEIGHT,
            w => w.clamp(0.0, 1.0),
        }
    }

    /// Process the labels in order.
    pub fn extend_labels<I: IntoIterator<Item = Label>>(&mut self, iter: I) {
        for label in iter {
            self.update_label(label);
        }
    }
}

impl Extend<i64> for Predictor {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for num in iter {
            self.update(num);
        }
    }
}
