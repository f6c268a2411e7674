//! Counts how often the window fills up with a single repeated label, and
//! what comes right after such a run.

use super::model::{Counts, Distribution, Model, Prediction};
use crate::label::Label;
use crate::window::Window;

/// A model that predicts the next label from the global frequency of
/// full-window runs. Only the fixed-length pattern is counted: a run that is
/// longer than the window is seen once per update while the window stays
/// homogeneous, and is never tracked as a longer run.
#[derive(Debug, Clone)]
pub struct RunModel {
    order: usize,
    /// The number of updates that left a full homogeneous window, per label.
    runs: Counts,
    /// For each run label, the labels that immediately followed the run.
    after_runs: [Counts; 2],
}

impl RunModel {
    pub fn run_counts(&self) -> &Counts {
        &self.runs
    }

    /// Return the labels that were observed right after a run of 'label'.
    pub fn after_run_counts(&self, label: Label) -> &Counts {
        &self.after_runs[label.index()]
    }
}

impl Model for RunModel {
    type Prediction = Prediction;

    fn new(order: usize) -> Self {
        Self {
            order,
            runs: Counts::default(),
            after_runs: [Counts::default(); 2],
        }
    }

    fn update(&mut self, window: &Window, label: Label) {
        debug_assert_eq!(window.capacity(), self.order);
        // The window before the push ended a run.
        if let Some(run) = window.run_label() {
            self.after_runs[run.index()].add(label);
        }
        // The window after the push is a run.
        if window.completes_run(label) {
            self.runs.add(label);
        }
    }

    fn predict(&self, _window: &Window) -> Prediction {
        let distribution = Distribution::from_counts(&self.runs)
            .unwrap_or_else(Distribution::uniform);
        Prediction::from_distribution(distribution)
    }
}

#[cfg(test)]
fn feed(order: usize, nums: &[i64]) -> (RunModel, Window) {
    let mut model = RunModel::new(order);
    let mut window = Window::new(order);
    for n in nums {
        let label = Label::from_observation(*n);
        model.update(&window, label);
        window.push(label);
    }
    (model, window)
}

#[test]
fn test_order_one_is_label_frequency() {
    let (model, window) = feed(1, &[2, 4, 1, 3, 2]);
    assert_eq!(*model.run_counts(), Counts::new(3, 2));
    let pred = model.predict(&window);
    assert_eq!(pred.label, Label::Even);
    assert_eq!(pred.distribution, Distribution::new(0.6, 0.4));
}

#[test]
fn test_no_runs_before_window_fills() {
    let (model, window) = feed(3, &[2, 4]);
    assert!(model.run_counts().is_empty());
    assert!(model.after_run_counts(Label::Even).is_empty());
    let pred = model.predict(&window);
    assert_eq!(pred.distribution, Distribution::uniform());
    assert_eq!(pred.label, Label::Even);
}

#[test]
fn test_long_runs_count_per_window() {
    // Five evens with order 2 fill the window four times, and each of
    // the first four windows is followed by another label.
    let (model, _) = feed(2, &[2, 4, 6, 8, 10, 1]);
    assert_eq!(*model.run_counts(), Counts::new(4, 0));
    assert_eq!(*model.after_run_counts(Label::Even), Counts::new(3, 1));
    assert!(model.after_run_counts(Label::Odd).is_empty());
}
