//! A variable-order Markov model. For each context length k in 1..=order the
//! model counts which label followed every observed sequence of k labels.
//! Predictions back off from the longest context to the shortest one.

use serde::Serialize;
use std::collections::HashMap;

use super::model::{Counts, Distribution, Model};
use crate::label::Label;
use crate::window::Window;

/// The result of a context lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextPrediction {
    /// The length of the context that produced the prediction. Zero means
    /// that no context had any samples.
    pub order_used: usize,
    /// The context that was matched (empty when 'order_used' is zero).
    pub key: Vec<Label>,
    pub label: Label,
    pub distribution: Distribution,
}

/// Maps contexts of each length to the labels that followed them.
#[derive(Debug, Clone)]
pub struct TransitionModel {
    /// The table at index k-1 is keyed by contexts of length k. Entries are
    /// only created by updates, so every entry has at least one sample.
    tables: Vec<HashMap<Vec<Label>, Counts>>,
}

impl TransitionModel {
    pub fn order(&self) -> usize {
        self.tables.len()
    }

    /// Return the counts recorded for the context 'key', if any. The length
    /// of the key selects the table.
    pub fn counts(&self, key: &[Label]) -> Option<&Counts> {
        if key.is_empty() {
            return None;
        }
        self.tables.get(key.len() - 1)?.get(key)
    }

    /// Return the number of distinct contexts of length 'k' that were seen.
    pub fn num_contexts(&self, k: usize) -> usize {
        match k {
            0 => 0,
            _ => self.tables.get(k - 1).map_or(0, |t| t.len()),
        }
    }
}

impl Model for TransitionModel {
    type Prediction = Option<ContextPrediction>;

    fn new(order: usize) -> Self {
        Self {
            tables: vec![HashMap::new(); order],
        }
    }

    fn update(&mut self, window: &Window, label: Label) {
        for (i, table) in self.tables.iter_mut().enumerate() {
            match window.suffix(i + 1) {
                Some(key) => table.entry(key).or_default().add(label),
                // Longer contexts don't fit either.
                None => break,
            }
        }
    }

    fn predict(&self, window: &Window) -> Option<ContextPrediction> {
        for k in (1..=self.order()).rev() {
            let Some(key) = window.suffix(k) else {
                continue;
            };
            let Some(counts) = self.counts(&key) else {
                continue;
            };
            if let Some(distribution) = Distribution::from_counts(counts) {
                log::debug!("Matched a context of length {}: {:?}", k, key);
                return Some(ContextPrediction {
                    order_used: k,
                    key,
                    label: distribution.best(),
                    distribution,
                });
            }
        }
        None
    }
}

#[cfg(test)]
fn feed(order: usize, labels: &[Label]) -> (TransitionModel, Window) {
    let mut model = TransitionModel::new(order);
    let mut window = Window::new(order);
    for label in labels {
        model.update(&window, *label);
        window.push(*label);
    }
    (model, window)
}

#[test]
fn test_counts_all_lengths() {
    use Label::{Even as E, Odd as O};

    let (model, _) = feed(2, &[E, E, O, O]);
    assert_eq!(model.counts(&[E]), Some(&Counts::new(1, 1)));
    assert_eq!(model.counts(&[O]), Some(&Counts::new(0, 1)));
    assert_eq!(model.counts(&[E, E]), Some(&Counts::new(0, 1)));
    assert_eq!(model.counts(&[E, O]), Some(&Counts::new(0, 1)));
    assert_eq!(model.counts(&[O, O]), None);
    assert_eq!(model.counts(&[]), None);
    assert_eq!(model.counts(&[E, E, E]), None);
    assert_eq!(model.num_contexts(1), 2);
    assert_eq!(model.num_contexts(2), 2);
}

#[test]
fn test_back_off() {
    use Label::{Even as E, Odd as O};

    let (model, window) = feed(2, &[E, E, O, O]);
    let pred = model.predict(&window).unwrap();
    assert_eq!(pred.order_used, 1);
    assert_eq!(pred.key, vec![O]);
    assert_eq!(pred.label, O);
    assert_eq!(pred.distribution, Distribution::new(0.0, 1.0));
}

#[test]
fn test_lookups_do_not_create_entries() {
    use Label::{Even as E, Odd as O};

    let (model, window) = feed(3, &[E, O]);
    assert_eq!(model.counts(&[O, O]), None);
    let _ = model.predict(&window);
    assert_eq!(model.num_contexts(2), 0);
    assert_eq!(model.num_contexts(1), 1);
}

#[test]
fn test_empty_model() {
    let (model, window) = feed(2, &[]);
    assert_eq!(model.predict(&window), None);
}
