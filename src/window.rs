//! A bounded FIFO of the most recent labels. The window is the context that
//! all of the models are keyed on.

use std::collections::VecDeque;

use crate::label::Label;

/// Holds the last 'capacity' labels, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    labels: VecDeque<Label>,
    capacity: usize,
}

impl Window {
    /// Predictors reject order zero before creating a window.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "Window must hold at least one label");
        Self {
            labels: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append 'label' and evict the oldest label if the window overflows.
    pub fn push(&mut self, label: Label) {
        self.labels.push_back(label);
        if self.labels.len() > self.capacity {
            self.labels.pop_front();
        }
    }

    /// Return a copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<Label> {
        self.labels.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.labels.len() == self.capacity
    }

    /// Return the last 'k' labels, or None if the window holds fewer than 'k'
    /// labels.
    pub fn suffix(&self, k: usize) -> Option<Vec<Label>> {
        if k > self.labels.len() {
            return None;
        }
        Some(self.labels.range(self.labels.len() - k..).copied().collect())
    }

    /// Returns the repeated label if the window is full and all of the labels
    /// are the same.
    pub fn run_label(&self) -> Option<Label> {
        if !self.is_full() {
            return None;
        }
        let first = *self.labels.front()?;
        if self.labels.iter().all(|l| *l == first) {
            return Some(first);
        }
        None
    }

    /// Returns true if pushing 'label' would leave the window full with
    /// 'label' repeated. This does not modify the window.
    pub fn completes_run(&self, label: Label) -> bool {
        // After the push the window keeps the last capacity-1 labels plus
        // the new one.
        let keep = self.capacity.saturating_sub(1);
        if self.labels.len() < keep {
            return false;
        }
        self.labels
            .range(self.labels.len() - keep..)
            .all(|l| *l == label)
    }
}

#[test]
fn test_push_evicts_oldest() {
    use Label::{Even as E, Odd as O};

    let mut w = Window::new(3);
    assert!(w.is_empty());
    w.push(E);
    w.push(O);
    assert_eq!(w.snapshot(), vec![E, O]);
    assert!(!w.is_full());
    w.push(O);
    w.push(E);
    assert_eq!(w.snapshot(), vec![O, O, E]);
    assert_eq!(w.len(), 3);
    assert!(w.is_full());
}

#[test]
fn test_suffix() {
    use Label::{Even as E, Odd as O};

    let mut w = Window::new(3);
    assert_eq!(w.suffix(0), Some(vec![]));
    assert_eq!(w.suffix(1), None);
    w.push(E);
    w.push(O);
    assert_eq!(w.suffix(1), Some(vec![O]));
    assert_eq!(w.suffix(2), Some(vec![E, O]));
    assert_eq!(w.suffix(3), None);
}

#[test]
fn test_runs() {
    use Label::{Even as E, Odd as O};

    let mut w = Window::new(2);
    assert_eq!(w.run_label(), None);
    assert!(!w.completes_run(E));
    w.push(E);
    assert_eq!(w.run_label(), None);
    assert!(w.completes_run(E));
    assert!(!w.completes_run(O));
    w.push(E);
    assert_eq!(w.run_label(), Some(E));
    w.push(O);
    assert_eq!(w.run_label(), None);
    assert!(w.completes_run(O));
}

#[test]
fn test_order_one_always_completes() {
    use Label::{Even as E, Odd as O};

    let w = Window::new(1);
    assert!(w.completes_run(E));
    assert!(w.completes_run(O));
}

#[test]
fn test_completes_run_matches_push() {
    use Label::{Even as E, Odd as O};

    let seq = [E, E, O, E, E, E, O, O, O, O, E];
    for cap in 1..5 {
        let mut w = Window::new(cap);
        for l in seq {
            let predicted = w.completes_run(l);
            w.push(l);
            assert_eq!(predicted, w.run_label() == Some(l));
        }
    }
}
