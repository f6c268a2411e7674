use serde::Serialize;

use crate::label::Label;
use crate::window::Window;

/// A trait that defines the interface for making predictions.
pub trait Model {
    /// The result of querying the model.
    type Prediction;

    /// Construct a new model that tracks contexts of up to 'order' labels.
    fn new(order: usize) -> Self;

    /// Record that 'label' followed the context 'window'. This is called
    /// before 'label' is pushed into the window.
    fn update(&mut self, window: &Window, label: Label);

    /// Return a prediction for the label that follows 'window'. This never
    /// modifies the model.
    #[must_use]
    fn predict(&self, window: &Window) -> Self::Prediction;
}

/// The number of times each label was observed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub even: u64,
    pub odd: u64,
}

impl Counts {
    pub fn new(even: u64, odd: u64) -> Self {
        Self { even, odd }
    }

    pub fn add(&mut self, label: Label) {
        match label {
            Label::Even => self.even += 1,
            Label::Odd => self.odd += 1,
        }
    }

    pub fn get(&self, label: Label) -> u64 {
        match label {
            Label::Even => self.even,
            Label::Odd => self.odd,
        }
    }

    pub fn total(&self) -> u64 {
        self.even + self.odd
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// A probability distribution over the labels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub even: f64,
    pub odd: f64,
}

impl Distribution {
    pub fn new(even: f64, odd: f64) -> Self {
        Self { even, odd }
    }

    /// The distribution that carries no information.
    pub fn uniform() -> Self {
        Self::new(0.5, 0.5)
    }

    /// Normalize 'counts' into a distribution. Returns None if there are no
    /// samples.
    pub fn from_counts(counts: &Counts) -> Option<Self> {
        let total = counts.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(Self::new(counts.even as f64 / total, counts.odd as f64 / total))
    }

    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Even => self.even,
            Label::Odd => self.odd,
        }
    }

    /// Return the most likely label. Ties go to the label that comes first in
    /// 'Label::ALL'.
    pub fn best(&self) -> Label {
        let mut best = Label::ALL[0];
        for label in Label::ALL {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }

    /// The highest probability.
    pub fn peak(&self) -> f64 {
        self.even.max(self.odd)
    }

    /// The lowest probability.
    pub fn floor(&self) -> f64 {
        self.even.min(self.odd)
    }

    /// Return 'w' * self + (1 - 'w') * 'other'.
    pub fn mix(&self, other: &Distribution, w: f64) -> Self {
        Self::new(
            w * self.even + (1.0 - w) * other.even,
            w * self.odd + (1.0 - w) * other.odd,
        )
    }
}

/// A label together with the distribution it was picked from.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub distribution: Distribution,
}

impl Prediction {
    pub fn from_distribution(distribution: Distribution) -> Self {
        Self {
            label: distribution.best(),
            distribution,
        }
    }
}

#[test]
fn test_distribution() {
    let d = Distribution::from_counts(&Counts::new(3, 2)).unwrap();
    assert_eq!(d, Distribution::new(0.6, 0.4));
    assert_eq!(d.best(), Label::Even);
    assert_eq!(d.peak(), 0.6);
    assert_eq!(d.floor(), 0.4);

    assert_eq!(Distribution::from_counts(&Counts::default()), None);
    assert_eq!(Distribution::uniform().best(), Label::Even);
    assert_eq!(Distribution::new(0.0, 1.0).best(), Label::Odd);

    let a = Distribution::new(1.0, 0.0);
    let b = Distribution::new(0.0, 1.0);
    assert_eq!(a.mix(&b, 1.0), a);
    assert_eq!(a.mix(&b, 0.0), b);
    assert_eq!(a.mix(&b, 0.5), Distribution::uniform());
}
