//! Runs the weighted, conservative and aggressive policies on a predictor and
//! turns their votes into a single recommendation.

use serde::Serialize;

use crate::label::Label;
use crate::models::mixer::{Combined, Policy};
use crate::models::model::{Counts, Distribution, Prediction};
use crate::models::transitions::ContextPrediction;
use crate::predictor::Predictor;

/// The policies that take part in the vote.
pub const VOTING_POLICIES: [Policy; 3] =
    [Policy::Weighted, Policy::Conservative, Policy::Aggressive];

/// A summary of all of the predictions of a predictor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Consensus {
    pub order: usize,
    pub observations: usize,
    /// The current window, oldest first.
    pub window: Vec<Label>,
    /// The repeated label, if the window is currently a run.
    pub current_run: Option<Label>,
    pub run_counts: Counts,
    /// The number of distinct contexts seen, for each length 1..=order.
    pub contexts_seen: Vec<usize>,
    pub global: Prediction,
    pub context: ContextPrediction,
    /// One entry per policy in 'VOTING_POLICIES'.
    pub combined: Vec<Combined>,
    pub votes: Counts,
    pub recommendation: Label,
    /// True if the votes were tied and the average distribution decided.
    pub tie_broken: bool,
}

impl Consensus {
    pub fn from_predictor(predictor: &Predictor, weight: f64) -> Self {
        let combined: Vec<Combined> = VOTING_POLICIES
            .iter()
            .map(|p| predictor.predict_combined(*p, weight))
            .collect();

        let mut votes = Counts::default();
        for c in &combined {
            votes.add(c.label);
        }

        let (recommendation, tie_broken) = decide(&votes, &combined);
        log::debug!(
            "Order {}: {} even votes, {} odd votes, recommending {}",
            predictor.order(),
            votes.even,
            votes.odd,
            recommendation
        );

        let window = predictor.window();
        Self {
            order: predictor.order(),
            observations: predictor.observations(),
            window: window.snapshot(),
            current_run: window.run_label(),
            run_counts: *predictor.run_counts(),
            contexts_seen: (1..=predictor.order())
                .map(|k| predictor.num_contexts(k))
                .collect(),
            global: predictor.predict_global(),
            context: predictor.predict_with_context(),
            combined,
            votes,
            recommendation,
            tie_broken,
        }
    }

    /// Return the output of 'policy', if it took part in the vote.
    pub fn policy(&self, policy: Policy) -> Option<&Combined> {
        let idx = VOTING_POLICIES.iter().position(|p| *p == policy)?;
        self.combined.get(idx)
    }
}

/// Pick the majority label. A tied vote is settled by the average of the
/// distributions, and then by label priority.
fn decide(votes: &Counts, combined: &[Combined]) -> (Label, bool) {
    let (even, odd) = (votes.get(Label::Even), votes.get(Label::Odd));
    if even != odd {
        let winner = if even > odd { Label::Even } else { Label::Odd };
        return (winner, false);
    }

    if combined.is_empty() {
        return (Label::ALL[0], true);
    }
    let n = combined.len() as f64;
    let mut avg = Distribution::new(0.0, 0.0);
    for c in combined {
        avg.even += c.distribution.even / n;
        avg.odd += c.distribution.odd / n;
    }
    (avg.best(), true)
}

#[cfg(test)]
fn combined_for_test(label: Label, even: f64) -> Combined {
    use crate::models::mixer::Source;

    Combined {
        label,
        distribution: Distribution::new(even, 1.0 - even),
        source: Source::Weighted,
    }
}

#[test]
fn test_majority() {
    let votes = Counts::new(1, 2);
    let c = [
        combined_for_test(Label::Even, 0.9),
        combined_for_test(Label::Odd, 0.4),
        combined_for_test(Label::Odd, 0.4),
    ];
    assert_eq!(decide(&votes, &c), (Label::Odd, false));
}

#[test]
fn test_tie_uses_average() {
    let votes = Counts::new(1, 1);
    let c = [
        combined_for_test(Label::Even, 0.9),
        combined_for_test(Label::Odd, 0.4),
    ];
    assert_eq!(decide(&votes, &c), (Label::Even, true));

    let c = [
        combined_for_test(Label::Even, 0.5),
        combined_for_test(Label::Odd, 0.5),
    ];
    assert_eq!(decide(&votes, &c), (Label::Even, true));

    assert_eq!(decide(&Counts::default(), &[]), (Label::Even, true));
}
