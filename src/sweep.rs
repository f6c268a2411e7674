//! Replays the same history through a fresh predictor for each order in a
//! range and tallies the recommendations.

use serde::Serialize;

use crate::consensus::Consensus;
use crate::label::Label;
use crate::models::model::Counts;
use crate::predictor::Predictor;
use crate::{Config, Error};

/// The recommendations of a single order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReport {
    pub order: usize,
    pub global: Label,
    pub context: Label,
    /// The context length that the context prediction used.
    pub context_order_used: usize,
    pub combined: Label,
}

/// The recommendations of all of the orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub rows: Vec<OrderReport>,
    pub global: Counts,
    pub context: Counts,
    pub combined: Counts,
}

impl SweepReport {
    fn push(&mut self, row: OrderReport) {
        self.global.add(row.global);
        self.context.add(row.context);
        self.combined.add(row.combined);
        self.rows.push(row);
    }

    /// The votes of all of the categories together.
    pub fn total(&self) -> Counts {
        Counts::new(
            self.global.even + self.context.even + self.combined.even,
            self.global.odd + self.context.odd + self.combined.odd,
        )
    }
}

/// Build an independent predictor for every order in 'orders', replay
/// 'history' into each of them and collect their recommendations. The
/// context weight 'weight' is used by the weighted policy.
pub fn sweep<I>(
    history: &[Label],
    orders: I,
    weight: f64,
) -> Result<SweepReport, Error>
where
    I: IntoIterator<Item = usize>,
{
    let mut report = SweepReport::default();

    for order in orders {
        let config = Config::new(order).with_weight(weight);
        let mut predictor = Predictor::new(config)?;
        predictor.extend_labels(history.iter().copied());

        let consensus = Consensus::from_predictor(&predictor, weight);
        let row = OrderReport {
            order,
            global: consensus.global.label,
            context: consensus.context.label,
            context_order_used: consensus.context.order_used,
            combined: consensus.recommendation,
        };
        log::debug!("{:?}", row);
        report.push(row);
    }

    log::info!(
        "Swept {} orders over {} observations.",
        report.rows.len(),
        history.len()
    );
    Ok(report)
}

#[test]
fn test_sweep_rejects_order_zero() {
    use crate::history::History;

    let history = History::from_observations(&[1, 2, 3]);
    assert!(matches!(
        sweep(history.as_slice(), 0..=2, 0.7),
        Err(Error::InvalidOrder(0))
    ));
}

#[test]
fn test_sweep_tallies() {
    use crate::history::History;

    let history = History::from_observations(&[2, 4, 1, 3, 2]);
    let report = sweep(history.as_slice(), 1..=3, 0.7).unwrap();
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.global.total(), 3);
    assert_eq!(report.context.total(), 3);
    assert_eq!(report.combined.total(), 3);
    assert_eq!(report.total().total(), 9);
    assert_eq!(report.rows[0].order, 1);
    assert_eq!(report.rows[0].global, Label::Even);
}
