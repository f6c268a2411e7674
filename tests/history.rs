use predictor::consensus::Consensus;
use predictor::history::{History, ParseMode};
use predictor::models::mixer::{Policy, Source};
use predictor::models::model::Counts;
use predictor::sweep::sweep;
use predictor::{Config, Error, Label, Predictor};

use std::io::Write;

fn write_history(text: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(text.as_bytes()).unwrap();
    f
}

#[test]
fn test_load_history() {
    let f = write_history(r#"["02", "04", 1, "3", 2, "--"]"#);
    let h = History::load(f.path(), ParseMode::Lenient).unwrap();
    assert_eq!(h, History::from_observations(&[2, 4, 1, 3, 2]));

    assert!(matches!(
        History::load(f.path(), ParseMode::Strict),
        Err(Error::InvalidHistory { position: 5, .. })
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(matches!(
        History::load(path, ParseMode::Lenient),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_limit_then_predict() {
    let f = write_history("[9, 9, 9, 9, 2, 4, 1, 3, 2]");
    let config = Config::new(1).with_history_limit(5);
    let h = History::load(f.path(), ParseMode::Strict)
        .unwrap()
        .limit(config.history_limit);
    assert_eq!(h.len(), 5);

    let mut p = Predictor::new(config).unwrap();
    p.extend_labels(h.iter());
    assert_eq!(p.predict_global().label, Label::Even);
    assert_eq!(p.predict_global().distribution.even, 0.6);
}

#[test]
fn test_consensus() {
    let mut p = Predictor::new(Config::new(2)).unwrap();
    p.extend([2, 4, 1, 3]);
    let c = Consensus::from_predictor(&p, 0.7);

    assert_eq!(c.order, 2);
    assert_eq!(c.observations, 4);
    assert_eq!(c.window, vec![Label::Odd, Label::Odd]);
    assert_eq!(c.current_run, Some(Label::Odd));
    assert_eq!(c.combined.len(), 3);
    assert_eq!(c.votes.total(), 3);
    assert!(!c.tie_broken);
    // Lengths 1 and 2 each saw (E,) (O,) and (E, E) (E, O).
    assert_eq!(c.contexts_seen, vec![2, 2]);

    // Global: runs (E, E) once and (O, O) once, so it is uniform.
    // Context: (O,) was always followed by O.
    assert_eq!(c.global.label, Label::Even);
    assert_eq!(c.context.label, Label::Odd);

    // 0.7 * 1.0 + 0.3 * 0.5 for odd.
    let weighted = c.policy(Policy::Weighted).unwrap();
    assert_eq!(weighted.label, Label::Odd);
    let conservative = c.policy(Policy::Conservative).unwrap();
    assert_eq!(conservative.source, Source::ContextConfidence);
    let aggressive = c.policy(Policy::Aggressive).unwrap();
    assert_eq!(aggressive.source, Source::GlobalFloor);
    assert_eq!(aggressive.label, Label::Even);
    assert!(c.policy(Policy::Default).is_none());

    assert_eq!(c.votes.odd, 2);
    assert_eq!(c.recommendation, Label::Odd);
}

#[test]
fn test_sweep_matches_individual_runs() {
    let history = [2, 4, 1, 3, 3, 8, 5, 6, 6, 1, 7, 0, 2];
    let labels = History::from_observations(&history);
    let report = sweep(labels.as_slice(), 1..=9, 0.7).unwrap();
    assert_eq!(report.rows.len(), 9);

    for row in &report.rows {
        let mut p = Predictor::new(Config::new(row.order)).unwrap();
        p.extend(history.iter().copied());
        let c = Consensus::from_predictor(&p, 0.7);
        assert_eq!(row.global, c.global.label);
        assert_eq!(row.context, c.context.label);
        assert_eq!(row.context_order_used, c.context.order_used);
        assert_eq!(row.combined, c.recommendation);
    }

    let total = report.total();
    assert_eq!(total.total(), 27);
}

#[test]
fn test_oversized_draws_feed_the_predictor() {
    let f = write_history("[18446744073709551615, 1e30, 7]");
    let h = History::load(f.path(), ParseMode::Strict).unwrap();
    let mut p = Predictor::new(Config::new(1)).unwrap();
    p.extend_labels(h.iter());
    assert_eq!(p.observations(), 3);
    assert_eq!(p.window().snapshot(), vec![Label::Odd]);
    // With order 1 every draw is a run of its own label.
    assert_eq!(*p.run_counts(), Counts::new(1, 2));
}

#[test]
fn test_reports_serialize() {
    let history = History::from_observations(&[2, 4, 1, 3]);
    let report = sweep(history.as_slice(), 1..=2, 0.7).unwrap();
    let text = serde_json::to_string(&report).unwrap();
    assert!(text.contains("\"rows\""));
    assert!(text.contains("\"Even\"") || text.contains("\"Odd\""));
}
