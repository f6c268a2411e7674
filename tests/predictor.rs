use predictor::models::mixer::{Policy, Source};
use predictor::models::model::{Counts, Distribution};
use predictor::{Config, Error, Label, Predictor};
use serde_json::json;

use Label::{Even as E, Odd as O};

fn predictor_with(order: usize, nums: &[i64]) -> Predictor {
    let mut p = Predictor::new(Config::new(order)).unwrap();
    p.extend(nums.iter().copied());
    p
}

#[test]
fn test_order_zero_is_rejected() {
    assert!(matches!(
        Predictor::new(Config::new(0)),
        Err(Error::InvalidOrder(0))
    ));
}

#[test]
fn test_empty_predictor() {
    let p = predictor_with(3, &[]);
    let global = p.predict_global();
    assert_eq!(global.distribution, Distribution::new(0.5, 0.5));
    assert_eq!(global.label, E);

    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 0);
    assert!(ctx.key.is_empty());
    assert_eq!(ctx.label, global.label);
    assert_eq!(ctx.distribution, global.distribution);
}

#[test]
fn test_short_history_falls_back_to_global() {
    // A single observation never produces a transition.
    let p = predictor_with(3, &[7]);
    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 0);
    assert_eq!(ctx.distribution, p.predict_global().distribution);

    // The last label was never followed by anything.
    let p = predictor_with(4, &[5, 8]);
    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 0);
    assert!(ctx.key.is_empty());
    let global = p.predict_global();
    assert_eq!(ctx.label, global.label);
    assert_eq!(ctx.distribution, global.distribution);
}

#[test]
fn test_order_one_run_frequency() {
    let p = predictor_with(1, &[2, 4, 1, 3, 2]);
    assert_eq!(p.window().snapshot(), vec![E]);
    assert_eq!(*p.run_counts(), Counts::new(3, 2));

    let global = p.predict_global();
    assert_eq!(global.label, E);
    assert_eq!(global.distribution, Distribution::new(0.6, 0.4));
}

#[test]
fn test_order_two_backs_off_to_one() {
    let p = predictor_with(2, &[2, 4, 1, 3]);
    assert_eq!(p.window().snapshot(), vec![O, O]);
    assert_eq!(p.transition_counts(&[E]), Some(&Counts::new(1, 1)));
    assert_eq!(p.transition_counts(&[O]), Some(&Counts::new(0, 1)));
    assert_eq!(p.transition_counts(&[O, O]), None);

    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 1);
    assert_eq!(ctx.key, vec![O]);
    assert_eq!(ctx.label, O);
    assert_eq!(ctx.distribution, Distribution::new(0.0, 1.0));
}

#[test]
fn test_order_three_skips_unseen_contexts() {
    // Labels: O E E E O. Neither (E, E, O) nor (E, O) were ever followed by
    // a label, but (O,) was followed by E.
    let p = predictor_with(3, &[1, 2, 4, 6, 3]);
    assert_eq!(p.window().snapshot(), vec![E, E, O]);
    assert_eq!(p.transition_counts(&[E, E, O]), None);
    assert_eq!(p.transition_counts(&[E, O]), None);

    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 1);
    assert_eq!(ctx.key, vec![O]);
    assert_eq!(ctx.label, E);
    assert_eq!(ctx.distribution, Distribution::new(1.0, 0.0));
}

#[test]
fn test_longest_context_wins() {
    // E O E O E: the context (O, E) was followed by O once.
    let p = predictor_with(2, &[2, 1, 2, 1, 2]);
    let ctx = p.predict_with_context();
    assert_eq!(ctx.order_used, 2);
    assert_eq!(ctx.key, vec![O, E]);
    assert_eq!(ctx.label, O);
}

#[test]
fn test_after_runs() {
    let p = predictor_with(2, &[1, 3, 2, 5, 7, 9, 4]);
    // Runs of odd labels: after (1, 3), (5, 7) and (7, 9).
    assert_eq!(*p.run_counts(), Counts::new(0, 3));
    // (1, 3) -> 2, (5, 7) -> 9, (7, 9) -> 4.
    assert_eq!(*p.after_run_counts(O), Counts::new(2, 1));
    assert!(p.after_run_counts(E).is_empty());
}

#[test]
fn test_queries_are_pure() {
    let p = predictor_with(3, &[3, 8, 1, 1, 6, 4, 9, 2, 7, 7]);
    assert_eq!(p.predict_global(), p.predict_global());
    assert_eq!(p.predict_with_context(), p.predict_with_context());
    for policy in ["weighted", "conservative", "aggressive", "default"] {
        assert_eq!(
            p.predict_combined_by_name(policy, 0.7),
            p.predict_combined_by_name(policy, 0.7)
        );
    }
}

#[test]
fn test_weighted_boundaries() {
    let p = predictor_with(2, &[2, 4, 1, 3, 3, 8, 5]);
    let ctx = p.predict_with_context();
    let global = p.predict_global();

    let full = p.predict_combined(Policy::Weighted, 1.0);
    assert_eq!(full.distribution, ctx.distribution);
    assert_eq!(full.source, Source::Weighted);

    let none = p.predict_combined(Policy::Weighted, 0.0);
    assert_eq!(none.distribution, global.distribution);
}

#[test]
fn test_out_of_range_weight_is_clamped() {
    let p = predictor_with(2, &[2, 4, 1, 3, 3, 8, 5]);
    assert_eq!(
        p.predict_combined(Policy::Weighted, 7.0),
        p.predict_combined(Policy::Weighted, 1.0)
    );
    assert_eq!(
        p.predict_combined(Policy::Weighted, -1.0),
        p.predict_combined(Policy::Weighted, 0.0)
    );
    assert_eq!(
        p.predict_combined(Policy::Weighted, f64::NAN),
        p.predict_combined(Policy::Weighted, 0.7)
    );
}

#[test]
fn test_unknown_policy_uses_default() {
    let p = predictor_with(2, &[2, 4, 1, 3]);
    let r = p.predict_combined_by_name("majority-vote", 0.7);
    assert_eq!(r.source, Source::ContextDefault);
    assert_eq!(r, p.predict_combined(Policy::Default, 0.7));
    assert_eq!(r.label, O);

    let empty = predictor_with(2, &[]);
    let r = empty.predict_combined_by_name("???", 0.7);
    assert_eq!(r.source, Source::GlobalDefault);
    assert_eq!(r.distribution, Distribution::uniform());
}

#[test]
fn test_update_json_is_all_or_nothing() {
    let mut p = predictor_with(2, &[2, 4, 1]);
    let before = p.clone();

    for bad in [json!(2.5), json!("seven"), json!(null), json!({"n": 1})] {
        assert!(matches!(
            p.update_json(&bad),
            Err(Error::InvalidObservation(_))
        ));
    }
    assert_eq!(p.observations(), before.observations());
    assert_eq!(p.window(), before.window());
    assert_eq!(p.run_counts(), before.run_counts());
    assert_eq!(p.predict_with_context(), before.predict_with_context());

    p.update_json(&json!("03")).unwrap();
    p.update_json(&json!(10)).unwrap();
    assert_eq!(p.observations(), 5);
    assert_eq!(p.window().snapshot(), vec![O, E]);
}
