//! Benchmark for feeding observations and querying the predictor.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use predictor::models::mixer::Policy;
use predictor::{Config, Predictor};

fn get_draws(items: usize) -> Vec<i64> {
    let mut input = Vec::new();
    let mut v: i64 = 0;
    for i in 0..items as i64 {
        v += 7;
        input.push((i ^ v) % 100);
    }
    input
}

fn replay(order: usize, draws: &[i64]) -> Predictor {
    let mut p = Predictor::new(Config::new(order)).unwrap();
    p.extend(draws.iter().copied());
    p
}

fn update_order_1() {
    let draws = get_draws(100_000);
    black_box(replay(1, &draws).observations());
}

fn update_order_9() {
    let draws = get_draws(100_000);
    black_box(replay(9, &draws).observations());
}

fn predict_all_policies() {
    let draws = get_draws(10_000);
    let p = replay(6, &draws);
    for policy in [Policy::Weighted, Policy::Conservative, Policy::Aggressive] {
        black_box(p.predict_combined(policy, 0.7));
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("update order 1", |b| b.iter(update_order_1));
    c.bench_function("update order 9", |b| b.iter(update_order_9));
    c.bench_function("predict policies", |b| b.iter(predict_all_policies));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
