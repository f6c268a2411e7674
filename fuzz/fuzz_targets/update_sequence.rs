#![no_main]

use libfuzzer_sys::fuzz_target;
use predictor::models::mixer::Policy;
use predictor::{Config, Predictor};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    // The first byte selects the order, the rest are the draws.
    let order = 1 + (data[0] % 12) as usize;
    let mut p = Predictor::new(Config::new(order)).unwrap();

    for (i, byte) in data[1..].iter().enumerate() {
        p.update(*byte as i64 - 128);
        assert_eq!(p.window().len(), order.min(i + 1));
    }

    let global = p.predict_global();
    let ctx = p.predict_with_context();
    assert!(ctx.order_used <= order);
    assert_eq!(ctx.key.len(), ctx.order_used);
    if ctx.order_used == 0 {
        assert_eq!(ctx.distribution, global.distribution);
    }

    let w = p.predict_combined(Policy::Weighted, 1.0);
    assert_eq!(w.distribution, ctx.distribution);
    let d = p.predict_combined(Policy::Default, 0.7);
    assert!((d.distribution.even + d.distribution.odd - 1.0).abs() < 1e-9);
});
