//! This module contains the policies that mix the global run model with the
//! context model.

use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::model::{Distribution, Prediction};
use super::transitions::ContextPrediction;
use crate::label::Label;

/// The default weight of the context model in the weighted policy.
pub const DEFAULT_CONTEXT_WEIGHT: f64 = 0.7;

/// Selects how the two predictions are combined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Policy {
    /// A weighted average of the two distributions.
    Weighted,
    /// Pick the distribution with the most confident label.
    Conservative,
    /// Pick the distribution with the highest minimum probability.
    Aggressive,
    /// Use the context if it had any samples, otherwise the global model.
    Default,
}

impl Policy {
    /// Look up a policy by name. Unknown names select 'Policy::Default'.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "weighted" => Policy::Weighted,
            "conservative" => Policy::Conservative,
            "aggressive" => Policy::Aggressive,
            _ => Policy::Default,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::Weighted => "weighted",
            Policy::Conservative => "conservative",
            Policy::Aggressive => "aggressive",
            Policy::Default => "default",
        }
    }
}

impl FromStr for Policy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Policy::from_name(s))
    }
}

/// Describes which prediction a policy picked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Source {
    Weighted,
    ContextConfidence,
    GlobalConfidence,
    ContextFloor,
    GlobalFloor,
    ContextDefault,
    GlobalDefault,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Source::Weighted => "weighted",
            Source::ContextConfidence => "context (higher confidence)",
            Source::GlobalConfidence => "global (higher confidence)",
            Source::ContextFloor => "context (higher floor)",
            Source::GlobalFloor => "global (higher floor)",
            Source::ContextDefault => "context (default)",
            Source::GlobalDefault => "global (default)",
        };
        write!(f, "{}", tag)
    }
}

/// The output of a policy.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Combined {
    pub label: Label,
    pub distribution: Distribution,
    pub source: Source,
}

impl Combined {
    fn new(distribution: Distribution, label: Label, source: Source) -> Self {
        Self {
            label,
            distribution,
            source,
        }
    }
}

/// Combine the 'global' and 'context' predictions with 'policy'. The weight
/// 'w' of the context is only used by the weighted policy and must be in the
/// range [0, 1]. Ties between the two sources go to the context.
pub fn combine(
    policy: Policy,
    w: f64,
    global: &Prediction,
    context: &ContextPrediction,
) -> Combined {
    let pg = &global.distribution;
    let pc = &context.distribution;

    match policy {
        Policy::Weighted => {
            debug_assert!((0.0..=1.0).contains(&w));
            let mixed = pc.mix(pg, w);
            Combined::new(mixed, mixed.best(), Source::Weighted)
        }
        Policy::Conservative => {
            if pc.peak() >= pg.peak() {
                Combined::new(*pc, context.label, Source::ContextConfidence)
            } else {
                Combined::new(*pg, global.label, Source::GlobalConfidence)
            }
        }
        Policy::Aggressive => {
            if pc.floor() >= pg.floor() {
                Combined::new(*pc, context.label, Source::ContextFloor)
            } else {
                Combined::new(*pg, global.label, Source::GlobalFloor)
            }
        }
        Policy::Default => {
            if context.order_used > 0 {
                Combined::new(*pc, context.label, Source::ContextDefault)
            } else {
                Combined::new(*pg, global.label, Source::GlobalDefault)
            }
        }
    }
}

#[cfg(test)]
fn global(even: f64) -> Prediction {
    Prediction::from_distribution(Distribution::new(even, 1.0 - even))
}

#[cfg(test)]
fn context(order_used: usize, even: f64) -> ContextPrediction {
    let distribution = Distribution::new(even, 1.0 - even);
    ContextPrediction {
        order_used,
        key: vec![Label::Odd; order_used],
        label: distribution.best(),
        distribution,
    }
}

#[test]
fn test_policy_names() {
    assert_eq!(Policy::from_name("weighted"), Policy::Weighted);
    assert_eq!(Policy::from_name("Conservative"), Policy::Conservative);
    assert_eq!(Policy::from_name(" aggressive "), Policy::Aggressive);
    assert_eq!(Policy::from_name("default"), Policy::Default);
    assert_eq!(Policy::from_name("no-such-policy"), Policy::Default);
    assert_eq!(Policy::from_name(""), Policy::Default);
    assert_eq!("weighted".parse::<Policy>(), Ok(Policy::Weighted));
    for p in [Policy::Weighted, Policy::Aggressive, Policy::Default] {
        assert_eq!(Policy::from_name(p.name()), p);
    }
}

#[test]
fn test_weighted() {
    let r = combine(Policy::Weighted, 0.5, &global(1.0), &context(1, 0.0));
    assert_eq!(r.distribution, Distribution::uniform());
    assert_eq!(r.label, Label::Even);
    assert_eq!(r.source, Source::Weighted);
    assert_eq!(r.source.to_string(), "weighted");
}

#[test]
fn test_conservative() {
    let r = combine(Policy::Conservative, 0.7, &global(0.8), &context(2, 0.4));
    assert_eq!(r.source, Source::GlobalConfidence);
    assert_eq!(r.label, Label::Even);

    let r = combine(Policy::Conservative, 0.7, &global(0.6), &context(2, 0.25));
    assert_eq!(r.source, Source::ContextConfidence);
    assert_eq!(r.label, Label::Odd);

    // Ties go to the context.
    let r = combine(
        Policy::Conservative,
        0.7,
        &global(0.75),
        &context(1, 0.25),
    );
    assert_eq!(r.source, Source::ContextConfidence);
}

#[test]
fn test_aggressive() {
    let r = combine(Policy::Aggressive, 0.7, &global(0.5), &context(1, 0.9));
    assert_eq!(r.source, Source::GlobalFloor);
    assert_eq!(r.distribution, Distribution::uniform());

    let r = combine(Policy::Aggressive, 0.7, &global(0.0), &context(1, 0.75));
    assert_eq!(r.source, Source::ContextFloor);
    assert_eq!(r.label, Label::Even);
}

#[test]
fn test_default() {
    let r = combine(Policy::Default, 0.7, &global(0.0), &context(1, 1.0));
    assert_eq!(r.source, Source::ContextDefault);
    assert_eq!(r.label, Label::Even);

    let r = combine(Policy::Default, 0.7, &global(0.0), &context(0, 1.0));
    assert_eq!(r.source, Source::GlobalDefault);
    assert_eq!(r.label, Label::Odd);
    assert_eq!(r.source.to_string(), "global (default)");
}
