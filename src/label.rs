//! Maps raw draw numbers into the two-letter alphabet that the models
//! operate on.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::Error;

/// The binary classification of an observation.
/// The declaration order is the tie-break priority: when two labels have the
/// same probability the one that comes first wins.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Label {
    Even,
    Odd,
}

impl Label {
    /// All of the labels, in tie-break priority order.
    pub const ALL: [Label; 2] = [Label::Even, Label::Odd];

    /// Return the label of the observation 'num'.
    pub fn from_observation(num: i64) -> Self {
        // rem_euclid keeps negative odd numbers odd.
        if num.rem_euclid(2) == 0 {
            Label::Even
        } else {
            Label::Odd
        }
    }

    /// Return a dense index (0 or 1) for table lookups.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Even => write!(f, "Even"),
            Label::Odd => write!(f, "Odd"),
        }
    }
}

/// Every f64 at or above this magnitude is an even integer.
const F64_EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Return the label of an integral JSON value. Draw numbers are stored
/// either as numbers or as zero-padded strings ("07"). Only the parity is
/// needed, so integers of any size are accepted.
pub fn label_from_json(value: &Value) -> Result<Label, Error> {
    match value {
        Value::Number(num) => {
            if let Some(n) = num.as_i64() {
                return Ok(Label::from_observation(n));
            }
            if let Some(n) = num.as_u64() {
                return Ok(label_of_parity(n % 2 == 0));
            }
            match num.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => {
                    if f.abs() >= F64_EXACT_LIMIT {
                        return Ok(Label::Even);
                    }
                    Ok(Label::from_observation(f as i64))
                }
                _ => Err(Error::InvalidObservation(num.to_string())),
            }
        }
        Value::String(s) => label_from_digits(s.trim())
            .ok_or_else(|| Error::InvalidObservation(format!("{:?}", s))),
        other => Err(Error::InvalidObservation(other.to_string())),
    }
}

fn label_of_parity(even: bool) -> Label {
    if even {
        Label::Even
    } else {
        Label::Odd
    }
}

/// Parse an optionally signed decimal integer of any length and return the
/// label of its last digit.
fn label_from_digits(s: &str) -> Option<Label> {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let last = digits.bytes().last()?;
    Some(label_of_parity((last - b'0') % 2 == 0))
}

#[test]
fn test_parity() {
    for n in 0..1000 {
        assert_eq!(Label::from_observation(n), Label::from_observation(n + 2));
        assert_ne!(Label::from_observation(n), Label::from_observation(n + 1));
    }
    assert_eq!(Label::from_observation(0), Label::Even);
    assert_eq!(Label::from_observation(-1), Label::Odd);
    assert_eq!(Label::from_observation(-4), Label::Even);
    assert_eq!(Label::from_observation(i64::MIN), Label::Even);
    assert_eq!(Label::from_observation(i64::MAX), Label::Odd);
}

#[test]
fn test_label_from_json() {
    use serde_json::json;

    assert_eq!(label_from_json(&json!(42)).unwrap(), Label::Even);
    assert_eq!(label_from_json(&json!(-3)).unwrap(), Label::Odd);
    assert_eq!(label_from_json(&json!("07")).unwrap(), Label::Odd);
    assert_eq!(label_from_json(&json!(" 12 ")).unwrap(), Label::Even);
    assert_eq!(label_from_json(&json!("-9")).unwrap(), Label::Odd);
    assert_eq!(label_from_json(&json!(8.0)).unwrap(), Label::Even);
    assert_eq!(label_from_json(&json!(-5.0)).unwrap(), Label::Odd);

    for bad in [
        json!(1.5),
        json!("x1"),
        json!(""),
        json!("-"),
        json!("1.0"),
        json!(null),
        json!([1]),
        json!(true),
    ] {
        assert!(matches!(
            label_from_json(&bad),
            Err(Error::InvalidObservation(_))
        ));
    }
}

#[test]
fn test_label_from_json_large_integers() {
    use serde_json::json;

    // Above i64::MAX, stored as u64.
    let big: Value = serde_json::from_str("9223372036854775809").unwrap();
    assert_eq!(label_from_json(&big).unwrap(), Label::Odd);
    let max: Value = serde_json::from_str("18446744073709551614").unwrap();
    assert_eq!(label_from_json(&max).unwrap(), Label::Even);

    // Integral floats past the exact range are even.
    assert_eq!(label_from_json(&json!(1e20)).unwrap(), Label::Even);
    assert_eq!(label_from_json(&json!(-1e300)).unwrap(), Label::Even);

    // Digit strings of any length.
    let odd = json!("18446744073709551615");
    assert_eq!(label_from_json(&odd).unwrap(), Label::Odd);
    let long = json!("123456789012345678901234567890");
    assert_eq!(label_from_json(&long).unwrap(), Label::Even);
}
