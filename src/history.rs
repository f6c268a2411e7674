//! Loads the list of past draw numbers. The history is stored as a JSON array,
//! oldest first. Entries may be numbers or strings ("07"). Only the label of
//! each draw is kept, so draws of any size can be loaded.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::label::{label_from_json, Label};
use crate::Error;

/// Selects how invalid entries are handled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseMode {
    /// Fail on the first entry that isn't an integer.
    Strict,
    /// Skip entries that aren't integers.
    Lenient,
}

/// The labels of the past draws, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    labels: Vec<Label>,
}

impl History {
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    /// Build the history from draw numbers.
    pub fn from_observations(nums: &[i64]) -> Self {
        Self::new(nums.iter().map(|n| Label::from_observation(*n)).collect())
    }

    /// Load the history from the JSON file at 'path'.
    pub fn load<P: AsRef<Path>>(
        path: P,
        mode: ParseMode,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let history = Self::from_json(&text, mode)?;
        log::info!(
            "Loaded {} observations from {}.",
            history.len(),
            path.display()
        );
        Ok(history)
    }

    /// Parse the history from the JSON document 'text'.
    pub fn from_json(text: &str, mode: ParseMode) -> Result<Self, Error> {
        let values: Vec<Value> = serde_json::from_str(text)?;
        Self::from_values(&values, mode)
    }

    /// Build the history from raw JSON values.
    pub fn from_values(
        values: &[Value],
        mode: ParseMode,
    ) -> Result<Self, Error> {
        let mut labels = Vec::with_capacity(values.len());
        let mut skipped = 0;

        for (position, value) in values.iter().enumerate() {
            match label_from_json(value) {
                Ok(label) => labels.push(label),
                Err(err) => match mode {
                    ParseMode::Strict => {
                        return Err(Error::InvalidHistory {
                            position,
                            reason: err.to_string(),
                        });
                    }
                    ParseMode::Lenient => skipped += 1,
                },
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {} invalid entries.", skipped);
        }
        Ok(Self { labels })
    }

    /// Keep only the most recent 'n' observations. Zero keeps everything.
    pub fn limit(mut self, n: usize) -> Self {
        if n > 0 && self.labels.len() > n {
            let start = self.labels.len() - n;
            self.labels.drain(..start);
            log::info!("Analyzing the last {} observations.", n);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels.iter().copied()
    }
}

#[test]
fn test_parse_modes() {
    use Label::{Even as E, Odd as O};

    let text = r#"[12, "07", "abc", 3.5, 40]"#;
    let lenient = History::from_json(text, ParseMode::Lenient).unwrap();
    assert_eq!(lenient.as_slice(), &[E, O, E]);

    match History::from_json(text, ParseMode::Strict) {
        Err(Error::InvalidHistory { position, .. }) => assert_eq!(position, 2),
        other => panic!("Expected a strict failure, got {:?}", other),
    }
}

#[test]
fn test_strict_accepts_large_draws() {
    use Label::{Even as E, Odd as O};

    let text = r#"[2, 18446744073709551615, 1e20, "99999999999999999999"]"#;
    let h = History::from_json(text, ParseMode::Strict).unwrap();
    assert_eq!(h.as_slice(), &[E, O, E, O]);
}

#[test]
fn test_limit() {
    let h = History::from_observations(&[1, 2, 3, 4, 5]);
    assert_eq!(h.clone().limit(0), h);
    assert_eq!(h.clone().limit(10), h);
    assert_eq!(h.limit(2), History::from_observations(&[4, 5]));
}

#[test]
fn test_not_a_list() {
    assert!(matches!(
        History::from_json(r#"{"a": 1}"#, ParseMode::Lenient),
        Err(Error::Json(_))
    ));
    let empty = History::from_json("[]", ParseMode::Strict).unwrap();
    assert!(empty.is_empty());
}
