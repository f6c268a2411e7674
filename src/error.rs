//! The error type shared by the predictor, the history loader and the
//! reporting helpers.

use std::io;

/// Errors reported by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raw value can't be mapped to a label.
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// Predictors need to track at least one label of context.
    #[error("Invalid order {0}, the order must be at least 1")]
    InvalidOrder(usize),

    /// An entry of the history file was rejected in strict mode.
    #[error("Invalid history entry at position {position}: {reason}")]
    InvalidHistory { position: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
