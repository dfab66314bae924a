//! Error types for the TekQA harness

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`QaError`]
pub type QaResult<T> = std::result::Result<T, QaError>;

/// Failure taxonomy for a test run.
///
/// `Skipped` is deliberately an error variant: returning it from a scenario
/// aborts the remaining steps, and the runner records the case as skipped
/// rather than failed. Soft mismatches are not errors at all; they are
/// accumulated on the scenario's [`crate::Checkpoint`].
#[derive(Error, Debug)]
pub enum QaError {
    /// An expected UI state did not appear within the bounded wait.
    #[error("precondition not met within {waited_ms} ms: {condition}")]
    PreconditionTimeout { condition: String, waited_ms: u64 },

    /// A required external input (credentials, live-run opt-in, baseline)
    /// is absent. The scenario is marked skipped, not failed.
    #[error("skipped: {0}")]
    Skipped(String),

    /// A primary assertion failed; halts the scenario immediately.
    #[error("{check}: expected {expected}, got {actual}")]
    HardMismatch {
        check: String,
        expected: String,
        actual: String,
    },

    /// Malformed or missing dataset file. Fails suite load before any
    /// scenario runs.
    #[error("dataset {path}: {reason}")]
    DatasetLoad { path: PathBuf, reason: String },

    #[error("driver error: {0}")]
    Driver(String),

    #[error("driver process closed its end of the protocol")]
    DriverClosed,

    #[error("playwright not found; install with: npm i playwright && npx playwright install")]
    DriverNotFound,

    #[error("GET {url} returned {status}")]
    ApiStatus { url: String, status: u16 },

    #[error("baseline not found: {0}")]
    BaselineMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl QaError {
    /// Whether this error marks the scenario skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, QaError::Skipped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_is_not_a_failure() {
        assert!(QaError::Skipped("no credentials".into()).is_skip());
        assert!(!QaError::DriverClosed.is_skip());
    }

    #[test]
    fn hard_mismatch_names_both_sides() {
        let err = QaError::HardMismatch {
            check: "cart count".into(),
            expected: "2".into(),
            actual: "1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cart count"));
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("got 1"));
    }
}
