//! Soft/hard check accumulation for a single scenario.
//!
//! A scenario records any number of soft mismatches (secondary signals that
//! should not mask the primary one) and at most one hard failure, which is
//! returned as an error so `?` halts the remaining steps. Soft checks that
//! could not be evaluated at all are recorded as soft skips rather than
//! silently dropped from the report.

use std::fmt::Display;

use serde::Serialize;
use tracing::warn;

use crate::error::{QaError, QaResult};

/// A tolerant or secondary check that fell outside bounds.
#[derive(Debug, Clone, Serialize)]
pub struct SoftMismatch {
    pub check: String,
    pub detail: String,
}

/// A soft check whose inputs were unobservable (e.g. a count that failed to
/// parse); surfaced in the report, never counted as a failure.
#[derive(Debug, Clone, Serialize)]
pub struct SoftSkip {
    pub check: String,
    pub reason: String,
}

/// Per-scenario result accumulator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Checkpoint {
    soft_mismatches: Vec<SoftMismatch>,
    soft_skips: Vec<SoftSkip>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// A primary assertion. On failure returns [`QaError::HardMismatch`] so
    /// the scenario stops at the call site.
    pub fn hard(
        &self,
        ok: bool,
        check: &str,
        expected: impl Display,
        actual: impl Display,
    ) -> QaResult<()> {
        if ok {
            Ok(())
        } else {
            Err(QaError::HardMismatch {
                check: check.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// A secondary assertion. Failure is recorded and execution continues.
    pub fn soft(&mut self, ok: bool, check: &str, detail: impl Into<String>) {
        if !ok {
            let detail = detail.into();
            warn!(check, %detail, "soft mismatch");
            self.soft_mismatches.push(SoftMismatch {
                check: check.to_string(),
                detail,
            });
        }
    }

    /// Record a secondary check that could not be evaluated.
    pub fn soft_skip(&mut self, check: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(check, %reason, "soft check skipped");
        self.soft_skips.push(SoftSkip {
            check: check.to_string(),
            reason,
        });
    }

    pub fn soft_mismatches(&self) -> &[SoftMismatch] {
        &self.soft_mismatches
    }

    pub fn soft_skips(&self) -> &[SoftSkip] {
        &self.soft_skips
    }

    /// True when no soft mismatch was recorded.
    pub fn is_clean(&self) -> bool {
        self.soft_mismatches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_failure_is_an_error() {
        let cp = Checkpoint::new();
        assert!(cp.hard(true, "header", "visible", "visible").is_ok());
        let err = cp.hard(false, "header", "visible", "hidden").unwrap_err();
        assert!(matches!(err, QaError::HardMismatch { .. }));
    }

    #[test]
    fn soft_failures_accumulate_without_stopping() {
        let mut cp = Checkpoint::new();
        cp.soft(false, "stars", "drift too large");
        cp.soft(true, "stars", "ignored when ok");
        cp.soft(false, "subtitle", "missing");
        assert_eq!(cp.soft_mismatches().len(), 2);
        assert!(!cp.is_clean());
    }

    #[test]
    fn soft_skips_are_surfaced_separately() {
        let mut cp = Checkpoint::new();
        cp.soft_skip("stars", "unparseable star text");
        assert_eq!(cp.soft_skips().len(), 1);
        assert!(cp.is_clean());
    }
}
