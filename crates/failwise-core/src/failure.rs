//! Expectation failures.
//!
//! Each variant is one way an expectation can go unmet. The `Display`
//! rendering is exactly the message handed to the reporting sink.

use thiserror::Error;

/// An unmet expectation.
///
/// `subject` names what was run: `Work <label>` for closures, `Script` for
/// script evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpectationFailure {
    #[error("{subject} should have failed")]
    NotFailed { subject: String },

    #[error("{subject} should have failed with an error of kind {expected}")]
    NotFailedWithKind { subject: String, expected: String },

    #[error("{subject} should have failed with an error of kind {expected}, instead got {actual}")]
    WrongKind {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("{subject} should have failed with an error having a nested cause of kind {expected}")]
    NotFailedWithCause { subject: String, expected: String },

    #[error(
        "{subject} should have failed with an error having a nested cause of kind {expected}, instead found these errors:\n{chain}"
    )]
    CauseNotFound {
        subject: String,
        expected: String,
        chain: String,
    },

    #[error("The expected cause kind cannot be None")]
    MissingExpectedKind,

    #[error(
        "{subject} was expected to fail due to a nested cause of kind {expected} but instead got a direct error of kind {actual} with no nested cause(s). Code under test has a bug or perhaps you meant must_fail?"
    )]
    NoCause {
        subject: String,
        expected: String,
        actual: String,
    },

    #[error("{subject} should have passed, instead got {actual}")]
    ScriptFailed { subject: String, actual: String },

    #[error("{test} is marked as not yet implemented but passes unexpectedly")]
    UnexpectedPass { test: String },
}

impl ExpectationFailure {
    /// Stable short name for the failure, used in log events.
    pub fn failure_type(&self) -> &'static str {
        match self {
            Self::NotFailed { .. } => "not_failed",
            Self::NotFailedWithKind { .. } => "not_failed_with_kind",
            Self::WrongKind { .. } => "wrong_kind",
            Self::NotFailedWithCause { .. } => "not_failed_with_cause",
            Self::CauseNotFound { .. } => "cause_not_found",
            Self::MissingExpectedKind => "missing_expected_kind",
            Self::NoCause { .. } => "no_cause",
            Self::ScriptFailed { .. } => "script_failed",
            Self::UnexpectedPass { .. } => "unexpected_pass",
        }
    }
}
