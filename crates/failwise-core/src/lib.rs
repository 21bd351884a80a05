//! # failwise-core
//!
//! Failure expectations for tests.
//!
//! This crate provides:
//! - Expectations that a unit of work fails, fails with a given error kind, or
//!   fails because of a cause of a given kind somewhere in its causal chain
//! - The same expectations for snippets run through a [`ScriptEngine`]
//! - A marker for tests of features that are not implemented yet
//! - Bounded, cycle-safe walking of error causal chains
//!
//! The free functions below use a process-wide [`Expect`] configured from the
//! environment and fail the calling test by panicking. Build an [`Expect`] or
//! [`NotYetImplemented`] directly to plug in another reporter, label source,
//! or frame source.
//!
//! ```
//! use failwise_core::must_fail_with_cause_of;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("disk full")]
//! struct DiskFull;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("save failed")]
//! struct SaveFailed(#[source] DiskFull);
//!
//! let caught = must_fail_with_cause_of::<DiskFull, _>(|| Err::<(), _>(SaveFailed(DiskFull)));
//! assert!(caught.cause_as::<DiskFull>().is_some());
//! ```

use std::error::Error;
use std::sync::OnceLock;

pub mod capture;
pub mod chain;
mod config;
mod expect;
mod failure;
mod kind;
mod labels;
mod locator;
mod marker;
mod report;
pub mod testing;

pub use capture::{Outcome, Panicked, Work, capture};
pub use chain::{CauseSearch, Link, MAX_NESTED_ERRORS, describe_chain, find_in_chain};
pub use config::ExpectConfig;
pub use expect::{Caught, Expect};
pub use failure::ExpectationFailure;
pub use failwise_proto::{
    BoxError, EntryPointInfo, EntryPointPredicate, Error as FailwiseError, Frame, FrameSource,
    LabelSource, Reporter, ScriptEngine, Wrapped,
};
pub use kind::Kind;
pub use labels::ScriptLabels;
pub use locator::{
    CallStack, ConventionalTests, EntryPoint, FrameGuard, Located, Locator, TestSuite,
};
pub use marker::{NotYetImplemented, is_armed};
pub use report::{PanicReporter, fail};

fn shared() -> &'static Expect {
    static SHARED: OnceLock<Expect> = OnceLock::new();
    SHARED.get_or_init(|| {
        Expect::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring invalid configuration, using defaults");
            Expect::new()
        })
    })
}

/// See [`Expect::must_fail`].
pub fn must_fail<'a>(work: impl Into<Work<'a>>) -> BoxError {
    shared().must_fail(work)
}

/// See [`Expect::must_fail_with_kind`].
pub fn must_fail_with_kind<'a>(kind: Kind, work: impl Into<Work<'a>>) -> BoxError {
    shared().must_fail_with_kind(kind, work)
}

/// See [`Expect::must_fail_with`].
pub fn must_fail_with<'a, E, W>(work: W) -> Box<E>
where
    E: Error + Send + Sync + 'static,
    W: Into<Work<'a>>,
{
    shared().must_fail_with(work)
}

/// See [`Expect::must_fail_with_cause`].
pub fn must_fail_with_cause<'a>(kind: Option<Kind>, work: impl Into<Work<'a>>) -> Caught {
    shared().must_fail_with_cause(kind, work)
}

/// See [`Expect::must_fail_with_cause_of`].
pub fn must_fail_with_cause_of<'a, E, W>(work: W) -> Caught
where
    E: Error + 'static,
    W: Into<Work<'a>>,
{
    shared().must_fail_with_cause_of::<E, W>(work)
}

/// See [`Expect::must_fail_script`].
pub fn must_fail_script(engine: &dyn ScriptEngine, source: &str) -> BoxError {
    shared().must_fail_script(engine, source)
}

/// See [`Expect::must_fail_script_with_kind`].
pub fn must_fail_script_with_kind(
    engine: &dyn ScriptEngine,
    kind: Kind,
    source: &str,
) -> BoxError {
    shared().must_fail_script_with_kind(engine, kind, source)
}

/// See [`Expect::assert_script`].
pub fn assert_script(engine: &dyn ScriptEngine, source: &str) {
    shared().assert_script(engine, source);
}

/// Marks the running test of `owner` as not yet implemented.
///
/// See [`NotYetImplemented::mark`]. Panics if no running test of `S` is on
/// the [`CallStack`], since that is a mistake in the test itself.
pub fn not_yet_implemented<S: TestSuite>(owner: &S) -> bool {
    match NotYetImplemented::new().mark(owner) {
        Ok(exit_early) => exit_early,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("unbalanced parens")]
    struct Unbalanced;

    #[test]
    fn test_shortcuts_return_errors() {
        let error = must_fail(|| Err::<(), _>(Unbalanced));
        assert!(error.is::<Unbalanced>());

        let error = must_fail_with_kind(Kind::of::<Unbalanced>(), || Err::<(), _>(Unbalanced));
        assert_eq!(error.to_string(), "unbalanced parens");
    }

    #[test]
    #[should_panic(expected = "Work read ok should have failed")]
    fn test_shortcut_panics_when_expectation_unmet() {
        must_fail(Work::named("read ok", || Ok::<_, Unbalanced>(())));
    }

    #[test]
    #[should_panic(expected = "No test entry point")]
    fn test_not_yet_implemented_outside_a_test_panics() {
        struct Loose;
        impl TestSuite for Loose {
            fn entry_points() -> Vec<EntryPoint<Self>> {
                Vec::new()
            }
        }
        not_yet_implemented(&Loose);
    }
}
