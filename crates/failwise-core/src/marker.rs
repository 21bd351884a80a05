//! Marking tests as not yet implemented.
//!
//! A test for a missing feature is written against the behavior it should
//! eventually have and starts with a marker call:
//!
//! ```no_run
//! use failwise_core::{CallStack, EntryPoint, TestSuite, not_yet_implemented};
//!
//! struct TailCallTests;
//!
//! impl TestSuite for TailCallTests {
//!     fn entry_points() -> Vec<EntryPoint<Self>> {
//!         vec![EntryPoint::test("test_deep_recursion", Self::test_deep_recursion)]
//!     }
//! }
//!
//! impl TailCallTests {
//!     pub fn test_deep_recursion(&self) {
//!         let _frame = CallStack::enter::<Self>("test_deep_recursion");
//!         if not_yet_implemented(self) {
//!             return;
//!         }
//!         assert_eq!(count_down(1_000_000), 0);
//!     }
//! }
//! # fn count_down(n: u64) -> u64 { n }
//! ```
//!
//! The marker runs the test a second time. While the feature is missing that
//! run fails, the marker returns `true` and the test exits early as a pass.
//! Once the feature lands the second run passes and the marker fails the
//! test, so the marker gets removed.

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::Arc;

use failwise_proto::{Reporter, Result};

use crate::capture::{Work, capture};
use crate::failure::ExpectationFailure;
use crate::locator::{Locator, TestSuite};
use crate::report::PanicReporter;

thread_local! {
    static ARMED: Cell<bool> = const { Cell::new(false) };
}

/// Returns true while a marker re-run is in flight on this thread.
pub fn is_armed() -> bool {
    ARMED.with(Cell::get)
}

/// Holds the thread's marker flag. The flag is cleared when this is dropped.
#[derive(Debug)]
struct ArmGuard {
    _not_send: PhantomData<*const ()>,
}

impl ArmGuard {
    /// Arms the flag, or returns `None` if it is already armed.
    fn try_arm() -> Option<Self> {
        if ARMED.with(|armed| armed.replace(true)) {
            return None;
        }
        Some(Self {
            _not_send: PhantomData,
        })
    }
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        ARMED.with(|armed| armed.set(false));
    }
}

/// Runs tests a second time to check they still fail.
#[derive(Clone)]
pub struct NotYetImplemented {
    reporter: Arc<dyn Reporter>,
    locator: Locator,
}

impl Default for NotYetImplemented {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotYetImplemented {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotYetImplemented")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

impl NotYetImplemented {
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(PanicReporter),
            locator: Locator::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// Re-runs the test of `owner` that is currently running.
    ///
    /// Returns `Ok(true)` if the re-run failed, meaning the caller should
    /// return straight away. Returns `Ok(false)` without doing anything when
    /// called from inside a re-run. Reports an unexpected pass if the re-run
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`failwise_proto::Error::EntryPointNotFound`] if no running
    /// test of `S` can be found.
    pub fn mark<S: TestSuite>(&self, owner: &S) -> Result<bool> {
        let Some(_armed) = ArmGuard::try_arm() else {
            return Ok(false);
        };

        let test = self.locator.locate(owner)?;
        tracing::info!(test = test.name(), "Running {} as not yet implemented", test.name());

        Ok(self.expect_failure(test.name(), Work::unit(|| test.run(owner))))
    }

    /// Runs `body` once and expects it to fail.
    ///
    /// Returns `true` if it failed. Reports an unexpected pass under `name`
    /// if it succeeded. Returns `false` without running `body` when called
    /// from inside a marker re-run.
    pub fn check<'a>(&self, name: &str, body: impl Into<Work<'a>>) -> bool {
        let Some(_armed) = ArmGuard::try_arm() else {
            return false;
        };

        tracing::info!(test = name, "Running {} as not yet implemented", name);
        self.expect_failure(name, body.into())
    }

    fn expect_failure(&self, name: &str, work: Work<'_>) -> bool {
        if capture(work).is_failure() {
            tracing::info!(
                test = name,
                "{} fails which is expected as it is not yet implemented",
                name
            );
            return true;
        }

        let failure = ExpectationFailure::UnexpectedPass {
            test: name.to_string(),
        };
        tracing::debug!(failure_type = failure.failure_type(), "Expectation not met");
        self.reporter.abort(Some(failure.to_string().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::EntryPoint;
    use crate::testing::{Aborted, FixedFrames, RecordingReporter, catch_abort};
    use failwise_proto::{Error, Frame};

    struct Pending;

    impl TestSuite for Pending {
        fn entry_points() -> Vec<EntryPoint<Self>> {
            vec![
                EntryPoint::test("test_still_broken", Self::test_still_broken),
                EntryPoint::test("test_now_works", Self::test_now_works),
            ]
        }
    }

    impl Pending {
        fn test_still_broken(&self) {
            assert!(is_armed());
            panic!("not there yet");
        }

        fn test_now_works(&self) {}
    }

    fn marker(method: &'static str, reporter: &RecordingReporter) -> NotYetImplemented {
        let frames = FixedFrames::new(vec![Frame::of::<Pending>(method)]);
        NotYetImplemented::new()
            .with_reporter(reporter.clone())
            .with_locator(Locator::new().with_frames(frames))
    }

    #[test]
    fn test_mark_returns_true_when_rerun_fails() {
        let reporter = RecordingReporter::new();
        let result = marker("test_still_broken", &reporter).mark(&Pending);

        assert!(result.unwrap());
        assert!(!is_armed());
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn test_mark_reports_unexpected_pass() {
        let reporter = RecordingReporter::new();
        let marker = marker("test_now_works", &reporter);

        let aborted = catch_abort(|| marker.mark(&Pending));
        assert_eq!(
            aborted,
            Some(Aborted::with_message(
                "test_now_works is marked as not yet implemented but passes unexpectedly"
            ))
        );
        assert!(!is_armed());
    }

    #[test]
    fn test_mark_when_armed_does_nothing() {
        let reporter = RecordingReporter::new();
        // No frames: locating would fail if it were attempted.
        let marker = NotYetImplemented::new()
            .with_reporter(reporter.clone())
            .with_locator(Locator::new().with_frames(FixedFrames::empty()));

        let _armed = ArmGuard::try_arm().unwrap();
        assert!(!marker.mark(&Pending).unwrap());
        assert!(is_armed());
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn test_mark_not_found_clears_flag() {
        let marker = NotYetImplemented::new()
            .with_locator(Locator::new().with_frames(FixedFrames::empty()));

        let err = marker.mark(&Pending).unwrap_err();
        assert!(matches!(err, Error::EntryPointNotFound { .. }));
        assert!(!is_armed());
    }

    #[test]
    fn test_check_expects_failure() {
        let reporter = RecordingReporter::new();
        let marker = NotYetImplemented::new().with_reporter(reporter.clone());

        let overflow = || "123456789012345678901234".parse::<u64>();
        assert!(marker.check("test_bignum_parse", overflow));
        assert!(!is_armed());

        let aborted = catch_abort(|| marker.check("test_small_parse", || "42".parse::<u64>()));
        assert_eq!(
            aborted.unwrap().message(),
            Some("test_small_parse is marked as not yet implemented but passes unexpectedly")
        );
        assert!(!is_armed());
    }

    #[test]
    fn test_check_inside_rerun_is_skipped() {
        let marker = NotYetImplemented::new();
        let _armed = ArmGuard::try_arm().unwrap();
        assert!(!marker.check("test_inner", Work::unit(|| panic!("must not run"))));
    }

    #[test]
    fn test_flag_is_per_thread() {
        let _armed = ArmGuard::try_arm().unwrap();
        let other = std::thread::spawn(is_armed).join().unwrap();
        assert!(!other);
    }
}
