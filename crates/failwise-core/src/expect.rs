//! Failure expectations.
//!
//! [`Expect`] runs a unit of work once through [`capture`] and checks how it
//! ended. A met expectation returns the captured error so the test can make
//! further assertions on it. An unmet one goes to the [`Reporter`] sink,
//! which never returns.
//!
//! # Example
//!
//! ```no_run
//! use failwise_core::{Expect, Work};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("empty input")]
//! struct EmptyInput;
//!
//! fn parse(input: &str) -> Result<u32, EmptyInput> {
//!     input.parse().map_err(|_| EmptyInput)
//! }
//!
//! let expect = Expect::new();
//! let error = expect.must_fail_with::<EmptyInput, _>(Work::named("parse empty", || parse("")));
//! assert_eq!(error.to_string(), "empty input");
//! ```

use std::error::Error;
use std::sync::Arc;

use failwise_proto::{BoxError, LabelSource, Reporter, ScriptEngine};

use crate::capture::{Outcome, Work, capture};
use crate::chain::{self, CauseSearch};
use crate::config::ExpectConfig;
use crate::failure::ExpectationFailure;
use crate::kind::Kind;
use crate::labels::ScriptLabels;
use crate::report::PanicReporter;

/// A failure whose causal chain contained the expected kind.
///
/// Owns the captured error; [`Caught::cause`] borrows the matched cause out
/// of it.
#[derive(Debug)]
pub struct Caught {
    error: BoxError,
    depth: usize,
}

impl Caught {
    /// The error the unit of work failed with.
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.error
    }

    /// The matched cause.
    pub fn cause(&self) -> &(dyn Error + 'static) {
        let error: &(dyn Error + 'static) = &*self.error;
        error
            .source()
            .and_then(|first| chain::walk(first).nth(self.depth))
            .map_or(error, |link| link.error)
    }

    /// The matched cause as its concrete type.
    pub fn cause_as<E: Error + 'static>(&self) -> Option<&E> {
        self.cause().downcast_ref::<E>()
    }

    /// Hops from the error's direct cause to the matched cause.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_error(self) -> BoxError {
        self.error
    }
}

/// Evaluates failure expectations and reports unmet ones.
#[derive(Clone)]
pub struct Expect {
    reporter: Arc<dyn Reporter>,
    labels: Arc<dyn LabelSource>,
}

impl Default for Expect {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Expect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expect").finish_non_exhaustive()
    }
}

impl Expect {
    /// Panicking reporter, default script labels.
    pub fn new() -> Self {
        Self::with_config(&ExpectConfig::default())
    }

    /// Uses [`ExpectConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds an invalid configuration.
    pub fn from_env() -> failwise_proto::Result<Self> {
        Ok(Self::with_config(&ExpectConfig::from_env()?))
    }

    pub fn with_config(config: &ExpectConfig) -> Self {
        Self {
            reporter: Arc::new(PanicReporter),
            labels: Arc::new(ScriptLabels::from_config(config)),
        }
    }

    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Arc::new(reporter);
        self
    }

    pub fn with_labels(mut self, labels: impl LabelSource + 'static) -> Self {
        self.labels = Arc::new(labels);
        self
    }

    /// The work must fail. Returns the captured error.
    pub fn must_fail<'a>(&self, work: impl Into<Work<'a>>) -> BoxError {
        let work = work.into();
        let subject = work_subject(&work);

        match capture(work) {
            Outcome::Failure(error) => error,
            Outcome::Success => self.report(ExpectationFailure::NotFailed { subject }),
        }
    }

    /// The work must fail with an error of `kind`. Returns the captured error.
    pub fn must_fail_with_kind<'a>(&self, kind: Kind, work: impl Into<Work<'a>>) -> BoxError {
        let work = work.into();
        let subject = work_subject(&work);
        self.check_kind(subject, kind, capture(work))
    }

    /// Typed form of [`must_fail_with_kind`](Self::must_fail_with_kind).
    pub fn must_fail_with<'a, E, W>(&self, work: W) -> Box<E>
    where
        E: Error + Send + Sync + 'static,
        W: Into<Work<'a>>,
    {
        let kind = Kind::of::<E>();
        let work = work.into();
        let subject = work_subject(&work);

        let error = self.check_kind(subject.clone(), kind, capture(work));
        match error.downcast::<E>() {
            Ok(error) => error,
            Err(error) => self.report(ExpectationFailure::WrongKind {
                subject,
                expected: kind.to_string(),
                actual: describe(&*error),
            }),
        }
    }

    /// The work must fail with an error that has a cause of `kind` somewhere
    /// in its causal chain. The error itself is not tested.
    ///
    /// `None` is rejected as ambiguous.
    pub fn must_fail_with_cause<'a>(
        &self,
        kind: Option<Kind>,
        work: impl Into<Work<'a>>,
    ) -> Caught {
        let Some(kind) = kind else {
            self.report(ExpectationFailure::MissingExpectedKind);
        };

        let work = work.into();
        let subject = work_subject(&work);
        let expected = kind.to_string();

        let error = match capture(work) {
            Outcome::Failure(error) => error,
            Outcome::Success => {
                self.report(ExpectationFailure::NotFailedWithCause { subject, expected })
            }
        };

        let depth = match chain::search_causes(&*error, |e| kind.matches(e)) {
            CauseSearch::Found(link) => link.depth,
            CauseSearch::NoCause => {
                let actual = chain::kind_name(&*error);
                tracing::warn!(
                    work = %subject,
                    actual = %actual,
                    "Expected a nested cause but the error has none"
                );
                self.report(ExpectationFailure::NoCause {
                    subject,
                    expected,
                    actual,
                })
            }
            CauseSearch::NotFound => self.report(ExpectationFailure::CauseNotFound {
                subject,
                expected,
                chain: chain::describe_chain(&*error),
            }),
        };

        Caught { error, depth }
    }

    /// Typed form of [`must_fail_with_cause`](Self::must_fail_with_cause).
    pub fn must_fail_with_cause_of<'a, E, W>(&self, work: W) -> Caught
    where
        E: Error + 'static,
        W: Into<Work<'a>>,
    {
        self.must_fail_with_cause(Some(Kind::of::<E>()), work)
    }

    /// Evaluating `source` must fail. Returns the captured error.
    pub fn must_fail_script(&self, engine: &dyn ScriptEngine, source: &str) -> BoxError {
        match capture(self.script_work(engine, source)) {
            Outcome::Failure(error) => error,
            Outcome::Success => self.report(ExpectationFailure::NotFailed {
                subject: SCRIPT_SUBJECT.to_string(),
            }),
        }
    }

    /// Evaluating `source` must fail with an error of `kind`.
    pub fn must_fail_script_with_kind(
        &self,
        engine: &dyn ScriptEngine,
        kind: Kind,
        source: &str,
    ) -> BoxError {
        let outcome = capture(self.script_work(engine, source));
        self.check_kind(SCRIPT_SUBJECT.to_string(), kind, outcome)
    }

    /// Evaluating `source` must succeed.
    pub fn assert_script(&self, engine: &dyn ScriptEngine, source: &str) {
        let work = self.script_work(engine, source);
        let subject = format!("{SCRIPT_SUBJECT} {}", work.label());

        if let Outcome::Failure(error) = capture(work) {
            self.report(ExpectationFailure::ScriptFailed {
                subject,
                actual: describe(&*error),
            });
        }
    }

    /// Fails the current test through this evaluator's reporter.
    pub fn fail(&self, message: Option<&str>) -> ! {
        self.reporter.abort(message)
    }

    fn check_kind(&self, subject: String, kind: Kind, outcome: Outcome) -> BoxError {
        let expected = kind.to_string();
        match outcome {
            Outcome::Success => {
                self.report(ExpectationFailure::NotFailedWithKind { subject, expected })
            }
            Outcome::Failure(error) if kind.matches(&*error) => error,
            Outcome::Failure(error) => self.report(ExpectationFailure::WrongKind {
                subject,
                expected,
                actual: describe(&*error),
            }),
        }
    }

    fn script_work<'a>(&self, engine: &'a dyn ScriptEngine, source: &'a str) -> Work<'a> {
        let label = self.labels.next_label();
        let run_label = label.clone();
        Work::named(label, move || engine.evaluate(source, &run_label))
    }

    fn report(&self, failure: ExpectationFailure) -> ! {
        tracing::debug!(failure_type = failure.failure_type(), "Expectation not met");
        self.reporter.abort(Some(failure.to_string().as_str()))
    }
}

const SCRIPT_SUBJECT: &str = "Script";

fn work_subject(work: &Work<'_>) -> String {
    format!("Work {}", work.label())
}

/// `kind: message`, the way an error appears in failure messages.
fn describe(error: &(dyn Error + 'static)) -> String {
    format!("{}: {}", chain::kind_name(error), error)
}
