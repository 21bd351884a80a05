//! The not-yet-implemented marker inside real test methods.

use std::cell::Cell;

use failwise_core::testing::{RecordingReporter, catch_abort};
use failwise_core::{
    CallStack, EntryPoint, Locator, NotYetImplemented, TestSuite, is_armed, not_yet_implemented,
};

/// A tiny evaluator whose `let` support is still missing.
fn eval(source: &str) -> Option<i64> {
    if source.starts_with("(let") {
        return None;
    }
    source.trim_matches(|c| c == '(' || c == ')').parse().ok()
}

#[derive(Default)]
struct EvalTests {
    runs: Cell<u32>,
    tails: Cell<u32>,
}

impl TestSuite for EvalTests {
    fn entry_points() -> Vec<EntryPoint<Self>> {
        vec![
            EntryPoint::test("test_let_binding", Self::test_let_binding),
            EntryPoint::test("test_literal", Self::test_literal),
            EntryPoint::marked("nested_let", &["test"], Self::nested_let),
        ]
    }
}

impl EvalTests {
    fn marker() -> NotYetImplemented {
        NotYetImplemented::new()
    }

    pub fn test_let_binding(&self) {
        let _frame = CallStack::enter::<Self>("test_let_binding");
        self.runs.set(self.runs.get() + 1);
        if not_yet_implemented(self) {
            return;
        }
        self.tails.set(self.tails.get() + 1);
        assert_eq!(eval("(let ((x 1)) x)"), Some(1));
    }

    /// Marks from inside a helper, which also runs under a frame of the suite.
    pub fn nested_let(&self) {
        let _frame = CallStack::enter::<Self>("nested_let");
        self.runs.set(self.runs.get() + 1);
        if self.skip_pending() {
            return;
        }
        assert_eq!(eval("(let ((x (let ((y 2)) y))) x)"), Some(2));
    }

    fn skip_pending(&self) -> bool {
        let _frame = CallStack::enter::<Self>("skip_pending");
        Self::marker().mark(self).unwrap()
    }

    pub fn test_literal(&self) {
        let _frame = CallStack::enter::<Self>("test_literal");
        if not_yet_implemented(self) {
            return;
        }
        assert_eq!(eval("(42)"), Some(42));
    }
}

#[test]
fn test_failing_test_exits_early_as_pass() {
    let suite = EvalTests::default();
    suite.test_let_binding();

    // Outer run plus the re-run; only the re-run got past the marker.
    assert_eq!(suite.runs.get(), 2);
    assert_eq!(suite.tails.get(), 1);
    assert!(!is_armed());
    assert_eq!(CallStack::depth(), 0);
}

#[test]
fn test_marker_called_from_helper_reruns_the_test() {
    let suite = EvalTests::default();
    suite.nested_let();

    assert_eq!(suite.runs.get(), 2);
    assert!(!is_armed());
}

#[test]
#[should_panic(expected = "test_literal is marked as not yet implemented but passes unexpectedly")]
fn test_passing_test_is_reported() {
    EvalTests::default().test_literal();
}

#[test]
fn test_passing_test_leaves_flag_idle() {
    let reporter = RecordingReporter::new();
    let marker = NotYetImplemented::new()
        .with_reporter(reporter.clone())
        .with_locator(Locator::new());
    let suite = EvalTests::default();

    let aborted = catch_abort(|| {
        let _frame = CallStack::enter::<EvalTests>("test_literal");
        marker.mark(&suite)
    });

    assert!(aborted.is_some());
    assert!(!is_armed());
    assert_eq!(CallStack::depth(), 0);
    assert_eq!(reporter.messages().len(), 1);
}

#[test]
fn test_check_combinator() {
    let marker = NotYetImplemented::new();
    assert!(marker.check("test_let_binding", || {
        eval("(let ((x 1)) x)").ok_or("let is not supported")
    }));
    assert!(!is_armed());
}

#[test]
fn test_threads_mark_independently() {
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let suite = EvalTests::default();
                suite.test_let_binding();
                assert_eq!(suite.tails.get(), 1);
            });
        }
    });
}
