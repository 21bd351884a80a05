//! Script engine double that returns pre-scripted results.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use failwise_proto::{BoxError, ScriptEngine};

/// Engine that replays scripted results in order.
///
/// Once the script runs out every evaluation succeeds.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<EngineState>>,
}

#[derive(Debug, Default)]
struct EngineState {
    results: VecDeque<Result<(), BoxError>>,
    evaluations: Vec<Evaluation>,
}

/// Record of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub source: String,
    pub label: String,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful evaluation.
    pub fn then_pass(self) -> Self {
        self.state().results.push_back(Ok(()));
        self
    }

    /// Queues an evaluation failing with `error`.
    pub fn then_fail(self, error: impl Into<BoxError>) -> Self {
        self.state().results.push_back(Err(error.into()));
        self
    }

    pub fn evaluation_count(&self) -> usize {
        self.state().evaluations.len()
    }

    pub fn evaluations(&self) -> Vec<Evaluation> {
        self.state().evaluations.clone()
    }

    // A failing expectation panics while callers may hold a clone, so a
    // poisoned lock still carries valid state.
    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScriptEngine for ScriptedEngine {
    fn evaluate(&self, source: &str, label: &str) -> Result<(), BoxError> {
        let mut state = self.state();
        state.evaluations.push(Evaluation {
            source: source.to_string(),
            label: label.to_string(),
        });
        state.results.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_engine_replays_in_order() {
        let engine = ScriptedEngine::new().then_fail("undefined symbol").then_pass();

        let first = engine.evaluate("(car nil)", "A0").unwrap_err();
        assert_eq!(first.to_string(), "undefined symbol");
        assert!(engine.evaluate("(+ 1 2)", "A1").is_ok());
        assert!(engine.evaluate("(+ 1 2)", "A2").is_ok());
        assert_eq!(engine.evaluation_count(), 3);
    }

    #[test]
    fn test_scripted_engine_tracks_evaluations() {
        let engine = ScriptedEngine::new();
        engine.evaluate("(list 1 2)", "Case7.lisp").unwrap();

        assert_eq!(
            engine.evaluations(),
            vec![Evaluation {
                source: "(list 1 2)".to_string(),
                label: "Case7.lisp".to_string(),
            }]
        );
    }
}
