//! Script engine abstraction.
//!
//! Defines the [`ScriptEngine`] trait that an execution engine implements so
//! script-shaped expectations can evaluate source text. Engines that catch a
//! runtime error and re-raise it across their own boundary wrap it in
//! [`Wrapped`]; the capture step peels exactly one such layer off before any
//! kind check runs.

use thiserror::Error;

/// Owned, thread-safe error as captured from a unit of work.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Runtime wrapper carrying the real error raised beneath an engine boundary.
#[derive(Debug, Error)]
#[error("runtime error: {inner}")]
pub struct Wrapped {
    #[source]
    inner: BoxError,
}

impl Wrapped {
    /// Wraps the error that actually caused the failure.
    pub fn new(inner: impl Into<BoxError>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    /// Returns the carried error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.inner
    }

    /// Consumes the wrapper, returning the carried error.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

/// An execution engine that evaluates source text.
///
/// Failwise never implements this itself. The `label` is a generated,
/// process-unique name for the snippet (e.g. `TestScript7.script`) and is
/// only used by the engine for diagnostics.
pub trait ScriptEngine: Send + Sync {
    /// Evaluates `source`, returning `Err` if evaluation fails.
    fn evaluate(&self, source: &str, label: &str) -> Result<(), BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("division by zero")]
    struct DivByZero;

    #[test]
    fn test_wrapped_exposes_inner_as_source() {
        let wrapped = Wrapped::new(DivByZero);
        assert_eq!(wrapped.to_string(), "runtime error: division by zero");

        let source = wrapped.source().unwrap();
        assert!(source.is::<DivByZero>());
    }

    #[test]
    fn test_into_inner_keeps_concrete_type() {
        let inner = Wrapped::new(DivByZero).into_inner();
        assert!(inner.downcast::<DivByZero>().is_ok());
    }
}
