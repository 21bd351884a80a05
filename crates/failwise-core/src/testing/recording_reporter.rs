//! Reporter double that records failures before aborting.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use failwise_proto::Reporter;

/// Panic payload raised by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aborted {
    message: Option<String>,
}

impl Aborted {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Records every abort, then unwinds with an [`Aborted`] payload.
///
/// Pair with [`catch_abort`] to observe the failure instead of letting it
/// fail the test.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<Option<String>>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages of all aborts so far, oldest first.
    pub fn messages(&self) -> Vec<Option<String>> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Reporter for RecordingReporter {
    fn abort(&self, message: Option<&str>) -> ! {
        let message = message.map(str::to_string);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        panic::panic_any(Aborted { message })
    }
}

/// Runs `f`, returning the [`Aborted`] payload if it aborted.
///
/// Returns `None` if `f` completed. Any other panic keeps unwinding.
pub fn catch_abort<F, T>(f: F) -> Option<Aborted>
where
    F: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => None,
        Err(payload) => match payload.downcast::<Aborted>() {
            Ok(aborted) => Some(*aborted),
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}
