//! Running a unit of work and capturing how it ended.
//!
//! A unit of work fails by returning `Err` or by panicking. Either way the
//! failure is captured as a [`BoxError`]; a panic becomes a [`Panicked`]
//! error carrying the panic message. If the error is a [`Wrapped`] runtime
//! wrapper, exactly one layer is peeled off so the real error is what gets
//! inspected.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use failwise_proto::{BoxError, Wrapped};
use thiserror::Error;

/// A zero-argument unit of work with a display label.
///
/// Any closure returning `Result<T, E>` (with `E: Into<BoxError>`) converts
/// into a `Work` labelled with the closure's type name. Use [`Work::named`]
/// for a readable label and [`Work::unit`] for work that signals failure
/// only by panicking.
pub struct Work<'a> {
    label: Cow<'static, str>,
    body: Box<dyn FnOnce() -> Result<(), BoxError> + 'a>,
}

impl<'a> Work<'a> {
    /// Wraps a fallible closure, labelled by its type name.
    pub fn new<F, T, E>(body: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + 'a,
        E: Into<BoxError>,
    {
        Self {
            label: Cow::Borrowed(type_name::<F>()),
            body: Box::new(move || body().map(drop).map_err(Into::into)),
        }
    }

    /// Wraps a fallible closure under an explicit label.
    pub fn named<F, T, E>(label: impl Into<Cow<'static, str>>, body: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + 'a,
        E: Into<BoxError>,
    {
        Self::new(body).with_label(label)
    }

    /// Wraps a closure that can only fail by panicking.
    pub fn unit<F, T>(body: F) -> Self
    where
        F: FnOnce() -> T + 'a,
    {
        Self {
            label: Cow::Borrowed(type_name::<F>()),
            body: Box::new(move || {
                body();
                Ok(())
            }),
        }
    }

    /// Replaces the display label.
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<'a, F, T, E> From<F> for Work<'a>
where
    F: FnOnce() -> Result<T, E> + 'a,
    E: Into<BoxError>,
{
    fn from(body: F) -> Self {
        Self::new(body)
    }
}

impl fmt::Debug for Work<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work").field("label", &self.label).finish()
    }
}

/// How a unit of work ended.
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(BoxError),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the captured error, if any.
    pub fn into_error(self) -> Option<BoxError> {
        match self {
            Self::Success => None,
            Self::Failure(error) => Some(error),
        }
    }
}

/// A unit of work panicked instead of returning.
#[derive(Debug, Error)]
#[error("panicked: {message}")]
pub struct Panicked {
    pub message: String,
}

impl Panicked {
    pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

/// Runs `work` exactly once and records how it ended.
pub fn capture(work: Work<'_>) -> Outcome {
    let Work { label, body } = work;

    let result = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(Box::new(Panicked::from_payload(&*payload)) as BoxError),
    };

    match result {
        Ok(()) => Outcome::Success,
        Err(error) => {
            let error = unwrap_runtime(error);
            tracing::debug!(work = %label, error = %error, "Captured failure");
            Outcome::Failure(error)
        }
    }
}

/// Peels one [`Wrapped`] layer off, leaving any other error untouched.
pub fn unwrap_runtime(error: BoxError) -> BoxError {
    match error.downcast::<Wrapped>() {
        Ok(wrapped) => wrapped.into_inner(),
        Err(error) => error,
    }
}
