//! Reporting sink and label generation seams.

/// The single failure primitive used by every expectation.
///
/// `abort` never returns: it surfaces as the enclosing test's failure. A
/// `None` message produces an unmessaged failure.
pub trait Reporter: Send + Sync {
    fn abort(&self, message: Option<&str>) -> !;
}

/// Produces labels for anonymous script evaluations.
///
/// Labels only need to be unique within a process run; ordering carries no
/// meaning.
pub trait LabelSource: Send + Sync {
    fn next_label(&self) -> String;
}
