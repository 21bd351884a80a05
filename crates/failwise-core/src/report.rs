//! Default reporting sink.

use failwise_proto::Reporter;

/// Reports failures by panicking, which fails the enclosing `#[test]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn abort(&self, message: Option<&str>) -> ! {
        match message {
            Some(message) => panic!("{message}"),
            None => panic!(),
        }
    }
}

/// Fails the current test with `message`, or without one for `None`.
pub fn fail(message: Option<&str>) -> ! {
    PanicReporter.abort(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "value was 3")]
    fn test_abort_panics_with_message() {
        PanicReporter.abort(Some("value was 3"));
    }

    #[test]
    #[should_panic]
    fn test_abort_without_message_still_fails() {
        fail(None);
    }
}
