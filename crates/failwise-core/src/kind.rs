//! Expected error kinds.

use std::any::type_name;
use std::error::Error;
use std::fmt;

/// An error kind an expectation can match against.
///
/// [`Kind::of`] matches one concrete error type. Rust has no subclassing, so
/// "this error or anything derived from it" is expressed with [`Kind::new`]
/// and a matcher that accepts the whole family.
#[derive(Clone, Copy)]
pub struct Kind {
    name: &'static str,
    matcher: fn(&(dyn Error + 'static)) -> bool,
}

impl Kind {
    /// Matches errors whose concrete type is `E`.
    pub fn of<E: Error + 'static>() -> Self {
        Self {
            name: type_name::<E>(),
            matcher: is_kind::<E>,
        }
    }

    /// A named kind with a custom matcher.
    pub const fn new(name: &'static str, matcher: fn(&(dyn Error + 'static)) -> bool) -> Self {
        Self { name, matcher }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if `error` is of this kind.
    pub fn matches(&self, error: &(dyn Error + 'static)) -> bool {
        (self.matcher)(error)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn is_kind<E: Error + 'static>(error: &(dyn Error + 'static)) -> bool {
    error.is::<E>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("unexpected token")]
    struct UnexpectedToken;

    #[derive(Debug, Error)]
    #[error("unterminated string")]
    struct UnterminatedString;

    fn is_syntax_error(error: &(dyn Error + 'static)) -> bool {
        error.is::<UnexpectedToken>() || error.is::<UnterminatedString>()
    }

    #[test]
    fn test_of_matches_exact_type() {
        let kind = Kind::of::<UnexpectedToken>();
        assert!(kind.matches(&UnexpectedToken));
        assert!(!kind.matches(&UnterminatedString));
        assert!(kind.name().ends_with("UnexpectedToken"));
    }

    #[test]
    fn test_custom_kind_matches_family() {
        let kind = Kind::new("SyntaxError", is_syntax_error);
        assert!(kind.matches(&UnexpectedToken));
        assert!(kind.matches(&UnterminatedString));
        assert!(!kind.matches(&std::io::Error::other("io")));
        assert_eq!(kind.to_string(), "SyntaxError");
    }
}
