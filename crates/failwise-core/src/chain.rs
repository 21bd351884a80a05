//! Causal-chain walking for captured errors.
//!
//! A chain starts at an error and follows [`Error::source`] links. Chains may
//! be unbounded or loop back on themselves, so every walk stops at the first
//! self-referential cause and after [`MAX_NESTED_ERRORS`] hops, whichever
//! comes first. A walk therefore yields at most `MAX_NESTED_ERRORS + 1`
//! links.

use std::error::Error;
use std::fmt::Write as _;

/// Maximum number of cause hops followed from the starting error.
pub const MAX_NESTED_ERRORS: usize = 10;

/// One error in a chain, with its distance from the starting error.
#[derive(Debug, Clone, Copy)]
pub struct Link<'e> {
    pub depth: usize,
    pub error: &'e (dyn Error + 'static),
}

/// Iterator over a bounded causal chain.
///
/// Created by [`walk`].
#[derive(Debug, Clone)]
pub struct ChainWalk<'e> {
    next: Option<&'e (dyn Error + 'static)>,
    depth: usize,
}

impl<'e> Iterator for ChainWalk<'e> {
    type Item = Link<'e>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let link = Link {
            depth: self.depth,
            error: current,
        };

        if self.depth < MAX_NESTED_ERRORS {
            self.next = current
                .source()
                .filter(|cause| !is_same_error(current, *cause));
            self.depth += 1;
        }

        Some(link)
    }
}

/// Walks the chain starting at `start` (inclusive).
pub fn walk<'e>(start: &'e (dyn Error + 'static)) -> ChainWalk<'e> {
    ChainWalk {
        next: Some(start),
        depth: 0,
    }
}

/// Returns the first error in the chain starting at `start` that satisfies
/// `predicate`.
pub fn find_in_chain<'e, P>(start: &'e (dyn Error + 'static), mut predicate: P) -> Option<Link<'e>>
where
    P: FnMut(&(dyn Error + 'static)) -> bool,
{
    walk(start).find(|link| predicate(link.error))
}

/// Result of searching an error's causes.
#[derive(Debug, Clone, Copy)]
pub enum CauseSearch<'e> {
    /// The error has no cause at all.
    NoCause,
    /// Causes exist but none satisfied the predicate within the hop limit.
    NotFound,
    /// A cause matched. `depth` counts from the error's direct cause.
    Found(Link<'e>),
}

/// Searches the causes of `error`, starting at its direct cause.
///
/// The error itself is never tested. An error without any cause is reported
/// as [`CauseSearch::NoCause`] rather than folded into `NotFound`, because
/// that usually means the caller asked for the wrong shape of match.
pub fn search_causes<'e, P>(error: &'e (dyn Error + 'static), predicate: P) -> CauseSearch<'e>
where
    P: FnMut(&(dyn Error + 'static)) -> bool,
{
    let Some(first) = error.source() else {
        return CauseSearch::NoCause;
    };

    match find_in_chain(first, predicate) {
        Some(link) => CauseSearch::Found(link),
        None => CauseSearch::NotFound,
    }
}

/// Renders the chain starting at `start`, one `kind: message` per line.
///
/// Hop 0 is unprefixed; hop `n` is indented by `n - 1` steps and prefixed
/// with `-> `. A chain longer than the hop limit ends in `...`.
pub fn describe_chain(start: &(dyn Error + 'static)) -> String {
    let mut out = String::new();
    let mut current = Some(start);
    let mut level = 0;

    while let Some(error) = current {
        if level > 1 {
            out.push_str(&"   ".repeat(level - 1));
        }
        if level > 0 {
            out.push_str("-> ");
        }
        if level > MAX_NESTED_ERRORS {
            out.push_str("...");
            break;
        }
        let _ = writeln!(out, "{}: {}", kind_name(error), error);

        current = error.source().filter(|cause| !is_same_error(error, *cause));
        level += 1;
    }

    out
}

/// Best-effort name for the kind of an opaque error.
///
/// Rust errors carry no runtime type name, so this takes the leading
/// identifier of the `Debug` rendering: the type name for structs, the
/// variant name for enums. An `io::Error` is named by its `ErrorKind`. Falls
/// back to `error`.
pub fn kind_name(error: &(dyn Error + 'static)) -> String {
    // The Debug head of io::Error is its private representation.
    if let Some(io) = error.downcast_ref::<std::io::Error>() {
        return format!("{:?}", io.kind());
    }

    let debug = format!("{error:?}");
    let head: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
        .collect();
    let head = head.trim_end_matches(':');

    if head.is_empty() {
        "error".to_string()
    } else {
        head.to_string()
    }
}

/// Whether `b` is the very error `a`.
///
/// A wrapper whose source field sits at offset zero shares its address with
/// that source, and vtable pointers are not unique per type, so a shared
/// address only counts when the `Debug` renderings agree too.
fn is_same_error(a: &(dyn Error + 'static), b: &(dyn Error + 'static)) -> bool {
    std::ptr::addr_eq(a as *const dyn Error, b as *const dyn Error)
        && format!("{a:?}") == format!("{b:?}")
}
