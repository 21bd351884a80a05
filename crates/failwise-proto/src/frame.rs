//! Call frames and test entry-point metadata.
//!
//! The active-test locator never inspects a real machine stack. It asks a
//! [`FrameSource`] for the frames currently executing and matches them
//! against the entry points a suite type declares, filtered through an
//! [`EntryPointPredicate`] supplied by the test runner.

use std::any::{TypeId, type_name};
use std::borrow::Cow;

/// One executing method, identified by the type that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Identity of the declaring type.
    pub owner: TypeId,

    /// Human-readable name of the declaring type.
    pub owner_name: &'static str,

    /// Name of the method running in this frame.
    pub method: Cow<'static, str>,
}

impl Frame {
    /// Creates a frame for `method` declared on `S`.
    pub fn of<S: 'static>(method: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: TypeId::of::<S>(),
            owner_name: type_name::<S>(),
            method: method.into(),
        }
    }

    /// Returns true if this frame's method is declared on `S`.
    pub fn belongs_to<S: 'static>(&self) -> bool {
        self.owner == TypeId::of::<S>()
    }
}

/// Supplies the frames currently executing on the calling thread.
///
/// Frames are ordered innermost first, the way a stack trace reads.
pub trait FrameSource: Send + Sync {
    fn frames(&self) -> Vec<Frame>;
}

/// Reflective description of a method declared by a test suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointInfo {
    pub name: &'static str,
    pub arity: usize,
    pub returns_unit: bool,
    pub public: bool,
    /// Annotation-like markers attached to the method (e.g. `"test"`).
    pub markers: &'static [&'static str],
}

impl EntryPointInfo {
    /// A public, zero-argument method returning unit, with no markers.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            arity: 0,
            returns_unit: true,
            public: true,
            markers: &[],
        }
    }

    pub const fn with_markers(mut self, markers: &'static [&'static str]) -> Self {
        self.markers = markers;
        self
    }

    pub const fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub const fn returning_value(mut self) -> Self {
        self.returns_unit = false;
        self
    }

    pub const fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Returns true if the method carries `marker`.
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(&marker)
    }
}

/// Decides whether a declared method is a recognized test entry point.
pub trait EntryPointPredicate: Send + Sync {
    fn accepts(&self, info: &EntryPointInfo) -> bool;
}
