//! Finding the test entry point that is currently running.
//!
//! Rust has no reflective call stack, so suites describe their test methods
//! through [`TestSuite`] and running tests announce themselves on the
//! thread-local [`CallStack`]. The [`Locator`] matches the two up.
//!
//! ```
//! use failwise_core::{CallStack, EntryPoint, Locator, TestSuite};
//!
//! struct ParserTests;
//!
//! impl TestSuite for ParserTests {
//!     fn entry_points() -> Vec<EntryPoint<Self>> {
//!         vec![EntryPoint::test("test_nested_lists", Self::test_nested_lists)]
//!     }
//! }
//!
//! impl ParserTests {
//!     pub fn test_nested_lists(&self) {
//!         let _frame = CallStack::enter::<Self>("test_nested_lists");
//!         let located = Locator::new().locate(self).unwrap();
//!         assert_eq!(located.name(), "test_nested_lists");
//!     }
//! }
//!
//! ParserTests.test_nested_lists();
//! ```

use std::any::type_name;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use failwise_proto::{EntryPointInfo, EntryPointPredicate, Error, Frame, FrameSource, Result};

/// A type whose methods include test entry points.
pub trait TestSuite: Sized + 'static {
    /// Every method the locator may consider, tests or not.
    fn entry_points() -> Vec<EntryPoint<Self>>;
}

/// A method declared by suite `S`.
pub struct EntryPoint<S> {
    pub info: EntryPointInfo,
    /// How to re-run the method, if it can be run without arguments.
    pub invoke: Option<fn(&S)>,
}

impl<S> EntryPoint<S> {
    pub fn new(info: EntryPointInfo, invoke: Option<fn(&S)>) -> Self {
        Self { info, invoke }
    }

    /// A public, zero-argument test method.
    pub fn test(name: &'static str, invoke: fn(&S)) -> Self {
        Self::new(EntryPointInfo::new(name), Some(invoke))
    }

    /// A public, zero-argument method carrying `markers`.
    pub fn marked(name: &'static str, markers: &'static [&'static str], invoke: fn(&S)) -> Self {
        Self::new(EntryPointInfo::new(name).with_markers(markers), Some(invoke))
    }

    /// A method that is declared but cannot be re-run.
    pub fn declared(info: EntryPointInfo) -> Self {
        Self::new(info, None)
    }
}

impl<S> Clone for EntryPoint<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for EntryPoint<S> {}

impl<S> fmt::Debug for EntryPoint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("info", &self.info)
            .field("invokable", &self.invoke.is_some())
            .finish()
    }
}

/// The running entry point found by [`Locator::locate`].
pub struct Located<S> {
    name: &'static str,
    invoke: fn(&S),
}

impl<S> Located<S> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the entry point again on `owner`.
    pub fn run(&self, owner: &S) {
        (self.invoke)(owner);
    }
}

impl<S> fmt::Debug for Located<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Located").field("name", &self.name).finish()
    }
}

/// Accepts the usual shape of a test method: public, no arguments, returning
/// unit, and either named `test*` or marked `"test"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalTests;

impl EntryPointPredicate for ConventionalTests {
    fn accepts(&self, info: &EntryPointInfo) -> bool {
        info.arity == 0
            && info.returns_unit
            && info.public
            && (info.name.starts_with("test") || info.has_marker("test"))
    }
}

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Thread-local stack of running suite methods.
///
/// Methods push a frame with [`CallStack::enter`] and the returned guard
/// pops it, including during unwinding.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallStack;

impl CallStack {
    /// Records that `method` of `S` is running until the guard drops.
    #[must_use = "the frame is popped as soon as the guard is dropped"]
    pub fn enter<S: 'static>(method: impl Into<Cow<'static, str>>) -> FrameGuard {
        FRAMES.with(|frames| frames.borrow_mut().push(Frame::of::<S>(method)));
        FrameGuard {
            _not_send: PhantomData,
        }
    }

    /// Number of frames on this thread.
    pub fn depth() -> usize {
        FRAMES.with(|frames| frames.borrow().len())
    }
}

impl FrameSource for CallStack {
    fn frames(&self) -> Vec<Frame> {
        FRAMES.with(|frames| frames.borrow().iter().rev().cloned().collect())
    }
}

/// Pops the frame pushed by [`CallStack::enter`].
///
/// Bound to the thread that created it.
#[derive(Debug)]
pub struct FrameGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

/// Finds the running test entry point of a suite.
#[derive(Clone)]
pub struct Locator {
    frames: Arc<dyn FrameSource>,
    predicate: Arc<dyn EntryPointPredicate>,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator").finish_non_exhaustive()
    }
}

impl Locator {
    /// Reads [`CallStack`] and accepts [`ConventionalTests`].
    pub fn new() -> Self {
        Self {
            frames: Arc::new(CallStack),
            predicate: Arc::new(ConventionalTests),
        }
    }

    pub fn with_frames(mut self, frames: impl FrameSource + 'static) -> Self {
        self.frames = Arc::new(frames);
        self
    }

    pub fn with_predicate(mut self, predicate: impl EntryPointPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Returns the outermost running frame of `S` that is an accepted,
    /// invokable entry point.
    ///
    /// Scanning from the outermost frame finds the test itself even when the
    /// caller sits inside helper methods of the same suite.
    pub fn locate<S: TestSuite>(&self, _owner: &S) -> Result<Located<S>> {
        let entry_points = S::entry_points();
        let frames = self.frames.frames();

        frames
            .iter()
            .rev()
            .filter(|frame| frame.belongs_to::<S>())
            .find_map(|frame| {
                entry_points
                    .iter()
                    .filter(|entry| entry.info.name == frame.method)
                    .filter(|entry| self.predicate.accepts(&entry.info))
                    .find_map(|entry| {
                        entry.invoke.map(|invoke| Located {
                            name: entry.info.name,
                            invoke,
                        })
                    })
            })
            .ok_or(Error::EntryPointNotFound {
                suite: type_name::<S>(),
            })
    }
}
