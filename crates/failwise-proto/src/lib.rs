//! # failwise-proto
//!
//! Shared types, error definitions, and collaborator traits for the Failwise
//! test-expectation helpers.
//!
//! This crate provides the foundational abstractions used across Failwise,
//! including:
//! - The boxed error type every captured failure is stored as
//! - The [`Wrapped`] runtime wrapper that engines use to carry a real error
//! - Traits for the outside collaborators: script engines, reporting sinks,
//!   label generators, call-frame providers, and test entry-point predicates

mod engine;
mod error;
mod frame;
mod report;

pub use engine::{BoxError, ScriptEngine, Wrapped};
pub use error::{Error, Result};
pub use frame::{EntryPointInfo, EntryPointPredicate, Frame, FrameSource};
pub use report::{LabelSource, Reporter};
