//! Test doubles for exercising expectations deterministically.

pub mod fixtures;
pub mod recording_reporter;
pub mod scripted_engine;

pub use fixtures::{FixedFrames, SequenceLabels};
pub use recording_reporter::{Aborted, RecordingReporter, catch_abort};
pub use scripted_engine::{Evaluation, ScriptedEngine};
