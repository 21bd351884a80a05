//! Fixed frame and label sources.

use std::sync::atomic::{AtomicU64, Ordering};

use failwise_proto::{Frame, FrameSource, LabelSource};

/// Frame source that always reports the same frames, innermost first.
#[derive(Debug, Clone, Default)]
pub struct FixedFrames {
    frames: Vec<Frame>,
}

impl FixedFrames {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// No frames at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl FrameSource for FixedFrames {
    fn frames(&self) -> Vec<Frame> {
        self.frames.clone()
    }
}

/// Labels `<prefix>0`, `<prefix>1`, ... from a counter owned by this source.
#[derive(Debug)]
pub struct SequenceLabels {
    prefix: String,
    next: AtomicU64,
}

impl SequenceLabels {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl LabelSource for SequenceLabels {
    fn next_label(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Suite;

    #[test]
    fn test_sequence_labels_start_at_zero() {
        let labels = SequenceLabels::new("Case");
        assert_eq!(labels.next_label(), "Case0");
        assert_eq!(labels.next_label(), "Case1");
    }

    #[test]
    fn test_fixed_frames_repeat() {
        let source = FixedFrames::new(vec![Frame::of::<Suite>("helper")]);
        assert_eq!(source.frames(), source.frames());
        assert!(FixedFrames::empty().frames().is_empty());
    }
}
