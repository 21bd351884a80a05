//! Labels for anonymous script evaluations.
//!
//! Every script-shaped expectation hands the engine a fresh label so repeated
//! evaluations never collide in the engine's diagnostics. The counter is
//! shared by the whole process and never reset.

use std::sync::atomic::{AtomicU64, Ordering};

use failwise_proto::LabelSource;

use crate::config::ExpectConfig;

static SCRIPT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates `<prefix><n><suffix>` labels from the process-wide counter.
#[derive(Debug, Clone)]
pub struct ScriptLabels {
    prefix: String,
    suffix: String,
}

impl ScriptLabels {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &ExpectConfig) -> Self {
        Self::new(&config.script_prefix, &config.script_suffix)
    }
}

impl Default for ScriptLabels {
    fn default() -> Self {
        Self::from_config(&ExpectConfig::default())
    }
}

impl LabelSource for ScriptLabels {
    fn next_label(&self) -> String {
        // Only uniqueness matters, so no ordering with other memory is needed.
        let n = SCRIPT_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}{}{}", self.prefix, n, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_label_format() {
        let labels = ScriptLabels::new("Probe", ".lisp");
        let label = labels.next_label();
        assert!(label.starts_with("Probe"));
        assert!(label.ends_with(".lisp"));

        let n: u64 = label["Probe".len()..label.len() - ".lisp".len()]
            .parse()
            .unwrap();
        let next = labels.next_label();
        let m: u64 = next["Probe".len()..next.len() - ".lisp".len()]
            .parse()
            .unwrap();
        assert!(m > n);
    }

    #[test]
    fn test_default_uses_config_defaults() {
        let label = ScriptLabels::default().next_label();
        assert!(label.starts_with("TestScript"));
        assert!(label.ends_with(".script"));
    }

    #[test]
    fn test_concurrent_labels_are_distinct() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let labels = ScriptLabels::default();
        let all: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        (0..PER_THREAD)
                            .map(|_| labels.next_label())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(all.len(), THREADS * PER_THREAD);
        assert_eq!(unique.len(), all.len());
    }
}
