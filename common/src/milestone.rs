//! Shared log of notable pipeline events, drained after all workers join.

use std::sync::Mutex;

/// Identifies the worker a milestone is attributed to. Assigned once at
/// worker construction, monotonically increasing, no synchronization meaning.
pub type WorkerId = usize;

/// A single timestamped record of a notable action.
#[derive(Debug, Clone)]
pub struct Milestone {
    pub at: chrono::DateTime<chrono::Utc>,
    pub worker: WorkerId,
    pub text: String,
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] worker {}: {}",
            self.at.format("%H:%M:%S%.3f"),
            self.worker,
            self.text
        )
    }
}

/// Append-only event log shared by all workers. Appends are serialized by a
/// mutex; the log is only read after every worker has joined.
#[derive(Debug, Default)]
pub struct MilestoneLog {
    entries: Mutex<Vec<Milestone>>,
}

impl MilestoneLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, worker: WorkerId, text: impl Into<String>) {
        let milestone = Milestone {
            at: chrono::Utc::now(),
            worker,
            text: text.into(),
        };
        self.entries
            .lock()
            .expect("milestone log mutex poisoned")
            .push(milestone);
    }

    /// Take all recorded entries, in append order.
    pub fn drain(&self) -> Vec<Milestone> {
        let mut entries = self.entries.lock().expect("milestone log mutex poisoned");
        std::mem::take(&mut *entries)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("milestone log mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
