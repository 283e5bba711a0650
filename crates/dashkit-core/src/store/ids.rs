//! Identifier assignment.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// How new record identifiers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Milliseconds since the epoch, bumped so ids never repeat within a process
    #[default]
    Timestamp,
    /// Random UUID v4
    Uuid,
}

/// Produces fresh record ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    strategy: IdStrategy,
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            last: AtomicU64::new(0),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    /// Next identifier.
    pub fn next_id(&self) -> String {
        match self.strategy {
            IdStrategy::Timestamp => self.next_timestamp().to_string(),
            IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Wall-clock millis, or one past the previous id when the clock has not
    /// moved (same tick) or went backwards.
    fn next_timestamp(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
