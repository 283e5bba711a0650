//! Reaction test: click as soon as the signal turns green.

use std::time::Duration;

use rand::Rng;

use crate::{GameError, GameResult};

/// Shortest and longest wait before the signal.
pub const MIN_DELAY: Duration = Duration::from_millis(2000);
pub const MAX_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Waiting { delay: Duration, waited: Duration },
    Signal { since: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Clicked before the signal; the attempt is discarded.
    FalseStart,
    Recorded(Duration),
}

#[derive(Debug, Clone)]
pub struct ReactionTest {
    phase: Phase,
    times: Vec<Duration>,
}

impl ReactionTest {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            times: Vec::new(),
        }
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let delay = rng.gen_range(MIN_DELAY..=MAX_DELAY);
        self.phase = Phase::Waiting {
            delay,
            waited: Duration::ZERO,
        };
    }

    /// Reports time passing. Any overshoot past the delay counts toward the
    /// reaction time.
    pub fn advance(&mut self, by: Duration) {
        self.phase = match self.phase {
            Phase::Waiting { delay, waited } if waited + by >= delay => Phase::Signal {
                since: waited + by - delay,
            },
            Phase::Waiting { delay, waited } => Phase::Waiting {
                delay,
                waited: waited + by,
            },
            Phase::Signal { since } => Phase::Signal { since: since + by },
            Phase::Idle => Phase::Idle,
        };
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, Phase::Waiting { .. })
    }

    pub fn signal_shown(&self) -> bool {
        matches!(self.phase, Phase::Signal { .. })
    }

    pub fn click(&mut self) -> GameResult<ClickOutcome> {
        match self.phase {
            Phase::Idle => Err(GameError::NotRunning),
            Phase::Waiting { .. } => {
                self.phase = Phase::Idle;
                Ok(ClickOutcome::FalseStart)
            }
            Phase::Signal { since } => {
                self.phase = Phase::Idle;
                self.times.push(since);
                Ok(ClickOutcome::Recorded(since))
            }
        }
    }

    pub fn times(&self) -> &[Duration] {
        &self.times
    }

    pub fn last(&self) -> Option<Duration> {
        self.times.last().copied()
    }

    /// Mean of recorded attempts, rounded to the millisecond.
    pub fn average(&self) -> Option<Duration> {
        if self.times.is_empty() {
            return None;
        }
        let total: Duration = self.times.iter().sum();
        let mean_ms = total.as_secs_f64() * 1000.0 / self.times.len() as f64;
        Some(Duration::from_millis(mean_ms.round() as u64))
    }

    pub fn best(&self) -> Option<Duration> {
        self.times.iter().min().copied()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ReactionTest {
    fn default() -> Self {
        Self::new()
    }
}
