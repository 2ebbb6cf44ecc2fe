//! Cancellable, generation-tagged schedule for the simulated transfer.
//!
//! The transfer is modeled as a chain of ticks rather than a blocking call.
//! Every batch gets a fresh [`BatchGeneration`]; a tick carrying any other
//! generation belongs to a discarded batch and must be ignored. Dropping the
//! [`ProgressTimer`] cancels the chain for hosts that poll, and the generation
//! check covers hosts that deliver ticks as queued events.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use web_time::Instant;

/// Shortest accepted tick interval. Keeps a zero interval from firing forever.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Identity of one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BatchGeneration(u64);

impl BatchGeneration {
    /// The generation following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-interval tick schedule owned by the batch it advances.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    generation: BatchGeneration,
    interval: Duration,
    next_due: Instant,
}

impl ProgressTimer {
    /// Schedule the first tick one interval after `now`.
    pub fn start(generation: BatchGeneration, interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        Self {
            generation,
            interval,
            next_due: now + interval,
        }
    }

    pub fn generation(&self) -> BatchGeneration {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick fires.
    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Count the ticks that are due at `now` and move the schedule past them.
    pub fn take_due(&mut self, now: Instant) -> u32 {
        if now < self.next_due {
            return 0;
        }

        let behind = now.duration_since(self.next_due).as_nanos();
        let due = 1 + behind / self.interval.as_nanos();
        let due = u32::try_from(due).unwrap_or(u32::MAX);
        self.next_due += self.interval * due;
        due
    }
}
