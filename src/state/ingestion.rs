//! Batch ingestion: accepts a media batch and drives the simulated transfer.

use std::time::Duration;

use serde::Serialize;
use web_time::Instant;

use crate::constants::PROGRESS_COMPLETE;
use crate::error::TriageError;
use crate::model::MediaBatch;

use super::progress::{BatchGeneration, ProgressTimer};

/// Where the current batch is in its upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionStatus {
    #[default]
    Idle,
    InProgress,
    Complete,
}

/// Snapshot of the upload card: status, percentage and the submitted items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionState {
    pub status: IngestionStatus,
    /// Upload progress in percent, 0..=100
    pub progress: u8,
    pub batch: MediaBatch,
}

impl IngestionState {
    /// Text for the upload card, e.g. "3 imágenes seleccionada(s) - 40%".
    pub fn summary(&self) -> String {
        let count = self.batch.len();
        let noun = if count == 1 { "imagen" } else { "imágenes" };
        format!("{} {} seleccionada(s) - {}%", count, noun, self.progress)
    }
}

/// Result of delivering one progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Progress moved to the given percentage
    Advanced(u8),
    /// Progress reached 100 and the batch is complete
    Completed,
    /// The tick belongs to a discarded batch, or no upload is running
    Stale,
}

/// Owns the ingestion state and the progress timer of the current batch.
#[derive(Debug, Clone)]
pub struct IngestionController {
    state: IngestionState,
    generation: BatchGeneration,
    timer: Option<ProgressTimer>,
    step: u8,
    interval: Duration,
}

impl IngestionController {
    /// Create an idle controller. `step` is clamped to 1..=100.
    pub fn new(step: u8, interval: Duration) -> Self {
        Self {
            state: IngestionState::default(),
            generation: BatchGeneration::default(),
            timer: None,
            step: step.clamp(1, PROGRESS_COMPLETE),
            interval,
        }
    }

    pub fn state(&self) -> &IngestionState {
        &self.state
    }

    pub fn status(&self) -> IngestionStatus {
        self.state.status
    }

    pub fn progress(&self) -> u8 {
        self.state.progress
    }

    /// Generation of the current (or last discarded) batch.
    pub fn generation(&self) -> BatchGeneration {
        self.generation
    }

    /// Whether a progress chain is still scheduled.
    pub fn timer_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Instant at which the next tick is due, if an upload is running.
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.timer.as_ref().map(ProgressTimer::next_due)
    }

    /// Start uploading a new batch, discarding any previous one.
    ///
    /// Returns the generation that ticks for this batch must carry.
    pub fn start(&mut self, batch: MediaBatch, now: Instant) -> BatchGeneration {
        self.discard();
        log::info!(
            "Starting batch {} with {} item(s), {} bytes",
            self.generation,
            batch.len(),
            batch.total_bytes()
        );
        self.state = IngestionState {
            status: IngestionStatus::InProgress,
            progress: 0,
            batch,
        };
        self.timer = Some(ProgressTimer::start(self.generation, self.interval, now));
        self.generation
    }

    /// Apply one progress step if `generation` is the running batch.
    pub fn advance(&mut self, generation: BatchGeneration) -> TickOutcome {
        if generation != self.generation || self.state.status != IngestionStatus::InProgress {
            log::trace!(
                "Ignoring stale tick {} (current {}, {:?})",
                generation,
                self.generation,
                self.state.status
            );
            return TickOutcome::Stale;
        }

        let progress = self
            .state
            .progress
            .saturating_add(self.step)
            .min(PROGRESS_COMPLETE);
        self.state.progress = progress;

        if progress == PROGRESS_COMPLETE {
            self.timer = None;
            self.state.status = IngestionStatus::Complete;
            log::info!("Batch {} upload complete", self.generation);
            TickOutcome::Completed
        } else {
            log::debug!("Batch {} progress {}%", self.generation, progress);
            TickOutcome::Advanced(progress)
        }
    }

    /// Fire every tick that is due at `now`, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<TickOutcome> {
        let Some(timer) = self.timer.as_mut() else {
            return Vec::new();
        };
        let generation = timer.generation();
        let due = timer.take_due(now);

        let mut outcomes = Vec::new();
        for _ in 0..due {
            let outcome = self.advance(generation);
            outcomes.push(outcome);
            if !matches!(outcome, TickOutcome::Advanced(_)) {
                break;
            }
        }
        outcomes
    }

    /// Check that the batch may be confirmed.
    pub fn ensure_complete(&self) -> Result<(), TriageError> {
        match self.state.status {
            IngestionStatus::Complete => Ok(()),
            _ => Err(TriageError::PrematureConfirm {
                progress: self.state.progress,
            }),
        }
    }

    /// Cancel the timer and return to `Idle` with no items.
    pub fn reset(&mut self) {
        self.discard();
        self.state = IngestionState::default();
    }

    /// Invalidate the current batch: cancel its timer and move to a new
    /// generation so queued ticks for it are rejected.
    fn discard(&mut self) {
        if self.timer.take().is_some() {
            log::debug!("Cancelled progress timer for batch {}", self.generation);
        }
        self.generation = self.generation.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MediaItem;

    const INTERVAL: Duration = Duration::from_millis(200);

    fn batch(count: usize) -> MediaBatch {
        let items = (0..count)
            .map(|i| MediaItem::new(format!("hull_{i}.jpg"), vec![0xFF, 0xD8, 0xFF]))
            .collect();
        MediaBatch::from_items(items).unwrap()
    }

    #[test]
    fn test_start_enters_in_progress() {
        let mut ingestion = IngestionController::new(10, INTERVAL);
        ingestion.start(batch(2), Instant::now());
        assert_eq!(ingestion.status(), IngestionStatus::InProgress);
        assert_eq!(ingestion.progress(), 0);
        assert!(ingestion.timer_active());
        assert_eq!(ingestion.state().batch.len(), 2);
    }

    #[test]
    fn test_progress_is_monotonic_and_completes_at_100() {
        let mut ingestion = IngestionController::new(10, INTERVAL);
        let generation = ingestion.start(batch(1), Instant::now());

        let mut last = 0;
        for _ in 0..9 {
            match ingestion.advance(generation) {
                TickOutcome::Advanced(p) => {
                    assert!(p > last);
                    last = p;
                }
                other => panic!("unexpected {other:?}"),
            }
            assert_eq!(ingestion.status(), IngestionStatus::InProgress);
        }
        assert_eq!(ingestion.advance(generation), TickOutcome::Completed);
        assert_eq!(ingestion.progress(), 100);
        assert_eq!(ingestion.status(), IngestionStatus::Complete);
        assert!(!ingestion.timer_active());

        // No tick after completion
        assert_eq!(ingestion.advance(generation), TickOutcome::Stale);
        assert_eq!(ingestion.progress(), 100);
    }

    #[test]
    fn test_step_that_does_not_divide_100_is_clamped() {
        let mut ingestion = IngestionController::new(30, INTERVAL);
        let generation = ingestion.start(batch(1), Instant::now());
        assert_eq!(ingestion.advance(generation), TickOutcome::Advanced(30));
        assert_eq!(ingestion.advance(generation), TickOutcome::Advanced(60));
        assert_eq!(ingestion.advance(generation), TickOutcome::Advanced(90));
        assert_eq!(ingestion.advance(generation), TickOutcome::Completed);
        assert_eq!(ingestion.progress(), 100);
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut ingestion = IngestionController::new(10, INTERVAL);
        let first = ingestion.start(batch(1), Instant::now());
        ingestion.advance(first);
        let second = ingestion.start(batch(3), Instant::now());

        assert_ne!(first, second);
        assert_eq!(ingestion.advance(first), TickOutcome::Stale);
        assert_eq!(ingestion.progress(), 0);
        assert_eq!(ingestion.advance(second), TickOutcome::Advanced(10));
    }

    #[test]
    fn test_poll_fires_due_ticks_until_complete() {
        let start = Instant::now();
        let mut ingestion = IngestionController::new(10, INTERVAL);
        ingestion.start(batch(1), start);

        assert!(ingestion.poll(start + Duration::from_millis(100)).is_empty());
        assert_eq!(
            ingestion.poll(start + Duration::from_millis(600)),
            vec![
                TickOutcome::Advanced(10),
                TickOutcome::Advanced(20),
                TickOutcome::Advanced(30)
            ]
        );

        let rest = ingestion.poll(start + Duration::from_secs(60));
        assert_eq!(rest.last(), Some(&TickOutcome::Completed));
        assert_eq!(rest.len(), 7);
        assert!(ingestion.poll(start + Duration::from_secs(120)).is_empty());
    }

    #[test]
    fn test_reset_clears_batch_and_timer() {
        let mut ingestion = IngestionController::new(10, INTERVAL);
        let generation = ingestion.start(batch(2), Instant::now());
        ingestion.advance(generation);
        ingestion.reset();

        assert_eq!(ingestion.state(), &IngestionState::default());
        assert!(!ingestion.timer_active());
        assert_eq!(ingestion.advance(generation), TickOutcome::Stale);
    }

    #[test]
    fn test_ensure_complete() {
        let mut ingestion = IngestionController::new(50, INTERVAL);
        assert_eq!(
            ingestion.ensure_complete(),
            Err(TriageError::PrematureConfirm { progress: 0 })
        );
        let generation = ingestion.start(batch(1), Instant::now());
        ingestion.advance(generation);
        assert_eq!(
            ingestion.ensure_complete(),
            Err(TriageError::PrematureConfirm { progress: 50 })
        );
        ingestion.advance(generation);
        assert_eq!(ingestion.ensure_complete(), Ok(()));
    }

    #[test]
    fn test_summary_label() {
        let mut ingestion = IngestionController::new(10, INTERVAL);
        ingestion.start(batch(1), Instant::now());
        assert_eq!(ingestion.state().summary(), "1 imagen seleccionada(s) - 0%");
        ingestion.start(batch(3), Instant::now());
        assert_eq!(ingestion.state().summary(), "3 imágenes seleccionada(s) - 0%");
    }
}
