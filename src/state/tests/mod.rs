//! Scenario tests for the full triage session.
//!
//! Time is driven with explicit instants so every progress tick is
//! deterministic.

mod workflow_tests;

use std::time::Duration;

use web_time::Instant;

use crate::config::WorkflowConfig;
use crate::model::{AssetId, MediaItem, ZoneId};
use crate::state::TriageSession;

const TICK: Duration = Duration::from_millis(200);

/// A session that opens with nothing selected.
fn empty_session() -> TriageSession {
    TriageSession::with_defaults(&WorkflowConfig::empty())
}

/// A session with ship-4 / t5 selected.
fn session_at_t5() -> TriageSession {
    let mut session = empty_session();
    session
        .select_zone(&AssetId::from("ship-4"), &ZoneId::from("t5"))
        .unwrap();
    session
}

/// `count` small JPEG-tagged media items.
fn photos(count: usize) -> Vec<MediaItem> {
    (1..=count)
        .map(|i| MediaItem::new(format!("casco_{i:03}.jpg"), vec![0xFF, 0xD8, 0xFF, 0xE0]))
        .collect()
}

/// Instant of the `n`-th tick after `start`.
fn tick_at(start: Instant, n: u32) -> Instant {
    start + TICK * n
}
