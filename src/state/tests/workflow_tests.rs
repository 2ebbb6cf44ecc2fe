//! End-to-end walks through the triage flow and its back-edges.

use super::*;
use crate::error::TriageError;
use crate::model::CategoryId;
use crate::state::{IngestionStatus, TickOutcome, TriageStage};

/// Run the transfer to completion and confirm.
fn confirmed_session() -> TriageSession {
    let mut session = session_at_t5();
    let start = Instant::now();
    session.start_batch(photos(3), start).unwrap();
    session.tick(tick_at(start, 10));
    session.confirm().unwrap();
    session
}

#[test]
fn test_full_triage_walkthrough() {
    let mut session = empty_session();
    session
        .select_zone(&AssetId::from("ship-4"), &ZoneId::from("t5"))
        .unwrap();

    let start = Instant::now();
    session.start_batch(photos(3), start).unwrap();
    assert_eq!(session.stage(), TriageStage::Uploading);
    assert_eq!(session.ingestion().batch.len(), 3);

    for n in 1..=10 {
        session.tick(tick_at(start, n));
    }
    assert_eq!(session.ingestion().progress, 100);
    assert_eq!(session.stage(), TriageStage::Uploaded);

    session.confirm().unwrap();
    assert_eq!(session.stage(), TriageStage::CategoryGrid);
    let counts: Vec<u32> = session.categories().iter().map(|c| c.finding_count).collect();
    assert_eq!(counts, vec![12, 8, 5, 15]);

    let category = CategoryId::try_from(1).unwrap();
    session.select_category(category).unwrap();
    assert_eq!(session.stage(), TriageStage::ImageGrid);
    assert_eq!(session.category_images().len(), 4);

    let first = session.category_images()[0].clone();
    session.open_image(category, first, 0).unwrap();
    assert_eq!(session.stage(), TriageStage::ImageDetail);

    let detail = session.detail().unwrap();
    assert_eq!(detail.location, "Barco 4 - Zona T5");
    assert_eq!(detail.damage_type, "Corrosión");
    assert_eq!(detail.image.display_name, "Corrosión_001.jpg");
}

#[test]
fn test_progress_is_monotonic_until_complete() {
    let mut session = session_at_t5();
    let start = Instant::now();
    session.start_batch(photos(1), start).unwrap();

    let mut seen = vec![session.ingestion().progress];
    let mut n = 1;
    while session.ingestion().status == IngestionStatus::InProgress {
        session.tick(tick_at(start, n));
        seen.push(session.ingestion().progress);
        n += 1;
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&100));
    assert_eq!(session.ingestion().status, IngestionStatus::Complete);
    assert!(!session.timer_active());

    // Once complete, no further tick is fired
    assert!(session.tick(tick_at(start, n + 50)).is_empty());
    let generation = session.generation();
    assert_eq!(session.deliver_tick(generation), TickOutcome::Stale);
}

#[test]
fn test_confirm_rejected_until_complete() {
    let mut session = session_at_t5();
    assert_eq!(
        session.confirm(),
        Err(TriageError::PrematureConfirm { progress: 0 })
    );

    let start = Instant::now();
    session.start_batch(photos(2), start).unwrap();
    session.tick(tick_at(start, 5));
    assert!(!session.can_confirm());
    assert_eq!(
        session.confirm(),
        Err(TriageError::PrematureConfirm { progress: 50 })
    );
    assert_eq!(session.stage(), TriageStage::Uploading);

    session.tick(tick_at(start, 10));
    assert!(session.can_confirm());
    session.confirm().unwrap();
    assert!(!session.can_confirm());
}

#[test]
fn test_confirm_twice_keeps_open_category() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Crack).unwrap();
    session.confirm().unwrap();
    assert_eq!(session.stage(), TriageStage::ImageGrid);
}

#[test]
fn test_start_batch_without_selection() {
    let mut session = empty_session();
    assert!(!session.can_start_batch());
    assert_eq!(
        session.start_batch(photos(3), Instant::now()),
        Err(TriageError::NoZoneSelected)
    );
    assert_eq!(session.ingestion().status, IngestionStatus::Idle);
    assert!(!session.timer_active());
    assert_eq!(session.stage(), TriageStage::NoBatch);
}

#[test]
fn test_start_batch_with_only_non_images() {
    let mut session = session_at_t5();
    let items = vec![MediaItem::new("informe.pdf", b"%PDF-1.7".to_vec())];
    assert_eq!(
        session.start_batch(items, Instant::now()),
        Err(TriageError::NoSupportedMedia { submitted: 1 })
    );
    assert_eq!(session.stage(), TriageStage::NoBatch);
    assert!(!session.timer_active());
}

#[test]
fn test_select_then_clear_category_round_trip() {
    let mut session = confirmed_session();
    let before = session.classification().cloned();

    session.select_category(CategoryId::Deformation).unwrap();
    session.clear_category().unwrap();

    assert_eq!(session.classification().cloned(), before);
    assert_eq!(session.stage(), TriageStage::CategoryGrid);
    assert_eq!(session.viewer_selection(), None);
}

#[test]
fn test_clear_category_from_detail_closes_viewer() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::PaintWear).unwrap();
    let image = session.category_images()[4].clone();
    session.open_image(CategoryId::PaintWear, image, 4).unwrap();

    session.clear_category().unwrap();
    assert_eq!(session.stage(), TriageStage::CategoryGrid);
    assert_eq!(session.viewer_selection(), None);
}

#[test]
fn test_open_then_close_image_round_trip() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Crack).unwrap();
    let grid = session.category_images().to_vec();

    session
        .open_image(CategoryId::Crack, grid[1].clone(), 1)
        .unwrap();
    assert!(session.close_image());

    assert_eq!(session.stage(), TriageStage::ImageGrid);
    assert_eq!(
        session.active_category().map(|c| c.id),
        Some(CategoryId::Crack)
    );
    assert_eq!(session.category_images(), grid.as_slice());
    assert_eq!(session.viewer_selection(), None);
}

#[test]
fn test_selecting_category_replaces_open_image() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Corrosion).unwrap();
    let image = session.category_images()[0].clone();
    session.open_image(CategoryId::Corrosion, image, 0).unwrap();

    session.select_category(CategoryId::Crack).unwrap();
    assert_eq!(session.viewer_selection(), None);
    assert_eq!(session.stage(), TriageStage::ImageGrid);
}

#[test]
fn test_open_image_of_other_category_rejected() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Corrosion).unwrap();
    let image = session.catalog().images(CategoryId::Crack)[0].clone();

    assert_eq!(
        session.open_image(CategoryId::Crack, image, 0),
        Err(TriageError::CategoryMismatch {
            requested: CategoryId::Crack,
            active: CategoryId::Corrosion,
        })
    );
    assert_eq!(session.stage(), TriageStage::ImageGrid);
}

#[test]
fn test_expansion_does_not_touch_workflow() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Corrosion).unwrap();

    session.toggle_expand(&AssetId::from("ship-4"));
    session.toggle_expand(&AssetId::from("ship-7"));
    assert_eq!(session.stage(), TriageStage::ImageGrid);
}

#[test]
fn test_reselecting_same_zone_keeps_workflow() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Corrosion).unwrap();

    session
        .select_zone(&AssetId::from("ship-4"), &ZoneId::from("t5"))
        .unwrap();
    assert_eq!(session.stage(), TriageStage::ImageGrid);
}

#[test]
fn test_invalid_zone_keeps_workflow() {
    let mut session = confirmed_session();
    session.select_category(CategoryId::Corrosion).unwrap();

    assert!(
        session
            .select_zone(&AssetId::from("ship-4"), &ZoneId::from("a1"))
            .is_err()
    );
    assert_eq!(session.stage(), TriageStage::ImageGrid);
    assert_eq!(
        session.selection().map(|s| s.zone_id.as_str()),
        Some("t5")
    );
}
