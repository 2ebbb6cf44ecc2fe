//! The triage session: one user's pass through select → upload → classify → inspect.
//!
//! All transient workflow state lives here and is discarded with the session.
//! The session enforces the cascading reset rules:
//!
//! - selecting a different zone discards the batch, the classification and
//!   the open finding;
//! - starting a new batch or resetting does the same;
//! - closing a category closes the open finding with it.
//!
//! Every operation that returns `Err` leaves the session untouched.

use std::sync::Arc;

use serde::Serialize;
use web_time::Instant;

use crate::config::WorkflowConfig;
use crate::error::TriageError;
use crate::model::{
    AssetId, CategoryId, DamageCatalog, DamageCategory, DamageImage, Fleet, MediaBatch, MediaItem,
    ZoneId,
};

use super::classification::{CatalogClassifier, ClassificationPresenter, FindingClassifier};
use super::ingestion::{IngestionController, IngestionState, IngestionStatus, TickOutcome};
use super::progress::BatchGeneration;
use super::tracker::{Selection, SelectionChange, SelectionTracker};
use super::viewer::{DrillDownViewer, InspectionDetail, ViewerSelection};

/// Which panel of the triage flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageStage {
    /// No batch submitted
    NoBatch,
    /// Batch submitted, transfer running
    Uploading,
    /// Transfer finished, waiting for confirmation
    Uploaded,
    /// Confirmed, showing the damage categories
    CategoryGrid,
    /// Showing the images of one category
    ImageGrid,
    /// Showing one finding in detail
    ImageDetail,
}

/// Explicit context object for one triage session.
#[derive(Debug)]
pub struct TriageSession {
    fleet: Arc<Fleet>,
    catalog: Arc<DamageCatalog>,
    classifier: Box<dyn FindingClassifier>,
    tracker: SelectionTracker,
    ingestion: IngestionController,
    classification: Option<ClassificationPresenter>,
    viewer: DrillDownViewer,
}

impl TriageSession {
    /// Open a session over shared catalogs.
    ///
    /// Initial expansion and selection entries that do not resolve against
    /// `fleet` are skipped with a warning.
    pub fn new(fleet: Arc<Fleet>, catalog: Arc<DamageCatalog>, workflow: &WorkflowConfig) -> Self {
        let mut tracker = SelectionTracker::new();
        for asset_id in &workflow.initial_expanded {
            if fleet.asset(asset_id).is_some() {
                if !tracker.is_expanded(asset_id) {
                    tracker.toggle_expand(asset_id);
                }
            } else {
                log::warn!("Ignoring unknown asset in initial expansion: {}", asset_id);
            }
        }
        if let Some(selection) = &workflow.initial_selection {
            if let Err(e) = tracker.select_zone(&fleet, &selection.asset_id, &selection.zone_id) {
                log::warn!("Ignoring initial selection: {}", e);
            }
        }

        Self {
            fleet,
            catalog,
            classifier: Box::new(CatalogClassifier),
            tracker,
            ingestion: IngestionController::new(
                workflow.progress_step,
                workflow.progress_interval(),
            ),
            classification: None,
            viewer: DrillDownViewer::new(),
        }
    }

    /// Session over the built-in fleet and catalog.
    pub fn with_defaults(workflow: &WorkflowConfig) -> Self {
        Self::new(
            Arc::new(Fleet::default()),
            Arc::new(DamageCatalog::default()),
            workflow,
        )
    }

    /// Replace the classifier used when a batch is confirmed.
    pub fn with_classifier(mut self, classifier: Box<dyn FindingClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn catalog(&self) -> &DamageCatalog {
        &self.catalog
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.tracker.selection()
    }

    pub fn ingestion(&self) -> &IngestionState {
        self.ingestion.state()
    }

    pub fn classification(&self) -> Option<&ClassificationPresenter> {
        self.classification.as_ref()
    }

    pub fn viewer_selection(&self) -> Option<&ViewerSelection> {
        self.viewer.selection()
    }

    /// Generation that ticks for the running batch must carry.
    pub fn generation(&self) -> BatchGeneration {
        self.ingestion.generation()
    }

    pub fn timer_active(&self) -> bool {
        self.ingestion.timer_active()
    }

    pub fn next_tick_due(&self) -> Option<Instant> {
        self.ingestion.next_tick_due()
    }

    /// Current panel of the flow, derived from the component states.
    pub fn stage(&self) -> TriageStage {
        if self.viewer.selection().is_some() {
            return TriageStage::ImageDetail;
        }
        if let Some(classification) = &self.classification {
            return match classification.active_id() {
                Some(_) => TriageStage::ImageGrid,
                None => TriageStage::CategoryGrid,
            };
        }
        match self.ingestion.status() {
            IngestionStatus::Idle => TriageStage::NoBatch,
            IngestionStatus::InProgress => TriageStage::Uploading,
            IngestionStatus::Complete => TriageStage::Uploaded,
        }
    }

    // Tree

    /// Flip a ship's expansion in the tree. Returns the new state.
    pub fn toggle_expand(&mut self, asset_id: &AssetId) -> bool {
        self.tracker.toggle_expand(asset_id)
    }

    /// Select a zone; a different zone discards the current triage.
    pub fn select_zone(
        &mut self,
        asset_id: &AssetId,
        zone_id: &ZoneId,
    ) -> Result<SelectionChange, TriageError> {
        let change = self.tracker.select_zone(&self.fleet, asset_id, zone_id)?;
        if change == SelectionChange::Changed {
            self.discard_workflow();
        }
        Ok(change)
    }

    /// Deselect the zone, discarding the current triage.
    pub fn clear_selection(&mut self) -> bool {
        let cleared = self.tracker.clear_selection();
        if cleared {
            log::info!("Zone selection cleared");
            self.discard_workflow();
        }
        cleared
    }

    // Ingestion

    /// Whether the upload control is enabled.
    pub fn can_start_batch(&self) -> bool {
        self.tracker.selection().is_some()
    }

    /// Whether the confirm control is enabled.
    pub fn can_confirm(&self) -> bool {
        self.ingestion.status() == IngestionStatus::Complete && self.classification.is_none()
    }

    /// Submit a batch for the selected zone and start the transfer.
    pub fn start_batch(
        &mut self,
        items: Vec<MediaItem>,
        now: Instant,
    ) -> Result<BatchGeneration, TriageError> {
        if self.tracker.selection().is_none() {
            return Err(TriageError::NoZoneSelected);
        }
        let batch = MediaBatch::from_items(items)?;

        self.close_classification();
        Ok(self.ingestion.start(batch, now))
    }

    /// Cooperative timer callback: fire every progress tick due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<TickOutcome> {
        self.ingestion.poll(now)
    }

    /// Deliver one queued tick. Ticks for a discarded batch are no-ops.
    pub fn deliver_tick(&mut self, generation: BatchGeneration) -> TickOutcome {
        self.ingestion.advance(generation)
    }

    /// Delete the batch and everything derived from it.
    pub fn reset(&mut self) {
        log::info!("Resetting triage workflow");
        self.discard_workflow();
    }

    /// Accept the uploaded batch and classify it.
    ///
    /// Confirming an already confirmed batch changes nothing.
    pub fn confirm(&mut self) -> Result<(), TriageError> {
        self.ingestion.ensure_complete()?;
        if self.classification.is_some() {
            return Ok(());
        }

        let categories = self
            .classifier
            .classify(&self.ingestion.state().batch, &self.catalog);
        log::info!("Batch confirmed: {} damage categories", categories.len());
        self.classification = Some(ClassificationPresenter::new(categories));
        Ok(())
    }

    // Classification

    /// Categories for the confirmed batch; empty before confirmation.
    pub fn categories(&self) -> &[DamageCategory] {
        self.classification
            .as_ref()
            .map(ClassificationPresenter::categories)
            .unwrap_or(&[])
    }

    /// Open the image grid of a category, closing any open finding.
    pub fn select_category(&mut self, id: CategoryId) -> Result<(), TriageError> {
        let classification = self
            .classification
            .as_mut()
            .ok_or(TriageError::ClassificationUnavailable)?;
        classification.select_category(id)?;
        self.viewer.close();
        Ok(())
    }

    /// Back to the category grid.
    pub fn clear_category(&mut self) -> Result<(), TriageError> {
        let classification = self
            .classification
            .as_mut()
            .ok_or(TriageError::ClassificationUnavailable)?;
        classification.clear_category();
        self.viewer.close();
        Ok(())
    }

    pub fn active_category(&self) -> Option<&DamageCategory> {
        self.classification
            .as_ref()
            .and_then(ClassificationPresenter::active_category)
    }

    /// Images of the open category in catalog order; empty renders "no images".
    pub fn category_images(&self) -> &[DamageImage] {
        match &self.classification {
            Some(classification) => classification.images(&self.catalog),
            None => &[],
        }
    }

    // Viewer

    /// Open one finding of the active category.
    pub fn open_image(
        &mut self,
        category_id: CategoryId,
        image: DamageImage,
        index: usize,
    ) -> Result<(), TriageError> {
        let classification = self
            .classification
            .as_ref()
            .ok_or(TriageError::ClassificationUnavailable)?;
        self.viewer.open(
            classification.active_id(),
            classification.images(&self.catalog),
            category_id,
            image,
            index,
        )
    }

    /// Back to the image grid of the same category.
    pub fn close_image(&mut self) -> bool {
        self.viewer.close()
    }

    /// Detail record for the open finding.
    pub fn detail(&self) -> Option<InspectionDetail> {
        let viewer = self.viewer.selection()?;
        let category = self
            .classification
            .as_ref()
            .and_then(|c| c.category(viewer.category_id));
        Some(InspectionDetail::compose(
            viewer,
            category,
            self.tracker.selection(),
            &self.fleet,
        ))
    }

    fn close_classification(&mut self) {
        self.viewer.close();
        self.classification = None;
    }

    fn discard_workflow(&mut self) {
        self.close_classification();
        self.ingestion.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TriageSession {
        TriageSession::with_defaults(&WorkflowConfig::default())
    }

    #[test]
    fn test_opens_with_configured_tree_state() {
        let session = session();
        assert!(session.tracker().is_expanded(&AssetId::from("ship-4")));
        assert_eq!(session.selection(), Some(&Selection::new("ship-4", "t5")));
        assert_eq!(session.stage(), TriageStage::NoBatch);
        assert!(session.can_start_batch());
        assert!(!session.can_confirm());
    }

    #[test]
    fn test_invalid_initial_state_is_skipped() {
        let workflow = WorkflowConfig {
            initial_expanded: vec![AssetId::from("ship-404")],
            initial_selection: Some(Selection::new("ship-4", "f7")),
            ..WorkflowConfig::default()
        };
        let session = TriageSession::with_defaults(&workflow);
        assert_eq!(session.tracker().expanded().count(), 0);
        assert_eq!(session.selection(), None);
        assert!(!session.can_start_batch());
    }

    #[test]
    fn test_categories_empty_before_confirm() {
        let session = session();
        assert!(session.categories().is_empty());
        assert!(session.category_images().is_empty());
        assert_eq!(session.detail(), None);
    }

    #[test]
    fn test_classification_actions_need_confirmation() {
        let mut session = session();
        assert_eq!(
            session.select_category(CategoryId::Corrosion),
            Err(TriageError::ClassificationUnavailable)
        );
        assert_eq!(session.clear_category(), Err(TriageError::ClassificationUnavailable));
        let image = session.catalog().images(CategoryId::Corrosion)[0].clone();
        assert_eq!(
            session.open_image(CategoryId::Corrosion, image, 0),
            Err(TriageError::ClassificationUnavailable)
        );
        assert_eq!(session.stage(), TriageStage::NoBatch);
    }
}
