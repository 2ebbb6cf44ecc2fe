//! Workflow state: tree selection, ingestion, classification and drill-down.

mod classification;
mod ingestion;
mod progress;
mod session;
mod tracker;
mod viewer;

#[cfg(test)]
mod tests;

pub use classification::{CatalogClassifier, ClassificationPresenter, FindingClassifier};
pub use ingestion::{IngestionController, IngestionState, IngestionStatus, TickOutcome};
pub use progress::{BatchGeneration, MIN_TICK_INTERVAL, ProgressTimer};
pub use session::{TriageSession, TriageStage};
pub use tracker::{Selection, SelectionChange, SelectionTracker};
pub use viewer::{DrillDownViewer, InspectionDetail, ViewerSelection};
