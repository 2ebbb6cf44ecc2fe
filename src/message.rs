//! Message types for the triage workflow.
//!
//! All UI events are represented as messages in the Elm architecture style
//! and applied to a [`TriageSession`](crate::state::TriageSession) by
//! [`update`](crate::handlers::update).

use crate::error::TriageError;
use crate::model::{AssetId, MediaItem, ZoneId};
use crate::state::BatchGeneration;

/// Messages that can be sent to update the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Ship/zone tree events
    Tree(TreeMessage),
    /// Upload card events
    Upload(UploadMessage),
    /// Category grid and image grid events
    Classification(ClassificationMessage),
    /// Detail view events
    Viewer(ViewerMessage),
    /// Toolbar actions handled outside the workflow
    Toolbar(ToolbarMessage),
}

/// Ship/zone tree events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeMessage {
    /// Ship row clicked
    ToggleAsset(AssetId),
    /// Zone row clicked
    SelectZone(AssetId, ZoneId),
    /// Selection dropped by the host (e.g. zone list reloaded)
    ClearSelection,
}

/// Upload card events.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadMessage {
    /// Files returned by the picker
    FilesPicked(Vec<MediaItem>),
    /// One transfer tick for the given batch
    ProgressTick(BatchGeneration),
    /// "Aplicar": confirm the uploaded batch
    Apply,
    /// "Borrar Imágenes": discard the batch
    DeleteImages,
}

/// Category grid and image grid events.
///
/// Ids arrive as raw numbers from the UI and are validated on handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMessage {
    /// Category card clicked
    CategorySelected(u32),
    /// Image grid closed
    CategoryClosed,
}

/// Detail view events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerMessage {
    /// Image thumbnail clicked
    ImageSelected {
        /// Raw category id
        category: u32,
        /// Position within the category
        index: usize,
    },
    /// Detail view closed
    Closed,
}

/// Toolbar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarMessage {
    /// "Generar Reportes"
    OpenReport,
    /// "Exportar Datos"
    ExportData,
}

/// Navigation request for a collaborator outside the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The static hull report document
    ReportView,
}

impl Navigation {
    /// Route of the target view.
    pub fn route(&self) -> &'static str {
        match self {
            Navigation::ReportView => "/ship_hull_report",
        }
    }
}

/// What handling a message did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Session state changed
    Updated,
    /// Accepted, but nothing changed
    Unchanged,
    /// Rejected; the session is unchanged
    Rejected(TriageError),
    /// The host should navigate away
    Navigate(Navigation),
    /// Exported session snapshot as JSON
    Exported(String),
}
