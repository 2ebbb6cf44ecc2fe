//! Message handlers for the triage session.
//!
//! Each handler processes one category of messages, keeping [`update`]
//! a thin dispatcher. Rejected actions are logged and reported through
//! [`Outcome::Rejected`]; they never panic and never change the session.

use web_time::Instant;

use crate::error::TriageError;
use crate::export::TriageExport;
use crate::message::{
    ClassificationMessage, Message, Navigation, Outcome, ToolbarMessage, TreeMessage,
    UploadMessage, ViewerMessage,
};
use crate::model::CategoryId;
use crate::state::{SelectionChange, TickOutcome, TriageSession};

/// Apply one message to the session.
pub fn update(session: &mut TriageSession, message: Message, now: Instant) -> Outcome {
    match message {
        Message::Tree(msg) => handle_tree(session, msg),
        Message::Upload(msg) => handle_upload(session, msg, now),
        Message::Classification(msg) => handle_classification(session, msg),
        Message::Viewer(msg) => handle_viewer(session, msg),
        Message::Toolbar(msg) => handle_toolbar(session, msg),
    }
}

fn rejected(error: TriageError) -> Outcome {
    log::warn!("Action rejected: {}", error);
    Outcome::Rejected(error)
}

fn changed_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Updated
    } else {
        Outcome::Unchanged
    }
}

/// Handle ship/zone tree messages.
pub fn handle_tree(session: &mut TriageSession, msg: TreeMessage) -> Outcome {
    match msg {
        TreeMessage::ToggleAsset(asset_id) => {
            session.toggle_expand(&asset_id);
            Outcome::Updated
        }
        TreeMessage::SelectZone(asset_id, zone_id) => {
            match session.select_zone(&asset_id, &zone_id) {
                Ok(SelectionChange::Changed) => Outcome::Updated,
                Ok(SelectionChange::Unchanged) => Outcome::Unchanged,
                Err(e) => rejected(e),
            }
        }
        TreeMessage::ClearSelection => changed_if(session.clear_selection()),
    }
}

/// Handle upload card messages.
pub fn handle_upload(session: &mut TriageSession, msg: UploadMessage, now: Instant) -> Outcome {
    match msg {
        UploadMessage::FilesPicked(items) => match session.start_batch(items, now) {
            Ok(_) => Outcome::Updated,
            Err(e) => rejected(e),
        },
        UploadMessage::ProgressTick(generation) => match session.deliver_tick(generation) {
            TickOutcome::Advanced(_) | TickOutcome::Completed => Outcome::Updated,
            TickOutcome::Stale => Outcome::Unchanged,
        },
        UploadMessage::Apply => match session.confirm() {
            Ok(()) => Outcome::Updated,
            Err(e) => rejected(e),
        },
        UploadMessage::DeleteImages => {
            session.reset();
            Outcome::Updated
        }
    }
}

/// Handle category grid and image grid messages.
pub fn handle_classification(session: &mut TriageSession, msg: ClassificationMessage) -> Outcome {
    let result = match msg {
        ClassificationMessage::CategorySelected(raw) => {
            CategoryId::try_from(raw).and_then(|id| session.select_category(id))
        }
        ClassificationMessage::CategoryClosed => session.clear_category(),
    };
    match result {
        Ok(()) => Outcome::Updated,
        Err(e) => rejected(e),
    }
}

/// Handle detail view messages.
///
/// Thumbnails identify an image by position; the image itself is resolved
/// from the open category so a stale position is rejected.
pub fn handle_viewer(session: &mut TriageSession, msg: ViewerMessage) -> Outcome {
    match msg {
        ViewerMessage::ImageSelected { category, index } => {
            let result = CategoryId::try_from(category).and_then(|id| {
                let image = session.category_images().get(index).cloned().ok_or(
                    TriageError::ImageOutOfRange {
                        category: id,
                        index,
                        len: session.category_images().len(),
                    },
                )?;
                session.open_image(id, image, index)
            });
            match result {
                Ok(()) => Outcome::Updated,
                Err(e) => rejected(e),
            }
        }
        ViewerMessage::Closed => changed_if(session.close_image()),
    }
}

/// Handle toolbar messages.
pub fn handle_toolbar(session: &mut TriageSession, msg: ToolbarMessage) -> Outcome {
    match msg {
        ToolbarMessage::OpenReport => {
            log::info!("Navigating to {}", Navigation::ReportView.route());
            Outcome::Navigate(Navigation::ReportView)
        }
        ToolbarMessage::ExportData => match TriageExport::from_session(session).to_json() {
            Ok(json) => {
                log::info!("Exported triage snapshot ({} bytes)", json.len());
                Outcome::Exported(json)
            }
            Err(e) => {
                log::error!("Failed to serialize triage export: {}", e);
                Outcome::Unchanged
            }
        },
    }
}
