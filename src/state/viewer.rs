//! Drill-down from the image grid to a single finding and its detail record.

use serde::Serialize;

use crate::constants::{UNKNOWN_FIELD, detail};
use crate::error::TriageError;
use crate::model::{CategoryId, DamageCategory, DamageImage, Fleet};

use super::tracker::Selection;

/// The finding currently open in the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSelection {
    pub category_id: CategoryId,
    pub image: DamageImage,
    /// Position of the image within its category
    pub index: usize,
}

/// Holds the open finding, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrillDownViewer {
    selection: Option<ViewerSelection>,
}

impl DrillDownViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `image` of the active category.
    ///
    /// `images` is the active category's image list; the image must sit at
    /// `index` in it, otherwise the reference is stale and nothing changes.
    pub fn open(
        &mut self,
        active: Option<CategoryId>,
        images: &[DamageImage],
        category_id: CategoryId,
        image: DamageImage,
        index: usize,
    ) -> Result<(), TriageError> {
        let active = active.ok_or(TriageError::NoActiveCategory)?;
        if active != category_id {
            return Err(TriageError::CategoryMismatch {
                requested: category_id,
                active,
            });
        }
        if images.get(index) != Some(&image) {
            return Err(TriageError::ImageOutOfRange {
                category: category_id,
                index,
                len: images.len(),
            });
        }

        log::info!("Opened finding {} ({}#{})", image.display_name, category_id, index);
        self.selection = Some(ViewerSelection {
            category_id,
            image,
            index,
        });
        Ok(())
    }

    /// Back to the image grid. Returns whether a finding was open.
    pub fn close(&mut self) -> bool {
        self.selection.take().is_some()
    }

    pub fn selection(&self) -> Option<&ViewerSelection> {
        self.selection.as_ref()
    }
}

/// Read-only record rendered by the detail panel.
///
/// Fields that can no longer be resolved (category gone, zone deselected)
/// render as [`UNKNOWN_FIELD`] instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionDetail {
    pub image: DamageImage,
    pub index: usize,
    pub damage_type: String,
    pub severity: String,
    pub inspection_date: String,
    pub inspector: String,
    /// `AssetName - ZoneName` of the selected zone
    pub location: String,
    pub observations: String,
    pub affected_area_m2: f32,
    pub max_depth_mm: f32,
}

impl InspectionDetail {
    /// Build the detail record from whatever is still resolvable.
    pub fn compose(
        viewer: &ViewerSelection,
        category: Option<&DamageCategory>,
        selection: Option<&Selection>,
        fleet: &Fleet,
    ) -> Self {
        let location = selection.and_then(|s| s.path_label(fleet));
        if location.is_none() {
            log::warn!("Detail view has no resolvable zone; rendering as unknown");
        }

        Self {
            image: viewer.image.clone(),
            index: viewer.index,
            damage_type: category
                .map(|c| c.label.clone())
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            severity: category
                .map(|c| c.severity.label().to_string())
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            inspection_date: detail::INSPECTION_DATE.to_string(),
            inspector: detail::INSPECTOR.to_string(),
            location: location.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            observations: detail::OBSERVATIONS.to_string(),
            affected_area_m2: detail::AFFECTED_AREA_M2,
            max_depth_mm: detail::MAX_DEPTH_MM,
        }
    }
}
