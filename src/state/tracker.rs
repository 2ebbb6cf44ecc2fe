//! Expansion and selection state for the ship/zone tree.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;
use crate::model::{AssetId, Fleet, ZoneId};

/// The zone currently chosen for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub asset_id: AssetId,
    pub zone_id: ZoneId,
}

impl Selection {
    pub fn new(asset_id: impl Into<AssetId>, zone_id: impl Into<ZoneId>) -> Self {
        Self {
            asset_id: asset_id.into(),
            zone_id: zone_id.into(),
        }
    }

    /// Human-readable `AssetName - ZoneName` label, if the pair still resolves.
    pub fn path_label(&self, fleet: &Fleet) -> Option<String> {
        let (asset, zone) = fleet.resolve(&self.asset_id, &self.zone_id)?;
        Some(format!(
            "{}{}{}",
            asset.name,
            crate::constants::ZONE_PATH_SEPARATOR,
            zone.name
        ))
    }
}

/// Result of a selection request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// A different zone is now selected
    Changed,
    /// The requested zone was already selected
    Unchanged,
}

/// Tracks which ships are expanded in the tree and which zone is selected.
///
/// Expansion and selection are independent: a ship can be collapsed while one
/// of its zones stays selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    expanded: BTreeSet<AssetId>,
    selection: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the expanded state of a ship. Returns the new state.
    pub fn toggle_expand(&mut self, asset_id: &AssetId) -> bool {
        let expanded = if self.expanded.remove(asset_id) {
            false
        } else {
            self.expanded.insert(asset_id.clone());
            true
        };
        log::debug!("Asset {} expanded = {}", asset_id, expanded);
        expanded
    }

    pub fn is_expanded(&self, asset_id: &AssetId) -> bool {
        self.expanded.contains(asset_id)
    }

    /// Expanded ships in id order.
    pub fn expanded(&self) -> impl Iterator<Item = &AssetId> {
        self.expanded.iter()
    }

    /// Select a zone after checking that it belongs to the ship.
    ///
    /// On error the current selection is left untouched.
    pub fn select_zone(
        &mut self,
        fleet: &Fleet,
        asset_id: &AssetId,
        zone_id: &ZoneId,
    ) -> Result<SelectionChange, TriageError> {
        let asset = fleet
            .asset(asset_id)
            .ok_or_else(|| TriageError::UnknownAsset(asset_id.clone()))?;
        if asset.zone(zone_id).is_none() {
            return Err(TriageError::UnknownZone {
                asset: asset_id.clone(),
                zone: zone_id.clone(),
            });
        }

        if self.is_selected(asset_id, zone_id) {
            return Ok(SelectionChange::Unchanged);
        }

        log::info!("Selected zone {}/{}", asset_id, zone_id);
        self.selection = Some(Selection {
            asset_id: asset_id.clone(),
            zone_id: zone_id.clone(),
        });
        Ok(SelectionChange::Changed)
    }

    /// Drop the current selection. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_selected(&self, asset_id: &AssetId, zone_id: &ZoneId) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| &s.asset_id == asset_id && &s.zone_id == zone_id)
    }
}
