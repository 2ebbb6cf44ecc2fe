//! Asset hierarchy: ships and their inspectable zones.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Identifier of a ship in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a zone, unique within its ship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A sub-region of a ship that can be inspected on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
}

impl Zone {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: ZoneId::new(id),
            name: name.to_string(),
        }
    }
}

/// A ship and the zones it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub zones: Vec<Zone>,
}

impl Asset {
    pub fn new(id: &str, name: &str, zones: Vec<Zone>) -> Self {
        Self {
            id: AssetId::new(id),
            name: name.to_string(),
            zones,
        }
    }

    /// Look up one of this ship's zones.
    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| &z.id == zone_id)
    }
}

/// The validated two-level tree of ships and zones.
///
/// Construction rejects duplicate ids and empty names, so lookups never have
/// to deal with ambiguous entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Fleet {
    assets: Vec<Asset>,
}

impl Fleet {
    /// Validate and wrap a list of assets, keeping their order.
    pub fn new(assets: Vec<Asset>) -> Result<Self, CatalogError> {
        let mut seen_assets = HashSet::new();
        for asset in &assets {
            if asset.name.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    field: "name",
                    entry: asset.id.to_string(),
                });
            }
            if !seen_assets.insert(&asset.id) {
                return Err(CatalogError::DuplicateAsset(asset.id.clone()));
            }
            if asset.zones.is_empty() {
                return Err(CatalogError::EmptyAsset(asset.id.clone()));
            }

            let mut seen_zones = HashSet::new();
            for zone in &asset.zones {
                if zone.name.trim().is_empty() {
                    return Err(CatalogError::EmptyField {
                        field: "name",
                        entry: format!("{}/{}", asset.id, zone.id),
                    });
                }
                if !seen_zones.insert(&zone.id) {
                    return Err(CatalogError::DuplicateZone {
                        asset: asset.id.clone(),
                        zone: zone.id.clone(),
                    });
                }
            }
        }

        Ok(Self { assets })
    }

    /// Parse and validate a fleet from a JSON array of assets.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let assets: Vec<Asset> = serde_json::from_str(json)?;
        Self::new(assets)
    }

    /// All ships, in catalog order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, asset_id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == asset_id)
    }

    /// Resolve an (asset, zone) pair, returning both records.
    pub fn resolve(&self, asset_id: &AssetId, zone_id: &ZoneId) -> Option<(&Asset, &Zone)> {
        let asset = self.asset(asset_id)?;
        let zone = asset.zone(zone_id)?;
        Some((asset, zone))
    }

    pub fn contains_zone(&self, asset_id: &AssetId, zone_id: &ZoneId) -> bool {
        self.resolve(asset_id, zone_id).is_some()
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            assets: default_fleet(),
        }
    }
}

/// The built-in fleet used when no fleet file is supplied.
pub fn default_fleet() -> Vec<Asset> {
    vec![
        Asset::new(
            "ship-4",
            "Barco 4",
            vec![Zone::new("t5", "Zona T5"), Zone::new("t6", "Zona T6")],
        ),
        Asset::new(
            "ship-5",
            "Barco 5",
            vec![Zone::new("f7", "Zona F7"), Zone::new("f8", "Zona F8")],
        ),
        Asset::new(
            "ship-7",
            "Barco 7",
            vec![
                Zone::new("a1", "Zona A1"),
                Zone::new("a2", "Zona A2"),
                Zone::new("a3", "Zona A3"),
            ],
        ),
    ]
}
