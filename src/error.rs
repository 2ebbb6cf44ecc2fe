//! Error types for the triage workflow and its reference catalogs.

use thiserror::Error;

use crate::model::{AssetId, CategoryId, ZoneId};

/// A workflow action that was rejected.
///
/// Every rejected action leaves the session exactly as it was. None of these
/// are fatal: the UI renders them as disabled controls or empty panels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    /// The action needs a selected zone and none is active
    #[error("No zone selected")]
    NoZoneSelected,

    /// Asset id not present in the fleet
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    /// Zone id not present in the given asset
    #[error("Zone {zone} does not belong to asset {asset}")]
    UnknownZone {
        /// Asset that was searched
        asset: AssetId,
        /// Zone that was not found
        zone: ZoneId,
    },

    /// A batch was submitted without any media
    #[error("Cannot start an empty batch")]
    EmptyBatch,

    /// Every submitted file was filtered out as a non-image
    #[error("None of the {submitted} submitted files is a supported image")]
    NoSupportedMedia {
        /// Number of files the user picked
        submitted: usize,
    },

    /// Confirm was requested before the upload finished
    #[error("Upload is not complete ({progress}%)")]
    PrematureConfirm {
        /// Progress at the time of the request
        progress: u8,
    },

    /// A classification action was requested before the batch was confirmed
    #[error("Classification is not available until the batch is confirmed")]
    ClassificationUnavailable,

    /// A viewer action was requested with no category open
    #[error("No damage category is open")]
    NoActiveCategory,

    /// A viewer action referred to a category other than the open one
    #[error("Category {requested} is not the open category ({active})")]
    CategoryMismatch {
        /// Category named by the action
        requested: CategoryId,
        /// Category currently open
        active: CategoryId,
    },

    /// An image index that does not exist in the open category
    #[error("Image {index} is out of range for category {category} ({len} images)")]
    ImageOutOfRange {
        /// Category the index was resolved against
        category: CategoryId,
        /// Requested index
        index: usize,
        /// Number of images in the category
        len: usize,
    },

    /// A raw category id that is not part of the taxonomy
    #[error("Unknown damage category id: {0}")]
    UnknownCategory(u32),
}

/// Errors raised while loading or validating reference catalogs.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// JSON parsing error
    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Two assets share an id
    #[error("Duplicate asset id: {0}")]
    DuplicateAsset(AssetId),

    /// Two zones in the same asset share an id
    #[error("Duplicate zone id {zone} in asset {asset}")]
    DuplicateZone {
        /// Asset containing the duplicate
        asset: AssetId,
        /// Repeated zone id
        zone: ZoneId,
    },

    /// An asset without any zone cannot be inspected
    #[error("Asset {0} has no zones")]
    EmptyAsset(AssetId),

    /// Two categories share an id
    #[error("Duplicate damage category: {0}")]
    DuplicateCategory(CategoryId),

    /// The image table references a category missing from the category list
    #[error("Image table references category {0}, which is not in the catalog")]
    OrphanImages(CategoryId),

    /// A required text field is empty
    #[error("Empty {field} in catalog entry {entry}")]
    EmptyField {
        /// Name of the empty field
        field: &'static str,
        /// Identifier of the offending entry
        entry: String,
    },
}
