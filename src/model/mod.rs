//! Reference data and media models for the triage workflow.

mod asset;
mod damage;
mod media;

pub use asset::{Asset, AssetId, Fleet, Zone, ZoneId, default_fleet};
pub use damage::{
    CategoryId, DamageCatalog, DamageCategory, DamageImage, Severity, default_categories,
    default_images,
};
pub use media::{IMAGE_EXTENSIONS, MediaBatch, MediaItem};
