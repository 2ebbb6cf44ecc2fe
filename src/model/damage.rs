//! Damage taxonomy: categories, severities and the per-category finding images.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, TriageError};

/// The closed set of damage categories a finding can be classified into.
///
/// Serialized as the numeric id used by the catalog files, so an unknown id
/// fails at load time instead of producing an empty lookup later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CategoryId {
    Corrosion,
    Crack,
    Deformation,
    PaintWear,
}

impl CategoryId {
    /// All categories in display order.
    pub const ALL: [CategoryId; 4] = [
        CategoryId::Corrosion,
        CategoryId::Crack,
        CategoryId::Deformation,
        CategoryId::PaintWear,
    ];

    /// Numeric id used in catalog files and by the UI.
    pub fn as_u32(self) -> u32 {
        match self {
            CategoryId::Corrosion => 1,
            CategoryId::Crack => 2,
            CategoryId::Deformation => 3,
            CategoryId::PaintWear => 4,
        }
    }
}

impl TryFrom<u32> for CategoryId {
    type Error = TriageError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(CategoryId::Corrosion),
            2 => Ok(CategoryId::Crack),
            3 => Ok(CategoryId::Deformation),
            4 => Ok(CategoryId::PaintWear),
            other => Err(TriageError::UnknownCategory(other)),
        }
    }
}

impl From<CategoryId> for u32 {
    fn from(id: CategoryId) -> Self {
        id.as_u32()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// How urgently a category of damage needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Label shown on severity badges.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Baja",
            Severity::Medium => "Media",
            Severity::High => "Alta",
        }
    }
}

/// One bucket of the damage taxonomy, as shown on the category grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCategory {
    pub id: CategoryId,
    /// Display name of the category
    pub label: String,
    pub severity: Severity,
    /// Number of findings detected for the current batch
    pub finding_count: u32,
    /// RGB color tag for the category swatch
    pub color: [u8; 3],
}

impl DamageCategory {
    pub fn new(id: CategoryId, label: &str, severity: Severity, finding_count: u32, color: [u8; 3]) -> Self {
        Self {
            id,
            label: label.to_string(),
            severity,
            finding_count,
            color,
        }
    }

    /// Same category with a recomputed finding count.
    pub fn with_finding_count(mut self, finding_count: u32) -> Self {
        self.finding_count = finding_count;
        self
    }
}

/// A single piece of evidence shown in a category's image grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageImage {
    pub url: String,
    pub display_name: String,
}

impl DamageImage {
    pub fn new(url: &str, display_name: &str) -> Self {
        Self {
            url: url.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// On-disk form of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    categories: Vec<DamageCategory>,
    #[serde(default)]
    images: Vec<ImageGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImageGroup {
    category: CategoryId,
    images: Vec<DamageImage>,
}

/// Validated damage taxonomy plus the category-to-image lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageCatalog {
    categories: Vec<DamageCategory>,
    images: BTreeMap<CategoryId, Vec<DamageImage>>,
}

impl DamageCatalog {
    /// Validate the categories and image table.
    ///
    /// Every image group must name a category in `categories`; a category
    /// without a group simply has no images.
    pub fn new(
        categories: Vec<DamageCategory>,
        images: Vec<(CategoryId, Vec<DamageImage>)>,
    ) -> Result<Self, CatalogError> {
        let mut seen = Vec::with_capacity(categories.len());
        for category in &categories {
            if category.label.trim().is_empty() {
                return Err(CatalogError::EmptyField {
                    field: "label",
                    entry: category.id.to_string(),
                });
            }
            if seen.contains(&category.id) {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
            seen.push(category.id);
        }

        let mut table = BTreeMap::new();
        for (category, group) in images {
            if !seen.contains(&category) {
                return Err(CatalogError::OrphanImages(category));
            }
            if let Some(image) = group.iter().find(|img| img.display_name.trim().is_empty()) {
                return Err(CatalogError::EmptyField {
                    field: "display_name",
                    entry: image.url.clone(),
                });
            }
            if table.insert(category, group).is_some() {
                return Err(CatalogError::DuplicateCategory(category));
            }
        }

        Ok(Self {
            categories,
            images: table,
        })
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(
            file.categories,
            file.images
                .into_iter()
                .map(|group| (group.category, group.images))
                .collect(),
        )
    }

    /// Serialize the catalog to its JSON file form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let file = CatalogFile {
            categories: self.categories.clone(),
            images: self
                .images
                .iter()
                .map(|(category, images)| ImageGroup {
                    category: *category,
                    images: images.clone(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&file)
    }

    /// All categories in catalog order.
    pub fn categories(&self) -> &[DamageCategory] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&DamageCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Images for a category in catalog order. Empty when the category has none.
    pub fn images(&self, id: CategoryId) -> &[DamageImage] {
        self.images.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for DamageCatalog {
    fn default() -> Self {
        let mut images = BTreeMap::new();
        for (category, group) in default_images() {
            images.insert(category, group);
        }
        Self {
            categories: default_categories(),
            images,
        }
    }
}

/// The built-in damage categories.
pub fn default_categories() -> Vec<DamageCategory> {
    vec![
        DamageCategory::new(CategoryId::Corrosion, "Corrosión", Severity::High, 12, [239, 68, 68]),
        DamageCategory::new(CategoryId::Crack, "Grietas", Severity::Medium, 8, [249, 115, 22]),
        DamageCategory::new(CategoryId::Deformation, "Deformaciones", Severity::Low, 5, [234, 179, 8]),
        DamageCategory::new(
            CategoryId::PaintWear,
            "Desgaste de Pintura",
            Severity::Medium,
            15,
            [59, 130, 246],
        ),
    ]
}

/// The built-in finding images for each category.
pub fn default_images() -> Vec<(CategoryId, Vec<DamageImage>)> {
    vec![
        (
            CategoryId::Corrosion,
            vec![
                DamageImage::new("/corrosion-damage-ship-hull.jpg", "Corrosión_001.jpg"),
                DamageImage::new("/rust-corrosion-metal-surface.jpg", "Corrosión_002.jpg"),
                DamageImage::new("/severe-corrosion-steel.jpg", "Corrosión_003.jpg"),
                DamageImage::new("/oxidation-damage-metal.jpg", "Corrosión_004.jpg"),
            ],
        ),
        (
            CategoryId::Crack,
            vec![
                DamageImage::new("/crack-in-ship-hull.jpg", "Grieta_001.jpg"),
                DamageImage::new("/structural-crack-metal.jpg", "Grieta_002.jpg"),
                DamageImage::new("/fracture-damage-steel.jpg", "Grieta_003.jpg"),
            ],
        ),
        (
            CategoryId::Deformation,
            vec![
                DamageImage::new("/deformation-ship-structure.jpg", "Deformación_001.jpg"),
                DamageImage::new("/bent-metal-hull.jpg", "Deformación_002.jpg"),
                DamageImage::new("/warped-steel-surface.jpg", "Deformación_003.jpg"),
            ],
        ),
        (
            CategoryId::PaintWear,
            vec![
                DamageImage::new("/paint-deterioration-ship.jpg", "Pintura_001.jpg"),
                DamageImage::new("/paint-peeling-metal-surface.jpg", "Pintura_002.jpg"),
                DamageImage::new("/coating-damage-hull.jpg", "Pintura_003.jpg"),
                DamageImage::new("/paint-wear-ship-exterior.jpg", "Pintura_004.jpg"),
                DamageImage::new("/paint-degradation-marine.jpg", "Pintura_005.jpg"),
            ],
        ),
    ]
}
