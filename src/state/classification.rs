//! Classification of a confirmed batch into damage categories.

use std::fmt;

use crate::error::TriageError;
use crate::model::{CategoryId, DamageCatalog, DamageCategory, DamageImage, MediaBatch};

/// Turns an uploaded batch into per-category findings.
///
/// Implementations must return categories in the shape of the catalog so
/// that the category grid and the drill-down views work unchanged.
pub trait FindingClassifier: fmt::Debug {
    /// Categories with `finding_count` computed for `batch`.
    fn classify(&self, batch: &MediaBatch, catalog: &DamageCatalog) -> Vec<DamageCategory>;
}

/// Reports the catalog's reference counts regardless of the batch content.
///
/// There is no detector behind the workflow yet; a real classifier replaces
/// this and recomputes `finding_count` from the batch items.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogClassifier;

impl FindingClassifier for CatalogClassifier {
    fn classify(&self, batch: &MediaBatch, catalog: &DamageCatalog) -> Vec<DamageCategory> {
        log::debug!(
            "Classifying {} item(s) with the reference catalog",
            batch.len()
        );
        catalog.categories().to_vec()
    }
}

/// Category grid and image grid state for a confirmed batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationPresenter {
    categories: Vec<DamageCategory>,
    active: Option<CategoryId>,
}

impl ClassificationPresenter {
    pub fn new(categories: Vec<DamageCategory>) -> Self {
        Self {
            categories,
            active: None,
        }
    }

    /// Categories shown on the grid, in catalog order.
    pub fn categories(&self) -> &[DamageCategory] {
        &self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&DamageCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Open the image grid for a category.
    pub fn select_category(&mut self, id: CategoryId) -> Result<(), TriageError> {
        if self.category(id).is_none() {
            return Err(TriageError::UnknownCategory(id.as_u32()));
        }
        log::info!("Opened damage category {}", id);
        self.active = Some(id);
        Ok(())
    }

    /// Return to the category grid. Returns the category that was open.
    pub fn clear_category(&mut self) -> Option<CategoryId> {
        self.active.take()
    }

    pub fn active_id(&self) -> Option<CategoryId> {
        self.active
    }

    pub fn active_category(&self) -> Option<&DamageCategory> {
        self.active.and_then(|id| self.category(id))
    }

    /// Images of the open category; empty when none is open or it has none.
    pub fn images<'a>(&self, catalog: &'a DamageCatalog) -> &'a [DamageImage] {
        match self.active {
            Some(id) => catalog.images(id),
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaItem, default_categories};

    #[test]
    fn test_catalog_classifier_keeps_reference_counts() {
        let catalog = DamageCatalog::default();
        let batch = MediaBatch::from_items(vec![MediaItem::new("a.png", Vec::new())]).unwrap();
        let categories = CatalogClassifier.classify(&batch, &catalog);
        assert_eq!(categories, default_categories());
    }

    #[test]
    fn test_select_and_clear_category() {
        let catalog = DamageCatalog::default();
        let mut presenter = ClassificationPresenter::new(catalog.categories().to_vec());
        let initial = presenter.clone();

        presenter.select_category(CategoryId::Crack).unwrap();
        assert_eq!(presenter.active_category().map(|c| c.label.as_str()), Some("Grietas"));
        assert_eq!(presenter.images(&catalog).len(), 3);

        assert_eq!(presenter.clear_category(), Some(CategoryId::Crack));
        assert_eq!(presenter, initial);
        assert!(presenter.images(&catalog).is_empty());
    }

    #[test]
    fn test_category_missing_from_classification_is_rejected() {
        let mut presenter = ClassificationPresenter::new(vec![default_categories().remove(0)]);
        assert_eq!(
            presenter.select_category(CategoryId::PaintWear),
            Err(TriageError::UnknownCategory(4))
        );
        assert_eq!(presenter.active_id(), None);
    }

    #[derive(Debug)]
    struct PerItemClassifier;

    impl FindingClassifier for PerItemClassifier {
        fn classify(&self, batch: &MediaBatch, catalog: &DamageCatalog) -> Vec<DamageCategory> {
            catalog
                .categories()
                .iter()
                .cloned()
                .map(|c| c.with_finding_count(batch.len() as u32))
                .collect()
        }
    }

    #[test]
    fn test_custom_classifier_recomputes_counts() {
        let catalog = DamageCatalog::default();
        let batch = MediaBatch::from_items(vec![
            MediaItem::new("a.png", Vec::new()),
            MediaItem::new("b.png", Vec::new()),
        ])
        .unwrap();
        let categories = PerItemClassifier.classify(&batch, &catalog);
        assert!(categories.iter().all(|c| c.finding_count == 2));
        assert_eq!(categories.len(), catalog.categories().len());
    }
}
