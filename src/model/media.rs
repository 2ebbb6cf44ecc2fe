//! User-supplied media for an ingestion batch.

use std::path::Path;

use image::ImageFormat;

use crate::error::TriageError;

/// Extensions offered by the file picker's image filter
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"];

/// A named file picked by the user, held in memory for the current batch.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaItem {
    /// Filename of the media
    pub name: String,
    /// Raw file bytes, not decoded
    pub data: Vec<u8>,
}

impl MediaItem {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Detect the image format from the file content, falling back to the extension.
    pub fn image_format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.data)
            .ok()
            .or_else(|| ImageFormat::from_path(Path::new(&self.name)).ok())
    }

    /// Whether the picker's "images only" filter accepts this item.
    pub fn is_image(&self) -> bool {
        self.image_format().is_some()
    }
}

/// A non-empty set of image items submitted together.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaBatch {
    items: Vec<MediaItem>,
}

impl MediaBatch {
    /// Build a batch from picked files, dropping anything that is not an image.
    ///
    /// Fails when nothing was picked or when no image survives the filter.
    pub fn from_items(items: Vec<MediaItem>) -> Result<Self, TriageError> {
        if items.is_empty() {
            return Err(TriageError::EmptyBatch);
        }

        let submitted = items.len();
        let (images, rejected): (Vec<_>, Vec<_>) = items.into_iter().partition(MediaItem::is_image);
        for item in &rejected {
            log::warn!("Skipping non-image file in batch: {}", item.name);
        }

        if images.is_empty() {
            return Err(TriageError::NoSupportedMedia { submitted });
        }

        Ok(Self { items: images })
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Filenames in submission order.
    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|item| item.name.clone()).collect()
    }

    /// Total size of the batch in bytes.
    pub fn total_bytes(&self) -> usize {
        self.items.iter().map(|item| item.data.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_image_detected_by_content() {
        let item = MediaItem::new("capture", PNG_MAGIC.to_vec());
        assert_eq!(item.image_format(), Some(ImageFormat::Png));
    }

    #[test]
    fn test_image_detected_by_extension() {
        let item = MediaItem::new("hull_01.JPG", vec![1, 2, 3]);
        assert_eq!(item.image_format(), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_non_image_rejected() {
        let item = MediaItem::new("notes.txt", b"hello".to_vec());
        assert!(!item.is_image());
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert_eq!(MediaBatch::from_items(Vec::new()), Err(TriageError::EmptyBatch));
    }

    #[test]
    fn test_batch_drops_non_images() {
        let batch = MediaBatch::from_items(vec![
            MediaItem::new("a.png", PNG_MAGIC.to_vec()),
            MediaItem::new("readme.md", b"# hi".to_vec()),
            MediaItem::new("b.jpg", vec![0; 4]),
        ])
        .unwrap();
        assert_eq!(batch.names(), vec!["a.png", "b.jpg"]);
        assert_eq!(batch.total_bytes(), PNG_MAGIC.len() + 4);
    }

    #[test]
    fn test_batch_without_images_rejected() {
        let result = MediaBatch::from_items(vec![
            MediaItem::new("a.txt", Vec::new()),
            MediaItem::new("b.csv", Vec::new()),
        ]);
        assert_eq!(result, Err(TriageError::NoSupportedMedia { submitted: 2 }));
    }
}
