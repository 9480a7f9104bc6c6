use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::estimate_conf::{DEFAULT_MAX_IMAGES, DEFAULT_MAX_IMAGE_BYTES};

/// A photo picked by the user and held until the lead is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

impl StagedImage {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Lowercased extension of the original file name, if it has one
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Result of staging one file that passed the size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Added,
    /// The collection was already full; the new file was dropped
    CapReached,
}

/// User-facing notice produced while staging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StagingNotice {
    #[error("{file_name} is larger than {limit_mb}MB")]
    TooLarge {
        file_name: String,
        size: usize,
        limit_mb: usize,
    },
}

/// Bounded, insertion-ordered set of staged photos.
///
/// Files over the per-file limit are refused with a notice. Once `max_count`
/// files are held, later files are refused silently; earlier ones are never
/// evicted.
#[derive(Debug, Clone)]
pub struct ImageStaging {
    images: Vec<StagedImage>,
    max_bytes: usize,
    max_count: usize,
}

impl ImageStaging {
    pub fn new(max_bytes: usize, max_count: usize) -> Self {
        Self {
            images: Vec::with_capacity(max_count),
            max_bytes,
            max_count,
        }
    }

    pub fn stage(&mut self, image: StagedImage) -> Result<StageOutcome, StagingNotice> {
        let size = image.size();
        if size > self.max_bytes {
            warn!(file_name = %image.file_name, size, "Rejected oversized image");
            return Err(StagingNotice::TooLarge {
                file_name: image.file_name,
                size,
                limit_mb: self.max_bytes.div_ceil(1024 * 1024),
            });
        }

        if self.images.len() >= self.max_count {
            debug!(file_name = %image.file_name, "Image cap reached, dropping file");
            return Ok(StageOutcome::CapReached);
        }

        debug!(file_name = %image.file_name, size, "Staged image");
        self.images.push(image);
        Ok(StageOutcome::Added)
    }

    /// Stage a batch in selection order, returning a notice per rejected file.
    pub fn stage_all<I>(&mut self, images: I) -> Vec<StagingNotice>
    where
        I: IntoIterator<Item = StagedImage>,
    {
        images
            .into_iter()
            .filter_map(|image| self.stage(image).err())
            .collect()
    }

    /// Out-of-range indexes are a no-op.
    pub fn unstage(&mut self, index: usize) -> Option<StagedImage> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[StagedImage] {
        &self.images
    }
}

impl Default for ImageStaging {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES, DEFAULT_MAX_IMAGES)
    }
}
