use serde::Serialize;

use crate::analysis::grid::plan_slices;
use crate::analysis::labels::Annotation;
use crate::analysis::remap::remap_annotations;
use crate::config::SliceConfig;
use crate::error::SlicerError;
use crate::layout::slice::Slice;

/// Every slice of one image with its remapped annotations.
///
/// This is the I/O free entry point of the crate: it takes the decoded image
/// size and the parsed annotations and leaves reading and writing files to
/// the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SlicePlan {
    pub image_width: u32,
    pub image_height: u32,
    pub slices: Vec<Slice>,
}

impl SlicePlan {
    /// Plans the slice grid and remaps `annotations` into every slice.
    ///
    /// # Arguments
    /// * `image_width`, `image_height` - Size of the source image in pixels
    /// * `annotations` - Image-space annotations of the source image
    /// * `config` - Slice size and overlap
    ///
    /// # Returns
    /// The slices in row-major order; fails with `InvalidConfiguration` when
    /// the image size or the slice geometry is invalid.
    pub fn build(
        image_width: u32,
        image_height: u32,
        annotations: &[Annotation],
        config: &SliceConfig,
    ) -> Result<Self, SlicerError> {
        config.validate()?;

        let slices = plan_slices(image_width, image_height, config)?
            .into_iter()
            .map(|rect| Slice {
                annotations: remap_annotations(annotations, &rect),
                rect,
            })
            .collect();

        Ok(Self {
            image_width,
            image_height,
            slices,
        })
    }

    /// Total number of annotation rows across all slices.
    pub fn annotation_count(&self) -> usize {
        self.slices.iter().map(|slice| slice.annotations.len()).sum()
    }

    /// Number of slices that received no annotation.
    pub fn empty_slice_count(&self) -> usize {
        self.slices
            .iter()
            .filter(|slice| slice.annotations.is_empty())
            .count()
    }
}
