//! Slice grid planning.
//!
//! Rows are scanned top to bottom and columns left to right. Slices that
//! would cross the right or bottom image border are pulled back inside the
//! image instead of being truncated, so every slice keeps the requested size
//! whenever that size fits in the image.

use crate::analysis::rect::SliceRect;
use crate::config::{SliceConfig, validate_overlap, validate_slice_size};
use crate::error::SlicerError;

/// Number of pixels shared by two neighbouring slices along one axis.
pub fn overlap_pixels(slice_size: u32, overlap_ratio: f64) -> u32 {
    (overlap_ratio * slice_size as f64).floor() as u32
}

/// Distance between the origins of two neighbouring slices along one axis.
pub fn stride(slice_size: u32, overlap_ratio: f64) -> u32 {
    slice_size - overlap_pixels(slice_size, overlap_ratio)
}

/// Computes the ordered slice rectangles covering an `image_w` x `image_h` image.
///
/// # Arguments
/// * `image_h`, `image_w` - Source image size in pixels
/// * `slice_h`, `slice_w` - Requested slice size in pixels
/// * `overlap_h`, `overlap_w` - Overlap ratios in `[0, 1)`
///
/// # Returns
/// Row-major slice rectangles. The result is deterministic and covers
/// `[0, image_w) x [0, image_h)`. When a slice dimension exceeds the image
/// dimension the slices on that axis shrink to the image size.
///
/// # Example
/// ```
/// use slicer_core::analysis::grid::plan;
/// use slicer_core::analysis::rect::SliceRect;
/// let slices = plan(1000, 1000, 500, 500, 0.0, 0.0).unwrap();
/// assert_eq!(slices[1], SliceRect::new(500, 0, 1000, 500));
/// ```
pub fn plan(
    image_h: u32,
    image_w: u32,
    slice_h: u32,
    slice_w: u32,
    overlap_h: f64,
    overlap_w: f64,
) -> Result<Vec<SliceRect>, SlicerError> {
    validate_slice_size("image height", image_h)?;
    validate_slice_size("image width", image_w)?;
    validate_slice_size("slice height", slice_h)?;
    validate_slice_size("slice width", slice_w)?;
    validate_overlap("height overlap ratio", overlap_h)?;
    validate_overlap("width overlap ratio", overlap_w)?;

    let y_overlap = overlap_pixels(slice_h, overlap_h);
    let x_overlap = overlap_pixels(slice_w, overlap_w);

    let mut slices = Vec::new();
    let mut y_min = 0u32;
    let mut y_max = 0u32;

    while y_max < image_h {
        y_max = y_min.saturating_add(slice_h);

        let mut x_min = 0u32;
        let mut x_max = 0u32;
        while x_max < image_w {
            x_max = x_min.saturating_add(slice_w);

            let rect = if y_max > image_h || x_max > image_w {
                pull_inward(x_max, y_max, image_w, image_h, slice_w, slice_h)
            } else {
                SliceRect::new(x_min, y_min, x_max, y_max)
            };
            slices.push(rect);

            // The naive right edge drives the scan even after a pull-inward,
            // which ends the row right after the border slice.
            x_min = x_max - x_overlap;
        }

        y_min = y_max - y_overlap;
    }

    Ok(slices)
}

/// Plans the slices of one image with the geometry of `config`.
pub fn plan_slices(
    image_width: u32,
    image_height: u32,
    config: &SliceConfig,
) -> Result<Vec<SliceRect>, SlicerError> {
    plan(
        image_height,
        image_width,
        config.slice_height,
        config.slice_width,
        config.overlap_height,
        config.overlap_width,
    )
}

/// Shifts a slice whose naive far edge crosses the image border back inside.
fn pull_inward(
    x_max: u32,
    y_max: u32,
    image_w: u32,
    image_h: u32,
    slice_w: u32,
    slice_h: u32,
) -> SliceRect {
    let xmax = image_w.min(x_max);
    let ymax = image_h.min(y_max);
    let xmin = xmax.saturating_sub(slice_w);
    let ymin = ymax.saturating_sub(slice_h);

    SliceRect::new(xmin, ymin, xmax, ymax)
}
