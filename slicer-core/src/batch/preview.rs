use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use snafu::ResultExt;

use crate::analysis::rect::SliceRect;
use crate::consts::*;
use crate::error::{ImageWriteSnafu, IoWriteSnafu, SlicerError};

/// Draws the slice grid on a copy of the source image.
///
/// Every slice gets a thick hollow rectangle; colors cycle so neighbouring,
/// overlapping slices stay distinguishable. Lines are drawn inward from the
/// slice border so border slices remain fully visible.
pub fn draw_grid(image: &DynamicImage, slices: &[SliceRect]) -> RgbImage {
    let mut output_img = image.to_rgb8();

    for (idx, rect) in slices.iter().enumerate() {
        let color = Rgb(PREVIEW_COLORS[idx % PREVIEW_COLORS.len()]);

        for offset in 0..PREVIEW_LINE_WIDTH {
            let width = rect.width() as i32 - offset * 2;
            let height = rect.height() as i32 - offset * 2;
            if width <= 0 || height <= 0 {
                break;
            }

            let thick_rect = Rect::at(rect.xmin as i32 + offset, rect.ymin as i32 + offset)
                .of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut output_img, thick_rect, color);
        }
    }

    output_img
}

/// Saves the grid preview as `{output_dir}/preview/{stem}_grid.png`.
pub fn write_preview(
    output_dir: &Path,
    stem: &str,
    image: &DynamicImage,
    slices: &[SliceRect],
) -> Result<PathBuf, SlicerError> {
    let preview_dir = output_dir.join(PREVIEW_DIR_NAME);
    fs::create_dir_all(&preview_dir).context(IoWriteSnafu {
        path: preview_dir.clone(),
    })?;

    let path = preview_dir.join(format!("{stem}_grid.png"));
    draw_grid(image, slices)
        .save(&path)
        .context(ImageWriteSnafu { path: path.clone() })?;

    Ok(path)
}
