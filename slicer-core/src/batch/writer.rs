use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Serialize;
use snafu::ResultExt;

use crate::consts::LABEL_EXTENSION;
use crate::error::{ImageWriteSnafu, IoWriteSnafu, SlicerError};
use crate::layout::slice::Slice;

/// Paths and summary of one written slice.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SliceRecord {
    pub image: PathBuf,
    pub label: PathBuf,
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
    pub annotations: usize,
}

/// Writes slice images and label files into one output folder.
#[derive(Debug, Clone)]
pub struct SliceWriter {
    output_dir: PathBuf,
}

impl SliceWriter {
    /// Creates the writer, creating `output_dir` if needed.
    pub fn new(output_dir: &Path) -> Result<Self, SlicerError> {
        fs::create_dir_all(output_dir).context(IoWriteSnafu {
            path: output_dir.to_path_buf(),
        })?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Crops `slice` out of `image` and saves it with its label file.
    ///
    /// Existing files with the same name are overwritten, so an interrupted
    /// run can simply be repeated.
    pub fn write(
        &self,
        image: &DynamicImage,
        source_stem: &str,
        extension: &str,
        slice: &Slice,
    ) -> Result<SliceRecord, SlicerError> {
        let stem = slice.file_stem(source_stem);
        let image_path = self.output_dir.join(format!("{stem}.{extension}"));
        let label_path = self.output_dir.join(format!("{stem}.{LABEL_EXTENSION}"));

        let rect = slice.rect;
        image
            .crop_imm(rect.xmin, rect.ymin, rect.width(), rect.height())
            .save(&image_path)
            .context(ImageWriteSnafu {
                path: image_path.clone(),
            })?;

        fs::write(&label_path, slice.label_content()).context(IoWriteSnafu {
            path: label_path.clone(),
        })?;

        Ok(SliceRecord {
            image: image_path,
            label: label_path,
            xmin: rect.xmin,
            ymin: rect.ymin,
            xmax: rect.xmax,
            ymax: rect.ymax,
            annotations: slice.annotations.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use image::{GenericImageView, Rgb, RgbImage};

    use super::*;
    use crate::analysis::labels::ClippedAnnotation;
    use crate::analysis::rect::SliceRect;

    #[test]
    fn test_write_slice() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let out = temp.path().join("out");
        let writer = SliceWriter::new(&out).unwrap();
        assert!(out.is_dir());

        let mut pixels = RgbImage::new(40, 20);
        pixels.put_pixel(30, 10, Rgb([255, 0, 0]));
        let image = DynamicImage::ImageRgb8(pixels);

        let slice = Slice {
            rect: SliceRect::new(20, 0, 40, 20),
            annotations: vec![ClippedAnnotation {
                class_id: 0,
                center: DVec2::new(0.5, 0.5),
                size: DVec2::new(0.5, 0.5),
                intersection_area: 100.0,
                visible_ratio: 1.0,
            }],
        };

        let record = writer.write(&image, "img", "png", &slice).unwrap();
        assert_eq!(record.image, out.join("img_20_0_40_20.png"));
        assert_eq!(record.label, out.join("img_20_0_40_20.txt"));
        assert_eq!(record.annotations, 1);

        let saved = image::open(&record.image).unwrap();
        assert_eq!(saved.dimensions(), (20, 20));
        assert_eq!(saved.to_rgb8().get_pixel(10, 10), &Rgb([255, 0, 0]));
        assert_eq!(
            fs::read_to_string(&record.label).unwrap(),
            "0 0.5 0.5 0.5 0.5\n"
        );
    }
}
