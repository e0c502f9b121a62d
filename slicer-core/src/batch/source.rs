use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use glam::DVec2;
use image::DynamicImage;
use snafu::ResultExt;

use crate::analysis::labels::{Annotation, parse_labels};
use crate::consts::LABEL_EXTENSION;
use crate::error::{ImageDecodeSnafu, IoReadSnafu, SlicerError};

/// A source image and the label file expected next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    /// File name without extension, used as prefix of every slice name
    pub stem: String,
    /// Original extension, reused for the slice images
    pub extension: String,
}

impl ImageSource {
    /// Builds the source for `image_path`, or `None` if the path has no
    /// usable stem or extension.
    pub fn from_image_path(image_path: &Path) -> Option<Self> {
        let stem = image_path.file_stem()?.to_str()?.to_string();
        let extension = image_path.extension()?.to_str()?.to_string();

        Some(Self {
            image_path: image_path.to_path_buf(),
            label_path: image_path.with_extension(LABEL_EXTENSION),
            stem,
            extension,
        })
    }

    pub fn load_image(&self) -> Result<DynamicImage, SlicerError> {
        image::open(&self.image_path).context(ImageDecodeSnafu {
            path: self.image_path.clone(),
        })
    }

    /// Reads the label file and converts its rows to image-space annotations.
    ///
    /// # Returns
    /// `MissingAnnotations` when the label file does not exist; callers treat
    /// that as an image without annotations. Undecodable content is
    /// `MalformedAnnotations`.
    pub fn load_annotations(&self, image_size: DVec2) -> Result<Vec<Annotation>, SlicerError> {
        let bytes = match fs::read(&self.label_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SlicerError::MissingAnnotations {
                    path: self.label_path.clone(),
                });
            }
            Err(err) => {
                return Err(err).context(IoReadSnafu {
                    path: self.label_path.clone(),
                });
            }
        };

        let content = String::from_utf8(bytes).map_err(|err| {
            let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
            SlicerError::MalformedAnnotations {
                path: self.label_path.clone(),
                line: valid.iter().filter(|&&byte| byte == b'\n').count() + 1,
                message: "label file is not valid UTF-8".to_string(),
            }
        })?;

        let annotations = parse_labels(&content, &self.label_path)?
            .iter()
            .map(|row| row.to_annotation(image_size))
            .collect();

        Ok(annotations)
    }
}

/// Lists the eligible images directly inside `input_dir`, sorted by path.
///
/// Sub folders are not traversed. Extensions are compared case insensitively
/// against `extensions`.
pub fn discover_images(
    input_dir: &Path,
    extensions: &[String],
) -> Result<Vec<ImageSource>, SlicerError> {
    let entries = fs::read_dir(input_dir).context(IoReadSnafu {
        path: input_dir.to_path_buf(),
    })?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.context(IoReadSnafu {
            path: input_dir.to_path_buf(),
        })?;
        let path = entry.path();

        if !path.is_file() || !has_extension(&path, extensions) {
            continue;
        }
        if let Some(source) = ImageSource::from_image_path(&path) {
            sources.push(source);
        }
    }

    sources.sort_by(|a, b| a.image_path.cmp(&b.image_path));
    Ok(sources)
}

fn has_extension(path: &Path, allowed: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}
