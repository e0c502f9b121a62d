use std::path::PathBuf;

use derive_builder::Builder;
use serde::Serialize;

use crate::consts::*;
use crate::error::SlicerError;

/// Slice geometry shared by every image of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize)]
#[builder(default)]
pub struct SliceConfig {
    /// Slice width in pixels
    pub slice_width: u32,
    /// Slice height in pixels
    pub slice_height: u32,
    /// Fraction of the slice width shared by horizontally adjacent slices, in `[0, 1)`
    pub overlap_width: f64,
    /// Fraction of the slice height shared by vertically adjacent slices, in `[0, 1)`
    pub overlap_height: f64,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            slice_width: DEFAULT_SLICE_SIZE,
            slice_height: DEFAULT_SLICE_SIZE,
            overlap_width: DEFAULT_OVERLAP_RATIO,
            overlap_height: DEFAULT_OVERLAP_RATIO,
        }
    }
}

impl SliceConfig {
    /// Rejects zero slice sizes and overlap ratios outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), SlicerError> {
        validate_slice_size("slice width", self.slice_width)?;
        validate_slice_size("slice height", self.slice_height)?;
        validate_overlap("width overlap ratio", self.overlap_width)?;
        validate_overlap("height overlap ratio", self.overlap_height)?;
        Ok(())
    }
}

pub(crate) fn validate_slice_size(name: &str, value: u32) -> Result<(), SlicerError> {
    if value == 0 {
        return Err(SlicerError::InvalidConfiguration {
            message: format!("{name} must be positive"),
        });
    }
    Ok(())
}

pub(crate) fn validate_overlap(name: &str, ratio: f64) -> Result<(), SlicerError> {
    // NaN fails the range check as well
    if !(0.0..1.0).contains(&ratio) {
        return Err(SlicerError::InvalidConfiguration {
            message: format!("{name} must be in [0, 1), got {ratio}"),
        });
    }
    Ok(())
}

/// Configuration of a folder-to-folder slicing run.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct BatchConfig {
    /// Folder holding the source images and their label files
    pub input_dir: PathBuf,
    /// Folder receiving slice images and label files, created if absent
    pub output_dir: PathBuf,
    #[builder(default)]
    pub slice: SliceConfig,
    /// Lowercase image extensions eligible for slicing
    #[builder(default = "IMAGE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()")]
    pub extensions: Vec<String>,
    /// Worker threads; `None` uses the global rayon pool
    #[builder(default)]
    pub threads: Option<usize>,
    /// Write `manifest.json` describing every slice
    #[builder(default)]
    pub write_manifest: bool,
    /// Write the source image with the slice grid drawn on it
    #[builder(default)]
    pub write_preview: bool,
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), SlicerError> {
        self.slice.validate()?;
        if self.extensions.is_empty() {
            return Err(SlicerError::InvalidConfiguration {
                message: "at least one image extension is required".to_string(),
            });
        }
        if self.threads == Some(0) {
            return Err(SlicerError::InvalidConfiguration {
                message: "thread count must be positive".to_string(),
            });
        }
        Ok(())
    }
}
