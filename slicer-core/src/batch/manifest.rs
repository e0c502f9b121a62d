use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use snafu::ResultExt;

use crate::batch::writer::SliceRecord;
use crate::config::SliceConfig;
use crate::consts::MANIFEST_FILE_NAME;
use crate::error::{IoWriteSnafu, ManifestSnafu, SlicerError};

/// Outcome of slicing one source image.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    /// False when the label file was absent and the image was sliced without annotations
    pub labeled: bool,
    pub annotations: usize,
    pub slices: Vec<SliceRecord>,
}

/// Description of a whole batch, written as `manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest<'a> {
    pub config: &'a SliceConfig,
    pub images: &'a [ImageRecord],
    pub failures: &'a [FailureRecord],
}

/// An image that could not be sliced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailureRecord {
    pub source: PathBuf,
    pub error: String,
}

impl Manifest<'_> {
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf, SlicerError> {
        let path = output_dir.join(MANIFEST_FILE_NAME);
        let file = File::create(&path).context(IoWriteSnafu { path: path.clone() })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .context(ManifestSnafu { path: path.clone() })?;
        writer.flush().context(IoWriteSnafu { path: path.clone() })?;

        Ok(path)
    }
}
