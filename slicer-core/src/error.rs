use std::path::PathBuf;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SlicerError {
    #[snafu(display("Invalid slice configuration: {}", message))]
    InvalidConfiguration { message: String },
    #[snafu(display("Annotation file `{}` not found", path.display()))]
    MissingAnnotations { path: PathBuf },
    #[snafu(display(
        "Malformed annotation in `{}` line {}: {}",
        path.display(),
        line,
        message
    ))]
    MalformedAnnotations {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[snafu(display("Decode image `{}` error: {}", path.display(), source))]
    ImageDecode {
        source: image::ImageError,
        path: PathBuf,
    },
    #[snafu(display("Image Write `{}` error: {}", path.display(), source))]
    ImageWrite {
        source: image::ImageError,
        path: PathBuf,
    },
    #[snafu(display("Read `{}` error: {}", path.display(), source))]
    IoRead {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Write `{}` error: {}", path.display(), source))]
    IoWrite {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Serialize manifest `{}` error: {}", path.display(), source))]
    Manifest {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[snafu(display("Build thread pool error: {}", source))]
    ThreadPool {
        source: rayon::ThreadPoolBuildError,
    },
}

impl SlicerError {
    /// Whether the error only degrades the image it belongs to instead of
    /// preventing it from being sliced.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SlicerError::MissingAnnotations { .. })
    }
}
