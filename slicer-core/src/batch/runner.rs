use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use glam::DVec2;
use image::GenericImageView;
use rayon::prelude::*;
use snafu::ResultExt;
use tracing::*;

use crate::analysis::rect::SliceRect;
use crate::batch::manifest::{FailureRecord, ImageRecord, Manifest};
use crate::batch::preview::write_preview;
use crate::batch::source::{ImageSource, discover_images};
use crate::batch::writer::{SliceRecord, SliceWriter};
use crate::config::BatchConfig;
use crate::error::{SlicerError, ThreadPoolSnafu};
use crate::layout::plan::SlicePlan;

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub images: Vec<ImageRecord>,
    pub failures: Vec<FailureRecord>,
    /// Images not started because the run was cancelled
    pub cancelled: usize,
    pub manifest: Option<PathBuf>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn slice_count(&self) -> usize {
        self.images.iter().map(|image| image.slices.len()).sum()
    }

    /// Images sliced without a label file.
    pub fn unlabeled_count(&self) -> usize {
        self.images.iter().filter(|image| !image.labeled).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled == 0
    }
}

enum Outcome {
    Done(ImageRecord),
    Failed(FailureRecord),
    Cancelled,
}

/// Slices every eligible image of the input folder into the output folder.
///
/// Images are independent: they are processed in parallel and a failure in
/// one image is recorded in the report without stopping the others.
pub struct SliceRunner {
    config: BatchConfig,
    writer: SliceWriter,
    cancel: Arc<AtomicBool>,
}

impl SliceRunner {
    /// Validates the configuration and prepares the output folder.
    pub fn new(config: BatchConfig) -> Result<Self, SlicerError> {
        config.validate()?;
        let writer = SliceWriter::new(&config.output_dir)?;

        Ok(Self {
            config,
            writer,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Flag that stops the run before the next image starts once set.
    ///
    /// Images already in progress are finished; their outputs are complete.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    #[tracing::instrument(skip_all, fields(input = %self.config.input_dir.display()))]
    pub fn run(&self) -> Result<BatchReport, SlicerError> {
        let start_time = Instant::now();

        let sources = discover_images(&self.config.input_dir, &self.config.extensions)?;
        info!(
            "Found {} images in {}",
            sources.len(),
            self.config.input_dir.display()
        );
        if sources.is_empty() {
            warn!("No eligible images found, nothing to slice");
        }

        let outcomes = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .context(ThreadPoolSnafu)?;
                pool.install(|| self.process_sources(&sources))
            }
            None => self.process_sources(&sources),
        };

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Done(record) => report.images.push(record),
                Outcome::Failed(failure) => report.failures.push(failure),
                Outcome::Cancelled => report.cancelled += 1,
            }
        }

        if self.config.write_manifest {
            let manifest = Manifest {
                config: &self.config.slice,
                images: &report.images,
                failures: &report.failures,
            };
            let path = manifest.write(self.writer.output_dir())?;
            info!("Manifest written to {}", path.display());
            report.manifest = Some(path);
        }

        report.elapsed = start_time.elapsed();
        info!(
            "Batch finished in {}ms: {} images sliced into {} slices, {} failed, {} without labels, {} cancelled",
            report.elapsed.as_millis(),
            report.images.len(),
            report.slice_count(),
            report.failures.len(),
            report.unlabeled_count(),
            report.cancelled
        );

        Ok(report)
    }

    fn process_sources(&self, sources: &[ImageSource]) -> Vec<Outcome> {
        sources
            .par_iter()
            .map(|source| {
                if self.cancel.load(Ordering::Relaxed) {
                    return Outcome::Cancelled;
                }

                match self.process_image(source) {
                    Ok(record) => Outcome::Done(record),
                    Err(err) => {
                        error!("Failed to slice {}: {}", source.image_path.display(), err);
                        Outcome::Failed(FailureRecord {
                            source: source.image_path.clone(),
                            error: err.to_string(),
                        })
                    }
                }
            })
            .collect()
    }

    /// Slices one image and writes all of its outputs.
    #[tracing::instrument(skip_all, fields(image = %source.image_path.display()))]
    pub fn process_image(&self, source: &ImageSource) -> Result<ImageRecord, SlicerError> {
        let image = source.load_image()?;
        let (width, height) = image.dimensions();
        debug!("Decoded image {}x{}", width, height);

        let image_size = DVec2::new(width as f64, height as f64);
        let (annotations, labeled) = match source.load_annotations(image_size) {
            Ok(annotations) => (annotations, true),
            Err(err) if err.is_recoverable() => {
                warn!("{}, slicing without annotations", err);
                (Vec::new(), false)
            }
            Err(err) => return Err(err),
        };

        let plan = SlicePlan::build(width, height, &annotations, &self.config.slice)?;
        debug!(
            "Planned {} slices, {} annotation rows",
            plan.slices.len(),
            plan.annotation_count()
        );

        let slices = plan
            .slices
            .par_iter()
            .map(|slice| {
                self.writer
                    .write(&image, &source.stem, &source.extension, slice)
            })
            .collect::<Result<Vec<SliceRecord>, SlicerError>>()?;

        if self.config.write_preview {
            let rects: Vec<SliceRect> = plan.slices.iter().map(|slice| slice.rect).collect();
            let path = write_preview(self.writer.output_dir(), &source.stem, &image, &rects)?;
            debug!("Preview written to {}", path.display());
        }

        info!(
            "Sliced into {} slices ({} empty)",
            slices.len(),
            plan.empty_slice_count()
        );

        Ok(ImageRecord {
            source: source.image_path.clone(),
            width,
            height,
            labeled,
            annotations: annotations.len(),
            slices,
        })
    }
}
