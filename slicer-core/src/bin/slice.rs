use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use slicer_core::batch::{BatchReport, SliceRunner};
use slicer_core::consts::*;
use slicer_core::{BatchConfig, BatchConfigBuilder, SliceConfig};

/// Slices a YOLO object detection dataset into overlapping tiles.
#[derive(Parser)]
#[command(name = "slice")]
#[command(about = "Slice a YOLO dataset into fixed-size tiles with remapped labels")]
struct Args {
    #[arg(long = "folder-in", alias = "folder_in", help = "Folder with images and YOLO label files")]
    folder_in: PathBuf,

    #[arg(long = "folder-out", alias = "folder_out", help = "Folder where slices and labels are saved")]
    folder_out: PathBuf,

    #[arg(long = "w", default_value_t = DEFAULT_SLICE_SIZE, help = "Slice width in pixels")]
    width: u32,

    #[arg(long = "h", default_value_t = DEFAULT_SLICE_SIZE, help = "Slice height in pixels")]
    height: u32,

    #[arg(
        long = "w-o",
        alias = "w_o",
        default_value_t = DEFAULT_OVERLAP_RATIO,
        help = "Width overlap ratio in [0, 1)"
    )]
    width_overlap: f64,

    #[arg(
        long = "h-o",
        alias = "h_o",
        default_value_t = DEFAULT_OVERLAP_RATIO,
        help = "Height overlap ratio in [0, 1)"
    )]
    height_overlap: f64,

    #[arg(short, long, help = "Worker threads (defaults to the number of CPUs)")]
    threads: Option<usize>,

    #[arg(long = "ext", help = "Eligible image extension, repeatable (defaults to common formats)")]
    extensions: Vec<String>,

    #[arg(long, help = "Write manifest.json describing every slice")]
    manifest: bool,

    #[arg(long, help = "Write grid preview images into <folder-out>/preview")]
    preview: bool,
}

/// Builds and checks the batch configuration before any image is touched.
fn batch_config(args: Args) -> Result<BatchConfig> {
    if !args.folder_in.is_dir() {
        error!("Input folder not found: {}", args.folder_in.display());
        bail!("Input folder not found: {}", args.folder_in.display());
    }
    if same_folder(&args.folder_in, &args.folder_out) {
        warn!("Output folder equals input folder, slices will be picked up by later runs");
    }

    let slice = SliceConfig {
        slice_width: args.width,
        slice_height: args.height,
        overlap_width: args.width_overlap,
        overlap_height: args.height_overlap,
    };

    let mut builder = BatchConfigBuilder::default();
    builder
        .input_dir(args.folder_in)
        .output_dir(args.folder_out)
        .slice(slice)
        .threads(args.threads)
        .write_manifest(args.manifest)
        .write_preview(args.preview);
    if !args.extensions.is_empty() {
        let extensions: Vec<String> = args
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        builder.extensions(extensions);
    }

    let config = builder.build().context("incomplete batch configuration")?;
    config.validate()?;
    Ok(config)
}

fn same_folder(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn print_summary(config: &BatchConfig, report: &BatchReport) {
    println!("\n=== Slicing Summary ===");
    println!("Input folder: {}", config.input_dir.display());
    println!("Output folder: {}", config.output_dir.display());
    println!(
        "Slice size: {}x{} (overlap {} x {})",
        config.slice.slice_width,
        config.slice.slice_height,
        config.slice.overlap_width,
        config.slice.overlap_height
    );
    println!("Images sliced: {}", report.images.len());
    println!("Slices written: {}", report.slice_count());
    println!("Images without labels: {}", report.unlabeled_count());
    println!("Elapsed: {}ms", report.elapsed.as_millis());

    if !report.failures.is_empty() {
        println!("\nFailed images:");
        for failure in &report.failures {
            println!("  - {}: {}", failure.source.display(), failure.error);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Starting dataset slicing");
    info!("Input folder: {}", args.folder_in.display());
    info!("Output folder: {}", args.folder_out.display());

    let config = batch_config(args)?;
    let runner = SliceRunner::new(config)?;
    let report = runner.run()?;

    print_summary(runner.config(), &report);
    if report.failures.is_empty() {
        info!("Slicing completed successfully!");
    } else {
        warn!("{} images could not be sliced", report.failures.len());
    }
    Ok(())
}
