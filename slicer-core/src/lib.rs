pub mod analysis;
pub mod batch;
pub mod config;
pub mod consts;
pub mod error;
pub mod layout;

// Re-export commonly used types
pub use analysis::{
    bbox::Bbox,
    grid::plan,
    labels::{Annotation, ClippedAnnotation},
    rect::SliceRect,
};
pub use config::{BatchConfig, BatchConfigBuilder, SliceConfig, SliceConfigBuilder};
pub use error::SlicerError;
pub use layout::{plan::SlicePlan, slice::Slice};
