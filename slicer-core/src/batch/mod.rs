pub mod manifest;
pub mod preview;
pub mod runner;
pub mod source;
pub mod writer;

pub use runner::{BatchReport, SliceRunner};
