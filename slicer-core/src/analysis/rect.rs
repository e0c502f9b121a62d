use std::fmt;

use glam::DVec2;
use serde::Serialize;

use crate::analysis::bbox::Bbox;

/// Integer pixel rectangle of a slice in the source image's coordinate space.
///
/// Slice identity equals its rectangle; the four coordinates also end up in
/// the slice's file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SliceRect {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl SliceRect {
    pub const fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub const fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    pub const fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Top-left corner in image space.
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.xmin as f64, self.ymin as f64)
    }

    /// Width and height as a frame for normalizing slice-local coordinates.
    pub fn frame(&self) -> DVec2 {
        DVec2::new(self.width() as f64, self.height() as f64)
    }

    /// The same rectangle as a floating point box in image space.
    pub fn to_bbox(&self) -> Bbox {
        Bbox::new(
            self.origin(),
            DVec2::new(self.xmax as f64, self.ymax as f64),
        )
    }
}

impl fmt::Display for SliceRect {
    /// Formats as `xmin_ymin_xmax_ymax`, the suffix used in slice file names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}_{}", self.xmin, self.ymin, self.xmax, self.ymax)
    }
}
