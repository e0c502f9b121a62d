use std::fmt;
use std::path::Path;

use glam::DVec2;
use serde::Serialize;

use crate::analysis::bbox::Bbox;
use crate::consts::LABEL_FIELDS;
use crate::error::SlicerError;

/// One row of a YOLO label file: a class id and a box in normalized
/// center-form relative to the full image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRow {
    pub class_id: usize,
    pub center: DVec2,
    pub size: DVec2,
}

impl LabelRow {
    /// Converts the normalized row into an absolute image-space annotation.
    pub fn to_annotation(&self, image_size: DVec2) -> Annotation {
        Annotation {
            class_id: self.class_id,
            bbox: Bbox::from_normalized_center(self.center, self.size, image_size),
        }
    }
}

/// Ground-truth box in absolute corner-form image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Annotation {
    pub class_id: usize,
    pub bbox: Bbox,
}

impl Annotation {
    pub fn new(class_id: usize, bbox: Bbox) -> Self {
        Self { class_id, bbox }
    }
}

/// The part of an annotation that falls inside one slice.
///
/// `center` and `size` are normalized to the slice's width and height. The
/// intersection area is kept alongside so a minimum-area policy can be
/// layered on top of the remapper without changing how boxes are clipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClippedAnnotation {
    pub class_id: usize,
    pub center: DVec2,
    pub size: DVec2,
    /// Area of the clipped box in source pixels
    pub intersection_area: f64,
    /// Clipped area divided by the original annotation's area
    pub visible_ratio: f64,
}

impl fmt::Display for ClippedAnnotation {
    /// Formats as a YOLO detection row: `class_id x y w h`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.class_id, self.center.x, self.center.y, self.size.x, self.size.y
        )
    }
}

/// Parses the content of a YOLO label file.
///
/// Blank lines are skipped. Every other line must hold exactly
/// `class_id center_x center_y width height` with a non-negative integer
/// class id and finite coordinates; sizes must not be negative.
///
/// # Arguments
/// * `content` - The label file content
/// * `path` - Path of the file, only used in error messages
pub fn parse_labels(content: &str, path: &Path) -> Result<Vec<LabelRow>, SlicerError> {
    let mut rows = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        if let Some(row) = parse_label_line(line, path, line_idx + 1)? {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn parse_label_line(
    line: &str,
    path: &Path,
    line_num: usize,
) -> Result<Option<LabelRow>, SlicerError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let malformed = |message: String| SlicerError::MalformedAnnotations {
        path: path.to_path_buf(),
        line: line_num,
        message,
    };

    // At most one extra token is enough to tell the row is too long
    let tokens: Vec<&str> = trimmed.split_whitespace().take(LABEL_FIELDS + 1).collect();
    if tokens.len() != LABEL_FIELDS {
        return Err(malformed(format!(
            "expected {} fields, found {}{}",
            LABEL_FIELDS,
            tokens.len(),
            if tokens.len() > LABEL_FIELDS { "+" } else { "" }
        )));
    }

    let class_id = tokens[0].parse::<usize>().map_err(|_| {
        malformed(format!(
            "invalid class id `{}`, expected a non-negative integer",
            tokens[0]
        ))
    })?;

    let mut values = [0.0f64; LABEL_FIELDS - 1];
    let names = ["center_x", "center_y", "width", "height"];
    for (value, (token, name)) in values.iter_mut().zip(tokens[1..].iter().zip(names)) {
        *value = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| malformed(format!("invalid {name} `{token}`")))?;
    }

    let [cx, cy, w, h] = values;
    if w < 0.0 || h < 0.0 {
        return Err(malformed(format!("negative box size {w}x{h}")));
    }

    Ok(Some(LabelRow {
        class_id,
        center: DVec2::new(cx, cy),
        size: DVec2::new(w, h),
    }))
}
