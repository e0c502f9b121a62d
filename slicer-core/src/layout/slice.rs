use serde::Serialize;

use crate::analysis::labels::ClippedAnnotation;
use crate::analysis::rect::SliceRect;

/// One slice of a source image together with the annotations remapped into it.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Slice {
    pub rect: SliceRect,
    pub annotations: Vec<ClippedAnnotation>,
}

impl Slice {
    /// File stem of the slice outputs: `{source_stem}_{xmin}_{ymin}_{xmax}_{ymax}`.
    pub fn file_stem(&self, source_stem: &str) -> String {
        format!("{}_{}", source_stem, self.rect)
    }

    /// Content of the slice label file, one newline-terminated YOLO row per
    /// annotation. Empty when the slice has no annotations.
    pub fn label_content(&self) -> String {
        self.annotations
            .iter()
            .map(|annotation| format!("{annotation}\n"))
            .collect()
    }
}
