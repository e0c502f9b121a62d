//! Remapping of image-space annotations into slice-local YOLO boxes.

use glam::DVec2;

use crate::analysis::bbox::Bbox;
use crate::analysis::labels::{Annotation, ClippedAnnotation};
use crate::analysis::rect::SliceRect;

/// Whether the annotation box overlaps the slice with a positive area.
///
/// A box that only touches a slice border is treated as outside.
pub fn intersects(bbox: &Bbox, slice: &SliceRect) -> bool {
    bbox.intersects(&slice.to_bbox())
}

/// Clips the annotation box to the slice.
///
/// # Returns
/// The intersection in image coordinates, or `None` when [`intersects`] is
/// false. A returned box always has `min < max` on both axes.
pub fn clip(bbox: &Bbox, slice: &SliceRect) -> Option<Bbox> {
    bbox.clip(&slice.to_bbox())
}

/// Converts an image-space box inside `slice` to normalized center-form
/// relative to the slice.
///
/// # Returns
/// `(center, size)` where `x` and `width` are divided by the slice width and
/// `y` and `height` by the slice height.
pub fn to_slice_local(clipped: &Bbox, slice: &SliceRect) -> (DVec2, DVec2) {
    clipped
        .translate_to(slice.origin())
        .to_normalized_center(slice.frame())
}

/// Inverse of [`to_slice_local`]: back to absolute image-space corner-form.
pub fn from_slice_local(center: DVec2, size: DVec2, slice: &SliceRect) -> Bbox {
    let local = Bbox::from_normalized_center(center, size, slice.frame());
    local.translate_to(-slice.origin())
}

/// Clipped geometry of one (annotation, slice) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The clipped box in image coordinates
    pub bbox: Bbox,
    /// Area of the unclipped annotation in image pixels
    pub source_area: f64,
}

impl Intersection {
    /// Computes the intersection of an annotation with a slice.
    pub fn between(annotation: &Annotation, slice: &SliceRect) -> Option<Self> {
        clip(&annotation.bbox, slice).map(|bbox| Self {
            bbox,
            source_area: annotation.bbox.area(),
        })
    }

    pub fn area(&self) -> f64 {
        self.bbox.area()
    }

    /// Share of the original annotation that is visible in the slice.
    pub fn area_ratio(&self) -> f64 {
        if self.source_area > 0.0 {
            self.area() / self.source_area
        } else {
            0.0
        }
    }
}

/// Clips one annotation to `slice` and expresses it in the slice frame.
pub fn remap_annotation(annotation: &Annotation, slice: &SliceRect) -> Option<ClippedAnnotation> {
    let intersection = Intersection::between(annotation, slice)?;
    let (center, size) = to_slice_local(&intersection.bbox, slice);

    Some(ClippedAnnotation {
        class_id: annotation.class_id,
        center,
        size,
        intersection_area: intersection.area(),
        visible_ratio: intersection.area_ratio(),
    })
}

/// Remaps every annotation intersecting `slice`, keeping the input order.
///
/// No minimum-area filter is applied: any positive-area intersection, however
/// thin, is returned.
pub fn remap_annotations(annotations: &[Annotation], slice: &SliceRect) -> Vec<ClippedAnnotation> {
    annotations
        .iter()
        .filter_map(|annotation| remap_annotation(annotation, slice))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn bbox(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Bbox {
        Bbox::new(DVec2::new(xmin, ymin), DVec2::new(xmax, ymax))
    }

    #[test]
    fn test_annotation_inside_slice_is_unclipped() {
        let slice = SliceRect::new(0, 0, 500, 500);
        let annotation = Annotation::new(0, bbox(450.0, 450.0, 500.0, 500.0));

        let clipped = remap_annotation(&annotation, &slice).unwrap();
        assert_eq!(clipped.class_id, 0);
        assert_relative_eq!(clipped.center.x, 0.95);
        assert_relative_eq!(clipped.center.y, 0.95);
        assert_relative_eq!(clipped.size.x, 0.1);
        assert_relative_eq!(clipped.size.y, 0.1);
        assert_relative_eq!(clipped.visible_ratio, 1.0);
    }

    #[test]
    fn test_to_slice_local_uses_slice_frame() {
        let slice = SliceRect::new(600, 400, 1000, 800);
        let (center, size) = to_slice_local(&bbox(700.0, 500.0, 800.0, 700.0), &slice);
        assert_relative_eq!(center.x, 0.375);
        assert_relative_eq!(center.y, 0.5);
        assert_relative_eq!(size.x, 0.25);
        assert_relative_eq!(size.y, 0.5);
    }

    #[test]
    fn test_touching_annotation_is_dropped() {
        let slice = SliceRect::new(0, 0, 500, 500);
        let touching = Annotation::new(1, bbox(500.0, 100.0, 600.0, 200.0));
        assert!(!intersects(&touching.bbox, &slice));
        assert!(remap_annotation(&touching, &slice).is_none());
    }

    #[test]
    fn test_spanning_annotation_is_split() {
        let left = SliceRect::new(0, 0, 500, 500);
        let right = SliceRect::new(500, 0, 1000, 500);
        let annotation = Annotation::new(4, bbox(400.0, 100.0, 600.0, 300.0));

        let in_left = remap_annotation(&annotation, &left).unwrap();
        let in_right = remap_annotation(&annotation, &right).unwrap();

        assert_relative_eq!(in_left.intersection_area, 20000.0);
        assert_relative_eq!(in_right.intersection_area, 20000.0);
        assert_relative_eq!(in_left.visible_ratio, 0.5);
        assert_relative_eq!(in_left.center.x, 0.9);
        assert_relative_eq!(in_right.center.x, 0.1);
        assert_relative_eq!(in_right.size.x, 0.2);
    }

    #[test]
    fn test_thin_sliver_is_kept() {
        let slice = SliceRect::new(0, 0, 500, 500);
        let annotation = Annotation::new(0, bbox(499.9, 10.0, 700.0, 20.0));
        let clipped = remap_annotation(&annotation, &slice).unwrap();
        assert!(clipped.intersection_area > 0.0);
        assert!(clipped.intersection_area < 1.5);
    }

    #[test]
    fn test_remap_annotations_keeps_order() {
        let slice = SliceRect::new(0, 0, 100, 100);
        let annotations = [
            Annotation::new(2, bbox(10.0, 10.0, 20.0, 20.0)),
            Annotation::new(7, bbox(200.0, 200.0, 300.0, 300.0)),
            Annotation::new(5, bbox(90.0, 90.0, 120.0, 120.0)),
        ];
        let remapped = remap_annotations(&annotations, &slice);
        let classes: Vec<usize> = remapped.iter().map(|a| a.class_id).collect();
        assert_eq!(classes, vec![2, 5]);
    }

    #[test]
    fn test_zero_size_annotation_is_dropped() {
        let slice = SliceRect::new(0, 0, 500, 500);
        let zero_width = Annotation::new(0, bbox(250.0, 200.0, 250.0, 300.0));

        assert!(!intersects(&zero_width.bbox, &slice));
        assert!(clip(&zero_width.bbox, &slice).is_none());
        assert!(remap_annotation(&zero_width, &slice).is_none());
    }

    #[test]
    fn test_zero_area_source_has_zero_ratio() {
        let intersection = Intersection {
            bbox: bbox(0.0, 0.0, 1.0, 1.0),
            source_area: 0.0,
        };
        assert_eq!(intersection.area_ratio(), 0.0);
    }

    fn slice_strategy() -> impl Strategy<Value = SliceRect> {
        (0u32..500, 0u32..500, 1u32..300, 1u32..300)
            .prop_map(|(x, y, w, h)| SliceRect::new(x, y, x + w, y + h))
    }

    fn bbox_strategy() -> impl Strategy<Value = Bbox> {
        (0.0f64..800.0, 0.0f64..800.0, 0.0f64..300.0, 0.0f64..300.0)
            .prop_map(|(x, y, w, h)| Bbox::new_from_min_size(DVec2::new(x, y), DVec2::new(w, h)))
    }

    proptest! {
        #[test]
        fn prop_clip_is_contained_with_positive_area(
            slice in slice_strategy(),
            annotation in bbox_strategy(),
        ) {
            if let Some(clipped) = clip(&annotation, &slice) {
                prop_assert!(intersects(&annotation, &slice));
                prop_assert!(clipped.area() > 0.0);
                prop_assert!(annotation.contains(&clipped));
                prop_assert!(slice.to_bbox().contains(&clipped));
            } else {
                prop_assert!(!intersects(&annotation, &slice));
            }
        }

        #[test]
        fn prop_slice_local_round_trip(
            slice in slice_strategy(),
            annotation in bbox_strategy(),
        ) {
            if let Some(clipped) = clip(&annotation, &slice) {
                let (center, size) = to_slice_local(&clipped, &slice);
                let back = from_slice_local(center, size, &slice);

                prop_assert!((back.min - clipped.min).abs().max_element() < 1e-6);
                prop_assert!((back.max - clipped.max).abs().max_element() < 1e-6);
                prop_assert!(center.min_element() >= 0.0 && center.max_element() <= 1.0);
                prop_assert!(size.max_element() <= 1.0 + 1e-12);
            }
        }

        #[test]
        fn prop_shared_edge_never_intersects(
            slice in slice_strategy(),
            extent in 0.01f64..200.0,
            offset in -100.0f64..100.0,
        ) {
            let rect = slice.to_bbox();
            let right = Bbox::new(
                DVec2::new(rect.max.x, rect.min.y + offset),
                DVec2::new(rect.max.x + extent, rect.max.y + offset),
            );
            let above = Bbox::new(
                DVec2::new(rect.min.x + offset, rect.min.y - extent),
                DVec2::new(rect.max.x + offset, rect.min.y),
            );
            prop_assert!(!intersects(&right, &slice));
            prop_assert!(!intersects(&above, &slice));
        }
    }
}
