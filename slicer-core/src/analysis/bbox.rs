use glam::DVec2;
use serde::Serialize;

/// A 2D axis-aligned bounding box represented by minimum and maximum points.
///
/// Coordinates follow the image convention: the origin is the top-left corner
/// and y grows downward, so `min` is the top-left and `max` the bottom-right
/// corner. The box is stored in corner-form; center-form conversions are
/// explicit and always take the frame they are relative to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bbox {
    /// The minimum point of the bounding box (top-left corner).
    pub min: DVec2,
    /// The maximum point of the bounding box (bottom-right corner).
    pub max: DVec2,
}

impl Bbox {
    /// Creates a new bounding box from minimum and maximum points.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 5.0));
    /// ```
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from a minimum point and size vector.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new_from_min_size(DVec2::new(1.0, 2.0), DVec2::new(5.0, 3.0));
    /// assert_eq!(bbox.max, DVec2::new(6.0, 5.0));
    /// ```
    pub fn new_from_min_size(min: DVec2, size: DVec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Creates a new bounding box from a center point and size vector.
    ///
    /// This is the corner-form view of a YOLO style `(center_x, center_y,
    /// width, height)` box expressed in absolute units.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_center_size(DVec2::new(100.0, 200.0), DVec2::new(50.0, 80.0));
    /// assert_eq!(bbox.min, DVec2::new(75.0, 160.0));
    /// assert_eq!(bbox.max, DVec2::new(125.0, 240.0));
    /// ```
    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        let half_size = size / 2.0;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Converts a normalized center-form box into an absolute corner-form box.
    ///
    /// `center` and `size` are fractions of `frame` (the width and height of
    /// the image or slice the box is relative to).
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let frame = DVec2::new(1000.0, 500.0);
    /// let bbox = Bbox::from_normalized_center(DVec2::new(0.5, 0.5), DVec2::new(0.1, 0.2), frame);
    /// assert_eq!(bbox.min, DVec2::new(450.0, 200.0));
    /// assert_eq!(bbox.max, DVec2::new(550.0, 300.0));
    /// ```
    pub fn from_normalized_center(center: DVec2, size: DVec2, frame: DVec2) -> Self {
        Self::from_center_size(center * frame, size * frame)
    }

    /// Converts this absolute corner-form box into normalized center-form.
    ///
    /// # Returns
    /// `(center, size)`, both divided by `frame`.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(DVec2::new(450.0, 200.0), DVec2::new(550.0, 300.0));
    /// let (center, size) = bbox.to_normalized_center(DVec2::new(1000.0, 500.0));
    /// assert_eq!(center, DVec2::new(0.5, 0.5));
    /// assert_eq!(size, DVec2::new(0.1, 0.2));
    /// ```
    pub fn to_normalized_center(&self, frame: DVec2) -> (DVec2, DVec2) {
        (self.center() / frame, self.size() / frame)
    }

    /// Width and height of the box.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    /// Calculates the area of the bounding box.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new_from_min_size(DVec2::ZERO, DVec2::new(4.0, 3.0));
    /// assert_eq!(bbox.area(), 12.0);
    /// ```
    pub fn area(&self) -> f64 {
        let length = self.size();

        length.x * length.y
    }

    /// Calculates the center point of the bounding box.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 2.0));
    /// assert_eq!(bbox.center(), DVec2::new(2.0, 1.0));
    /// ```
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// Moves the box so that `origin` becomes `(0, 0)`.
    pub fn translate_to(&self, origin: DVec2) -> Self {
        Self {
            min: self.min - origin,
            max: self.max - origin,
        }
    }

    /// Checks whether the interiors of two boxes overlap.
    ///
    /// Boxes that only share an edge or a corner do not intersect, and neither
    /// does a box with zero width or height: the overlap must have positive area.
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let left = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(5.0, 5.0));
    /// let right = Bbox::new(DVec2::new(5.0, 0.0), DVec2::new(10.0, 5.0));
    /// let middle = Bbox::new(DVec2::new(4.0, 1.0), DVec2::new(6.0, 2.0));
    /// assert!(!left.intersects(&right));
    /// assert!(left.intersects(&middle));
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        self.clip(other).is_some()
    }

    /// Returns the intersection rectangle of two boxes, if it has positive area.
    ///
    /// # Algorithm
    /// 1. Maximum of minimum points gives the top-left of the intersection
    /// 2. Minimum of maximum points gives the bottom-right
    /// 3. The result is kept only when `min < max` on both axes
    ///
    /// # Example
    /// ```
    /// use glam::DVec2;
    /// use slicer_core::analysis::bbox::Bbox;
    /// let bbox1 = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(4.0, 4.0));
    /// let bbox2 = Bbox::new(DVec2::new(2.0, 2.0), DVec2::new(6.0, 6.0));
    /// let clipped = bbox1.clip(&bbox2).unwrap();
    /// assert_eq!(clipped.min, DVec2::new(2.0, 2.0));
    /// assert_eq!(clipped.max, DVec2::new(4.0, 4.0));
    /// ```
    pub fn clip(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        (min.x < max.x && min.y < max.y).then_some(Self { min, max })
    }

    /// Calculates the area of intersection between this bounding box and another.
    ///
    /// Returns 0.0 if the boxes do not overlap.
    pub fn intersection(&self, other: &Self) -> f64 {
        self.clip(other).map_or(0.0, |clipped| clipped.area())
    }

    /// Checks if this bounding box completely contains another bounding box.
    ///
    /// Touching boundaries count as contained.
    pub fn contains(&self, other: &Self) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_bbox_area() {
        let bbox = Bbox::new_from_min_size(DVec2::ZERO, DVec2::new(2.0, 3.0));
        assert_eq!(bbox.area(), 6.0);

        // Zero area (degenerate case)
        let line = Bbox::new(DVec2::ZERO, DVec2::new(5.0, 0.0));
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_bbox_center_and_size() {
        let offset_bbox = Bbox::new(DVec2::new(10.0, 20.0), DVec2::new(14.0, 26.0));
        assert_eq!(offset_bbox.center(), DVec2::new(12.0, 23.0));
        assert_eq!(offset_bbox.size(), DVec2::new(4.0, 6.0));
    }

    #[test]
    fn test_normalized_center_round_trip() {
        let frame = DVec2::new(640.0, 480.0);
        let bbox = Bbox::new(DVec2::new(13.0, 7.5), DVec2::new(301.25, 479.0));

        let (center, size) = bbox.to_normalized_center(frame);
        let back = Bbox::from_normalized_center(center, size, frame);

        assert_relative_eq!(back.min.x, bbox.min.x, epsilon = 1e-9);
        assert_relative_eq!(back.min.y, bbox.min.y, epsilon = 1e-9);
        assert_relative_eq!(back.max.x, bbox.max.x, epsilon = 1e-9);
        assert_relative_eq!(back.max.y, bbox.max.y, epsilon = 1e-9);
    }

    #[test]
    fn test_translate_to() {
        let bbox = Bbox::new(DVec2::new(510.0, 620.0), DVec2::new(530.0, 700.0));
        let local = bbox.translate_to(DVec2::new(500.0, 600.0));
        assert_eq!(local.min, DVec2::new(10.0, 20.0));
        assert_eq!(local.max, DVec2::new(30.0, 100.0));
    }

    #[test]
    fn test_intersects_is_edge_exclusive() {
        let slice = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(500.0, 500.0));

        // Shares the right edge only
        let right = Bbox::new(DVec2::new(500.0, 100.0), DVec2::new(600.0, 200.0));
        assert!(!slice.intersects(&right));
        // Shares the bottom edge only
        let below = Bbox::new(DVec2::new(100.0, 500.0), DVec2::new(200.0, 600.0));
        assert!(!slice.intersects(&below));
        // Shares a corner only
        let corner = Bbox::new(DVec2::new(500.0, 500.0), DVec2::new(600.0, 600.0));
        assert!(!slice.intersects(&corner));
        // Just inside
        let sliver = Bbox::new(DVec2::new(499.5, 100.0), DVec2::new(600.0, 200.0));
        assert!(slice.intersects(&sliver));
    }

    #[test]
    fn test_clip_and_intersection() {
        let slice = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(500.0, 500.0));
        let spanning = Bbox::new(DVec2::new(450.0, 100.0), DVec2::new(550.0, 200.0));

        let clipped = slice.clip(&spanning).unwrap();
        assert_eq!(clipped, Bbox::new(DVec2::new(450.0, 100.0), DVec2::new(500.0, 200.0)));
        assert_eq!(slice.intersection(&spanning), 5000.0);

        let far = Bbox::new(DVec2::new(800.0, 800.0), DVec2::new(900.0, 900.0));
        assert!(slice.clip(&far).is_none());
        assert_eq!(slice.intersection(&far), 0.0);
    }

    #[test]
    fn test_degenerate_box_never_intersects() {
        let slice = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(500.0, 500.0));
        let zero_width = Bbox::new(DVec2::new(100.0, 100.0), DVec2::new(100.0, 200.0));
        let zero_height = Bbox::new(DVec2::new(100.0, 100.0), DVec2::new(200.0, 100.0));

        assert!(!slice.intersects(&zero_width));
        assert!(slice.clip(&zero_width).is_none());
        assert!(!zero_height.intersects(&slice));
        assert_eq!(slice.intersection(&zero_height), 0.0);
    }

    #[test]
    fn test_contains() {
        let outer = Bbox::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let inner = Bbox::new(DVec2::new(2.0, 3.0), DVec2::new(7.0, 8.0));

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains(&outer));
    }
}
