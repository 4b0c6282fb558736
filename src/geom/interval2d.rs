//! Axis-aligned rectangles and their spatial relations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Interval1D;
use crate::error::SheetLabelError;

/// An axis-aligned rectangle: all points `(px, py)` with `px` in `x` and
/// `py` in `y`.
///
/// The y-axis points down the sheet, so a region with a smaller y-coordinate
/// is "above" or "higher than" one with a larger y-coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval2D {
    x: Interval1D,
    y: Interval1D,
}

impl Interval2D {
    /// Creates a rectangle from its x- and y-intervals.
    #[inline]
    pub fn new(x: Interval1D, y: Interval1D) -> Self {
        Self { x, y }
    }

    /// Creates a rectangle from explicit bounds.
    ///
    /// # Errors
    /// Fails with [`SheetLabelError::InvalidInterval`] if either axis is invalid.
    pub fn from_bounds(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Result<Self, SheetLabelError> {
        Ok(Self::new(
            Interval1D::new(x_min, x_max)?,
            Interval1D::new(y_min, y_max)?,
        ))
    }

    /// The 1x1 grid cell at `(column, row)` with exclusive upper bounds:
    /// `[column, column + 1] x [row, row + 1]`.
    pub fn unit_cell(column: u32, row: u32) -> Self {
        let (c, r) = (f64::from(column), f64::from(row));
        Self::new(
            Interval1D::from_valid(c, c + 1.0),
            Interval1D::from_valid(r, r + 1.0),
        )
    }

    /// Returns the x-interval.
    #[inline]
    pub fn x(&self) -> Interval1D {
        self.x
    }

    /// Returns the y-interval.
    #[inline]
    pub fn y(&self) -> Interval1D {
        self.y
    }

    /// Returns the area.
    #[inline]
    pub fn area(&self) -> f64 {
        self.x.length() * self.y.length()
    }

    /// Returns the perimeter.
    #[inline]
    pub fn perimeter(&self) -> f64 {
        (self.x.length() + self.y.length()) * 2.0
    }

    /// Returns the width (length of the x-interval).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x.length()
    }

    /// Returns the height (length of the y-interval).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y.length()
    }

    // ------------------------------------------------------------------
    // Shape
    // ------------------------------------------------------------------

    /// Wider than tall.
    pub fn is_horizontal(&self) -> bool {
        self.width() > self.height()
    }

    /// Taller than wide.
    pub fn is_vertical(&self) -> bool {
        self.height() > self.width()
    }

    /// As wide as tall.
    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// Exactly one grid cell in size.
    pub fn is_unit_square(&self) -> bool {
        self.width() == 1.0 && self.height() == 1.0
    }

    // ------------------------------------------------------------------
    // Containment and intersection
    // ------------------------------------------------------------------

    /// Returns true if the point `(px, py)` lies inside the rectangle.
    #[inline]
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.x.contains(px) && self.y.contains(py)
    }

    /// Returns true if both extreme corners of `that` lie inside `self`.
    pub fn contains(&self, that: &Interval2D) -> bool {
        self.contains_point(that.x.min(), that.y.min())
            && self.contains_point(that.x.max(), that.y.max())
    }

    /// Returns true if the rectangles share at least one point.
    pub fn intersects(&self, that: &Interval2D) -> bool {
        self.x.intersects(&that.x) && self.y.intersects(&that.y)
    }

    /// The rectangles meet at a single corner point.
    pub fn is_vertex_intersection(&self, that: &Interval2D) -> bool {
        let (dx, dy) = self.overlaps(that);
        dx == 0.0 && dy == 0.0
    }

    /// The rectangles overlap with positive area and neither contains the other.
    pub fn is_multi_edge_intersection(&self, that: &Interval2D) -> bool {
        if self.contains(that) || that.contains(self) {
            return false;
        }
        let (dx, dy) = self.overlaps(that);
        dx > 0.0 && dy > 0.0
    }

    /// The rectangles share a segment of one edge but no area.
    pub fn is_single_edge_intersection(&self, that: &Interval2D) -> bool {
        let (dx, dy) = self.overlaps(that);
        (dx > 0.0 && dy == 0.0) || (dx == 0.0 && dy > 0.0)
    }

    fn overlaps(&self, that: &Interval2D) -> (f64, f64) {
        (
            self.x.length_of_intersection(&that.x),
            self.y.length_of_intersection(&that.y),
        )
    }

    /// The smallest rectangle covering both `self` and `that`.
    pub fn minimum_bounding_rectangle(&self, that: &Interval2D) -> Interval2D {
        Interval2D::new(self.x.span(&that.x), self.y.span(&that.y))
    }

    // ------------------------------------------------------------------
    // Distances
    // ------------------------------------------------------------------

    /// Euclidean distance between the closest points of the two rectangles.
    ///
    /// Zero when they intersect.
    pub fn distance_from(&self, that: &Interval2D) -> f64 {
        if self.intersects(that) {
            return 0.0;
        }
        let dx = self.x.gap(&that.x);
        let dy = self.y.gap(&that.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from `self` to the top edge (`y = y.min`) of `that`.
    pub fn distance_from_ceiling_of(&self, that: &Interval2D) -> f64 {
        let ceiling = Interval2D::new(that.x, Interval1D::point(that.y.min()));
        self.distance_from(&ceiling)
    }

    /// Distance from `self` to the bottom edge (`y = y.max`) of `that`.
    pub fn distance_from_floor_of(&self, that: &Interval2D) -> f64 {
        let floor = Interval2D::new(that.x, Interval1D::point(that.y.max()));
        self.distance_from(&floor)
    }

    /// Distance from `self` to the left edge (`x = x.min`) of `that`.
    pub fn distance_from_left_edge_of(&self, that: &Interval2D) -> f64 {
        let edge = Interval2D::new(Interval1D::point(that.x.min()), that.y);
        self.distance_from(&edge)
    }

    /// Distance from `self` to the right edge (`x = x.max`) of `that`.
    pub fn distance_from_right_edge_of(&self, that: &Interval2D) -> f64 {
        let edge = Interval2D::new(Interval1D::point(that.x.max()), that.y);
        self.distance_from(&edge)
    }

    // ------------------------------------------------------------------
    // Horizontal relations
    // ------------------------------------------------------------------

    /// Compares only the left edges: `self` starts further right than `that`.
    pub fn is_more_to_the_right_than(&self, that: &Interval2D) -> bool {
        that.x.min() < self.x.min()
    }

    /// Compares only the left edges: `self` starts further left than `that`.
    pub fn is_more_to_the_left_than(&self, that: &Interval2D) -> bool {
        self.x.min() < that.x.min()
    }

    /// `self` lies right of `that` (touching allowed) and the two share a
    /// positive stretch of rows.
    pub fn is_on_the_right_of(&self, that: &Interval2D) -> bool {
        self.x.min() >= that.x.max() && self.y.length_of_intersection(&that.y) > 0.0
    }

    /// Like [`is_on_the_right_of`](Self::is_on_the_right_of), but the rows of
    /// `self` must lie entirely within the rows of `that`.
    pub fn is_strictly_on_the_right_of(&self, that: &Interval2D) -> bool {
        self.x.min() >= that.x.max() && within(&self.y, &that.y)
    }

    /// The left edge of `self` coincides with the right edge of `that`.
    pub fn is_right_adjacent_with(&self, that: &Interval2D) -> bool {
        self.x.min() == that.x.max() && self.y.length_of_intersection(&that.y) > 0.0
    }

    /// `self` lies left of `that` (touching allowed) and the two share a
    /// positive stretch of rows.
    pub fn is_on_the_left_of(&self, that: &Interval2D) -> bool {
        self.x.max() <= that.x.min() && self.y.length_of_intersection(&that.y) > 0.0
    }

    /// Like [`is_on_the_left_of`](Self::is_on_the_left_of), but the rows of
    /// `self` must lie entirely within the rows of `that`.
    pub fn is_strictly_on_the_left_of(&self, that: &Interval2D) -> bool {
        self.x.max() <= that.x.min() && within(&self.y, &that.y)
    }

    /// The right edge of `self` coincides with the left edge of `that`.
    pub fn is_left_adjacent_with(&self, that: &Interval2D) -> bool {
        self.x.max() == that.x.min() && self.y.length_of_intersection(&that.y) > 0.0
    }

    // ------------------------------------------------------------------
    // Vertical relations
    // ------------------------------------------------------------------

    /// Compares only the top edges: `self` starts higher up than `that`.
    pub fn is_higher_than(&self, that: &Interval2D) -> bool {
        self.y.min() < that.y.min()
    }

    /// Compares only the top edges: `self` starts lower down than `that`.
    pub fn is_lower_than(&self, that: &Interval2D) -> bool {
        that.y.min() < self.y.min()
    }

    /// `self` lies above `that` (touching allowed) and the two share a
    /// positive stretch of columns.
    pub fn is_above_of(&self, that: &Interval2D) -> bool {
        self.y.max() <= that.y.min() && self.x.length_of_intersection(&that.x) > 0.0
    }

    /// Like [`is_above_of`](Self::is_above_of), but the columns of `self`
    /// must lie entirely within the columns of `that`.
    pub fn is_strictly_above_of(&self, that: &Interval2D) -> bool {
        self.y.max() <= that.y.min() && within(&self.x, &that.x)
    }

    /// The bottom edge of `self` coincides with the top edge of `that`.
    pub fn is_top_adjacent_with(&self, that: &Interval2D) -> bool {
        self.y.max() == that.y.min() && self.x.length_of_intersection(&that.x) > 0.0
    }

    /// `self` lies below `that` (touching allowed) and the two share a
    /// positive stretch of columns.
    pub fn is_below_of(&self, that: &Interval2D) -> bool {
        self.y.min() >= that.y.max() && self.x.length_of_intersection(&that.x) > 0.0
    }

    /// Like [`is_below_of`](Self::is_below_of), but the columns of `self`
    /// must lie entirely within the columns of `that`.
    pub fn is_strictly_below_of(&self, that: &Interval2D) -> bool {
        self.y.min() >= that.y.max() && within(&self.x, &that.x)
    }

    /// The top edge of `self` coincides with the bottom edge of `that`.
    pub fn is_bottom_adjacent_with(&self, that: &Interval2D) -> bool {
        self.y.min() == that.y.max() && self.x.length_of_intersection(&that.x) > 0.0
    }
}

/// `inner` is fully enclosed by `outer`.
fn within(inner: &Interval1D, outer: &Interval1D) -> bool {
    inner.min() >= outer.min() && inner.max() <= outer.max()
}

impl fmt::Debug for Interval2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval2D({} x {})", self.x, self.y)
    }
}

impl fmt::Display for Interval2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Interval2D {
        Interval2D::from_bounds(x_min, x_max, y_min, y_max).expect("valid rect")
    }

    #[test]
    fn test_metrics() {
        let r = rect(0.0, 4.0, 1.0, 3.0);
        assert_eq!(r.width(), 4.0);
        assert_eq!(r.height(), 2.0);
        assert_eq!(r.area(), 8.0);
        assert_eq!(r.perimeter(), 12.0);
    }

    #[test]
    fn test_unit_cell() {
        let c = Interval2D::unit_cell(2, 5);
        assert_eq!(c, rect(2.0, 3.0, 5.0, 6.0));
        assert!(c.is_unit_square());
    }

    #[test]
    fn test_shape_classifiers() {
        assert!(rect(0.0, 4.0, 0.0, 1.0).is_horizontal());
        assert!(rect(0.0, 1.0, 0.0, 4.0).is_vertical());
        assert!(rect(0.0, 3.0, 0.0, 3.0).is_square());
        assert!(!rect(0.0, 3.0, 0.0, 3.0).is_unit_square());
        assert!(rect(7.0, 8.0, 2.0, 3.0).is_unit_square());
    }

    #[test]
    fn test_contains() {
        let outer = rect(0.0, 10.0, 0.0, 10.0);
        assert!(outer.contains(&rect(2.0, 3.0, 2.0, 3.0)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&rect(9.0, 11.0, 0.0, 1.0)));
        assert!(outer.contains_point(10.0, 0.0));
        assert!(!outer.contains_point(10.5, 0.0));
    }

    #[test]
    fn test_distance_from() {
        let a = rect(0.0, 2.0, 0.0, 2.0);
        let b = rect(5.0, 7.0, 5.0, 7.0);
        assert_eq!(a.distance_from(&b), 18.0_f64.sqrt());
        assert_eq!(b.distance_from(&a), 18.0_f64.sqrt());

        // Same rows, gap only along x
        let c = rect(6.0, 8.0, 1.0, 3.0);
        assert_eq!(a.distance_from(&c), 4.0);

        assert_eq!(a.distance_from(&rect(1.0, 3.0, 1.0, 3.0)), 0.0);
    }

    #[test]
    fn test_edge_distances() {
        let a = rect(0.0, 2.0, 0.0, 2.0);
        let b = rect(0.0, 2.0, 5.0, 9.0);
        assert_eq!(a.distance_from_ceiling_of(&b), 3.0);
        assert_eq!(a.distance_from_floor_of(&b), 7.0);

        let c = rect(4.0, 9.0, 0.0, 2.0);
        assert_eq!(a.distance_from_left_edge_of(&c), 2.0);
        assert_eq!(a.distance_from_right_edge_of(&c), 7.0);
    }

    #[test]
    fn test_minimum_bounding_rectangle() {
        let a = rect(0.0, 2.0, 3.0, 4.0);
        let b = rect(5.0, 6.0, 1.0, 2.0);
        assert_eq!(a.minimum_bounding_rectangle(&b), rect(0.0, 6.0, 1.0, 4.0));
    }

    #[test]
    fn test_topological_classifiers() {
        let a = rect(0.0, 2.0, 0.0, 2.0);

        let corner = rect(2.0, 4.0, 2.0, 4.0);
        assert!(a.is_vertex_intersection(&corner));
        assert!(!a.is_single_edge_intersection(&corner));

        let edge = rect(2.0, 4.0, 1.0, 3.0);
        assert!(a.is_single_edge_intersection(&edge));
        assert!(!a.is_vertex_intersection(&edge));

        let overlap = rect(1.0, 3.0, 1.0, 3.0);
        assert!(a.is_multi_edge_intersection(&overlap));

        let inside = rect(0.5, 1.0, 0.5, 1.0);
        assert!(!a.is_multi_edge_intersection(&inside));

        let far = rect(10.0, 11.0, 10.0, 11.0);
        assert!(!a.is_vertex_intersection(&far));
        assert!(!a.is_single_edge_intersection(&far));
        assert!(!a.is_multi_edge_intersection(&far));
    }

    #[test]
    fn test_horizontal_adjacency() {
        let a = rect(0.0, 4.0, 0.0, 1.0);
        let b = rect(4.0, 8.0, 0.0, 1.0);
        assert!(a.is_left_adjacent_with(&b));
        assert!(b.is_right_adjacent_with(&a));
        assert!(!a.is_right_adjacent_with(&b));
        assert!(!b.is_left_adjacent_with(&a));

        // Only a corner in common: no positive row overlap
        let c = rect(4.0, 8.0, 1.0, 2.0);
        assert!(!a.is_left_adjacent_with(&c));
    }

    #[test]
    fn test_vertical_adjacency() {
        let top = rect(0.0, 3.0, 0.0, 1.0);
        let bottom = rect(1.0, 2.0, 1.0, 2.0);
        assert!(top.is_top_adjacent_with(&bottom));
        assert!(bottom.is_bottom_adjacent_with(&top));
        assert!(!bottom.is_top_adjacent_with(&top));
    }

    #[test]
    fn test_directional_predicates() {
        let left = rect(0.0, 2.0, 0.0, 4.0);
        let right = rect(5.0, 6.0, 1.0, 2.0);
        assert!(right.is_on_the_right_of(&left));
        assert!(right.is_strictly_on_the_right_of(&left));
        assert!(left.is_on_the_left_of(&right));
        // rows of `left` are not enclosed by the rows of `right`
        assert!(!left.is_strictly_on_the_left_of(&right));
        assert!(!left.is_on_the_right_of(&right));

        let above = rect(0.0, 2.0, 0.0, 1.0);
        let below = rect(1.0, 5.0, 3.0, 4.0);
        assert!(above.is_above_of(&below));
        assert!(below.is_below_of(&above));
        assert!(above.is_strictly_above_of(&rect(0.0, 3.0, 2.0, 3.0)));
        assert!(!below.is_strictly_below_of(&above));

        // No column overlap, so not above even though higher
        let elsewhere = rect(10.0, 11.0, 5.0, 6.0);
        assert!(!above.is_above_of(&elsewhere));
        assert!(above.is_higher_than(&elsewhere));
    }

    #[test]
    fn test_directional_predicates_accept_touching_edges() {
        let a = rect(0.0, 2.0, 0.0, 1.0);
        let b = rect(2.0, 3.0, 0.0, 1.0);
        assert!(b.is_on_the_right_of(&a));
        assert!(a.is_on_the_left_of(&b));
        // Overlapping columns are neither left nor right
        let c = rect(1.0, 3.0, 0.0, 1.0);
        assert!(!c.is_on_the_right_of(&a));
    }

    #[test]
    fn test_coarse_ordering() {
        let a = rect(0.0, 1.0, 0.0, 1.0);
        let b = rect(3.0, 4.0, 2.0, 9.0);
        assert!(b.is_more_to_the_right_than(&a));
        assert!(a.is_more_to_the_left_than(&b));
        assert!(a.is_higher_than(&b));
        assert!(b.is_lower_than(&a));
        assert!(!a.is_more_to_the_right_than(&a));
    }

    #[test]
    fn test_display() {
        assert_eq!(rect(0.0, 2.0, 1.0, 3.0).to_string(), "[0, 2] x [1, 3]");
    }
}
