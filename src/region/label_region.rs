//! A rectangle of the grid tagged with a label.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::RangeAddress;
use crate::error::SheetLabelError;
use crate::geom::Interval2D;
use crate::label::Label;

/// Per-row decomposition of a merged region: row index to the single-row
/// pieces found on that row.
pub type RowPieces = BTreeMap<u32, Vec<LabelRegion>>;

/// A labeled grid rectangle.
///
/// The region uses the exclusive-upper-bound grid convention: a region
/// covering columns 2..=4 of row 0 is `[2, 5] x [0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRegion {
    pub label: Label,
    pub region: Interval2D,
    /// Present on regions produced by merging several rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_intervals: Option<RowPieces>,
}

impl LabelRegion {
    pub fn new(label: Label, region: Interval2D) -> Self {
        Self {
            label,
            region,
            row_intervals: None,
        }
    }

    /// Attaches the per-row decomposition.
    pub fn with_row_intervals(mut self, row_intervals: RowPieces) -> Self {
        self.row_intervals = Some(row_intervals);
        self
    }

    pub fn is_single_row(&self) -> bool {
        self.region.height() == 1.0
    }

    pub fn is_single_column(&self) -> bool {
        self.region.width() == 1.0
    }

    /// More than one row and more than one column.
    pub fn is_matrix(&self) -> bool {
        self.region.height() > 1.0 && self.region.width() > 1.0
    }

    pub fn contains(&self, that: &LabelRegion) -> bool {
        self.region.contains(&that.region)
    }

    pub fn intersects(&self, that: &LabelRegion) -> bool {
        self.region.intersects(&that.region)
    }

    pub fn distance_from_region(&self, that: &LabelRegion) -> f64 {
        self.region.distance_from(&that.region)
    }

    /// The inclusive cell range covered by the region (`max - 1` on each axis).
    ///
    /// # Errors
    /// Fails with [`SheetLabelError::InvalidAddress`] if the region is not
    /// aligned to whole cells.
    pub fn cell_range(&self) -> Result<RangeAddress, SheetLabelError> {
        RangeAddress::from_region(&self.region)
    }

    // ------------------------------------------------------------------
    // Orderings, usable with `sort_by`
    // ------------------------------------------------------------------

    /// By squared distance of the top-left corner from the origin, then of
    /// the bottom-right corner.
    pub fn polar_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        let sq = |x: f64, y: f64| x * x + y * y;
        let (ax, ay, bx, by) = (a.region.x(), a.region.y(), b.region.x(), b.region.y());
        sq(ax.min(), ay.min())
            .total_cmp(&sq(bx.min(), by.min()))
            .then_with(|| sq(ax.max(), ay.max()).total_cmp(&sq(bx.max(), by.max())))
    }

    /// Top-most first, then left-most, then by bottom and right edges.
    pub fn min_row_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        let (ax, ay, bx, by) = (a.region.x(), a.region.y(), b.region.x(), b.region.y());
        ay.min()
            .total_cmp(&by.min())
            .then_with(|| ax.min().total_cmp(&bx.min()))
            .then_with(|| ay.max().total_cmp(&by.max()))
            .then_with(|| ax.max().total_cmp(&bx.max()))
    }

    /// Left-most first, then top-most, then by right and bottom edges.
    pub fn min_column_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        let (ax, ay, bx, by) = (a.region.x(), a.region.y(), b.region.x(), b.region.y());
        ax.min()
            .total_cmp(&bx.min())
            .then_with(|| ay.min().total_cmp(&by.min()))
            .then_with(|| ax.max().total_cmp(&bx.max()))
            .then_with(|| ay.max().total_cmp(&by.max()))
    }

    /// Larger area first.
    pub fn area_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        b.region.area().total_cmp(&a.region.area())
    }

    /// Wider first.
    pub fn width_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        b.region.width().total_cmp(&a.region.width())
    }

    /// Taller first.
    pub fn height_order(a: &LabelRegion, b: &LabelRegion) -> Ordering {
        b.region.height().total_cmp(&a.region.height())
    }
}

// A missing decomposition and an empty one are the same thing.
impl PartialEq for LabelRegion {
    fn eq(&self, other: &Self) -> bool {
        let pieces = |r: &LabelRegion| r.row_intervals.as_ref().filter(|m| !m.is_empty()).cloned();
        self.label == other.label
            && self.region == other.region
            && pieces(self) == pieces(other)
    }
}

impl fmt::Display for LabelRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell_range() {
            Ok(range) => write!(f, "({}, [{}])", self.label, range),
            Err(_) => write!(f, "({}, {})", self.label, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(label: Label, x0: f64, x1: f64, y0: f64, y1: f64) -> LabelRegion {
        LabelRegion::new(label, Interval2D::from_bounds(x0, x1, y0, y1).unwrap())
    }

    #[test]
    fn test_shape() {
        let row = region(Label::Header, 0.0, 4.0, 0.0, 1.0);
        assert!(row.is_single_row());
        assert!(!row.is_single_column());
        assert!(!row.is_matrix());

        let col = region(Label::Data, 2.0, 3.0, 0.0, 5.0);
        assert!(col.is_single_column());

        let block = region(Label::Data, 0.0, 2.0, 0.0, 2.0);
        assert!(block.is_matrix());
    }

    #[test]
    fn test_cell_range_subtracts_one() {
        let r = region(Label::Header, 2.0, 6.0, 0.0, 2.0);
        let range = r.cell_range().unwrap();
        assert_eq!(range.to_string(), "C1:F2");
        assert_eq!(range.first_column(), 2);
        assert_eq!(range.last_column(), 5);
        assert_eq!(range.last_row(), 1);
        assert_eq!(r.to_string(), "(Header, [C1:F2])");
    }

    #[test]
    fn test_delegates_to_region() {
        let a = region(Label::Data, 0.0, 2.0, 0.0, 2.0);
        let b = region(Label::Data, 5.0, 7.0, 5.0, 7.0);
        assert_eq!(a.distance_from_region(&b), 18.0_f64.sqrt());
        assert!(!a.intersects(&b));
        assert!(a.contains(&region(Label::Notes, 0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_equality_treats_empty_row_intervals_as_absent() {
        let a = region(Label::Data, 0.0, 2.0, 0.0, 2.0);
        let b = a.clone().with_row_intervals(BTreeMap::new());
        assert_eq!(a, b);

        let mut pieces = BTreeMap::new();
        pieces.insert(0, vec![region(Label::Data, 0.0, 2.0, 0.0, 1.0)]);
        let c = a.clone().with_row_intervals(pieces);
        assert_ne!(a, c);
    }

    #[test]
    fn test_descending_size_orders() {
        let small = region(Label::Data, 0.0, 1.0, 0.0, 1.0);
        let wide = region(Label::Data, 0.0, 5.0, 0.0, 1.0);
        let tall = region(Label::Data, 0.0, 1.0, 0.0, 3.0);

        let mut v = vec![small.clone(), tall.clone(), wide.clone()];
        v.sort_by(LabelRegion::area_order);
        assert_eq!(v, vec![wide.clone(), tall.clone(), small.clone()]);

        v.sort_by(LabelRegion::width_order);
        assert_eq!(v[0], wide);

        v.sort_by(LabelRegion::height_order);
        assert_eq!(v[0], tall);
    }

    #[test]
    fn test_position_orders() {
        let a = region(Label::Data, 3.0, 4.0, 0.0, 1.0);
        let b = region(Label::Data, 0.0, 1.0, 1.0, 2.0);
        let c = region(Label::Data, 0.0, 2.0, 1.0, 2.0);

        let mut v = vec![c.clone(), b.clone(), a.clone()];
        v.sort_by(LabelRegion::min_row_order);
        assert_eq!(v, vec![a.clone(), b.clone(), c.clone()]);

        v.sort_by(LabelRegion::min_column_order);
        assert_eq!(v, vec![b.clone(), c.clone(), a.clone()]);

        // |(0,1)|^2 = 1 < |(3,0)|^2 = 9
        v.sort_by(LabelRegion::polar_order);
        assert_eq!(v, vec![b, c, a]);
    }
}
