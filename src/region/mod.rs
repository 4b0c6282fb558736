//! Label regions and the row-grouping algorithm.
//!
//! A per-cell label assignment (a [`LabelMatrix`]) is turned into labeled
//! rectangles in two steps:
//!
//! 1. [`group_row_intervals`] merges runs of same-label cells on each row.
//! 2. [`stack_row_regions`] (optional) merges aligned runs of consecutive
//!    rows into multi-row regions, keeping the per-row pieces.

mod grouping;
pub mod io_cells_csv;
mod label_region;

pub use grouping::{
    group_row_intervals, regions_by_label, stack_row_regions, IndexMode, LabelMatrix, LabeledCell,
    RowIntervals,
};
pub use label_region::{LabelRegion, RowPieces};
