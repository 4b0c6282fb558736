//! Row-wise grouping of labeled cells into [`LabelRegion`]s.
//!
//! Each row of a [`LabelMatrix`] is scanned left to right. Runs of
//! consecutive cells sharing a label become one single-row region; an empty
//! cell or a label change closes the current run. [`stack_row_regions`]
//! optionally merges those single-row regions vertically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::label_region::{LabelRegion, RowPieces};
use crate::address::CellAddress;
use crate::error::SheetLabelError;
use crate::geom::{Interval1D, Interval2D};
use crate::label::Label;

/// Row index to the regions found on that row, per label, in left-to-right
/// discovery order.
pub type RowIntervals = BTreeMap<u32, BTreeMap<Label, Vec<LabelRegion>>>;

/// Which coordinates the grouped regions are placed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Matrix positions: row = index of the row in the matrix, column =
    /// index of the cell in its row.
    #[default]
    Dense,
    /// The `row` and `column` carried by each [`LabeledCell`].
    Original,
}

/// A labeled cell with its position on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledCell {
    pub label: Label,
    pub row: u32,
    pub column: u32,
}

impl LabeledCell {
    pub fn new(label: Label, row: u32, column: u32) -> Self {
        Self { label, row, column }
    }
}

/// Rows of optional labeled cells. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMatrix {
    rows: Vec<Vec<Option<LabeledCell>>>,
}

impl LabelMatrix {
    pub fn new(rows: Vec<Vec<Option<LabeledCell>>>) -> Self {
        Self { rows }
    }

    /// Arranges sparse cells into a matrix.
    ///
    /// One matrix row is created per distinct sheet row (in ascending
    /// order). Within a row, cells sit at their column index and the gaps
    /// are left empty, so column positions agree in both index modes. If
    /// the same position appears twice, the later cell wins.
    ///
    /// # Errors
    /// Fails if a cell lies outside the sheet.
    pub fn from_cells<I>(cells: I) -> Result<Self, SheetLabelError>
    where
        I: IntoIterator<Item = LabeledCell>,
    {
        let mut by_row: BTreeMap<u32, BTreeMap<u32, LabeledCell>> = BTreeMap::new();
        for cell in cells {
            CellAddress::checked(cell.row, cell.column)?;
            if let Some(prev) = by_row
                .entry(cell.row)
                .or_default()
                .insert(cell.column, cell)
            {
                tracing::warn!(
                    row = cell.row,
                    column = cell.column,
                    previous = %prev.label,
                    current = %cell.label,
                    "duplicate labeled cell, keeping the later one"
                );
            }
        }

        let rows = by_row
            .into_values()
            .map(|cols| {
                let width = cols.keys().next_back().map_or(0, |c| *c as usize + 1);
                let mut row = vec![None; width];
                for (col, cell) in cols {
                    row[col as usize] = Some(cell);
                }
                row
            })
            .collect();
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Option<LabeledCell>>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The run currently being extended while scanning a row.
struct OpenRun {
    label: Label,
    region: Interval2D,
}

/// Groups each row of `matrix` into single-row label regions.
///
/// The output has an entry for every matrix row, keyed by the row's index
/// in the matrix; rows without labeled cells map to an empty map.
///
/// # Errors
/// In [`IndexMode::Original`], fails with [`SheetLabelError::InvalidInterval`]
/// if a run's columns decrease from left to right.
pub fn group_row_intervals(
    matrix: &LabelMatrix,
    mode: IndexMode,
) -> Result<RowIntervals, SheetLabelError> {
    let mut out = RowIntervals::new();

    for (i, cells) in matrix.rows.iter().enumerate() {
        let row_index = u32::try_from(i).map_err(|_| SheetLabelError::InvalidInterval {
            min: i as f64,
            max: i as f64,
            reason: "row index exceeds u32".to_string(),
        })?;
        let mut found: BTreeMap<Label, Vec<LabelRegion>> = BTreeMap::new();
        let mut open: Option<OpenRun> = None;

        for (j, cell) in cells.iter().enumerate() {
            let Some(cell) = cell else {
                if let Some(run) = open.take() {
                    close(&mut found, run);
                }
                continue;
            };

            let (column, row) = match mode {
                IndexMode::Dense => (j as f64, f64::from(row_index)),
                IndexMode::Original => (f64::from(cell.column), f64::from(cell.row)),
            };
            let y = Interval1D::new(row, row + 1.0)?;

            open = Some(match open.take() {
                Some(run) if run.label == cell.label => OpenRun {
                    label: run.label,
                    region: Interval2D::new(Interval1D::new(run.region.x().min(), column + 1.0)?, y),
                },
                previous => {
                    if let Some(run) = previous {
                        close(&mut found, run);
                    }
                    OpenRun {
                        label: cell.label,
                        region: Interval2D::new(Interval1D::new(column, column + 1.0)?, y),
                    }
                }
            });
        }

        if let Some(run) = open.take() {
            close(&mut found, run);
        }
        out.insert(row_index, found);
    }

    tracing::debug!(rows = out.len(), ?mode, "grouped row intervals");
    Ok(out)
}

fn close(found: &mut BTreeMap<Label, Vec<LabelRegion>>, run: OpenRun) {
    found
        .entry(run.label)
        .or_default()
        .push(LabelRegion::new(run.label, run.region));
}

/// A vertical stack under construction.
struct Stack {
    region: Interval2D,
    pieces: RowPieces,
}

impl Stack {
    fn finish(self, label: Label) -> LabelRegion {
        let merged = LabelRegion::new(label, self.region);
        if self.pieces.len() > 1 {
            merged.with_row_intervals(self.pieces)
        } else {
            merged
        }
    }
}

/// Collects the row regions of every row per label, in row order.
pub fn regions_by_label(rows: &RowIntervals) -> BTreeMap<Label, Vec<LabelRegion>> {
    let mut out: BTreeMap<Label, Vec<LabelRegion>> = BTreeMap::new();
    for by_label in rows.values() {
        for (&label, regions) in by_label {
            out.entry(label).or_default().extend(regions.iter().cloned());
        }
    }
    out
}

/// Merges single-row regions of consecutive rows vertically.
///
/// For each label, a region extends a stack from the previous row when it
/// spans exactly the same columns and touches the stack's bottom edge.
/// Merged regions record their per-row pieces in
/// [`LabelRegion::row_intervals`]; regions that were never merged are
/// returned unchanged. Results are in [`LabelRegion::min_row_order`].
pub fn stack_row_regions(rows: &RowIntervals) -> BTreeMap<Label, Vec<LabelRegion>> {
    let mut open: BTreeMap<Label, Vec<Stack>> = BTreeMap::new();
    let mut done: BTreeMap<Label, Vec<LabelRegion>> = BTreeMap::new();

    for (&row, by_label) in rows {
        // Stacks not extended by this row are closed.
        let mut carried: BTreeMap<Label, Vec<Stack>> = BTreeMap::new();

        for (&label, regions) in by_label {
            let candidates = open.entry(label).or_default();
            for piece in regions {
                let region = piece.region;
                let hit = candidates.iter().position(|s| {
                    s.region.x() == region.x() && s.region.y().max() == region.y().min()
                });
                let stack = match hit {
                    Some(idx) => {
                        let mut s = candidates.swap_remove(idx);
                        s.region = s.region.minimum_bounding_rectangle(&region);
                        s.pieces.entry(row).or_default().push(piece.clone());
                        s
                    }
                    None => {
                        let mut pieces = RowPieces::new();
                        pieces.insert(row, vec![piece.clone()]);
                        Stack { region, pieces }
                    }
                };
                carried.entry(label).or_default().push(stack);
            }
        }

        for (label, stacks) in std::mem::replace(&mut open, carried) {
            done.entry(label)
                .or_default()
                .extend(stacks.into_iter().map(|s| s.finish(label)));
        }
    }

    for (label, stacks) in open {
        done.entry(label)
            .or_default()
            .extend(stacks.into_iter().map(|s| s.finish(label)));
    }

    done.retain(|_, v| !v.is_empty());
    for regions in done.values_mut() {
        regions.sort_by(LabelRegion::min_row_order);
    }
    done
}
