//! Worksheet, table, range and cell annotations.
//!
//! Ranges are owned by their worksheet. A table only records the keys of
//! the ranges nested in it; the range bodies stay in the worksheet, which
//! tracks them as dependent but not immediate children.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::container::{Container, Dependent};
use super::keys::{cell_key, worksheet_key, ParentRef};
use crate::address::{CellAddress, RangeAddress};
use crate::error::SheetLabelError;
use crate::geom::Interval2D;
use crate::label::Label;

/// Optional cell statistics carried alongside a range or table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    pub total_cells: Option<u64>,
    pub empty_cells: Option<u64>,
    pub constant_cells: Option<u64>,
    pub formula_cells: Option<u64>,
    pub has_merged_cells: Option<bool>,
    pub rows: Option<u32>,
    pub columns: Option<u32>,
}

impl RangeStats {
    /// True when no statistic is set.
    pub fn is_empty(&self) -> bool {
        *self == RangeStats::default()
    }
}

// ============================================================================
// Worksheet
// ============================================================================

/// One annotated sheet of a workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    workbook_name: String,
    sheet_name: String,
    sheet_index: u32,
    parent: ParentRef,
    tables: BTreeMap<String, Table>,
    ranges: Container<RangeAnnotation>,
}

impl Worksheet {
    /// Creates an empty worksheet belonging to the workbook `workbook_name`.
    pub fn new(
        workbook_name: impl Into<String>,
        sheet_name: impl Into<String>,
        sheet_index: u32,
    ) -> Self {
        let workbook_name = workbook_name.into();
        Self {
            parent: ParentRef::Workbook {
                workbook: workbook_name.clone(),
            },
            workbook_name,
            sheet_name: sheet_name.into(),
            sheet_index,
            tables: BTreeMap::new(),
            ranges: Container::new(),
        }
    }

    pub fn workbook_name(&self) -> &str {
        &self.workbook_name
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn sheet_index(&self) -> u32 {
        self.sheet_index
    }

    /// The reference children of this sheet store as their parent.
    pub fn as_parent(&self) -> ParentRef {
        ParentRef::worksheet(self.key())
    }

    pub fn table(&self, table_key: &str) -> Option<&Table> {
        self.tables.get(table_key)
    }

    pub fn contains_table(&self, table_key: &str) -> bool {
        self.tables.contains_key(table_key)
    }

    pub fn table_list(&self) -> Vec<Table> {
        self.tables.values().cloned().collect()
    }

    pub fn table_map(&self) -> BTreeMap<String, Table> {
        self.tables.clone()
    }

    /// All ranges of the sheet, including those nested in tables.
    pub fn ranges(&self) -> &Container<RangeAnnotation> {
        &self.ranges
    }

    pub fn range(&self, range_key: &str) -> Option<&RangeAnnotation> {
        self.ranges.get(range_key)
    }

    pub fn all_dependent_as_list(&self) -> Vec<RangeAnnotation> {
        self.ranges.all_dependent_as_list()
    }

    pub fn immediate_children_as_list(&self) -> Vec<RangeAnnotation> {
        self.ranges.immediate_children_as_list()
    }

    /// Copies of the ranges nested in `table_key`, or `None` for an unknown
    /// table.
    pub fn table_ranges(&self, table_key: &str) -> Option<Vec<RangeAnnotation>> {
        let table = self.tables.get(table_key)?;
        Some(
            table
                .range_keys()
                .iter()
                .filter_map(|k| self.ranges.get(k))
                .cloned()
                .collect(),
        )
    }

    pub(crate) fn insert_table(&mut self, table: Table) {
        self.tables.insert(table.key(), table);
    }

    pub(crate) fn table_mut(&mut self, table_key: &str) -> Option<&mut Table> {
        self.tables.get_mut(table_key)
    }

    pub(crate) fn ranges_mut(&mut self) -> &mut Container<RangeAnnotation> {
        &mut self.ranges
    }

    /// Removes a range from every view: the sheet and, if nested, its table.
    pub(crate) fn remove_range(&mut self, range_key: &str) -> Option<RangeAnnotation> {
        let removed = self.ranges.remove_annotation(range_key)?;
        if let ParentRef::Table { table, .. } = removed.parent() {
            if let Some(t) = self.tables.get_mut(table) {
                t.remove_range_key(range_key);
            }
        }
        Some(removed)
    }

    /// Removes a table and every range nested in it.
    pub(crate) fn remove_table(&mut self, table_key: &str) -> Option<Table> {
        let table = self.tables.remove(table_key)?;
        for key in table.range_keys() {
            self.ranges.remove_annotation(key);
        }
        Some(table)
    }

    /// Removes every table together with its nested ranges. Ranges placed
    /// directly on the sheet stay.
    pub(crate) fn remove_all_tables(&mut self) {
        let keys: Vec<String> = self.tables.keys().cloned().collect();
        for key in keys {
            self.remove_table(&key);
        }
    }

    /// Removes every range of the sheet and empties the tables, which stay
    /// registered.
    pub(crate) fn remove_all_dependent_annotations(&mut self) {
        self.ranges.clear();
        for table in self.tables.values_mut() {
            table.clear_ranges();
        }
    }
}

impl Dependent for Worksheet {
    fn key(&self) -> String {
        worksheet_key(&self.sheet_name)
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

// ============================================================================
// Table
// ============================================================================

/// A table on a worksheet, grouping ranges.
///
/// Nested ranges are split by label into header and data sets; ranges with
/// any other label are only in the general set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    sheet_name: String,
    sheet_index: u32,
    name: String,
    address: RangeAddress,
    parent: ParentRef,
    #[serde(default, skip_serializing_if = "RangeStats::is_empty")]
    stats: RangeStats,
    ranges: BTreeSet<String>,
    header: BTreeSet<String>,
    data: BTreeSet<String>,
}

impl Table {
    /// Creates an empty table on `sheet`.
    pub fn new(sheet: &Worksheet, name: impl Into<String>, address: RangeAddress) -> Self {
        Self {
            sheet_name: sheet.sheet_name.clone(),
            sheet_index: sheet.sheet_index,
            name: name.into(),
            address,
            parent: sheet.as_parent(),
            stats: RangeStats::default(),
            ranges: BTreeSet::new(),
            header: BTreeSet::new(),
            data: BTreeSet::new(),
        }
    }

    pub fn with_stats(mut self, stats: RangeStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn sheet_index(&self) -> u32 {
        self.sheet_index
    }

    pub fn address(&self) -> RangeAddress {
        self.address
    }

    pub fn stats(&self) -> &RangeStats {
        &self.stats
    }

    pub fn region(&self) -> Interval2D {
        self.address.region()
    }

    /// The reference nested ranges store as their parent.
    pub fn as_parent(&self) -> ParentRef {
        ParentRef::table(self.sheet_name.clone(), self.name.clone())
    }

    pub fn contains_range(&self, range_key: &str) -> bool {
        self.ranges.contains(range_key)
    }

    pub fn range_keys(&self) -> &BTreeSet<String> {
        &self.ranges
    }

    pub fn header_keys(&self) -> &BTreeSet<String> {
        &self.header
    }

    pub fn data_keys(&self) -> &BTreeSet<String> {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub(crate) fn add_range_key(&mut self, key: &str, label: Label) {
        self.ranges.insert(key.to_string());
        match label {
            Label::Header => {
                self.header.insert(key.to_string());
            }
            Label::Data => {
                self.data.insert(key.to_string());
            }
            _ => {}
        }
    }

    pub(crate) fn remove_range_key(&mut self, key: &str) {
        self.ranges.remove(key);
        if !self.header.remove(key) {
            self.data.remove(key);
        }
    }

    pub(crate) fn clear_ranges(&mut self) {
        self.ranges.clear();
        self.header.clear();
        self.data.clear();
    }
}

impl Dependent for Table {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

// ============================================================================
// Range
// ============================================================================

/// A labeled block of cells, placed on a worksheet or nested in a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAnnotation {
    sheet_name: String,
    sheet_index: u32,
    parent: ParentRef,
    label: Label,
    name: String,
    address: RangeAddress,
    #[serde(default, skip_serializing_if = "RangeStats::is_empty")]
    stats: RangeStats,
    cells: Container<CellAnnotation>,
}

impl RangeAnnotation {
    pub fn new(
        sheet_name: impl Into<String>,
        sheet_index: u32,
        parent: ParentRef,
        label: Label,
        name: impl Into<String>,
        address: RangeAddress,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            sheet_index,
            parent,
            label,
            name: name.into(),
            address,
            stats: RangeStats::default(),
            cells: Container::new(),
        }
    }

    /// A range placed directly on `sheet`.
    pub fn in_worksheet(
        sheet: &Worksheet,
        label: Label,
        name: impl Into<String>,
        address: RangeAddress,
    ) -> Self {
        Self::new(
            sheet.sheet_name(),
            sheet.sheet_index(),
            sheet.as_parent(),
            label,
            name,
            address,
        )
    }

    /// A range nested in `table`.
    pub fn in_table(
        table: &Table,
        label: Label,
        name: impl Into<String>,
        address: RangeAddress,
    ) -> Self {
        Self::new(
            table.sheet_name(),
            table.sheet_index(),
            table.as_parent(),
            label,
            name,
            address,
        )
    }

    pub fn with_stats(mut self, stats: RangeStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn sheet_index(&self) -> u32 {
        self.sheet_index
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> RangeAddress {
        self.address
    }

    pub fn stats(&self) -> &RangeStats {
        &self.stats
    }

    /// The grid rectangle, exclusive upper bounds.
    pub fn region(&self) -> Interval2D {
        self.address.region()
    }

    pub fn as_parent(&self) -> ParentRef {
        ParentRef::range(self.sheet_name.clone(), self.name.clone())
    }

    pub fn cells(&self) -> &Container<CellAnnotation> {
        &self.cells
    }

    /// Registers a cell of this range.
    ///
    /// # Errors
    /// Fails if the cell's parent is not this range, the cell lies outside
    /// the range, or a cell with the same key exists.
    pub(crate) fn add_cell(&mut self, cell: CellAnnotation) -> Result<(), SheetLabelError> {
        let key = cell.key();
        if cell.parent() != &self.as_parent() {
            return Err(SheetLabelError::containment(
                &key,
                format!(
                    "cell belongs to {} but was added to {}",
                    cell.parent(),
                    self.as_parent()
                ),
            ));
        }
        if !self.address.contains_cell(cell.address()) {
            return Err(SheetLabelError::containment(
                &key,
                format!("cell lies outside range {}", self.address),
            ));
        }
        self.cells.add_annotation(&key, cell, true)
    }
}

impl Dependent for RangeAnnotation {
    fn key(&self) -> String {
        self.name.clone()
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}

// ============================================================================
// Cell
// ============================================================================

/// A single labeled cell inside a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAnnotation {
    sheet_name: String,
    sheet_index: u32,
    label: Label,
    address: CellAddress,
    parent: ParentRef,
}

impl CellAnnotation {
    /// A cell of `range`, labeled `label`.
    pub fn new(range: &RangeAnnotation, label: Label, address: CellAddress) -> Self {
        Self {
            sheet_name: range.sheet_name.clone(),
            sheet_index: range.sheet_index,
            label,
            address,
            parent: range.as_parent(),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn sheet_index(&self) -> u32 {
        self.sheet_index
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn address(&self) -> CellAddress {
        self.address
    }
}

impl Dependent for CellAnnotation {
    fn key(&self) -> String {
        cell_key(&self.sheet_name, self.label, self.address)
    }

    fn parent(&self) -> &ParentRef {
        &self.parent
    }
}
