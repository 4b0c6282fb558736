//! The workbook root and every tree mutation.
//!
//! All structural changes go through [`Workbook`], which checks the tree
//! invariants before touching anything. A failed call leaves the tree
//! exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::container::{Container, Dependent};
use super::keys::ParentRef;
use super::model::{CellAnnotation, RangeAnnotation, Table, Worksheet};
use crate::error::SheetLabelError;
use crate::label::Label;

/// The root of the annotation tree: a named workbook owning its worksheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    name: String,
    sheets: Container<Worksheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Container::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reference worksheets store as their parent.
    pub fn as_parent(&self) -> ParentRef {
        ParentRef::Workbook {
            workbook: self.name.clone(),
        }
    }

    /// Creates a worksheet that belongs to this workbook. It still has to be
    /// registered with [`add_worksheet_annotation`](Self::add_worksheet_annotation).
    pub fn new_worksheet(&self, sheet_name: impl Into<String>, sheet_index: u32) -> Worksheet {
        Worksheet::new(self.name.clone(), sheet_name, sheet_index)
    }

    // ------------------------------------------------------------------
    // Worksheets
    // ------------------------------------------------------------------

    /// Registers a worksheet.
    ///
    /// # Errors
    /// Fails if the worksheet belongs to another workbook or its key is taken.
    pub fn add_worksheet_annotation(&mut self, sheet: Worksheet) -> Result<(), SheetLabelError> {
        let key = sheet.key();
        if sheet.parent() != &self.as_parent() {
            return Err(SheetLabelError::containment(
                &key,
                format!(
                    "worksheet belongs to {} but was added to workbook '{}'",
                    sheet.parent(),
                    self.name
                ),
            ));
        }
        self.sheets.add_annotation(&key, sheet, true)?;
        tracing::debug!(workbook = %self.name, sheet = %key, "added worksheet");
        Ok(())
    }

    pub fn worksheet(&self, sheet_key: &str) -> Option<&Worksheet> {
        self.sheets.get(sheet_key)
    }

    pub fn contains_worksheet(&self, sheet_key: &str) -> bool {
        self.sheets.contains_annotation(sheet_key)
    }

    pub fn worksheets_map(&self) -> BTreeMap<String, Worksheet> {
        self.sheets.immediate_children_as_map()
    }

    pub fn worksheets_list(&self) -> Vec<Worksheet> {
        self.sheets.immediate_children_as_list()
    }

    /// Borrowing iterator over the worksheets in key order.
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    /// Removes a worksheet with all its tables, ranges and cells.
    pub fn remove_worksheet(&mut self, sheet_key: &str) -> Option<Worksheet> {
        let removed = self.sheets.remove_annotation(sheet_key);
        if removed.is_some() {
            tracing::debug!(workbook = %self.name, sheet = %sheet_key, "removed worksheet");
        }
        removed
    }

    fn sheet_mut(&mut self, sheet_key: &str) -> Result<&mut Worksheet, SheetLabelError> {
        self.sheets
            .get_mut(sheet_key)
            .ok_or_else(|| unknown_sheet(sheet_key))
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Registers a table on the sheet `sheet_key`.
    ///
    /// # Errors
    /// Fails if the sheet is unknown, the table belongs to another sheet, a
    /// table with the same key exists, or the table lists ranges that are not
    /// nested in it on this sheet.
    pub fn add_table_annotation(
        &mut self,
        sheet_key: &str,
        table: Table,
    ) -> Result<(), SheetLabelError> {
        let sheet = self
            .sheets
            .get(sheet_key)
            .ok_or_else(|| unknown_sheet(sheet_key))?;
        check_table(sheet, &table)?;
        let key = table.key();
        self.sheet_mut(sheet_key)?.insert_table(table);
        tracing::debug!(sheet = %sheet_key, table = %key, "added table");
        Ok(())
    }

    /// Registers several tables on one sheet; either all of them are added or
    /// none is.
    ///
    /// # Errors
    /// As [`add_table_annotation`](Self::add_table_annotation), and also if
    /// two of the given tables share a key.
    pub fn add_multiple_tables(
        &mut self,
        sheet_key: &str,
        tables: Vec<Table>,
    ) -> Result<(), SheetLabelError> {
        let sheet = self
            .sheets
            .get(sheet_key)
            .ok_or_else(|| unknown_sheet(sheet_key))?;
        let mut seen = std::collections::BTreeSet::new();
        for table in &tables {
            check_table(sheet, table)?;
            if !seen.insert(table.key()) {
                return Err(SheetLabelError::containment(
                    table.key(),
                    "table appears twice in the batch",
                ));
            }
        }
        let sheet = self.sheet_mut(sheet_key)?;
        for table in tables {
            sheet.insert_table(table);
        }
        Ok(())
    }

    pub fn table(&self, sheet_key: &str, table_key: &str) -> Option<&Table> {
        self.sheets.get(sheet_key)?.table(table_key)
    }

    /// Copies of the tables on a sheet, `None` for an unknown sheet.
    pub fn tables_for_sheet(&self, sheet_key: &str) -> Option<Vec<Table>> {
        Some(self.sheets.get(sheet_key)?.table_list())
    }

    /// Copies of the ranges nested in a table.
    pub fn table_ranges(&self, sheet_key: &str, table_key: &str) -> Option<Vec<RangeAnnotation>> {
        self.sheets.get(sheet_key)?.table_ranges(table_key)
    }

    /// Removes a table and its nested ranges.
    pub fn remove_table(&mut self, sheet_key: &str, table_key: &str) -> Option<Table> {
        self.sheets.get_mut(sheet_key)?.remove_table(table_key)
    }

    pub fn remove_all_tables_for_sheet(&mut self, sheet_key: &str) {
        if let Some(sheet) = self.sheets.get_mut(sheet_key) {
            sheet.remove_all_tables();
        }
    }

    // ------------------------------------------------------------------
    // Ranges
    // ------------------------------------------------------------------

    /// Registers a range on the sheet `sheet_key`.
    ///
    /// A range whose parent is the worksheet becomes an immediate child of
    /// it. A range whose parent is a table is listed by the table and becomes
    /// a dependent, non-immediate child of the worksheet.
    ///
    /// # Errors
    /// Fails with [`SheetLabelError::InconsistentContainment`] if the sheet
    /// is unknown, the range's parent does not belong to that sheet, the
    /// parent table is not registered, the range disagrees with the sheet's
    /// name or index, or the key is taken. Nothing is modified on failure.
    pub fn add_range_annotation(
        &mut self,
        sheet_key: &str,
        range: RangeAnnotation,
    ) -> Result<(), SheetLabelError> {
        let key = range.key();
        let sheet = self
            .sheets
            .get(sheet_key)
            .ok_or_else(|| unknown_sheet(sheet_key))?;

        if sheet.ranges().contains_annotation(&key) {
            return Err(SheetLabelError::containment(
                &key,
                format!("a range with this key already exists in sheet '{sheet_key}'"),
            ));
        }
        if range.sheet_name() != sheet.sheet_name() || range.sheet_index() != sheet.sheet_index() {
            return Err(SheetLabelError::containment(
                &key,
                format!(
                    "range is on sheet '{}' (index {}) but sheet '{}' has index {}",
                    range.sheet_name(),
                    range.sheet_index(),
                    sheet.sheet_name(),
                    sheet.sheet_index()
                ),
            ));
        }

        let table_key = match range.parent() {
            ParentRef::Worksheet { sheet: parent } => {
                if parent != sheet_key {
                    return Err(SheetLabelError::containment(
                        &key,
                        format!(
                            "range belongs to worksheet '{parent}' but was added to '{sheet_key}'"
                        ),
                    ));
                }
                None
            }
            ParentRef::Table {
                sheet: parent,
                table,
            } => {
                if parent != sheet_key {
                    return Err(SheetLabelError::containment(
                        &key,
                        format!(
                            "range belongs to table '{table}' of worksheet '{parent}' but was added to '{sheet_key}'"
                        ),
                    ));
                }
                if !sheet.contains_table(table) {
                    return Err(SheetLabelError::containment(
                        &key,
                        format!("parent table '{table}' is not registered in worksheet '{sheet_key}'"),
                    ));
                }
                Some(table.clone())
            }
            other => {
                return Err(SheetLabelError::containment(
                    &key,
                    format!("a range cannot have a {} as parent", other.kind()),
                ));
            }
        };

        let label = range.label();
        let sheet = self.sheet_mut(sheet_key)?;
        match &table_key {
            None => sheet.ranges_mut().add_annotation(&key, range, true)?,
            Some(table) => {
                sheet.ranges_mut().add_annotation(&key, range, false)?;
                if let Some(t) = sheet.table_mut(table) {
                    if !t.contains_range(&key) {
                        t.add_range_key(&key, label);
                    }
                }
            }
        }
        tracing::debug!(sheet = %sheet_key, range = %key, table = ?table_key, "added range");
        Ok(())
    }

    /// Looks up a range by sheet and range key.
    pub fn range_annotation(&self, sheet_key: &str, range_key: &str) -> Option<&RangeAnnotation> {
        self.sheets.get(sheet_key)?.range(range_key)
    }

    /// Resolves the name a range gives as its parent: a worksheet key, or
    /// else the key of a table on any sheet (first match in sheet order).
    pub fn parent_of_range_annotation(&self, parent_key: &str) -> Option<ParentRef> {
        if let Some(sheet) = self.sheets.get(parent_key) {
            return Some(sheet.as_parent());
        }
        self.sheets
            .iter()
            .find_map(|s| s.table(parent_key).map(Table::as_parent))
    }

    /// Like [`parent_of_range_annotation`](Self::parent_of_range_annotation),
    /// but prefers the sheet `sheet_key` and its tables.
    pub fn parent_of_range_annotation_in(
        &self,
        sheet_key: &str,
        parent_key: &str,
    ) -> Option<ParentRef> {
        if let Some(sheet) = self.sheets.get(sheet_key) {
            if sheet.key() == parent_key {
                return Some(sheet.as_parent());
            }
            if let Some(table) = sheet.table(parent_key) {
                return Some(table.as_parent());
            }
        }
        self.parent_of_range_annotation(parent_key)
    }

    /// All ranges of a sheet, including those nested in tables.
    pub fn range_annotations_for_sheet(&self, sheet_key: &str) -> Option<Vec<RangeAnnotation>> {
        Some(self.sheets.get(sheet_key)?.all_dependent_as_list())
    }

    pub fn range_annotations_for_sheet_by_label(
        &self,
        sheet_key: &str,
        label: Label,
    ) -> Option<Vec<RangeAnnotation>> {
        let sheet = self.sheets.get(sheet_key)?;
        Some(
            sheet
                .ranges()
                .iter()
                .filter(|r| r.label() == label)
                .cloned()
                .collect(),
        )
    }

    /// Ranges placed directly on a sheet.
    pub fn immediate_children_for_sheet(&self, sheet_key: &str) -> Option<Vec<RangeAnnotation>> {
        Some(self.sheets.get(sheet_key)?.immediate_children_as_list())
    }

    /// Removes a range from the sheet and, if nested, from its table.
    pub fn remove_range_annotation(
        &mut self,
        sheet_key: &str,
        range_key: &str,
    ) -> Option<RangeAnnotation> {
        self.sheets.get_mut(sheet_key)?.remove_range(range_key)
    }

    pub fn remove_range_annotations_for_sheet_by_label(&mut self, sheet_key: &str, label: Label) {
        let Some(sheet) = self.sheets.get_mut(sheet_key) else {
            return;
        };
        let keys: Vec<String> = sheet
            .ranges()
            .iter()
            .filter(|r| r.label() == label)
            .map(Dependent::key)
            .collect();
        for key in keys {
            sheet.remove_range(&key);
        }
    }

    /// Removes every range of a sheet. Tables stay, emptied.
    pub fn remove_all_range_annotations_for_sheet(&mut self, sheet_key: &str) {
        if let Some(sheet) = self.sheets.get_mut(sheet_key) {
            sheet.remove_all_dependent_annotations();
        }
    }

    /// Removes every range and every table of a sheet.
    pub fn remove_all_annotations_for_sheet(&mut self, sheet_key: &str) {
        if let Some(sheet) = self.sheets.get_mut(sheet_key) {
            sheet.remove_all_dependent_annotations();
            sheet.remove_all_tables();
        }
    }

    // ------------------------------------------------------------------
    // Cells
    // ------------------------------------------------------------------

    /// Registers a cell of the range `range_key` on sheet `sheet_key`.
    ///
    /// # Errors
    /// Fails if the sheet or range is unknown, or the range rejects the cell.
    pub fn add_cell_annotation(
        &mut self,
        sheet_key: &str,
        range_key: &str,
        cell: CellAnnotation,
    ) -> Result<(), SheetLabelError> {
        let sheet = self.sheet_mut(sheet_key)?;
        let range = sheet.ranges_mut().get_mut(range_key).ok_or_else(|| {
            SheetLabelError::containment(
                cell.key(),
                format!("range '{range_key}' is not registered in worksheet '{sheet_key}'"),
            )
        })?;
        range.add_cell(cell)
    }
}

fn unknown_sheet(sheet_key: &str) -> SheetLabelError {
    SheetLabelError::containment(sheet_key, "no worksheet with this key in the workbook")
}

fn check_table(sheet: &Worksheet, table: &Table) -> Result<(), SheetLabelError> {
    let key = table.key();
    if table.parent() != &sheet.as_parent() {
        return Err(SheetLabelError::containment(
            &key,
            format!(
                "table belongs to {} but was added to worksheet '{}'",
                table.parent(),
                sheet.key()
            ),
        ));
    }
    if sheet.contains_table(&key) {
        return Err(SheetLabelError::containment(
            &key,
            format!("a table with this key already exists in sheet '{}'", sheet.key()),
        ));
    }
    let parent = table.as_parent();
    let listed = table
        .range_keys()
        .iter()
        .chain(table.header_keys())
        .chain(table.data_keys());
    for range_key in listed {
        let range = sheet.range(range_key).ok_or_else(|| {
            SheetLabelError::containment(
                &key,
                format!("table lists range '{range_key}' that the worksheet does not hold"),
            )
        })?;
        if range.parent() != &parent || sheet.ranges().is_immediate_child(range_key) {
            return Err(SheetLabelError::containment(
                &key,
                format!(
                    "table lists range '{range_key}' that belongs to {}",
                    range.parent()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{CellAddress, RangeAddress};

    fn addr(a1: &str) -> RangeAddress {
        RangeAddress::from_a1(a1).unwrap()
    }

    /// Workbook with sheet "S" holding table "T" (A1:D10).
    fn book_with_table() -> Workbook {
        let mut book = Workbook::new("book.xlsx");
        let sheet = book.new_worksheet("S", 0);
        let table = Table::new(&sheet, "T", addr("A1:D10"));
        book.add_worksheet_annotation(sheet).unwrap();
        book.add_table_annotation("S", table).unwrap();
        book
    }

    fn table_range(book: &Workbook, label: Label, name: &str, a1: &str) -> RangeAnnotation {
        RangeAnnotation::in_table(book.table("S", "T").unwrap(), label, name, addr(a1))
    }

    fn sheet_range(book: &Workbook, label: Label, name: &str, a1: &str) -> RangeAnnotation {
        RangeAnnotation::in_worksheet(book.worksheet("S").unwrap(), label, name, addr(a1))
    }

    #[test]
    fn test_range_under_table_is_dependent_not_immediate() {
        let mut book = book_with_table();
        let r = table_range(&book, Label::Header, "R", "A1:D1");
        book.add_range_annotation("S", r.clone()).unwrap();

        let table_view = book.table_ranges("S", "T").unwrap();
        assert_eq!(table_view, vec![r.clone()]);

        let sheet = book.worksheet("S").unwrap();
        assert!(!sheet.immediate_children_as_list().contains(&r));
        assert!(sheet.all_dependent_as_list().contains(&r));
        assert!(book.table("S", "T").unwrap().header_keys().contains("R"));
    }

    #[test]
    fn test_range_under_sheet_is_in_both_views() {
        let mut book = book_with_table();
        let r = sheet_range(&book, Label::Notes, "N", "F1:F3");
        book.add_range_annotation("S", r.clone()).unwrap();

        assert_eq!(book.immediate_children_for_sheet("S").unwrap(), vec![r.clone()]);
        assert_eq!(book.range_annotations_for_sheet("S").unwrap(), vec![r]);
        assert!(book.table_ranges("S", "T").unwrap().is_empty());
    }

    #[test]
    fn test_add_range_rejects_unknown_sheet() {
        let mut book = book_with_table();
        let r = sheet_range(&book, Label::Data, "D", "A2");
        let err = book.add_range_annotation("Missing", r).unwrap_err();
        assert!(matches!(err, SheetLabelError::InconsistentContainment { .. }));
    }

    #[test]
    fn test_add_range_rejects_sheet_mismatch() {
        let mut book = book_with_table();
        let other = book.new_worksheet("Other", 1);
        book.add_worksheet_annotation(other).unwrap();

        let r = sheet_range(&book, Label::Data, "D", "A2");
        assert!(book.add_range_annotation("Other", r).is_err());

        let nested = table_range(&book, Label::Data, "D", "A2");
        assert!(book.add_range_annotation("Other", nested).is_err());
        assert!(book.range_annotations_for_sheet("Other").unwrap().is_empty());
    }

    #[test]
    fn test_add_range_rejects_unregistered_table() {
        let mut book = book_with_table();
        let ghost = Table::new(book.worksheet("S").unwrap(), "Ghost", addr("A1:B2"));
        let r = RangeAnnotation::in_table(&ghost, Label::Data, "D", addr("A2"));
        let err = book.add_range_annotation("S", r).unwrap_err();
        assert!(err.to_string().contains("Ghost"));
        assert!(book.range_annotations_for_sheet("S").unwrap().is_empty());
    }

    #[test]
    fn test_add_range_rejects_range_parent() {
        let mut book = book_with_table();
        let r = RangeAnnotation::new("S", 0, ParentRef::range("S", "X"), Label::Data, "D", addr("A2"));
        assert!(book.add_range_annotation("S", r).is_err());
    }

    #[test]
    fn test_add_range_rejects_sheet_index_mismatch() {
        let mut book = book_with_table();
        let r = RangeAnnotation::new("S", 7, ParentRef::worksheet("S"), Label::Data, "D", addr("A2"));
        assert!(book.add_range_annotation("S", r).is_err());
    }

    #[test]
    fn test_duplicate_range_leaves_state_untouched() {
        let mut book = book_with_table();
        let first = sheet_range(&book, Label::Notes, "X", "F1");
        book.add_range_annotation("S", first).unwrap();

        let dup = table_range(&book, Label::Header, "X", "A1");
        let before = book.clone();
        assert!(book.add_range_annotation("S", dup).is_err());
        assert_eq!(book, before);
        assert!(book.table("S", "T").unwrap().is_empty());
    }

    #[test]
    fn test_remove_range_from_all_views() {
        let mut book = book_with_table();
        book.add_range_annotation("S", table_range(&book, Label::Data, "R", "A2:D10"))
            .unwrap();
        let removed = book.remove_range_annotation("S", "R").unwrap();
        assert_eq!(removed.name(), "R");
        assert!(book.table_ranges("S", "T").unwrap().is_empty());
        assert!(book.table("S", "T").unwrap().data_keys().is_empty());
        assert!(book.range_annotation("S", "R").is_none());
    }

    #[test]
    fn test_remove_by_label() {
        let mut book = book_with_table();
        book.add_range_annotation("S", table_range(&book, Label::Header, "H", "A1:D1"))
            .unwrap();
        book.add_range_annotation("S", table_range(&book, Label::Data, "D", "A2:D10"))
            .unwrap();
        book.add_range_annotation("S", sheet_range(&book, Label::Header, "H2", "F1"))
            .unwrap();

        assert_eq!(
            book.range_annotations_for_sheet_by_label("S", Label::Header)
                .unwrap()
                .len(),
            2
        );
        book.remove_range_annotations_for_sheet_by_label("S", Label::Header);
        let left: Vec<_> = book
            .range_annotations_for_sheet("S")
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(left, vec!["D"]);
        assert!(book.table("S", "T").unwrap().header_keys().is_empty());
    }

    #[test]
    fn test_bulk_removals() {
        let mut book = book_with_table();
        book.add_range_annotation("S", table_range(&book, Label::Data, "D", "A2:D10"))
            .unwrap();
        book.add_range_annotation("S", sheet_range(&book, Label::Notes, "N", "F1"))
            .unwrap();

        let mut only_tables = book.clone();
        only_tables.remove_all_tables_for_sheet("S");
        assert!(only_tables.tables_for_sheet("S").unwrap().is_empty());
        assert_eq!(only_tables.range_annotations_for_sheet("S").unwrap().len(), 1);

        let mut only_ranges = book.clone();
        only_ranges.remove_all_range_annotations_for_sheet("S");
        assert!(only_ranges.range_annotations_for_sheet("S").unwrap().is_empty());
        let table = only_ranges.table("S", "T").unwrap();
        assert!(table.is_empty() && table.data_keys().is_empty());

        book.remove_all_annotations_for_sheet("S");
        assert!(book.tables_for_sheet("S").unwrap().is_empty());
        assert!(book.range_annotations_for_sheet("S").unwrap().is_empty());
        assert!(book.worksheet("S").is_some());

        assert!(book.remove_worksheet("S").is_some());
        assert!(book.worksheets_list().is_empty());
    }

    #[test]
    fn test_add_multiple_tables_is_all_or_nothing() {
        let mut book = book_with_table();
        let sheet = book.worksheet("S").unwrap().clone();
        let a = Table::new(&sheet, "A", addr("F1:G5"));
        let dup = Table::new(&sheet, "T", addr("H1:H2"));
        assert!(book.add_multiple_tables("S", vec![a.clone(), dup]).is_err());
        assert!(book.table("S", "A").is_none());

        let b = Table::new(&sheet, "B", addr("H1:H2"));
        book.add_multiple_tables("S", vec![a, b]).unwrap();
        assert_eq!(book.tables_for_sheet("S").unwrap().len(), 3);
    }

    /// Table "T" of a separate workbook that lists a nested range "H".
    fn table_listing_h() -> Table {
        let mut other = book_with_table();
        let h = table_range(&other, Label::Header, "H", "A1:D1");
        other.add_range_annotation("S", h).unwrap();
        other.table("S", "T").unwrap().clone()
    }

    #[test]
    fn test_add_table_rejects_adopting_sheet_range() {
        let mut book = Workbook::new("book.xlsx");
        let sheet = book.new_worksheet("S", 0);
        book.add_worksheet_annotation(sheet).unwrap();
        let h = sheet_range(&book, Label::MetaTitle, "H", "F1");
        book.add_range_annotation("S", h).unwrap();

        assert!(book.add_table_annotation("S", table_listing_h()).is_err());
        assert!(book.table("S", "T").is_none());
        assert_eq!(book.immediate_children_for_sheet("S").unwrap().len(), 1);
        assert!(book.remove_table("S", "T").is_none());
        assert!(book.range_annotation("S", "H").is_some());
    }

    #[test]
    fn test_add_multiple_tables_rejects_other_tables_range() {
        let mut book = Workbook::new("book.xlsx");
        let sheet = book.new_worksheet("S", 0);
        let u = Table::new(&sheet, "U", addr("A1:D10"));
        book.add_worksheet_annotation(sheet.clone()).unwrap();
        book.add_table_annotation("S", u).unwrap();
        let h = RangeAnnotation::in_table(
            book.table("S", "U").unwrap(),
            Label::Header,
            "H",
            addr("A1:D1"),
        );
        book.add_range_annotation("S", h).unwrap();

        let fresh = Table::new(&sheet, "A", addr("F1:G5"));
        assert!(book
            .add_multiple_tables("S", vec![fresh, table_listing_h()])
            .is_err());
        assert!(book.table("S", "A").is_none());
        assert_eq!(book.table_ranges("S", "U").unwrap().len(), 1);
    }

    #[test]
    fn test_add_table_rejects_foreign_sheet() {
        let mut book = book_with_table();
        let other = book.new_worksheet("Other", 1);
        let table = Table::new(&other, "X", addr("A1"));
        book.add_worksheet_annotation(other).unwrap();
        assert!(book.add_table_annotation("S", table).is_err());
    }

    #[test]
    fn test_worksheet_from_other_workbook_rejected() {
        let mut book = Workbook::new("a.xlsx");
        let foreign = Worksheet::new("b.xlsx", "S", 0);
        assert!(book.add_worksheet_annotation(foreign).is_err());
        let sheet = book.new_worksheet("S", 0);
        book.add_worksheet_annotation(sheet.clone()).unwrap();
        assert!(book.add_worksheet_annotation(sheet).is_err());
    }

    #[test]
    fn test_parent_lookup() {
        let mut book = book_with_table();
        let other = book.new_worksheet("Other", 1);
        let t2 = Table::new(&other, "T", addr("A1"));
        book.add_worksheet_annotation(other).unwrap();
        book.add_table_annotation("Other", t2).unwrap();

        assert_eq!(book.parent_of_range_annotation("S"), Some(ParentRef::worksheet("S")));
        assert_eq!(book.parent_of_range_annotation("T"), Some(ParentRef::table("Other", "T")));
        assert_eq!(
            book.parent_of_range_annotation_in("S", "T"),
            Some(ParentRef::table("S", "T"))
        );
        assert_eq!(book.parent_of_range_annotation("nope"), None);
    }

    #[test]
    fn test_add_cell_annotation() {
        let mut book = book_with_table();
        let r = table_range(&book, Label::Header, "H", "A1:D1");
        book.add_range_annotation("S", r.clone()).unwrap();

        let cell = CellAnnotation::new(&r, Label::Header, CellAddress::new(0, 3));
        book.add_cell_annotation("S", "H", cell.clone()).unwrap();
        assert!(book.add_cell_annotation("S", "missing", cell).is_err());

        let range = book.range_annotation("S", "H").unwrap();
        assert!(range.cells().contains_annotation("S_Header_D1"));
        // Nested range body is shared: the table view sees the cell too.
        let via_table = book.table_ranges("S", "T").unwrap();
        assert_eq!(via_table[0].cells().len(), 1);
    }
}
