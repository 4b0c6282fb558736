//! The annotation containment tree.
//!
//! ```text
//! Workbook
//! └── Worksheet            (key: sheet name)
//!     ├── Table            (key: table name)
//!     │   └── Range        (nested; dependent child of the worksheet)
//!     │       └── Cell
//!     └── Range            (immediate child of the worksheet)
//!         └── Cell         (key: "{sheet}_{Label}_{A1}")
//! ```
//!
//! # Design Principles
//!
//! 1. **Keys, not pointers**: a child records its parent as a [`ParentRef`]
//!    and every lookup goes through the [`Workbook`] root. There are no
//!    reference cycles to manage.
//!
//! 2. **One owner per node**: each range is stored once, in its worksheet.
//!    A table lists the keys of its nested ranges; the worksheet tracks them
//!    as dependent, non-immediate children.
//!
//! 3. **Checked, all-or-nothing mutation**: the workbook validates every
//!    insertion against the tree invariants before modifying anything, so a
//!    rejected annotation never leaves partial state behind.
//!
//! 4. **Copies out**: list and map accessors return independent copies.
//!
//! # Example
//!
//! ```
//! use sheetlabel::tree::{RangeAnnotation, Table, Workbook};
//! use sheetlabel::{Label, RangeAddress};
//!
//! let mut book = Workbook::new("book.xlsx");
//! let sheet = book.new_worksheet("Sheet1", 0);
//! let table = Table::new(&sheet, "T", RangeAddress::from_a1("A1:D10")?);
//! let header = RangeAnnotation::in_table(&table, Label::Header, "H", RangeAddress::from_a1("A1:D1")?);
//!
//! book.add_worksheet_annotation(sheet)?;
//! book.add_table_annotation("Sheet1", table)?;
//! book.add_range_annotation("Sheet1", header)?;
//!
//! assert!(book.immediate_children_for_sheet("Sheet1").unwrap().is_empty());
//! assert_eq!(book.range_annotations_for_sheet("Sheet1").unwrap().len(), 1);
//! # Ok::<(), sheetlabel::SheetLabelError>(())
//! ```

mod container;
pub mod io_ranges_csv;
mod keys;
mod layout;
mod model;
mod workbook;

pub use container::{Container, Dependent};
pub use keys::{cell_key, worksheet_key, NodeKind, ParentRef};
pub use layout::{Field, Layout, LayoutColumn};
pub use model::{CellAnnotation, RangeAnnotation, RangeStats, Table, Worksheet};
pub use workbook::Workbook;
