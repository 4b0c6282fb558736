//! Node kinds and parent references for the annotation tree.
//!
//! Nodes never hold references to their parents. A child stores a
//! [`ParentRef`]: the kind of its container plus the keys needed to look the
//! container up from the workbook root.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::CellAddress;
use crate::label::Label;

/// The five kinds of node in the annotation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Workbook,
    Worksheet,
    Table,
    Range,
    Cell,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Workbook => "workbook",
            NodeKind::Worksheet => "worksheet",
            NodeKind::Table => "table",
            NodeKind::Range => "range",
            NodeKind::Cell => "cell",
        };
        f.write_str(s)
    }
}

/// Where a node hangs in the tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParentRef {
    /// Parent of a worksheet.
    Workbook { workbook: String },
    /// Parent of a table or of a range placed directly on the sheet.
    Worksheet { sheet: String },
    /// Parent of a range nested in a table.
    Table { sheet: String, table: String },
    /// Parent of a cell.
    Range { sheet: String, range: String },
}

impl ParentRef {
    pub fn worksheet(sheet: impl Into<String>) -> Self {
        ParentRef::Worksheet {
            sheet: sheet.into(),
        }
    }

    pub fn table(sheet: impl Into<String>, table: impl Into<String>) -> Self {
        ParentRef::Table {
            sheet: sheet.into(),
            table: table.into(),
        }
    }

    pub fn range(sheet: impl Into<String>, range: impl Into<String>) -> Self {
        ParentRef::Range {
            sheet: sheet.into(),
            range: range.into(),
        }
    }

    /// The kind of the referenced container.
    pub fn kind(&self) -> NodeKind {
        match self {
            ParentRef::Workbook { .. } => NodeKind::Workbook,
            ParentRef::Worksheet { .. } => NodeKind::Worksheet,
            ParentRef::Table { .. } => NodeKind::Table,
            ParentRef::Range { .. } => NodeKind::Range,
        }
    }

    /// The key of the referenced container within its own parent.
    pub fn key(&self) -> &str {
        match self {
            ParentRef::Workbook { workbook } => workbook,
            ParentRef::Worksheet { sheet } => sheet,
            ParentRef::Table { table, .. } => table,
            ParentRef::Range { range, .. } => range,
        }
    }

    /// The sheet the referenced container belongs to, if any.
    pub fn sheet_key(&self) -> Option<&str> {
        match self {
            ParentRef::Workbook { .. } => None,
            ParentRef::Worksheet { sheet }
            | ParentRef::Table { sheet, .. }
            | ParentRef::Range { sheet, .. } => Some(sheet),
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sheet_key() {
            Some(sheet) if self.kind() != NodeKind::Worksheet => {
                write!(f, "{} '{}' in sheet '{}'", self.kind(), self.key(), sheet)
            }
            _ => write!(f, "{} '{}'", self.kind(), self.key()),
        }
    }
}

/// The key of a worksheet: its name.
pub fn worksheet_key(sheet_name: &str) -> String {
    sheet_name.to_string()
}

/// The key of a cell annotation: `{sheet}_{Label}_{A1}`.
pub fn cell_key(sheet_name: &str, label: Label, address: CellAddress) -> String {
    format!("{}_{}_{}", sheet_name, label.name(), address.to_a1())
}
