//! Column layout of the ranges interchange table.
//!
//! A [`Layout`] is an immutable value naming, in order, the columns of the
//! table and the field each column carries. The default layout is the
//! standard thirteen-column table:
//!
//! ```text
//! Sheet.Name,Sheet.Index,Annotation.Label,Annotation.Name,Annotation.Range,
//! Annotation.Parent,TotalCells,EmptyCells,ConstantCells,FormulaCells,
//! HasMergedCells,Rows,Columns
//! ```
//!
//! A custom layout can be loaded from JSON:
//!
//! ```json
//! { "columns": [ { "field": "sheet_name", "header": "Sheet" }, ... ] }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SheetLabelError;

/// A field of the interchange table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    SheetName,
    SheetIndex,
    Label,
    Name,
    Range,
    Parent,
    TotalCells,
    EmptyCells,
    ConstantCells,
    FormulaCells,
    HasMergedCells,
    Rows,
    Columns,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::SheetName,
        Field::SheetIndex,
        Field::Label,
        Field::Name,
        Field::Range,
        Field::Parent,
        Field::TotalCells,
        Field::EmptyCells,
        Field::ConstantCells,
        Field::FormulaCells,
        Field::HasMergedCells,
        Field::Rows,
        Field::Columns,
    ];

    /// Fields every layout must carry to rebuild the tree.
    pub const REQUIRED: [Field; 6] = [
        Field::SheetName,
        Field::SheetIndex,
        Field::Label,
        Field::Name,
        Field::Range,
        Field::Parent,
    ];

    /// The standard column header.
    pub fn default_header(&self) -> &'static str {
        match self {
            Field::SheetName => "Sheet.Name",
            Field::SheetIndex => "Sheet.Index",
            Field::Label => "Annotation.Label",
            Field::Name => "Annotation.Name",
            Field::Range => "Annotation.Range",
            Field::Parent => "Annotation.Parent",
            Field::TotalCells => "TotalCells",
            Field::EmptyCells => "EmptyCells",
            Field::ConstantCells => "ConstantCells",
            Field::FormulaCells => "FormulaCells",
            Field::HasMergedCells => "HasMergedCells",
            Field::Rows => "Rows",
            Field::Columns => "Columns",
        }
    }

    /// Whether every layout must carry this field.
    pub fn is_required(&self) -> bool {
        Field::REQUIRED.contains(self)
    }
}

/// One column of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutColumn {
    pub field: Field,
    pub header: String,
}

#[derive(Deserialize)]
struct LayoutFile {
    columns: Vec<LayoutColumn>,
}

/// The ordered columns of the interchange table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    columns: Vec<LayoutColumn>,
}

impl Layout {
    /// Builds a layout from explicit columns.
    ///
    /// # Errors
    /// Fails with [`SheetLabelError::InvalidLayout`] if a required field is
    /// missing, or a field or header appears twice.
    pub fn new(columns: Vec<LayoutColumn>) -> Result<Self, SheetLabelError> {
        let mut fields = BTreeSet::new();
        let mut headers = BTreeSet::new();
        for col in &columns {
            if !fields.insert(col.field) {
                return Err(SheetLabelError::InvalidLayout(format!(
                    "field {:?} appears more than once",
                    col.field
                )));
            }
            if !headers.insert(col.header.as_str()) {
                return Err(SheetLabelError::InvalidLayout(format!(
                    "header '{}' appears more than once",
                    col.header
                )));
            }
        }
        if let Some(missing) = Field::REQUIRED.iter().find(|f| !fields.contains(*f)) {
            return Err(SheetLabelError::InvalidLayout(format!(
                "required field {:?} is missing",
                missing
            )));
        }
        Ok(Self { columns })
    }

    /// Reads a layout from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, SheetLabelError> {
        let text = fs::read_to_string(path).map_err(SheetLabelError::Io)?;
        let file: LayoutFile =
            serde_json::from_str(&text).map_err(|source| SheetLabelError::LayoutParse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(file.columns)
    }

    /// The columns, in order.
    pub fn columns(&self) -> &[LayoutColumn] {
        &self.columns
    }

    /// The header row, in column order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Column index of `field`, if the layout carries it.
    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }

    /// Checks a header row against the layout: same names, same order.
    pub fn check_headers<'a, I>(&self, headers: I) -> Result<(), String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let found: Vec<&str> = headers.into_iter().map(str::trim).collect();
        let expected = self.headers();
        if found.len() != expected.len() {
            return Err(format!(
                "expected {} columns, found {}",
                expected.len(),
                found.len()
            ));
        }
        for (i, (f, e)) in found.iter().zip(&expected).enumerate() {
            if f != e {
                return Err(format!("column {} is '{}', expected '{}'", i, f, e));
            }
        }
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            columns: Field::ALL
                .iter()
                .map(|f| LayoutColumn {
                    field: *f,
                    header: f.default_header().to_string(),
                })
                .collect(),
        }
    }
}
