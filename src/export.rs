//! Flat region export.
//!
//! Both the annotation tree and grouped label regions can be flattened into
//! [`ExportRow`]s: one row per annotation with its address spelled out as
//! inclusive, 0-based bounds.
//!
//! ```text
//! FileName,SheetName,SheetIndex,AnnotationName,AnnotationLabel,AnnotationParent,AnnotationAddress,FirstColumn,FirstRow,LastColumn,LastRow
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::RangeAddress;
use crate::error::SheetLabelError;
use crate::label::Label;
use crate::region::LabelRegion;
use crate::tree::{Dependent, Workbook};

/// One exported annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub file_name: String,
    pub sheet_name: String,
    pub sheet_index: u32,
    #[serde(rename = "AnnotationName")]
    pub name: String,
    #[serde(rename = "AnnotationLabel")]
    pub label: Label,
    #[serde(rename = "AnnotationParent")]
    pub parent: String,
    #[serde(rename = "AnnotationAddress")]
    pub address: RangeAddress,
    pub first_column: u32,
    pub first_row: u32,
    pub last_column: u32,
    pub last_row: u32,
}

impl ExportRow {
    fn new(
        file_name: &str,
        sheet_name: &str,
        sheet_index: u32,
        name: &str,
        label: Label,
        parent: &str,
        address: RangeAddress,
    ) -> Self {
        Self {
            file_name: file_name.to_string(),
            sheet_name: sheet_name.to_string(),
            sheet_index,
            name: name.to_string(),
            label,
            parent: parent.to_string(),
            address,
            first_column: address.first_column(),
            first_row: address.first_row(),
            last_column: address.last_column(),
            last_row: address.last_row(),
        }
    }
}

/// Flattens a workbook: per sheet, tables first, then every range.
pub fn tree_export_rows(workbook: &Workbook, file_name: &str) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for sheet in workbook.worksheets() {
        for table in sheet.table_list() {
            rows.push(ExportRow::new(
                file_name,
                table.sheet_name(),
                table.sheet_index(),
                table.name(),
                Label::Table,
                table.parent().key(),
                table.address(),
            ));
        }
        for range in sheet.ranges().iter() {
            rows.push(ExportRow::new(
                file_name,
                range.sheet_name(),
                range.sheet_index(),
                range.name(),
                range.label(),
                range.parent().key(),
                range.address(),
            ));
        }
    }
    rows
}

/// Flattens grouped regions of one sheet. Regions are named
/// `{Label}_{n}`, numbered per label from 1 in the given order, with the
/// sheet as parent.
///
/// # Errors
/// Fails if a region is not aligned to whole cells.
pub fn region_export_rows(
    file_name: &str,
    sheet_name: &str,
    sheet_index: u32,
    regions: &BTreeMap<Label, Vec<LabelRegion>>,
) -> Result<Vec<ExportRow>, SheetLabelError> {
    let mut rows = Vec::new();
    for (label, list) in regions {
        for (i, region) in list.iter().enumerate() {
            let name = format!("{}_{}", label.name(), i + 1);
            rows.push(ExportRow::new(
                file_name,
                sheet_name,
                sheet_index,
                &name,
                *label,
                sheet_name,
                region.cell_range()?,
            ));
        }
    }
    Ok(rows)
}

/// Writes export rows to a CSV file.
pub fn write_export_csv(path: &Path, rows: &[ExportRow]) -> Result<(), SheetLabelError> {
    let file = File::create(path).map_err(SheetLabelError::Io)?;
    let mut csv_writer = csv::Writer::from_writer(BufWriter::new(file));
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|source| SheetLabelError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    csv_writer
        .into_inner()
        .map_err(|e| SheetLabelError::Io(e.into_error()))?
        .flush()
        .map_err(SheetLabelError::Io)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote export");
    Ok(())
}

/// Writes export rows to a CSV string.
pub fn to_export_csv_string(rows: &[ExportRow]) -> Result<String, SheetLabelError> {
    let path = Path::new("<string>");
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|source| SheetLabelError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    let bytes = csv_writer
        .into_inner()
        .map_err(|e| SheetLabelError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SheetLabelError::CsvInvalid {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}
