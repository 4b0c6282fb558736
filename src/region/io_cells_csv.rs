//! Cell label CSV reader.
//!
//! The input for row grouping: one labeled cell per line with the columns
//!
//! - `row`: 0-based sheet row
//! - `column`: 0-based sheet column
//! - `label`: an annotation label, canonical (`Header`) or lower-case
//!   (`header`) name
//!
//! Coordinates must fit on a sheet. Unlabeled cells are simply omitted. Row order is irrelevant; see
//! [`LabelMatrix::from_cells`](super::LabelMatrix::from_cells).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::grouping::LabeledCell;
use crate::address::CellAddress;
use crate::error::SheetLabelError;
use crate::label::Label;

#[derive(Debug, Deserialize)]
struct CellRow {
    row: u32,
    column: u32,
    label: Label,
}

/// Reads labeled cells from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened, a row fails to parse or a
/// cell lies outside the sheet.
pub fn read_cell_labels_csv(path: &Path) -> Result<Vec<LabeledCell>, SheetLabelError> {
    let file = File::open(path).map_err(SheetLabelError::Io)?;
    parse_cells(BufReader::new(file), path)
}

/// Reads labeled cells from a CSV string.
pub fn from_cell_labels_csv_str(csv_str: &str) -> Result<Vec<LabeledCell>, SheetLabelError> {
    parse_cells(csv_str.as_bytes(), Path::new("<string>"))
}

fn parse_cells<R: Read>(reader: R, path: &Path) -> Result<Vec<LabeledCell>, SheetLabelError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut cells = Vec::new();
    for (i, result) in csv_reader.deserialize().enumerate() {
        let row: CellRow = result.map_err(|source| SheetLabelError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        // Header is line 1.
        let line = i + 2;
        CellAddress::checked(row.row, row.column).map_err(|e| SheetLabelError::CsvInvalid {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line, e),
        })?;
        cells.push(LabeledCell::new(row.label, row.row, row.column));
    }
    tracing::debug!(path = %path.display(), cells = cells.len(), "read cell labels");
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_label_forms() {
        let csv = "row,column,label\n0,0,Header\n0, 1 ,header\n3,2,GroupHead\n";
        let cells = from_cell_labels_csv_str(csv).unwrap();
        assert_eq!(
            cells,
            vec![
                LabeledCell::new(Label::Header, 0, 0),
                LabeledCell::new(Label::Header, 0, 1),
                LabeledCell::new(Label::GroupHead, 3, 2),
            ]
        );
    }

    #[test]
    fn test_unknown_label_is_parse_error() {
        let csv = "row,column,label\n0,0,Heading\n";
        let err = from_cell_labels_csv_str(csv).unwrap_err();
        assert!(matches!(err, SheetLabelError::CsvParse { .. }));
    }

    #[test]
    fn test_negative_row_is_parse_error() {
        let csv = "row,column,label\n-1,0,Data\n";
        assert!(from_cell_labels_csv_str(csv).is_err());
    }

    #[test]
    fn test_cells_outside_the_sheet_are_rejected() {
        let csv = "row,column,label\n0,0,Data\n0,4294967295,Data\n";
        let err = from_cell_labels_csv_str(csv).unwrap_err();
        match err {
            SheetLabelError::CsvInvalid { message, .. } => {
                assert!(message.starts_with("line 3:"), "{message}");
                assert!(message.contains("column out of range"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let csv = "row,column,label\n1048576,0,Data\n";
        assert!(from_cell_labels_csv_str(csv).is_err());

        let csv = "row,column,label\n1048575,16383,Data\n";
        assert_eq!(from_cell_labels_csv_str(csv).unwrap().len(), 1);
    }
}
