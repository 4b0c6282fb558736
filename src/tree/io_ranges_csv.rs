//! Ranges interchange CSV reader and writer.
//!
//! The interchange table lists one annotation per row: the tables and ranges
//! of every sheet, with their label, A1 address and parent. Columns are
//! described by a [`Layout`]; see its docs for the standard header.
//!
//! # Reconstruction Rules
//!
//! - Worksheets are created on first mention, with the index given by that
//!   first row.
//! - A row's parent must already exist: either a sheet name or the name of
//!   a table from an earlier row. Tables of the row's own sheet win over
//!   same-named tables elsewhere.
//! - Rows labeled `Table` become tables and must have a worksheet parent.
//!
//! # Deterministic Output
//!
//! The writer emits sheets in key order, and within a sheet all tables first
//! followed by all ranges, each in key order. Rows read back from that output
//! always find their parent.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::container::Dependent;
use super::keys::{worksheet_key, ParentRef};
use super::layout::{Field, Layout};
use super::model::{RangeAnnotation, RangeStats, Table};
use super::workbook::Workbook;
use crate::address::RangeAddress;
use crate::error::SheetLabelError;
use crate::label::Label;

/// One row of the interchange table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    pub sheet_name: String,
    pub sheet_index: u32,
    pub label: Label,
    pub name: String,
    pub address: RangeAddress,
    /// Sheet name for annotations placed on the sheet, table name for ranges
    /// nested in a table.
    pub parent: String,
    pub stats: RangeStats,
}

// ============================================================================
// Public API
// ============================================================================

/// Reads a workbook from an interchange CSV file. The workbook is named after
/// the file.
///
/// # Errors
/// Returns an error if the file cannot be read, its header does not match
/// `layout`, a row is malformed, or the rows do not form a consistent tree.
pub fn read_ranges_csv(path: &Path, layout: &Layout) -> Result<Workbook, SheetLabelError> {
    let file = File::open(path).map_err(SheetLabelError::Io)?;
    let records = parse_records(BufReader::new(file), layout, path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    records_to_workbook(name, records)
}

/// Reads a workbook from interchange CSV text.
pub fn from_ranges_csv_str(
    csv_str: &str,
    layout: &Layout,
    workbook_name: &str,
) -> Result<Workbook, SheetLabelError> {
    from_ranges_csv_slice(csv_str.as_bytes(), layout, workbook_name)
}

/// Reads a workbook from interchange CSV bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_ranges_csv_slice(
    bytes: &[u8],
    layout: &Layout,
    workbook_name: &str,
) -> Result<Workbook, SheetLabelError> {
    let records = parse_records(bytes, layout, Path::new("<bytes>"))?;
    records_to_workbook(workbook_name, records)
}

/// Writes a workbook to an interchange CSV file.
pub fn write_ranges_csv(
    path: &Path,
    workbook: &Workbook,
    layout: &Layout,
) -> Result<(), SheetLabelError> {
    let file = File::create(path).map_err(SheetLabelError::Io)?;
    let writer = write_records(BufWriter::new(file), &workbook_to_records(workbook), layout, path)?;
    writer
        .into_inner()
        .map_err(|e| SheetLabelError::Io(e.into_error()))?
        .flush()
        .map_err(SheetLabelError::Io)?;
    Ok(())
}

/// Writes a workbook to interchange CSV text.
pub fn to_ranges_csv_string(
    workbook: &Workbook,
    layout: &Layout,
) -> Result<String, SheetLabelError> {
    let path = Path::new("<string>");
    let writer = write_records(Vec::new(), &workbook_to_records(workbook), layout, path)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| SheetLabelError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SheetLabelError::CsvInvalid {
        path: path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

// ============================================================================
// Records <-> tree
// ============================================================================

/// Rebuilds a workbook from interchange rows, in row order.
///
/// # Errors
/// Fails with [`SheetLabelError::UnknownParent`] when a row names a parent
/// that no earlier row created, and with
/// [`SheetLabelError::InconsistentContainment`] when a row breaks a tree
/// invariant.
pub fn records_to_workbook<I>(
    workbook_name: impl Into<String>,
    records: I,
) -> Result<Workbook, SheetLabelError>
where
    I: IntoIterator<Item = RangeRecord>,
{
    let mut book = Workbook::new(workbook_name);
    let mut count = 0usize;

    for record in records {
        let sheet_key = worksheet_key(&record.sheet_name);
        if !book.contains_worksheet(&sheet_key) {
            let sheet = book.new_worksheet(record.sheet_name.clone(), record.sheet_index);
            book.add_worksheet_annotation(sheet)?;
        }

        let parent = book
            .parent_of_range_annotation_in(&sheet_key, &record.parent)
            .ok_or_else(|| SheetLabelError::UnknownParent {
                parent: record.parent.clone(),
                child: record.name.clone(),
            })?;

        if record.label == Label::Table {
            let sheet = match &parent {
                ParentRef::Worksheet { sheet } if *sheet == sheet_key => book.worksheet(sheet),
                _ => None,
            };
            let Some(sheet) = sheet else {
                return Err(SheetLabelError::containment(
                    &record.name,
                    format!(
                        "a table must have its own worksheet '{}' as parent, found {}",
                        sheet_key, parent
                    ),
                ));
            };
            let table = Table::new(sheet, record.name, record.address).with_stats(record.stats);
            book.add_table_annotation(&sheet_key, table)?;
        } else {
            let range = RangeAnnotation::new(
                record.sheet_name,
                record.sheet_index,
                parent,
                record.label,
                record.name,
                record.address,
            )
            .with_stats(record.stats);
            book.add_range_annotation(&sheet_key, range)?;
        }
        count += 1;
    }

    tracing::debug!(workbook = %book.name(), records = count, "rebuilt workbook");
    Ok(book)
}

/// Flattens a workbook into interchange rows: per sheet, tables first, then
/// every range (including those nested in tables).
pub fn workbook_to_records(workbook: &Workbook) -> Vec<RangeRecord> {
    let mut out = Vec::new();
    for sheet in workbook.worksheets() {
        for table in sheet.table_list() {
            out.push(RangeRecord {
                sheet_name: table.sheet_name().to_string(),
                sheet_index: table.sheet_index(),
                label: Label::Table,
                name: table.name().to_string(),
                address: table.address(),
                parent: table.parent().key().to_string(),
                stats: *table.stats(),
            });
        }
        for range in sheet.ranges().iter() {
            out.push(RangeRecord {
                sheet_name: range.sheet_name().to_string(),
                sheet_index: range.sheet_index(),
                label: range.label(),
                name: range.name().to_string(),
                address: range.address(),
                parent: range.parent().key().to_string(),
                stats: *range.stats(),
            });
        }
    }
    out
}

// ============================================================================
// CSV <-> records
// ============================================================================

/// Parses and checks interchange rows without building a tree.
pub fn parse_records<R: Read>(
    reader: R,
    layout: &Layout,
    path: &Path,
) -> Result<Vec<RangeRecord>, SheetLabelError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| SheetLabelError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    layout
        .check_headers(headers.iter())
        .map_err(|message| SheetLabelError::CsvInvalid {
            path: path.to_path_buf(),
            message: format!("Unexpected header: {}", message),
        })?;

    let mut records = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let row = result.map_err(|source| SheetLabelError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        // Header is line 1.
        let line = i + 2;
        let record = parse_row(&row, layout).map_err(|message| SheetLabelError::CsvInvalid {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line, message),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn parse_row(row: &csv::StringRecord, layout: &Layout) -> Result<RangeRecord, String> {
    let sheet_index = required(row, layout, Field::SheetIndex)?
        .parse::<u32>()
        .map_err(|e| format!("invalid sheet index: {}", e))?;
    let label = required(row, layout, Field::Label)?
        .parse::<Label>()
        .map_err(|e| e.to_string())?;
    let address =
        RangeAddress::from_a1(required(row, layout, Field::Range)?).map_err(|e| e.to_string())?;

    let number = |field: Field| optional_number(value(row, layout, field), field);
    let stats = RangeStats {
        total_cells: number(Field::TotalCells)?,
        empty_cells: number(Field::EmptyCells)?,
        constant_cells: number(Field::ConstantCells)?,
        formula_cells: number(Field::FormulaCells)?,
        has_merged_cells: optional_bool(value(row, layout, Field::HasMergedCells))?,
        rows: optional_number(value(row, layout, Field::Rows), Field::Rows)?,
        columns: optional_number(value(row, layout, Field::Columns), Field::Columns)?,
    };

    Ok(RangeRecord {
        sheet_name: required(row, layout, Field::SheetName)?.to_string(),
        sheet_index,
        label,
        name: required(row, layout, Field::Name)?.to_string(),
        address,
        parent: required(row, layout, Field::Parent)?.to_string(),
        stats,
    })
}

/// The row's value for `field`; empty when the layout lacks the field.
fn value<'r>(row: &'r csv::StringRecord, layout: &Layout, field: Field) -> &'r str {
    layout
        .index_of(field)
        .and_then(|i| row.get(i))
        .unwrap_or("")
}

fn required<'r>(
    row: &'r csv::StringRecord,
    layout: &Layout,
    field: Field,
) -> Result<&'r str, String> {
    match value(row, layout, field) {
        "" => Err(format!("missing {}", field.default_header())),
        v => Ok(v),
    }
}

fn optional_number<T: std::str::FromStr>(value: &str, field: Field) -> Result<Option<T>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid {} '{}'", field.default_header(), value))
}

fn optional_bool(value: &str) -> Result<Option<bool>, String> {
    match value.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" => Ok(Some(true)),
        "false" | "0" => Ok(Some(false)),
        _ => Err(format!("invalid HasMergedCells '{}'", value)),
    }
}

fn write_records<W: Write>(
    writer: W,
    records: &[RangeRecord],
    layout: &Layout,
    path: &Path,
) -> Result<csv::Writer<W>, SheetLabelError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let write_err = |source| SheetLabelError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    csv_writer
        .write_record(layout.headers())
        .map_err(write_err)?;
    for record in records {
        let row: Vec<String> = layout
            .columns()
            .iter()
            .map(|c| field_value(record, c.field))
            .collect();
        csv_writer.write_record(&row).map_err(write_err)?;
    }
    Ok(csv_writer)
}

fn field_value(record: &RangeRecord, field: Field) -> String {
    fn opt<T: ToString>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_default()
    }
    match field {
        Field::SheetName => record.sheet_name.clone(),
        Field::SheetIndex => record.sheet_index.to_string(),
        Field::Label => record.label.name().to_string(),
        Field::Name => record.name.clone(),
        Field::Range => record.address.to_a1(),
        Field::Parent => record.parent.clone(),
        Field::TotalCells => opt(record.stats.total_cells),
        Field::EmptyCells => opt(record.stats.empty_cells),
        Field::ConstantCells => opt(record.stats.constant_cells),
        Field::FormulaCells => opt(record.stats.formula_cells),
        Field::HasMergedCells => opt(record.stats.has_merged_cells),
        Field::Rows => opt(record.stats.rows),
        Field::Columns => opt(record.stats.columns),
    }
}
