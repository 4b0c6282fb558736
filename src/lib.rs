//! Sheetlabel: geometry, containment and grouping for spreadsheet range
//! annotations.
//!
//! Annotated spreadsheets are described at three levels:
//! labeled cells, labeled rectangular regions, and a containment tree of
//! worksheets, tables, ranges and cells. This crate provides the geometry
//! shared by all three, the algorithm that turns labeled cells into
//! regions, and the tree with its tabular interchange format.
//!
//! # Modules
//!
//! - [`geom`]: Closed intervals on the line and axis-aligned rectangles
//! - [`label`]: The annotation label vocabulary
//! - [`address`]: A1-style cell and range addresses
//! - [`region`]: Label regions and row grouping
//! - [`tree`]: The workbook containment tree and its CSV interchange
//! - [`export`]: Flat per-annotation export rows
//! - [`validation`]: Workbook validation and error reporting
//! - [`error`]: Error types for sheetlabel operations

pub mod address;
pub mod error;
pub mod export;
pub mod geom;
pub mod label;
pub mod region;
pub mod tree;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use address::{CellAddress, RangeAddress};
pub use error::SheetLabelError;
pub use geom::{Interval1D, Interval2D};
pub use label::Label;
pub use region::LabelRegion;
pub use tree::Workbook;

/// The sheetlabel CLI application.
#[derive(Parser)]
#[command(name = "sheetlabel")]
#[command(version, author, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an annotation ranges CSV for errors and warnings.
    Validate(ValidateArgs),
    /// Flatten an annotation ranges CSV into per-annotation export rows.
    Export(ExportArgs),
    /// Group labeled cells into label regions.
    Group(GroupArgs),
}

#[derive(clap::Args)]
struct ValidateArgs {
    /// Annotation ranges CSV to validate.
    input: PathBuf,

    /// JSON file describing a non-standard column layout.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Annotation ranges CSV to export.
    input: PathBuf,

    /// Output CSV file.
    #[arg(long)]
    out: PathBuf,

    /// Value of the FileName column (defaults to the input file name).
    #[arg(long)]
    file_name: Option<String>,

    /// JSON file describing a non-standard column layout.
    #[arg(long)]
    layout: Option<PathBuf>,
}

#[derive(clap::Args)]
struct GroupArgs {
    /// CSV of labeled cells with columns row,column,label.
    input: PathBuf,

    /// Output CSV file.
    #[arg(long)]
    out: PathBuf,

    /// Merge aligned runs of consecutive rows into multi-row regions.
    #[arg(long)]
    stack: bool,

    /// Coordinates of the output regions ('original' or 'dense').
    #[arg(long, default_value = "original")]
    index_mode: String,

    /// Sheet name written to the export rows.
    #[arg(long, default_value = "Sheet1")]
    sheet: String,

    /// Sheet index written to the export rows.
    #[arg(long, default_value_t = 0)]
    sheet_index: u32,
}

/// Run the sheetlabel CLI on parsed arguments.
///
/// This is the main entry point for the CLI, called from `main.rs` once
/// logging is set up.
pub fn run(cli: Cli) -> Result<(), SheetLabelError> {
    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Group(args)) => run_group(args),
        None => {
            println!("sheetlabel {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Geometry, containment and grouping for spreadsheet range annotations.");
            println!();
            println!("Run 'sheetlabel --help' for usage information.");
            Ok(())
        }
    }
}

fn load_layout(path: Option<&Path>) -> Result<tree::Layout, SheetLabelError> {
    match path {
        Some(path) => tree::Layout::from_json_file(path),
        None => Ok(tree::Layout::default()),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), SheetLabelError> {
    let layout = load_layout(args.layout.as_deref())?;
    let workbook = tree::io_ranges_csv::read_ranges_csv(&args.input, &layout)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_workbook(&workbook, &opts);

    match args.output.as_str() {
        "json" => {
            let value = serde_json::json!({
                "workbook": workbook.name(),
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": &report.issues,
            });
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| SheetLabelError::Io(e.into()))?;
            println!("{}", text);
        }
        "text" => print!("{}", report),
        other => {
            return Err(SheetLabelError::UnsupportedFormat(format!(
                "output '{}' (supported: text, json)",
                other
            )));
        }
    }

    // Under --strict the report already carries warnings as errors.
    if !report.is_ok() {
        Err(SheetLabelError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn run_export(args: ExportArgs) -> Result<(), SheetLabelError> {
    let layout = load_layout(args.layout.as_deref())?;
    let workbook = tree::io_ranges_csv::read_ranges_csv(&args.input, &layout)?;
    let file_name = args.file_name.as_deref().unwrap_or_else(|| workbook.name());

    let rows = export::tree_export_rows(&workbook, file_name);
    export::write_export_csv(&args.out, &rows)?;
    println!(
        "Exported {} annotation(s) from {} to {}",
        rows.len(),
        args.input.display(),
        args.out.display()
    );
    Ok(())
}

fn run_group(args: GroupArgs) -> Result<(), SheetLabelError> {
    let mode = match args.index_mode.as_str() {
        "original" => region::IndexMode::Original,
        "dense" => region::IndexMode::Dense,
        other => {
            return Err(SheetLabelError::UnsupportedFormat(format!(
                "index mode '{}' (supported: original, dense)",
                other
            )));
        }
    };

    let cells = region::io_cells_csv::read_cell_labels_csv(&args.input)?;
    let cell_count = cells.len();
    let matrix = region::LabelMatrix::from_cells(cells)?;
    let rows = region::group_row_intervals(&matrix, mode)?;
    let regions = if args.stack {
        region::stack_row_regions(&rows)
    } else {
        region::regions_by_label(&rows)
    };

    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out = export::region_export_rows(&file_name, &args.sheet, args.sheet_index, &regions)?;
    export::write_export_csv(&args.out, &out)?;
    println!(
        "Grouped {} cell(s) into {} region(s) in {}",
        cell_count,
        out.len(),
        args.out.display()
    );
    Ok(())
}
