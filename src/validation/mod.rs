//! Workbook validation.
//!
//! The workbook already rejects structurally broken insertions. Validation
//! looks for what it lets through:
//! - Geometry that contradicts nesting (a table range outside its table)
//! - Overlapping siblings
//! - Empty containers
//! - Statistics that disagree with the address they describe

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::BTreeMap;

use crate::address::RangeAddress;
use crate::tree::{Dependent, ParentRef, RangeAnnotation, RangeStats, Workbook, Worksheet};

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, every warning is reported as an error.
    pub strict: bool,
}

/// Validates a workbook and returns a report of all issues found.
pub fn validate_workbook(workbook: &Workbook, opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();

    let mut sheet_count = 0;
    for sheet in workbook.worksheets() {
        sheet_count += 1;
        validate_sheet(sheet, &mut report);
    }
    if sheet_count == 0 {
        report.add(ValidationIssue::warning(
            IssueCode::EmptyWorkbook,
            "Workbook has no worksheets",
            IssueContext::Workbook,
        ));
    }
    if opts.strict {
        report.promote_warnings();
    }

    tracing::debug!(
        workbook = workbook.name(),
        strict = opts.strict,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validated workbook"
    );
    report
}

fn validate_sheet(sheet: &Worksheet, report: &mut ValidationReport) {
    let sheet_name = sheet.sheet_name();
    let tables = sheet.table_list();

    if tables.is_empty() && sheet.ranges().is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::EmptyWorksheet,
            "Worksheet has no tables or ranges",
            IssueContext::Worksheet {
                sheet: sheet_name.to_string(),
            },
        ));
    }

    for (i, table) in tables.iter().enumerate() {
        let context = IssueContext::Table {
            sheet: sheet_name.to_string(),
            table: table.name().to_string(),
        };
        if table.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyTable,
                "Table has no nested ranges",
                context.clone(),
            ));
        }
        validate_stats(table.stats(), &table.address(), context.clone(), report);

        for other in &tables[i + 1..] {
            if table.address().overlaps(&other.address()) {
                report.add(ValidationIssue::warning(
                    IssueCode::OverlappingTables,
                    format!(
                        "{} overlaps table '{}' at {}",
                        table.address(),
                        other.name(),
                        other.address()
                    ),
                    context.clone(),
                ));
            }
        }
    }

    let mut siblings: BTreeMap<&ParentRef, Vec<&RangeAnnotation>> = BTreeMap::new();
    for range in sheet.ranges().iter() {
        let context = range_context(range);
        if let ParentRef::Table { table, .. } = range.parent() {
            if let Some(parent) = sheet.table(table) {
                if !parent.address().contains_range(&range.address()) {
                    report.add(ValidationIssue::error(
                        IssueCode::RangeOutsideTable,
                        format!(
                            "{} is not inside table '{}' at {}",
                            range.address(),
                            parent.name(),
                            parent.address()
                        ),
                        context.clone(),
                    ));
                }
            }
        }
        validate_stats(range.stats(), &range.address(), context, report);
        siblings.entry(range.parent()).or_default().push(range);
    }

    for group in siblings.values() {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if a.address().overlaps(&b.address()) {
                    report.add(ValidationIssue::warning(
                        IssueCode::OverlappingRanges,
                        format!(
                            "{} overlaps sibling '{}' at {}",
                            a.address(),
                            b.name(),
                            b.address()
                        ),
                        range_context(a),
                    ));
                }
            }
        }
    }
}

fn range_context(range: &RangeAnnotation) -> IssueContext {
    IssueContext::Range {
        sheet: range.sheet_name().to_string(),
        range: range.name().to_string(),
    }
}

/// Checks the optional statistics of a range or table against its address.
fn validate_stats(
    stats: &RangeStats,
    address: &RangeAddress,
    context: IssueContext,
    report: &mut ValidationReport,
) {
    let mut mismatches = Vec::new();
    if let Some(rows) = stats.rows.filter(|r| *r != address.rows()) {
        mismatches.push(format!("Rows={} but address spans {}", rows, address.rows()));
    }
    if let Some(columns) = stats.columns.filter(|c| *c != address.columns()) {
        mismatches.push(format!(
            "Columns={} but address spans {}",
            columns,
            address.columns()
        ));
    }
    if let Some(total) = stats.total_cells.filter(|t| *t != address.cell_count()) {
        mismatches.push(format!(
            "TotalCells={} but address covers {}",
            total,
            address.cell_count()
        ));
    }
    if !mismatches.is_empty() {
        report.add(ValidationIssue::warning(
            IssueCode::StatsSizeMismatch,
            mismatches.join("; "),
            context.clone(),
        ));
    }

    // u128 holds the sum of three u64 counts.
    let counted: u128 = [stats.empty_cells, stats.constant_cells, stats.formula_cells]
        .iter()
        .flatten()
        .map(|&n| u128::from(n))
        .sum();
    let total = stats.total_cells.unwrap_or_else(|| address.cell_count());
    if counted > u128::from(total) {
        report.add(ValidationIssue::warning(
            IssueCode::StatsCountOverflow,
            format!(
                "empty, constant and formula cells add up to {} of {} cells",
                counted, total
            ),
            context,
        ));
    }
}
