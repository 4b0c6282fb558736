//! Validation report types for structured error reporting.
//!
//! A report is a flat list of issues, each with a severity, a stable code
//! and the tree node it concerns. It renders as text for people and
//! serializes to JSON for scripts.

use std::fmt;

use serde::Serialize;

/// The result of validating a workbook.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// All issues found during validation.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Raises every warning to an error.
    pub(crate) fn promote_warnings(&mut self) {
        for issue in &mut self.issues {
            issue.severity = Severity::Error;
        }
    }

    /// Issues carrying `code`.
    pub fn with_code(&self, code: IssueCode) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single validation issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious but structurally sound.
    Warning,
    /// The tree contradicts itself.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Containment
    /// A range nested in a table reaches outside the table's address.
    RangeOutsideTable,
    /// Two ranges with the same parent cover a common cell.
    OverlappingRanges,
    /// Two tables in the same sheet cover a common cell.
    OverlappingTables,

    // Emptiness
    /// The workbook has no worksheets.
    EmptyWorkbook,
    /// A table has no nested ranges.
    EmptyTable,
    /// A worksheet has neither tables nor ranges.
    EmptyWorksheet,

    // Statistics
    /// Row, column or cell counts disagree with the address.
    StatsSizeMismatch,
    /// Empty, constant and formula cells add up to more than the total.
    StatsCountOverflow,
}

/// The node an issue concerns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    Workbook,
    Worksheet { sheet: String },
    Table { sheet: String, table: String },
    Range { sheet: String, range: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Workbook => write!(f, "workbook"),
            IssueContext::Worksheet { sheet } => write!(f, "sheet '{}'", sheet),
            IssueContext::Table { sheet, table } => {
                write!(f, "table '{}' in sheet '{}'", table, sheet)
            }
            IssueContext::Range { sheet, range } => {
                write!(f, "range '{}' in sheet '{}'", range, sheet)
            }
        }
    }
}
