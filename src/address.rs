//! A1-style cell and range addresses.
//!
//! Addresses are 0-based internally (`row = 0` is sheet row `1`, `column = 0`
//! is column `A`) and inclusive on both ends. Converting a [`RangeAddress`]
//! to an [`Interval2D`] switches to the exclusive-upper-bound grid
//! convention used by the geometry module, and back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SheetLabelError;
use crate::geom::{Interval1D, Interval2D};

/// Number of columns in a sheet (`A` through `XFD`).
pub const MAX_COLUMNS: u32 = 16_384;

/// Number of rows in a sheet.
pub const MAX_ROWS: u32 = 1_048_576;

/// A single cell, 0-based.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub column: u32,
}

impl CellAddress {
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// A cell at 0-based `row` and `column`, checked against the sheet size.
    pub fn checked(row: u32, column: u32) -> Result<Self, SheetLabelError> {
        let reason = if column >= MAX_COLUMNS {
            "column out of range"
        } else if row >= MAX_ROWS {
            "row out of range"
        } else {
            return Ok(Self::new(row, column));
        };
        Err(SheetLabelError::InvalidAddress {
            address: format!("row {row}, column {column}"),
            reason: reason.to_string(),
        })
    }

    /// Parses `B3` or `$B$3`. Column letters are case-insensitive.
    pub fn from_a1(text: &str) -> Result<Self, SheetLabelError> {
        let s = text.trim();
        let invalid = |reason: &str| SheetLabelError::InvalidAddress {
            address: text.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("empty reference"));
        }

        let bytes = s.as_bytes();
        let mut idx = 0usize;
        if bytes.first() == Some(&b'$') {
            idx += 1;
        }
        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(invalid("missing column"));
        }
        let col_end = idx;
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }
        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start {
            return Err(invalid("missing row"));
        }
        if idx != bytes.len() {
            return Err(invalid("trailing characters"));
        }

        let column = column_index(&s[col_start..col_end])
            .filter(|c| *c < MAX_COLUMNS)
            .ok_or_else(|| invalid("column out of range"))?;
        let row: u32 = s[row_start..idx]
            .parse()
            .ok()
            .filter(|r| (1..=MAX_ROWS).contains(r))
            .ok_or_else(|| invalid("row out of range"))?;

        Ok(Self::new(row - 1, column))
    }

    /// Formats as `B3`.
    pub fn to_a1(self) -> String {
        format!("{}{}", column_name(self.column), self.row + 1)
    }

    /// The unit grid cell covering this address.
    pub fn region(self) -> Interval2D {
        Interval2D::unit_cell(self.column, self.row)
    }
}

/// Column letters for a 0-based column index (`0 -> A`, `27 -> AB`).
pub fn column_name(column: u32) -> String {
    let mut n = u64::from(column) + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

/// 0-based column index for column letters, `None` on overflow or bad input.
pub fn column_index(letters: &str) -> Option<u32> {
    let mut col: u32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let v = u32::from(b.to_ascii_uppercase() - b'A') + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    col.checked_sub(1)
}

impl fmt::Debug for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellAddress({})", self.to_a1())
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

impl FromStr for CellAddress {
    type Err = SheetLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s)
    }
}

/// An inclusive rectangular block of cells, normalized so that `first` is the
/// top-left and `last` the bottom-right corner.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeAddress {
    first: CellAddress,
    last: CellAddress,
}

impl RangeAddress {
    /// Builds a range from any two opposite corners.
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            first: CellAddress::new(a.row.min(b.row), a.column.min(b.column)),
            last: CellAddress::new(a.row.max(b.row), a.column.max(b.column)),
        }
    }

    /// Builds a range from inclusive bounds.
    pub fn from_bounds(first_column: u32, first_row: u32, last_column: u32, last_row: u32) -> Self {
        Self::new(
            CellAddress::new(first_row, first_column),
            CellAddress::new(last_row, last_column),
        )
    }

    /// Parses `C1:F2` or a single cell such as `C1`.
    pub fn from_a1(text: &str) -> Result<Self, SheetLabelError> {
        let s = text.trim();
        if s.is_empty() {
            return Err(SheetLabelError::InvalidAddress {
                address: text.to_string(),
                reason: "empty range".to_string(),
            });
        }
        match s.split_once(':') {
            None => {
                let cell = CellAddress::from_a1(s)?;
                Ok(Self::new(cell, cell))
            }
            Some((a, b)) => Ok(Self::new(CellAddress::from_a1(a)?, CellAddress::from_a1(b)?)),
        }
    }

    /// Converts an exclusive-upper-bound grid rectangle back to cells.
    ///
    /// Fails unless every bound is a non-negative whole number and the
    /// rectangle covers at least one cell.
    pub fn from_region(region: &Interval2D) -> Result<Self, SheetLabelError> {
        let (x, y) = (region.x(), region.y());
        let bound = |v: f64| -> Option<u32> {
            (v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX)).then_some(v as u32)
        };
        let corners = (
            bound(x.min()),
            bound(y.min()),
            bound(x.max()).and_then(|v| v.checked_sub(1)),
            bound(y.max()).and_then(|v| v.checked_sub(1)),
        );
        match corners {
            (Some(c0), Some(r0), Some(c1), Some(r1)) if c1 >= c0 && r1 >= r0 => {
                Ok(Self::from_bounds(c0, r0, c1, r1))
            }
            _ => Err(SheetLabelError::InvalidAddress {
                address: region.to_string(),
                reason: "region does not cover whole grid cells".to_string(),
            }),
        }
    }

    #[inline]
    pub fn first(&self) -> CellAddress {
        self.first
    }

    #[inline]
    pub fn last(&self) -> CellAddress {
        self.last
    }

    pub fn first_column(&self) -> u32 {
        self.first.column
    }

    pub fn first_row(&self) -> u32 {
        self.first.row
    }

    pub fn last_column(&self) -> u32 {
        self.last.column
    }

    pub fn last_row(&self) -> u32 {
        self.last.row
    }

    /// Number of rows covered.
    pub fn rows(&self) -> u32 {
        self.last.row - self.first.row + 1
    }

    /// Number of columns covered.
    pub fn columns(&self) -> u32 {
        self.last.column - self.first.column + 1
    }

    /// Total number of cells covered.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows()) * u64::from(self.columns())
    }

    pub fn is_single_cell(&self) -> bool {
        self.first == self.last
    }

    /// Returns true if `cell` lies within the range.
    pub fn contains_cell(&self, cell: CellAddress) -> bool {
        (self.first.row..=self.last.row).contains(&cell.row)
            && (self.first.column..=self.last.column).contains(&cell.column)
    }

    /// Returns true if every cell of `that` lies within `self`.
    pub fn contains_range(&self, that: &RangeAddress) -> bool {
        self.contains_cell(that.first) && self.contains_cell(that.last)
    }

    /// Returns true if the two ranges share at least one cell.
    pub fn overlaps(&self, that: &RangeAddress) -> bool {
        self.first.row <= that.last.row
            && that.first.row <= self.last.row
            && self.first.column <= that.last.column
            && that.first.column <= self.last.column
    }

    /// The grid rectangle `[first_column, last_column + 1] x [first_row, last_row + 1]`.
    pub fn region(&self) -> Interval2D {
        let axis = |lo: u32, hi: u32| Interval1D::from_valid(f64::from(lo), f64::from(hi) + 1.0);
        Interval2D::new(
            axis(self.first.column, self.last.column),
            axis(self.first.row, self.last.row),
        )
    }

    /// Formats as `C1:F2`, or `C1` for a single cell.
    pub fn to_a1(&self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeAddress({self})")
    }
}

impl fmt::Display for RangeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}:{}", self.first, self.last)
        }
    }
}

impl FromStr for RangeAddress {
    type Err = SheetLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_a1(s)
    }
}

impl Serialize for RangeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RangeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_a1(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for CellAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_a1(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_a1() {
        let c = CellAddress::new(0, 0);
        assert_eq!(c.to_a1(), "A1");
        assert_eq!(CellAddress::from_a1("$A$1").unwrap(), c);

        let bc32 = CellAddress::new(31, 54);
        assert_eq!(bc32.to_a1(), "BC32");
        assert_eq!(CellAddress::from_a1("bc32").unwrap(), bc32);
    }

    #[test]
    fn test_checked_cell_bounds() {
        assert_eq!(
            CellAddress::checked(MAX_ROWS - 1, MAX_COLUMNS - 1).unwrap().to_a1(),
            "XFD1048576"
        );
        assert!(CellAddress::checked(0, MAX_COLUMNS).is_err());
        assert!(CellAddress::checked(MAX_ROWS, 0).is_err());
    }

    #[test]
    fn test_cell_a1_errors() {
        for bad in ["", "12", "A", "A0", "1A", "A1B", "XFE1", "A1048577"] {
            let err = CellAddress::from_a1(bad).unwrap_err();
            assert!(
                matches!(err, SheetLabelError::InvalidAddress { .. }),
                "{bad}: {err:?}"
            );
        }
        assert!(CellAddress::from_a1("XFD1048576").is_ok());
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        assert_eq!(column_index("AAA"), Some(702));
        assert_eq!(column_index(""), None);
    }

    #[test]
    fn test_range_parse_and_normalize() {
        let r = RangeAddress::from_a1("C1:F2").unwrap();
        assert_eq!(r.first(), CellAddress::new(0, 2));
        assert_eq!(r.last(), CellAddress::new(1, 5));
        assert_eq!(r.rows(), 2);
        assert_eq!(r.columns(), 4);
        assert_eq!(r.cell_count(), 8);
        assert_eq!(r.to_string(), "C1:F2");

        let flipped = RangeAddress::from_a1("F2:C1").unwrap();
        assert_eq!(flipped, r);

        let single = RangeAddress::from_a1("C3").unwrap();
        assert!(single.is_single_cell());
        assert_eq!(single.to_string(), "C3");
    }

    #[test]
    fn test_region_uses_exclusive_upper_bound() {
        let r = RangeAddress::from_a1("C1:F2").unwrap();
        let region = r.region();
        assert_eq!(region, Interval2D::from_bounds(2.0, 6.0, 0.0, 2.0).unwrap());
        assert_eq!(RangeAddress::from_region(&region).unwrap(), r);
    }

    #[test]
    fn test_from_region_rejects_fractional_or_empty() {
        let frac = Interval2D::from_bounds(0.5, 2.0, 0.0, 1.0).unwrap();
        assert!(RangeAddress::from_region(&frac).is_err());
        let empty = Interval2D::from_bounds(2.0, 2.0, 0.0, 1.0).unwrap();
        assert!(RangeAddress::from_region(&empty).is_err());
    }

    #[test]
    fn test_containment_and_overlap() {
        let table = RangeAddress::from_a1("A1:D10").unwrap();
        assert!(table.contains_range(&RangeAddress::from_a1("B2:C3").unwrap()));
        assert!(!table.contains_range(&RangeAddress::from_a1("C9:E11").unwrap()));
        assert!(table.overlaps(&RangeAddress::from_a1("C9:E11").unwrap()));
        assert!(!table.overlaps(&RangeAddress::from_a1("E1:E2").unwrap()));
        assert!(table.contains_cell(CellAddress::new(9, 3)));
    }
}
