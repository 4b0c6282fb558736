//! Closed-interval geometry for grid annotations.
//!
//! Two value types live here:
//!
//! - [`Interval1D`]: a closed interval `[min, max]` on the number line.
//! - [`Interval2D`]: an axis-aligned rectangle built from an x- and a
//!   y-[`Interval1D`].
//!
//! # Grid Convention
//!
//! Regions derived from spreadsheet cells use 0-based coordinates with an
//! **exclusive** upper bound: the cell at column 2, row 0 is the rectangle
//! `[2, 3] x [0, 1]`. The y-axis grows downwards (row 0 is the top row), so
//! "above" means a smaller y-coordinate.
//!
//! # Validity
//!
//! Unlike a raw bounding box, intervals are validated at construction:
//! endpoints must be finite and ordered. Every operation therefore works on
//! well-formed values and never has to guard against NaN.

mod interval1d;
mod interval2d;

pub use interval1d::Interval1D;
pub use interval2d::Interval2D;
