//! One-dimensional closed intervals.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::SheetLabelError;

/// A closed interval `[min, max]` containing both endpoints.
///
/// Intervals are immutable. Both endpoints are finite, `min <= max`, and a
/// negative zero endpoint is stored as `+0.0`.
#[derive(Clone, Copy, PartialEq)]
pub struct Interval1D {
    min: f64,
    max: f64,
}

impl Interval1D {
    /// Creates the closed interval `[min, max]`.
    ///
    /// # Errors
    /// Returns [`SheetLabelError::InvalidInterval`] if either endpoint is NaN or
    /// infinite, or if `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, SheetLabelError> {
        if min.is_nan() || max.is_nan() {
            return Err(invalid(min, max, "endpoints cannot be NaN"));
        }
        if min.is_infinite() || max.is_infinite() {
            return Err(invalid(min, max, "endpoints must be finite"));
        }
        if min > max {
            return Err(invalid(min, max, "min endpoint is greater than max endpoint"));
        }

        Ok(Self::from_valid(min, max))
    }

    /// Builds an interval from endpoints already known to be finite and ordered.
    pub(crate) fn from_valid(min: f64, max: f64) -> Self {
        debug_assert!(min.is_finite() && max.is_finite() && min <= max);
        // -0.0 == 0.0, so this maps -0.0 to +0.0 and leaves everything else alone
        let min = if min == 0.0 { 0.0 } else { min };
        let max = if max == 0.0 { 0.0 } else { max };
        Self { min, max }
    }

    /// The degenerate interval `[value, value]`.
    pub(crate) fn point(value: f64) -> Self {
        Self::from_valid(value, value)
    }

    /// Returns the min endpoint.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the max endpoint.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns the length of the interval (`max - min`).
    #[inline]
    pub fn length(&self) -> f64 {
        self.max - self.min
    }

    /// Returns the center point of the interval.
    #[inline]
    pub fn center(&self) -> f64 {
        (self.max - self.min) / 2.0 + self.min
    }

    /// Returns true if `x` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if the two intervals share at least one point.
    #[inline]
    pub fn intersects(&self, that: &Interval1D) -> bool {
        !(self.max < that.min) && !(that.max < self.min)
    }

    /// Returns the length of the overlap with `that`.
    ///
    /// The result is `-1.0` when the intervals are disjoint and `0.0` when
    /// they touch at a single point.
    pub fn length_of_intersection(&self, that: &Interval1D) -> f64 {
        match self.intersection(that) {
            Some(overlap) => overlap.length(),
            None => -1.0,
        }
    }

    /// Returns the overlap with `that`, or `None` if the intervals are disjoint.
    pub fn intersection(&self, that: &Interval1D) -> Option<Interval1D> {
        if !self.intersects(that) {
            return None;
        }
        Some(Self::from_valid(
            self.min.max(that.min),
            self.max.min(that.max),
        ))
    }

    /// Returns the parts of `self` lying outside the intersection with `that`.
    ///
    /// The result holds zero, one or two intervals in ascending order. When the
    /// intervals are disjoint it is exactly `[self]`.
    pub fn negative_intersection(&self, that: &Interval1D) -> Vec<Interval1D> {
        let Some(overlap) = self.intersection(that) else {
            return vec![*self];
        };

        let mut pieces = Vec::with_capacity(2);
        if self.min < overlap.min {
            pieces.push(Self::from_valid(self.min, overlap.min));
        }
        if self.max > overlap.max {
            pieces.push(Self::from_valid(overlap.max, self.max));
        }
        pieces
    }

    /// Returns the size of the gap between the two intervals.
    ///
    /// Zero when they intersect, otherwise the strictly positive distance
    /// between the closest endpoints.
    pub fn min_distance_from(&self, that: &Interval1D) -> f64 {
        if self.intersects(that) {
            return 0.0;
        }
        self.gap(that)
    }

    /// Gap between the intervals, zero when they touch or overlap.
    pub(crate) fn gap(&self, that: &Interval1D) -> f64 {
        (that.min - self.max).max(self.min - that.max).max(0.0)
    }

    /// The smallest interval covering both `self` and `that`.
    pub(crate) fn span(&self, that: &Interval1D) -> Interval1D {
        Self::from_valid(self.min.min(that.min), self.max.max(that.max))
    }

    /// Ascending order of min endpoint, breaking ties by max endpoint.
    pub fn min_endpoint_order(a: &Interval1D, b: &Interval1D) -> Ordering {
        a.min
            .total_cmp(&b.min)
            .then_with(|| a.max.total_cmp(&b.max))
    }

    /// Ascending order of max endpoint, breaking ties by min endpoint.
    pub fn max_endpoint_order(a: &Interval1D, b: &Interval1D) -> Ordering {
        a.max
            .total_cmp(&b.max)
            .then_with(|| a.min.total_cmp(&b.min))
    }

    /// Ascending order of length.
    pub fn length_order(a: &Interval1D, b: &Interval1D) -> Ordering {
        a.length().total_cmp(&b.length())
    }
}

fn invalid(min: f64, max: f64, reason: &str) -> SheetLabelError {
    SheetLabelError::InvalidInterval {
        min,
        max,
        reason: reason.to_string(),
    }
}

// Endpoints are never NaN, so equality is reflexive.
impl Eq for Interval1D {}

impl Hash for Interval1D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.min.to_bits().hash(state);
        self.max.to_bits().hash(state);
    }
}

impl fmt::Debug for Interval1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval1D[{}, {}]", self.min, self.max)
    }
}

impl fmt::Display for Interval1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl Serialize for Interval1D {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Interval1D", 2)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("max", &self.max)?;
        state.end()
    }
}

// Deserialization goes through `new` so that invalid intervals are rejected
impl<'de> Deserialize<'de> for Interval1D {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct IntervalData {
            min: f64,
            max: f64,
        }
        let data = IntervalData::deserialize(deserializer)?;
        Interval1D::new(data.min, data.max).map_err(serde::de::Error::custom)
    }
}
