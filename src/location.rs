//! Grid coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of the field, addressed by row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
}

impl Location {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance (diagonal neighbours are at distance 1)
    #[inline]
    pub fn distance_to(&self, other: &Location) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// True if `other` is one of the 8 cells surrounding this one
    #[inline]
    pub fn is_adjacent(&self, other: &Location) -> bool {
        self.distance_to(other) == 1
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
