//! Grid coordinates and migration outcomes.

use serde::{Deserialize, Serialize};

/// Zero-based cell position, row first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Convert a one-based `(row, col)` location as used in population files.
    pub fn from_one_based(row: usize, col: usize) -> Option<Self> {
        if row == 0 || col == 0 {
            return None;
        }
        Some(Self::new(row - 1, col - 1))
    }

    pub fn north(self) -> Option<Self> {
        self.row.checked_sub(1).map(|row| Self::new(row, self.col))
    }

    pub fn south(self) -> Self {
        Self::new(self.row + 1, self.col)
    }

    pub fn west(self) -> Option<Self> {
        self.col.checked_sub(1).map(|col| Self::new(self.row, col))
    }

    pub fn east(self) -> Self {
        Self::new(self.row, self.col + 1)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Where a migrating animal ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// No reachable neighbor; the animal keeps its cell.
    Stay,
    Move(Coord),
}
