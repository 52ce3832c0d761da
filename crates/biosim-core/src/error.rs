//! Engine configuration errors.
//!
//! All of these surface before a simulated year starts; once a year runs,
//! every phase completes.

use biosim_logic::landscape::Terrain;
use biosim_logic::ParamError;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Map text contains no rows.
    EmptyMap,
    /// Map row whose length differs from the first row.
    RaggedMap { row: usize, expected: usize, found: usize },
    /// Map letter that names no terrain.
    UnknownTerrain { symbol: char, row: usize, col: usize },
    /// Placement outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// Placement on Mountain or Ocean.
    Impassable { row: usize, col: usize, terrain: Terrain },
    /// One-based location with a zero component.
    InvalidLocation { row: usize, col: usize },
    /// Initial weight that is not a positive number.
    InvalidWeight { weight: f64 },
    Param(ParamError),
}

impl From<ParamError> for SimError {
    fn from(e: ParamError) -> Self {
        SimError::Param(e)
    }
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::EmptyMap => write!(f, "island map is empty"),
            SimError::RaggedMap { row, expected, found } => write!(
                f,
                "map row {} has {} cells, expected {}",
                row, found, expected
            ),
            SimError::UnknownTerrain { symbol, row, col } => write!(
                f,
                "\"{}\" at row {}, column {} is not a terrain letter (use J, S, D, M or O)",
                symbol, row, col
            ),
            SimError::OutOfBounds { row, col } => {
                write!(f, "cell ({}, {}) is outside the island", row, col)
            }
            SimError::Impassable { row, col, terrain } => {
                write!(f, "cell ({}, {}) is {} and cannot hold animals", row, col, terrain)
            }
            SimError::InvalidLocation { row, col } => {
                write!(f, "location ({}, {}) is not one-based", row, col)
            }
            SimError::InvalidWeight { weight } => {
                write!(f, "initial weight {} must be positive", weight)
            }
            SimError::Param(e) => write!(f, "Parameter error: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Param(e) => Some(e),
            _ => None,
        }
    }
}
