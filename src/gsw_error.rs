// Error type shared by the grid and the board

use std::fmt;

use crate::gsw_grid::Pos;

/// Errors raised by grid access and board construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Position outside the `rows` x `cols` area
    OutOfBounds { pos: Pos, rows: usize, cols: usize },
    /// More mines requested than the board can hold (one cell is always kept free)
    InvalidMineCount { mines: usize, max: usize },
    /// Zero rows or zero columns
    EmptyBoard,
    /// Rows or columns above `max`, or a cell count that overflows
    BoardTooLarge { rows: usize, cols: usize, max: usize },
    /// Backing storage length does not match rows * cols
    DimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfBounds { pos, rows, cols } => write!(
                f,
                "position ({}, {}) is outside the {}x{} board",
                pos.row, pos.col, rows, cols
            ),
            Error::InvalidMineCount { mines, max } => {
                write!(f, "{} mines requested, at most {} fit on this board", mines, max)
            }
            Error::EmptyBoard => write!(f, "board must have at least one row and one column"),
            Error::BoardTooLarge { rows, cols, max } => write!(
                f,
                "{}x{} board is too large, rows and columns are limited to {}",
                rows, cols, max
            ),
            Error::DimensionMismatch { expected, actual } => write!(
                f,
                "grid storage holds {} cells but the dimensions need {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for Error {}
