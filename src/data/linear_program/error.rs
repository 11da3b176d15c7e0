//! # Problem validation errors
use thiserror::Error;

/// Reasons a problem definition is rejected before any solving happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("row index {row} of column {column} is out of range for {num_row} rows")]
    #[allow(missing_docs)]
    RowIndexOutOfRange { column: usize, row: usize, num_row: usize },
    #[error("row indices of column {0} are not strictly increasing")]
    #[allow(missing_docs)]
    UnsortedColumn(usize),
    #[error("coefficient in row {row} of column {column} is not finite")]
    #[allow(missing_docs)]
    NonFiniteCoefficient { column: usize, row: usize },
    #[error("cost of column {0} is not finite")]
    #[allow(missing_docs)]
    NonFiniteCost(usize),
    #[error("bounds [{lower}, {upper}] of {kind} {index} are not valid")]
    #[allow(missing_docs)]
    InvalidBound { kind: &'static str, index: usize, lower: f64, upper: f64 },
    #[error("dense row {row} has {found} entries, expected {expected}")]
    #[allow(missing_docs)]
    DenseRowLength { row: usize, found: usize, expected: usize },
}
