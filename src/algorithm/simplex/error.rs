//! # Solver errors
use thiserror::Error;

/// Failures that stop the engine from producing any result.
///
/// Outcomes of a solve, including limits being reached, are reported as a `SimplexStatus`
/// instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The factorization failed even after falling back to the all-logical basis.
    #[error("basis matrix is singular and could not be repaired")]
    SingularBasisFatal,
    /// The basis state does not describe a basis of the problem it is used with.
    #[error("basis is inconsistent with a problem of {num_col} columns and {num_row} rows: {reason}")]
    #[allow(missing_docs)]
    InconsistentBasis { num_col: usize, num_row: usize, reason: &'static str },
}
