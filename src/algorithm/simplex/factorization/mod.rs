//! # Basis factorization
//!
//! Solves with the basis matrix `B` and its transpose, and the bookkeeping after a basis change.
use thiserror::Error;

use crate::algorithm::simplex::matrix::MatrixProvider;

pub mod lower_upper;

/// The basis matrix could not be factorized.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("basis matrix is singular with rank {rank}, {} positions have no pivot", .missing_positions.len())]
pub struct Singular {
    /// Number of successful pivots.
    pub rank: usize,
    /// Basis positions without a pivot.
    pub missing_positions: Vec<usize>,
    /// Rows without a pivot.
    pub missing_rows: Vec<usize>,
}

/// Maintains a representation of `B^-1`.
///
/// Vectors indexed by row of the constraint matrix go into `forward_solve` and come out of
/// `backward_solve`; vectors indexed by basis position go the other way around.
pub trait BasisInverse {
    /// Representation of the identity matrix of dimension `m`.
    fn identity(m: usize) -> Self;

    /// Factorize the basis matrix with columns `basis_index` of `matrix`.
    ///
    /// # Arguments
    ///
    /// * `basis_index`: Basic variable of each position.
    /// * `matrix`: Columns of `[A I]`.
    /// * `pivot_threshold`: Minimum size of a pivot relative to the largest value in its column.
    ///
    /// # Return value
    ///
    /// `Singular` if no nonsingular factorization was found. The previous representation is
    /// lost in that case.
    fn invert(
        &mut self,
        basis_index: &[usize],
        matrix: &impl MatrixProvider,
        pivot_threshold: f64,
    ) -> Result<(), Singular>;

    /// Overwrite `rhs` (indexed by row) with `B^-1 rhs` (indexed by basis position).
    fn forward_solve(&self, rhs: &mut [f64]);

    /// Overwrite `rhs` (indexed by basis position) with `B^-T rhs` (indexed by row).
    fn backward_solve(&self, rhs: &mut [f64]);

    /// Record that the basic variable at `pivot_position` is replaced by the variable whose
    /// forward solved column is `column`.
    fn update(&mut self, column: &[f64], pivot_position: usize);

    /// Updates applied since the last `invert`.
    fn nr_updates(&self) -> usize;
}
