//! # Certificates
//!
//! A finished solve can prove that the problem has no feasible point, with a dual ray, or that
//! the objective is unbounded, with a primal ray.
use crate::data::linear_algebra::vector::SparseVector;
use crate::data::linear_program::LinearProgram;

/// Entries of a ray smaller than this in absolute value are not stored.
pub(super) const RAY_DROP_TOLERANCE: f64 = 1e-14;
/// Values of `A^T v` that are smaller than this are treated as zero when bounding products.
const RAY_ZERO_TOLERANCE: f64 = 1e-9;

/// Row multipliers `v` such that no `x` within the column bounds has `v^T Ax` within the range
/// that the row bounds allow.
#[derive(Debug, Clone, PartialEq)]
pub struct DualRay {
    /// Basis position of the variable whose infeasibility was proven.
    pub row: usize,
    /// `1` if that variable was below its lower bound, `-1` if it was above its upper bound.
    pub sign: f64,
    /// `v`, indexed by row.
    pub multipliers: SparseVector<f64>,
}

impl DualRay {
    /// `min_x (A^T v)^T x - max_r v^T r` over the column and row bounds of `lp`.
    ///
    /// The ray proves infeasibility if this is positive.
    pub fn farkas_gap(&self, lp: &LinearProgram) -> f64 {
        debug_assert_eq!(self.multipliers.len(), lp.nr_rows());

        let dense = self.multipliers.to_dense();

        let column_part = (0..lp.nr_columns())
            .map(|j| {
                let z = lp.column_iter(j).map(|(i, v)| v * dense[i]).sum::<f64>();
                if z > RAY_ZERO_TOLERANCE {
                    z * lp.col_lower()[j]
                } else if z < -RAY_ZERO_TOLERANCE {
                    z * lp.col_upper()[j]
                } else {
                    0_f64
                }
            })
            .sum::<f64>();

        let worst_row_bounds = (0..lp.nr_rows())
            .map(|i| if dense[i] > 0_f64 { lp.row_upper()[i] } else { lp.row_lower()[i] })
            .collect::<Vec<_>>();
        let row_part = self.multipliers.inner_product(&worst_row_bounds);

        column_part - row_part
    }
}

/// A direction `d` of `[A I]` along which all bounds stay satisfied and the objective decreases.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimalRay {
    /// Nonbasic variable whose move was unlimited.
    pub column: usize,
    /// `1` if it increases along the ray, `-1` if it decreases.
    pub sign: f64,
    /// `d`, indexed by variable of `[A I]`.
    pub direction: SparseVector<f64>,
}

impl PrimalRay {
    /// Change in `c^T x` per unit step along the ray, negative for a valid ray.
    pub fn objective_slope(&self, lp: &LinearProgram) -> f64 {
        // Logical variables have no cost
        let mut cost = lp.col_cost().to_vec();
        cost.resize(self.direction.len(), 0_f64);
        self.direction.inner_product(&cost)
    }

    /// The part of the direction on the structural columns, dense.
    pub fn column_direction(&self, lp: &LinearProgram) -> Vec<f64> {
        let mut dense = self.direction.to_dense();
        dense.truncate(lp.nr_columns());
        dense
    }
}
