//! # LU decomposition
//!
//! `B` is factorized by elimination with row and column pivoting, giving lower and upper
//! triangular factors up to orderings. Basis changes after the factorization are represented by
//! a sequence of eta files that are applied after the triangular solves.
use std::fmt;
use std::fmt::Display;

use crate::algorithm::simplex::factorization::{BasisInverse, Singular};
use crate::algorithm::simplex::factorization::lower_upper::eta_file::EtaFile;
use crate::algorithm::simplex::matrix::MatrixProvider;
use crate::data::linear_algebra::SparseTuple;

mod decomposition;
mod eta_file;

/// Factorization of a basis matrix with product form updates.
#[derive(PartialEq, Clone, Debug)]
pub struct LUDecomposition {
    m: usize,
    /// Pivot `(row, position)` of each elimination step, in elimination order.
    pivots: Vec<(usize, usize)>,
    /// Per elimination step, the multiples `(row, ratio)` of the pivot row that were subtracted.
    ///
    /// Together these describe `L`, with ones on the diagonal implied.
    lower: Vec<Vec<SparseTuple<f64>>>,
    /// Per elimination step, the pivot row `(position, value)` without the pivot.
    upper: Vec<Vec<SparseTuple<f64>>>,
    /// Per elimination step, the pivot value.
    diagonal: Vec<f64>,

    updates: Vec<EtaFile>,
}

impl BasisInverse for LUDecomposition {
    fn identity(m: usize) -> Self {
        Self {
            m,
            pivots: (0..m).map(|i| (i, i)).collect(),
            lower: vec![Vec::new(); m],
            upper: vec![Vec::new(); m],
            diagonal: vec![1_f64; m],
            updates: Vec::new(),
        }
    }

    /// Factorize from scratch. `self` is left unchanged when the basis matrix is singular.
    fn invert(
        &mut self,
        basis_index: &[usize],
        matrix: &impl MatrixProvider,
        pivot_threshold: f64,
    ) -> Result<(), Singular> {
        debug_assert_eq!(basis_index.len(), matrix.nr_rows());

        let m = basis_index.len();
        let mut rows = vec![Vec::new(); m];
        for (position, &j) in basis_index.iter().enumerate() {
            for (i, value) in matrix.column(j).iter() {
                rows[i].push((position, value));
            }
        }

        *self = Self::rows(rows, pivot_threshold)?;
        Ok(())
    }

    fn forward_solve(&self, rhs: &mut [f64]) {
        debug_assert_eq!(rhs.len(), self.m);

        // Apply the row operations of the elimination
        for (&(r, _), ratios) in self.pivots.iter().zip(&self.lower) {
            let pivot_value = rhs[r];
            if pivot_value != 0_f64 {
                for &(i, ratio) in ratios {
                    rhs[i] -= ratio * pivot_value;
                }
            }
        }

        // Back substitution, from the last pivot to the first
        let mut result = vec![0_f64; self.m];
        for k in (0..self.m).rev() {
            let (r, c) = self.pivots[k];
            let mut value = rhs[r];
            for &(j, u) in &self.upper[k] {
                value -= u * result[j];
            }
            result[c] = value / self.diagonal[k];
        }

        for eta in &self.updates {
            eta.apply_right(&mut result);
        }

        rhs.copy_from_slice(&result);
    }

    fn backward_solve(&self, rhs: &mut [f64]) {
        debug_assert_eq!(rhs.len(), self.m);

        for eta in self.updates.iter().rev() {
            eta.apply_left(rhs);
        }

        // Transposed upper triangle, from the first pivot to the last
        let mut result = vec![0_f64; self.m];
        for k in 0..self.m {
            let (r, c) = self.pivots[k];
            let value = rhs[c] / self.diagonal[k];
            result[r] = value;
            if value != 0_f64 {
                for &(j, u) in &self.upper[k] {
                    rhs[j] -= u * value;
                }
            }
        }

        // Transposed row operations, in reverse
        for k in (0..self.m).rev() {
            let (r, _) = self.pivots[k];
            let total = self.lower[k].iter().map(|&(i, ratio)| ratio * result[i]).sum::<f64>();
            result[r] -= total;
        }

        rhs.copy_from_slice(&result);
    }

    fn update(&mut self, column: &[f64], pivot_position: usize) {
        debug_assert_eq!(column.len(), self.m);

        self.updates.push(EtaFile::new(column, pivot_position));
    }

    fn nr_updates(&self) -> usize {
        self.updates.len()
    }
}

impl Display for LUDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LU decomposition of dimension {} with {} updates", self.m, self.updates.len())?;
        for (k, &(r, c)) in self.pivots.iter().enumerate() {
            writeln!(
                f,
                "{}: pivot ({}, {}) = {}, L: {:?}, U: {:?}",
                k, r, c, self.diagonal[k], self.lower[k], self.upper[k],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use crate::algorithm::simplex::factorization::BasisInverse;
    use crate::algorithm::simplex::factorization::lower_upper::LUDecomposition;
    use crate::algorithm::simplex::matrix::{MatrixProvider, SimplexMatrix};
    use crate::data::linear_program::LinearProgram;

    fn dense_product(columns: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
        let m = x.len();
        (0..m).map(|i| (0..m).map(|j| columns[j][i] * x[j]).sum()).collect()
    }

    fn dense_transposed_product(columns: &[Vec<f64>], y: &[f64]) -> Vec<f64> {
        columns.iter().map(|column| column.iter().zip(y).map(|(a, b)| a * b).sum()).collect()
    }

    fn columns_as_rows(columns: &[Vec<f64>]) -> Vec<Vec<(usize, f64)>> {
        let m = columns.len();
        (0..m)
            .map(|i| (0..m).filter(|&j| columns[j][i] != 0_f64).map(|j| (j, columns[j][i])).collect())
            .collect()
    }

    fn example() -> Vec<Vec<f64>> {
        vec![
            vec![2_f64, 0_f64, 4_f64, 0_f64],
            vec![1_f64, 3_f64, 0_f64, 0_f64],
            vec![0_f64, 1_f64, 1_f64, 5_f64],
            vec![0_f64, 0_f64, 2_f64, 1_f64],
        ]
    }

    #[test]
    fn solves() {
        let columns = example();
        let lu = LUDecomposition::rows(columns_as_rows(&columns), 0.1).unwrap();

        let b = vec![1_f64, -2_f64, 3_f64, 0.5];
        let mut x = b.clone();
        lu.forward_solve(&mut x);
        for (computed, expected) in dense_product(&columns, &x).into_iter().zip(&b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }

        let c = vec![0.5, 1_f64, 0_f64, -1_f64];
        let mut y = c.clone();
        lu.backward_solve(&mut y);
        for (computed, expected) in dense_transposed_product(&columns, &y).into_iter().zip(&c) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn identity() {
        let lu = LUDecomposition::identity(3);
        let mut x = vec![1_f64, 2_f64, 3_f64];
        lu.forward_solve(&mut x);
        assert_eq!(x, vec![1_f64, 2_f64, 3_f64]);
        lu.backward_solve(&mut x);
        assert_eq!(x, vec![1_f64, 2_f64, 3_f64]);
    }

    #[test]
    fn updated() {
        let mut columns = example();
        let mut lu = LUDecomposition::rows(columns_as_rows(&columns), 0.1).unwrap();

        // Replace the column at position 2
        let entering = vec![1_f64, 1_f64, 1_f64, 1_f64];
        let mut spike = entering.clone();
        lu.forward_solve(&mut spike);
        lu.update(&spike, 2);
        columns[2] = entering;
        assert_eq!(lu.nr_updates(), 1);

        let b = vec![3_f64, 1_f64, -1_f64, 2_f64];
        let mut x = b.clone();
        lu.forward_solve(&mut x);
        for (computed, expected) in dense_product(&columns, &x).into_iter().zip(&b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }

        let mut y = b.clone();
        lu.backward_solve(&mut y);
        for (computed, expected) in dense_transposed_product(&columns, &y).into_iter().zip(&b) {
            assert_abs_diff_eq!(computed, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn invert_from_matrix() {
        let lp = LinearProgram::from_dense_rows(
            &[0_f64; 2],
            &[(0_f64, 1_f64); 2],
            &[vec![1_f64, 2_f64], vec![3_f64, 0_f64]],
            &[(0_f64, 1_f64); 2],
        ).unwrap();
        let matrix = SimplexMatrix::new(&lp);

        // B = [[1, 0], [3, 1]]
        let mut lu = LUDecomposition::identity(2);
        lu.invert(&[0, 3], &matrix, 0.1).unwrap();
        assert_eq!(lu.nr_updates(), 0);
        let mut x = vec![1_f64, 5_f64];
        lu.forward_solve(&mut x);
        assert_abs_diff_eq!(x[0], 1_f64, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2_f64, epsilon = 1e-12);

        // B = [[2, 1], [0, 0]] has an empty second row
        let before = lu.clone();
        assert!(lu.invert(&[1, 2], &matrix, 0.1).is_err());
        assert_eq!(lu, before);
    }
}
