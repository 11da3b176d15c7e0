//! # Constraint matrix access
//!
//! Column-wise and row-wise copies of `[A I]` and the products with it that an iteration needs.
//! Logical columns are unit vectors and are never stored explicitly in the structural part.
use rayon::prelude::*;

use crate::algorithm::simplex::options::PriceStrategy;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::LinearProgram;

/// Density of the multiplier vector below which `PriceStrategy::RowSwitch` prices row-wise.
const ROW_PRICE_DENSITY: f64 = 0.1;

/// Nonzeros of a column of `[A I]`.
#[derive(Debug, Copy, Clone)]
pub struct Column<'a> {
    index: &'a [usize],
    value: &'a [f64],
}

impl<'a> Column<'a> {
    /// Iterate over `(row, value)` pairs, sorted by row.
    pub fn iter(&self) -> impl Iterator<Item = SparseTuple<f64>> + 'a {
        self.index.iter().copied().zip(self.value.iter().copied())
    }

    /// Number of nonzeros.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the column has no nonzeros.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Access to the columns of `[A I]` for the factorization and the solves.
///
/// Variables `0..nr_columns()` are structural, the next `nr_rows()` are logical.
pub trait MatrixProvider: Sync {
    /// Number of structural columns.
    fn nr_columns(&self) -> usize;
    /// Number of rows, which equals the number of logical columns.
    fn nr_rows(&self) -> usize;
    /// Structural and logical columns together.
    fn nr_variables(&self) -> usize {
        self.nr_columns() + self.nr_rows()
    }

    /// Column `j` of `[A I]`.
    fn column(&self, j: usize) -> Column<'_>;

    /// Add `multiplier` times column `j` to a dense vector indexed by row.
    fn add_column_multiple(&self, j: usize, multiplier: f64, target: &mut [f64]) {
        debug_assert_eq!(target.len(), self.nr_rows());

        for (i, v) in self.column(j).iter() {
            target[i] += multiplier * v;
        }
    }

    /// Inner product of column `j` with a dense vector indexed by row.
    fn column_inner_product(&self, j: usize, dense: &[f64]) -> f64 {
        self.column(j).iter().map(|(i, v)| v * dense[i]).sum()
    }

    /// Compute `row_ap_j = a_j^T row_ep` for all variables, one column at a time.
    fn price_by_column(&self, row_ep: &[f64], row_ap: &mut [f64]) {
        debug_assert_eq!(row_ep.len(), self.nr_rows());
        debug_assert_eq!(row_ap.len(), self.nr_variables());

        for (j, value) in row_ap.iter_mut().enumerate() {
            *value = self.column_inner_product(j, row_ep);
        }
    }

    /// Compute `row_ap_j = a_j^T row_ep` for all variables by accumulating rows.
    fn price_by_row(&self, row_ep: &[f64], row_ap: &mut [f64]);
}

/// Both orientations of the constraint matrix of a `LinearProgram`.
#[derive(Debug, Clone, Default)]
pub struct SimplexMatrix {
    num_col: usize,
    num_row: usize,

    column_start: Vec<usize>,
    column_index: Vec<usize>,
    column_value: Vec<f64>,

    row_start: Vec<usize>,
    row_index: Vec<usize>,
    row_value: Vec<f64>,

    /// Row `i` of the logical part is `logical_index[i..=i]` with value `1`.
    logical_index: Vec<usize>,
    logical_value: Vec<f64>,
}

impl SimplexMatrix {
    /// Copy the column-wise matrix of `lp` and transpose it.
    pub fn new(lp: &LinearProgram) -> Self {
        let num_col = lp.nr_columns();
        let num_row = lp.nr_rows();
        let (start, index, value) = lp.column_wise();

        let mut row_count = vec![0; num_row];
        for &i in index {
            row_count[i] += 1;
        }
        let mut row_start = Vec::with_capacity(num_row + 1);
        row_start.push(0);
        for count in &row_count {
            row_start.push(row_start[row_start.len() - 1] + count);
        }

        let mut next = row_start[..num_row].to_vec();
        let mut row_index = vec![0; index.len()];
        let mut row_value = vec![0_f64; index.len()];
        for j in 0..num_col {
            for position in start[j]..start[j + 1] {
                let i = index[position];
                row_index[next[i]] = j;
                row_value[next[i]] = value[position];
                next[i] += 1;
            }
        }

        Self {
            num_col,
            num_row,
            column_start: start.to_vec(),
            column_index: index.to_vec(),
            column_value: value.to_vec(),
            row_start,
            row_index,
            row_value,
            logical_index: (0..num_row).collect(),
            logical_value: vec![1_f64; num_row],
        }
    }

    /// Nonzeros of structural row `i`, as `(column, value)` pairs sorted by column.
    pub fn row(&self, i: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        let range = self.row_start[i]..self.row_start[i + 1];
        self.row_index[range.clone()].iter().copied().zip(self.row_value[range].iter().copied())
    }

    /// Whether to price row-wise for a multiplier vector with `nonzeros` nonzeros.
    pub fn use_row_price(&self, strategy: PriceStrategy, nonzeros: usize) -> bool {
        match strategy {
            PriceStrategy::Column => false,
            PriceStrategy::Row => true,
            PriceStrategy::RowSwitch => (nonzeros as f64) < ROW_PRICE_DENSITY * self.num_row as f64,
        }
    }

    /// Column-wise pricing distributed over the threads of the current rayon pool.
    pub fn price_by_column_parallel(&self, row_ep: &[f64], row_ap: &mut [f64]) {
        debug_assert_eq!(row_ap.len(), self.nr_variables());

        row_ap.par_iter_mut().enumerate().for_each(|(j, value)| {
            *value = self.column_inner_product(j, row_ep);
        });
    }
}

impl MatrixProvider for SimplexMatrix {
    fn nr_columns(&self) -> usize {
        self.num_col
    }

    fn nr_rows(&self) -> usize {
        self.num_row
    }

    fn column(&self, j: usize) -> Column<'_> {
        debug_assert!(j < self.nr_variables());

        if j < self.num_col {
            let range = self.column_start[j]..self.column_start[j + 1];
            Column { index: &self.column_index[range.clone()], value: &self.column_value[range] }
        } else {
            let i = j - self.num_col;
            Column { index: &self.logical_index[i..=i], value: &self.logical_value[i..=i] }
        }
    }

    fn column_inner_product(&self, j: usize, dense: &[f64]) -> f64 {
        if j < self.num_col {
            let range = self.column_start[j]..self.column_start[j + 1];
            self.column_index[range.clone()].iter()
                .zip(&self.column_value[range])
                .map(|(&i, v)| v * dense[i])
                .sum()
        } else {
            dense[j - self.num_col]
        }
    }

    fn price_by_row(&self, row_ep: &[f64], row_ap: &mut [f64]) {
        debug_assert_eq!(row_ep.len(), self.num_row);
        debug_assert_eq!(row_ap.len(), self.nr_variables());

        let (structural, logical) = row_ap.split_at_mut(self.num_col);
        structural.fill(0_f64);
        for (i, &multiplier) in row_ep.iter().enumerate() {
            if multiplier != 0_f64 {
                for (j, v) in self.row(i) {
                    structural[j] += multiplier * v;
                }
            }
        }
        logical.copy_from_slice(row_ep);
    }
}
