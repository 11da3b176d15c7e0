//! # Representing linear programs
//!
//! A bounded linear program in column-wise sparse form:
//!
//! `min c^T x + offset` subject to `row_lower <= Ax <= row_upper`, `col_lower <= x <= col_upper`.
//!
//! The simplex engine works with `[A I] x = 0`, where the logical variable of row `i` has bounds
//! `[-row_upper_i, -row_lower_i]` and zero cost. Accessors for that extended view are provided
//! here, so that the sign convention lives in a single place.
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_program::elements::{RowBound, Variable};
pub use crate::data::linear_program::error::ProblemError;

pub mod elements;
mod error;

/// Immutable problem definition, read by the engine but never modified by it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    num_col: usize,
    num_row: usize,

    col_cost: Vec<f64>,
    col_lower: Vec<f64>,
    col_upper: Vec<f64>,
    row_lower: Vec<f64>,
    row_upper: Vec<f64>,
    offset: f64,

    /// Column `j` occupies `start[j]..start[j + 1]` of `index` and `value`.
    start: Vec<usize>,
    index: Vec<usize>,
    value: Vec<f64>,
}

impl LinearProgram {
    /// Create a new linear program.
    ///
    /// # Arguments
    ///
    /// * `variables`: Columns with their costs, bounds and coefficients. Coefficients that are
    /// exactly zero are dropped.
    /// * `rows`: Activity range of each constraint.
    /// * `offset`: Constant added to the objective value.
    ///
    /// # Return value
    ///
    /// A `ProblemError` if indices are out of range or unsorted, or if any value is not usable.
    /// Bounds with `lower > upper` are accepted: the solver reports such a problem infeasible.
    pub fn new(
        variables: Vec<Variable>,
        rows: Vec<RowBound>,
        offset: f64,
    ) -> Result<Self, ProblemError> {
        let num_row = rows.len();
        let num_col = variables.len();

        let mut col_cost = Vec::with_capacity(num_col);
        let mut col_lower = Vec::with_capacity(num_col);
        let mut col_upper = Vec::with_capacity(num_col);
        let mut start = Vec::with_capacity(num_col + 1);
        let mut index = Vec::new();
        let mut value = Vec::new();

        start.push(0);
        for (j, variable) in variables.into_iter().enumerate() {
            if !variable.cost.is_finite() {
                return Err(ProblemError::NonFiniteCost(j));
            }
            check_bounds("column", j, variable.lower, variable.upper)?;

            let mut previous = None;
            for (i, v) in variable.coefficients {
                if i >= num_row {
                    return Err(ProblemError::RowIndexOutOfRange { column: j, row: i, num_row });
                }
                if previous.is_some_and(|p| p >= i) {
                    return Err(ProblemError::UnsortedColumn(j));
                }
                if !v.is_finite() {
                    return Err(ProblemError::NonFiniteCoefficient { column: j, row: i });
                }
                previous = Some(i);
                if v != 0_f64 {
                    index.push(i);
                    value.push(v);
                }
            }
            start.push(index.len());

            col_cost.push(variable.cost);
            col_lower.push(variable.lower);
            col_upper.push(variable.upper);
        }

        let mut row_lower = Vec::with_capacity(num_row);
        let mut row_upper = Vec::with_capacity(num_row);
        for (i, bound) in rows.into_iter().enumerate() {
            check_bounds("row", i, bound.lower, bound.upper)?;
            row_lower.push(bound.lower);
            row_upper.push(bound.upper);
        }

        Ok(Self {
            num_col,
            num_row,
            col_cost,
            col_lower,
            col_upper,
            row_lower,
            row_upper,
            offset,
            start,
            index,
            value,
        })
    }

    /// Create a linear program from dense constraint rows, mostly for small hand-made problems.
    ///
    /// # Arguments
    ///
    /// * `cost`: Objective coefficient of each column.
    /// * `column_bounds`: `(lower, upper)` of each column.
    /// * `rows`: Constraint rows, each of length `cost.len()`.
    /// * `row_bounds`: `(lower, upper)` of each row.
    pub fn from_dense_rows(
        cost: &[f64],
        column_bounds: &[(f64, f64)],
        rows: &[Vec<f64>],
        row_bounds: &[(f64, f64)],
    ) -> Result<Self, ProblemError> {
        debug_assert_eq!(cost.len(), column_bounds.len());
        debug_assert_eq!(rows.len(), row_bounds.len());

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cost.len()) {
            return Err(ProblemError::DenseRowLength { row: i, found: row.len(), expected: cost.len() });
        }

        let variables = cost.iter().zip(column_bounds).enumerate()
            .map(|(j, (&cost, &(lower, upper)))| Variable {
                cost,
                lower,
                upper,
                coefficients: rows.iter().enumerate()
                    .filter(|(_, row)| row[j] != 0_f64)
                    .map(|(i, row)| (i, row[j]))
                    .collect(),
            })
            .collect();
        let rows = row_bounds.iter()
            .map(|&(lower, upper)| RowBound { lower, upper })
            .collect();

        Self::new(variables, rows, 0_f64)
    }

    /// Number of structural columns.
    pub fn nr_columns(&self) -> usize {
        self.num_col
    }

    /// Number of constraints, which equals the number of logical variables.
    pub fn nr_rows(&self) -> usize {
        self.num_row
    }

    /// Structural and logical variables together.
    pub fn nr_variables(&self) -> usize {
        self.num_col + self.num_row
    }

    #[allow(missing_docs)]
    pub fn col_cost(&self) -> &[f64] {
        &self.col_cost
    }
    #[allow(missing_docs)]
    pub fn col_lower(&self) -> &[f64] {
        &self.col_lower
    }
    #[allow(missing_docs)]
    pub fn col_upper(&self) -> &[f64] {
        &self.col_upper
    }
    #[allow(missing_docs)]
    pub fn row_lower(&self) -> &[f64] {
        &self.row_lower
    }
    #[allow(missing_docs)]
    pub fn row_upper(&self) -> &[f64] {
        &self.row_upper
    }

    /// Constant term of the objective function.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Nonzeros of structural column `j` as parallel slices of row indices and values.
    pub fn column(&self, j: usize) -> (&[usize], &[f64]) {
        debug_assert!(j < self.num_col);

        let range = self.start[j]..self.start[j + 1];
        (&self.index[range.clone()], &self.value[range])
    }

    /// Iterate over the nonzeros of structural column `j`.
    pub fn column_iter(&self, j: usize) -> impl Iterator<Item = SparseTuple<f64>> + '_ {
        let (index, value) = self.column(j);
        index.iter().copied().zip(value.iter().copied())
    }

    /// Column-wise storage as `(start, index, value)`.
    pub fn column_wise(&self) -> (&[usize], &[usize], &[f64]) {
        (&self.start, &self.index, &self.value)
    }

    /// Number of nonzero coefficients in `A`.
    pub fn nr_nonzeros(&self) -> usize {
        self.index.len()
    }

    /// Cost of variable `j` of `[A I]`; logical variables cost nothing.
    pub fn variable_cost(&self, j: usize) -> f64 {
        if j < self.num_col { self.col_cost[j] } else { 0_f64 }
    }

    /// Lower bound of variable `j` of `[A I]`.
    pub fn variable_lower(&self, j: usize) -> f64 {
        if j < self.num_col { self.col_lower[j] } else { -self.row_upper[j - self.num_col] }
    }

    /// Upper bound of variable `j` of `[A I]`.
    pub fn variable_upper(&self, j: usize) -> f64 {
        if j < self.num_col { self.col_upper[j] } else { -self.row_lower[j - self.num_col] }
    }

    /// Index of a variable with `lower > upper`, structural ones first.
    pub fn inconsistent_bounds(&self) -> Option<usize> {
        (0..self.nr_variables()).find(|&j| self.variable_lower(j) > self.variable_upper(j))
    }
}

fn check_bounds(kind: &'static str, index: usize, lower: f64, upper: f64) -> Result<(), ProblemError> {
    if lower.is_nan() || upper.is_nan() || lower == f64::INFINITY || upper == f64::NEG_INFINITY {
        Err(ProblemError::InvalidBound { kind, index, lower, upper })
    } else {
        Ok(())
    }
}
