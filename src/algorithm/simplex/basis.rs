//! # Simplex basis
//!
//! Which variables of `[A I]` are basic, and in which direction the nonbasic ones may move.
use itertools::Itertools;

use crate::data::linear_program::elements::BoundType;

/// Direction in which a nonbasic variable may move away from its current value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NonbasicMove {
    /// At its lower bound.
    Up,
    /// At its upper bound.
    Down,
    /// Fixed, free at zero, or basic.
    Zero,
}

impl NonbasicMove {
    /// Sign of the direction as a number.
    pub fn sign(self) -> f64 {
        match self {
            NonbasicMove::Up => 1_f64,
            NonbasicMove::Down => -1_f64,
            NonbasicMove::Zero => 0_f64,
        }
    }

    /// A valid move for a variable with the given bounds, keeping `self` where possible.
    ///
    /// Boxed variables keep the bound they are at, other variables have only one option.
    pub fn corrected(self, lower: f64, upper: f64) -> Self {
        match BoundType::of(lower, upper) {
            BoundType::Free | BoundType::Fixed => NonbasicMove::Zero,
            BoundType::Lower => NonbasicMove::Up,
            BoundType::Upper => NonbasicMove::Down,
            BoundType::Boxed => match self {
                NonbasicMove::Down => NonbasicMove::Down,
                NonbasicMove::Up | NonbasicMove::Zero => NonbasicMove::Up,
            },
        }
    }

    /// Value a nonbasic variable with this move takes.
    pub fn value(self, lower: f64, upper: f64) -> f64 {
        match self {
            NonbasicMove::Up => lower,
            NonbasicMove::Down => upper,
            NonbasicMove::Zero if lower.is_finite() => lower,
            NonbasicMove::Zero if upper.is_finite() => upper,
            NonbasicMove::Zero => 0_f64,
        }
    }
}

/// A basis of `[A I]`, owned by the caller and modified in place by the engine.
///
/// Variables `0..num_col` are structural, `num_col..num_col + num_row` are the logicals.
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexBasis {
    /// Basic variable of each row position.
    pub basis_index: Vec<usize>,
    /// Whether each variable is nonbasic.
    pub nonbasic_flag: Vec<bool>,
    /// Move of each variable; `Zero` for basic ones.
    pub nonbasic_move: Vec<NonbasicMove>,
}

impl SimplexBasis {
    /// The basis of all logical variables, with structural variables at their lower bound.
    ///
    /// Moves are corrected by the engine against the actual bounds.
    pub fn all_slack(num_col: usize, num_row: usize) -> Self {
        let num_tot = num_col + num_row;

        let mut nonbasic_flag = vec![true; num_tot];
        let mut nonbasic_move = vec![NonbasicMove::Up; num_tot];
        for j in num_col..num_tot {
            nonbasic_flag[j] = false;
            nonbasic_move[j] = NonbasicMove::Zero;
        }

        Self {
            basis_index: (num_col..num_tot).collect(),
            nonbasic_flag,
            nonbasic_move,
        }
    }

    /// A basis with the given basic variables, all other variables nonbasic at their lower bound.
    ///
    /// # Arguments
    ///
    /// * `num_tot`: Number of structural and logical variables together.
    /// * `basis_index`: Basic variable of each row position.
    ///
    /// # Return value
    ///
    /// `None` if an index is out of range or appears twice.
    pub fn new(num_tot: usize, basis_index: Vec<usize>) -> Option<Self> {
        let mut nonbasic_flag = vec![true; num_tot];
        for &j in &basis_index {
            if j >= num_tot || !nonbasic_flag[j] {
                return None;
            }
            nonbasic_flag[j] = false;
        }
        let nonbasic_move = nonbasic_flag.iter()
            .map(|&nonbasic| if nonbasic { NonbasicMove::Up } else { NonbasicMove::Zero })
            .collect();

        Some(Self { basis_index, nonbasic_flag, nonbasic_move })
    }

    /// Number of rows of the basis matrix.
    pub fn nr_rows(&self) -> usize {
        self.basis_index.len()
    }

    /// Number of variables, basic and nonbasic.
    pub fn nr_variables(&self) -> usize {
        self.nonbasic_flag.len()
    }

    /// Whether variable `j` is basic.
    pub fn is_basic(&self, j: usize) -> bool {
        !self.nonbasic_flag[j]
    }

    /// Put the nonbasic `entering` at position `row`.
    ///
    /// # Return value
    ///
    /// The variable previously basic at `row`, which is now nonbasic with move `Zero` until
    /// `make_nonbasic` gives it a move.
    pub fn make_basic(&mut self, row: usize, entering: usize) -> usize {
        debug_assert!(self.nonbasic_flag[entering]);

        let leaving = self.basis_index[row];
        debug_assert!(!self.nonbasic_flag[leaving]);

        self.basis_index[row] = entering;
        self.nonbasic_flag[entering] = false;
        self.nonbasic_move[entering] = NonbasicMove::Zero;
        self.nonbasic_flag[leaving] = true;
        self.nonbasic_move[leaving] = NonbasicMove::Zero;

        leaving
    }

    /// Set the move of the nonbasic variable `j`.
    pub fn make_nonbasic(&mut self, j: usize, nonbasic_move: NonbasicMove) {
        debug_assert!(self.nonbasic_flag[j]);

        self.nonbasic_move[j] = nonbasic_move;
    }

    /// Replace the basic variable at `row` by the nonbasic `entering`, which makes the previously
    /// basic variable nonbasic with move `leaving_move`.
    ///
    /// # Return value
    ///
    /// The leaving variable.
    pub fn exchange(&mut self, row: usize, entering: usize, leaving_move: NonbasicMove) -> usize {
        let leaving = self.make_basic(row, entering);
        self.make_nonbasic(leaving, leaving_move);
        leaving
    }

    /// Number of logical variables in the basis.
    pub fn nr_basic_logicals(&self, num_col: usize) -> usize {
        self.basis_index.iter().filter(|&&j| j >= num_col).count()
    }

    /// Check the structure against the expected dimensions.
    ///
    /// # Return value
    ///
    /// A description of the first problem found, if any.
    pub fn check(&self, num_col: usize, num_row: usize) -> Result<(), &'static str> {
        let num_tot = num_col + num_row;

        if self.basis_index.len() != num_row {
            return Err("basis_index length differs from the number of rows");
        }
        if self.nonbasic_flag.len() != num_tot || self.nonbasic_move.len() != num_tot {
            return Err("nonbasic arrays differ in length from the number of variables");
        }
        if self.basis_index.iter().any(|&j| j >= num_tot) {
            return Err("basis_index refers to a variable out of range");
        }
        if !self.basis_index.iter().all_unique() {
            return Err("basis_index contains a variable twice");
        }
        if self.basis_index.iter().any(|&j| self.nonbasic_flag[j]) {
            return Err("basic variable is flagged nonbasic");
        }
        if self.nonbasic_flag.iter().filter(|&&nonbasic| !nonbasic).count() != num_row {
            return Err("number of basic variables differs from the number of rows");
        }
        if (0..num_tot).any(|j| !self.nonbasic_flag[j] && self.nonbasic_move[j] != NonbasicMove::Zero) {
            return Err("basic variable has a nonzero move");
        }

        Ok(())
    }

    /// Whether every row has exactly one basic variable and the flags agree with it.
    pub fn is_consistent(&self, num_col: usize, num_row: usize) -> bool {
        self.check(num_col, num_row).is_ok()
    }
}
