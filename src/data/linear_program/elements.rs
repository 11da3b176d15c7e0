//! # Building blocks to describe linear programs.
use crate::data::linear_algebra::SparseTuple;

/// A column of the constraint matrix together with its cost and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Coefficient in the objective function, which is minimized.
    pub cost: f64,
    /// May be `f64::NEG_INFINITY`.
    pub lower: f64,
    /// May be `f64::INFINITY`.
    pub upper: f64,
    /// Nonzero coefficients `(row, value)`, sorted by row index.
    pub coefficients: Vec<SparseTuple<f64>>,
}

impl Variable {
    /// Variable without bounds or coefficients.
    #[must_use]
    pub fn free(cost: f64) -> Self {
        Self {
            cost,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            coefficients: Vec::new(),
        }
    }

    /// Variable bounded below by zero, without coefficients.
    #[must_use]
    pub fn nonnegative(cost: f64) -> Self {
        Self { lower: 0_f64, ..Self::free(cost) }
    }

    /// Set the coefficients.
    #[must_use]
    pub fn with_coefficients(mut self, coefficients: Vec<SparseTuple<f64>>) -> Self {
        self.coefficients = coefficients;
        self
    }
}

/// Activity range `lower <= a_i^T x <= upper` of a constraint.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowBound {
    #[allow(missing_docs)]
    pub lower: f64,
    #[allow(missing_docs)]
    pub upper: f64,
}

impl RowBound {
    /// `a_i^T x = value`.
    #[must_use]
    pub fn equal(value: f64) -> Self {
        Self { lower: value, upper: value }
    }

    /// `a_i^T x >= value`.
    #[must_use]
    pub fn greater(value: f64) -> Self {
        Self { lower: value, upper: f64::INFINITY }
    }

    /// `a_i^T x <= value`.
    #[must_use]
    pub fn less(value: f64) -> Self {
        Self { lower: f64::NEG_INFINITY, upper: value }
    }
}

/// Which of the two bounds of a variable are finite.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BoundType {
    /// Neither bound is finite.
    Free,
    /// Only the lower bound is finite.
    Lower,
    /// Only the upper bound is finite.
    Upper,
    /// Both bounds are finite and differ.
    Boxed,
    /// Both bounds are finite and equal.
    Fixed,
}

impl BoundType {
    /// Classify a pair of bounds.
    #[must_use]
    pub fn of(lower: f64, upper: f64) -> Self {
        match (lower.is_finite(), upper.is_finite()) {
            (false, false) => Self::Free,
            (true, false) => Self::Lower,
            (false, true) => Self::Upper,
            (true, true) if lower == upper => Self::Fixed,
            (true, true) => Self::Boxed,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_program::elements::BoundType;

    #[test]
    fn classify() {
        assert_eq!(BoundType::of(f64::NEG_INFINITY, f64::INFINITY), BoundType::Free);
        assert_eq!(BoundType::of(0_f64, f64::INFINITY), BoundType::Lower);
        assert_eq!(BoundType::of(f64::NEG_INFINITY, 3_f64), BoundType::Upper);
        assert_eq!(BoundType::of(-1_f64, 3_f64), BoundType::Boxed);
        assert_eq!(BoundType::of(2_f64, 2_f64), BoundType::Fixed);
    }
}
