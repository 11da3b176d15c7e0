//! # Sparse vector
//!
//! Wrapping a `Vec<(usize, _)>`, fixed size.
use std::fmt;
use std::fmt::Display;
use std::ops::{AddAssign, Deref, Mul};
use std::slice::Iter;

use num_traits::Zero;

use crate::data::linear_algebra::SparseTuple;

/// A sparse vector using a `Vec` with (row, value) combinations as back-end. Indices start at
/// `0`.
///
/// Entries are sorted by index and unique. Zero values are never stored.
#[derive(Eq, PartialEq, Clone, Debug, Default)]
pub struct Sparse<F> {
    data: Vec<SparseTuple<F>>,
    len: usize,
}

impl<F> Sparse<F> {
    /// Create a vector of length `len` from `data`.
    ///
    /// Requires that values equal to zero are already filtered.
    pub fn new(data: Vec<SparseTuple<F>>, len: usize) -> Self
    where
        F: Zero,
    {
        debug_assert!(data.iter().all(|&(i, _)| i < len));
        debug_assert!(data.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(data.iter().all(|(_, v)| !v.is_zero()));

        Self { data, len }
    }

    /// Iterate over the nonzero values and their indices.
    pub fn iter(&self) -> Iter<'_, SparseTuple<F>> {
        self.data.iter()
    }

    /// The length of this vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this vector has zero size.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<F: Zero + Copy> Sparse<F> {
    /// Expand into a dense `Vec` of length `len`.
    pub fn to_dense(&self) -> Vec<F> {
        let mut dense = vec![F::zero(); self.len];
        for &(i, v) in &self.data {
            dense[i] = v;
        }
        dense
    }

    /// Inner product with a dense slice of the same length.
    pub fn inner_product(&self, dense: &[F]) -> F
    where
        F: Mul<Output = F> + AddAssign,
    {
        debug_assert_eq!(dense.len(), self.len);

        let mut total = F::zero();
        for &(i, v) in &self.data {
            total += v * dense[i];
        }
        total
    }
}

impl Sparse<f64> {
    /// Collect the values of a dense slice that are larger than `tolerance` in absolute value.
    pub fn from_dense_with_tolerance(values: &[f64], tolerance: f64) -> Self {
        let data = values.iter()
            .enumerate()
            .filter(|(_, v)| v.abs() > tolerance)
            .map(|(i, &v)| (i, v))
            .collect();

        Self::new(data, values.len())
    }
}

impl<F> Deref for Sparse<F> {
    type Target = [SparseTuple<F>];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<F: Display> Display for Sparse<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (position, (i, v)) in self.data.iter().enumerate() {
            if position > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", i, v)?;
        }
        write!(f, "] (len {})", self.len)
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::vector::SparseVector;

    #[test]
    fn tolerance() {
        let v = SparseVector::from_dense_with_tolerance(&[1e-14, 3_f64, -1e-13, -1_f64], 1e-12);
        assert_eq!(&*v, &[(1, 3_f64), (3, -1_f64)]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.to_dense(), vec![0_f64, 3_f64, 0_f64, -1_f64]);
    }

    #[test]
    fn products() {
        let v = SparseVector::new(vec![(0, 3_f64), (2, 4_f64)], 3);
        assert_eq!(v.inner_product(&[1_f64, 100_f64, 0.5]), 5_f64);
        // Unstored entries are never multiplied
        assert_eq!(v.inner_product(&[1_f64, f64::INFINITY, 0.5]), 5_f64);
        assert_eq!(v.to_string(), "[0: 3, 2: 4] (len 3)");
    }
}
