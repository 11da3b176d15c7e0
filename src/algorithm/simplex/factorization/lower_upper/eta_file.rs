//! # Product form update
//!
//! After a basis change, `B_new = B E` where `E` is the identity with the forward solved entering
//! column in place of column `p`. The inverse of `E` is applied after the solves with the
//! factorization.

/// Eta column with the pivot element stored separately.
#[derive(PartialEq, Clone, Debug)]
pub struct EtaFile {
    /// Off-pivot values `(i, alpha_i)` of the entering column, sorted by index.
    values: Vec<(usize, f64)>,
    pivot: usize,
    pivot_value: f64,
    len: usize,
}

/// Values of at most this size are not stored.
const DROP_TOLERANCE: f64 = 1e-14;

impl EtaFile {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `column`: Dense forward solved entering column.
    /// * `pivot`: Position at which the basis changes.
    pub fn new(column: &[f64], pivot: usize) -> Self {
        debug_assert!(pivot < column.len());
        debug_assert_ne!(column[pivot], 0_f64);

        let values = column.iter()
            .enumerate()
            .filter(|&(i, v)| i != pivot && v.abs() > DROP_TOLERANCE)
            .map(|(i, &v)| (i, v))
            .collect();

        Self {
            values,
            pivot,
            pivot_value: column[pivot],
            len: column.len(),
        }
    }

    /// Column-multiply with the inverse of this matrix, `x <- E^-1 x`.
    pub fn apply_right(&self, vector: &mut [f64]) {
        debug_assert_eq!(vector.len(), self.len);

        let x_p = vector[self.pivot] / self.pivot_value;
        vector[self.pivot] = x_p;
        if x_p != 0_f64 {
            for &(i, v) in &self.values {
                vector[i] -= v * x_p;
            }
        }
    }

    /// Row-multiply with the inverse of this matrix, `x <- E^-T x`.
    pub fn apply_left(&self, vector: &mut [f64]) {
        debug_assert_eq!(vector.len(), self.len);

        let mut total = vector[self.pivot];
        for &(i, v) in &self.values {
            total -= v * vector[i];
        }
        vector[self.pivot] = total / self.pivot_value;
    }
}
