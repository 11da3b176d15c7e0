//! # A revised simplex iteration engine
//!
//! Bounded linear programs `min c^T x` subject to `row_lower <= Ax <= row_upper` and
//! `col_lower <= x <= col_upper` are solved with a dual or primal revised simplex method that
//! maintains an LU factorization of the basis matrix, updated after every basis change.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;

#[cfg(test)]
mod tests;
