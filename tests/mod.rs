//! # Integration tests
//!
//! Integration tests completely external from the crate. All code written in this module could be
//! written by an external user of the crate.
use relp_ekk::data::linear_program::LinearProgram;

mod certificate;
mod end_to_end;

/// `min -3x - 2y` subject to `x + y <= 4`, `x + 3y <= 6` and `x, y >= 0`.
fn two_by_two() -> LinearProgram {
    LinearProgram::from_dense_rows(
        &[-3_f64, -2_f64],
        &[(0_f64, f64::INFINITY), (0_f64, f64::INFINITY)],
        &[vec![1_f64, 1_f64], vec![1_f64, 3_f64]],
        &[(f64::NEG_INFINITY, 4_f64), (f64::NEG_INFINITY, 6_f64)],
    ).unwrap()
}
