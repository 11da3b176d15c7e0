//! # Data structures
//!
//! Problem definitions and the sparse containers they are built from.
pub mod linear_algebra;
pub mod linear_program;
