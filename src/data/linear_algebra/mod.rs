//! # Linear algebra primitives
//!
//! Sparse vectors and the tuple type they are built from. Dense vectors are plain `Vec<f64>`
//! values throughout the engine, which indexes into them directly.
pub mod vector;

/// Index and value of a nonzero in a sparse structure.
pub type SparseTuple<F> = (usize, F);
