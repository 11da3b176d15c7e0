//! # Vectors
//!
//! Sparse vectors of fixed length, used for the certificates and the factor updates the engine
//! hands out.
pub use sparse::Sparse as SparseVector;

mod sparse;
