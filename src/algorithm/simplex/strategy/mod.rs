//! # Pricing strategies
//!
//! Choosing the leaving row and entering column, and the edge weights that scale those choices.
pub mod devex;
pub mod dual_edge_weight;
pub mod pricing;
