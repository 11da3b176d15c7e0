//! # Dual edge weights
//!
//! Weights of the basis positions for choosing the leaving row. Steepest edge weights are
//! `||e_p^T B^-1||^2` and are kept exact under basis changes; Devex approximates them.
use crate::algorithm::simplex::options::DualEdgeWeightStrategy;

/// Steepest edge weights are kept at least this large.
const MIN_STEEPEST_EDGE_WEIGHT: f64 = 1e-4;
/// Devex iterations before the framework is reset, in addition to a minimum.
const MIN_DEVEX_ITERATIONS: usize = 25;
/// A stored Devex weight this many times larger than the recomputed one counts as bad.
const BAD_WEIGHT_FACTOR: f64 = 3_f64;
/// Number of bad Devex weights after which the framework is reset.
const MAX_BAD_WEIGHTS: usize = 3;

/// Weights of the basis positions.
#[derive(Debug, Clone)]
pub struct DualEdgeWeights {
    strategy: DualEdgeWeightStrategy,
    weight: Vec<f64>,
    num_devex_iterations: usize,
    max_devex_iterations: usize,
    num_bad_devex_weight: usize,
}

impl DualEdgeWeights {
    #[allow(missing_docs)]
    pub fn new(strategy: DualEdgeWeightStrategy, num_row: usize) -> Self {
        Self {
            strategy,
            weight: vec![1_f64; num_row],
            num_devex_iterations: 0,
            max_devex_iterations: MIN_DEVEX_ITERATIONS.max(num_row / 2),
            num_bad_devex_weight: 0,
        }
    }

    #[allow(missing_docs)]
    pub fn strategy(&self) -> DualEdgeWeightStrategy {
        self.strategy
    }

    /// Unit weights, with the current basis as the reference framework.
    pub fn reset(&mut self) {
        self.weight.fill(1_f64);
        self.num_devex_iterations = 0;
        self.num_bad_devex_weight = 0;
    }

    /// Exact weights, given the squared norms of the rows of `B^-1`.
    pub fn set_exact(&mut self, squared_norms: Vec<f64>) {
        debug_assert_eq!(squared_norms.len(), self.weight.len());

        self.weight = squared_norms;
        self.num_devex_iterations = 0;
        self.num_bad_devex_weight = 0;
    }

    #[allow(missing_docs)]
    pub fn weights(&self) -> &[f64] {
        &self.weight
    }

    /// Whether the approximate weights should be reset.
    pub fn needs_reset(&self) -> bool {
        self.strategy == DualEdgeWeightStrategy::Devex
            && (self.num_devex_iterations > self.max_devex_iterations
                || self.num_bad_devex_weight > MAX_BAD_WEIGHTS)
    }

    /// Compare the stored Devex weight of the leaving row with one computed from `row_ep`.
    ///
    /// The stored weight is replaced by the computed one.
    ///
    /// # Arguments
    ///
    /// * `row_out`: Position of the leaving variable.
    /// * `row_ep_squared_norm`: Squared norm of the pivotal row of `B^-1`.
    pub fn check_leaving(&mut self, row_out: usize, row_ep_squared_norm: f64) {
        if self.strategy != DualEdgeWeightStrategy::Devex {
            return;
        }

        let computed = row_ep_squared_norm.max(1_f64);
        if self.weight[row_out] > BAD_WEIGHT_FACTOR * computed {
            self.num_bad_devex_weight += 1;
        }
        self.weight[row_out] = computed;
    }

    /// Devex update after a basis change at `row_out`.
    ///
    /// # Arguments
    ///
    /// * `col_aq`: Forward solved entering column.
    /// * `alpha`: Pivot element `col_aq[row_out]`.
    pub fn update_devex(&mut self, row_out: usize, alpha: f64, col_aq: &[f64]) {
        let pivot_weight = self.weight[row_out];
        for (i, &value) in col_aq.iter().enumerate() {
            if i != row_out && value != 0_f64 {
                let ratio = value / alpha;
                self.weight[i] = self.weight[i].max(ratio * ratio * pivot_weight);
            }
        }
        self.weight[row_out] = (pivot_weight / (alpha * alpha)).max(1_f64);
        self.num_devex_iterations += 1;
    }

    /// Steepest edge update after a basis change at `row_out`.
    ///
    /// # Arguments
    ///
    /// * `col_aq`: Forward solved entering column.
    /// * `alpha`: Pivot element `col_aq[row_out]`.
    /// * `tau`: `B^-1 row_ep`, the forward solve of the pivotal row of `B^-1`.
    /// * `row_ep_squared_norm`: Exact weight of the pivotal row.
    pub fn update_steepest_edge(
        &mut self,
        row_out: usize,
        alpha: f64,
        col_aq: &[f64],
        tau: &[f64],
        row_ep_squared_norm: f64,
    ) {
        for (i, &value) in col_aq.iter().enumerate() {
            if i != row_out && value != 0_f64 {
                let ratio = value / alpha;
                let updated = self.weight[i] + ratio * (ratio * row_ep_squared_norm - 2_f64 * tau[i]);
                self.weight[i] = updated.max(MIN_STEEPEST_EDGE_WEIGHT).max(ratio * ratio);
            }
        }
        self.weight[row_out] = (row_ep_squared_norm / (alpha * alpha)).max(MIN_STEEPEST_EDGE_WEIGHT);
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use crate::algorithm::simplex::options::DualEdgeWeightStrategy;
    use crate::algorithm::simplex::strategy::dual_edge_weight::DualEdgeWeights;

    #[test]
    fn devex() {
        let mut weights = DualEdgeWeights::new(DualEdgeWeightStrategy::Devex, 3);
        weights.update_devex(1, 0.5, &[1_f64, 0.5, 0_f64]);
        assert_eq!(weights.weights(), &[4_f64, 4_f64, 1_f64]);
    }

    #[test]
    fn bad_weights() {
        let mut weights = DualEdgeWeights::new(DualEdgeWeightStrategy::Devex, 2);
        weights.check_leaving(0, 4_f64);
        assert_eq!(weights.weights()[0], 4_f64);
        assert!(!weights.needs_reset());

        for _ in 0..4 {
            weights.weight[1] = 100_f64;
            weights.check_leaving(1, 0.5);
            assert_eq!(weights.weights()[1], 1_f64);
        }
        assert!(weights.needs_reset());

        weights.reset();
        assert!(!weights.needs_reset());
        assert_eq!(weights.weights(), &[1_f64, 1_f64]);
    }

    #[test]
    fn check_leaving_only_for_devex() {
        let mut weights = DualEdgeWeights::new(DualEdgeWeightStrategy::SteepestEdge, 1);
        weights.set_exact(vec![100_f64]);
        for _ in 0..4 {
            weights.check_leaving(0, 1_f64);
        }
        assert_eq!(weights.weights(), &[100_f64]);
        assert!(!weights.needs_reset());
    }

    #[test]
    fn steepest_edge_exact() {
        // B = I, entering column (1, 2) at position 0 gives B_new = [[1, 0], [2, 1]], whose
        // inverse has rows (1, 0) and (-2, 1).
        let mut weights = DualEdgeWeights::new(DualEdgeWeightStrategy::SteepestEdge, 2);
        weights.set_exact(vec![1_f64, 1_f64]);
        let row_ep = [1_f64, 0_f64];
        weights.update_steepest_edge(0, 1_f64, &[1_f64, 2_f64], &row_ep, 1_f64);

        assert_relative_eq!(weights.weights()[0], 1_f64);
        assert_relative_eq!(weights.weights()[1], 5_f64);
    }
}
