//! # Primal Devex
//!
//! Approximate steepest edge weights for the nonbasic variables, measured relative to a reference
//! framework: the set of variables that were nonbasic when the weights were last reset.
use crate::algorithm::simplex::options::PrimalEdgeWeightStrategy;

/// A stored weight this many times larger than the recomputed one counts as bad.
const BAD_WEIGHT_FACTOR: f64 = 3_f64;
/// Number of bad weights after which the framework is reset.
const MAX_BAD_WEIGHTS: usize = 3;
/// Iterations after which the framework is reset, in addition to a minimum.
const MIN_DEVEX_ITERATIONS: usize = 25;

/// Primal pricing weights.
#[derive(Debug, Clone)]
pub struct PrimalDevex {
    enabled: bool,
    /// Weight per variable, only meaningful for nonbasic ones.
    devex_weight: Vec<f64>,
    /// Whether each variable belongs to the reference framework.
    devex_index: Vec<bool>,
    num_devex_iterations: usize,
    max_devex_iterations: usize,
    num_bad_devex_weight: usize,
}

impl PrimalDevex {
    /// Unit weights for `num_tot` variables.
    pub fn new(strategy: PrimalEdgeWeightStrategy, num_tot: usize, num_row: usize) -> Self {
        let enabled = match strategy {
            PrimalEdgeWeightStrategy::Dantzig => false,
            PrimalEdgeWeightStrategy::Devex | PrimalEdgeWeightStrategy::SteepestEdge => true,
        };

        Self {
            enabled,
            devex_weight: vec![1_f64; num_tot],
            devex_index: vec![false; num_tot],
            num_devex_iterations: 0,
            max_devex_iterations: MIN_DEVEX_ITERATIONS.max(num_row / 2),
            num_bad_devex_weight: 0,
        }
    }

    /// Make the current nonbasic variables the reference framework, with unit weights.
    pub fn reset(&mut self, nonbasic_flag: &[bool]) {
        debug_assert_eq!(nonbasic_flag.len(), self.devex_weight.len());

        self.devex_weight.fill(1_f64);
        self.devex_index.copy_from_slice(nonbasic_flag);
        self.num_devex_iterations = 0;
        self.num_bad_devex_weight = 0;
    }

    /// Current weights of all variables.
    pub fn weights(&self) -> &[f64] {
        &self.devex_weight
    }

    /// Whether the weights are unreliable enough to start over.
    pub fn needs_reset(&self) -> bool {
        self.enabled
            && (self.num_devex_iterations > self.max_devex_iterations
                || self.num_bad_devex_weight > MAX_BAD_WEIGHTS)
    }

    /// Compare the stored weight of the entering variable with one computed from its column.
    ///
    /// # Arguments
    ///
    /// * `entering`: Nonbasic variable about to enter.
    /// * `col_aq`: Forward solved column of the entering variable.
    /// * `basis_index`: Basic variable of each position.
    pub fn check_entering(&mut self, entering: usize, col_aq: &[f64], basis_index: &[usize]) {
        if !self.enabled {
            return;
        }

        let mut computed = if self.devex_index[entering] { 1_f64 } else { 0_f64 };
        for (value, &basic) in col_aq.iter().zip(basis_index) {
            if self.devex_index[basic] {
                computed += value * value;
            }
        }
        let computed = computed.max(1_f64);

        if self.devex_weight[entering] > BAD_WEIGHT_FACTOR * computed {
            self.num_bad_devex_weight += 1;
        }
        self.devex_weight[entering] = computed;
    }

    /// Update the weights of the nonbasic variables after a basis change.
    ///
    /// # Arguments
    ///
    /// * `entering`: Variable that becomes basic.
    /// * `leaving`: Variable that becomes nonbasic.
    /// * `alpha`: Pivot element.
    /// * `row_ap`: Pivotal row for all variables.
    /// * `nonbasic_flag`: Before the basis change.
    pub fn update(&mut self, entering: usize, leaving: usize, alpha: f64, row_ap: &[f64], nonbasic_flag: &[bool]) {
        if !self.enabled {
            return;
        }

        let entering_weight = self.devex_weight[entering];
        for (j, &value) in row_ap.iter().enumerate() {
            if nonbasic_flag[j] && j != entering && value != 0_f64 {
                let ratio = value / alpha;
                self.devex_weight[j] = self.devex_weight[j].max(ratio * ratio * entering_weight);
            }
        }
        self.devex_weight[leaving] = (entering_weight / (alpha * alpha)).max(1_f64);
        self.num_devex_iterations += 1;
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::simplex::options::PrimalEdgeWeightStrategy;
    use crate::algorithm::simplex::strategy::devex::PrimalDevex;

    #[test]
    fn update() {
        let mut devex = PrimalDevex::new(PrimalEdgeWeightStrategy::Devex, 4, 2);
        let nonbasic = [true, true, false, false];
        devex.reset(&nonbasic);

        // Entering 0 at position 1, which holds variable 3
        devex.check_entering(0, &[0_f64, 2_f64], &[2, 3]);
        assert_eq!(devex.weights()[0], 1_f64);

        devex.update(0, 3, 2_f64, &[2_f64, 4_f64, 0_f64, 1_f64], &nonbasic);
        assert_eq!(devex.weights()[1], 4_f64);
        assert_eq!(devex.weights()[3], 1_f64);
        assert!(!devex.needs_reset());
    }

    #[test]
    fn bad_weights() {
        let mut devex = PrimalDevex::new(PrimalEdgeWeightStrategy::Devex, 3, 1);
        devex.reset(&[true, true, false]);
        for _ in 0..4 {
            devex.devex_weight[0] = 100_f64;
            devex.check_entering(0, &[0_f64], &[2]);
        }
        assert!(devex.needs_reset());

        devex.reset(&[true, true, false]);
        assert!(!devex.needs_reset());
    }

    #[test]
    fn dantzig() {
        let mut devex = PrimalDevex::new(PrimalEdgeWeightStrategy::Dantzig, 2, 1);
        devex.reset(&[true, false]);
        devex.update(0, 1, 0.5, &[0.5, 1_f64], &[true, false]);
        assert_eq!(devex.weights(), &[1_f64, 1_f64]);
    }
}
