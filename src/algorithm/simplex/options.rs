//! # Solver options
//!
//! User-facing configuration and the clamped copy of it that the engine reads while iterating.
use std::time::Duration;

/// Which simplex variant to run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SimplexStrategy {
    /// Pick the variant from the state of the starting basis.
    Choose,
    /// Dual simplex, unless free nonbasic structural columns make it ill-defined.
    Dual,
    /// Primal simplex.
    Primal,
}

/// Weighting of the pricing candidates in the dual simplex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DualEdgeWeightStrategy {
    /// Unit weights.
    Dantzig,
    /// Approximate reference framework weights.
    Devex,
    /// Exact steepest edge weights, initialized by one backward solve per row.
    SteepestEdge,
}

/// Weighting of the pricing candidates in the primal simplex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimalEdgeWeightStrategy {
    /// Unit weights.
    Dantzig,
    /// Approximate reference framework weights.
    Devex,
    /// Not maintained separately, runs as `Devex`.
    SteepestEdge,
}

/// How the pivotal row is multiplied with the constraint matrix.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PriceStrategy {
    /// One inner product per column.
    Column,
    /// Accumulate the rows of the matrix that have a nonzero multiplier.
    Row,
    /// Row-wise when the multiplier vector is sparse, column-wise otherwise.
    RowSwitch,
}

/// Configuration of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Simplex variant.
    pub strategy: SimplexStrategy,
    /// Dual pricing weights.
    pub dual_edge_weight_strategy: DualEdgeWeightStrategy,
    /// Primal pricing weights.
    pub primal_edge_weight_strategy: PrimalEdgeWeightStrategy,
    /// Matrix multiplication in the pricing step.
    pub price_strategy: PriceStrategy,
    /// Relative size a pivot should have compared to the largest value in its column during
    /// factorization.
    pub factor_pivot_threshold: f64,
    /// Scales the cost perturbation of the dual simplex, `0` disables it.
    pub cost_perturbation_multiplier: f64,
    /// Number of factor updates after which the basis is reinverted.
    pub update_limit: usize,
    /// Bound violation that is still considered feasible.
    pub primal_feasibility_tolerance: f64,
    /// Reduced cost violation that is still considered feasible.
    pub dual_feasibility_tolerance: f64,
    /// Iterations over all phases within a single `solve`.
    pub iteration_limit: usize,
    /// Wall clock time for a single `solve`.
    pub time_limit: Option<Duration>,
    #[allow(missing_docs)]
    pub min_threads: usize,
    #[allow(missing_docs)]
    pub max_threads: usize,
    /// Requested number of threads, clamped into `[min_threads, max_threads]`.
    pub num_threads: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: SimplexStrategy::Choose,
            dual_edge_weight_strategy: DualEdgeWeightStrategy::Devex,
            primal_edge_weight_strategy: PrimalEdgeWeightStrategy::Devex,
            price_strategy: PriceStrategy::RowSwitch,
            factor_pivot_threshold: 0.1,
            cost_perturbation_multiplier: 1_f64,
            update_limit: 100,
            primal_feasibility_tolerance: 1e-7,
            dual_feasibility_tolerance: 1e-7,
            iteration_limit: usize::MAX,
            time_limit: None,
            min_threads: 1,
            max_threads: 8,
            num_threads: 1,
        }
    }
}

const MIN_PIVOT_THRESHOLD: f64 = 8e-4;
const MAX_PIVOT_THRESHOLD: f64 = 0.5;
const MIN_TOLERANCE: f64 = 1e-10;
const MAX_TOLERANCE: f64 = 1e-3;

impl Options {
    /// A copy with every value moved into its valid range.
    ///
    /// Out of range values are not an error; the adjustments are logged.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();

        normalized.factor_pivot_threshold = clamp_logged(
            "factor_pivot_threshold",
            self.factor_pivot_threshold,
            MIN_PIVOT_THRESHOLD,
            MAX_PIVOT_THRESHOLD,
        );
        normalized.primal_feasibility_tolerance = clamp_logged(
            "primal_feasibility_tolerance",
            self.primal_feasibility_tolerance,
            MIN_TOLERANCE,
            MAX_TOLERANCE,
        );
        normalized.dual_feasibility_tolerance = clamp_logged(
            "dual_feasibility_tolerance",
            self.dual_feasibility_tolerance,
            MIN_TOLERANCE,
            MAX_TOLERANCE,
        );
        if self.cost_perturbation_multiplier.is_nan() || self.cost_perturbation_multiplier < 0_f64 {
            log::warn!("cost_perturbation_multiplier {} replaced by 0", self.cost_perturbation_multiplier);
            normalized.cost_perturbation_multiplier = 0_f64;
        }
        normalized.update_limit = self.update_limit.max(1);

        normalized.min_threads = self.min_threads.max(1);
        normalized.max_threads = self.max_threads.max(normalized.min_threads);
        normalized.num_threads = self.num_threads.clamp(normalized.min_threads, normalized.max_threads);
        if normalized.num_threads != self.num_threads {
            log::warn!(
                "num_threads {} moved into [{}, {}]",
                self.num_threads, normalized.min_threads, normalized.max_threads,
            );
        }

        normalized
    }
}

fn clamp_logged(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        log::warn!("{} {} moved into [{}, {}]", name, value, min, max);
    }
    clamped
}

/// Values read by the engine on every iteration, taken from normalized `Options` once.
#[derive(Debug, Clone)]
pub(crate) struct Controls {
    pub strategy: SimplexStrategy,
    pub dual_edge_weight_strategy: DualEdgeWeightStrategy,
    pub primal_edge_weight_strategy: PrimalEdgeWeightStrategy,
    pub price_strategy: PriceStrategy,
    pub factor_pivot_threshold: f64,
    pub cost_perturbation_multiplier: f64,
    pub update_limit: usize,
    pub primal_feasibility_tolerance: f64,
    pub dual_feasibility_tolerance: f64,
    pub iteration_limit: usize,
    pub time_limit: Option<Duration>,
    pub num_threads: usize,
}

impl From<&Options> for Controls {
    fn from(options: &Options) -> Self {
        let options = options.normalized();

        Self {
            strategy: options.strategy,
            dual_edge_weight_strategy: options.dual_edge_weight_strategy,
            primal_edge_weight_strategy: options.primal_edge_weight_strategy,
            price_strategy: options.price_strategy,
            factor_pivot_threshold: options.factor_pivot_threshold,
            cost_perturbation_multiplier: options.cost_perturbation_multiplier,
            update_limit: options.update_limit,
            primal_feasibility_tolerance: options.primal_feasibility_tolerance,
            dual_feasibility_tolerance: options.dual_feasibility_tolerance,
            iteration_limit: options.iteration_limit,
            time_limit: options.time_limit,
            num_threads: options.num_threads,
        }
    }
}
