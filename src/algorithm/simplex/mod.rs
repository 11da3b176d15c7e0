//! # Revised simplex engine
//!
//! The engine owns the working arrays of a solve: costs, bounds and values of all variables of
//! `[A I]`, the factorization of the basis matrix, edge weights and the derived duals. The problem,
//! the basis and the options belong to the caller. The basis is updated in place, so that a later
//! solve after a change in costs or bounds starts from where the previous one ended.
//!
//! A solve runs the dual simplex when the starting basis is dual feasible (after flipping boxed
//! variables to their favorable bound), and the primal simplex otherwise. Either may hand over to
//! the primal simplex to clean up.
use std::time::Instant;

use enum_map::{Enum, EnumMap};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::algorithm::simplex::basis::SimplexBasis;
use crate::algorithm::simplex::error::SolverError;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::factorization::lower_upper::LUDecomposition;
use crate::algorithm::simplex::matrix::SimplexMatrix;
use crate::algorithm::simplex::observer::{NoObserver, SimplexObserver};
use crate::algorithm::simplex::options::{Controls, Options, SimplexStrategy};
use crate::algorithm::simplex::ray::{DualRay, PrimalRay};
use crate::algorithm::simplex::status::{Change, StatusFlags, Validity};
use crate::algorithm::simplex::strategy::devex::PrimalDevex;
use crate::algorithm::simplex::strategy::dual_edge_weight::DualEdgeWeights;
use crate::data::linear_program::LinearProgram;

pub mod basis;
pub mod error;
pub mod factorization;
pub mod matrix;
pub mod observer;
pub mod options;
pub mod ray;
pub mod status;
pub mod strategy;

mod dual;
mod pivot;
mod primal;
mod rebuild;
mod values;

/// Number of times the engine may switch between the dual and primal simplex in a solve before
/// it stays with the primal simplex.
const MAX_ALGORITHM_SWITCHES: usize = 3;
/// Number of numerical trouble events in a solve after which the engine gives up.
const MAX_NUMERICAL_TROUBLE: usize = 20;

/// Part of the simplex method an iteration belongs to.
#[allow(missing_docs)]
#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    DualPhase1,
    DualPhase2,
    PrimalPhase1,
    PrimalPhase2,
}

/// Outcome of a solve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SimplexStatus {
    /// No solve has finished yet.
    NotSet,
    /// Primal and dual feasible within tolerances.
    Optimal,
    /// No point satisfies all bounds; a dual ray proves it unless bounds were inconsistent.
    PrimalInfeasible,
    /// The objective decreases without bound along the primal ray.
    Unbounded,
    /// The iteration limit was reached.
    IterationLimit,
    /// The time limit was reached.
    TimeLimit,
    /// The basis matrix could not be factorized, even from the all-logical basis.
    SingularBasisFatal,
    /// Pivots stayed unreliable after repeated reinversion.
    NumericalTrouble,
}

/// Why all values are recomputed from a fresh factorization.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RebuildReason {
    /// Requested by the caller or needed before the first iteration.
    ValuesUnknown,
    /// The factorization reached the update limit.
    UpdateLimitReached,
    /// The last pivot was numerically unreliable.
    NumericalTrouble,
    /// Optimality is to be confirmed with fresh values.
    PossiblyOptimal,
    /// Primal infeasibility is to be confirmed with fresh values.
    PossiblyPrimalInfeasible,
    /// Unboundedness is to be confirmed with fresh values.
    PossiblyUnbounded,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Algorithm {
    Dual,
    Primal,
}

/// How an algorithm hands control back to `solve`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum LoopOutcome {
    Finished(SimplexStatus),
    SwitchToPrimal,
    /// The basis was replaced while repairing a singular factorization.
    Restart,
}

/// Number, maximum and sum of the infeasibilities of the current iterate.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Infeasibilities {
    #[allow(missing_docs)]
    pub num_primal: usize,
    #[allow(missing_docs)]
    pub max_primal: f64,
    #[allow(missing_docs)]
    pub sum_primal: f64,
    #[allow(missing_docs)]
    pub num_dual: usize,
    #[allow(missing_docs)]
    pub max_dual: f64,
    #[allow(missing_docs)]
    pub sum_dual: f64,
}

/// Revised simplex iteration engine.
///
/// Variables `0..num_col` are the structural columns of the problem, `num_col..num_tot` are the
/// logical variables of the rows.
pub struct SimplexEngine<'a, IM = LUDecomposition> {
    lp: &'a LinearProgram,
    basis: &'a mut SimplexBasis,
    options: &'a Options,
    controls: Controls,
    observer: Box<dyn SimplexObserver + 'a>,
    pool: Option<ThreadPool>,

    matrix: SimplexMatrix,
    factor: IM,
    status: StatusFlags,
    model_status: SimplexStatus,

    num_col: usize,
    num_row: usize,
    num_tot: usize,

    /// Costs and bounds of the problem being solved, which start out as those of `lp`.
    cost: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,

    /// Costs used in the iterations, perturbed or shifted.
    work_cost: Vec<f64>,
    work_dual: Vec<f64>,
    work_shift: Vec<f64>,
    /// Bounds used in the iterations; those of the auxiliary problem in dual phase 1.
    work_lower: Vec<f64>,
    work_upper: Vec<f64>,
    work_range: Vec<f64>,
    /// Values of the nonbasic variables.
    work_value: Vec<f64>,
    base_lower: Vec<f64>,
    base_upper: Vec<f64>,
    base_value: Vec<f64>,
    /// Fixed pseudo random numbers in `[0, 1)`, one per variable.
    random_value: Vec<f64>,

    col_aq: Vec<f64>,
    row_ep: Vec<f64>,
    row_ap: Vec<f64>,

    primal_devex: PrimalDevex,
    dual_edge_weights: DualEdgeWeights,

    dual_ray: Option<DualRay>,
    primal_ray: Option<PrimalRay>,
    ray_candidate: Option<RayCandidate>,

    iteration_count: EnumMap<Phase, usize>,
    /// `total_iterations` when the current solve started.
    solve_start_iteration: usize,
    num_basic_logicals: usize,
    costs_perturbed: bool,
    costs_shifted: bool,
    dual_phase_one_bounds: bool,
    rebuild_reason: Option<RebuildReason>,
    basis_repaired: bool,
    numerical_trouble_count: usize,
    infeasibilities: Infeasibilities,
    primal_objective_value: f64,
    dual_objective_value: f64,
    updated_objective_value: f64,
    start_time: Option<Instant>,
}

/// Certificate found by an algorithm, stored as a ray once the solve finishes.
#[derive(Debug, Clone)]
enum RayCandidate {
    Dual(DualRay),
    Primal(PrimalRay),
}

impl<'a> SimplexEngine<'a, LUDecomposition> {
    /// Create an engine for `lp`, starting from `basis`.
    ///
    /// Nothing is computed until `init` or `solve` is called.
    pub fn new(lp: &'a LinearProgram, basis: &'a mut SimplexBasis, options: &'a Options) -> Self {
        Self::with_factorization(lp, basis, options)
    }
}

impl<'a, IM: BasisInverse> SimplexEngine<'a, IM> {
    /// Create an engine using a specific basis inverse representation.
    pub fn with_factorization(lp: &'a LinearProgram, basis: &'a mut SimplexBasis, options: &'a Options) -> Self {
        let controls = Controls::from(options);
        let num_col = lp.nr_columns();
        let num_row = lp.nr_rows();
        let num_tot = num_col + num_row;

        let pool = if controls.num_threads > 1 {
            match ThreadPoolBuilder::new().num_threads(controls.num_threads).build() {
                Ok(pool) => Some(pool),
                Err(error) => {
                    log::warn!("could not start {} threads, running sequentially: {}", controls.num_threads, error);
                    None
                }
            }
        } else {
            None
        };

        let mut engine = Self {
            lp,
            basis,
            options,
            observer: Box::new(NoObserver),
            pool,

            matrix: SimplexMatrix::default(),
            factor: IM::identity(num_row),
            status: StatusFlags::default(),
            model_status: SimplexStatus::NotSet,

            num_col,
            num_row,
            num_tot,

            cost: (0..num_tot).map(|j| lp.variable_cost(j)).collect(),
            lower: (0..num_tot).map(|j| lp.variable_lower(j)).collect(),
            upper: (0..num_tot).map(|j| lp.variable_upper(j)).collect(),

            work_cost: Vec::new(),
            work_dual: Vec::new(),
            work_shift: Vec::new(),
            work_lower: Vec::new(),
            work_upper: Vec::new(),
            work_range: Vec::new(),
            work_value: Vec::new(),
            base_lower: Vec::new(),
            base_upper: Vec::new(),
            base_value: Vec::new(),
            random_value: Vec::new(),

            col_aq: Vec::new(),
            row_ep: Vec::new(),
            row_ap: Vec::new(),

            primal_devex: PrimalDevex::new(controls.primal_edge_weight_strategy, num_tot, num_row),
            dual_edge_weights: DualEdgeWeights::new(controls.dual_edge_weight_strategy, num_row),

            dual_ray: None,
            primal_ray: None,
            ray_candidate: None,

            iteration_count: EnumMap::default(),
            solve_start_iteration: 0,
            num_basic_logicals: 0,
            costs_perturbed: false,
            costs_shifted: false,
            dual_phase_one_bounds: false,
            rebuild_reason: None,
            basis_repaired: false,
            numerical_trouble_count: 0,
            infeasibilities: Infeasibilities::default(),
            primal_objective_value: 0_f64,
            dual_objective_value: 0_f64,
            updated_objective_value: 0_f64,
            start_time: None,

            controls,
        };
        engine.allocate_work_and_base_arrays();
        engine.status.set(Validity::HasFactorArrays);

        engine
    }

    /// Report progress to `observer` instead of discarding it.
    #[must_use]
    pub fn with_observer(mut self, observer: impl SimplexObserver + 'a) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Validate the basis, set up the working arrays and factorize the basis matrix.
    ///
    /// Calling this again without changes since the previous call is cheap.
    ///
    /// # Return value
    ///
    /// `SolverError::InconsistentBasis` if the basis does not fit the problem (a panic in debug
    /// builds), `SolverError::SingularBasisFatal` if no factorization could be found.
    pub fn init(&mut self) -> Result<(), SolverError> {
        if let Err(reason) = self.basis.check(self.num_col, self.num_row) {
            debug_assert!(false, "inconsistent basis: {}", reason);
            return Err(SolverError::InconsistentBasis { num_col: self.num_col, num_row: self.num_row, reason });
        }
        self.status.set(Validity::HasBasis);

        if !self.status.is_set(Validity::HasMatrixColWise) || !self.status.is_set(Validity::HasMatrixRowWise) {
            self.matrix = SimplexMatrix::new(self.lp);
            self.status.set(Validity::HasMatrixColWise);
            self.status.set(Validity::HasMatrixRowWise);
        }
        if !self.status.is_set(Validity::HasFactorArrays) {
            self.allocate_work_and_base_arrays();
            self.status.set(Validity::HasFactorArrays);
        }
        self.num_basic_logicals = self.basis.nr_basic_logicals(self.num_col);

        if !self.status.is_set(Validity::HasInvert) {
            self.initialise_working_problem();
            self.compute_factor()?;
        }
        if !self.status.is_set(Validity::HasEdgeWeights) {
            self.reset_edge_weights();
        }

        Ok(())
    }

    /// Solve the problem starting from the current basis.
    ///
    /// The basis is updated in place. Limits and numerical failures are reported as a status.
    ///
    /// # Return value
    ///
    /// The final status, or an error if the basis does not fit the problem.
    pub fn solve(&mut self) -> Result<SimplexStatus, SolverError> {
        self.start_time = Some(Instant::now());
        self.solve_start_iteration = self.total_iterations();
        self.numerical_trouble_count = 0;
        self.model_status = SimplexStatus::NotSet;
        self.ray_candidate = None;

        match self.init() {
            Ok(()) => {}
            Err(SolverError::SingularBasisFatal) => return Ok(self.finish(SimplexStatus::SingularBasisFatal)),
            Err(error) => return Err(error),
        }

        if let Some(j) = self.inconsistent_bounds() {
            log::info!("variable {} has lower bound {} above upper bound {}", j, self.lower[j], self.upper[j]);
            return Ok(self.finish(SimplexStatus::PrimalInfeasible));
        }

        self.initialise_working_problem();
        let mut algorithm = match self.choose_algorithm() {
            Ok(algorithm) => algorithm,
            Err(_) => return Ok(self.finish(SimplexStatus::SingularBasisFatal)),
        };

        let mut switches = 0;
        loop {
            log::debug!("running {:?} simplex", algorithm);
            let outcome = match algorithm {
                Algorithm::Dual => self.dual_solve(),
                Algorithm::Primal => self.primal_solve(),
            };

            match outcome {
                Ok(LoopOutcome::Finished(status)) => return Ok(self.finish(status)),
                Ok(LoopOutcome::SwitchToPrimal) => algorithm = Algorithm::Primal,
                Ok(LoopOutcome::Restart) => {
                    self.initialise_working_problem();
                    algorithm = match self.choose_algorithm() {
                        Ok(algorithm) => algorithm,
                        Err(_) => return Ok(self.finish(SimplexStatus::SingularBasisFatal)),
                    };
                }
                Err(_) => return Ok(self.finish(SimplexStatus::SingularBasisFatal)),
            }

            switches += 1;
            if switches > MAX_ALGORITHM_SWITCHES && algorithm == Algorithm::Dual {
                log::debug!("switched algorithms {} times, continuing with primal simplex", switches);
                algorithm = Algorithm::Primal;
            }
        }
    }

    /// Pick the simplex variant from the strategy and the state of the current basis.
    fn choose_algorithm(&mut self) -> Result<Algorithm, SolverError> {
        let free_nonbasic_structural = (0..self.num_col).any(|j| {
            self.basis.nonbasic_flag[j] && !self.lower[j].is_finite() && !self.upper[j].is_finite()
        });

        let algorithm = match self.controls.strategy {
            SimplexStrategy::Primal => Algorithm::Primal,
            SimplexStrategy::Dual if free_nonbasic_structural => {
                log::debug!("nonbasic free columns, using primal simplex instead of dual");
                Algorithm::Primal
            }
            SimplexStrategy::Dual => Algorithm::Dual,
            SimplexStrategy::Choose if free_nonbasic_structural => Algorithm::Primal,
            SimplexStrategy::Choose => {
                self.rebuild()?;
                if self.num_unflippable_dual_infeasibilities() == 0 {
                    Algorithm::Dual
                } else if self.infeasibilities.num_primal == 0 {
                    Algorithm::Primal
                } else {
                    Algorithm::Dual
                }
            }
        };

        Ok(algorithm)
    }

    /// Index of a variable whose lower bound exceeds its upper bound.
    fn inconsistent_bounds(&self) -> Option<usize> {
        (0..self.num_tot).find(|&j| self.lower[j] > self.upper[j])
    }

    /// Limit that was reached in the current solve, if any.
    fn reached_limit(&self) -> Option<SimplexStatus> {
        if self.total_iterations() - self.solve_start_iteration >= self.controls.iteration_limit {
            return Some(SimplexStatus::IterationLimit);
        }
        match (self.controls.time_limit, self.start_time) {
            (Some(limit), Some(start)) if start.elapsed() >= limit => Some(SimplexStatus::TimeLimit),
            _ => None,
        }
    }

    /// Count a numerical trouble event.
    ///
    /// # Return value
    ///
    /// `SimplexStatus::NumericalTrouble` if the engine should give up.
    fn register_numerical_trouble(&mut self) -> Option<SimplexStatus> {
        self.numerical_trouble_count += 1;
        (self.numerical_trouble_count > MAX_NUMERICAL_TROUBLE).then_some(SimplexStatus::NumericalTrouble)
    }

    /// Restore the true costs and bounds, bring all values up to date and record the outcome.
    fn finish(&mut self, mut status: SimplexStatus) -> SimplexStatus {
        if status != SimplexStatus::SingularBasisFatal && self.status.is_set(Validity::HasInvert) {
            if self.costs_perturbed || self.costs_shifted {
                self.initialise_cost(false);
                self.status.invalidate(Change::Costs);
            }
            if self.dual_phase_one_bounds {
                self.initialise_bound(false);
                self.initialise_nonbasic_work_value();
                self.status.invalidate(Change::Bounds);
            }
            if let Err(error) = self.rebuild() {
                log::warn!("final rebuild failed: {}", error);
                status = SimplexStatus::SingularBasisFatal;
            }
        }

        match self.ray_candidate.take() {
            Some(RayCandidate::Dual(ray)) if status == SimplexStatus::PrimalInfeasible => {
                self.dual_ray = Some(ray);
                self.status.set(Validity::HasDualRay);
            }
            Some(RayCandidate::Primal(ray)) if status == SimplexStatus::Unbounded => {
                self.primal_ray = Some(ray);
                self.status.set(Validity::HasPrimalRay);
            }
            _ => {}
        }

        self.model_status = status;
        log::info!(
            "simplex finished with {:?} after {} iterations, objective {}",
            status, self.total_iterations(), self.primal_objective_value,
        );
        status
    }

    /// Replace the costs of the structural columns.
    ///
    /// The factorization is kept, so that a following `solve` continues from the current basis.
    pub fn set_costs(&mut self, costs: &[f64]) {
        debug_assert_eq!(costs.len(), self.num_col);

        self.cost[..self.num_col].copy_from_slice(costs);
        self.status.invalidate(Change::Costs);
    }

    /// Replace the bounds of structural column `j`.
    pub fn set_column_bounds(&mut self, j: usize, lower: f64, upper: f64) {
        debug_assert!(j < self.num_col);

        self.lower[j] = lower;
        self.upper[j] = upper;
        self.status.invalidate(Change::Bounds);
    }

    /// Validity of the derived data.
    pub fn status(&self) -> &StatusFlags {
        &self.status
    }

    /// Outcome of the last solve.
    pub fn model_status(&self) -> SimplexStatus {
        self.model_status
    }

    /// The current basis.
    pub fn basis(&self) -> &SimplexBasis {
        self.basis
    }

    /// The options the engine was created with, before normalization.
    pub fn options(&self) -> &Options {
        self.options
    }

    /// Value of every variable of `[A I]`.
    fn variable_values(&self) -> Vec<f64> {
        let mut values = self.work_value.clone();
        for (i, &j) in self.basis.basis_index.iter().enumerate() {
            values[j] = self.base_value[i];
        }
        values
    }

    /// Values of the structural columns.
    pub fn column_values(&self) -> Vec<f64> {
        let mut values = self.variable_values();
        values.truncate(self.num_col);
        values
    }

    /// Activities `Ax` of the rows.
    pub fn row_values(&self) -> Vec<f64> {
        self.variable_values()[self.num_col..].iter().map(|v| -v).collect()
    }

    /// Reduced costs of the structural columns.
    pub fn column_duals(&self) -> Vec<f64> {
        self.work_dual[..self.num_col].to_vec()
    }

    /// Dual values `y` of the rows, such that the reduced cost of column `j` is `c_j - a_j^T y`.
    pub fn row_duals(&self) -> Vec<f64> {
        self.work_dual[self.num_col..].iter().map(|d| -d).collect()
    }

    /// `c^T x` plus the offset, for the current values.
    pub fn primal_objective_value(&self) -> f64 {
        self.primal_objective_value
    }

    /// Objective value implied by the duals: the sum over the nonbasic variables of reduced cost
    /// times value, plus the offset.
    pub fn dual_objective_value(&self) -> f64 {
        self.dual_objective_value
    }

    /// Iterations performed in `phase`, over all solves.
    pub fn iteration_count(&self, phase: Phase) -> usize {
        self.iteration_count[phase]
    }

    /// Iterations performed in all phases, over all solves.
    pub fn total_iterations(&self) -> usize {
        self.iteration_count.values().sum()
    }

    /// Factor updates since the last reinversion.
    pub fn update_count(&self) -> usize {
        self.factor.nr_updates()
    }

    /// Number of logical variables in the basis.
    pub fn num_basic_logicals(&self) -> usize {
        self.num_basic_logicals
    }

    /// Infeasibilities as measured by the last rebuild.
    pub fn infeasibilities(&self) -> &Infeasibilities {
        &self.infeasibilities
    }

    /// Proof of primal infeasibility from the last solve.
    pub fn dual_ray(&self) -> Option<&DualRay> {
        self.dual_ray.as_ref().filter(|_| self.status.is_set(Validity::HasDualRay))
    }

    /// Direction of unboundedness from the last solve.
    pub fn primal_ray(&self) -> Option<&PrimalRay> {
        self.primal_ray.as_ref().filter(|_| self.status.is_set(Validity::HasPrimalRay))
    }
}
