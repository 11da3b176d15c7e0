//! # Progress reporting
//!
//! The engine reports rebuilds, pivots and recoveries to an observer. Reporting never changes
//! what the engine computes.
use crate::algorithm::simplex::{Phase, RebuildReason};

/// Summary of a single basis change.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotReport {
    /// Phase the pivot belongs to.
    pub phase: Phase,
    /// Total number of iterations after this pivot.
    pub iteration: usize,
    /// Variable that became basic.
    pub entering: usize,
    /// Variable that became nonbasic.
    pub leaving: usize,
    /// Row position of the exchange.
    pub row_out: usize,
    /// Change in the value of the entering variable.
    pub primal_step: f64,
    /// Change in the dual values along the pivotal row.
    pub dual_step: f64,
    /// Pivot element as computed by the forward solve.
    pub alpha: f64,
    /// Objective value, maintained incrementally since the last rebuild.
    pub objective: f64,
    /// Sum of the bound violations of the basic variables before the pivot.
    pub sum_primal_infeasibilities: f64,
    /// Factor updates since the last reinversion, including this one.
    pub update_count: usize,
}

/// Summary of a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildReport {
    #[allow(missing_docs)]
    pub reason: RebuildReason,
    /// Whether the basis matrix was factorized.
    pub reinverted: bool,
    #[allow(missing_docs)]
    pub num_primal_infeasibilities: usize,
    #[allow(missing_docs)]
    pub sum_primal_infeasibilities: f64,
    #[allow(missing_docs)]
    pub num_dual_infeasibilities: usize,
    #[allow(missing_docs)]
    pub sum_dual_infeasibilities: f64,
    #[allow(missing_docs)]
    pub primal_objective: f64,
    #[allow(missing_docs)]
    pub dual_objective: f64,
}

/// Recoverable trouble the engine handled without stopping.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// Factorization found a singular basis and is retried with a larger pivot threshold.
    RaisedPivotThreshold {
        /// Number of basic columns that could not be pivoted on.
        rank_deficiency: usize,
    },
    /// Factorization failed again, the basis was replaced by the all-logical basis.
    AllSlackBasis,
    /// The pivot element differed between the forward and backward solves, or was too small.
    NumericalTrouble {
        /// Pivot from the forward solve.
        alpha_column: f64,
        /// Pivot from the pricing of the row.
        alpha_row: f64,
    },
    /// Edge weights were unreliable and got reset to the reference framework.
    EdgeWeightReset,
}

/// Receives progress events from the engine.
///
/// All methods have empty default implementations.
pub trait SimplexObserver {
    /// A rebuild is about to happen.
    fn rebuild_started(&mut self, _reason: RebuildReason) {}
    /// A rebuild completed.
    fn rebuild_finished(&mut self, _report: &RebuildReport) {}
    /// A basis change completed.
    fn pivot_performed(&mut self, _report: &PivotReport) {}
    /// A nonbasic variable moved to its opposite bound without a basis change.
    fn bound_flipped(&mut self, _variable: usize, _phase: Phase) {}
    /// The engine entered another phase.
    fn phase_changed(&mut self, _phase: Phase) {}
    /// The engine handled trouble and continues.
    fn recovered(&mut self, _recovery: &Recovery) {}
}

/// Ignores all events.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoObserver;

impl SimplexObserver for NoObserver {}

/// Forwards all events to the `log` facade.
///
/// Pivots are logged at `trace` level, everything else at `debug` or `warn`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogObserver;

impl SimplexObserver for LogObserver {
    fn rebuild_started(&mut self, reason: RebuildReason) {
        log::debug!("rebuild: {:?}", reason);
    }

    fn rebuild_finished(&mut self, report: &RebuildReport) {
        log::debug!(
            "rebuilt (reinverted: {}): primal infeasibilities {} ({:e}), dual infeasibilities {} ({:e}), objective {}",
            report.reinverted,
            report.num_primal_infeasibilities, report.sum_primal_infeasibilities,
            report.num_dual_infeasibilities, report.sum_dual_infeasibilities,
            report.primal_objective,
        );
    }

    fn pivot_performed(&mut self, report: &PivotReport) {
        log::trace!(
            "{:?} iteration {}: {} in, {} out at row {}, step {:e}, objective {}",
            report.phase, report.iteration, report.entering, report.leaving, report.row_out,
            report.primal_step, report.objective,
        );
    }

    fn bound_flipped(&mut self, variable: usize, phase: Phase) {
        log::trace!("{:?}: variable {} flipped to its other bound", phase, variable);
    }

    fn phase_changed(&mut self, phase: Phase) {
        log::debug!("entering {:?}", phase);
    }

    fn recovered(&mut self, recovery: &Recovery) {
        log::warn!("recovered from {:?}", recovery);
    }
}
