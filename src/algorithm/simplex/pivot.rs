//! # Basis changes
//!
//! The linear algebra of a single iteration and the incremental update of all values after it.
use rayon::ThreadPool;

use crate::algorithm::simplex::{Phase, RebuildReason, SimplexEngine};
use crate::algorithm::simplex::basis::NonbasicMove;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::matrix::{MatrixProvider, SimplexMatrix};
use crate::algorithm::simplex::observer::{PivotReport, Recovery};
use crate::algorithm::simplex::options::PriceStrategy;
use crate::algorithm::simplex::status::Change;

/// Relative difference between the two computed pivots above which the pivot is distrusted.
const ALPHA_DIFFERENCE_TOLERANCE: f64 = 1e-7;
/// Pivots smaller than this, relative to the largest value in the column, are distrusted.
const SMALL_PIVOT: f64 = 1e-9;

/// `row_ap = [A I]^T row_ep`, row-wise or column-wise depending on the strategy and the density
/// of `row_ep`.
pub(super) fn price(
    matrix: &SimplexMatrix,
    pool: Option<&ThreadPool>,
    strategy: PriceStrategy,
    row_ep: &[f64],
    row_ap: &mut [f64],
) {
    let nonzeros = row_ep.iter().filter(|&&v| v != 0_f64).count();

    if matrix.use_row_price(strategy, nonzeros) {
        matrix.price_by_row(row_ep, row_ap);
    } else {
        match pool {
            Some(pool) => pool.install(|| matrix.price_by_column_parallel(row_ep, row_ap)),
            None => matrix.price_by_column(row_ep, row_ap),
        }
    }
}

/// A basis change, after the ratio test decided on it.
#[derive(Debug, Copy, Clone)]
pub(super) struct Pivot {
    pub entering: usize,
    pub row_out: usize,
    /// Move of the leaving variable once nonbasic.
    pub leaving_move: NonbasicMove,
    /// Value of the leaving variable once nonbasic.
    pub leaving_value: f64,
    /// Change in the value of the entering variable.
    pub theta_primal: f64,
    /// Multiple of the pivotal row subtracted from the reduced costs.
    pub theta_dual: f64,
}

impl<IM: BasisInverse> SimplexEngine<'_, IM> {
    /// Row `row_out` of `B^-1`, in `row_ep`.
    pub(super) fn compute_row_ep(&mut self, row_out: usize) {
        self.row_ep.fill(0_f64);
        self.row_ep[row_out] = 1_f64;
        self.factor.backward_solve(&mut self.row_ep);
    }

    /// `B^-1 a_q`, in `col_aq`.
    pub(super) fn compute_col_aq(&mut self, q: usize) {
        self.col_aq.fill(0_f64);
        self.matrix.add_column_multiple(q, 1_f64, &mut self.col_aq);
        self.factor.forward_solve(&mut self.col_aq);
    }

    /// The pivotal row for all variables, from `row_ep`, in `row_ap`.
    pub(super) fn compute_row_ap(&mut self) {
        price(&self.matrix, self.pool.as_ref(), self.controls.price_strategy, &self.row_ep, &mut self.row_ap);
    }

    /// Compare the pivot from the forward solve with the one from the pivotal row.
    ///
    /// On disagreement, a rebuild with a fresh factorization is requested.
    ///
    /// # Return value
    ///
    /// Whether the pivot should not be used.
    pub(super) fn pivot_is_troubled(&mut self, alpha_column: f64, alpha_row: f64) -> bool {
        let column_scale = self.col_aq.iter().fold(1_f64, |max, v| max.max(v.abs()));
        let too_small = alpha_column.abs() < SMALL_PIVOT * column_scale;
        let smallest = alpha_column.abs().min(alpha_row.abs());
        let disagree = self.factor.nr_updates() > 0
            && (smallest == 0_f64 || (alpha_column - alpha_row).abs() / smallest > ALPHA_DIFFERENCE_TOLERANCE);

        if too_small || disagree {
            log::debug!("pivot {:e} from column against {:e} from row", alpha_column, alpha_row);
            self.observer.recovered(&Recovery::NumericalTrouble { alpha_column, alpha_row });
            self.request_rebuild(RebuildReason::NumericalTrouble);
            true
        } else {
            false
        }
    }

    /// Make the next rebuild start from a fresh factorization.
    pub(super) fn request_rebuild(&mut self, reason: RebuildReason) {
        if self.factor.nr_updates() > 0 {
            self.status.invalidate(Change::Pivot);
        }
        self.rebuild_reason = Some(reason);
    }

    /// Apply a basis change to the values, the duals, the basis and the factorization.
    ///
    /// Expects `col_aq` for the entering variable and `row_ap` for the leaving row.
    pub(super) fn update_pivots(&mut self, pivot: Pivot, phase: Phase, sum_primal_infeasibilities: f64) {
        let Pivot { entering, row_out, leaving_move, leaving_value, theta_primal, theta_dual } = pivot;
        let alpha = self.col_aq[row_out];

        self.updated_objective_value += self.work_dual[entering] * theta_primal;

        // Duals
        for j in 0..self.num_tot {
            if self.basis.nonbasic_flag[j] {
                self.work_dual[j] -= theta_dual * self.row_ap[j];
            }
        }
        self.work_dual[entering] = 0_f64;

        // Primals
        for (value, &change) in self.base_value.iter_mut().zip(&self.col_aq) {
            *value -= theta_primal * change;
        }
        self.base_value[row_out] = self.work_value[entering] + theta_primal;

        let leaving = self.basis.exchange(row_out, entering, leaving_move);
        self.work_dual[leaving] = -theta_dual;
        self.work_value[leaving] = leaving_value;
        self.work_value[entering] = 0_f64;
        self.base_lower[row_out] = self.work_lower[entering];
        self.base_upper[row_out] = self.work_upper[entering];
        if entering >= self.num_col {
            self.num_basic_logicals += 1;
        }
        if leaving >= self.num_col {
            self.num_basic_logicals -= 1;
        }

        self.factor.update(&self.col_aq, row_out);
        if self.factor.nr_updates() >= self.controls.update_limit {
            self.rebuild_reason = Some(RebuildReason::UpdateLimitReached);
        }
        self.status.invalidate(Change::Pivot);
        self.iteration_count[phase] += 1;

        let report = PivotReport {
            phase,
            iteration: self.total_iterations(),
            entering,
            leaving,
            row_out,
            primal_step: theta_primal,
            dual_step: theta_dual,
            alpha,
            objective: self.updated_objective_value,
            sum_primal_infeasibilities,
            update_count: self.factor.nr_updates(),
        };
        self.observer.pivot_performed(&report);
    }

    /// Move the nonbasic `q` to its other bound in the direction `direction`, updating the basic
    /// values along `col_aq`.
    pub(super) fn flip_bound(&mut self, q: usize, direction: f64, phase: Phase) {
        let step = direction * self.work_range[q];

        self.updated_objective_value += self.work_dual[q] * step;
        for (value, &change) in self.base_value.iter_mut().zip(&self.col_aq) {
            *value -= step * change;
        }
        self.flip_nonbasic(q);

        self.status.invalidate(Change::Flip);
        self.iteration_count[phase] += 1;
        self.observer.bound_flipped(q, phase);
    }
}
