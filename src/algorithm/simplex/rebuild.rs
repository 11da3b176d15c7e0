//! # Rebuild
//!
//! Recompute everything that is maintained incrementally during the iterations: the
//! factorization, the basic primal values, the duals and the objective values.
use crate::algorithm::simplex::{RebuildReason, SimplexEngine};
use crate::algorithm::simplex::basis::SimplexBasis;
use crate::algorithm::simplex::error::SolverError;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::matrix::MatrixProvider;
use crate::algorithm::simplex::observer::{RebuildReport, Recovery};
use crate::algorithm::simplex::options::DualEdgeWeightStrategy;
use crate::algorithm::simplex::pivot::price;
use crate::algorithm::simplex::status::{Change, Validity};

/// Pivot threshold for the second factorization attempt of a singular basis.
const RAISED_PIVOT_THRESHOLD: f64 = 0.5;

impl<IM: BasisInverse> SimplexEngine<'_, IM> {
    /// Recompute all values from a fresh factorization.
    ///
    /// Nothing happens when the values are already fresh and no rebuild was requested, so
    /// rebuilding twice in a row gives identical results.
    ///
    /// # Return value
    ///
    /// `SolverError::SingularBasisFatal` if the basis matrix could not be factorized, not even
    /// after falling back to the all-logical basis.
    pub fn rebuild(&mut self) -> Result<(), SolverError> {
        if self.status.is_set(Validity::HasFreshRebuild) && self.rebuild_reason.is_none() {
            return Ok(());
        }
        let reason = self.rebuild_reason.take().unwrap_or(RebuildReason::ValuesUnknown);
        self.observer.rebuild_started(reason);

        let reinverted = !self.status.is_set(Validity::HasFreshInvert);
        if reinverted {
            self.compute_factor()?;
        }
        if !self.status.is_set(Validity::HasEdgeWeights) {
            self.reset_edge_weights();
        }

        self.compute_primal();
        self.compute_dual();
        self.compute_infeasibilities();
        self.compute_objective_values();
        self.status.set(Validity::HasFreshRebuild);

        let report = RebuildReport {
            reason,
            reinverted,
            num_primal_infeasibilities: self.infeasibilities.num_primal,
            sum_primal_infeasibilities: self.infeasibilities.sum_primal,
            num_dual_infeasibilities: self.infeasibilities.num_dual,
            sum_dual_infeasibilities: self.infeasibilities.sum_dual,
            primal_objective: self.primal_objective_value,
            dual_objective: self.dual_objective_value,
        };
        self.observer.rebuild_finished(&report);

        Ok(())
    }

    /// Factorize the basis matrix.
    ///
    /// A singular basis matrix is factorized again with a larger pivot threshold. If that fails
    /// too, the basis is replaced by the all-logical basis and `basis_repaired` is set.
    pub(super) fn compute_factor(&mut self) -> Result<(), SolverError> {
        let threshold = self.controls.factor_pivot_threshold;
        let mut result = self.factor.invert(&self.basis.basis_index, &self.matrix, threshold);

        if let Err(singular) = &result {
            log::warn!("{}", singular);
            self.observer.recovered(&Recovery::RaisedPivotThreshold {
                rank_deficiency: singular.missing_positions.len(),
            });
            result = self.factor.invert(&self.basis.basis_index, &self.matrix, RAISED_PIVOT_THRESHOLD.max(threshold));
        }

        if let Err(singular) = result {
            log::warn!("{}, continuing from the all-logical basis", singular);
            self.observer.recovered(&Recovery::AllSlackBasis);

            *self.basis = SimplexBasis::all_slack(self.num_col, self.num_row);
            self.status.invalidate(Change::Basis);
            self.initialise_bound(self.dual_phase_one_bounds);
            self.initialise_nonbasic_work_value();
            self.basis_repaired = true;

            if self.factor.invert(&self.basis.basis_index, &self.matrix, threshold).is_err() {
                return Err(SolverError::SingularBasisFatal);
            }
        }

        self.num_basic_logicals = self.basis.nr_basic_logicals(self.num_col);
        self.status.set(Validity::HasInvert);
        self.status.set(Validity::HasFreshInvert);

        Ok(())
    }

    /// Whether the basis was replaced since the last call.
    pub(super) fn take_basis_repaired(&mut self) -> bool {
        std::mem::take(&mut self.basis_repaired)
    }

    /// `x_B = -B^-1 N x_N`.
    pub(super) fn compute_primal(&mut self) {
        let mut rhs = vec![0_f64; self.num_row];
        for j in 0..self.num_tot {
            if self.basis.nonbasic_flag[j] && self.work_value[j] != 0_f64 {
                self.matrix.add_column_multiple(j, self.work_value[j], &mut rhs);
            }
        }
        self.factor.forward_solve(&mut rhs);

        for (value, computed) in self.base_value.iter_mut().zip(rhs) {
            *value = -computed;
        }
        self.set_base_bounds();
        self.status.set(Validity::HasBasicPrimalValues);
    }

    /// `y = B^-T c_B` and `d = c - [A I]^T y`, with exact zeros for the basic variables.
    pub(super) fn compute_dual(&mut self) {
        let mut y = self.basis.basis_index.iter()
            .map(|&j| self.work_cost[j])
            .collect::<Vec<_>>();
        self.factor.backward_solve(&mut y);

        let mut row_ap = vec![0_f64; self.num_tot];
        price(&self.matrix, self.pool.as_ref(), self.controls.price_strategy, &y, &mut row_ap);

        for j in 0..self.num_tot {
            self.work_dual[j] = if self.basis.nonbasic_flag[j] {
                self.work_cost[j] - row_ap[j]
            } else {
                0_f64
            };
        }
        self.status.set(Validity::HasNonbasicDualValues);
    }

    /// Objective values from the current values and duals.
    pub(super) fn compute_objective_values(&mut self) {
        let values = self.variable_values();
        self.primal_objective_value = self.lp.offset()
            + self.cost[..self.num_col].iter().zip(&values).map(|(c, x)| c * x).sum::<f64>();
        self.dual_objective_value = self.lp.offset()
            + (0..self.num_tot)
                .filter(|&j| self.basis.nonbasic_flag[j])
                .map(|j| self.work_dual[j] * self.work_value[j])
                .sum::<f64>();
        self.updated_objective_value = self.primal_objective_value;

        self.status.set(Validity::HasPrimalObjectiveValue);
        self.status.set(Validity::HasDualObjectiveValue);
    }

    /// Start the edge weights over from the current basis.
    pub(super) fn reset_edge_weights(&mut self) {
        self.primal_devex.reset(&self.basis.nonbasic_flag);

        if self.dual_edge_weights.strategy() == DualEdgeWeightStrategy::SteepestEdge {
            let squared_norms = (0..self.num_row)
                .map(|i| {
                    let mut row = vec![0_f64; self.num_row];
                    row[i] = 1_f64;
                    self.factor.backward_solve(&mut row);
                    row.iter().map(|v| v * v).sum()
                })
                .collect();
            self.dual_edge_weights.set_exact(squared_norms);
        } else {
            self.dual_edge_weights.reset();
        }

        self.status.set(Validity::HasEdgeWeights);
    }
}
