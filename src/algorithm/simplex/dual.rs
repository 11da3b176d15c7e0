//! # Dual simplex
//!
//! Keeps the nonbasic duals feasible and removes primal infeasibilities one row at a time. When
//! the starting basis has dual infeasibilities that flipping can not remove, a first phase solves
//! an auxiliary problem with small boxes as bounds to find a dual feasible basis.
use crate::algorithm::simplex::{LoopOutcome, Phase, RayCandidate, RebuildReason, SimplexEngine, SimplexStatus};
use crate::algorithm::simplex::basis::NonbasicMove;
use crate::algorithm::simplex::error::SolverError;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::observer::Recovery;
use crate::algorithm::simplex::options::DualEdgeWeightStrategy;
use crate::algorithm::simplex::pivot::Pivot;
use crate::algorithm::simplex::ratio_test::dual_ratio_test;
use crate::algorithm::simplex::ray::{DualRay, RAY_DROP_TOLERANCE};
use crate::algorithm::simplex::status::{Change, Validity};
use crate::algorithm::simplex::strategy::pricing::choose_row;
use crate::data::linear_algebra::vector::SparseVector;

impl<IM: BasisInverse> SimplexEngine<'_, IM> {
    /// Run the dual simplex from the current basis.
    pub(super) fn dual_solve(&mut self) -> Result<LoopOutcome, SolverError> {
        self.rebuild()?;
        if self.take_basis_repaired() {
            return Ok(LoopOutcome::Restart);
        }

        if self.num_unflippable_dual_infeasibilities() > 0 {
            match self.dual_phase_one()? {
                LoopOutcome::Finished(SimplexStatus::Optimal) => {}
                other => return Ok(other),
            }
        }

        self.initialise_cost(true);
        self.status.invalidate(Change::Costs);
        self.rebuild()?;
        self.correct_dual();

        loop {
            match self.dual_iterate(Phase::DualPhase2)? {
                LoopOutcome::Finished(SimplexStatus::Optimal) if self.costs_perturbed || self.costs_shifted => {
                    self.initialise_cost(false);
                    self.status.invalidate(Change::Costs);
                    self.rebuild()?;
                    if self.take_basis_repaired() {
                        return Ok(LoopOutcome::Restart);
                    }

                    if self.num_unflippable_dual_infeasibilities() > 0 {
                        log::debug!("dual infeasible after removing cost changes, cleaning up with primal simplex");
                        return Ok(LoopOutcome::SwitchToPrimal);
                    }
                    if self.correct_dual() > 0 {
                        self.compute_infeasibilities();
                        if self.infeasibilities.num_primal > 0 {
                            continue;
                        }
                    }

                    return Ok(LoopOutcome::Finished(SimplexStatus::Optimal));
                }
                outcome => return Ok(outcome),
            }
        }
    }

    /// Find a dual feasible basis by solving the problem with boxed auxiliary bounds.
    ///
    /// # Return value
    ///
    /// `Finished(Optimal)` if the basis is dual feasible for the true bounds afterwards.
    fn dual_phase_one(&mut self) -> Result<LoopOutcome, SolverError> {
        self.initialise_bound(true);
        self.initialise_nonbasic_work_value();
        self.status.invalidate(Change::Bounds);
        self.rebuild()?;
        self.correct_dual();

        let outcome = self.dual_iterate(Phase::DualPhase1)?;

        self.initialise_bound(false);
        self.initialise_nonbasic_work_value();
        self.status.invalidate(Change::Bounds);

        match outcome {
            LoopOutcome::Finished(SimplexStatus::Optimal) => {
                self.rebuild()?;
                if self.take_basis_repaired() {
                    return Ok(LoopOutcome::Restart);
                }

                let remaining = self.num_unflippable_dual_infeasibilities();
                if remaining > 0 {
                    log::debug!("{} dual infeasibilities after dual phase 1, switching to primal simplex", remaining);
                    Ok(LoopOutcome::SwitchToPrimal)
                } else {
                    Ok(outcome)
                }
            }
            other => Ok(other),
        }
    }

    /// Iterate with the current working costs and bounds until they are optimal or a limit or
    /// certificate is found.
    fn dual_iterate(&mut self, phase: Phase) -> Result<LoopOutcome, SolverError> {
        self.observer.phase_changed(phase);
        let primal_tolerance = self.controls.primal_feasibility_tolerance;
        let dual_tolerance = self.controls.dual_feasibility_tolerance;

        loop {
            if let Some(status) = self.reached_limit() {
                return Ok(LoopOutcome::Finished(status));
            }
            if self.rebuild_reason.is_some() || !self.status.is_set(Validity::HasInvert) {
                self.rebuild()?;
                if self.take_basis_repaired() {
                    return Ok(LoopOutcome::Restart);
                }
                self.correct_dual();
            }

            // CHUZR
            let choice = choose_row(
                &self.base_value, &self.base_lower, &self.base_upper,
                self.dual_edge_weights.weights(),
                primal_tolerance,
            );
            let Some(row_out) = choice.row else {
                if !self.status.is_set(Validity::HasFreshRebuild) {
                    self.request_rebuild(RebuildReason::PossiblyOptimal);
                    continue;
                }
                return Ok(LoopOutcome::Finished(SimplexStatus::Optimal));
            };

            let value = self.base_value[row_out];
            let (direction, bound) = if value < self.base_lower[row_out] {
                (1_f64, self.base_lower[row_out])
            } else {
                (-1_f64, self.base_upper[row_out])
            };

            // BTRAN and PRICE
            self.compute_row_ep(row_out);
            self.compute_row_ap();

            // CHUZC
            let entering = dual_ratio_test(
                &self.row_ap, &self.work_dual,
                &self.basis.nonbasic_flag, &self.basis.nonbasic_move,
                &self.work_lower, &self.work_upper,
                direction, dual_tolerance,
            );
            let Some(q) = entering else {
                if !self.status.is_set(Validity::HasFreshRebuild) {
                    self.request_rebuild(RebuildReason::PossiblyPrimalInfeasible);
                    continue;
                }
                if phase == Phase::DualPhase1 {
                    // Zero is feasible for the auxiliary bounds, so this is a numerical artifact.
                    log::debug!("no entering variable in dual phase 1, switching to primal simplex");
                    return Ok(LoopOutcome::SwitchToPrimal);
                }

                let multipliers = self.row_ep.iter().map(|v| direction * v).collect::<Vec<_>>();
                self.ray_candidate = Some(RayCandidate::Dual(DualRay {
                    row: row_out,
                    sign: direction,
                    multipliers: SparseVector::from_dense_with_tolerance(&multipliers, RAY_DROP_TOLERANCE),
                }));
                return Ok(LoopOutcome::Finished(SimplexStatus::PrimalInfeasible));
            };

            // FTRAN
            self.compute_col_aq(q);
            let alpha_column = self.col_aq[row_out];
            if self.pivot_is_troubled(alpha_column, self.row_ap[q]) {
                if let Some(status) = self.register_numerical_trouble() {
                    return Ok(LoopOutcome::Finished(status));
                }
                continue;
            }

            let theta_dual = self.work_dual[q] / alpha_column;
            let theta_primal = (value - bound) / alpha_column;

            let leaving = self.basis.basis_index[row_out];
            let (lower, upper) = (self.work_lower[leaving], self.work_upper[leaving]);
            let leaving_move = if direction > 0_f64 { NonbasicMove::Up } else { NonbasicMove::Down };

            match self.dual_edge_weights.strategy() {
                DualEdgeWeightStrategy::Dantzig => {}
                DualEdgeWeightStrategy::Devex => {
                    let row_ep_squared_norm = self.row_ep.iter().map(|v| v * v).sum();
                    self.dual_edge_weights.check_leaving(row_out, row_ep_squared_norm);
                    self.dual_edge_weights.update_devex(row_out, alpha_column, &self.col_aq);
                }
                DualEdgeWeightStrategy::SteepestEdge => {
                    let row_ep_squared_norm = self.row_ep.iter().map(|v| v * v).sum();
                    let mut tau = self.row_ep.clone();
                    self.factor.forward_solve(&mut tau);
                    self.dual_edge_weights.update_steepest_edge(
                        row_out, alpha_column, &self.col_aq, &tau, row_ep_squared_norm,
                    );
                }
            }

            self.update_pivots(
                Pivot {
                    entering: q,
                    row_out,
                    leaving_move: leaving_move.corrected(lower, upper),
                    leaving_value: bound,
                    theta_primal,
                    theta_dual,
                },
                phase,
                choice.sum_infeasibilities,
            );

            if self.dual_edge_weights.needs_reset() {
                self.dual_edge_weights.reset();
                self.observer.recovered(&Recovery::EdgeWeightReset);
            }
        }
    }
}
