//! # Primal simplex
//!
//! Moves between primal solutions, first minimizing the sum of the bound violations of the basic
//! variables and then the true objective. Entering columns are priced with Devex weights unless
//! Dantzig pricing was asked for.
use crate::algorithm::simplex::{LoopOutcome, Phase, RayCandidate, RebuildReason, SimplexEngine, SimplexStatus};
use crate::algorithm::simplex::basis::NonbasicMove;
use crate::algorithm::simplex::error::SolverError;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::observer::Recovery;
use crate::algorithm::simplex::pivot::{price, Pivot};
use crate::algorithm::simplex::ratio_test::{primal_ratio_test, PrimalStep};
use crate::algorithm::simplex::ray::{DualRay, PrimalRay, RAY_DROP_TOLERANCE};
use crate::algorithm::simplex::status::Validity;
use crate::algorithm::simplex::strategy::pricing::{choose_column, primal_infeasibility};
use crate::data::linear_algebra::vector::SparseVector;

/// Phase 1 pricing information.
struct PhaseOne {
    /// Multipliers `B^-T c1` of the phase 1 costs, indexed by row.
    multipliers: Vec<f64>,
    /// Reduced phase 1 costs of all variables.
    duals: Vec<f64>,
    /// Most violated basis position and whether it is below its lower bound.
    worst: (usize, bool),
    sum_infeasibilities: f64,
}

impl<IM: BasisInverse> SimplexEngine<'_, IM> {
    /// Run the primal simplex from the current basis, with the true costs and bounds.
    pub(super) fn primal_solve(&mut self) -> Result<LoopOutcome, SolverError> {
        self.initialise_working_problem();
        self.rebuild()?;
        if self.take_basis_repaired() {
            return Ok(LoopOutcome::Restart);
        }
        self.primal_devex.reset(&self.basis.nonbasic_flag);

        let primal_tolerance = self.controls.primal_feasibility_tolerance;
        let dual_tolerance = self.controls.dual_feasibility_tolerance;
        let mut current_phase = None;

        loop {
            if let Some(status) = self.reached_limit() {
                return Ok(LoopOutcome::Finished(status));
            }
            if self.rebuild_reason.is_some() || !self.status.is_set(Validity::HasInvert) {
                self.rebuild()?;
                if self.take_basis_repaired() {
                    return Ok(LoopOutcome::Restart);
                }
            }
            if self.primal_devex.needs_reset() {
                self.primal_devex.reset(&self.basis.nonbasic_flag);
                self.observer.recovered(&Recovery::EdgeWeightReset);
            }

            let phase_one = self.phase_one_pricing();
            let phase = if phase_one.is_some() { Phase::PrimalPhase1 } else { Phase::PrimalPhase2 };
            if current_phase != Some(phase) {
                self.observer.phase_changed(phase);
                current_phase = Some(phase);
            }

            // CHUZC
            let duals = phase_one.as_ref().map_or(&self.work_dual, |phase_one| &phase_one.duals);
            let entering = choose_column(
                duals,
                &self.basis.nonbasic_flag, &self.basis.nonbasic_move,
                &self.work_lower, &self.work_upper,
                self.primal_devex.weights(),
                dual_tolerance,
                self.pool.as_ref(),
            );
            let Some(q) = entering else {
                if !self.status.is_set(Validity::HasFreshRebuild) {
                    let reason = if phase_one.is_some() {
                        RebuildReason::PossiblyPrimalInfeasible
                    } else {
                        RebuildReason::PossiblyOptimal
                    };
                    self.request_rebuild(reason);
                    continue;
                }

                return Ok(LoopOutcome::Finished(match phase_one {
                    Some(phase_one) => {
                        self.ray_candidate = Some(RayCandidate::Dual(phase_one.into_ray()));
                        SimplexStatus::PrimalInfeasible
                    }
                    None => SimplexStatus::Optimal,
                }));
            };
            let direction = if duals[q] < 0_f64 { 1_f64 } else { -1_f64 };
            let sum_infeasibilities = phase_one.as_ref().map_or(0_f64, |phase_one| phase_one.sum_infeasibilities);

            // FTRAN
            self.compute_col_aq(q);
            self.primal_devex.check_entering(q, &self.col_aq, &self.basis.basis_index);

            // CHUZR
            let step = primal_ratio_test(
                &self.col_aq,
                &self.base_value, &self.base_lower, &self.base_upper,
                direction,
                self.work_range[q],
                phase_one.is_some(),
                primal_tolerance,
            );

            match step {
                PrimalStep::Unbounded if phase_one.is_some() => {
                    // Some violated bound always limits an improving phase 1 step.
                    if let Some(status) = self.register_numerical_trouble() {
                        return Ok(LoopOutcome::Finished(status));
                    }
                    self.request_rebuild(RebuildReason::NumericalTrouble);
                }
                PrimalStep::Unbounded => {
                    if !self.status.is_set(Validity::HasFreshRebuild) {
                        self.request_rebuild(RebuildReason::PossiblyUnbounded);
                        continue;
                    }
                    self.ray_candidate = Some(RayCandidate::Primal(self.unbounded_ray(q, direction)));
                    return Ok(LoopOutcome::Finished(SimplexStatus::Unbounded));
                }
                PrimalStep::Flip => self.flip_bound(q, direction, phase),
                PrimalStep::Leave { row, step, to_lower } => {
                    // BTRAN and PRICE
                    self.compute_row_ep(row);
                    self.compute_row_ap();

                    let alpha_column = self.col_aq[row];
                    if self.pivot_is_troubled(alpha_column, self.row_ap[q]) {
                        if let Some(status) = self.register_numerical_trouble() {
                            return Ok(LoopOutcome::Finished(status));
                        }
                        continue;
                    }

                    let leaving = self.basis.basis_index[row];
                    let (lower, upper) = (self.work_lower[leaving], self.work_upper[leaving]);
                    let (leaving_move, leaving_value) = if to_lower {
                        (NonbasicMove::Up, lower)
                    } else {
                        (NonbasicMove::Down, upper)
                    };

                    self.primal_devex.update(q, leaving, alpha_column, &self.row_ap, &self.basis.nonbasic_flag);
                    self.update_pivots(
                        Pivot {
                            entering: q,
                            row_out: row,
                            leaving_move: leaving_move.corrected(lower, upper),
                            leaving_value,
                            theta_primal: direction * step,
                            theta_dual: self.work_dual[q] / alpha_column,
                        },
                        phase,
                        sum_infeasibilities,
                    );
                }
            }
        }
    }

    /// Phase 1 costs and duals, if any basic variable violates its bounds.
    ///
    /// The phase 1 cost of a basic variable is `-1` below its lower bound, `1` above its upper
    /// bound and `0` otherwise; nonbasic variables have zero phase 1 cost.
    fn phase_one_pricing(&self) -> Option<PhaseOne> {
        let tolerance = self.controls.primal_feasibility_tolerance;

        let mut multipliers = vec![0_f64; self.num_row];
        let mut worst: Option<(usize, bool, f64)> = None;
        let mut sum_infeasibilities = 0_f64;
        for (i, cost) in multipliers.iter_mut().enumerate() {
            let (value, lower, upper) = (self.base_value[i], self.base_lower[i], self.base_upper[i]);
            let infeasibility = primal_infeasibility(value, lower, upper, tolerance);
            if infeasibility > 0_f64 {
                let below = value < lower;
                *cost = if below { -1_f64 } else { 1_f64 };
                sum_infeasibilities += infeasibility;
                if worst.is_none_or(|(_, _, largest)| infeasibility > largest) {
                    worst = Some((i, below, infeasibility));
                }
            }
        }
        let (row, below, _) = worst?;

        self.factor.backward_solve(&mut multipliers);
        let mut duals = vec![0_f64; self.num_tot];
        price(&self.matrix, self.pool.as_ref(), self.controls.price_strategy, &multipliers, &mut duals);
        for (j, dual) in duals.iter_mut().enumerate() {
            *dual = if self.basis.nonbasic_flag[j] { -*dual } else { 0_f64 };
        }

        Some(PhaseOne { multipliers, duals, worst: (row, below), sum_infeasibilities })
    }

    /// Direction of unboundedness when `q` moves in `direction` without limit.
    fn unbounded_ray(&self, q: usize, direction: f64) -> PrimalRay {
        let mut dense = vec![0_f64; self.num_tot];
        dense[q] = direction;
        for (&basic, &change) in self.basis.basis_index.iter().zip(&self.col_aq) {
            dense[basic] = -direction * change;
        }

        PrimalRay {
            column: q,
            sign: direction,
            direction: SparseVector::from_dense_with_tolerance(&dense, RAY_DROP_TOLERANCE),
        }
    }
}

impl PhaseOne {
    /// The multipliers of an optimal phase 1 with violated bounds prove infeasibility, negated.
    fn into_ray(self) -> DualRay {
        let (row, below) = self.worst;
        let multipliers = self.multipliers.iter().map(|v| -v).collect::<Vec<_>>();

        DualRay {
            row,
            sign: if below { 1_f64 } else { -1_f64 },
            multipliers: SparseVector::from_dense_with_tolerance(&multipliers, RAY_DROP_TOLERANCE),
        }
    }
}
