//! # Working costs, bounds and values
//!
//! Setting up the arrays the iterations work on: costs (possibly perturbed), bounds (possibly
//! those of the auxiliary dual phase 1 problem) and values of the nonbasic variables.
use itertools::izip;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::algorithm::simplex::{Infeasibilities, SimplexEngine};
use crate::algorithm::simplex::basis::NonbasicMove;
use crate::algorithm::simplex::factorization::BasisInverse;
use crate::algorithm::simplex::status::Change;
use crate::algorithm::simplex::strategy::pricing::{dual_infeasibility, primal_infeasibility};
use crate::data::linear_program::elements::BoundType;

/// Bounds of free variables in the auxiliary dual phase 1 problem.
const DUAL_PHASE_ONE_FREE_BOUND: f64 = 1000_f64;
/// Costs larger than this are damped when computing the perturbation base.
const LARGE_COST: f64 = 100_f64;
/// Below this fraction of boxed variables, the perturbation base is at most one.
const MIN_BOXED_RATE: f64 = 0.01;
const PERTURBATION_BASE: f64 = 5e-7;
const LOGICAL_PERTURBATION: f64 = 1e-12;

impl<IM: BasisInverse> SimplexEngine<'_, IM> {
    pub(super) fn allocate_work_and_base_arrays(&mut self) {
        let (num_row, num_tot) = (self.num_row, self.num_tot);

        self.work_cost = vec![0_f64; num_tot];
        self.work_dual = vec![0_f64; num_tot];
        self.work_shift = vec![0_f64; num_tot];
        self.work_lower = vec![0_f64; num_tot];
        self.work_upper = vec![0_f64; num_tot];
        self.work_range = vec![0_f64; num_tot];
        self.work_value = vec![0_f64; num_tot];
        self.base_lower = vec![0_f64; num_row];
        self.base_upper = vec![0_f64; num_row];
        self.base_value = vec![0_f64; num_row];

        self.col_aq = vec![0_f64; num_row];
        self.row_ep = vec![0_f64; num_row];
        self.row_ap = vec![0_f64; num_tot];

        let mut rng = StdRng::seed_from_u64(num_tot as u64);
        self.random_value = (0..num_tot).map(|_| rng.r#gen::<f64>()).collect();
    }

    /// True costs and bounds, with valid moves and nonbasic values for them.
    pub(super) fn initialise_working_problem(&mut self) {
        self.initialise_cost(false);
        self.initialise_bound(false);
        self.initialise_nonbasic_work_value();
        self.status.invalidate(Change::Costs);
        self.status.invalidate(Change::Bounds);
    }

    /// Copy the costs, adding a perturbation when `perturb` is set.
    pub(super) fn initialise_cost(&mut self, perturb: bool) {
        self.work_cost.copy_from_slice(&self.cost);
        self.work_shift.fill(0_f64);
        self.costs_shifted = false;
        self.costs_perturbed = false;

        if perturb && self.controls.cost_perturbation_multiplier > 0_f64 {
            self.perturb_costs();
        }
    }

    /// Perturb the structural costs away from zero in the direction that keeps the current
    /// nonbasic variables dual feasible, and the logical costs by a tiny random amount.
    fn perturb_costs(&mut self) {
        let max_abs_cost = self.cost[..self.num_col].iter().fold(0_f64, |max, c| max.max(c.abs()));
        let num_boxed = (0..self.num_tot)
            .filter(|&j| BoundType::of(self.lower[j], self.upper[j]) == BoundType::Boxed)
            .count();

        let mut bigc = if max_abs_cost > LARGE_COST { max_abs_cost.sqrt().sqrt() } else { max_abs_cost };
        if self.num_tot > 0 && (num_boxed as f64) / (self.num_tot as f64) < MIN_BOXED_RATE {
            bigc = bigc.min(1_f64);
        }
        let base = PERTURBATION_BASE * bigc * self.controls.cost_perturbation_multiplier;

        for j in 0..self.num_col {
            let cost = self.cost[j];
            let perturbation = (cost.abs() + 1_f64) * base * (1_f64 + self.random_value[j]);
            self.work_cost[j] += match BoundType::of(self.lower[j], self.upper[j]) {
                BoundType::Free | BoundType::Fixed => 0_f64,
                BoundType::Lower => perturbation,
                BoundType::Upper => -perturbation,
                BoundType::Boxed => if cost >= 0_f64 { perturbation } else { -perturbation },
            };
        }
        for j in self.num_col..self.num_tot {
            self.work_cost[j] += (0.5 - self.random_value[j]) * LOGICAL_PERTURBATION;
        }

        self.costs_perturbed = true;
        log::debug!("costs perturbed with base {:e}", base);
    }

    /// Set the working bounds, either the true ones or those of the dual phase 1 problem:
    /// free variables get `[-1000, 1000]`, one-sided ones `[0, 1]` or `[-1, 0]`, and the others
    /// `[0, 0]`. Moves of the nonbasic variables are made valid for the new bounds.
    pub(super) fn initialise_bound(&mut self, dual_phase_one: bool) {
        for j in 0..self.num_tot {
            let (lower, upper) = (self.lower[j], self.upper[j]);
            let (lower, upper) = if dual_phase_one {
                match BoundType::of(lower, upper) {
                    BoundType::Free => (-DUAL_PHASE_ONE_FREE_BOUND, DUAL_PHASE_ONE_FREE_BOUND),
                    BoundType::Lower => (0_f64, 1_f64),
                    BoundType::Upper => (-1_f64, 0_f64),
                    BoundType::Boxed | BoundType::Fixed => (0_f64, 0_f64),
                }
            } else {
                (lower, upper)
            };

            self.work_lower[j] = lower;
            self.work_upper[j] = upper;
            self.work_range[j] = upper - lower;

            if self.basis.nonbasic_flag[j] {
                let corrected = self.basis.nonbasic_move[j].corrected(lower, upper);
                self.basis.make_nonbasic(j, corrected);
            }
        }
        self.dual_phase_one_bounds = dual_phase_one;
        self.set_base_bounds();
    }

    /// Put every nonbasic variable at the bound its move points away from.
    pub(super) fn initialise_nonbasic_work_value(&mut self) {
        for j in 0..self.num_tot {
            self.work_value[j] = if self.basis.nonbasic_flag[j] {
                self.basis.nonbasic_move[j].value(self.work_lower[j], self.work_upper[j])
            } else {
                0_f64
            };
        }
    }

    /// Copy the working bounds of the basic variables to their basis positions.
    pub(super) fn set_base_bounds(&mut self) {
        for (i, &j) in self.basis.basis_index.iter().enumerate() {
            self.base_lower[i] = self.work_lower[j];
            self.base_upper[i] = self.work_upper[j];
        }
    }

    /// Move a boxed nonbasic variable to its opposite bound, without updating basic values.
    pub(super) fn flip_nonbasic(&mut self, j: usize) {
        debug_assert!(self.basis.nonbasic_flag[j]);
        debug_assert_eq!(BoundType::of(self.work_lower[j], self.work_upper[j]), BoundType::Boxed);

        let (new_move, new_value) = match self.basis.nonbasic_move[j] {
            NonbasicMove::Up => (NonbasicMove::Down, self.work_upper[j]),
            _ => (NonbasicMove::Up, self.work_lower[j]),
        };
        self.basis.make_nonbasic(j, new_move);
        self.work_value[j] = new_value;
    }

    /// Make the nonbasic duals feasible: boxed variables are flipped to the other bound, costs
    /// of the other variables are shifted.
    ///
    /// # Return value
    ///
    /// The number of flips. Basic values are recomputed when it is positive.
    pub(super) fn correct_dual(&mut self) -> usize {
        let tolerance = self.controls.dual_feasibility_tolerance;

        let mut num_flip = 0;
        let mut num_shift = 0;
        for j in 0..self.num_tot {
            if !self.basis.nonbasic_flag[j] {
                continue;
            }
            let (lower, upper) = (self.work_lower[j], self.work_upper[j]);
            if dual_infeasibility(self.work_dual[j], self.basis.nonbasic_move[j], lower, upper, tolerance) == 0_f64 {
                continue;
            }

            if BoundType::of(lower, upper) == BoundType::Boxed {
                self.flip_nonbasic(j);
                num_flip += 1;
            } else {
                let shift = -self.work_dual[j];
                self.work_cost[j] += shift;
                self.work_shift[j] += shift;
                self.work_dual[j] = 0_f64;
                num_shift += 1;
            }
        }

        if num_shift > 0 {
            self.costs_shifted = true;
            log::debug!("shifted {} costs to remove dual infeasibilities", num_shift);
        }
        if num_flip > 0 {
            log::debug!("flipped {} boxed variables to remove dual infeasibilities", num_flip);
            self.compute_primal();
            self.status.invalidate(Change::Flip);
        }
        num_flip
    }

    /// Dual infeasibilities that can not be removed by flipping a boxed variable.
    pub(super) fn num_unflippable_dual_infeasibilities(&self) -> usize {
        let tolerance = self.controls.dual_feasibility_tolerance;

        (0..self.num_tot)
            .filter(|&j| self.basis.nonbasic_flag[j])
            .filter(|&j| BoundType::of(self.work_lower[j], self.work_upper[j]) != BoundType::Boxed)
            .filter(|&j| {
                let infeasibility = dual_infeasibility(
                    self.work_dual[j], self.basis.nonbasic_move[j],
                    self.work_lower[j], self.work_upper[j],
                    tolerance,
                );
                infeasibility > 0_f64
            })
            .count()
    }

    /// Measure the infeasibilities of the basic values and the nonbasic duals.
    pub(super) fn compute_infeasibilities(&mut self) {
        let primal_tolerance = self.controls.primal_feasibility_tolerance;
        let dual_tolerance = self.controls.dual_feasibility_tolerance;

        let mut infeasibilities = Infeasibilities::default();
        for (&value, &lower, &upper) in izip!(&self.base_value, &self.base_lower, &self.base_upper) {
            let infeasibility = primal_infeasibility(value, lower, upper, primal_tolerance);
            if infeasibility > 0_f64 {
                infeasibilities.num_primal += 1;
                infeasibilities.max_primal = infeasibilities.max_primal.max(infeasibility);
                infeasibilities.sum_primal += infeasibility;
            }
        }
        for j in 0..self.num_tot {
            if self.basis.nonbasic_flag[j] {
                let infeasibility = dual_infeasibility(
                    self.work_dual[j], self.basis.nonbasic_move[j],
                    self.work_lower[j], self.work_upper[j],
                    dual_tolerance,
                );
                if infeasibility > 0_f64 {
                    infeasibilities.num_dual += 1;
                    infeasibilities.max_dual = infeasibilities.max_dual.max(infeasibility);
                    infeasibilities.sum_dual += infeasibility;
                }
            }
        }

        self.infeasibilities = infeasibilities;
    }
}
