//! A small problem with a unique optimum at a vertex.
//!
//! min -3x - 2y
//! s.t. x + y <= 4
//!      x + 3y <= 6
//!      x, y >= 0
//!
//! The optimum is `(4, 0)` with objective value `-12`.
use approx::assert_abs_diff_eq;

use crate::algorithm::simplex::{Phase, SimplexEngine, SimplexStatus};
use crate::algorithm::simplex::basis::SimplexBasis;
use crate::algorithm::simplex::options::{
    DualEdgeWeightStrategy, Options, PriceStrategy, PrimalEdgeWeightStrategy, SimplexStrategy,
};
use crate::algorithm::simplex::status::Validity;
use crate::data::linear_program::elements::{RowBound, Variable};
use crate::data::linear_program::LinearProgram;
use crate::tests::assert_close;

pub fn create() -> LinearProgram {
    LinearProgram::new(
        vec![
            Variable::nonnegative(-3_f64).with_coefficients(vec![(0, 1_f64), (1, 1_f64)]),
            Variable::nonnegative(-2_f64).with_coefficients(vec![(0, 1_f64), (1, 3_f64)]),
        ],
        vec![RowBound::less(4_f64), RowBound::less(6_f64)],
        0_f64,
    ).unwrap()
}

fn check_optimum(options: &Options) {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let mut engine = SimplexEngine::new(&lp, &mut basis, options);

    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
    assert_eq!(engine.model_status(), SimplexStatus::Optimal);
    assert_close(&engine.column_values(), &[4_f64, 0_f64], 1e-9);
    assert_close(&engine.row_values(), &[4_f64, 4_f64], 1e-9);
    assert_close(&engine.row_duals(), &[-3_f64, 0_f64], 1e-9);
    assert_close(&engine.column_duals(), &[0_f64, 1_f64], 1e-9);
    assert_abs_diff_eq!(engine.primal_objective_value(), -12_f64, epsilon = 1e-9);
    assert_abs_diff_eq!(engine.dual_objective_value(), -12_f64, epsilon = 1e-9);

    assert!(engine.status().is_set(Validity::HasFreshRebuild));
    assert!(engine.dual_ray().is_none());
    assert!(engine.primal_ray().is_none());
    assert!(engine.basis().is_consistent(2, 2));
}

#[test]
fn default_options() {
    check_optimum(&Options::default());
}

#[test]
fn dual() {
    check_optimum(&Options { strategy: SimplexStrategy::Dual, ..Options::default() });
}

#[test]
fn dual_steepest_edge() {
    check_optimum(&Options {
        strategy: SimplexStrategy::Dual,
        dual_edge_weight_strategy: DualEdgeWeightStrategy::SteepestEdge,
        ..Options::default()
    });
}

#[test]
fn dual_dantzig_without_perturbation() {
    check_optimum(&Options {
        strategy: SimplexStrategy::Dual,
        dual_edge_weight_strategy: DualEdgeWeightStrategy::Dantzig,
        cost_perturbation_multiplier: 0_f64,
        ..Options::default()
    });
}

#[test]
fn primal() {
    check_optimum(&Options { strategy: SimplexStrategy::Primal, ..Options::default() });
}

#[test]
fn primal_dantzig() {
    check_optimum(&Options {
        strategy: SimplexStrategy::Primal,
        primal_edge_weight_strategy: PrimalEdgeWeightStrategy::Dantzig,
        ..Options::default()
    });
}

#[test]
fn price_strategies() {
    for price_strategy in [PriceStrategy::Column, PriceStrategy::Row, PriceStrategy::RowSwitch] {
        check_optimum(&Options { price_strategy, ..Options::default() });
    }
}

#[test]
fn single_update() {
    check_optimum(&Options { update_limit: 1, ..Options::default() });
}

#[test]
fn threads() {
    check_optimum(&Options { num_threads: 2, ..Options::default() });
}

#[test]
fn rebuild_is_idempotent() {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));

    engine.set_costs(&[-3_f64, -2_f64]);
    assert!(engine.rebuild().is_ok());
    let (values, duals) = (engine.column_values(), engine.row_duals());

    engine.set_costs(&[-3_f64, -2_f64]);
    assert!(engine.rebuild().is_ok());
    assert_eq!(engine.column_values(), values);
    assert_eq!(engine.row_duals(), duals);

    assert!(engine.rebuild().is_ok());
    assert_eq!(engine.column_values(), values);
    assert_eq!(engine.row_duals(), duals);
}

#[test]
fn cost_change_keeps_factorization() {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));

    engine.set_costs(&[-2_f64, -3_f64]);
    assert!(engine.status().is_set(Validity::HasInvert));
    assert!(engine.status().is_set(Validity::HasBasicPrimalValues));
    assert!(!engine.status().is_set(Validity::HasNonbasicDualValues));
    assert!(!engine.status().is_set(Validity::HasFreshRebuild));

    let before = engine.total_iterations();
    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
    assert_close(&engine.column_values(), &[3_f64, 1_f64], 1e-9);
    assert_abs_diff_eq!(engine.primal_objective_value(), -9_f64, epsilon = 1e-9);
    assert_eq!(engine.total_iterations() - before, 1);
}

#[test]
fn bound_change() {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));

    // x <= 1 moves the optimum to (1, 5 / 3)
    engine.set_column_bounds(0, 0_f64, 1_f64);
    assert!(engine.status().is_set(Validity::HasInvert));
    assert!(!engine.status().is_set(Validity::HasBasicPrimalValues));

    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
    assert_close(&engine.column_values(), &[1_f64, 5_f64 / 3_f64], 1e-9);
    assert_abs_diff_eq!(engine.primal_objective_value(), -3_f64 - 10_f64 / 3_f64, epsilon = 1e-9);
}

#[test]
fn counters() {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let options = Options { strategy: SimplexStrategy::Primal, ..Options::default() };
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

    assert!(engine.init().is_ok());
    assert_eq!(engine.num_basic_logicals(), 2);
    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));

    // x enters and the first row leaves
    assert_eq!(engine.iteration_count(Phase::PrimalPhase2), 1);
    assert_eq!(engine.iteration_count(Phase::PrimalPhase1), 0);
    assert_eq!(engine.total_iterations(), 1);
    assert_eq!(engine.num_basic_logicals(), 1);
    assert_eq!(engine.update_count(), 0);
    assert_eq!(engine.infeasibilities().num_primal, 0);
    assert_eq!(engine.infeasibilities().num_dual, 0);
}
