//! # Infeasible and unbounded problems
use approx::assert_abs_diff_eq;

use relp_ekk::algorithm::simplex::{SimplexEngine, SimplexStatus};
use relp_ekk::algorithm::simplex::basis::SimplexBasis;
use relp_ekk::algorithm::simplex::options::{Options, SimplexStrategy};
use relp_ekk::algorithm::simplex::status::Validity;
use relp_ekk::data::linear_program::LinearProgram;

const INF: f64 = f64::INFINITY;

/// `x >= 5` with `0 <= x <= 2`.
fn infeasible() -> LinearProgram {
    LinearProgram::from_dense_rows(&[1_f64], &[(0_f64, 2_f64)], &[vec![1_f64]], &[(5_f64, INF)]).unwrap()
}

/// `min -x0` subject to `x0 - x1 <= 1` with `x0` free and `x1 >= 0`.
fn unbounded() -> LinearProgram {
    LinearProgram::from_dense_rows(
        &[-1_f64, 0_f64],
        &[(-INF, INF), (0_f64, INF)],
        &[vec![1_f64, -1_f64]],
        &[(-INF, 1_f64)],
    ).unwrap()
}

#[test]
fn dual_ray() {
    let lp = infeasible();
    for strategy in [SimplexStrategy::Choose, SimplexStrategy::Dual, SimplexStrategy::Primal] {
        let mut basis = SimplexBasis::all_slack(1, 1);
        let options = Options { strategy, ..Options::default() };
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

        assert_eq!(engine.solve(), Ok(SimplexStatus::PrimalInfeasible));
        assert!(engine.status().is_set(Validity::HasDualRay));
        assert!(engine.primal_ray().is_none());

        let ray = engine.dual_ray().unwrap();
        assert_eq!(ray.sign, -1_f64);
        assert!(ray.farkas_gap(&lp) > 0_f64);
        assert_abs_diff_eq!(ray.farkas_gap(&lp), 3_f64, epsilon = 1e-9);
    }
}

#[test]
fn primal_ray() {
    let lp = unbounded();
    let mut basis = SimplexBasis::all_slack(2, 1);
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

    assert_eq!(engine.solve(), Ok(SimplexStatus::Unbounded));
    assert!(engine.status().is_set(Validity::HasPrimalRay));
    assert!(engine.dual_ray().is_none());

    let ray = engine.primal_ray().unwrap();
    assert_eq!(ray.column, 1);
    assert_eq!(ray.sign, 1_f64);
    assert!(ray.objective_slope(&lp) < 0_f64);
    let direction = ray.column_direction(&lp);
    assert_abs_diff_eq!(direction[0], 1_f64, epsilon = 1e-9);
    assert_abs_diff_eq!(direction[1], 1_f64, epsilon = 1e-9);
    // The row activity does not change along the ray
    assert_abs_diff_eq!(direction[0] - direction[1], 0_f64, epsilon = 1e-9);
}

#[test]
fn inconsistent_bounds() {
    let lp = LinearProgram::from_dense_rows(&[1_f64], &[(3_f64, 1_f64)], &[vec![1_f64]], &[(0_f64, INF)]).unwrap();
    let mut basis = SimplexBasis::all_slack(1, 1);
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

    assert_eq!(engine.solve(), Ok(SimplexStatus::PrimalInfeasible));
    assert_eq!(engine.total_iterations(), 0);
    assert!(engine.dual_ray().is_none());
    assert!(engine.primal_ray().is_none());
}

#[test]
fn iteration_limit_keeps_basis() {
    let lp = unbounded();
    let mut basis = SimplexBasis::all_slack(2, 1);
    let options = Options { iteration_limit: 1, ..Options::default() };
    {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
        assert_eq!(engine.solve(), Ok(SimplexStatus::IterationLimit));
        assert_eq!(engine.model_status(), SimplexStatus::IterationLimit);
        assert!(engine.primal_ray().is_none());
    }

    // x0 replaced the logical
    assert!(basis.is_consistent(2, 1));
    assert_eq!(basis.basis_index, vec![0]);
}
