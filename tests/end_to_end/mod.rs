//! # Solving small problems to optimality
use approx::assert_abs_diff_eq;

use relp_ekk::algorithm::simplex::{SimplexEngine, SimplexStatus};
use relp_ekk::algorithm::simplex::basis::{NonbasicMove, SimplexBasis};
use relp_ekk::algorithm::simplex::options::{Options, PriceStrategy, SimplexStrategy};
use relp_ekk::algorithm::simplex::status::Validity;

use crate::two_by_two;

#[test]
fn unique_optimum() {
    let lp = two_by_two();
    for strategy in [SimplexStrategy::Choose, SimplexStrategy::Dual, SimplexStrategy::Primal] {
        let mut basis = SimplexBasis::all_slack(2, 2);
        let options = Options { strategy, ..Options::default() };
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

        assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
        let values = engine.column_values();
        assert_abs_diff_eq!(values[0], 4_f64, epsilon = 1e-9);
        assert_abs_diff_eq!(values[1], 0_f64, epsilon = 1e-9);
        let duals = engine.row_duals();
        assert_abs_diff_eq!(duals[0], -3_f64, epsilon = 1e-9);
        assert_abs_diff_eq!(duals[1], 0_f64, epsilon = 1e-9);
        assert_abs_diff_eq!(engine.primal_objective_value(), -12_f64, epsilon = 1e-9);
    }
}

#[test]
fn hot_start() {
    let lp = two_by_two();
    let options = Options::default();
    let costs = [-2_f64, -3_f64];

    let mut basis = SimplexBasis::all_slack(2, 2);
    let hot_iterations = {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
        assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
        let before = engine.total_iterations();

        engine.set_costs(&costs);
        assert!(engine.status().is_set(Validity::HasInvert));
        assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
        assert_abs_diff_eq!(engine.primal_objective_value(), -9_f64, epsilon = 1e-9);
        engine.total_iterations() - before
    };

    let mut cold_basis = SimplexBasis::all_slack(2, 2);
    let mut cold = SimplexEngine::new(&lp, &mut cold_basis, &options);
    cold.set_costs(&costs);
    assert_eq!(cold.solve(), Ok(SimplexStatus::Optimal));
    assert_abs_diff_eq!(cold.primal_objective_value(), -9_f64, epsilon = 1e-9);

    assert!(hot_iterations <= cold.total_iterations());
}

#[test]
fn threads_do_not_change_the_result() {
    let lp = two_by_two();
    let solve = |num_threads| {
        let mut basis = SimplexBasis::all_slack(2, 2);
        let options = Options { num_threads, price_strategy: PriceStrategy::Column, ..Options::default() };
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
        assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
        (engine.column_values(), engine.row_duals(), engine.total_iterations())
    };

    let (values, duals, iterations) = solve(1);
    let (parallel_values, parallel_duals, parallel_iterations) = solve(4);
    assert_eq!(iterations, parallel_iterations);
    for (a, b) in values.iter().zip(&parallel_values).chain(duals.iter().zip(&parallel_duals)) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn nonbasic_variables_at_bounds() {
    let lp = two_by_two();
    let mut basis = SimplexBasis::all_slack(2, 2);
    let options = Options::default();
    let (values, rows) = {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options);
        assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
        (engine.column_values(), engine.row_values())
    };

    assert!(basis.is_consistent(2, 2));
    assert_eq!(basis.basis_index.len(), 2);
    assert_eq!(basis.nonbasic_flag.iter().filter(|&&nonbasic| nonbasic).count(), 2);
    for j in 0..2 {
        if !basis.is_basic(j) {
            assert_eq!(basis.nonbasic_move[j], NonbasicMove::Up);
            assert_abs_diff_eq!(values[j], 0_f64, epsilon = 1e-12);
        }
    }
    // The logical of the first row is nonbasic at the row upper bound
    assert!(!basis.is_basic(2));
    assert_abs_diff_eq!(rows[0], 4_f64, epsilon = 1e-9);
}

#[test]
fn warm_basis() {
    let lp = two_by_two();
    // x basic in the first row, the second logical in the second
    let mut basis = SimplexBasis::new(4, vec![0, 3]).unwrap();
    let options = Options::default();
    let mut engine = SimplexEngine::new(&lp, &mut basis, &options);

    assert_eq!(engine.solve(), Ok(SimplexStatus::Optimal));
    assert_eq!(engine.total_iterations(), 0);
    assert_abs_diff_eq!(engine.primal_objective_value(), -12_f64, epsilon = 1e-9);
}
