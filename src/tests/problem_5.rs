//! A boxed variable whose own upper bound is tighter than the row that contains it.
//!
//! min -x
//! s.t. x <= 4
//!      0 <= x <= 1
//!
//! The optimum is `x = 1`, reached by moving `x` to its upper bound without a basis change.
use approx::assert_abs_diff_eq;

use crate::algorithm::simplex::{Phase, SimplexEngine, SimplexStatus};
use crate::algorithm::simplex::basis::{NonbasicMove, SimplexBasis};
use crate::algorithm::simplex::options::{Options, SimplexStrategy};
use crate::data::linear_program::LinearProgram;
use crate::tests::{Events, Recorder};

pub fn create() -> LinearProgram {
    LinearProgram::from_dense_rows(
        &[-1_f64],
        &[(0_f64, 1_f64)],
        &[vec![1_f64]],
        &[(f64::NEG_INFINITY, 4_f64)],
    ).unwrap()
}

#[test]
fn primal_bound_flip() {
    let lp = create();
    let mut basis = SimplexBasis::all_slack(1, 1);
    let options = Options { strategy: SimplexStrategy::Primal, ..Options::default() };
    let mut events = Events::default();

    let (status, values, row_values, objective) = {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options)
            .with_observer(Recorder(&mut events));
        let status = engine.solve().unwrap();
        (status, engine.column_values(), engine.row_values(), engine.primal_objective_value())
    };

    assert_eq!(status, SimplexStatus::Optimal);
    assert_abs_diff_eq!(values[0], 1_f64, epsilon = 1e-9);
    assert_abs_diff_eq!(row_values[0], 1_f64, epsilon = 1e-9);
    assert_abs_diff_eq!(objective, -1_f64, epsilon = 1e-9);

    assert_eq!(events.flips, vec![(0, Phase::PrimalPhase2)]);
    assert!(events.pivots.is_empty());
    assert_eq!(basis.basis_index, vec![1]);
    assert_eq!(basis.nonbasic_move[0], NonbasicMove::Down);
}
