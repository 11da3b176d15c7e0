//! Two identical columns, so that any basis holding both is singular.
//!
//! min -x - y
//! s.t. x + y <= 4
//!      x + y <= 6
//!      x, y >= 0
//!
//! The optimal objective value is `-4`, attained on the whole segment `x + y = 4`.
use approx::assert_abs_diff_eq;

use crate::algorithm::simplex::{SimplexEngine, SimplexStatus};
use crate::algorithm::simplex::basis::SimplexBasis;
use crate::algorithm::simplex::observer::Recovery;
use crate::algorithm::simplex::options::Options;
use crate::data::linear_program::LinearProgram;
use crate::tests::{Events, Recorder};

pub fn create() -> LinearProgram {
    LinearProgram::from_dense_rows(
        &[-1_f64, -1_f64],
        &[(0_f64, f64::INFINITY), (0_f64, f64::INFINITY)],
        &[vec![1_f64, 1_f64], vec![1_f64, 1_f64]],
        &[(f64::NEG_INFINITY, 4_f64), (f64::NEG_INFINITY, 6_f64)],
    ).unwrap()
}

#[test]
fn singular_warm_basis() {
    let lp = create();
    let mut basis = SimplexBasis::new(4, vec![0, 1]).unwrap();
    let options = Options::default();
    let mut events = Events::default();

    let (status, values, objective) = {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options)
            .with_observer(Recorder(&mut events));
        let status = engine.solve().unwrap();
        (status, engine.column_values(), engine.primal_objective_value())
    };

    assert_eq!(status, SimplexStatus::Optimal);
    assert_abs_diff_eq!(objective, -4_f64, epsilon = 1e-9);
    assert_abs_diff_eq!(values[0] + values[1], 4_f64, epsilon = 1e-9);
    assert!(basis.is_consistent(2, 2));
    assert_ne!(basis.basis_index, vec![0, 1]);

    // First a second attempt with a larger pivot threshold, then the all-logical basis
    assert!(matches!(events.recoveries.first(), Some(Recovery::RaisedPivotThreshold { .. })));
    assert_eq!(events.recoveries.get(1), Some(&Recovery::AllSlackBasis));
    assert_eq!(events.recoveries.iter().filter(|&recovery| *recovery == Recovery::AllSlackBasis).count(), 1);
}

#[test]
fn nonsingular_warm_basis() {
    let lp = create();
    // x basic in the first row, the second logical in the second
    let mut basis = SimplexBasis::new(4, vec![0, 3]).unwrap();
    let options = Options::default();
    let mut events = Events::default();

    let status = {
        let mut engine = SimplexEngine::new(&lp, &mut basis, &options)
            .with_observer(Recorder(&mut events));
        engine.solve().unwrap()
    };

    assert_eq!(status, SimplexStatus::Optimal);
    assert!(!events.recoveries.iter().any(|recovery| matches!(
        recovery,
        Recovery::RaisedPivotThreshold { .. } | Recovery::AllSlackBasis,
    )));
}
