//! # Pricing
//!
//! Selection of the leaving row in the dual simplex and of the entering column in the primal
//! simplex. Both pick the largest squared infeasibility relative to an edge weight. Equal scores
//! go to the smallest index, so the result does not depend on how the work is split over threads.
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::algorithm::simplex::basis::NonbasicMove;
use crate::data::linear_program::elements::BoundType;

/// Weights are never smaller than this when dividing by them.
const MIN_WEIGHT: f64 = 1e-12;

/// Amount by which the reduced cost `dual` of a nonbasic variable has the wrong sign.
///
/// Fixed variables are always dual feasible, free variables need a zero reduced cost.
pub fn dual_infeasibility(dual: f64, nonbasic_move: NonbasicMove, lower: f64, upper: f64, tolerance: f64) -> f64 {
    let infeasibility = match BoundType::of(lower, upper) {
        BoundType::Fixed => 0_f64,
        BoundType::Free => dual.abs(),
        _ => -nonbasic_move.sign() * dual,
    };

    if infeasibility > tolerance { infeasibility } else { 0_f64 }
}

/// Amount by which `value` lies outside `[lower, upper]`, beyond `tolerance`.
pub fn primal_infeasibility(value: f64, lower: f64, upper: f64, tolerance: f64) -> f64 {
    if value < lower - tolerance {
        lower - value
    } else if value > upper + tolerance {
        value - upper
    } else {
        0_f64
    }
}

/// Result of the row choice of the dual simplex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowChoice {
    /// Most infeasible row relative to its weight, if any row is infeasible.
    pub row: Option<usize>,
    /// Sum of the primal infeasibilities over all rows.
    pub sum_infeasibilities: f64,
}

/// Choose the leaving row for the dual simplex (CHUZR).
pub fn choose_row(
    base_value: &[f64],
    base_lower: &[f64],
    base_upper: &[f64],
    weights: &[f64],
    tolerance: f64,
) -> RowChoice {
    debug_assert_eq!(base_value.len(), weights.len());

    let mut best: Option<(usize, f64)> = None;
    let mut sum_infeasibilities = 0_f64;
    for (i, &value) in base_value.iter().enumerate() {
        let infeasibility = primal_infeasibility(value, base_lower[i], base_upper[i], tolerance);
        if infeasibility > 0_f64 {
            sum_infeasibilities += infeasibility;
            let score = infeasibility * infeasibility / weights[i].max(MIN_WEIGHT);
            best = better(best, Some((i, score)));
        }
    }

    RowChoice { row: best.map(|(i, _)| i), sum_infeasibilities }
}

/// Choose the entering column for the primal simplex (CHUZC).
///
/// # Arguments
///
/// * `duals`: Reduced costs for all variables, only read for nonbasic ones.
/// * `pool`: Threads to distribute the scan over, sequential if `None`.
///
/// # Return value
///
/// The index of the variable with the largest weighted dual infeasibility, if there is one.
#[allow(clippy::too_many_arguments)]
pub fn choose_column(
    duals: &[f64],
    nonbasic_flag: &[bool],
    nonbasic_move: &[NonbasicMove],
    lower: &[f64],
    upper: &[f64],
    weights: &[f64],
    tolerance: f64,
    pool: Option<&ThreadPool>,
) -> Option<usize> {
    let score = |j: usize| {
        if !nonbasic_flag[j] {
            return None;
        }
        let infeasibility = dual_infeasibility(duals[j], nonbasic_move[j], lower[j], upper[j], tolerance);
        (infeasibility > 0_f64)
            .then(|| (j, infeasibility * infeasibility / weights[j].max(MIN_WEIGHT)))
    };

    let best = match pool {
        Some(pool) => pool.install(|| {
            (0..duals.len()).into_par_iter()
                .filter_map(score)
                .reduce_with(|a, b| better(Some(a), Some(b)).unwrap_or(a))
        }),
        None => (0..duals.len()).filter_map(score).fold(None, |best, candidate| better(best, Some(candidate))),
    };

    best.map(|(j, _)| j)
}

/// The candidate with the larger score, or the smaller index when scores are equal.
fn better(a: Option<(usize, f64)>, b: Option<(usize, f64)>) -> Option<(usize, f64)> {
    match (a, b) {
        (Some((i, x)), Some((j, y))) => {
            if y > x || (y == x && j < i) { Some((j, y)) } else { Some((i, x)) }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

#[cfg(test)]
mod test {
    use rayon::ThreadPoolBuilder;

    use crate::algorithm::simplex::basis::NonbasicMove;
    use crate::algorithm::simplex::strategy::pricing::{choose_column, choose_row, dual_infeasibility};

    const INF: f64 = f64::INFINITY;

    #[test]
    fn infeasibility() {
        assert_eq!(dual_infeasibility(-2_f64, NonbasicMove::Up, 0_f64, INF, 1e-7), 2_f64);
        assert_eq!(dual_infeasibility(2_f64, NonbasicMove::Up, 0_f64, INF, 1e-7), 0_f64);
        assert_eq!(dual_infeasibility(2_f64, NonbasicMove::Down, -INF, 0_f64, 1e-7), 2_f64);
        assert_eq!(dual_infeasibility(-3_f64, NonbasicMove::Zero, -INF, INF, 1e-7), 3_f64);
        assert_eq!(dual_infeasibility(-3_f64, NonbasicMove::Zero, 1_f64, 1_f64, 1e-7), 0_f64);
        assert_eq!(dual_infeasibility(-1e-9, NonbasicMove::Up, 0_f64, 1_f64, 1e-7), 0_f64);
    }

    #[test]
    fn row() {
        let choice = choose_row(
            &[-1_f64, 5_f64, 0.5, 7_f64],
            &[0_f64, 0_f64, 0_f64, 0_f64],
            &[1_f64, 2_f64, 1_f64, 4_f64],
            &[1_f64, 4_f64, 1_f64, 1_f64],
            1e-7,
        );
        // Scores 1, 9 / 4 and 9
        assert_eq!(choice.row, Some(3));
        assert_eq!(choice.sum_infeasibilities, 7_f64);

        let none = choose_row(&[0.5], &[0_f64], &[1_f64], &[1_f64], 1e-7);
        assert_eq!(none.row, None);
        assert_eq!(none.sum_infeasibilities, 0_f64);
    }

    #[test]
    fn column_tie_break() {
        let duals = [-1_f64, -2_f64, 0_f64, 2_f64, -2_f64];
        let nonbasic = [true, true, false, true, true];
        let moves = [NonbasicMove::Up; 5];
        let lower = [0_f64; 5];
        let upper = [INF; 5];
        let weights = [1_f64; 5];

        let sequential = choose_column(&duals, &nonbasic, &moves, &lower, &upper, &weights, 1e-7, None);
        assert_eq!(sequential, Some(1));

        let pool = ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        let parallel = choose_column(&duals, &nonbasic, &moves, &lower, &upper, &weights, 1e-7, Some(&pool));
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn column_optimal() {
        let chosen = choose_column(
            &[1_f64, -1_f64], &[true, false], &[NonbasicMove::Up, NonbasicMove::Zero],
            &[0_f64; 2], &[INF; 2], &[1_f64; 2], 1e-7, None,
        );
        assert_eq!(chosen, None);
    }
}
