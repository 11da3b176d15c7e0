//! # Tests that require a look inside the crate
//!
//! Every problem module exposes a `create()` function building the problem, and tests solving it
//! with different options.
use approx::assert_abs_diff_eq;

use crate::algorithm::simplex::Phase;
use crate::algorithm::simplex::observer::{PivotReport, Recovery, SimplexObserver};

pub mod problem_1;
pub mod problem_4;
pub mod problem_5;

/// Compare two slices entry by entry.
fn assert_close(computed: &[f64], expected: &[f64], epsilon: f64) {
    assert_eq!(computed.len(), expected.len());
    for (&a, &b) in computed.iter().zip(expected) {
        assert_abs_diff_eq!(a, b, epsilon = epsilon);
    }
}

/// Events reported by the engine during a solve.
#[derive(Debug, Default)]
struct Events {
    pivots: Vec<PivotReport>,
    flips: Vec<(usize, Phase)>,
    recoveries: Vec<Recovery>,
}

impl Events {
    fn edge_weight_resets(&self) -> usize {
        self.recoveries.iter().filter(|&recovery| *recovery == Recovery::EdgeWeightReset).count()
    }
}

/// Collects events in a borrowed `Events`, which can be inspected after the engine is dropped.
struct Recorder<'a>(&'a mut Events);

impl SimplexObserver for Recorder<'_> {
    fn pivot_performed(&mut self, report: &PivotReport) {
        self.0.pivots.push(report.clone());
    }

    fn bound_flipped(&mut self, variable: usize, phase: Phase) {
        self.0.flips.push((variable, phase));
    }

    fn recovered(&mut self, recovery: &Recovery) {
        self.0.recoveries.push(recovery.clone());
    }
}
