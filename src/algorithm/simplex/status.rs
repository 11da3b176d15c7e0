//! # Validity of derived data
//!
//! The engine keeps many arrays that are derived from the basis, the costs and the bounds. Each of
//! them has a flag here. Flags are set by the routine that computes the data and cleared only by
//! `StatusFlags::invalidate`, which knows for every kind of change what becomes stale.
use enum_map::{Enum, EnumMap};

/// A piece of derived data that can be up to date or stale.
#[allow(missing_docs)]
#[derive(Enum, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Validity {
    HasBasis,
    HasMatrixColWise,
    HasMatrixRowWise,
    HasFactorArrays,
    HasEdgeWeights,
    HasNonbasicDualValues,
    HasBasicPrimalValues,
    /// A factorization of the current basis matrix is available, possibly with updates.
    HasInvert,
    /// The factorization has no updates applied since it was computed.
    HasFreshInvert,
    /// All values were recomputed from a fresh factorization and nothing changed since.
    HasFreshRebuild,
    HasDualObjectiveValue,
    HasPrimalObjectiveValue,
    HasDualRay,
    HasPrimalRay,
}

/// A modification of the engine state that makes derived data stale.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Change {
    /// The basis was replaced by an arbitrary other basis.
    Basis,
    /// A single basis exchange whose effect on the factorization, primal values and dual values
    /// was applied incrementally.
    Pivot,
    /// A nonbasic variable moved to its opposite bound, with primal values updated incrementally.
    Flip,
    /// Bounds of some variables changed.
    Bounds,
    /// Costs of some variables changed.
    Costs,
}

impl Change {
    fn invalidates(self) -> &'static [Validity] {
        use Validity::*;

        match self {
            Change::Basis => &[
                HasInvert, HasFreshInvert, HasFreshRebuild, HasEdgeWeights,
                HasNonbasicDualValues, HasBasicPrimalValues,
                HasDualObjectiveValue, HasPrimalObjectiveValue, HasDualRay, HasPrimalRay,
            ],
            Change::Pivot => &[
                HasFreshInvert, HasFreshRebuild,
                HasDualObjectiveValue, HasPrimalObjectiveValue, HasDualRay, HasPrimalRay,
            ],
            Change::Flip => &[
                HasFreshRebuild, HasDualObjectiveValue, HasPrimalObjectiveValue,
                HasDualRay, HasPrimalRay,
            ],
            Change::Bounds => &[
                HasBasicPrimalValues, HasFreshRebuild,
                HasDualObjectiveValue, HasPrimalObjectiveValue, HasDualRay, HasPrimalRay,
            ],
            Change::Costs => &[
                HasNonbasicDualValues, HasFreshRebuild,
                HasDualObjectiveValue, HasPrimalObjectiveValue, HasDualRay, HasPrimalRay,
            ],
        }
    }
}

/// Current validity of all derived data.
#[derive(Debug, Clone, Default)]
pub struct StatusFlags {
    flags: EnumMap<Validity, bool>,
}

impl StatusFlags {
    /// Whether `validity` currently holds.
    pub fn is_set(&self, validity: Validity) -> bool {
        self.flags[validity]
    }

    /// Record that the data behind `validity` was just computed.
    pub(crate) fn set(&mut self, validity: Validity) {
        self.flags[validity] = true;
    }

    /// Clear the flags of all data made stale by `change`.
    pub(crate) fn invalidate(&mut self, change: Change) {
        for &validity in change.invalidates() {
            self.flags[validity] = false;
        }
    }
}
