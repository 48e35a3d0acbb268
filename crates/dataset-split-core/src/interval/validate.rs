//! Batch validation of an interval set for one column.
//!
//! The checks here are per-interval well-formedness checks only:
//!
//! - A `ClosedClosed` interval must be a single point (equal bounds).
//! - A lower bound is never `+inf`; an upper bound is never `-inf`.
//! - An infinite side must be open on that side.
//! - Finite bounds must be ordered (`upper >= lower`).
//!
//! Overlaps and gaps *between* intervals are deliberately not checked
//! here. They surface downstream through the row-count-conservation
//! check after partitioning, which is the safety net for badly
//! specified sets.

use std::fmt;

use crate::interval::{Bound, Interval, IntervalKind};

/// One well-formedness violation found in an interval set.
///
/// Carries the index of the offending interval so a whole set can be
/// reported in a single consolidated message.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A `ClosedClosed` interval whose bounds differ; `[a,b]` with
    /// `a != b` is only ever a specification mistake in this model.
    PointBoundsDiffer {
        /// Index of the interval within the set.
        index: usize,
        /// The interval's lower bound.
        lower: Bound,
        /// The interval's upper bound.
        upper: Bound,
    },
    /// Lower bound is `+inf`, which admits no value at all.
    LowerBoundPosInf {
        /// Index of the interval within the set.
        index: usize,
    },
    /// Upper bound is `-inf`, which admits no value at all.
    UpperBoundNegInf {
        /// Index of the interval within the set.
        index: usize,
    },
    /// Lower bound is `-inf` but the kind closes the lower side.
    ClosedAtNegInf {
        /// Index of the interval within the set.
        index: usize,
        /// The offending kind.
        kind: IntervalKind,
    },
    /// Upper bound is `+inf` but the kind closes the upper side.
    ClosedAtPosInf {
        /// Index of the interval within the set.
        index: usize,
        /// The offending kind.
        kind: IntervalKind,
    },
    /// Both bounds are finite but `upper < lower`.
    BoundsOutOfOrder {
        /// Index of the interval within the set.
        index: usize,
        /// The finite lower bound.
        lower: f64,
        /// The finite upper bound.
        upper: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::PointBoundsDiffer { index, lower, upper } => write!(
                f,
                "interval #{index}: closed-closed interval must be a single point, \
                 got [{},{}]",
                lower.literal(),
                upper.literal()
            ),
            Violation::LowerBoundPosInf { index } => {
                write!(f, "interval #{index}: lower bound must not be +inf")
            }
            Violation::UpperBoundNegInf { index } => {
                write!(f, "interval #{index}: upper bound must not be -inf")
            }
            Violation::ClosedAtNegInf { index, kind } => write!(
                f,
                "interval #{index}: lower bound -inf requires an open lower side, got {kind:?}"
            ),
            Violation::ClosedAtPosInf { index, kind } => write!(
                f,
                "interval #{index}: upper bound +inf requires an open upper side, got {kind:?}"
            ),
            Violation::BoundsOutOfOrder { index, lower, upper } => write!(
                f,
                "interval #{index}: bounds out of order (lower={lower:?}, upper={upper:?})"
            ),
        }
    }
}

/// Collect every well-formedness violation in `intervals`.
///
/// Returns an empty vector iff the set is valid. The walk never stops
/// at the first problem so callers can log one consolidated report.
pub fn violations(intervals: &[Interval]) -> Vec<Violation> {
    let mut out = Vec::new();

    for (index, iv) in intervals.iter().enumerate() {
        if iv.kind == IntervalKind::ClosedClosed && iv.lower != iv.upper {
            out.push(Violation::PointBoundsDiffer {
                index,
                lower: iv.lower,
                upper: iv.upper,
            });
        }

        if iv.lower == Bound::PosInf {
            out.push(Violation::LowerBoundPosInf { index });
        }
        if iv.upper == Bound::NegInf {
            out.push(Violation::UpperBoundNegInf { index });
        }

        if iv.lower == Bound::NegInf
            && matches!(
                iv.kind,
                IntervalKind::ClosedClosed | IntervalKind::ClosedOpen
            )
        {
            out.push(Violation::ClosedAtNegInf {
                index,
                kind: iv.kind,
            });
        }
        if iv.upper == Bound::PosInf
            && matches!(
                iv.kind,
                IntervalKind::ClosedClosed | IntervalKind::OpenClosed
            )
        {
            out.push(Violation::ClosedAtPosInf {
                index,
                kind: iv.kind,
            });
        }

        if let (Bound::Finite(lower), Bound::Finite(upper)) = (iv.lower, iv.upper) {
            if upper < lower {
                out.push(Violation::BoundsOutOfOrder {
                    index,
                    lower,
                    upper,
                });
            }
        }
    }

    out
}

/// Minimal boolean contract: `true` iff [`violations`] finds nothing.
pub fn validate(intervals: &[Interval]) -> bool {
    violations(intervals).is_empty()
}
