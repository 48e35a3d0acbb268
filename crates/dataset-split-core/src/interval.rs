//! Boundary-typed numeric ranges with symbolic infinite bounds.
//!
//! This module is intentionally small and generic:
//!
//! - An [`Interval`] is one numeric range with an explicit
//!   boundary-inclusivity kind on each side.
//! - Infinite bounds are symbolic ([`Bound::NegInf`] / [`Bound::PosInf`]);
//!   membership tests never compare against an infinite float, they
//!   short-circuit to "inside" on that side.
//! - Construction performs no validation. A whole interval set is
//!   checked together by the [`validate`] submodule so one pass can
//!   report every problem at once.
//!
//! Typical usage:
//!
//! ```
//! use dataset_split_core::interval::Interval;
//!
//! let iv = Interval::open_closed(0.0, 3.0);
//! assert!(!iv.contains(0.0));
//! assert!(iv.contains(3.0));
//! assert_eq!(iv.to_string(), "(0.0,3.0]");
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod validate;

/// One side of an interval: a finite value or a symbolic infinity.
///
/// The symbolic infinities exist so that filename and log rendering can
/// use the stable literals `-inf` / `inf`, and so that membership tests
/// never evaluate an infinite value as a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// A finite bound value.
    Finite(f64),
    /// Negative infinity; always satisfied as a lower bound.
    NegInf,
    /// Positive infinity; always satisfied as an upper bound.
    PosInf,
}

impl Bound {
    /// Render the bound exactly as it appears in artifact filenames:
    /// `-inf`, `inf`, or the literal `f64` value (`0.0`, `1.5`).
    ///
    /// This token is a stable contract: operators map split files back
    /// to the interval definitions by grepping for it.
    pub fn literal(&self) -> String {
        match self {
            Bound::Finite(v) => format!("{v:?}"),
            Bound::NegInf => "-inf".to_string(),
            Bound::PosInf => "inf".to_string(),
        }
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Finite(v)
    }
}

impl Serialize for Bound {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Bound::Finite(v) => serializer.serialize_f64(*v),
            Bound::NegInf => serializer.serialize_str("-inf"),
            Bound::PosInf => serializer.serialize_str("inf"),
        }
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Bound::Finite(v)),
            Repr::Text(t) => match t.as_str() {
                "-inf" => Ok(Bound::NegInf),
                "inf" | "+inf" => Ok(Bound::PosInf),
                other => Err(serde::de::Error::custom(format!(
                    "invalid bound literal: {other:?} (expected a number, \"-inf\", or \"inf\")"
                ))),
            },
        }
    }
}

/// Boundary inclusivity on the two sides of an [`Interval`].
///
/// Naming follows the lower-then-upper convention: `ClosedOpen` is
/// closed on the lower bound and open on the upper bound, i.e. `[a,b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    /// `[a,a]`, a degenerate single-point interval.
    ClosedClosed,
    /// `[a,b)`.
    ClosedOpen,
    /// `(a,b]`.
    OpenClosed,
    /// `(a,b)`.
    OpenOpen,
}

/// One boundary-typed numeric range.
///
/// Immutable after construction. The constructor stores values as
/// given and does not check invariants; use
/// [`validate::validate`] / [`validate::violations`] to check a whole
/// interval set in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound. Never meaningfully `PosInf` for a valid interval.
    pub lower: Bound,
    /// Upper bound. Never meaningfully `NegInf` for a valid interval.
    pub upper: Bound,
    /// Boundary inclusivity kind for both sides.
    pub kind: IntervalKind,
}

impl Interval {
    /// Construct an interval from raw parts without validation.
    pub fn new(lower: Bound, upper: Bound, kind: IntervalKind) -> Self {
        Self { lower, upper, kind }
    }

    /// `[a,b]`; for valid sets, only used as the point interval `[a,a]`.
    pub fn closed_closed(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self::new(lower.into(), upper.into(), IntervalKind::ClosedClosed)
    }

    /// `[a,b)`.
    pub fn closed_open(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self::new(lower.into(), upper.into(), IntervalKind::ClosedOpen)
    }

    /// `(a,b]`.
    pub fn open_closed(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self::new(lower.into(), upper.into(), IntervalKind::OpenClosed)
    }

    /// `(a,b)`.
    pub fn open_open(lower: impl Into<Bound>, upper: impl Into<Bound>) -> Self {
        Self::new(lower.into(), upper.into(), IntervalKind::OpenOpen)
    }

    /// Return true iff `value` lies inside the interval per its
    /// boundary kind and bound values.
    ///
    /// Semantics:
    ///
    /// - An infinite side always passes (no float comparison happens).
    /// - `NaN` is contained in no interval; rows carrying `NaN` fall
    ///   through every interval and surface via the downstream
    ///   row-count-conservation check instead of being silently kept.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }

        let lower_ok = match self.lower {
            Bound::Finite(lo) => match self.kind {
                IntervalKind::ClosedClosed | IntervalKind::ClosedOpen => value >= lo,
                IntervalKind::OpenClosed | IntervalKind::OpenOpen => value > lo,
            },
            Bound::NegInf => true,
            // A +inf lower bound admits nothing; the validator rejects
            // such intervals before they are ever used.
            Bound::PosInf => false,
        };

        let upper_ok = match self.upper {
            Bound::Finite(hi) => match self.kind {
                IntervalKind::ClosedClosed | IntervalKind::OpenClosed => value <= hi,
                IntervalKind::ClosedOpen | IntervalKind::OpenOpen => value < hi,
            },
            Bound::PosInf => true,
            Bound::NegInf => false,
        };

        lower_ok && upper_ok
    }
}

impl fmt::Display for Interval {
    /// Mathematical bracket notation, e.g. `(0.0,3.0]` or `(-inf,0.0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = match self.kind {
            IntervalKind::ClosedClosed | IntervalKind::ClosedOpen => '[',
            IntervalKind::OpenClosed | IntervalKind::OpenOpen => '(',
        };
        let close = match self.kind {
            IntervalKind::ClosedClosed | IntervalKind::OpenClosed => ']',
            IntervalKind::ClosedOpen | IntervalKind::OpenOpen => ')',
        };
        write!(
            f,
            "{open}{},{}{close}",
            self.lower.literal(),
            self.upper.literal()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_semantics_per_kind() {
        let oc = Interval::open_closed(0.0, 1.0);
        assert!(!oc.contains(0.0));
        assert!(oc.contains(1.0));
        assert!(oc.contains(0.5));

        let co = Interval::closed_open(0.0, 1.0);
        assert!(co.contains(0.0));
        assert!(!co.contains(1.0));

        let oo = Interval::open_open(0.0, 1.0);
        assert!(!oo.contains(0.0));
        assert!(!oo.contains(1.0));
        assert!(oo.contains(0.5));

        let cc = Interval::closed_closed(3.0, 3.0);
        assert!(cc.contains(3.0));
        assert!(!cc.contains(3.0001));
    }

    #[test]
    fn infinite_bounds_short_circuit() {
        let below_zero = Interval::open_open(Bound::NegInf, Bound::Finite(0.0));
        assert!(below_zero.contains(-1e9));
        assert!(!below_zero.contains(0.0));

        let up_to_zero = Interval::open_closed(Bound::NegInf, Bound::Finite(0.0));
        assert!(up_to_zero.contains(0.0));

        let above_one = Interval::open_open(Bound::Finite(1.0), Bound::PosInf);
        assert!(above_one.contains(1e12));
        assert!(!above_one.contains(1.0));
    }

    #[test]
    fn nan_is_in_no_interval() {
        let everything = Interval::open_open(Bound::NegInf, Bound::PosInf);
        assert!(!everything.contains(f64::NAN));
    }

    #[test]
    fn display_uses_bracket_notation() {
        assert_eq!(Interval::open_closed(0.0, 3.0).to_string(), "(0.0,3.0]");
        assert_eq!(Interval::closed_open(0.0, 1.0).to_string(), "[0.0,1.0)");
        assert_eq!(Interval::closed_closed(0.0, 0.0).to_string(), "[0.0,0.0]");
        assert_eq!(
            Interval::open_open(Bound::NegInf, Bound::Finite(0.0)).to_string(),
            "(-inf,0.0)"
        );
    }

    #[test]
    fn bound_literals_match_filename_contract() {
        assert_eq!(Bound::Finite(0.0).literal(), "0.0");
        assert_eq!(Bound::Finite(1.5).literal(), "1.5");
        assert_eq!(Bound::Finite(-2.0).literal(), "-2.0");
        assert_eq!(Bound::NegInf.literal(), "-inf");
        assert_eq!(Bound::PosInf.literal(), "inf");
    }

    #[test]
    fn bound_serde_roundtrip() {
        let finite: Bound = serde_json::from_str("0.5").unwrap();
        assert_eq!(finite, Bound::Finite(0.5));

        let neg: Bound = serde_json::from_str("\"-inf\"").unwrap();
        assert_eq!(neg, Bound::NegInf);

        let pos: Bound = serde_json::from_str("\"inf\"").unwrap();
        assert_eq!(pos, Bound::PosInf);

        assert_eq!(serde_json::to_string(&Bound::Finite(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Bound::NegInf).unwrap(), "\"-inf\"");

        let bad: Result<Bound, _> = serde_json::from_str("\"infinity\"");
        assert!(bad.is_err());
    }

    #[test]
    fn interval_serde_roundtrip() {
        let iv = Interval::open_closed(Bound::NegInf, Bound::Finite(0.0));
        let json = serde_json::to_string(&iv).unwrap();
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iv);
        assert!(json.contains("open_closed"));
    }
}
