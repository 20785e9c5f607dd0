//! Real-valued score with explicit absence.
//!
//! A `Score` is either present (a finite `f64`) or missing. Missing is an
//! absorbing element: any arithmetic with a missing operand is missing.
//! Non-finite values never enter a present score: constructing one from
//! NaN or ±∞ yields missing.

use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// A measure value that may be absent.
///
/// Absence is the normal outcome for out-of-vocabulary tokens in sparse
/// historical spaces. It flows through every primitive and only becomes an
/// empty cell when a table is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(Option<f64>);

impl Score {
    /// The missing score.
    pub const MISSING: Score = Score(None);

    /// Wrap a raw value. NaN and infinities become missing.
    pub fn new(value: f64) -> Self {
        if value.is_finite() { Score(Some(value)) } else { Score(None) }
    }

    pub fn value(self) -> Option<f64> { self.0 }
    pub fn is_missing(self) -> bool { self.0.is_none() }
    pub fn is_present(self) -> bool { self.0.is_some() }

    /// Apply `f` to a present value; missing stays missing.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self.0 {
            Some(v) => Score::new(f(v)),
            None => Score::MISSING,
        }
    }

    /// Combine two scores; missing if either is missing.
    pub fn zip_with(self, other: Score, f: impl FnOnce(f64, f64) -> f64) -> Self {
        match (self.0, other.0) {
            (Some(a), Some(b)) => Score::new(f(a, b)),
            _ => Score::MISSING,
        }
    }
}

impl From<Option<f64>> for Score {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Score::MISSING, Score::new)
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self { Score::new(v) }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score { self.zip_with(rhs, |a, b| a + b) }
}

impl Mul for Score {
    type Output = Score;
    fn mul(self, rhs: Score) -> Score { self.zip_with(rhs, |a, b| a * b) }
}

/// Renders the shortest round-trip form of the value; missing renders empty.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:?}"),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Composites
// ============================================================================

/// Additive, multiplicative and combined composites of a
/// compound–modifier score `cm` and a compound–head score `ch`.
///
/// The product is taken on the raw scale. With signed cosines in [-1, 1]
/// two negative similarities multiply to a positive value, so `mult` is not
/// monotone in either input. Downstream models are fitted on this scale, so
/// it is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composites {
    pub add: Score,
    pub mult: Score,
    pub comb: Score,
}

impl Composites {
    pub fn of(cm: Score, ch: Score) -> Self {
        let add = cm + ch;
        let mult = cm * ch;
        Self { add, mult, comb: add + mult }
    }
}
