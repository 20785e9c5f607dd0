//! Missing-safe cosine similarity and distance.

use serde::{Deserialize, Serialize};

use crate::model::Score;

/// Whether a measure is reported as a similarity or as its complement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// `1 − distance`
    #[default]
    Similarity,
    /// `distance`
    Distance,
}

impl Framing {
    /// Express a distance in this framing.
    pub fn from_distance(self, distance: f64) -> f64 {
        match self {
            Framing::Similarity => 1.0 - distance,
            Framing::Distance => distance,
        }
    }
}

/// Cosine distance `1 − a·b / (‖a‖‖b‖)`, computed in f64.
///
/// `None` for mismatched lengths or a zero-norm input.
pub fn cosine_distance<A, B>(a: &[A], b: &[B]) -> Option<f64>
where
    A: Copy + Into<f64>,
    B: Copy + Into<f64>,
{
    if a.len() != b.len() {
        return None;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x.into(), y.into());
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    Some(1.0 - dot / (na.sqrt() * nb.sqrt()))
}

/// Cosine between two possibly-missing vectors, in the given framing.
pub fn cosine(a: Option<&[f32]>, b: Option<&[f32]>, framing: Framing) -> Score {
    match (a, b) {
        (Some(a), Some(b)) => cosine_distance(a, b)
            .map(|d| framing.from_distance(d))
            .into(),
        _ => Score::MISSING,
    }
}

/// Cosine similarity (`1 − distance`).
pub fn cosine_similarity(a: Option<&[f32]>, b: Option<&[f32]>) -> Score {
    cosine(a, b, Framing::Similarity)
}
