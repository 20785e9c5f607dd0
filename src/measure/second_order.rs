//! Second-order similarity.
//!
//! Instead of comparing two vectors directly, compare their similarity
//! *profiles* over a shared neighborhood:
//!
//! ```text
//! profile₁[n] = cos(p₁, n @ space₁)
//! profile₂[n] = cos(p₂, n @ space₂)     for n in neighborhood
//! score       = cos(profile₁, profile₂)
//! ```
//!
//! Only relative similarity to shared context tokens is compared, never raw
//! coordinates across spaces, so two independently trained (unaligned)
//! spaces can be compared directly.
//!
//! A neighbor contributes only if both of its cosines are present. With no
//! contributing neighbor the score is missing, never zero.

use crate::model::{Neighborhood, Score};
use crate::space::EmbeddingSpace;
use super::similarity::{cosine_distance, cosine_similarity, Framing};
use super::vector::Probe;

/// Second-order similarity of `probe1` in `space1` against `probe2` in
/// `space2` over `neighborhood`.
pub fn second_order<S1, S2>(
    probe1: Probe<'_>,
    probe2: Probe<'_>,
    neighborhood: Option<&Neighborhood>,
    space1: &S1,
    space2: &S2,
    framing: Framing,
) -> Score
where
    S1: EmbeddingSpace + ?Sized,
    S2: EmbeddingSpace + ?Sized,
{
    let Some(neighborhood) = neighborhood else {
        return Score::MISSING;
    };
    let target1 = probe1.resolve(space1);
    let target2 = probe2.resolve(space2);

    let mut profile1 = Vec::with_capacity(neighborhood.len());
    let mut profile2 = Vec::with_capacity(neighborhood.len());
    for token in neighborhood.iter() {
        let cos1 = cosine_similarity(target1.as_deref(), space1.vector(token));
        let cos2 = cosine_similarity(target2.as_deref(), space2.vector(token));
        if let (Some(c1), Some(c2)) = (cos1.value(), cos2.value()) {
            profile1.push(c1);
            profile2.push(c2);
        }
    }

    if profile1.is_empty() {
        return Score::MISSING;
    }
    cosine_distance(profile1.as_slice(), profile2.as_slice())
        .map(|d| framing.from_distance(d))
        .into()
}

/// Synchronic variant: both probes in the same space.
pub fn second_order_within<S: EmbeddingSpace + ?Sized>(
    probe1: Probe<'_>,
    probe2: Probe<'_>,
    neighborhood: Option<&Neighborhood>,
    space: &S,
    framing: Framing,
) -> Score {
    second_order(probe1, probe2, neighborhood, space, space, framing)
}

/// Diachronic variant: the same probe in two (unaligned) spaces.
pub fn second_order_across<S1, S2>(
    probe: Probe<'_>,
    neighborhood: Option<&Neighborhood>,
    space1: &S1,
    space2: &S2,
    framing: Framing,
) -> Score
where
    S1: EmbeddingSpace + ?Sized,
    S2: EmbeddingSpace + ?Sized,
{
    second_order(probe, probe, neighborhood, space1, space2, framing)
}
