//! Top-k neighbor retrieval and neighbor-set comparison.

use crate::model::{NeighborSet, Neighborhood, Score};
use crate::space::EmbeddingSpace;
use crate::{Error, Result};
use super::similarity::Framing;
use super::vector::Probe;

/// The `k` nearest neighbors of `token` (itself excluded), or `None` when
/// it is out of vocabulary or its vector has no direction.
pub fn neighbors<S: EmbeddingSpace + ?Sized>(token: &str, space: &S, k: usize) -> Option<NeighborSet> {
    space.most_similar(token, k).and_then(|entries| found(entries, k))
}

/// The `k` nearest neighbors of the mean vector of `tokens`, or `None` when
/// the pooled vector is missing or zero.
pub fn neighbors_by_pooled_vector<S: EmbeddingSpace + ?Sized>(
    tokens: &[&str],
    space: &S,
    k: usize,
) -> Option<NeighborSet> {
    let pooled = Probe::Pooled(tokens).resolve(space)?;
    found(space.similar_by_vector(&pooled, k), k)
}

/// A search that asked for neighbors and got none had nothing to rank
/// against (zero-norm query): that is an absent list, not an empty one.
fn found(entries: Vec<(String, f32)>, k: usize) -> Option<NeighborSet> {
    if entries.is_empty() && k > 0 {
        return None;
    }
    Some(NeighborSet::new(entries))
}

/// Neighbors for a probe of either kind.
pub fn neighbors_of<S: EmbeddingSpace + ?Sized>(probe: Probe<'_>, space: &S, k: usize) -> Option<NeighborSet> {
    match probe {
        Probe::Single(token) => neighbors(token, space, k),
        Probe::Pooled(tokens) => neighbors_by_pooled_vector(tokens, space, k),
    }
}

fn check_sizes(a: &NeighborSet, b: &NeighborSet) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::NeighborSizeMismatch { left: a.len(), right: b.len() });
    }
    Ok(())
}

/// Fraction of shared tokens between two top-k lists, rank-insensitive.
///
/// Missing if either list is missing. Two present lists of different
/// sizes are a contract violation and fail. An empty pair (k = 0) has no
/// defined overlap and is missing.
pub fn overlap(a: Option<&NeighborSet>, b: Option<&NeighborSet>, framing: Framing) -> Result<Score> {
    let (Some(a), Some(b)) = (a, b) else {
        return Ok(Score::MISSING);
    };
    check_sizes(a, b)?;
    if a.is_empty() {
        return Ok(Score::MISSING);
    }

    let left = a.token_set();
    let shared = b.token_set().iter().filter(|t| left.contains(*t)).count();
    let distance = 1.0 - shared as f64 / a.len() as f64;
    Ok(Score::new(framing.from_distance(distance)))
}

/// Token-identity union of two neighbor lists, missing if either is.
///
/// Same size contract as [`overlap`].
pub fn union(a: Option<&NeighborSet>, b: Option<&NeighborSet>) -> Result<Option<Neighborhood>> {
    let (Some(a), Some(b)) = (a, b) else {
        return Ok(None);
    };
    check_sizes(a, b)?;
    Ok(Some(Neighborhood::union(a, b)))
}
