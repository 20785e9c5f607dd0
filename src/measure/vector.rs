//! Missing-safe vector access.

use std::borrow::Cow;

use crate::space::EmbeddingSpace;

/// The vector for `token`, or `None` when it is out of vocabulary.
pub fn vector<'s, S: EmbeddingSpace + ?Sized>(token: &str, space: &'s S) -> Option<&'s [f32]> {
    space.vector(token)
}

/// Element-wise mean of `vectors`.
///
/// `None` if any input is missing, the list is empty, or the inputs differ
/// in length. A pooled modifier+head vector only means something when both
/// constituents are in the space.
pub fn mean(vectors: &[Option<&[f32]>]) -> Option<Vec<f32>> {
    let first = (*vectors.first()?)?;
    let mut sum = vec![0.0f64; first.len()];
    for v in vectors {
        let v = (*v)?;
        if v.len() != sum.len() {
            return None;
        }
        for (acc, &x) in sum.iter_mut().zip(v) {
            *acc += f64::from(x);
        }
    }
    let n = vectors.len() as f64;
    Some(sum.into_iter().map(|x| (x / n) as f32).collect())
}

/// What a measure looks up in a space: one token, or the mean of several.
///
/// The caller picks the variant explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe<'a> {
    Single(&'a str),
    Pooled(&'a [&'a str]),
}

impl<'a> Probe<'a> {
    /// Resolve to a vector in `space`: borrowed for a single token, owned
    /// for a pooled mean.
    pub fn resolve<'s, S: EmbeddingSpace + ?Sized>(&self, space: &'s S) -> Option<Cow<'s, [f32]>> {
        match *self {
            Probe::Single(token) => vector(token, space).map(Cow::Borrowed),
            Probe::Pooled(tokens) => {
                let vecs: Vec<Option<&[f32]>> = tokens.iter().map(|t| vector(t, space)).collect();
                mean(&vecs).map(Cow::Owned)
            }
        }
    }
}
