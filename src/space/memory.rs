//! In-memory embedding space.
//!
//! This is the reference implementation of `EmbeddingSpace`: one dense
//! row-major matrix plus a hashbrown vocabulary index.
//!
//! ## Limitations
//!
//! - **Brute-force search**: `similar_by_vector()` scores every row. Fine
//!   for historical-corpus vocabularies (10⁴–10⁵ tokens), not for web scale.
//! - **Zero vectors**: rows with zero norm never appear as neighbors, and a
//!   zero-norm query has no neighbors at all.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::{Error, Result};
use super::EmbeddingSpace;

/// Dense in-memory embedding space.
#[derive(Debug, Clone, Default)]
pub struct MemorySpace {
    dim: usize,
    index: HashMap<String, usize>,
    tokens: Vec<String>,
    /// Row-major, `tokens.len() × dim`.
    data: Vec<f32>,
    norms: Vec<f32>,
}

impl MemorySpace {
    pub fn new(dim: usize) -> Self {
        Self { dim, ..Default::default() }
    }

    pub fn with_capacity(dim: usize, tokens: usize) -> Self {
        Self {
            dim,
            index: HashMap::with_capacity(tokens),
            tokens: Vec::with_capacity(tokens),
            data: Vec::with_capacity(tokens * dim),
            norms: Vec::with_capacity(tokens),
        }
    }

    /// Build a space from `(token, vector)` pairs. All vectors must share
    /// the dimensionality of the first one.
    pub fn from_pairs<I, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, Vec<f32>)>,
        T: Into<String>,
    {
        let mut space: Option<MemorySpace> = None;
        for (token, vector) in pairs {
            let space = space.get_or_insert_with(|| MemorySpace::new(vector.len()));
            space.insert(token, &vector)?;
        }
        Ok(space.unwrap_or_default())
    }

    /// Insert or replace a token's vector.
    pub fn insert(&mut self, token: impl Into<String>, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: vector.len() });
        }
        let token = token.into();
        let norm = l2_norm(vector);
        match self.index.get(&token) {
            Some(&row) => {
                self.data[row * self.dim..(row + 1) * self.dim].copy_from_slice(vector);
                self.norms[row] = norm;
            }
            None => {
                self.index.insert(token.clone(), self.tokens.len());
                self.tokens.push(token);
                self.data.extend_from_slice(vector);
                self.norms.push(norm);
            }
        }
        Ok(())
    }

    /// Tokens in insertion (vocabulary) order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// A new space with every vector replaced by `f(old, new)`, where `new`
    /// is a zeroed buffer of the same dimensionality. `self` is untouched.
    pub fn transformed(&self, mut f: impl FnMut(&[f32], &mut [f32])) -> Self {
        let mut out = Self::with_capacity(self.dim, self.tokens.len());
        let mut buf = vec![0.0f32; self.dim];
        for (row, token) in self.tokens.iter().enumerate() {
            buf.iter_mut().for_each(|x| *x = 0.0);
            f(self.row(row), &mut buf);
            out.index.insert(token.clone(), row);
            out.tokens.push(token.clone());
            out.data.extend_from_slice(&buf);
            out.norms.push(l2_norm(&buf));
        }
        out
    }

    fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.dim..(row + 1) * self.dim]
    }
}

impl EmbeddingSpace for MemorySpace {
    fn dim(&self) -> usize { self.dim }

    fn vocab_len(&self) -> usize { self.tokens.len() }

    fn vector(&self, token: &str) -> Option<&[f32]> {
        self.index.get(token).map(|&row| self.row(row))
    }

    fn similar_by_vector(&self, query: &[f32], k: usize) -> Vec<(String, f32)> {
        if k == 0 || query.len() != self.dim {
            return Vec::new();
        }
        let q_norm = l2_norm(query);
        if q_norm == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = (0..self.tokens.len())
            .filter(|&row| self.norms[row] > 0.0)
            .map(|row| {
                let dot: f32 = self.row(row).iter().zip(query).map(|(a, b)| a * b).sum();
                (row, dot / (self.norms[row] * q_norm))
            })
            .collect();

        // Descending similarity, ties by vocabulary order
        let by_rank = |a: &(usize, f32), b: &(usize, f32)| -> Ordering {
            b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
        };
        if scored.len() > k {
            scored.select_nth_unstable_by(k - 1, by_rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(by_rank);

        scored
            .into_iter()
            .map(|(row, sim)| (self.tokens[row].clone(), sim))
            .collect()
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
