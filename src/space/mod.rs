//! # Embedding Space Trait
//!
//! This is the contract between the measure engine and any embedding
//! store. The engine only ever reads from a space.
//!
//! ## Implementations
//!
//! | Space | Module | Description |
//! |-------|--------|-------------|
//! | `MemorySpace` | `memory` | Dense in-memory vectors, brute-force k-NN |
//!
//! Loading spaces from disk lives in `text` (word2vec text format and
//! per-grain model directories); alignment of two spaces in `align`.

pub mod memory;
pub mod text;
pub mod align;

pub use memory::MemorySpace;
pub use text::{GrainSeries, LoadOptions, Slice, load_grain, read_word2vec_text, run_tag_for};
pub use align::{Aligner, NoAlignment, PreAligned, FixedRotation, Rotation};

// ============================================================================
// EmbeddingSpace Trait
// ============================================================================

/// Read-only token → vector mapping with cosine nearest-neighbor search.
///
/// Implementors must rank neighbors by descending cosine similarity and
/// break ties by vocabulary order so that neighbor lists are deterministic.
pub trait EmbeddingSpace {
    /// Vector dimensionality.
    fn dim(&self) -> usize;

    /// Number of tokens in the vocabulary.
    fn vocab_len(&self) -> usize;

    /// The vector for `token`, or `None` when out of vocabulary.
    fn vector(&self, token: &str) -> Option<&[f32]>;

    /// Whether `token` is in the vocabulary.
    fn contains(&self, token: &str) -> bool {
        self.vector(token).is_some()
    }

    /// The `k` tokens most similar to an arbitrary query vector.
    ///
    /// No token is excluded: if the query equals a stored vector, that
    /// token ranks first.
    fn similar_by_vector(&self, query: &[f32], k: usize) -> Vec<(String, f32)>;

    /// The `k` tokens most similar to `token`, excluding `token` itself.
    ///
    /// Returns `None` when `token` is out of vocabulary.
    ///
    /// Default: query by the token's vector for `k + 1` results and drop
    /// the token. Override when the store can exclude natively.
    fn most_similar(&self, token: &str, k: usize) -> Option<Vec<(String, f32)>> {
        let query = self.vector(token)?;
        let mut hits = self.similar_by_vector(query, k + 1);
        hits.retain(|(t, _)| t != token);
        hits.truncate(k);
        Some(hits)
    }
}

impl<S: EmbeddingSpace + ?Sized> EmbeddingSpace for &S {
    fn dim(&self) -> usize { (**self).dim() }
    fn vocab_len(&self) -> usize { (**self).vocab_len() }
    fn vector(&self, token: &str) -> Option<&[f32]> { (**self).vector(token) }
    fn contains(&self, token: &str) -> bool { (**self).contains(token) }
    fn similar_by_vector(&self, query: &[f32], k: usize) -> Vec<(String, f32)> {
        (**self).similar_by_vector(query, k)
    }
    fn most_similar(&self, token: &str, k: usize) -> Option<Vec<(String, f32)>> {
        (**self).most_similar(token, k)
    }
}
