//! # Measure Primitives
//!
//! The building blocks every measure family is assembled from. All of them
//! are missing-safe: an absent vector or neighbor list yields a missing
//! `Score`, never an error. The only errors raised here are contract
//! violations (neighbor lists of different sizes).
//!
//! | Primitive | Module |
//! |-----------|--------|
//! | vector lookup, pooled mean, `Probe` | `vector` |
//! | cosine similarity / distance | `similarity` |
//! | top-k neighbors, overlap, union | `neighbors` |
//! | second-order similarity | `second_order` |

pub mod vector;
pub mod similarity;
pub mod neighbors;
pub mod second_order;

pub use vector::{vector, mean, Probe};
pub use similarity::{cosine, cosine_similarity, cosine_distance, Framing};
pub use neighbors::{neighbors, neighbors_by_pooled_vector, neighbors_of, overlap, union};
pub use second_order::{second_order, second_order_within, second_order_across};
