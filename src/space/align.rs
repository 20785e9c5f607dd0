//! Alignment of a later space onto an earlier one.
//!
//! Computing the orthogonal Procrustes rotation belongs to the training
//! pipeline. This module only defines the seam and the ways the engine can
//! consume it:
//!
//! - `NoAlignment`: refuse; for runs that never compare raw coordinates.
//! - `PreAligned`: spaces were aligned before export, use them as-is.
//! - `FixedRotation`: apply a precomputed `dim × dim` orthogonal matrix per
//!   slice pair (`later · R`).
//!
//! Aligners take both spaces by shared reference. The unaligned later space
//! is still needed by the neighbor-based measures.

use std::path::Path;

use hashbrown::HashMap;

use crate::model::TimeUnit;
use crate::{Error, Result};
use super::{EmbeddingSpace, MemorySpace};

/// Produces a version of `later` whose coordinates are comparable with
/// `early`.
pub trait Aligner<S: EmbeddingSpace> {
    type Aligned: EmbeddingSpace;

    /// Align `later` onto `early`. `unit` identifies the slice pair.
    fn align(&self, early: &S, later: &S, unit: &TimeUnit) -> Result<Self::Aligned>;
}

/// Always fails with `AlignmentRequired`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAlignment;

impl<S: EmbeddingSpace> Aligner<S> for NoAlignment {
    type Aligned = S;

    fn align(&self, _early: &S, _later: &S, unit: &TimeUnit) -> Result<S> {
        Err(Error::AlignmentRequired(unit.to_string()))
    }
}

/// The spaces already share a coordinate system.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreAligned;

impl<S: EmbeddingSpace + Clone> Aligner<S> for PreAligned {
    type Aligned = S;

    fn align(&self, _early: &S, later: &S, _unit: &TimeUnit) -> Result<S> {
        Ok(later.clone())
    }
}

// ============================================================================
// Rotation
// ============================================================================

/// Square matrix applied on the right of row vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    dim: usize,
    /// Row-major.
    data: Vec<f32>,
}

impl Rotation {
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, got: row.len() });
            }
            data.extend(row);
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize { self.dim }

    /// Read a whitespace-separated matrix, one row per line.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut rows = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::Parse {
                    path: path.to_path_buf(),
                    line: i + 1,
                    message: e.to_string(),
                })?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// `out = v · R`
    pub fn apply(&self, v: &[f32], out: &mut [f32]) {
        for (i, &vi) in v.iter().enumerate() {
            let row = &self.data[i * self.dim..(i + 1) * self.dim];
            for (o, &r) in out.iter_mut().zip(row) {
                *o += vi * r;
            }
        }
    }

    pub fn rotate(&self, space: &MemorySpace) -> Result<MemorySpace> {
        if space.dim() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, got: space.dim() });
        }
        Ok(space.transformed(|old, new| self.apply(old, new)))
    }
}

/// Applies one precomputed rotation per slice pair, keyed by the pair's
/// time unit label (`1850_1860`).
#[derive(Debug, Clone, Default)]
pub struct FixedRotation {
    by_unit: HashMap<String, Rotation>,
}

impl FixedRotation {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, unit: &TimeUnit, rotation: Rotation) {
        self.by_unit.insert(unit.to_string(), rotation);
    }

    pub fn len(&self) -> usize { self.by_unit.len() }
    pub fn is_empty(&self) -> bool { self.by_unit.is_empty() }

    /// Load every `<early>_<later><suffix>` matrix file in `dir`.
    pub fn load_dir(dir: &Path, suffix: &str) -> Result<Self> {
        let mut out = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
            let Some(unit) = name.strip_suffix(suffix) else { continue };
            out.by_unit.insert(unit.to_string(), Rotation::read(&path)?);
        }
        tracing::info!(dir = %dir.display(), rotations = out.len(), "loaded rotations");
        Ok(out)
    }
}

impl Aligner<MemorySpace> for FixedRotation {
    type Aligned = MemorySpace;

    fn align(&self, _early: &MemorySpace, later: &MemorySpace, unit: &TimeUnit) -> Result<MemorySpace> {
        let key = unit.to_string();
        let rotation = self
            .by_unit
            .get(&key)
            .ok_or_else(|| Error::MissingRotation(key.clone()))?;
        rotation.rotate(later)
    }
}
