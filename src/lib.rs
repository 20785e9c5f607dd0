//! # compound-shift: Semantic Shift Features for Nominal Compounds
//!
//! Computes per-compound, per-time-slice similarity features from
//! historical word embedding spaces, for predicting how compositional a
//! compound is and how its meaning moves over time.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `EmbeddingSpace` is the contract between the measure engine and any vector store
//! 2. **Absence is data**: every primitive returns a `Score` that may be missing; nothing panics on OOV tokens
//! 3. **Alignment is a seam**: diachronic cosines consume an `Aligner`, they never compute one
//! 4. **Long format inside, wide format outside**: the engine emits `ScoreRecord`s, `export` pivots them
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compound_shift::{Engine, EngineConfig, Grain, MeasureFamily, NoAlignment};
//! use compound_shift::space::{load_grain, LoadOptions};
//! use compound_shift::model::load_targets;
//!
//! # fn example() -> compound_shift::Result<()> {
//! let config = EngineConfig::default();
//! let targets = load_targets("targets.tsv".as_ref(), &config.pos_tag)?;
//! let fine = load_grain("models/fine".as_ref(), Grain::Fine, &LoadOptions::default())?;
//!
//! let engine = Engine::new(&config, &targets)?;
//! let sheet = engine.run(MeasureFamily::SynchronicCosine, &[fine], &NoAlignment)?;
//! compound_shift::write_tables(&sheet, "out".as_ref(), &config.model_tag)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Measure Families
//!
//! | Family | Time unit | Measures |
//! |--------|-----------|----------|
//! | `syn-cos` | slice | compound/constituent cosines and composites |
//! | `syn-neighb` | slice | neighbor overlap and second-order similarity |
//! | `dia-cos` | slice pair | cosine across aligned spaces |
//! | `dia-neighb` | slice pair | neighbor overlap and second-order across raw spaces |

use std::path::PathBuf;

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod space;
pub mod measure;
pub mod engine;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Score, Composites, Target, Grain, TimeLabel, TimeUnit,
    NeighborSet, Neighborhood, ScoreRecord, ScoreSheet,
};

// ============================================================================
// Re-exports: Spaces
// ============================================================================

pub use space::{
    EmbeddingSpace, MemorySpace, GrainSeries, Slice,
    Aligner, NoAlignment, PreAligned, FixedRotation, Rotation,
};

// ============================================================================
// Re-exports: Measures and Engine
// ============================================================================

pub use measure::{Framing, Probe};
pub use engine::{Engine, MeasureFamily};
pub use config::EngineConfig;
pub use export::{WideTable, WriteReport, pivot, write_new_file, write_tables, write_records_jsonl};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Neighbor lists differ in size: {left} vs {right}")]
    NeighborSizeMismatch { left: usize, right: usize },

    #[error("No embedding slices for {grain} grain{}", in_dir(.dir))]
    EmptyGrain { grain: Grain, dir: Option<PathBuf> },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error in {}:{line}: {message}", .path.display())]
    Parse { path: PathBuf, line: usize, message: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("No rotation for slice pair {0}")]
    MissingRotation(String),

    #[error("Slice pair {0} needs an aligner")]
    AlignmentRequired(String),

    #[error("Duplicate score for {compound:?} at {time} in {measure}")]
    DuplicateScore { compound: String, time: String, measure: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn in_dir(dir: &Option<PathBuf>) -> String {
    dir.as_ref()
        .map(|d| format!(" in {}", d.display()))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
