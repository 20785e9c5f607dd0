//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::measure::Framing;
use crate::{Error, Result};

/// Settings shared by every measure family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Neighbors per query for the neighbor-based families.
    pub k: usize,

    /// Framing of neighbor-overlap scores. Similarity (`|∩| / k`) unless a
    /// caller depends on the distance framing.
    pub overlap_framing: Framing,

    /// Part-of-speech tag appended to every lookup token (`green::nn`).
    pub pos_tag: String,

    /// Model family tag used in output file names (`fine_w2v_cpd-head.tsv`).
    pub model_tag: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k: 10,
            overlap_framing: Framing::Similarity,
            pos_tag: "nn".to_string(),
            model_tag: "w2v".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".into()));
        }
        if self.pos_tag.is_empty() || self.pos_tag.chars().any(char::is_whitespace) {
            return Err(Error::InvalidConfig(format!("invalid pos_tag {:?}", self.pos_tag)));
        }
        if self.model_tag.is_empty() || self.model_tag.contains(std::path::MAIN_SEPARATOR) {
            return Err(Error::InvalidConfig(format!("invalid model_tag {:?}", self.model_tag)));
        }
        Ok(())
    }

    /// Read a JSON config file; absent keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
