//! # Score Orchestrator
//!
//! Drives one measure family over every grain, time unit and target:
//!
//! ```text
//! for grain in grains
//!   for unit in slices (synchronic) | adjacent slice pairs (diachronic)
//!     [diachronic cosine: align later onto earlier, once per pair]
//!     for target in targets
//!       battery(family) → one ScoreRecord per measure
//! ```
//!
//! Each (grain, unit, target) step only reads spaces and appends records.

pub mod battery;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::model::*;
use crate::space::{Aligner, EmbeddingSpace, GrainSeries};
use crate::{Error, Result};

pub use battery::Measure;

// ============================================================================
// Measure families
// ============================================================================

/// The four measure families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureFamily {
    /// Direct cosines among compound, constituents and pooled constituents.
    #[serde(rename = "syn-cos")]
    SynchronicCosine,
    /// Neighbor overlap and second-order similarity within one slice.
    #[serde(rename = "syn-neighb")]
    SynchronicNeighbor,
    /// Cosine of the same token across aligned adjacent slices.
    #[serde(rename = "dia-cos")]
    DiachronicCosine,
    /// Neighbor overlap and second-order similarity across raw adjacent slices.
    #[serde(rename = "dia-neighb")]
    DiachronicNeighbor,
}

impl MeasureFamily {
    pub const ALL: [MeasureFamily; 4] = [
        MeasureFamily::SynchronicCosine,
        MeasureFamily::SynchronicNeighbor,
        MeasureFamily::DiachronicCosine,
        MeasureFamily::DiachronicNeighbor,
    ];

    pub fn is_diachronic(self) -> bool {
        matches!(self, MeasureFamily::DiachronicCosine | MeasureFamily::DiachronicNeighbor)
    }

    /// Neighbor-based families carry the `-k{k}` suffix.
    pub fn uses_neighbors(self) -> bool {
        matches!(self, MeasureFamily::SynchronicNeighbor | MeasureFamily::DiachronicNeighbor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MeasureFamily::SynchronicCosine => "syn-cos",
            MeasureFamily::SynchronicNeighbor => "syn-neighb",
            MeasureFamily::DiachronicCosine => "dia-cos",
            MeasureFamily::DiachronicNeighbor => "dia-neighb",
        }
    }
}

impl fmt::Display for MeasureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MeasureFamily::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown measure family {s:?}")))
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Computes measure families for a fixed target list.
pub struct Engine<'a> {
    config: &'a EngineConfig,
    targets: &'a [Target],
}

impl<'a> Engine<'a> {
    /// Fails if the configuration is invalid.
    pub fn new(config: &'a EngineConfig, targets: &'a [Target]) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, targets })
    }

    pub fn config(&self) -> &EngineConfig { self.config }
    pub fn targets(&self) -> &[Target] { self.targets }

    /// Suffix appended to every measure name of `family` in a grain.
    pub fn measure_suffix(&self, family: MeasureFamily, run_tag: &str) -> String {
        if family.uses_neighbors() {
            format!("-k{}{run_tag}", self.config.k)
        } else {
            run_tag.to_string()
        }
    }

    /// Run `family` over every grain.
    ///
    /// `aligner` is consulted only by the diachronic cosine family, once
    /// per adjacent slice pair. Pass `NoAlignment` when no family that
    /// needs it will run.
    pub fn run<S, A>(&self, family: MeasureFamily, grains: &[GrainSeries<S>], aligner: &A) -> Result<ScoreSheet>
    where
        S: EmbeddingSpace,
        A: Aligner<S>,
    {
        let (k, framing) = (self.config.k, self.config.overlap_framing);
        tracing::info!(%family, k, targets = self.targets.len(), grains = grains.len(), "calculating measures");

        let mut sheet = ScoreSheet::new();
        for series in grains {
            let grain = series.grain;
            let suffix = self.measure_suffix(family, &series.run_tag);
            tracing::info!(%grain, slices = series.slices().len(), "processing grain");

            if family.is_diachronic() && series.slices().len() < 2 {
                tracing::warn!(%grain, "fewer than two slices, no diachronic pairs");
            }

            match family {
                MeasureFamily::SynchronicCosine => {
                    for slice in series.slices() {
                        let unit = TimeUnit::Slice(slice.label.clone());
                        self.score_unit(&mut sheet, grain, &unit, &suffix, |target| {
                            Ok(battery::synchronic_cosine(target, &slice.space))
                        })?;
                    }
                }
                MeasureFamily::SynchronicNeighbor => {
                    for slice in series.slices() {
                        let unit = TimeUnit::Slice(slice.label.clone());
                        self.score_unit(&mut sheet, grain, &unit, &suffix, |target| {
                            battery::synchronic_neighbor(target, &slice.space, k, framing)
                        })?;
                    }
                }
                MeasureFamily::DiachronicCosine => {
                    for (early, later) in series.adjacent_pairs() {
                        let unit = TimeUnit::Pair(early.label.clone(), later.label.clone());
                        // Aligned once per pair, shared by every target
                        let aligned = aligner.align(&early.space, &later.space, &unit)?;
                        self.score_unit(&mut sheet, grain, &unit, &suffix, |target| {
                            Ok(battery::diachronic_cosine(target, &early.space, &aligned))
                        })?;
                    }
                }
                MeasureFamily::DiachronicNeighbor => {
                    for (early, later) in series.adjacent_pairs() {
                        let unit = TimeUnit::Pair(early.label.clone(), later.label.clone());
                        self.score_unit(&mut sheet, grain, &unit, &suffix, |target| {
                            battery::diachronic_neighbor(target, &early.space, &later.space, k, framing)
                        })?;
                    }
                }
            }
            tracing::info!(%grain, "processed grain");
        }

        tracing::info!(%family, records = sheet.len(), "measures calculated");
        Ok(sheet)
    }

    fn score_unit<F>(
        &self,
        sheet: &mut ScoreSheet,
        grain: Grain,
        unit: &TimeUnit,
        suffix: &str,
        battery: F,
    ) -> Result<()>
    where
        F: Fn(&Target) -> Result<Vec<Measure>>,
    {
        for target in self.targets {
            for (name, score) in battery(target)? {
                sheet.push(ScoreRecord {
                    compound: target.name().to_string(),
                    grain,
                    time: unit.clone(),
                    measure: format!("{name}{suffix}"),
                    score,
                });
            }
        }
        tracing::info!(%grain, time = %unit, "processed time unit");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{MemorySpace, NoAlignment, Slice};

    fn series(grain: Grain, run_tag: &str, labels: &[&str]) -> GrainSeries<MemorySpace> {
        let slices = labels
            .iter()
            .map(|label| Slice {
                label: (*label).into(),
                space: MemorySpace::from_pairs([
                    ("green::nn", vec![1.0, 0.0]),
                    ("house::nn", vec![0.0, 1.0]),
                    ("green_house::nn", vec![1.0, 1.0]),
                ])
                .unwrap(),
            })
            .collect();
        GrainSeries::new(grain, run_tag, slices).unwrap()
    }

    #[test]
    fn family_names_roundtrip() {
        for family in MeasureFamily::ALL {
            assert_eq!(family.as_str().parse::<MeasureFamily>().unwrap(), family);
        }
        assert!("nope".parse::<MeasureFamily>().is_err());
    }

    #[test]
    fn suffixes() {
        let config = EngineConfig { k: 20, ..Default::default() };
        let engine = Engine::new(&config, &[]).unwrap();
        assert_eq!(engine.measure_suffix(MeasureFamily::SynchronicNeighbor, "-run3"), "-k20-run3");
        assert_eq!(engine.measure_suffix(MeasureFamily::DiachronicCosine, "-run3"), "-run3");
        assert_eq!(engine.measure_suffix(MeasureFamily::SynchronicCosine, ""), "");
    }

    #[test]
    fn synchronic_cosine_emits_seven_per_target_and_slice() {
        let config = EngineConfig::default();
        let targets = vec![Target::from_phrase("green house", "nn").unwrap()];
        let engine = Engine::new(&config, &targets).unwrap();
        let grains = vec![series(Grain::Fine, "", &["1850", "1860"]), series(Grain::Coarse, "-run1", &["1850"])];

        let sheet = engine.run(MeasureFamily::SynchronicCosine, &grains, &NoAlignment).unwrap();
        assert_eq!(sheet.len(), 7 * 3);
        assert!(sheet.get("green house", Grain::Coarse, "1850", "cpd-head-run1").is_some());
    }

    #[test]
    fn diachronic_cosine_without_aligner_fails() {
        let config = EngineConfig::default();
        let targets = vec![Target::from_phrase("green house", "nn").unwrap()];
        let engine = Engine::new(&config, &targets).unwrap();
        let grains = vec![series(Grain::Fine, "", &["1850", "1860"])];

        let err = engine.run(MeasureFamily::DiachronicCosine, &grains, &NoAlignment).unwrap_err();
        assert!(matches!(err, Error::AlignmentRequired(ref unit) if unit == "1850_1860"));
    }

    #[test]
    fn diachronic_neighbor_needs_no_aligner() {
        let config = EngineConfig { k: 2, ..Default::default() };
        let targets = vec![Target::from_phrase("green house", "nn").unwrap()];
        let engine = Engine::new(&config, &targets).unwrap();
        let grains = vec![series(Grain::Fine, "", &["1850", "1860", "1870"])];

        let sheet = engine.run(MeasureFamily::DiachronicNeighbor, &grains, &NoAlignment).unwrap();
        assert_eq!(sheet.len(), 8 * 2);
        let score = sheet.get("green house", Grain::Fine, "1860_1870", "nn-overlap-cpd-k2").unwrap();
        assert_eq!(score.value(), Some(1.0));
    }

    #[test]
    fn single_slice_grain_has_no_pairs() {
        let config = EngineConfig::default();
        let targets = vec![Target::from_phrase("green house", "nn").unwrap()];
        let engine = Engine::new(&config, &targets).unwrap();
        let grains = vec![series(Grain::Coarse, "", &["1850"])];
        let sheet = engine.run(MeasureFamily::DiachronicNeighbor, &grains, &NoAlignment).unwrap();
        assert!(sheet.is_empty());
    }
}
