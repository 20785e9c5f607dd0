//! Long-format score records.

use serde::Serialize;

use super::{Grain, Score, TimeUnit};

/// One measure value for one compound in one time unit of one grain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    /// Untagged, space-separated compound.
    pub compound: String,
    pub grain: Grain,
    pub time: TimeUnit,
    /// Fully suffixed measure name (e.g. `nn-so-cpd-k10-run2`).
    pub measure: String,
    pub score: Score,
}

/// Append-only collection of records produced by one run.
#[derive(Debug, Clone, Default)]
pub struct ScoreSheet {
    records: Vec<ScoreRecord>,
}

impl ScoreSheet {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, record: ScoreRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ScoreRecord] { &self.records }
    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Look up a single score. Mostly useful in tests and ad-hoc inspection.
    pub fn get(&self, compound: &str, grain: Grain, time: &str, measure: &str) -> Option<Score> {
        self.records
            .iter()
            .find(|r| {
                r.compound == compound
                    && r.grain == grain
                    && r.measure == measure
                    && r.time.to_string() == time
            })
            .map(|r| r.score)
    }
}
