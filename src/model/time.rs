//! Grains, time labels and the time units measures are reported against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Temporal resolution family of embedding spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Fine,
    Coarse,
}

impl Grain {
    pub const ALL: [Grain; 2] = [Grain::Fine, Grain::Coarse];

    pub fn as_str(self) -> &'static str {
        match self {
            Grain::Fine => "fine",
            Grain::Coarse => "coarse",
        }
    }
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque label of one space within a grain (e.g. `1850` or `1850-1899`).
/// Slices order by label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeLabel(pub String);

impl TimeLabel {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimeLabel {
    fn from(s: &str) -> Self { TimeLabel(s.to_string()) }
}

/// Separator between the two labels of a diachronic time unit.
pub const PAIR_SEPARATOR: char = '_';

/// The column a score is reported under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum TimeUnit {
    /// One slice (synchronic measures).
    Slice(TimeLabel),
    /// Two adjacent slices, earlier first (diachronic measures).
    Pair(TimeLabel, TimeLabel),
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeUnit::Slice(label) => write!(f, "{label}"),
            TimeUnit::Pair(early, later) => write!(f, "{early}{PAIR_SEPARATOR}{later}"),
        }
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> String { unit.to_string() }
}
