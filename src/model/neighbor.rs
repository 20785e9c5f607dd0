//! Nearest-neighbor lists and their unions.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Top-k neighbors of a query, ordered by descending cosine similarity.
///
/// Absence of a neighbor set (query out of vocabulary) is modelled as
/// `Option<NeighborSet>` by the callers, never as an empty set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeighborSet {
    entries: Vec<(String, f32)>,
}

impl NeighborSet {
    pub fn new(entries: Vec<(String, f32)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> &[(String, f32)] { &self.entries }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(token, _)| token.as_str())
    }

    /// Token identities, rank and similarity dropped.
    pub fn token_set(&self) -> HashSet<&str> {
        self.tokens().collect()
    }
}

/// Token-identity union of two neighbor sets.
///
/// Iterates in first-seen order: the left set's tokens, then tokens only
/// present on the right. Profile sums over a neighborhood are therefore
/// reproducible run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    tokens: Vec<String>,
}

impl Neighborhood {
    pub fn union(left: &NeighborSet, right: &NeighborSet) -> Self {
        let mut seen: HashSet<&str> = HashSet::with_capacity(left.len() + right.len());
        let tokens = left
            .tokens()
            .chain(right.tokens())
            .filter(|token| seen.insert(*token))
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize { self.tokens.len() }
    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

impl FromIterator<String> for Neighborhood {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let tokens = iter.into_iter().filter(|t| seen.insert(t.clone())).collect();
        Self { tokens }
    }
}
