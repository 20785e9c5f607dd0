//! Compound targets and their tagged lookup tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Separator between a lemma and its part-of-speech tag in space tokens.
pub const TAG_SEPARATOR: &str = "::";

/// A two-word nominal compound and the three tokens used to probe a space.
///
/// All three tokens are well-formed lookup keys whether or not a given
/// space contains them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// `modifier_head::tag`
    pub compound: String,
    /// `modifier::tag`
    pub modifier: String,
    /// `head::tag`
    pub head: String,
    name: String,
}

impl Target {
    /// Build a target from a space-separated phrase such as `"green house"`.
    ///
    /// Fails unless the phrase has exactly two whitespace-separated words.
    pub fn from_phrase(phrase: &str, pos_tag: &str) -> Result<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        let [modifier, head] = words.as_slice() else {
            return Err(Error::InvalidTarget(format!(
                "expected a two-word compound, got {phrase:?}"
            )));
        };
        let modifier = modifier.to_lowercase();
        let head = head.to_lowercase();

        Ok(Self {
            compound: format!("{modifier}_{head}{TAG_SEPARATOR}{pos_tag}"),
            modifier: format!("{modifier}{TAG_SEPARATOR}{pos_tag}"),
            head: format!("{head}{TAG_SEPARATOR}{pos_tag}"),
            name: format!("{modifier} {head}"),
        })
    }

    /// Human-readable, untagged compound (`"green house"`).
    pub fn name(&self) -> &str { &self.name }

    /// Constituent tokens in pooling order.
    pub fn constituents(&self) -> [&str; 2] {
        [self.modifier.as_str(), self.head.as_str()]
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parse a target list: the first tab-separated column of every non-empty
/// line, lowercased.
pub fn parse_target_phrases(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.trim_end().split('\t').next())
        .map(|phrase| phrase.trim().to_lowercase())
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

/// Read a target file and tag every phrase.
///
/// Repeated compounds are kept once, at their first position.
pub fn load_targets(path: &std::path::Path, pos_tag: &str) -> Result<Vec<Target>> {
    let text = std::fs::read_to_string(path)?;
    let mut seen = hashbrown::HashSet::new();
    let mut targets = Vec::new();
    for phrase in parse_target_phrases(&text) {
        let target = Target::from_phrase(&phrase, pos_tag)?;
        if seen.insert(target.name.clone()) {
            targets.push(target);
        } else {
            tracing::warn!(compound = %target, "duplicate target ignored");
        }
    }
    tracing::info!(path = %path.display(), targets = targets.len(), "loaded targets");
    Ok(targets)
}
