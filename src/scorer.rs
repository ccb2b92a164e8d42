//! Quality scoring of release folder names against the configured
//! pattern table.

use crate::config::{ConfigError, ScorePattern};
use regex::{Regex, RegexBuilder};

/// Compiled, ordered table of (pattern, weight) pairs.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: Vec<(Regex, i64)>,
}

impl PatternTable {
    /// Compile the configured patterns.
    ///
    /// Any malformed pattern fails the whole table, before scanning
    /// starts; the scorer never silently skips a bad pattern at score
    /// time.
    pub fn compile(
        patterns: &[ScorePattern],
        case_insensitive: bool,
    ) -> Result<Self, ConfigError> {
        let mut entries = Vec::with_capacity(patterns.len());
        for item in patterns {
            let regex = RegexBuilder::new(&item.pattern)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|source| ConfigError::Pattern {
                    pattern: item.pattern.clone(),
                    source,
                })?;
            entries.push((regex, item.score));
        }
        Ok(Self { entries })
    }

    /// Score a folder name.
    ///
    /// Every matching pattern contributes its weight; quality signals
    /// (source, codec, release group) stack rather than first-match-wins.
    /// A name matching nothing scores 0. Patterns are unanchored searches
    /// unless they carry their own anchors.
    pub fn score(&self, name: &str) -> i64 {
        self.entries
            .iter()
            .filter(|(regex, _)| regex.is_match(name))
            .map(|(_, weight)| weight)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
