use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// A malformed score pattern fails here, before any scanning starts, so
/// the scorer never sees a partially valid table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid score pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One weighted scoring pattern from the config file.
///
/// Negative scores are allowed and act as penalties (e.g. CAM releases).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePattern {
    pub pattern: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Roots whose immediate child directories are candidate release folders.
    #[serde(default)]
    pub paths: Vec<PathBuf>,

    /// Match score patterns without regard to case (release names are wildly
    /// inconsistent about it).
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,

    /// Ordered pattern table; every matching pattern contributes its score.
    #[serde(default)]
    pub score_patterns: Vec<ScorePattern>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            case_insensitive: default_case_insensitive(),
            score_patterns: Vec::new(),
        }
    }
}

fn default_case_insensitive() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Unlike a missing `.nfo` sidecar, a missing or unparseable config
    /// file is a hard error: the caller asked for this exact file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
