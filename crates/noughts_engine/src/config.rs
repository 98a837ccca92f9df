//! Engine configuration loaded from TOML.

use crate::selection::Difficulty;
use crate::Role;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Kind of opponent seated against the player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OpponentKind {
    /// A second human at the same board.
    Human,
    /// Game-tree search.
    #[default]
    Minimax,
    /// External move-policy oracle.
    Oracle,
}

impl OpponentKind {
    /// Role seated in the opponent chair for this kind.
    #[instrument]
    pub fn role(self) -> Role {
        match self {
            Self::Human => Role::Player2,
            Self::Minimax | Self::Oracle => Role::Ai,
        }
    }
}

/// Configuration for one engine session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Opponent kind.
    #[serde(default)]
    opponent: OpponentKind,

    /// Difficulty preset for the search opponent.
    #[serde(default)]
    difficulty: Difficulty,

    /// Explicit search depth, overriding the difficulty preset.
    #[serde(default)]
    search_depth: Option<u8>,

    /// Fixed role assignment. Drawn at random when absent.
    #[serde(default)]
    first_player_starts_first: Option<bool>,
}

impl EngineConfig {
    /// Creates a configuration for `opponent` with default settings.
    #[instrument]
    pub fn new(opponent: OpponentKind) -> Self {
        Self {
            opponent,
            ..Self::default()
        }
    }

    /// Sets the difficulty preset.
    #[instrument(skip(self))]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Overrides the search depth.
    #[instrument(skip(self))]
    pub fn with_search_depth(mut self, depth: u8) -> Self {
        self.search_depth = Some(depth);
        self
    }

    /// Fixes the role assignment.
    #[instrument(skip(self))]
    pub fn with_first_player_starts_first(mut self, flag: bool) -> Self {
        self.first_player_starts_first = Some(flag);
        self
    }

    /// Depth the search opponent uses: the explicit override if set,
    /// otherwise the difficulty preset.
    pub fn max_depth(&self) -> u8 {
        self.search_depth
            .unwrap_or_else(|| self.difficulty.max_depth())
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            opponent = %config.opponent,
            depth = config.max_depth(),
            "Config loaded successfully"
        );
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
