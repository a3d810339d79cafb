//! Engine configuration.
//!
//! A small TOML-backed config with sensible defaults: the engine runs with
//! `EngineConfig::default()` unless the host loads a file. All limits the
//! resolver and quest system enforce live here rather than as scattered
//! constants.

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

fn default_input_character_limit() -> usize {
    256
}

fn default_active_quest_limit() -> usize {
    5
}

fn default_progress_db_path() -> String {
    "data/game_saves".to_string()
}

/// Tunable engine limits and paths.
///
/// ```toml
/// input_character_limit = 256
/// active_quest_limit = 5
/// progress_db_path = "data/game_saves"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Raw command input is truncated to this many characters before parsing.
    #[serde(default = "default_input_character_limit")]
    pub input_character_limit: usize,

    /// Maximum number of quests a player may hold at once.
    #[serde(default = "default_active_quest_limit")]
    pub active_quest_limit: usize,

    /// Sled database path used by the built-in save/load commands.
    #[serde(default = "default_progress_db_path")]
    pub progress_db_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_character_limit: default_input_character_limit(),
            active_quest_limit: default_active_quest_limit(),
            progress_db_path: default_progress_db_path(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing keys fall back to
    /// defaults; a missing file is an error so typos in the path fail fast.
    pub fn load(path: &str) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert_eq!(config.input_character_limit, 256);
        assert_eq!(config.active_quest_limit, 5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str("active_quest_limit = 3").unwrap();
        assert_eq!(config.active_quest_limit, 3);
        assert_eq!(config.input_character_limit, 256);
    }
}
