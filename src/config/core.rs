use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::sky::SkyConfig;
use crate::config::streaming::StreamingConfig;
use crate::config::worldgen::WorldGenConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub streaming: StreamingConfig,
    pub worldgen: WorldGenConfig,
    pub sky: SkyConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads the config at `path`, falling back to defaults when the file
    /// does not exist. Parse errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert!(config.streaming.render_distance > 0);
        assert!(config.streaming.remesh_budget > 0);
        assert!(config.worldgen.water_level < 128);
    }

    #[test]
    fn parses_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [streaming]
            render_distance = 4
            evict_margin = 2
            remesh_budget = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.streaming.render_distance, 4);
        // Missing sections fall back to defaults.
        assert_eq!(config.worldgen.seed, WorldGenConfig::default().seed);
    }
}
