// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the Barakah engine

pub mod environment;
pub mod scoring_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use environment::{BackendConfig, BackendKind, EngineConfig, RestBackendConfig, SchedulerConfig};
pub use scoring_config::ScoringConfig;

/// File-backed settings; environment settings live in [`EngineConfig`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load from `path`, else the user config directory, else defaults
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        if config_path.exists() {
            debug!("Loading config from {}", config_path.display());
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
            config.scoring.validate()?;
            Ok(config)
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path).parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("barakah-engine/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
}
