// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration for the engine binary

use crate::constants::{env_config, scheduling};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Log level
    pub log_level: String,
    /// Task backend selection
    pub backend: BackendConfig,
    /// Recurring task scheduler settings
    pub scheduler: SchedulerConfig,
}

/// Which task backend the generator talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local SQLite task store
    Sqlite,
    /// PostgREST-compatible HTTP backend
    Rest,
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "rest" | "postgrest" | "supabase" => Ok(BackendKind::Rest),
            other => Err(anyhow::anyhow!(
                "Unknown task backend: {}. Supported: sqlite, rest",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// SQLite database URL
    pub database_url: String,
    /// HTTP backend settings
    pub rest: RestBackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestBackendConfig {
    /// Project base URL, e.g. `https://project.supabase.co`
    pub base_url: Option<String>,
    /// Anonymous/service API key sent as the `apikey` header
    pub api_key: Option<String>,
    /// User access token sent as the bearer token
    pub access_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// User whose templates are scanned
    pub user_id: Option<String>,
    /// Seconds between scans
    pub check_interval_secs: u64,
    /// Check for an existing child before calling the creation procedure
    pub client_side_dedup: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Sqlite,
            database_url: "sqlite:./tasks.db".to_string(),
            rest: RestBackendConfig {
                base_url: None,
                api_key: None,
                access_token: None,
                timeout_seconds: 30,
            },
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            check_interval_secs: scheduling::DEFAULT_CHECK_INTERVAL_SECS,
            client_side_dedup: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if let Err(e) = dotenv::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = EngineConfig {
            log_level: env_config::log_level(),

            backend: BackendConfig {
                kind: env_var_or("TASK_BACKEND", "sqlite")
                    .parse()
                    .context("Invalid TASK_BACKEND value")?,
                database_url: env_config::database_url(),
                rest: RestBackendConfig {
                    base_url: env::var("REST_BASE_URL").ok(),
                    api_key: env::var("REST_API_KEY").ok(),
                    access_token: env::var("REST_ACCESS_TOKEN").ok(),
                    timeout_seconds: env_var_or("REST_TIMEOUT_SECS", "30")
                        .parse()
                        .context("Invalid REST_TIMEOUT_SECS value")?,
                },
            },

            scheduler: SchedulerConfig {
                user_id: env::var("ENGINE_USER_ID").ok(),
                check_interval_secs: env_var_or(
                    "RECURRING_CHECK_INTERVAL_SECS",
                    &scheduling::DEFAULT_CHECK_INTERVAL_SECS.to_string(),
                )
                .parse()
                .context("Invalid RECURRING_CHECK_INTERVAL_SECS value")?,
                client_side_dedup: env_var_or("CLIENT_SIDE_DEDUP", "true")
                    .parse()
                    .context("Invalid CLIENT_SIDE_DEDUP value")?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scheduler.check_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "RECURRING_CHECK_INTERVAL_SECS must be greater than zero"
            ));
        }

        match self.backend.kind {
            BackendKind::Sqlite => {
                if self.backend.database_url.is_empty() {
                    return Err(anyhow::anyhow!("DATABASE_URL cannot be empty"));
                }
            }
            BackendKind::Rest => {
                if self.backend.rest.base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "REST_BASE_URL is required when TASK_BACKEND=rest"
                    ));
                }
                if self.backend.rest.api_key.is_none() {
                    warn!("REST backend configured without REST_API_KEY");
                }
            }
        }

        if !self.scheduler.client_side_dedup {
            warn!("Client-side dedup disabled; relying on backend idempotency");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    pub fn summary(&self) -> String {
        format!(
            "Barakah Engine Configuration:\n\
             - Log Level: {}\n\
             - Task Backend: {:?}\n\
             - Database: {}\n\
             - REST Base URL: {}\n\
             - Check Interval: {}s\n\
             - Client-side Dedup: {}",
            self.log_level,
            self.backend.kind,
            if self.backend.database_url.contains(":memory:") { "In-memory" } else { "File" },
            self.backend.rest.base_url.as_deref().unwrap_or("-"),
            self.scheduler.check_interval_secs,
            if self.scheduler.client_side_dedup { "Enabled" } else { "Disabled" },
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            backend: BackendConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
