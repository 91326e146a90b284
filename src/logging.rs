// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Logging configuration with structured output
//!
//! Logs go to stderr so the binary can print reports on stdout.

use crate::constants::service::{SERVICE_NAME, SERVICE_VERSION};
use crate::intelligence::ProgressReport;
use crate::recurrence::GenerationReport;
use anyhow::Result;
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: SERVICE_NAME.to_string(),
            service_version: SERVICE_VERSION.to_string(),
            environment: "development".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        // In production, use more detailed logging
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || lookup("LOG_INCLUDE_LOCATION").is_some(),
            include_thread: is_production || lookup("LOG_INCLUDE_THREAD").is_some(),
            include_spans: is_production || lookup("LOG_INCLUDE_SPANS").is_some(),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| SERVICE_NAME.to_string()),
            service_version: lookup("SERVICE_VERSION").unwrap_or_else(|| SERVICE_VERSION.to_string()),
            environment,
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Initialize the global tracing subscriber
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(self.span_events())
                    .json();

                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .with_span_events(self.span_events());

                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);

                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();

        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Barakah engine starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });

        info!("Logging configured: {}", config_summary);
    }
}

/// Initialize logging from environment
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Domain event logging helpers
pub struct AppLogger;

impl AppLogger {
    /// Log the outcome of one recurring task scan
    pub fn log_generation_run(report: &GenerationReport, duration_ms: u64) {
        let date = report.date.map(|d| d.to_string()).unwrap_or_default();

        if report.failed > 0 {
            warn!(
                user.id = %report.user_id,
                run.date = %date,
                run.scanned = report.scanned,
                run.created = report.created,
                run.skipped_not_due = report.skipped_not_due,
                run.skipped_existing = report.skipped_existing,
                run.failed = report.failed,
                run.duration_ms = duration_ms,
                "Recurring task scan finished with failures"
            );
        } else {
            info!(
                user.id = %report.user_id,
                run.date = %date,
                run.scanned = report.scanned,
                run.created = report.created,
                run.skipped_not_due = report.skipped_not_due,
                run.skipped_existing = report.skipped_existing,
                run.duration_ms = duration_ms,
                "Recurring task scan finished"
            );
        }
    }

    /// Log a template whose occurrence could not be materialised
    pub fn log_template_failure(user_id: &str, template_id: &str, error: &str) {
        warn!(
            user.id = %user_id,
            template.id = %template_id,
            error = %error,
            "Failed to materialise recurring task occurrence"
        );
    }

    /// Log a generated progress report
    pub fn log_report(report: &ProgressReport) {
        info!(
            report.as_of = %report.as_of,
            report.days_since_registration = report.fair_progress.days_since_registration,
            report.fair_percentage = report.fair_progress.fair_percentage,
            report.streak = report.fair_progress.streak_count,
            report.barakah = report.barakah.total_barakah,
            report.level = %report.barakah.level,
            report.insights = report.insights.len(),
            "Progress report generated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_logging_config_from_lookup() {
        let config = LoggingConfig::from_lookup(lookup_from(&[
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "json"),
            ("ENVIRONMENT", "production"),
            ("SERVICE_NAME", "test-service"),
        ]));

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.environment, "production");
        assert_eq!(config.service_name, "test-service");
        assert!(config.include_location); // Should be true for production
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();

        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.environment, "development");
        assert_eq!(config.service_name, "barakah-engine");
        assert!(!config.include_location);
    }

    #[test]
    fn test_empty_lookup_matches_defaults() {
        let config = LoggingConfig::from_lookup(|_| None);
        let defaults = LoggingConfig::default();

        assert_eq!(config.level, defaults.level);
        assert_eq!(config.format, defaults.format);
        assert_eq!(config.service_name, defaults.service_name);
        assert!(!config.include_spans);
    }
}
